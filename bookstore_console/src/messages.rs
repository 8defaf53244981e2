//! User facing strings of the console.

use crate::forms::FormError;

pub const CURRENCY: &str = "EGP";

pub const SALE_COMPLETED: &str = "The sale was completed successfully!";
pub const SALE_FAILED: &str = "An error occurred while processing the sale";
pub const RENTAL_COMPLETED: &str = "The rental was completed successfully!";
pub const RENTAL_FAILED: &str = "An error occurred while processing the rental";
pub const RENTAL_RETURNED: &str = "The rental was marked as returned!";
pub const RETURN_FAILED: &str = "An error occurred while returning the rental";
pub const INITIALIZED: &str = "The database was initialized successfully!";
pub const INITIALIZE_FAILED: &str = "An error occurred while initializing the database";
pub const NO_FORM: &str = "This screen has no form";
pub const NO_RETURNS: &str = "Only rentals can be returned";

pub fn delete_confirmation(noun: &str, label: &str) -> String {
    format!("Are you sure you want to delete the {noun} \"{label}\"?")
}

pub fn deleted(noun: &str) -> String {
    format!("The {noun} was deleted successfully!")
}

pub fn delete_failed(noun: &str) -> String {
    format!("An error occurred while deleting the {noun}")
}

pub fn saved(noun: &str) -> String {
    format!("The {noun} was saved successfully!")
}

pub fn save_failed(noun: &str) -> String {
    format!("An error occurred while saving the {noun}")
}

pub fn not_listed(list: &str, id: i32) -> String {
    format!("#{id} is not in the {list} list")
}

pub fn return_confirmation(book_title: &str, customer_name: &str) -> String {
    format!("Mark \"{book_title}\" rented by {customer_name} as returned?")
}

pub fn invalid_form(err: &FormError) -> String {
    format!("Please check the form: {err}")
}

pub const NO_FILTER: &str = "This screen has no filter";
pub const NO_OPEN_FORM: &str = "There is no open form, use `new` or `edit` first";

pub fn unknown_route(path: &str) -> String {
    format!("There is no screen at \"{path}\"")
}

pub fn confirm_transaction(kind: &str, total: Option<&str>) -> String {
    match total {
        Some(total) => format!("Confirm the {kind} for {total}?"),
        None => format!("Confirm the {kind}?"),
    }
}
