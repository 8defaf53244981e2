use std::str::FromStr;

use bookstore_repository::api::{
    Book, BookPatch, Category, CategoryPatch, Customer, CustomerPatch, NewBook, NewCategory,
    NewCustomer, NewRental, NewSale,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("\"{0}\" is required")]
    MissingField(&'static str),
    #[error("\"{field}\" must be a number, got \"{value}\"")]
    NotANumber { field: &'static str, value: String },
}

/// Failure of submitting a form: either the input never left the console or the server refused it
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormError),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Form made of labelled text fields, filled in one by one
pub trait FormFields {
    fn fields(&self) -> Vec<(&'static str, &str)>;
    fn fields_mut(&mut self) -> Vec<(&'static str, &mut String)>;
}

fn required(label: &'static str, value: &str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FormError::MissingField(label))
    } else {
        Ok(value.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn number<T: FromStr>(label: &'static str, value: &str) -> Result<T, FormError> {
    let value = required(label, value)?;
    value.parse().map_err(|_| FormError::NotANumber {
        field: label,
        value,
    })
}

fn number_or<T: FromStr>(label: &'static str, value: &str, default: T) -> Result<T, FormError> {
    if value.trim().is_empty() {
        Ok(default)
    } else {
        number(label, value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub sub_title: String,
    pub author: String,
    pub category_id: String,
    pub price: String,
    pub rental_price_per_day: String,
    pub quantity_in_stock: String,
}

impl BookForm {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            sub_title: book.sub_title.clone().unwrap_or_default(),
            author: book.author.clone(),
            category_id: book.category_id.to_string(),
            price: book.price.to_string(),
            rental_price_per_day: book.rental_price_per_day.to_string(),
            quantity_in_stock: book.quantity_in_stock.to_string(),
        }
    }

    pub fn to_new_book(&self) -> Result<NewBook, FormError> {
        Ok(NewBook {
            title: required("Title", &self.title)?,
            sub_title: optional(&self.sub_title),
            author: required("Author", &self.author)?,
            category_id: number("Category", &self.category_id)?,
            price: number("Price", &self.price)?,
            rental_price_per_day: number_or("Rental price per day", &self.rental_price_per_day, 0.0)?,
            quantity_in_stock: number("Quantity", &self.quantity_in_stock)?,
        })
    }

    pub fn to_patch(&self) -> Result<BookPatch, FormError> {
        let book = self.to_new_book()?;
        Ok(BookPatch {
            title: Some(book.title),
            sub_title: Some(book.sub_title.unwrap_or_default()),
            author: Some(book.author),
            category_id: Some(book.category_id),
            price: Some(book.price),
            rental_price_per_day: Some(book.rental_price_per_day),
            quantity_in_stock: Some(book.quantity_in_stock),
        })
    }
}

impl FormFields for BookForm {
    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Title", &self.title),
            ("Subtitle", &self.sub_title),
            ("Author", &self.author),
            ("Category", &self.category_id),
            ("Price", &self.price),
            ("Rental price per day", &self.rental_price_per_day),
            ("Quantity", &self.quantity_in_stock),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![
            ("Title", &mut self.title),
            ("Subtitle", &mut self.sub_title),
            ("Author", &mut self.author),
            ("Category", &mut self.category_id),
            ("Price", &mut self.price),
            ("Rental price per day", &mut self.rental_price_per_day),
            ("Quantity", &mut self.quantity_in_stock),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub category_name: String,
}

impl CategoryForm {
    pub fn from_category(category: &Category) -> Self {
        Self {
            category_name: category.category_name.clone(),
        }
    }

    pub fn to_new_category(&self) -> Result<NewCategory, FormError> {
        Ok(NewCategory {
            category_name: required("Category name", &self.category_name)?,
        })
    }

    pub fn to_patch(&self) -> Result<CategoryPatch, FormError> {
        Ok(CategoryPatch {
            category_name: Some(required("Category name", &self.category_name)?),
        })
    }
}

impl FormFields for CategoryForm {
    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![("Category name", &self.category_name)]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![("Category name", &mut self.category_name)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl CustomerForm {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            phone: customer.phone.clone().unwrap_or_default(),
            email: customer.email.clone().unwrap_or_default(),
            address: customer.address.clone().unwrap_or_default(),
        }
    }

    pub fn to_new_customer(&self) -> Result<NewCustomer, FormError> {
        Ok(NewCustomer {
            name: required("Name", &self.name)?,
            phone: optional(&self.phone),
            email: optional(&self.email),
            address: optional(&self.address),
        })
    }

    pub fn to_patch(&self) -> Result<CustomerPatch, FormError> {
        let customer = self.to_new_customer()?;
        Ok(CustomerPatch {
            name: Some(customer.name),
            phone: Some(customer.phone.unwrap_or_default()),
            email: Some(customer.email.unwrap_or_default()),
            address: Some(customer.address.unwrap_or_default()),
        })
    }
}

impl FormFields for CustomerForm {
    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Name", &self.name),
            ("Phone", &self.phone),
            ("Email", &self.email),
            ("Address", &self.address),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![
            ("Name", &mut self.name),
            ("Phone", &mut self.phone),
            ("Email", &mut self.email),
            ("Address", &mut self.address),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleForm {
    pub customer_id: String,
    pub employee_id: String,
    pub book_id: String,
    pub quantity: String,
}

impl Default for SaleForm {
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            employee_id: String::new(),
            book_id: String::new(),
            quantity: "1".to_string(),
        }
    }
}

impl SaleForm {
    pub fn to_new_sale(&self) -> Result<NewSale, FormError> {
        Ok(NewSale {
            customer_id: number("Customer", &self.customer_id)?,
            employee_id: number("Employee", &self.employee_id)?,
            book_id: number("Book", &self.book_id)?,
            quantity: number("Quantity", &self.quantity)?,
        })
    }
}

impl FormFields for SaleForm {
    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Customer", &self.customer_id),
            ("Employee", &self.employee_id),
            ("Book", &self.book_id),
            ("Quantity", &self.quantity),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![
            ("Customer", &mut self.customer_id),
            ("Employee", &mut self.employee_id),
            ("Book", &mut self.book_id),
            ("Quantity", &mut self.quantity),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalForm {
    pub customer_id: String,
    pub employee_id: String,
    pub book_id: String,
    pub days: String,
    pub quantity: String,
}

impl Default for RentalForm {
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            employee_id: String::new(),
            book_id: String::new(),
            days: "1".to_string(),
            quantity: "1".to_string(),
        }
    }
}

impl RentalForm {
    pub fn to_new_rental(&self) -> Result<NewRental, FormError> {
        Ok(NewRental {
            customer_id: number("Customer", &self.customer_id)?,
            employee_id: number("Employee", &self.employee_id)?,
            book_id: number("Book", &self.book_id)?,
            days: number("Days", &self.days)?,
            quantity: number("Quantity", &self.quantity)?,
        })
    }
}

impl FormFields for RentalForm {
    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Customer", &self.customer_id),
            ("Employee", &self.employee_id),
            ("Book", &self.book_id),
            ("Days", &self.days),
            ("Quantity", &self.quantity),
        ]
    }

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![
            ("Customer", &mut self.customer_id),
            ("Employee", &mut self.employee_id),
            ("Book", &mut self.book_id),
            ("Days", &mut self.days),
            ("Quantity", &mut self.quantity),
        ]
    }
}
