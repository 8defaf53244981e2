use chrono::{DateTime, NaiveDate, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub type BookId = i32;
pub type CategoryId = i32;
pub type CustomerId = i32;
pub type EmployeeId = i32;
pub type SaleId = i32;
pub type RentalId = i32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Book as listed by the store, joined with the name of its category
pub struct Book {
    #[serde(rename = "bookID")]
    pub book_id: BookId,
    pub title: String,
    #[serde(default)]
    pub sub_title: Option<String>,
    pub author: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub price: f64,
    pub rental_price_per_day: f64,
    pub quantity_in_stock: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub sub_title: Option<String>,
    pub author: String,
    pub category_id: CategoryId,
    pub price: f64,
    #[serde(default)]
    pub rental_price_per_day: f64,
    pub quantity_in_stock: i32,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Patch to a book. Only the fields that are present are changed,
/// an empty `subTitle` removes the subtitle
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_price_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_in_stock: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "categoryID")]
    pub category_id: CategoryId,
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub category_name: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "customerID")]
    pub customer_id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// An empty phone, email or address removes it
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "employeeID")]
    pub employee_id: EmployeeId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Sale joined with the names of the customer, employee and book it references
pub struct Sale {
    #[serde(rename = "saleID")]
    pub sale_id: SaleId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub book_id: BookId,
    pub book_title: String,
    pub quantity: i32,
    /// Price of a single book at the time of sale
    pub unit_price: f64,
    pub total_price: f64,
    pub sale_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub customer_id: CustomerId,
    pub employee_id: EmployeeId,
    pub book_id: BookId,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Apiv2Schema)]
pub enum RentalStatus {
    Active,
    Returned,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Active => "Active",
            RentalStatus::Returned => "Returned",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Rental joined with the names of the customer, employee and book it references
pub struct Rental {
    #[serde(rename = "rentalID")]
    pub rental_id: RentalId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub book_id: BookId,
    pub book_title: String,
    pub days: i32,
    pub quantity: i32,
    pub total_cost: f64,
    pub rental_date: DateTime<Utc>,
    pub expected_return_date: DateTime<Utc>,
    /// Set once the rental is returned
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
    pub status: RentalStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct NewRental {
    pub customer_id: CustomerId,
    pub employee_id: EmployeeId,
    pub book_id: BookId,
    pub days: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Sales aggregated over a single day
pub struct SalesSummary {
    pub sale_day: NaiveDate,
    pub total_sales: f64,
    pub number_of_sales: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub enum TransactionType {
    Sale,
    Rental,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
pub struct RecentTransaction {
    /// Id of the sale or rental, depending on the type
    pub id: i32,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub date: DateTime<Utc>,
    pub amount: f64,
}
