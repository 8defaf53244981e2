pub use in_memory_bookstore_repository::InMemoryBookstoreRepository;
pub use postgres_bookstore_repository::{
    PostgresBookstoreRepository, PostgresBookstoreRepositoryConfig,
};

use chrono::{DateTime, Utc};

use crate::api::{
    Book, BookId, BookPatch, Category, CategoryId, CategoryPatch, Customer, CustomerId,
    CustomerPatch, Employee, EmployeeId, NewBook, NewCategory, NewCustomer, NewRental, NewSale,
    RecentTransaction, Rental, RentalId, Sale, SalesSummary,
};
use crate::pricing;

mod in_memory_bookstore_repository;
mod postgres_bookstore_repository;

/// Employees created by `initialize` when the store has none
pub const DEFAULT_EMPLOYEES: [&str; 3] = ["Ahmed Hassan", "Mona Adel", "Omar Khaled"];

/// Number of entries returned by the recent transactions report
pub const RECENT_TRANSACTIONS_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum BookstoreRepositoryError {
    #[error("Book {0} not found")]
    BookNotFound(BookId),

    #[error("Category {0} not found")]
    CategoryNotFound(CategoryId),

    #[error("Customer {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    #[error("Rental {0} not found")]
    RentalNotFound(RentalId),

    #[error("Book {book_id} has {available} copies in stock, {requested} requested")]
    InsufficientStock {
        book_id: BookId,
        requested: i32,
        available: i32,
    },

    #[error("Rental {0} already returned")]
    RentalAlreadyReturned(RentalId),

    #[error("Category {0} is still referenced by books")]
    CategoryInUse(CategoryId),

    #[error("Book {0} is still referenced by sales or rentals")]
    BookInUse(BookId),

    #[error("Customer {0} is still referenced by sales or rentals")]
    CustomerInUse(CustomerId),

    #[error("Invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Failed to deserialize record: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait BookstoreRepository: Send + Sync {
    /// Lists all books together with their category names
    async fn list_books(&self) -> Result<Vec<Book>, BookstoreRepositoryError>;
    async fn get_book(&self, book_id: BookId) -> Result<Book, BookstoreRepositoryError>;
    /// Adds book to the store, the category has to exist
    async fn add_book(&self, book: NewBook) -> Result<Book, BookstoreRepositoryError>;
    async fn update_book(
        &self,
        book_id: BookId,
        patch: BookPatch,
    ) -> Result<Book, BookstoreRepositoryError>;
    /// Deletes book, fails when any sale or rental references it
    async fn delete_book(&self, book_id: BookId) -> Result<(), BookstoreRepositoryError>;

    async fn list_categories(&self) -> Result<Vec<Category>, BookstoreRepositoryError>;
    async fn add_category(
        &self,
        category: NewCategory,
    ) -> Result<Category, BookstoreRepositoryError>;
    async fn update_category(
        &self,
        category_id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, BookstoreRepositoryError>;
    /// Deletes category, fails when any book references it
    async fn delete_category(&self, category_id: CategoryId)
        -> Result<(), BookstoreRepositoryError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, BookstoreRepositoryError>;
    async fn add_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<Customer, BookstoreRepositoryError>;
    async fn update_customer(
        &self,
        customer_id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Customer, BookstoreRepositoryError>;
    async fn delete_customer(&self, customer_id: CustomerId)
        -> Result<(), BookstoreRepositoryError>;

    async fn list_employees(&self) -> Result<Vec<Employee>, BookstoreRepositoryError>;

    /// Lists sales, newest first
    async fn list_sales(&self) -> Result<Vec<Sale>, BookstoreRepositoryError>;
    /// Records a sale and takes the sold copies out of stock in one step.
    /// Unit price is taken from the book at the time of sale
    async fn create_sale(&self, sale: NewSale) -> Result<Sale, BookstoreRepositoryError>;

    /// Lists rentals, newest first
    async fn list_rentals(&self) -> Result<Vec<Rental>, BookstoreRepositoryError>;
    /// Records an active rental and takes the rented copies out of stock in one step
    async fn create_rental(&self, rental: NewRental) -> Result<Rental, BookstoreRepositoryError>;
    /// Marks an active rental as returned and puts the copies back in stock
    async fn return_rental(&self, rental_id: RentalId) -> Result<Rental, BookstoreRepositoryError>;

    /// Sales grouped per day, newest day first
    async fn sales_summary(&self) -> Result<Vec<SalesSummary>, BookstoreRepositoryError>;
    /// Sales and rentals merged, newest first, up to `limit` entries
    async fn recent_transactions(
        &self,
        limit: usize,
    ) -> Result<Vec<RecentTransaction>, BookstoreRepositoryError>;

    /// Seeds default employees if there are none, returns all employees
    async fn initialize(&self) -> Result<Vec<Employee>, BookstoreRepositoryError>;
}

fn require_text(field: &'static str, value: &str) -> Result<(), BookstoreRepositoryError> {
    if value.trim().is_empty() {
        Err(BookstoreRepositoryError::Invalid {
            field,
            reason: "must not be empty",
        })
    } else {
        Ok(())
    }
}

fn require_positive(field: &'static str, value: i32) -> Result<(), BookstoreRepositoryError> {
    if value < 1 {
        Err(BookstoreRepositoryError::Invalid {
            field,
            reason: "must be at least 1",
        })
    } else {
        Ok(())
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), BookstoreRepositoryError> {
    if !value.is_finite() {
        Err(BookstoreRepositoryError::Invalid {
            field,
            reason: "must be a finite number",
        })
    } else if value < 0.0 {
        Err(BookstoreRepositoryError::Invalid {
            field,
            reason: "must not be negative",
        })
    } else {
        Ok(())
    }
}

pub(crate) fn validate_new_book(book: &NewBook) -> Result<(), BookstoreRepositoryError> {
    require_text("title", &book.title)?;
    require_text("author", &book.author)?;
    require_non_negative("price", book.price)?;
    require_non_negative("rentalPricePerDay", book.rental_price_per_day)?;
    if book.quantity_in_stock < 0 {
        return Err(BookstoreRepositoryError::Invalid {
            field: "quantityInStock",
            reason: "must not be negative",
        });
    }
    Ok(())
}

pub(crate) fn validate_book_patch(patch: &BookPatch) -> Result<(), BookstoreRepositoryError> {
    if let Some(title) = &patch.title {
        require_text("title", title)?;
    }
    if let Some(author) = &patch.author {
        require_text("author", author)?;
    }
    if let Some(price) = patch.price {
        require_non_negative("price", price)?;
    }
    if let Some(rate) = patch.rental_price_per_day {
        require_non_negative("rentalPricePerDay", rate)?;
    }
    if matches!(patch.quantity_in_stock, Some(quantity) if quantity < 0) {
        return Err(BookstoreRepositoryError::Invalid {
            field: "quantityInStock",
            reason: "must not be negative",
        });
    }
    Ok(())
}

/// Blank optional text is stored as absent, so an empty string in a patch clears the field
pub(crate) fn blank_as_none(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

pub(crate) fn validate_category_name(name: &str) -> Result<(), BookstoreRepositoryError> {
    require_text("categoryName", name)
}

pub(crate) fn validate_customer_name(name: &str) -> Result<(), BookstoreRepositoryError> {
    require_text("name", name)
}

pub(crate) fn validate_new_sale(sale: &NewSale) -> Result<(), BookstoreRepositoryError> {
    require_positive("quantity", sale.quantity)
}

pub(crate) fn validate_new_rental(rental: &NewRental) -> Result<(), BookstoreRepositoryError> {
    require_positive("days", rental.days)?;
    require_positive("quantity", rental.quantity)
}

pub(crate) fn checked_sale_total(
    unit_price: f64,
    quantity: i32,
) -> Result<f64, BookstoreRepositoryError> {
    pricing::sale_total(unit_price, quantity).ok_or(BookstoreRepositoryError::Invalid {
        field: "quantity",
        reason: "gives a total above the transaction limit",
    })
}

pub(crate) fn checked_rental_cost(
    daily_rate: f64,
    days: i32,
    quantity: i32,
) -> Result<f64, BookstoreRepositoryError> {
    pricing::rental_cost(daily_rate, days, quantity).ok_or(BookstoreRepositoryError::Invalid {
        field: "days",
        reason: "gives a total above the transaction limit",
    })
}

pub(crate) fn checked_return_date(
    rental_date: DateTime<Utc>,
    days: i32,
) -> Result<DateTime<Utc>, BookstoreRepositoryError> {
    pricing::expected_return_date(rental_date, days).ok_or(BookstoreRepositoryError::Invalid {
        field: "days",
        reason: "puts the return date out of range",
    })
}
