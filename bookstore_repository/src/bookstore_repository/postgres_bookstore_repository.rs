use anyhow::Context;
use chrono::Utc;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row, Statement};

use crate::api::{
    Book, BookId, BookPatch, Category, CategoryId, CategoryPatch, Customer, CustomerId,
    CustomerPatch, Employee, NewBook, NewCategory, NewCustomer, NewRental, NewSale,
    RecentTransaction, Rental, RentalId, RentalStatus, Sale, SaleId, SalesSummary,
    TransactionType,
};
use crate::bookstore_repository::{
    blank_as_none, checked_rental_cost, checked_return_date, checked_sale_total, validate_book_patch,
    validate_category_name, validate_customer_name, validate_new_book, validate_new_rental,
    validate_new_sale, BookstoreRepository, BookstoreRepositoryError, DEFAULT_EMPLOYEES,
};
use crate::pricing;

const SELECT_BOOKS: &str = "
    SELECT b.id, b.title, b.sub_title, b.author, b.category_id, c.name,
           b.price, b.rental_price_per_day, b.quantity_in_stock
    FROM books b JOIN categories c ON c.id = b.category_id";

const SELECT_SALES: &str = "
    SELECT s.id, s.customer_id, c.name, s.employee_id, e.name, s.book_id, b.title,
           s.quantity, s.unit_price, s.total_price, s.sale_date
    FROM sales s
    JOIN customers c ON c.id = s.customer_id
    JOIN employees e ON e.id = s.employee_id
    JOIN books b ON b.id = s.book_id";

const SELECT_RENTALS: &str = "
    SELECT r.id, r.customer_id, c.name, r.employee_id, e.name, r.book_id, b.title,
           r.days, r.quantity, r.total_cost, r.rental_date, r.expected_return_date,
           r.return_date, r.status
    FROM rentals r
    JOIN customers c ON c.id = r.customer_id
    JOIN employees e ON e.id = r.employee_id
    JOIN books b ON b.id = r.book_id";

pub struct PostgresBookstoreRepositoryConfig {
    pub hostname: String,
    pub username: String,
    pub password: String,
}

pub struct PostgresBookstoreRepository {
    client: Client,
}

impl PostgresBookstoreRepository {
    pub async fn init(config: PostgresBookstoreRepositoryConfig) -> anyhow::Result<Self> {
        let connection_str = format!(
            "postgresql://{}:{}@{}",
            config.username, config.password, config.hostname
        );
        tracing::info!(hostname = %config.hostname, "Connecting to postgres");
        let (client, connection) = tokio_postgres::connect(&connection_str, NoTls)
            .await
            .context("Failed to start postgres")?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("Postgres connection error: {}", e);
            }
        });

        client
            .batch_execute(
                "
        CREATE TABLE IF NOT EXISTS categories (
            id                      SERIAL PRIMARY KEY,
            name                    TEXT NOT NULL
            );
        CREATE TABLE IF NOT EXISTS books (
            id                      SERIAL PRIMARY KEY,
            title                   TEXT NOT NULL,
            sub_title               TEXT,
            author                  TEXT NOT NULL,
            category_id             INTEGER NOT NULL REFERENCES categories (id),
            price                   DOUBLE PRECISION NOT NULL,
            rental_price_per_day    DOUBLE PRECISION NOT NULL,
            quantity_in_stock       INTEGER NOT NULL CHECK (quantity_in_stock >= 0)
            );
        CREATE TABLE IF NOT EXISTS customers (
            id                      SERIAL PRIMARY KEY,
            name                    TEXT NOT NULL,
            phone                   TEXT,
            email                   TEXT,
            address                 TEXT
            );
        CREATE TABLE IF NOT EXISTS employees (
            id                      SERIAL PRIMARY KEY,
            name                    TEXT NOT NULL
            );
        CREATE TABLE IF NOT EXISTS sales (
            id                      SERIAL PRIMARY KEY,
            customer_id             INTEGER NOT NULL REFERENCES customers (id),
            employee_id             INTEGER NOT NULL REFERENCES employees (id),
            book_id                 INTEGER NOT NULL REFERENCES books (id),
            quantity                INTEGER NOT NULL,
            unit_price              DOUBLE PRECISION NOT NULL,
            total_price             DOUBLE PRECISION NOT NULL,
            sale_date               TIMESTAMPTZ NOT NULL
            );
        CREATE TABLE IF NOT EXISTS rentals (
            id                      SERIAL PRIMARY KEY,
            customer_id             INTEGER NOT NULL REFERENCES customers (id),
            employee_id             INTEGER NOT NULL REFERENCES employees (id),
            book_id                 INTEGER NOT NULL REFERENCES books (id),
            days                    INTEGER NOT NULL,
            quantity                INTEGER NOT NULL,
            total_cost              DOUBLE PRECISION NOT NULL,
            rental_date             TIMESTAMPTZ NOT NULL,
            expected_return_date    TIMESTAMPTZ NOT NULL,
            return_date             TIMESTAMPTZ,
            status                  TEXT NOT NULL
            );
        ",
            )
            .await
            .context("Failed to setup tables")?;
        Ok(Self { client })
    }

    async fn query_book(&self, book_id: BookId) -> Result<Book, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!("{SELECT_BOOKS} WHERE b.id = $1"))
            .await?;
        let rows = self.client.query(&stmt, &[&book_id]).await?;
        book_from_row(
            rows.first()
                .ok_or(BookstoreRepositoryError::BookNotFound(book_id))?,
        )
    }

    async fn query_sale(&self, sale_id: SaleId) -> Result<Sale, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!("{SELECT_SALES} WHERE s.id = $1"))
            .await?;
        let rows = self.client.query(&stmt, &[&sale_id]).await?;
        sale_from_row(
            rows.first()
                .ok_or_else(|| BookstoreRepositoryError::Other("Sale not returned".to_string()))?,
        )
    }

    async fn query_rental(&self, rental_id: RentalId) -> Result<Rental, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!("{SELECT_RENTALS} WHERE r.id = $1"))
            .await?;
        let rows = self.client.query(&stmt, &[&rental_id]).await?;
        rental_from_row(
            rows.first()
                .ok_or(BookstoreRepositoryError::RentalNotFound(rental_id))?,
        )
    }

    /// Distinguishes missing book from missing stock after a conditional stock update matched nothing
    /// Explains why the guarded stock update matched no row
    async fn stock_failure(
        &self,
        book_id: BookId,
        requested: i32,
        total_of: impl FnOnce(&Book) -> Result<f64, BookstoreRepositoryError>,
    ) -> BookstoreRepositoryError {
        let book = match self.query_book(book_id).await {
            Ok(book) => book,
            Err(err) => return err,
        };
        match total_of(&book) {
            Err(err) => err,
            Ok(_) => BookstoreRepositoryError::InsufficientStock {
                book_id,
                requested,
                available: book.quantity_in_stock,
            },
        }
    }
}

fn book_from_row(row: &Row) -> Result<Book, BookstoreRepositoryError> {
    Ok(Book {
        book_id: row.try_get(0)?,
        title: row.try_get(1)?,
        sub_title: row.try_get(2)?,
        author: row.try_get(3)?,
        category_id: row.try_get(4)?,
        category_name: row.try_get(5)?,
        price: row.try_get(6)?,
        rental_price_per_day: row.try_get(7)?,
        quantity_in_stock: row.try_get(8)?,
    })
}

fn customer_from_row(row: &Row) -> Result<Customer, BookstoreRepositoryError> {
    Ok(Customer {
        customer_id: row.try_get(0)?,
        name: row.try_get(1)?,
        phone: row.try_get(2)?,
        email: row.try_get(3)?,
        address: row.try_get(4)?,
    })
}

fn sale_from_row(row: &Row) -> Result<Sale, BookstoreRepositoryError> {
    Ok(Sale {
        sale_id: row.try_get(0)?,
        customer_id: row.try_get(1)?,
        customer_name: row.try_get(2)?,
        employee_id: row.try_get(3)?,
        employee_name: row.try_get(4)?,
        book_id: row.try_get(5)?,
        book_title: row.try_get(6)?,
        quantity: row.try_get(7)?,
        unit_price: row.try_get(8)?,
        total_price: row.try_get(9)?,
        sale_date: row.try_get(10)?,
    })
}

fn rental_from_row(row: &Row) -> Result<Rental, BookstoreRepositoryError> {
    let status: String = row.try_get(13)?;
    Ok(Rental {
        rental_id: row.try_get(0)?,
        customer_id: row.try_get(1)?,
        customer_name: row.try_get(2)?,
        employee_id: row.try_get(3)?,
        employee_name: row.try_get(4)?,
        book_id: row.try_get(5)?,
        book_title: row.try_get(6)?,
        days: row.try_get(7)?,
        quantity: row.try_get(8)?,
        total_cost: row.try_get(9)?,
        rental_date: row.try_get(10)?,
        expected_return_date: row.try_get(11)?,
        return_date: row.try_get(12)?,
        status: parse_status(&status)?,
    })
}

fn parse_status(status: &str) -> Result<RentalStatus, BookstoreRepositoryError> {
    match status {
        "Active" => Ok(RentalStatus::Active),
        "Returned" => Ok(RentalStatus::Returned),
        other => Err(BookstoreRepositoryError::Other(format!(
            "Unknown rental status {other}"
        ))),
    }
}

/// Name of the foreign key constraint that was violated, if that is what happened
fn violated_foreign_key(err: &tokio_postgres::Error) -> Option<&str> {
    err.as_db_error()
        .filter(|db_err| db_err.code() == &SqlState::FOREIGN_KEY_VIOLATION)
        .map(|db_err| db_err.constraint().unwrap_or_default())
}

/// Maps a foreign key violation raised while inserting a transaction to the missing reference
fn missing_reference(
    err: tokio_postgres::Error,
    customer_id: CustomerId,
    employee_id: i32,
) -> BookstoreRepositoryError {
    match violated_foreign_key(&err) {
        Some(constraint) if constraint.ends_with("customer_id_fkey") => {
            BookstoreRepositoryError::CustomerNotFound(customer_id)
        }
        Some(constraint) if constraint.ends_with("employee_id_fkey") => {
            BookstoreRepositoryError::EmployeeNotFound(employee_id)
        }
        _ => err.into(),
    }
}

#[async_trait::async_trait]
impl BookstoreRepository for PostgresBookstoreRepository {
    async fn list_books(&self) -> Result<Vec<Book>, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!("{SELECT_BOOKS} ORDER BY b.id"))
            .await?;
        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter().map(book_from_row).collect()
    }

    async fn get_book(&self, book_id: BookId) -> Result<Book, BookstoreRepositoryError> {
        self.query_book(book_id).await
    }

    async fn add_book(&self, book: NewBook) -> Result<Book, BookstoreRepositoryError> {
        validate_new_book(&book)?;
        let sub_title = blank_as_none(book.sub_title.clone());
        let stmt: Statement = self
            .client
            .prepare(
                "INSERT INTO books (title, sub_title, author, category_id, price, rental_price_per_day, quantity_in_stock)
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &book.title,
                    &sub_title,
                    &book.author,
                    &book.category_id,
                    &book.price,
                    &book.rental_price_per_day,
                    &book.quantity_in_stock,
                ],
            )
            .await
            .map_err(|err| match violated_foreign_key(&err) {
                Some(_) => BookstoreRepositoryError::CategoryNotFound(book.category_id),
                None => err.into(),
            })?;

        let book_id: BookId = rows
            .first()
            .ok_or_else(|| BookstoreRepositoryError::Other("Id not returned".to_string()))?
            .try_get(0)?;
        self.query_book(book_id).await
    }

    async fn update_book(
        &self,
        book_id: BookId,
        patch: BookPatch,
    ) -> Result<Book, BookstoreRepositoryError> {
        validate_book_patch(&patch)?;
        let stmt: Statement = self
            .client
            .prepare(
                "UPDATE books SET
                    title = COALESCE($2, title),
                    sub_title = CASE WHEN TRIM($3) = '' THEN NULL ELSE COALESCE($3, sub_title) END,
                    author = COALESCE($4, author),
                    category_id = COALESCE($5, category_id),
                    price = COALESCE($6, price),
                    rental_price_per_day = COALESCE($7, rental_price_per_day),
                    quantity_in_stock = COALESCE($8, quantity_in_stock)
                 WHERE id = $1 RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &book_id,
                    &patch.title,
                    &patch.sub_title,
                    &patch.author,
                    &patch.category_id,
                    &patch.price,
                    &patch.rental_price_per_day,
                    &patch.quantity_in_stock,
                ],
            )
            .await
            .map_err(|err| match (violated_foreign_key(&err), patch.category_id) {
                (Some(_), Some(category_id)) => {
                    BookstoreRepositoryError::CategoryNotFound(category_id)
                }
                _ => err.into(),
            })?;

        if rows.is_empty() {
            return Err(BookstoreRepositoryError::BookNotFound(book_id));
        }
        self.query_book(book_id).await
    }

    async fn delete_book(&self, book_id: BookId) -> Result<(), BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM books WHERE id = $1 RETURNING id")
            .await?;
        let rows = self
            .client
            .query(&stmt, &[&book_id])
            .await
            .map_err(|err| match violated_foreign_key(&err) {
                Some(_) => BookstoreRepositoryError::BookInUse(book_id),
                None => err.into(),
            })?;
        if rows.is_empty() {
            Err(BookstoreRepositoryError::BookNotFound(book_id))
        } else {
            Ok(())
        }
    }

    async fn list_categories(&self) -> Result<Vec<Category>, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT id, name FROM categories ORDER BY id")
            .await?;
        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter()
            .map(|row| {
                Ok(Category {
                    category_id: row.try_get(0)?,
                    category_name: row.try_get(1)?,
                })
            })
            .collect()
    }

    async fn add_category(
        &self,
        category: NewCategory,
    ) -> Result<Category, BookstoreRepositoryError> {
        validate_category_name(&category.category_name)?;
        let stmt: Statement = self
            .client
            .prepare("INSERT INTO categories (name) VALUES ($1) RETURNING id")
            .await?;
        let rows = self.client.query(&stmt, &[&category.category_name]).await?;
        let category_id: CategoryId = rows
            .first()
            .ok_or_else(|| BookstoreRepositoryError::Other("Id not returned".to_string()))?
            .try_get(0)?;
        Ok(Category {
            category_id,
            category_name: category.category_name,
        })
    }

    async fn update_category(
        &self,
        category_id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, BookstoreRepositoryError> {
        if let Some(name) = &patch.category_name {
            validate_category_name(name)?;
        }
        let stmt: Statement = self
            .client
            .prepare(
                "UPDATE categories SET name = COALESCE($2, name) WHERE id = $1 RETURNING id, name",
            )
            .await?;
        let rows = self
            .client
            .query(&stmt, &[&category_id, &patch.category_name])
            .await?;
        let row = rows
            .first()
            .ok_or(BookstoreRepositoryError::CategoryNotFound(category_id))?;
        Ok(Category {
            category_id: row.try_get(0)?,
            category_name: row.try_get(1)?,
        })
    }

    async fn delete_category(
        &self,
        category_id: CategoryId,
    ) -> Result<(), BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM categories WHERE id = $1 RETURNING id")
            .await?;
        let rows = self
            .client
            .query(&stmt, &[&category_id])
            .await
            .map_err(|err| match violated_foreign_key(&err) {
                Some(_) => BookstoreRepositoryError::CategoryInUse(category_id),
                None => err.into(),
            })?;
        if rows.is_empty() {
            Err(BookstoreRepositoryError::CategoryNotFound(category_id))
        } else {
            Ok(())
        }
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT id, name, phone, email, address FROM customers ORDER BY id")
            .await?;
        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter().map(customer_from_row).collect()
    }

    async fn add_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<Customer, BookstoreRepositoryError> {
        validate_customer_name(&customer.name)?;
        let phone = blank_as_none(customer.phone);
        let email = blank_as_none(customer.email);
        let address = blank_as_none(customer.address);
        let stmt: Statement = self
            .client
            .prepare(
                "INSERT INTO customers (name, phone, email, address) VALUES ($1, $2, $3, $4)
                 RETURNING id, name, phone, email, address",
            )
            .await?;
        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &customer.name,
                    &phone,
                    &email,
                    &address,
                ],
            )
            .await?;
        customer_from_row(
            rows.first()
                .ok_or_else(|| BookstoreRepositoryError::Other("Id not returned".to_string()))?,
        )
    }

    async fn update_customer(
        &self,
        customer_id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Customer, BookstoreRepositoryError> {
        if let Some(name) = &patch.name {
            validate_customer_name(name)?;
        }
        let stmt: Statement = self
            .client
            .prepare(
                "UPDATE customers SET
                    name = COALESCE($2, name),
                    phone = CASE WHEN TRIM($3) = '' THEN NULL ELSE COALESCE($3, phone) END,
                    email = CASE WHEN TRIM($4) = '' THEN NULL ELSE COALESCE($4, email) END,
                    address = CASE WHEN TRIM($5) = '' THEN NULL ELSE COALESCE($5, address) END
                 WHERE id = $1 RETURNING id, name, phone, email, address",
            )
            .await?;
        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &customer_id,
                    &patch.name,
                    &patch.phone,
                    &patch.email,
                    &patch.address,
                ],
            )
            .await?;
        customer_from_row(
            rows.first()
                .ok_or(BookstoreRepositoryError::CustomerNotFound(customer_id))?,
        )
    }

    async fn delete_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<(), BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM customers WHERE id = $1 RETURNING id")
            .await?;
        let rows = self
            .client
            .query(&stmt, &[&customer_id])
            .await
            .map_err(|err| match violated_foreign_key(&err) {
                Some(_) => BookstoreRepositoryError::CustomerInUse(customer_id),
                None => err.into(),
            })?;
        if rows.is_empty() {
            Err(BookstoreRepositoryError::CustomerNotFound(customer_id))
        } else {
            Ok(())
        }
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT id, name FROM employees ORDER BY id")
            .await?;
        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter()
            .map(|row| {
                Ok(Employee {
                    employee_id: row.try_get(0)?,
                    name: row.try_get(1)?,
                })
            })
            .collect()
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!("{SELECT_SALES} ORDER BY s.id DESC"))
            .await?;
        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter().map(sale_from_row).collect()
    }

    async fn create_sale(&self, sale: NewSale) -> Result<Sale, BookstoreRepositoryError> {
        validate_new_sale(&sale)?;
        // Stock update and insert are one statement so they commit or fail together
        let stmt: Statement = self
            .client
            .prepare(
                "WITH book AS (
                    UPDATE books SET quantity_in_stock = quantity_in_stock - $4
                    WHERE id = $3 AND quantity_in_stock >= $4 AND price * $4 <= $6
                    RETURNING id, price
                 )
                 INSERT INTO sales (customer_id, employee_id, book_id, quantity, unit_price, total_price, sale_date)
                 SELECT $1, $2, book.id, $4, book.price, ROUND((book.price * $4)::NUMERIC, 2)::DOUBLE PRECISION, $5
                 FROM book
                 RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &sale.customer_id,
                    &sale.employee_id,
                    &sale.book_id,
                    &sale.quantity,
                    &Utc::now(),
                    &pricing::MAX_TRANSACTION_TOTAL,
                ],
            )
            .await
            .map_err(|err| missing_reference(err, sale.customer_id, sale.employee_id))?;

        match rows.first() {
            Some(row) => self.query_sale(row.try_get(0)?).await,
            None => Err(self
                .stock_failure(sale.book_id, sale.quantity, |book| {
                    checked_sale_total(book.price, sale.quantity)
                })
                .await),
        }
    }

    async fn list_rentals(&self) -> Result<Vec<Rental>, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(&format!("{SELECT_RENTALS} ORDER BY r.id DESC"))
            .await?;
        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter().map(rental_from_row).collect()
    }

    async fn create_rental(&self, rental: NewRental) -> Result<Rental, BookstoreRepositoryError> {
        validate_new_rental(&rental)?;
        let rental_date = Utc::now();
        let expected_return_date = checked_return_date(rental_date, rental.days)?;
        let stmt: Statement = self
            .client
            .prepare(
                "WITH book AS (
                    UPDATE books SET quantity_in_stock = quantity_in_stock - $5
                    WHERE id = $3 AND quantity_in_stock >= $5
                      AND rental_price_per_day * $4 * $5 <= $8
                    RETURNING id, rental_price_per_day
                 )
                 INSERT INTO rentals (customer_id, employee_id, book_id, days, quantity, total_cost,
                                      rental_date, expected_return_date, status)
                 SELECT $1, $2, book.id, $4, $5,
                        ROUND((book.rental_price_per_day * $4 * $5)::NUMERIC, 2)::DOUBLE PRECISION,
                        $6, $7, 'Active'
                 FROM book
                 RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &rental.customer_id,
                    &rental.employee_id,
                    &rental.book_id,
                    &rental.days,
                    &rental.quantity,
                    &rental_date,
                    &expected_return_date,
                    &pricing::MAX_TRANSACTION_TOTAL,
                ],
            )
            .await
            .map_err(|err| missing_reference(err, rental.customer_id, rental.employee_id))?;

        match rows.first() {
            Some(row) => self.query_rental(row.try_get(0)?).await,
            None => Err(self
                .stock_failure(rental.book_id, rental.quantity, |book| {
                    checked_rental_cost(book.rental_price_per_day, rental.days, rental.quantity)
                })
                .await),
        }
    }

    async fn return_rental(&self, rental_id: RentalId) -> Result<Rental, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "WITH rental AS (
                    UPDATE rentals SET status = 'Returned', return_date = $2
                    WHERE id = $1 AND status = 'Active'
                    RETURNING book_id, quantity
                 )
                 UPDATE books SET quantity_in_stock = books.quantity_in_stock + rental.quantity
                 FROM rental WHERE books.id = rental.book_id
                 RETURNING books.id",
            )
            .await?;

        let rows = self.client.query(&stmt, &[&rental_id, &Utc::now()]).await?;
        if rows.is_empty() {
            // Either there is no such rental or it was returned before
            let existing = self.query_rental(rental_id).await?;
            tracing::warn!(rental_id, status = existing.status.as_str(), "Rental not active");
            return Err(BookstoreRepositoryError::RentalAlreadyReturned(rental_id));
        }
        self.query_rental(rental_id).await
    }

    async fn sales_summary(&self) -> Result<Vec<SalesSummary>, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "SELECT (sale_date AT TIME ZONE 'UTC')::DATE AS day, SUM(total_price), COUNT(*)
                 FROM sales GROUP BY day ORDER BY day DESC",
            )
            .await?;
        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter()
            .map(|row| {
                Ok(SalesSummary {
                    sale_day: row.try_get(0)?,
                    total_sales: row.try_get(1)?,
                    number_of_sales: row.try_get(2)?,
                })
            })
            .collect()
    }

    async fn recent_transactions(
        &self,
        limit: usize,
    ) -> Result<Vec<RecentTransaction>, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "SELECT id, 'Sale' AS kind, sale_date AS date, total_price AS amount FROM sales
                 UNION ALL
                 SELECT id, 'Rental' AS kind, rental_date AS date, total_cost AS amount FROM rentals
                 ORDER BY date DESC, id DESC
                 LIMIT $1",
            )
            .await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self.client.query(&stmt, &[&limit]).await?;
        rows.iter()
            .map(|row| {
                let kind: String = row.try_get(1)?;
                Ok(RecentTransaction {
                    id: row.try_get(0)?,
                    transaction_type: if kind == "Sale" {
                        TransactionType::Sale
                    } else {
                        TransactionType::Rental
                    },
                    date: row.try_get(2)?,
                    amount: row.try_get(3)?,
                })
            })
            .collect()
    }

    async fn initialize(&self) -> Result<Vec<Employee>, BookstoreRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "INSERT INTO employees (name)
                 SELECT name FROM UNNEST($1::TEXT[]) AS name
                 WHERE NOT EXISTS (SELECT 1 FROM employees)",
            )
            .await?;
        let names: Vec<&str> = DEFAULT_EMPLOYEES.to_vec();
        self.client.execute(&stmt, &[&names]).await?;
        self.list_employees().await
    }
}
