use anyhow::{bail, Context};
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;

use crate::api::{
    Book, BookId, BookPatch, Category, CategoryId, CategoryPatch, Customer, CustomerId,
    CustomerPatch, Employee, NewBook, NewCategory, NewCustomer, NewRental, NewSale,
    RecentTransaction, Rental, RentalId, Sale, SalesSummary,
};

/// Client of the bookstore REST api, every call is a single request under `{url}/api`
pub struct BookstoreApiClient {
    url: String,
    client: ClientWithMiddleware,
}

/// Parses the body of a successful response, or fails with the error message sent by the server
async fn parse_response<T: DeserializeOwned>(response: Response, action: &str) -> anyhow::Result<T> {
    if response.status().is_success() {
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response to {action}"))
    } else {
        let status = response.status();
        let error: String = response.json().await.unwrap_or_default();
        bail!("Failed to {} ({}) {}", action, status, error)
    }
}

async fn expect_success(response: Response, action: &str) -> anyhow::Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        let status = response.status();
        let error: String = response.json().await.unwrap_or_default();
        bail!("Failed to {} ({}) {}", action, status, error)
    }
}

impl BookstoreApiClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{}", self.url, path)
    }

    /// Calls GET /api/books endpoint
    pub async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        let response = self.client.get(self.endpoint("/books")).send().await?;
        parse_response(response, "list books").await
    }

    /// Calls GET /api/books/{book_id} endpoint
    /// Returns None if the book is not in the store
    pub async fn get_book(&self, book_id: BookId) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .get(self.endpoint(&format!("/books/{book_id}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            parse_response(response, "get book").await.map(Some)
        }
    }

    /// Calls POST /api/books endpoint, returns the stored book
    pub async fn add_book(&self, book: &NewBook) -> anyhow::Result<Book> {
        let response = self
            .client
            .post(self.endpoint("/books"))
            .json(book)
            .send()
            .await?;
        parse_response(response, "add book").await
    }

    /// Calls PATCH /api/books/{book_id} endpoint
    pub async fn update_book(&self, book_id: BookId, patch: &BookPatch) -> anyhow::Result<Book> {
        let response = self
            .client
            .patch(self.endpoint(&format!("/books/{book_id}")))
            .json(patch)
            .send()
            .await?;
        parse_response(response, "update book").await
    }

    /// Calls DELETE /api/books/{book_id} endpoint
    pub async fn delete_book(&self, book_id: BookId) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/books/{book_id}")))
            .send()
            .await?;
        expect_success(response, "delete book").await
    }

    /// Calls GET /api/categories endpoint
    pub async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        let response = self.client.get(self.endpoint("/categories")).send().await?;
        parse_response(response, "list categories").await
    }

    /// Calls POST /api/categories endpoint
    pub async fn add_category(&self, category: &NewCategory) -> anyhow::Result<Category> {
        let response = self
            .client
            .post(self.endpoint("/categories"))
            .json(category)
            .send()
            .await?;
        parse_response(response, "add category").await
    }

    /// Calls PATCH /api/categories/{category_id} endpoint
    pub async fn update_category(
        &self,
        category_id: CategoryId,
        patch: &CategoryPatch,
    ) -> anyhow::Result<Category> {
        let response = self
            .client
            .patch(self.endpoint(&format!("/categories/{category_id}")))
            .json(patch)
            .send()
            .await?;
        parse_response(response, "update category").await
    }

    /// Calls DELETE /api/categories/{category_id} endpoint
    pub async fn delete_category(&self, category_id: CategoryId) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/categories/{category_id}")))
            .send()
            .await?;
        expect_success(response, "delete category").await
    }

    /// Calls GET /api/customers endpoint
    pub async fn list_customers(&self) -> anyhow::Result<Vec<Customer>> {
        let response = self.client.get(self.endpoint("/customers")).send().await?;
        parse_response(response, "list customers").await
    }

    /// Calls POST /api/customers endpoint
    pub async fn add_customer(&self, customer: &NewCustomer) -> anyhow::Result<Customer> {
        let response = self
            .client
            .post(self.endpoint("/customers"))
            .json(customer)
            .send()
            .await?;
        parse_response(response, "add customer").await
    }

    /// Calls PATCH /api/customers/{customer_id} endpoint
    pub async fn update_customer(
        &self,
        customer_id: CustomerId,
        patch: &CustomerPatch,
    ) -> anyhow::Result<Customer> {
        let response = self
            .client
            .patch(self.endpoint(&format!("/customers/{customer_id}")))
            .json(patch)
            .send()
            .await?;
        parse_response(response, "update customer").await
    }

    /// Calls DELETE /api/customers/{customer_id} endpoint
    pub async fn delete_customer(&self, customer_id: CustomerId) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/customers/{customer_id}")))
            .send()
            .await?;
        expect_success(response, "delete customer").await
    }

    /// Calls GET /api/employees endpoint
    pub async fn list_employees(&self) -> anyhow::Result<Vec<Employee>> {
        let response = self.client.get(self.endpoint("/employees")).send().await?;
        parse_response(response, "list employees").await
    }

    /// Calls GET /api/sales endpoint
    pub async fn list_sales(&self) -> anyhow::Result<Vec<Sale>> {
        let response = self.client.get(self.endpoint("/sales")).send().await?;
        parse_response(response, "list sales").await
    }

    /// Calls POST /api/sales endpoint
    /// Total price is computed by the server
    pub async fn create_sale(&self, sale: &NewSale) -> anyhow::Result<Sale> {
        let response = self
            .client
            .post(self.endpoint("/sales"))
            .json(sale)
            .send()
            .await?;
        parse_response(response, "create sale").await
    }

    /// Calls GET /api/rentals endpoint
    pub async fn list_rentals(&self) -> anyhow::Result<Vec<Rental>> {
        let response = self.client.get(self.endpoint("/rentals")).send().await?;
        parse_response(response, "list rentals").await
    }

    /// Calls POST /api/rentals endpoint
    pub async fn create_rental(&self, rental: &NewRental) -> anyhow::Result<Rental> {
        let response = self
            .client
            .post(self.endpoint("/rentals"))
            .json(rental)
            .send()
            .await?;
        parse_response(response, "create rental").await
    }

    /// Calls PUT /api/rentals/{rental_id}/return endpoint
    pub async fn return_rental(&self, rental_id: RentalId) -> anyhow::Result<Rental> {
        let response = self
            .client
            .put(self.endpoint(&format!("/rentals/{rental_id}/return")))
            .send()
            .await?;
        parse_response(response, "return rental").await
    }

    /// Calls GET /api/reports/sales-summary endpoint
    pub async fn sales_summary(&self) -> anyhow::Result<Vec<SalesSummary>> {
        let response = self
            .client
            .get(self.endpoint("/reports/sales-summary"))
            .send()
            .await?;
        parse_response(response, "get sales summary").await
    }

    /// Calls GET /api/reports/recent-transactions endpoint
    pub async fn recent_transactions(&self) -> anyhow::Result<Vec<RecentTransaction>> {
        let response = self
            .client
            .get(self.endpoint("/reports/recent-transactions"))
            .send()
            .await?;
        parse_response(response, "get recent transactions").await
    }

    /// Calls POST /api/database/initialize endpoint
    pub async fn initialize_database(&self) -> anyhow::Result<Vec<Employee>> {
        let response = self
            .client
            .post(self.endpoint("/database/initialize"))
            .send()
            .await?;
        parse_response(response, "initialize database").await
    }
}
