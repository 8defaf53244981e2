use bookstore_repository::api::{
    Book, BookId, BookPatch, Category, CategoryId, CategoryPatch, Customer, CustomerId,
    CustomerPatch, Employee, NewBook, NewCategory, NewCustomer, NewRental, NewSale,
    RecentTransaction, Rental, RentalId, Sale, SalesSummary,
};
use bookstore_repository::client::BookstoreApiClient;

/// Remote store as seen by the screens.
/// Mutations return nothing, screens always reload to see what the server stored
#[async_trait::async_trait]
pub trait BookstoreBackend: Send + Sync {
    async fn list_books(&self) -> anyhow::Result<Vec<Book>>;
    async fn add_book(&self, book: NewBook) -> anyhow::Result<()>;
    async fn update_book(&self, book_id: BookId, patch: BookPatch) -> anyhow::Result<()>;
    async fn delete_book(&self, book_id: BookId) -> anyhow::Result<()>;

    async fn list_categories(&self) -> anyhow::Result<Vec<Category>>;
    async fn add_category(&self, category: NewCategory) -> anyhow::Result<()>;
    async fn update_category(
        &self,
        category_id: CategoryId,
        patch: CategoryPatch,
    ) -> anyhow::Result<()>;
    async fn delete_category(&self, category_id: CategoryId) -> anyhow::Result<()>;

    async fn list_customers(&self) -> anyhow::Result<Vec<Customer>>;
    async fn add_customer(&self, customer: NewCustomer) -> anyhow::Result<()>;
    async fn update_customer(
        &self,
        customer_id: CustomerId,
        patch: CustomerPatch,
    ) -> anyhow::Result<()>;
    async fn delete_customer(&self, customer_id: CustomerId) -> anyhow::Result<()>;

    async fn list_employees(&self) -> anyhow::Result<Vec<Employee>>;

    async fn list_sales(&self) -> anyhow::Result<Vec<Sale>>;
    async fn create_sale(&self, sale: NewSale) -> anyhow::Result<()>;

    async fn list_rentals(&self) -> anyhow::Result<Vec<Rental>>;
    async fn create_rental(&self, rental: NewRental) -> anyhow::Result<()>;
    async fn return_rental(&self, rental_id: RentalId) -> anyhow::Result<()>;

    async fn sales_summary(&self) -> anyhow::Result<Vec<SalesSummary>>;
    async fn recent_transactions(&self) -> anyhow::Result<Vec<RecentTransaction>>;

    async fn initialize_database(&self) -> anyhow::Result<Vec<Employee>>;
}

#[async_trait::async_trait]
impl BookstoreBackend for BookstoreApiClient {
    async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        BookstoreApiClient::list_books(self).await
    }

    async fn add_book(&self, book: NewBook) -> anyhow::Result<()> {
        BookstoreApiClient::add_book(self, &book).await.map(|_| ())
    }

    async fn update_book(&self, book_id: BookId, patch: BookPatch) -> anyhow::Result<()> {
        BookstoreApiClient::update_book(self, book_id, &patch)
            .await
            .map(|_| ())
    }

    async fn delete_book(&self, book_id: BookId) -> anyhow::Result<()> {
        BookstoreApiClient::delete_book(self, book_id).await
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        BookstoreApiClient::list_categories(self).await
    }

    async fn add_category(&self, category: NewCategory) -> anyhow::Result<()> {
        BookstoreApiClient::add_category(self, &category)
            .await
            .map(|_| ())
    }

    async fn update_category(
        &self,
        category_id: CategoryId,
        patch: CategoryPatch,
    ) -> anyhow::Result<()> {
        BookstoreApiClient::update_category(self, category_id, &patch)
            .await
            .map(|_| ())
    }

    async fn delete_category(&self, category_id: CategoryId) -> anyhow::Result<()> {
        BookstoreApiClient::delete_category(self, category_id).await
    }

    async fn list_customers(&self) -> anyhow::Result<Vec<Customer>> {
        BookstoreApiClient::list_customers(self).await
    }

    async fn add_customer(&self, customer: NewCustomer) -> anyhow::Result<()> {
        BookstoreApiClient::add_customer(self, &customer)
            .await
            .map(|_| ())
    }

    async fn update_customer(
        &self,
        customer_id: CustomerId,
        patch: CustomerPatch,
    ) -> anyhow::Result<()> {
        BookstoreApiClient::update_customer(self, customer_id, &patch)
            .await
            .map(|_| ())
    }

    async fn delete_customer(&self, customer_id: CustomerId) -> anyhow::Result<()> {
        BookstoreApiClient::delete_customer(self, customer_id).await
    }

    async fn list_employees(&self) -> anyhow::Result<Vec<Employee>> {
        BookstoreApiClient::list_employees(self).await
    }

    async fn list_sales(&self) -> anyhow::Result<Vec<Sale>> {
        BookstoreApiClient::list_sales(self).await
    }

    async fn create_sale(&self, sale: NewSale) -> anyhow::Result<()> {
        BookstoreApiClient::create_sale(self, &sale).await.map(|_| ())
    }

    async fn list_rentals(&self) -> anyhow::Result<Vec<Rental>> {
        BookstoreApiClient::list_rentals(self).await
    }

    async fn create_rental(&self, rental: NewRental) -> anyhow::Result<()> {
        BookstoreApiClient::create_rental(self, &rental)
            .await
            .map(|_| ())
    }

    async fn return_rental(&self, rental_id: RentalId) -> anyhow::Result<()> {
        BookstoreApiClient::return_rental(self, rental_id)
            .await
            .map(|_| ())
    }

    async fn sales_summary(&self) -> anyhow::Result<Vec<SalesSummary>> {
        BookstoreApiClient::sales_summary(self).await
    }

    async fn recent_transactions(&self) -> anyhow::Result<Vec<RecentTransaction>> {
        BookstoreApiClient::recent_transactions(self).await
    }

    async fn initialize_database(&self) -> anyhow::Result<Vec<Employee>> {
        BookstoreApiClient::initialize_database(self).await
    }
}
