use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use bookstore_repository::api::{
    Book, BookId, BookPatch, Category, CategoryId, CategoryPatch, Customer, CustomerId,
    CustomerPatch, Employee, NewBook, NewCategory, NewCustomer, NewRental, NewSale,
    RecentTransaction, Rental, RentalId, Sale, SalesSummary,
};
use bookstore_repository::bookstore_repository::{
    BookstoreRepository, InMemoryBookstoreRepository, RECENT_TRANSACTIONS_LIMIT,
};

use crate::backend::BookstoreBackend;
use crate::interaction::Interaction;
use crate::ConsoleContext;

/// Backend over the in-memory repository that can be told to fail or to rewrite sale totals
#[derive(Default)]
pub(crate) struct RepositoryBackend {
    pub repository: InMemoryBookstoreRepository,
    fail_loads: AtomicBool,
    fail_mutations: AtomicBool,
    sale_total_override: Mutex<Option<f64>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl RepositoryBackend {
    /// Store with three employees, one category, books "Alef" (by X) and "Beta" (by Al),
    /// and customer "Sara"
    pub async fn seeded() -> Arc<Self> {
        let backend = Self::default();
        backend.repository.initialize().await.unwrap();
        let category = backend
            .repository
            .add_category(NewCategory {
                category_name: "Novels".to_string(),
            })
            .await
            .unwrap();
        for (title, author, price) in [("Alef", "X", 50.0), ("Beta", "Al", 20.0)] {
            backend
                .repository
                .add_book(NewBook {
                    title: title.to_string(),
                    sub_title: None,
                    author: author.to_string(),
                    category_id: category.category_id,
                    price,
                    rental_price_per_day: 5.0,
                    quantity_in_stock: 10,
                })
                .await
                .unwrap();
        }
        backend
            .repository
            .add_customer(NewCustomer {
                name: "Sara".to_string(),
                phone: None,
                email: Some("sara@mail.com".to_string()),
                address: None,
            })
            .await
            .unwrap();
        Arc::new(backend)
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Makes listed sales report `total` whatever the stored total is
    pub fn override_sale_totals(&self, total: f64) {
        *self.sale_total_override.lock() = Some(total);
    }

    pub fn was_called(&self, call: &str) -> bool {
        self.calls.lock().iter().any(|recorded| *recorded == call)
    }

    async fn book_by_title(&self, title: &str) -> Book {
        self.repository
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .find(|book| book.title == title)
            .unwrap()
    }

    pub async fn book_id(&self, title: &str) -> BookId {
        self.book_by_title(title).await.book_id
    }

    pub async fn stock_of(&self, title: &str) -> i32 {
        self.book_by_title(title).await.quantity_in_stock
    }

    fn load(&self, call: &'static str) -> anyhow::Result<()> {
        self.calls.lock().push(call);
        if self.fail_loads.load(Ordering::SeqCst) {
            anyhow::bail!("{call} failed: backend unavailable");
        }
        Ok(())
    }

    fn mutate(&self, call: &'static str) -> anyhow::Result<()> {
        self.calls.lock().push(call);
        if self.fail_mutations.load(Ordering::SeqCst) {
            anyhow::bail!("{call} failed: backend unavailable");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookstoreBackend for RepositoryBackend {
    async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        self.load("list_books")?;
        Ok(self.repository.list_books().await?)
    }

    async fn add_book(&self, book: NewBook) -> anyhow::Result<()> {
        self.mutate("add_book")?;
        self.repository.add_book(book).await?;
        Ok(())
    }

    async fn update_book(&self, book_id: BookId, patch: BookPatch) -> anyhow::Result<()> {
        self.mutate("update_book")?;
        self.repository.update_book(book_id, patch).await?;
        Ok(())
    }

    async fn delete_book(&self, book_id: BookId) -> anyhow::Result<()> {
        self.mutate("delete_book")?;
        Ok(self.repository.delete_book(book_id).await?)
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        self.load("list_categories")?;
        Ok(self.repository.list_categories().await?)
    }

    async fn add_category(&self, category: NewCategory) -> anyhow::Result<()> {
        self.mutate("add_category")?;
        self.repository.add_category(category).await?;
        Ok(())
    }

    async fn update_category(
        &self,
        category_id: CategoryId,
        patch: CategoryPatch,
    ) -> anyhow::Result<()> {
        self.mutate("update_category")?;
        self.repository.update_category(category_id, patch).await?;
        Ok(())
    }

    async fn delete_category(&self, category_id: CategoryId) -> anyhow::Result<()> {
        self.mutate("delete_category")?;
        Ok(self.repository.delete_category(category_id).await?)
    }

    async fn list_customers(&self) -> anyhow::Result<Vec<Customer>> {
        self.load("list_customers")?;
        Ok(self.repository.list_customers().await?)
    }

    async fn add_customer(&self, customer: NewCustomer) -> anyhow::Result<()> {
        self.mutate("add_customer")?;
        self.repository.add_customer(customer).await?;
        Ok(())
    }

    async fn update_customer(
        &self,
        customer_id: CustomerId,
        patch: CustomerPatch,
    ) -> anyhow::Result<()> {
        self.mutate("update_customer")?;
        self.repository.update_customer(customer_id, patch).await?;
        Ok(())
    }

    async fn delete_customer(&self, customer_id: CustomerId) -> anyhow::Result<()> {
        self.mutate("delete_customer")?;
        Ok(self.repository.delete_customer(customer_id).await?)
    }

    async fn list_employees(&self) -> anyhow::Result<Vec<Employee>> {
        self.load("list_employees")?;
        Ok(self.repository.list_employees().await?)
    }

    async fn list_sales(&self) -> anyhow::Result<Vec<Sale>> {
        self.load("list_sales")?;
        let mut sales = self.repository.list_sales().await?;
        if let Some(total) = *self.sale_total_override.lock() {
            for sale in sales.iter_mut() {
                sale.total_price = total;
            }
        }
        Ok(sales)
    }

    async fn create_sale(&self, sale: NewSale) -> anyhow::Result<()> {
        self.mutate("create_sale")?;
        self.repository.create_sale(sale).await?;
        Ok(())
    }

    async fn list_rentals(&self) -> anyhow::Result<Vec<Rental>> {
        self.load("list_rentals")?;
        Ok(self.repository.list_rentals().await?)
    }

    async fn create_rental(&self, rental: NewRental) -> anyhow::Result<()> {
        self.mutate("create_rental")?;
        self.repository.create_rental(rental).await?;
        Ok(())
    }

    async fn return_rental(&self, rental_id: RentalId) -> anyhow::Result<()> {
        self.mutate("return_rental")?;
        self.repository.return_rental(rental_id).await?;
        Ok(())
    }

    async fn sales_summary(&self) -> anyhow::Result<Vec<SalesSummary>> {
        self.load("sales_summary")?;
        Ok(self.repository.sales_summary().await?)
    }

    async fn recent_transactions(&self) -> anyhow::Result<Vec<RecentTransaction>> {
        self.load("recent_transactions")?;
        Ok(self
            .repository
            .recent_transactions(RECENT_TRANSACTIONS_LIMIT)
            .await?)
    }

    async fn initialize_database(&self) -> anyhow::Result<Vec<Employee>> {
        self.mutate("initialize_database")?;
        Ok(self.repository.initialize().await?)
    }
}

/// Scripted person at the console: answers every confirmation the same way,
/// types the queued inputs and remembers everything shown
#[derive(Default)]
pub(crate) struct RecordingInteraction {
    consent: AtomicBool,
    inputs: Mutex<VecDeque<String>>,
    pub confirmations: Mutex<Vec<String>>,
    pub notifications: Mutex<Vec<String>>,
    pub displayed: Mutex<Vec<String>>,
}

impl RecordingInteraction {
    pub fn consenting(consent: bool) -> Arc<Self> {
        let interaction = Self::default();
        interaction.consent.store(consent, Ordering::SeqCst);
        Arc::new(interaction)
    }

    pub fn type_inputs<'a>(&self, inputs: impl IntoIterator<Item = &'a str>) {
        self.inputs
            .lock()
            .extend(inputs.into_iter().map(str::to_string));
    }

    pub fn notified(&self, message: &str) -> bool {
        self.notifications.lock().iter().any(|n| n == message)
    }
}

impl Interaction for RecordingInteraction {
    fn confirm(&self, message: &str) -> bool {
        self.confirmations.lock().push(message.to_string());
        self.consent.load(Ordering::SeqCst)
    }

    fn notify(&self, message: &str) {
        self.notifications.lock().push(message.to_string());
    }

    fn display(&self, text: &str) {
        self.displayed.lock().push(text.to_string());
    }

    fn prompt(&self, _label: &str, current: &str) -> Option<String> {
        let input = self.inputs.lock().pop_front()?;
        if input.is_empty() {
            Some(current.to_string())
        } else {
            Some(input)
        }
    }
}

pub(crate) fn context(
    backend: &Arc<RepositoryBackend>,
    interaction: &Arc<RecordingInteraction>,
) -> ConsoleContext {
    ConsoleContext::new(backend.clone(), interaction.clone())
}
