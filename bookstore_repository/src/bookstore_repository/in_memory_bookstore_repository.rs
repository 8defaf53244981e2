use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::api::{
    Book, BookId, BookPatch, Category, CategoryId, CategoryPatch, Customer, CustomerId,
    CustomerPatch, Employee, EmployeeId, NewBook, NewCategory, NewCustomer, NewRental, NewSale,
    RecentTransaction, Rental, RentalId, RentalStatus, Sale, SaleId, SalesSummary,
    TransactionType,
};
use crate::bookstore_repository::{
    blank_as_none, checked_rental_cost, checked_return_date, checked_sale_total, validate_book_patch,
    validate_category_name, validate_customer_name, validate_new_book, validate_new_rental,
    validate_new_sale, BookstoreRepository, BookstoreRepositoryError, DEFAULT_EMPLOYEES,
};

#[derive(Debug, Clone)]
struct SaleRecord {
    customer_id: CustomerId,
    employee_id: EmployeeId,
    book_id: BookId,
    quantity: i32,
    unit_price: f64,
    total_price: f64,
    sale_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct RentalRecord {
    customer_id: CustomerId,
    employee_id: EmployeeId,
    book_id: BookId,
    days: i32,
    quantity: i32,
    total_cost: f64,
    rental_date: DateTime<Utc>,
    expected_return_date: DateTime<Utc>,
    return_date: Option<DateTime<Utc>>,
    status: RentalStatus,
}

#[derive(Default)]
struct Tables {
    categories: BTreeMap<CategoryId, NewCategory>,
    books: BTreeMap<BookId, NewBook>,
    customers: BTreeMap<CustomerId, NewCustomer>,
    employees: BTreeMap<EmployeeId, String>,
    sales: BTreeMap<SaleId, SaleRecord>,
    rentals: BTreeMap<RentalId, RentalRecord>,
}

impl Tables {
    fn category_name(&self, category_id: CategoryId) -> Result<&str, BookstoreRepositoryError> {
        self.categories
            .get(&category_id)
            .map(|category| category.category_name.as_str())
            .ok_or(BookstoreRepositoryError::CategoryNotFound(category_id))
    }

    fn customer_name(&self, customer_id: CustomerId) -> Result<&str, BookstoreRepositoryError> {
        self.customers
            .get(&customer_id)
            .map(|customer| customer.name.as_str())
            .ok_or(BookstoreRepositoryError::CustomerNotFound(customer_id))
    }

    fn employee_name(&self, employee_id: EmployeeId) -> Result<&str, BookstoreRepositoryError> {
        self.employees
            .get(&employee_id)
            .map(String::as_str)
            .ok_or(BookstoreRepositoryError::EmployeeNotFound(employee_id))
    }

    fn book_title(&self, book_id: BookId) -> Result<&str, BookstoreRepositoryError> {
        self.books
            .get(&book_id)
            .map(|book| book.title.as_str())
            .ok_or(BookstoreRepositoryError::BookNotFound(book_id))
    }

    fn book_view(&self, book_id: BookId, book: &NewBook) -> Result<Book, BookstoreRepositoryError> {
        Ok(Book {
            book_id,
            title: book.title.clone(),
            sub_title: book.sub_title.clone(),
            author: book.author.clone(),
            category_id: book.category_id,
            category_name: self.category_name(book.category_id)?.to_string(),
            price: book.price,
            rental_price_per_day: book.rental_price_per_day,
            quantity_in_stock: book.quantity_in_stock,
        })
    }

    fn sale_view(&self, sale_id: SaleId, sale: &SaleRecord) -> Result<Sale, BookstoreRepositoryError> {
        Ok(Sale {
            sale_id,
            customer_id: sale.customer_id,
            customer_name: self.customer_name(sale.customer_id)?.to_string(),
            employee_id: sale.employee_id,
            employee_name: self.employee_name(sale.employee_id)?.to_string(),
            book_id: sale.book_id,
            book_title: self.book_title(sale.book_id)?.to_string(),
            quantity: sale.quantity,
            unit_price: sale.unit_price,
            total_price: sale.total_price,
            sale_date: sale.sale_date,
        })
    }

    fn rental_view(
        &self,
        rental_id: RentalId,
        rental: &RentalRecord,
    ) -> Result<Rental, BookstoreRepositoryError> {
        Ok(Rental {
            rental_id,
            customer_id: rental.customer_id,
            customer_name: self.customer_name(rental.customer_id)?.to_string(),
            employee_id: rental.employee_id,
            employee_name: self.employee_name(rental.employee_id)?.to_string(),
            book_id: rental.book_id,
            book_title: self.book_title(rental.book_id)?.to_string(),
            days: rental.days,
            quantity: rental.quantity,
            total_cost: rental.total_cost,
            rental_date: rental.rental_date,
            expected_return_date: rental.expected_return_date,
            return_date: rental.return_date,
            status: rental.status,
        })
    }

    fn is_book_referenced(&self, book_id: BookId) -> bool {
        self.sales.values().any(|sale| sale.book_id == book_id)
            || self.rentals.values().any(|rental| rental.book_id == book_id)
    }

    fn is_customer_referenced(&self, customer_id: CustomerId) -> bool {
        self.sales.values().any(|sale| sale.customer_id == customer_id)
            || self
                .rentals
                .values()
                .any(|rental| rental.customer_id == customer_id)
    }

    fn book(&self, book_id: BookId) -> Result<&NewBook, BookstoreRepositoryError> {
        self.books
            .get(&book_id)
            .ok_or(BookstoreRepositoryError::BookNotFound(book_id))
    }

    /// Takes `quantity` copies of the book out of stock, nothing changes on error
    fn take_from_stock(
        &mut self,
        book_id: BookId,
        quantity: i32,
    ) -> Result<(), BookstoreRepositoryError> {
        let book = self
            .books
            .get_mut(&book_id)
            .ok_or(BookstoreRepositoryError::BookNotFound(book_id))?;
        if book.quantity_in_stock < quantity {
            return Err(BookstoreRepositoryError::InsufficientStock {
                book_id,
                requested: quantity,
                available: book.quantity_in_stock,
            });
        }
        book.quantity_in_stock -= quantity;
        Ok(())
    }
}

/// Applies a JSON merge patch of `patch` on top of `record`
fn merge_patch<T: Serialize + DeserializeOwned, P: Serialize>(
    record: &T,
    patch: &P,
) -> Result<T, BookstoreRepositoryError> {
    let mut merged = json!(record);
    json_patch::merge(&mut merged, &json!(patch));
    Ok(serde_json::from_value(merged)?)
}

fn without_blank_contacts(customer: NewCustomer) -> NewCustomer {
    NewCustomer {
        phone: blank_as_none(customer.phone),
        email: blank_as_none(customer.email),
        address: blank_as_none(customer.address),
        ..customer
    }
}

pub struct InMemoryBookstoreRepository {
    sequence_generator: AtomicI32,
    tables: parking_lot::RwLock<Tables>,
}

impl Default for InMemoryBookstoreRepository {
    fn default() -> Self {
        Self {
            sequence_generator: AtomicI32::new(1),
            tables: Default::default(),
        }
    }
}

impl InMemoryBookstoreRepository {
    fn next_id(&self) -> i32 {
        self.sequence_generator.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl BookstoreRepository for InMemoryBookstoreRepository {
    async fn list_books(&self) -> Result<Vec<Book>, BookstoreRepositoryError> {
        let tables = self.tables.read();
        tables
            .books
            .iter()
            .map(|(&book_id, book)| tables.book_view(book_id, book))
            .collect()
    }

    async fn get_book(&self, book_id: BookId) -> Result<Book, BookstoreRepositoryError> {
        let tables = self.tables.read();
        let book = tables
            .books
            .get(&book_id)
            .ok_or(BookstoreRepositoryError::BookNotFound(book_id))?;
        tables.book_view(book_id, book)
    }

    async fn add_book(&self, mut book: NewBook) -> Result<Book, BookstoreRepositoryError> {
        validate_new_book(&book)?;
        book.sub_title = blank_as_none(book.sub_title);
        let mut tables = self.tables.write();
        tables.category_name(book.category_id)?;
        let book_id = self.next_id();
        let view = tables.book_view(book_id, &book)?;
        tables.books.insert(book_id, book);
        Ok(view)
    }

    async fn update_book(
        &self,
        book_id: BookId,
        patch: BookPatch,
    ) -> Result<Book, BookstoreRepositoryError> {
        validate_book_patch(&patch)?;
        let mut tables = self.tables.write();
        if let Some(category_id) = patch.category_id {
            tables.category_name(category_id)?;
        }
        let book = tables
            .books
            .get(&book_id)
            .ok_or(BookstoreRepositoryError::BookNotFound(book_id))?;
        let mut patched: NewBook = merge_patch(book, &patch)?;
        patched.sub_title = blank_as_none(patched.sub_title);
        let view = tables.book_view(book_id, &patched)?;
        tables.books.insert(book_id, patched);
        Ok(view)
    }

    async fn delete_book(&self, book_id: BookId) -> Result<(), BookstoreRepositoryError> {
        let mut tables = self.tables.write();
        if tables.is_book_referenced(book_id) {
            return Err(BookstoreRepositoryError::BookInUse(book_id));
        }
        tables
            .books
            .remove(&book_id)
            .map(|_| ())
            .ok_or(BookstoreRepositoryError::BookNotFound(book_id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, BookstoreRepositoryError> {
        Ok(self
            .tables
            .read()
            .categories
            .iter()
            .map(|(&category_id, category)| Category {
                category_id,
                category_name: category.category_name.clone(),
            })
            .collect())
    }

    async fn add_category(
        &self,
        category: NewCategory,
    ) -> Result<Category, BookstoreRepositoryError> {
        validate_category_name(&category.category_name)?;
        let category_id = self.next_id();
        let view = Category {
            category_id,
            category_name: category.category_name.clone(),
        };
        self.tables.write().categories.insert(category_id, category);
        Ok(view)
    }

    async fn update_category(
        &self,
        category_id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, BookstoreRepositoryError> {
        if let Some(name) = &patch.category_name {
            validate_category_name(name)?;
        }
        let mut tables = self.tables.write();
        let category = tables
            .categories
            .get_mut(&category_id)
            .ok_or(BookstoreRepositoryError::CategoryNotFound(category_id))?;
        *category = merge_patch(category, &patch)?;
        Ok(Category {
            category_id,
            category_name: category.category_name.clone(),
        })
    }

    async fn delete_category(
        &self,
        category_id: CategoryId,
    ) -> Result<(), BookstoreRepositoryError> {
        let mut tables = self.tables.write();
        if tables
            .books
            .values()
            .any(|book| book.category_id == category_id)
        {
            return Err(BookstoreRepositoryError::CategoryInUse(category_id));
        }
        tables
            .categories
            .remove(&category_id)
            .map(|_| ())
            .ok_or(BookstoreRepositoryError::CategoryNotFound(category_id))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, BookstoreRepositoryError> {
        Ok(self
            .tables
            .read()
            .customers
            .iter()
            .map(|(&customer_id, customer)| customer_view(customer_id, customer))
            .collect())
    }

    async fn add_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<Customer, BookstoreRepositoryError> {
        validate_customer_name(&customer.name)?;
        let customer = without_blank_contacts(customer);
        let customer_id = self.next_id();
        let view = customer_view(customer_id, &customer);
        self.tables.write().customers.insert(customer_id, customer);
        Ok(view)
    }

    async fn update_customer(
        &self,
        customer_id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Customer, BookstoreRepositoryError> {
        if let Some(name) = &patch.name {
            validate_customer_name(name)?;
        }
        let mut tables = self.tables.write();
        let customer = tables
            .customers
            .get_mut(&customer_id)
            .ok_or(BookstoreRepositoryError::CustomerNotFound(customer_id))?;
        *customer = without_blank_contacts(merge_patch(customer, &patch)?);
        Ok(customer_view(customer_id, customer))
    }

    async fn delete_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<(), BookstoreRepositoryError> {
        let mut tables = self.tables.write();
        if tables.is_customer_referenced(customer_id) {
            return Err(BookstoreRepositoryError::CustomerInUse(customer_id));
        }
        tables
            .customers
            .remove(&customer_id)
            .map(|_| ())
            .ok_or(BookstoreRepositoryError::CustomerNotFound(customer_id))
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, BookstoreRepositoryError> {
        Ok(self
            .tables
            .read()
            .employees
            .iter()
            .map(|(&employee_id, name)| Employee {
                employee_id,
                name: name.clone(),
            })
            .collect())
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, BookstoreRepositoryError> {
        let tables = self.tables.read();
        tables
            .sales
            .iter()
            .rev()
            .map(|(&sale_id, sale)| tables.sale_view(sale_id, sale))
            .collect()
    }

    async fn create_sale(&self, sale: NewSale) -> Result<Sale, BookstoreRepositoryError> {
        validate_new_sale(&sale)?;
        let mut tables = self.tables.write();
        tables.customer_name(sale.customer_id)?;
        tables.employee_name(sale.employee_id)?;
        let unit_price = tables.book(sale.book_id)?.price;
        let total_price = checked_sale_total(unit_price, sale.quantity)?;
        tables.take_from_stock(sale.book_id, sale.quantity)?;

        let record = SaleRecord {
            customer_id: sale.customer_id,
            employee_id: sale.employee_id,
            book_id: sale.book_id,
            quantity: sale.quantity,
            unit_price,
            total_price,
            sale_date: Utc::now(),
        };
        let sale_id = self.next_id();
        let view = tables.sale_view(sale_id, &record)?;
        tables.sales.insert(sale_id, record);
        Ok(view)
    }

    async fn list_rentals(&self) -> Result<Vec<Rental>, BookstoreRepositoryError> {
        let tables = self.tables.read();
        tables
            .rentals
            .iter()
            .rev()
            .map(|(&rental_id, rental)| tables.rental_view(rental_id, rental))
            .collect()
    }

    async fn create_rental(&self, rental: NewRental) -> Result<Rental, BookstoreRepositoryError> {
        validate_new_rental(&rental)?;
        let mut tables = self.tables.write();
        tables.customer_name(rental.customer_id)?;
        tables.employee_name(rental.employee_id)?;
        let daily_rate = tables.book(rental.book_id)?.rental_price_per_day;
        let total_cost = checked_rental_cost(daily_rate, rental.days, rental.quantity)?;
        let rental_date = Utc::now();
        let expected_return_date = checked_return_date(rental_date, rental.days)?;
        tables.take_from_stock(rental.book_id, rental.quantity)?;

        let record = RentalRecord {
            customer_id: rental.customer_id,
            employee_id: rental.employee_id,
            book_id: rental.book_id,
            days: rental.days,
            quantity: rental.quantity,
            total_cost,
            rental_date,
            expected_return_date,
            return_date: None,
            status: RentalStatus::Active,
        };
        let rental_id = self.next_id();
        let view = tables.rental_view(rental_id, &record)?;
        tables.rentals.insert(rental_id, record);
        Ok(view)
    }

    async fn return_rental(&self, rental_id: RentalId) -> Result<Rental, BookstoreRepositoryError> {
        let mut tables = self.tables.write();
        let rental = tables
            .rentals
            .get_mut(&rental_id)
            .ok_or(BookstoreRepositoryError::RentalNotFound(rental_id))?;
        if rental.status == RentalStatus::Returned {
            return Err(BookstoreRepositoryError::RentalAlreadyReturned(rental_id));
        }
        rental.status = RentalStatus::Returned;
        rental.return_date = Some(Utc::now());
        let record = rental.clone();

        if let Some(book) = tables.books.get_mut(&record.book_id) {
            book.quantity_in_stock += record.quantity;
        }
        tables.rental_view(rental_id, &record)
    }

    async fn sales_summary(&self) -> Result<Vec<SalesSummary>, BookstoreRepositoryError> {
        let mut per_day: BTreeMap<NaiveDate, (f64, i64)> = BTreeMap::new();
        for sale in self.tables.read().sales.values() {
            let entry = per_day.entry(sale.sale_date.date_naive()).or_default();
            entry.0 += sale.total_price;
            entry.1 += 1;
        }
        Ok(per_day
            .into_iter()
            .rev()
            .map(|(sale_day, (total_sales, number_of_sales))| SalesSummary {
                sale_day,
                total_sales,
                number_of_sales,
            })
            .collect())
    }

    async fn recent_transactions(
        &self,
        limit: usize,
    ) -> Result<Vec<RecentTransaction>, BookstoreRepositoryError> {
        let tables = self.tables.read();
        let sales = tables.sales.iter().map(|(&id, sale)| RecentTransaction {
            id,
            transaction_type: TransactionType::Sale,
            date: sale.sale_date,
            amount: sale.total_price,
        });
        let rentals = tables.rentals.iter().map(|(&id, rental)| RecentTransaction {
            id,
            transaction_type: TransactionType::Rental,
            date: rental.rental_date,
            amount: rental.total_cost,
        });
        let mut transactions: Vec<RecentTransaction> = sales.chain(rentals).collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        transactions.truncate(limit);
        Ok(transactions)
    }

    async fn initialize(&self) -> Result<Vec<Employee>, BookstoreRepositoryError> {
        {
            let mut tables = self.tables.write();
            if tables.employees.is_empty() {
                for name in DEFAULT_EMPLOYEES {
                    let employee_id = self.next_id();
                    tables.employees.insert(employee_id, name.to_string());
                }
            }
        }
        self.list_employees().await
    }
}

fn customer_view(customer_id: CustomerId, customer: &NewCustomer) -> Customer {
    Customer {
        customer_id,
        name: customer.name.clone(),
        phone: customer.phone.clone(),
        email: customer.email.clone(),
        address: customer.address.clone(),
    }
}

#[cfg(test)]
mod in_memory_bookstore_repository_tests {
    use super::*;
    use crate::pricing;

    fn novel(category_id: CategoryId, price: f64, quantity_in_stock: i32) -> NewBook {
        NewBook {
            title: "The Cairo Trilogy".to_string(),
            sub_title: Some("Palace Walk".to_string()),
            author: "Naguib Mahfouz".to_string(),
            category_id,
            price,
            rental_price_per_day: 5.0,
            quantity_in_stock,
        }
    }

    fn customer() -> NewCustomer {
        NewCustomer {
            name: "Sara Ali".to_string(),
            phone: Some("0100000000".to_string()),
            email: None,
            address: None,
        }
    }

    #[tokio::test]
    /// Covers books and categories in one go
    /// 1. Adding a book to a missing category fails
    /// 2. Added book is listed with its category name
    /// 3. Patch changes only the given fields
    /// 4. Category referenced by a book cannot be deleted
    /// 5. After the book is gone the category can be deleted
    async fn test_book_and_category_management() {
        let repo = InMemoryBookstoreRepository::default();
        assert_eq!(repo.list_books().await.unwrap(), vec![]);

        let missing = repo.add_book(novel(999, 50.0, 3)).await;
        assert!(matches!(
            missing,
            Err(BookstoreRepositoryError::CategoryNotFound(999))
        ));

        let category = repo
            .add_category(NewCategory {
                category_name: "Novels".to_string(),
            })
            .await
            .expect("Failed to add category");
        let book = repo
            .add_book(novel(category.category_id, 50.0, 3))
            .await
            .expect("Failed to add book");
        assert_eq!(book.category_name, "Novels");
        assert_eq!(repo.list_books().await.unwrap(), vec![book.clone()]);

        let patched = repo
            .update_book(
                book.book_id,
                BookPatch {
                    price: Some(65.5),
                    ..BookPatch::default()
                },
            )
            .await
            .expect("Failed to patch book");
        assert_eq!(
            patched,
            Book {
                price: 65.5,
                ..book.clone()
            }
        );

        let in_use = repo.delete_category(category.category_id).await;
        assert!(matches!(
            in_use,
            Err(BookstoreRepositoryError::CategoryInUse(..))
        ));

        repo.delete_book(book.book_id)
            .await
            .expect("Failed to delete book");
        assert!(matches!(
            repo.get_book(book.book_id).await,
            Err(BookstoreRepositoryError::BookNotFound(..))
        ));
        repo.delete_category(category.category_id)
            .await
            .expect("Failed to delete category");
        assert_eq!(repo.list_categories().await.unwrap(), vec![]);
    }

    #[tokio::test]
    /// Sale takes copies out of stock and fails without touching the stock when
    /// there is not enough copies or a reference is missing
    async fn test_sale_decrements_stock() {
        let repo = InMemoryBookstoreRepository::default();
        let employees = repo.initialize().await.unwrap();
        assert_eq!(employees.len(), DEFAULT_EMPLOYEES.len());
        let employee_id = employees[0].employee_id;

        let category = repo
            .add_category(NewCategory {
                category_name: "Novels".to_string(),
            })
            .await
            .unwrap();
        let book = repo.add_book(novel(category.category_id, 50.0, 3)).await.unwrap();
        let customer = repo.add_customer(customer()).await.unwrap();

        let sale = repo
            .create_sale(NewSale {
                customer_id: customer.customer_id,
                employee_id,
                book_id: book.book_id,
                quantity: 2,
            })
            .await
            .expect("Failed to create sale");
        assert_eq!(sale.unit_price, 50.0);
        assert_eq!(sale.total_price, 100.0);
        assert_eq!(sale.customer_name, "Sara Ali");
        assert_eq!(sale.employee_name, DEFAULT_EMPLOYEES[0]);
        assert_eq!(repo.get_book(book.book_id).await.unwrap().quantity_in_stock, 1);

        let not_enough = repo
            .create_sale(NewSale {
                customer_id: customer.customer_id,
                employee_id,
                book_id: book.book_id,
                quantity: 2,
            })
            .await;
        assert!(matches!(
            not_enough,
            Err(BookstoreRepositoryError::InsufficientStock {
                requested: 2,
                available: 1,
                ..
            })
        ));

        let unknown_customer = repo
            .create_sale(NewSale {
                customer_id: 4242,
                employee_id,
                book_id: book.book_id,
                quantity: 1,
            })
            .await;
        assert!(matches!(
            unknown_customer,
            Err(BookstoreRepositoryError::CustomerNotFound(4242))
        ));

        let zero_quantity = repo
            .create_sale(NewSale {
                customer_id: customer.customer_id,
                employee_id,
                book_id: book.book_id,
                quantity: 0,
            })
            .await;
        assert!(matches!(
            zero_quantity,
            Err(BookstoreRepositoryError::Invalid { .. })
        ));
        assert_eq!(repo.get_book(book.book_id).await.unwrap().quantity_in_stock, 1);
        assert_eq!(repo.list_sales().await.unwrap(), vec![sale]);

        assert!(matches!(
            repo.delete_book(book.book_id).await,
            Err(BookstoreRepositoryError::BookInUse(..))
        ));
        assert!(matches!(
            repo.delete_customer(customer.customer_id).await,
            Err(BookstoreRepositoryError::CustomerInUse(..))
        ));
    }

    #[tokio::test]
    /// Rental goes Active -> Returned exactly once and the copies come back to stock
    async fn test_rental_lifecycle() {
        let repo = InMemoryBookstoreRepository::default();
        let employee_id = repo.initialize().await.unwrap()[1].employee_id;
        let category = repo
            .add_category(NewCategory {
                category_name: "History".to_string(),
            })
            .await
            .unwrap();
        let book = repo.add_book(novel(category.category_id, 80.0, 2)).await.unwrap();
        let customer = repo.add_customer(customer()).await.unwrap();

        let rental = repo
            .create_rental(NewRental {
                customer_id: customer.customer_id,
                employee_id,
                book_id: book.book_id,
                days: 3,
                quantity: 2,
            })
            .await
            .expect("Failed to create rental");
        assert_eq!(rental.status, RentalStatus::Active);
        assert_eq!(rental.total_cost, 30.0);
        assert_eq!(
            Some(rental.expected_return_date),
            pricing::expected_return_date(rental.rental_date, 3)
        );
        assert_eq!(rental.return_date, None);
        assert_eq!(repo.get_book(book.book_id).await.unwrap().quantity_in_stock, 0);

        let returned = repo
            .return_rental(rental.rental_id)
            .await
            .expect("Failed to return rental");
        assert_eq!(returned.status, RentalStatus::Returned);
        assert!(returned.return_date.is_some());
        assert_eq!(repo.get_book(book.book_id).await.unwrap().quantity_in_stock, 2);

        assert!(matches!(
            repo.return_rental(rental.rental_id).await,
            Err(BookstoreRepositoryError::RentalAlreadyReturned(..))
        ));
        assert_eq!(repo.get_book(book.book_id).await.unwrap().quantity_in_stock, 2);
        assert!(matches!(
            repo.return_rental(9999).await,
            Err(BookstoreRepositoryError::RentalNotFound(9999))
        ));
    }

    #[tokio::test]
    /// Reports aggregate sales per day and merge sales with rentals newest first
    async fn test_reports() {
        let repo = InMemoryBookstoreRepository::default();
        let employee_id = repo.initialize().await.unwrap()[0].employee_id;
        let category = repo
            .add_category(NewCategory {
                category_name: "Poetry".to_string(),
            })
            .await
            .unwrap();
        let book = repo.add_book(novel(category.category_id, 20.0, 10)).await.unwrap();
        let customer = repo.add_customer(customer()).await.unwrap();

        for quantity in [1, 2] {
            repo.create_sale(NewSale {
                customer_id: customer.customer_id,
                employee_id,
                book_id: book.book_id,
                quantity,
            })
            .await
            .unwrap();
        }
        let rental = repo
            .create_rental(NewRental {
                customer_id: customer.customer_id,
                employee_id,
                book_id: book.book_id,
                days: 2,
                quantity: 1,
            })
            .await
            .unwrap();

        let summary = repo.sales_summary().await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total_sales, 60.0);
        assert_eq!(summary[0].number_of_sales, 2);

        let recent = repo.recent_transactions(10).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, rental.rental_id);
        assert_eq!(recent[0].transaction_type, TransactionType::Rental);
        assert_eq!(recent[0].amount, 10.0);

        assert_eq!(repo.recent_transactions(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let repo = InMemoryBookstoreRepository::default();
        let first = repo.initialize().await.unwrap();
        let second = repo.initialize().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_subtitle_in_patch_clears_it() {
        let repo = InMemoryBookstoreRepository::default();
        let category = repo
            .add_category(NewCategory {
                category_name: "Novels".to_string(),
            })
            .await
            .unwrap();
        let book = repo.add_book(novel(category.category_id, 50.0, 1)).await.unwrap();
        assert_eq!(book.sub_title.as_deref(), Some("Palace Walk"));

        let untouched = repo
            .update_book(book.book_id, BookPatch::default())
            .await
            .unwrap();
        assert_eq!(untouched.sub_title.as_deref(), Some("Palace Walk"));

        let cleared = repo
            .update_book(
                book.book_id,
                BookPatch {
                    sub_title: Some(String::new()),
                    ..BookPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.sub_title, None);
        assert_eq!(cleared.title, book.title);
    }

    #[tokio::test]
    async fn test_customer_patch_keeps_other_fields() {
        let repo = InMemoryBookstoreRepository::default();
        let added = repo.add_customer(customer()).await.unwrap();
        let patched = repo
            .update_customer(
                added.customer_id,
                CustomerPatch {
                    email: Some("sara@example.com".to_string()),
                    ..CustomerPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            patched,
            Customer {
                email: Some("sara@example.com".to_string()),
                ..added
            }
        );
        assert!(matches!(
            repo.update_customer(777, CustomerPatch::default()).await,
            Err(BookstoreRepositoryError::CustomerNotFound(777))
        ));
    }

    #[tokio::test]
    /// Refused transactions leave the stock and the lists untouched
    /// 1. Rental ending past the last representable date
    /// 2. Sale whose total would not be a finite amount
    /// 3. Book priced at infinity
    async fn test_out_of_range_transactions_keep_stock() {
        let repo = InMemoryBookstoreRepository::default();
        let employee_id = repo.initialize().await.unwrap()[0].employee_id;
        let category = repo
            .add_category(NewCategory {
                category_name: "History".to_string(),
            })
            .await
            .unwrap();
        let book = repo.add_book(novel(category.category_id, 1e308, 3)).await.unwrap();
        let customer = repo.add_customer(customer()).await.unwrap();

        let rental = repo
            .create_rental(NewRental {
                customer_id: customer.customer_id,
                employee_id,
                book_id: book.book_id,
                days: i32::MAX,
                quantity: 2,
            })
            .await;
        assert!(matches!(
            rental,
            Err(BookstoreRepositoryError::Invalid { field: "days", .. })
        ));

        let sale = repo
            .create_sale(NewSale {
                customer_id: customer.customer_id,
                employee_id,
                book_id: book.book_id,
                quantity: 10,
            })
            .await;
        assert!(matches!(
            sale,
            Err(BookstoreRepositoryError::Invalid { field: "quantity", .. })
        ));

        assert_eq!(repo.get_book(book.book_id).await.unwrap().quantity_in_stock, 3);
        assert_eq!(repo.list_rentals().await.unwrap(), vec![]);
        assert_eq!(repo.list_sales().await.unwrap(), vec![]);
        assert_eq!(repo.sales_summary().await.unwrap(), vec![]);

        let infinite = repo
            .add_book(novel(category.category_id, f64::INFINITY, 1))
            .await;
        assert!(matches!(
            infinite,
            Err(BookstoreRepositoryError::Invalid { field: "price", .. })
        ));
        let patched = repo
            .update_book(
                book.book_id,
                BookPatch {
                    rental_price_per_day: Some(f64::INFINITY),
                    ..BookPatch::default()
                },
            )
            .await;
        assert!(matches!(
            patched,
            Err(BookstoreRepositoryError::Invalid {
                field: "rentalPricePerDay",
                ..
            })
        ));
    }
}
