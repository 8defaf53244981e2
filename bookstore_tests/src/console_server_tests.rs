use std::sync::Arc;

use actix_web::{App, HttpServer};
use paperclip::actix::{web, OpenApiExt};
use parking_lot::Mutex;
use reqwest::StatusCode;

use bookstore_console::interaction::Interaction;
use bookstore_console::messages;
use bookstore_console::screens::books::BooksScreen;
use bookstore_console::screens::categories::CategoriesScreen;
use bookstore_console::screens::customers::CustomersScreen;
use bookstore_console::screens::dashboard::DashboardScreen;
use bookstore_console::screens::rentals::RentalsScreen;
use bookstore_console::screens::reports::ReportsScreen;
use bookstore_console::screens::sales::SalesScreen;
use bookstore_console::screens::MutationOutcome;
use bookstore_console::ConsoleContext;
use bookstore_repository::api::{NewBook, NewCustomer, NewSale, RentalStatus, TransactionType};
use bookstore_repository::app_config::config_app;
use bookstore_repository::bookstore_repository::{BookstoreRepository, InMemoryBookstoreRepository};
use bookstore_repository::client::BookstoreApiClient;

/// Says yes to everything and keeps the notifications
#[derive(Default)]
struct AgreeingInteraction {
    notifications: Mutex<Vec<String>>,
}

impl Interaction for AgreeingInteraction {
    fn confirm(&self, _message: &str) -> bool {
        true
    }

    fn notify(&self, message: &str) {
        self.notifications.lock().push(message.to_string());
    }

    fn display(&self, _text: &str) {}

    fn prompt(&self, _label: &str, current: &str) -> Option<String> {
        Some(current.to_string())
    }
}

/// Starts the server with an in-memory store on a free port and returns its url
fn spawn_server() -> String {
    let repository: Arc<dyn BookstoreRepository> = Arc::new(InMemoryBookstoreRepository::default());
    let server = HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(repository.clone()))
            .configure(config_app)
            .build()
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind server");
    let address = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{address}")
}

#[actix_web::test]
/// Drives every console screen against a real server over http
/// Seeds employees, creates a category, a book and a customer through the screens
/// Sells and rents the book, returns the rental
/// Checks dashboard and reports
async fn console_against_server_e2e_test() {
    let url = spawn_server();
    let client = BookstoreApiClient::new(&url).expect("Failed to create client");
    let employees = client
        .initialize_database()
        .await
        .expect("Failed to initialize database");
    assert_eq!(employees.len(), 3);

    let interaction = Arc::new(AgreeingInteraction::default());
    let ctx = ConsoleContext::new(Arc::new(client), interaction.clone());

    let mut categories = CategoriesScreen::default();
    categories.open_create_form().fields.category_name = "Novels".to_string();
    assert_eq!(
        categories.submit_form(&ctx).await,
        MutationOutcome::Completed
    );
    let category_id = categories.records()[0].category_id;

    let mut books = BooksScreen::default();
    books.load(&ctx).await;
    assert_eq!(books.categories().len(), 1);
    {
        let form = &mut books.books.open_create_form().fields;
        form.title = "Palace Walk".to_string();
        form.author = "Naguib Mahfouz".to_string();
        form.category_id = category_id.to_string();
        form.price = "50".to_string();
        form.rental_price_per_day = "4".to_string();
        form.quantity_in_stock = "5".to_string();
    }
    assert_eq!(books.books.submit_form(&ctx).await, MutationOutcome::Completed);
    let book = books.books.records()[0].clone();
    assert_eq!(book.category_name, "Novels");

    let mut customers = CustomersScreen::default();
    customers.open_create_form().fields.name = "Sara".to_string();
    assert_eq!(
        customers.submit_form(&ctx).await,
        MutationOutcome::Completed
    );
    let customer_id = customers.records()[0].customer_id;

    let mut sales = SalesScreen::default();
    sales.load(&ctx).await;
    {
        let form = sales.open_form();
        form.customer_id = customer_id.to_string();
        form.employee_id = employees[0].employee_id.to_string();
        form.book_id = book.book_id.to_string();
        form.quantity = "2".to_string();
    }
    assert_eq!(sales.provisional_total(), Some(100.0));
    assert_eq!(sales.submit(&ctx).await, MutationOutcome::Completed);
    assert_eq!(sales.sales()[0].total_price, 100.0);
    assert_eq!(sales.sales()[0].employee_name, employees[0].name);

    let mut rentals = RentalsScreen::default();
    rentals.load(&ctx).await;
    {
        let form = rentals.open_form();
        form.customer_id = customer_id.to_string();
        form.employee_id = employees[1].employee_id.to_string();
        form.book_id = book.book_id.to_string();
        form.days = "3".to_string();
        form.quantity = "1".to_string();
    }
    assert_eq!(rentals.submit(&ctx).await, MutationOutcome::Completed);
    let rental = rentals.rentals()[0].clone();
    assert_eq!(rental.total_cost, 12.0);
    assert_eq!(rentals.books()[0].quantity_in_stock, 2);

    let mut dashboard = DashboardScreen::default();
    dashboard.load(&ctx).await;
    assert_eq!(dashboard.stats().total_books, 1);
    assert_eq!(dashboard.stats().total_customers, 1);
    assert_eq!(dashboard.stats().today_sales, 100.0);
    assert_eq!(dashboard.stats().active_rentals, 1);

    assert_eq!(
        rentals.return_rental(&ctx, rental.rental_id).await,
        MutationOutcome::Completed
    );
    assert_eq!(rentals.rentals()[0].status, RentalStatus::Returned);
    assert_eq!(rentals.books()[0].quantity_in_stock, 3);

    let mut reports = ReportsScreen::default();
    reports.load(&ctx).await;
    assert_eq!(reports.summary()[0].number_of_sales, 1);
    let types: Vec<TransactionType> = reports
        .recent_transactions()
        .iter()
        .map(|transaction| transaction.transaction_type)
        .collect();
    assert_eq!(types.len(), 2);
    assert!(types.contains(&TransactionType::Sale));
    assert!(types.contains(&TransactionType::Rental));

    // referenced by a sale, so the server refuses
    customers.load(&ctx).await;
    assert_eq!(
        customers.delete(&ctx, customer_id).await,
        MutationOutcome::Failed
    );
    assert!(interaction
        .notifications
        .lock()
        .contains(&messages::delete_failed("customer")));
    assert_eq!(customers.records().len(), 1);
}

#[actix_web::test]
/// Checks status codes and json field names the console relies on
async fn server_http_contract_test() {
    let url = spawn_server();
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{url}/api/categories"))
        .json(&serde_json::json!({ "categoryName": "History" }))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get("location")
        .expect("Missing location")
        .to_str()
        .unwrap()
        .to_string();
    let category: serde_json::Value = response.json().await.unwrap();
    let category_id = category["categoryID"].as_i64().unwrap();
    assert_eq!(location, format!("/api/categories/{category_id}"));

    let client = BookstoreApiClient::new(&url).expect("Failed to create client");
    let book = client
        .add_book(&NewBook {
            title: "The Histories".to_string(),
            sub_title: None,
            author: "Herodotus".to_string(),
            category_id: category_id as i32,
            price: 30.0,
            rental_price_per_day: 1.5,
            quantity_in_stock: 1,
        })
        .await
        .expect("Failed to add book");

    let books: serde_json::Value = http
        .get(format!("{url}/api/books"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(books[0]["bookID"], book.book_id);
    assert_eq!(books[0]["categoryName"], "History");
    assert_eq!(books[0]["rentalPricePerDay"], 1.5);
    assert_eq!(books[0]["quantityInStock"], 1);

    let response = http
        .delete(format!("{url}/api/books/424242"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = http
        .delete(format!("{url}/api/categories/{category_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = http
        .post(format!("{url}/api/customers"))
        .json(&serde_json::json!({ "name": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(client.get_book(424242).await.unwrap(), None);

    // a total that does not fit a json number is refused and the lists stay readable
    let employees = client.initialize_database().await.unwrap();
    let customer = client
        .add_customer(&NewCustomer {
            name: "Omar".to_string(),
            phone: None,
            email: None,
            address: None,
        })
        .await
        .unwrap();
    let pricey = client
        .add_book(&NewBook {
            title: "Codex".to_string(),
            sub_title: None,
            author: "Unknown".to_string(),
            category_id: category_id as i32,
            price: 1e308,
            rental_price_per_day: 0.0,
            quantity_in_stock: 10,
        })
        .await
        .expect("Failed to add book");
    let response = http
        .post(format!("{url}/api/sales"))
        .json(&NewSale {
            customer_id: customer.customer_id,
            employee_id: employees[0].employee_id,
            book_id: pricey.book_id,
            quantity: 10,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(client.list_sales().await.unwrap(), vec![]);
    assert_eq!(
        client.get_book(pricey.book_id).await.unwrap().unwrap().quantity_in_stock,
        10
    );

    let health = http.get(format!("{url}/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}
