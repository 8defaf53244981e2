use std::sync::Arc;

use actix_web::http::header::LOCATION;
use actix_web::web::Data;
use actix_web::Error;
use actix_web::HttpResponse;
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{
    BookId, BookPatch, CategoryId, CategoryPatch, CustomerId, CustomerPatch, NewBook,
    NewCategory, NewCustomer, NewRental, NewSale, RentalId,
};
use crate::bookstore_repository::{
    BookstoreRepository, BookstoreRepositoryError, RECENT_TRANSACTIONS_LIMIT,
};

type Repository = Data<Arc<dyn BookstoreRepository>>;

/// Turns a failed repository call into a response, client errors carry the message as json string
fn error_response(operation: &str, err: BookstoreRepositoryError) -> HttpResponse {
    use BookstoreRepositoryError::*;
    match err {
        BookNotFound(_) | CategoryNotFound(_) | CustomerNotFound(_) | EmployeeNotFound(_)
        | RentalNotFound(_) => HttpResponse::NotFound().json(err.to_string()),
        InsufficientStock { .. }
        | RentalAlreadyReturned(_)
        | CategoryInUse(_)
        | BookInUse(_)
        | CustomerInUse(_) => {
            tracing::warn!("{} rejected: {}", operation, err);
            HttpResponse::Conflict().json(err.to_string())
        }
        Invalid { .. } => HttpResponse::BadRequest().json(err.to_string()),
        DeserializationError(_) | DatabaseFailure(_) | Other(_) => {
            tracing::error!("{} failed {}", operation, err);
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn created<T: serde::Serialize>(location: String, body: &T) -> HttpResponse {
    HttpResponse::Created()
        .append_header((LOCATION, location))
        .json(body)
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn get_all_books(repository: Repository) -> Result<HttpResponse, Error> {
    Ok(match repository.list_books().await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(err) => error_response("Get all books", err),
    })
}

#[api_v2_operation]
pub async fn get_book(
    repository: Repository,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match repository.get_book(book_id.into_inner()).await {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(err) => error_response("Get book", err),
    })
}

#[api_v2_operation]
pub async fn add_book(
    repository: Repository,
    book: web::Json<NewBook>,
) -> Result<HttpResponse, Error> {
    Ok(match repository.add_book(book.into_inner()).await {
        Ok(book) => created(format!("/api/books/{}", book.book_id), &book),
        Err(err) => error_response("Add book", err),
    })
}

#[api_v2_operation]
pub async fn update_book(
    repository: Repository,
    book_id: web::Path<BookId>,
    patch: web::Json<BookPatch>,
) -> Result<HttpResponse, Error> {
    Ok(
        match repository
            .update_book(book_id.into_inner(), patch.into_inner())
            .await
        {
            Ok(book) => HttpResponse::Ok().json(book),
            Err(err) => error_response("Update book", err),
        },
    )
}

#[api_v2_operation]
pub async fn delete_book(
    repository: Repository,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match repository.delete_book(book_id.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("Delete book", err),
    })
}

#[api_v2_operation]
pub async fn get_all_categories(repository: Repository) -> Result<HttpResponse, Error> {
    Ok(match repository.list_categories().await {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response("Get all categories", err),
    })
}

#[api_v2_operation]
pub async fn add_category(
    repository: Repository,
    category: web::Json<NewCategory>,
) -> Result<HttpResponse, Error> {
    Ok(match repository.add_category(category.into_inner()).await {
        Ok(category) => created(
            format!("/api/categories/{}", category.category_id),
            &category,
        ),
        Err(err) => error_response("Add category", err),
    })
}

#[api_v2_operation]
pub async fn update_category(
    repository: Repository,
    category_id: web::Path<CategoryId>,
    patch: web::Json<CategoryPatch>,
) -> Result<HttpResponse, Error> {
    Ok(
        match repository
            .update_category(category_id.into_inner(), patch.into_inner())
            .await
        {
            Ok(category) => HttpResponse::Ok().json(category),
            Err(err) => error_response("Update category", err),
        },
    )
}

#[api_v2_operation]
pub async fn delete_category(
    repository: Repository,
    category_id: web::Path<CategoryId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match repository.delete_category(category_id.into_inner()).await {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(err) => error_response("Delete category", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_all_customers(repository: Repository) -> Result<HttpResponse, Error> {
    Ok(match repository.list_customers().await {
        Ok(customers) => HttpResponse::Ok().json(customers),
        Err(err) => error_response("Get all customers", err),
    })
}

#[api_v2_operation]
pub async fn add_customer(
    repository: Repository,
    customer: web::Json<NewCustomer>,
) -> Result<HttpResponse, Error> {
    Ok(match repository.add_customer(customer.into_inner()).await {
        Ok(customer) => created(
            format!("/api/customers/{}", customer.customer_id),
            &customer,
        ),
        Err(err) => error_response("Add customer", err),
    })
}

#[api_v2_operation]
pub async fn update_customer(
    repository: Repository,
    customer_id: web::Path<CustomerId>,
    patch: web::Json<CustomerPatch>,
) -> Result<HttpResponse, Error> {
    Ok(
        match repository
            .update_customer(customer_id.into_inner(), patch.into_inner())
            .await
        {
            Ok(customer) => HttpResponse::Ok().json(customer),
            Err(err) => error_response("Update customer", err),
        },
    )
}

#[api_v2_operation]
pub async fn delete_customer(
    repository: Repository,
    customer_id: web::Path<CustomerId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match repository.delete_customer(customer_id.into_inner()).await {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(err) => error_response("Delete customer", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_all_employees(repository: Repository) -> Result<HttpResponse, Error> {
    Ok(match repository.list_employees().await {
        Ok(employees) => HttpResponse::Ok().json(employees),
        Err(err) => error_response("Get all employees", err),
    })
}

#[api_v2_operation]
pub async fn get_all_sales(repository: Repository) -> Result<HttpResponse, Error> {
    Ok(match repository.list_sales().await {
        Ok(sales) => HttpResponse::Ok().json(sales),
        Err(err) => error_response("Get all sales", err),
    })
}

#[api_v2_operation]
pub async fn create_sale(
    repository: Repository,
    sale: web::Json<NewSale>,
) -> Result<HttpResponse, Error> {
    Ok(match repository.create_sale(sale.into_inner()).await {
        Ok(sale) => created(format!("/api/sales/{}", sale.sale_id), &sale),
        Err(err) => error_response("Create sale", err),
    })
}

#[api_v2_operation]
pub async fn get_all_rentals(repository: Repository) -> Result<HttpResponse, Error> {
    Ok(match repository.list_rentals().await {
        Ok(rentals) => HttpResponse::Ok().json(rentals),
        Err(err) => error_response("Get all rentals", err),
    })
}

#[api_v2_operation]
pub async fn create_rental(
    repository: Repository,
    rental: web::Json<NewRental>,
) -> Result<HttpResponse, Error> {
    Ok(match repository.create_rental(rental.into_inner()).await {
        Ok(rental) => created(format!("/api/rentals/{}", rental.rental_id), &rental),
        Err(err) => error_response("Create rental", err),
    })
}

#[api_v2_operation]
pub async fn return_rental(
    repository: Repository,
    rental_id: web::Path<RentalId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match repository.return_rental(rental_id.into_inner()).await {
            Ok(rental) => HttpResponse::Ok().json(rental),
            Err(err) => error_response("Return rental", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_sales_summary(repository: Repository) -> Result<HttpResponse, Error> {
    Ok(match repository.sales_summary().await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => error_response("Get sales summary", err),
    })
}

#[api_v2_operation]
pub async fn get_recent_transactions(repository: Repository) -> Result<HttpResponse, Error> {
    Ok(
        match repository
            .recent_transactions(RECENT_TRANSACTIONS_LIMIT)
            .await
        {
            Ok(transactions) => HttpResponse::Ok().json(transactions),
            Err(err) => error_response("Get recent transactions", err),
        },
    )
}

#[api_v2_operation]
pub async fn initialize_database(repository: Repository) -> Result<HttpResponse, Error> {
    Ok(match repository.initialize().await {
        Ok(employees) => {
            tracing::info!("Database initialized with {} employees", employees.len());
            HttpResponse::Ok().json(employees)
        }
        Err(err) => error_response("Initialize database", err),
    })
}
