use paperclip::actix::web;

use crate::handlers;

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/books")
                        .route(web::get().to(handlers::get_all_books))
                        .route(web::post().to(handlers::add_book)),
                )
                .service(
                    web::resource("/books/{book_id}")
                        .route(web::get().to(handlers::get_book))
                        .route(web::patch().to(handlers::update_book))
                        .route(web::delete().to(handlers::delete_book)),
                )
                .service(
                    web::resource("/categories")
                        .route(web::get().to(handlers::get_all_categories))
                        .route(web::post().to(handlers::add_category)),
                )
                .service(
                    web::resource("/categories/{category_id}")
                        .route(web::patch().to(handlers::update_category))
                        .route(web::delete().to(handlers::delete_category)),
                )
                .service(
                    web::resource("/customers")
                        .route(web::get().to(handlers::get_all_customers))
                        .route(web::post().to(handlers::add_customer)),
                )
                .service(
                    web::resource("/customers/{customer_id}")
                        .route(web::patch().to(handlers::update_customer))
                        .route(web::delete().to(handlers::delete_customer)),
                )
                .service(
                    web::resource("/employees").route(web::get().to(handlers::get_all_employees)),
                )
                .service(
                    web::resource("/sales")
                        .route(web::get().to(handlers::get_all_sales))
                        .route(web::post().to(handlers::create_sale)),
                )
                .service(
                    web::resource("/rentals")
                        .route(web::get().to(handlers::get_all_rentals))
                        .route(web::post().to(handlers::create_rental)),
                )
                .service(
                    web::resource("/rentals/{rental_id}/return")
                        .route(web::put().to(handlers::return_rental)),
                )
                .service(
                    web::scope("/reports")
                        .service(
                            web::resource("/sales-summary")
                                .route(web::get().to(handlers::get_sales_summary)),
                        )
                        .service(
                            web::resource("/recent-transactions")
                                .route(web::get().to(handlers::get_recent_transactions)),
                        ),
                )
                .service(
                    web::resource("/database/initialize")
                        .route(web::post().to(handlers::initialize_database)),
                ),
        );
}
