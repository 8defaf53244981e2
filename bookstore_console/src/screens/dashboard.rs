use futures_util::future::try_join4;

use bookstore_repository::api::{Book, Customer, Rental, RentalStatus, SalesSummary};

use crate::ConsoleContext;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_books: usize,
    pub total_customers: usize,
    /// Total of the newest day in the sales summary
    pub today_sales: f64,
    pub active_rentals: usize,
}

impl DashboardStats {
    pub fn compute(
        books: &[Book],
        customers: &[Customer],
        summary: &[SalesSummary],
        rentals: &[Rental],
    ) -> Self {
        Self {
            total_books: books.len(),
            total_customers: customers.len(),
            today_sales: summary.first().map(|day| day.total_sales).unwrap_or(0.0),
            active_rentals: rentals
                .iter()
                .filter(|rental| rental.status == RentalStatus::Active)
                .count(),
        }
    }
}

#[derive(Default)]
pub struct DashboardScreen {
    stats: DashboardStats,
}

impl DashboardScreen {
    /// Recomputes the counters, a failed request keeps the previous ones
    pub async fn load(&mut self, ctx: &ConsoleContext) {
        let backend = ctx.backend.as_ref();
        match try_join4(
            backend.list_books(),
            backend.list_customers(),
            backend.sales_summary(),
            backend.list_rentals(),
        )
        .await
        {
            Ok((books, customers, summary, rentals)) => {
                self.stats = DashboardStats::compute(&books, &customers, &summary, &rentals);
            }
            Err(err) => tracing::error!("Error loading dashboard: {:#}", err),
        }
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }
}
