use futures_util::future::try_join;

use bookstore_repository::api::{RecentTransaction, SalesSummary};

use crate::ConsoleContext;

/// Daily sales summary and the latest transactions, shown as the server returns them
#[derive(Default)]
pub struct ReportsScreen {
    summary: Vec<SalesSummary>,
    recent: Vec<RecentTransaction>,
}

impl ReportsScreen {
    pub async fn load(&mut self, ctx: &ConsoleContext) {
        let backend = ctx.backend.as_ref();
        match try_join(backend.sales_summary(), backend.recent_transactions()).await {
            Ok((summary, recent)) => {
                self.summary = summary;
                self.recent = recent;
            }
            Err(err) => tracing::error!("Error loading reports: {:#}", err),
        }
    }

    pub fn summary(&self) -> &[SalesSummary] {
        &self.summary
    }

    pub fn recent_transactions(&self) -> &[RecentTransaction] {
        &self.recent
    }
}

#[cfg(test)]
mod reports_tests {
    use bookstore_repository::api::{NewRental, NewSale, TransactionType};
    use bookstore_repository::bookstore_repository::BookstoreRepository;

    use super::*;
    use crate::test_support::{context, RecordingInteraction, RepositoryBackend};

    #[tokio::test]
    async fn test_reports_show_server_order() {
        let backend = RepositoryBackend::seeded().await;
        let ctx = context(&backend, &RecordingInteraction::consenting(true));
        let alef = backend.book_id("Alef").await;
        let customer_id = backend.repository.list_customers().await.unwrap()[0].customer_id;
        let employee_id = backend.repository.list_employees().await.unwrap()[0].employee_id;

        backend
            .repository
            .create_sale(NewSale {
                customer_id,
                employee_id,
                book_id: alef,
                quantity: 1,
            })
            .await
            .unwrap();
        backend
            .repository
            .create_rental(NewRental {
                customer_id,
                employee_id,
                book_id: alef,
                days: 4,
                quantity: 1,
            })
            .await
            .unwrap();

        let mut screen = ReportsScreen::default();
        screen.load(&ctx).await;

        assert_eq!(screen.summary().len(), 1);
        assert_eq!(screen.summary()[0].total_sales, 50.0);
        assert_eq!(screen.summary()[0].number_of_sales, 1);

        let expected = backend.repository.recent_transactions(10).await.unwrap();
        assert_eq!(screen.recent_transactions(), expected.as_slice());
        let types: Vec<TransactionType> = screen
            .recent_transactions()
            .iter()
            .map(|transaction| transaction.transaction_type)
            .collect();
        assert!(types.contains(&TransactionType::Sale));
        assert!(types.contains(&TransactionType::Rental));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_reports() {
        let backend = RepositoryBackend::seeded().await;
        let ctx = context(&backend, &RecordingInteraction::consenting(true));
        let mut screen = ReportsScreen::default();

        backend.fail_loads(true);
        screen.load(&ctx).await;
        assert!(screen.summary().is_empty());
        assert!(screen.recent_transactions().is_empty());
    }
}
