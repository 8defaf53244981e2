use bookstore_repository::api::Customer;

use crate::backend::BookstoreBackend;
use crate::forms::{CustomerForm, SubmitError};
use crate::screens::resource::{ResourceKind, ResourceScreen};

pub struct CustomerResource;

pub type CustomersScreen = ResourceScreen<CustomerResource>;

#[async_trait::async_trait]
impl ResourceKind for CustomerResource {
    type Record = Customer;
    type Form = CustomerForm;

    const NOUN: &'static str = "customer";

    fn id(record: &Customer) -> i32 {
        record.customer_id
    }

    fn label(record: &Customer) -> &str {
        &record.name
    }

    fn form_for(record: &Customer) -> CustomerForm {
        CustomerForm::from_customer(record)
    }

    async fn fetch(backend: &dyn BookstoreBackend) -> anyhow::Result<Vec<Customer>> {
        backend.list_customers().await
    }

    async fn create(backend: &dyn BookstoreBackend, form: &CustomerForm) -> Result<(), SubmitError> {
        let customer = form.to_new_customer()?;
        Ok(backend.add_customer(customer).await?)
    }

    async fn update(
        backend: &dyn BookstoreBackend,
        id: i32,
        form: &CustomerForm,
    ) -> Result<(), SubmitError> {
        let patch = form.to_patch()?;
        Ok(backend.update_customer(id, patch).await?)
    }

    async fn delete(backend: &dyn BookstoreBackend, id: i32) -> anyhow::Result<()> {
        backend.delete_customer(id).await
    }
}
