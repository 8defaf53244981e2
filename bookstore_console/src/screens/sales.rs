use futures_util::future::try_join4;

use bookstore_repository::api::{Book, Customer, Employee, Sale};
use bookstore_repository::pricing;

use crate::forms::SaleForm;
use crate::messages;
use crate::screens::MutationOutcome;
use crate::ConsoleContext;

/// Sales list and the new sale form with its option lists
#[derive(Default)]
pub struct SalesScreen {
    sales: Vec<Sale>,
    books: Vec<Book>,
    customers: Vec<Customer>,
    employees: Vec<Employee>,
    form: Option<SaleForm>,
}

impl SalesScreen {
    /// Loads sales and option lists together. If any request fails nothing is replaced
    pub async fn load(&mut self, ctx: &ConsoleContext) {
        let backend = ctx.backend.as_ref();
        match try_join4(
            backend.list_sales(),
            backend.list_books(),
            backend.list_customers(),
            backend.list_employees(),
        )
        .await
        {
            Ok((sales, books, customers, employees)) => {
                self.sales = sales;
                self.books = books;
                self.customers = customers;
                self.employees = employees;
            }
            Err(err) => tracing::error!("Error loading sales: {:#}", err),
        }
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn form(&self) -> Option<&SaleForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut SaleForm> {
        self.form.as_mut()
    }

    pub fn open_form(&mut self) -> &mut SaleForm {
        self.form.insert(SaleForm::default())
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Total shown while filling in the form, the list only ever shows the server's totals
    pub fn provisional_total(&self) -> Option<f64> {
        let form = self.form.as_ref()?;
        let book_id: i32 = form.book_id.trim().parse().ok()?;
        let quantity: i32 = form.quantity.trim().parse().ok()?;
        let book = self.books.iter().find(|book| book.book_id == book_id)?;
        pricing::sale_total(book.price, quantity)
    }

    pub async fn submit(&mut self, ctx: &ConsoleContext) -> MutationOutcome {
        let Some(form) = &self.form else {
            return MutationOutcome::NoOpenForm;
        };
        let sale = match form.to_new_sale() {
            Ok(sale) => sale,
            Err(err) => {
                ctx.interaction.notify(&messages::invalid_form(&err));
                return MutationOutcome::Invalid(err);
            }
        };
        match ctx.backend.create_sale(sale).await {
            Ok(()) => {
                self.form = None;
                ctx.interaction.notify(messages::SALE_COMPLETED);
                self.load(ctx).await;
                MutationOutcome::Completed
            }
            Err(err) => {
                tracing::error!("Error creating sale: {:#}", err);
                ctx.interaction.notify(messages::SALE_FAILED);
                MutationOutcome::Failed
            }
        }
    }
}
