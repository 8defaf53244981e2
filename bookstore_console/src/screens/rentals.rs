use chrono::{DateTime, Utc};
use futures_util::future::try_join4;

use bookstore_repository::api::{Book, Customer, Employee, Rental, RentalId, RentalStatus};
use bookstore_repository::pricing;

use crate::forms::RentalForm;
use crate::messages;
use crate::screens::MutationOutcome;
use crate::ConsoleContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Green,
    Gray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

pub fn status_badge(status: RentalStatus) -> StatusBadge {
    let tone = match status {
        RentalStatus::Active => BadgeTone::Green,
        RentalStatus::Returned => BadgeTone::Gray,
    };
    StatusBadge {
        label: status.as_str(),
        tone,
    }
}

/// Active rental whose expected return date has passed
pub fn is_overdue(rental: &Rental, now: DateTime<Utc>) -> bool {
    rental.status == RentalStatus::Active && rental.expected_return_date < now
}

/// Rentals list and the new rental form with its option lists
#[derive(Default)]
pub struct RentalsScreen {
    rentals: Vec<Rental>,
    books: Vec<Book>,
    customers: Vec<Customer>,
    employees: Vec<Employee>,
    form: Option<RentalForm>,
}

impl RentalsScreen {
    /// Loads rentals and option lists together. If any request fails nothing is replaced
    pub async fn load(&mut self, ctx: &ConsoleContext) {
        let backend = ctx.backend.as_ref();
        match try_join4(
            backend.list_rentals(),
            backend.list_books(),
            backend.list_customers(),
            backend.list_employees(),
        )
        .await
        {
            Ok((rentals, books, customers, employees)) => {
                self.rentals = rentals;
                self.books = books;
                self.customers = customers;
                self.employees = employees;
            }
            Err(err) => tracing::error!("Error loading rentals: {:#}", err),
        }
    }

    pub fn rentals(&self) -> &[Rental] {
        &self.rentals
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

    pub fn form(&self) -> Option<&RentalForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut RentalForm> {
        self.form.as_mut()
    }

    pub fn open_form(&mut self) -> &mut RentalForm {
        self.form.insert(RentalForm::default())
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn provisional_cost(&self) -> Option<f64> {
        let form = self.form.as_ref()?;
        let book_id: i32 = form.book_id.trim().parse().ok()?;
        let days: i32 = form.days.trim().parse().ok()?;
        let quantity: i32 = form.quantity.trim().parse().ok()?;
        let book = self.books.iter().find(|book| book.book_id == book_id)?;
        pricing::rental_cost(book.rental_price_per_day, days, quantity)
    }

    pub fn overdue_rentals(&self, now: DateTime<Utc>) -> Vec<&Rental> {
        self.rentals
            .iter()
            .filter(|rental| is_overdue(rental, now))
            .collect()
    }

    pub async fn submit(&mut self, ctx: &ConsoleContext) -> MutationOutcome {
        let Some(form) = &self.form else {
            return MutationOutcome::NoOpenForm;
        };
        let rental = match form.to_new_rental() {
            Ok(rental) => rental,
            Err(err) => {
                ctx.interaction.notify(&messages::invalid_form(&err));
                return MutationOutcome::Invalid(err);
            }
        };
        match ctx.backend.create_rental(rental).await {
            Ok(()) => {
                self.form = None;
                ctx.interaction.notify(messages::RENTAL_COMPLETED);
                self.load(ctx).await;
                MutationOutcome::Completed
            }
            Err(err) => {
                tracing::error!("Error creating rental: {:#}", err);
                ctx.interaction.notify(messages::RENTAL_FAILED);
                MutationOutcome::Failed
            }
        }
    }

    /// Marks a listed active rental as returned after the user confirms
    pub async fn return_rental(
        &mut self,
        ctx: &ConsoleContext,
        rental_id: RentalId,
    ) -> MutationOutcome {
        let Some(rental) = self
            .rentals
            .iter()
            .find(|rental| rental.rental_id == rental_id && rental.status == RentalStatus::Active)
        else {
            tracing::warn!(rental_id, "Return requested for a rental that is not listed as active");
            return MutationOutcome::NotListed;
        };
        let question = messages::return_confirmation(&rental.book_title, &rental.customer_name);
        if !ctx.interaction.confirm(&question) {
            return MutationOutcome::Cancelled;
        }
        match ctx.backend.return_rental(rental_id).await {
            Ok(()) => {
                ctx.interaction.notify(messages::RENTAL_RETURNED);
                self.load(ctx).await;
                MutationOutcome::Completed
            }
            Err(err) => {
                tracing::error!(rental_id, "Error returning rental: {:#}", err);
                ctx.interaction.notify(messages::RETURN_FAILED);
                MutationOutcome::Failed
            }
        }
    }
}
