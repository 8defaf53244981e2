//! Plain text rendering of the console screens.

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use bookstore_repository::api::{Book, Customer, Employee, TransactionType};

use crate::forms::FormFields;
use crate::messages::CURRENCY;
use crate::screens::books::BooksScreen;
use crate::screens::categories::CategoriesScreen;
use crate::screens::customers::CustomersScreen;
use crate::screens::dashboard::DashboardScreen;
use crate::screens::rentals::{is_overdue, status_badge, BadgeTone, RentalsScreen};
use crate::screens::reports::ReportsScreen;
use crate::screens::resource::{FormTarget, OpenForm};
use crate::screens::sales::SalesScreen;

pub trait Render {
    fn render(&self) -> String;
}

/// Column aligned text table
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }
}

fn write_row<'a>(
    f: &mut fmt::Formatter<'_>,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    let cells: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(f, "{}", cells.join(" | ").trim_end())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_row(f, &widths, self.headers.iter().copied())?;
        let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
        writeln!(f, "{}", separator.join("-+-"))?;
        if self.rows.is_empty() {
            return writeln!(f, "(no records)");
        }
        for row in &self.rows {
            write_row(f, &widths, row.iter().map(String::as_str))?;
        }
        Ok(())
    }
}

pub fn money(amount: f64) -> String {
    format!("{amount:.2} {CURRENCY}")
}

fn date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

fn filter_line(out: &mut String, filter: &str) {
    if !filter.is_empty() {
        let _ = writeln!(out, "Filter: \"{filter}\"");
    }
}

fn resource_form<F: FormFields>(out: &mut String, noun: &str, form: &OpenForm<F>) {
    let title = match form.target {
        FormTarget::Create => format!("New {noun}"),
        FormTarget::Edit(id) => format!("Edit {noun} #{id}"),
    };
    form_fields(out, &title, &form.fields);
}

fn transaction_options(
    out: &mut String,
    customers: &[Customer],
    employees: &[Employee],
    books: &[Book],
) {
    let customers: Vec<String> = customers
        .iter()
        .map(|customer| format!("{} = {}", customer.customer_id, customer.name))
        .collect();
    let employees: Vec<String> = employees
        .iter()
        .map(|employee| format!("{} = {}", employee.employee_id, employee.name))
        .collect();
    let books: Vec<String> = books
        .iter()
        .map(|book| {
            format!(
                "{} = {} ({} in stock)",
                book.book_id, book.title, book.quantity_in_stock
            )
        })
        .collect();
    let _ = writeln!(out, "  Customers: {}", customers.join(", "));
    let _ = writeln!(out, "  Employees: {}", employees.join(", "));
    let _ = writeln!(out, "  Books: {}", books.join(", "));
}

fn form_fields<F: FormFields>(out: &mut String, title: &str, form: &F) {
    let _ = writeln!(out, "\n[{title}]");
    for (label, value) in form.fields() {
        let _ = writeln!(out, "  {label}: {value}");
    }
}

impl Render for BooksScreen {
    fn render(&self) -> String {
        let mut out = String::from("Books\n");
        filter_line(&mut out, self.books.filter());
        let mut table = Table::new(vec![
            "ID", "Title", "Author", "Category", "Price", "Per day", "Stock",
        ]);
        for book in self.books.visible_records() {
            table.row(vec![
                book.book_id.to_string(),
                book.title.clone(),
                book.author.clone(),
                book.category_name.clone(),
                money(book.price),
                money(book.rental_price_per_day),
                book.quantity_in_stock.to_string(),
            ]);
        }
        out.push_str(&table.to_string());
        if let Some(form) = self.books.form() {
            resource_form(&mut out, "book", form);
            let _ = writeln!(out, "  Categories:");
            for category in self.categories() {
                let _ = writeln!(
                    out,
                    "    {} = {}",
                    category.category_id, category.category_name
                );
            }
        }
        out
    }
}

impl Render for CategoriesScreen {
    fn render(&self) -> String {
        let mut out = String::from("Categories\n");
        filter_line(&mut out, self.filter());
        let mut table = Table::new(vec!["ID", "Name"]);
        for category in self.visible_records() {
            table.row(vec![
                category.category_id.to_string(),
                category.category_name.clone(),
            ]);
        }
        out.push_str(&table.to_string());
        if let Some(form) = self.form() {
            resource_form(&mut out, "category", form);
        }
        out
    }
}

impl Render for CustomersScreen {
    fn render(&self) -> String {
        let mut out = String::from("Customers\n");
        filter_line(&mut out, self.filter());
        let mut table = Table::new(vec!["ID", "Name", "Phone", "Email", "Address"]);
        for customer in self.visible_records() {
            table.row(vec![
                customer.customer_id.to_string(),
                customer.name.clone(),
                customer.phone.clone().unwrap_or_default(),
                customer.email.clone().unwrap_or_default(),
                customer.address.clone().unwrap_or_default(),
            ]);
        }
        out.push_str(&table.to_string());
        if let Some(form) = self.form() {
            resource_form(&mut out, "customer", form);
        }
        out
    }
}

impl Render for SalesScreen {
    fn render(&self) -> String {
        let mut out = String::from("Sales\n");
        let mut table = Table::new(vec![
            "ID", "Date", "Customer", "Book", "Qty", "Total", "Employee",
        ]);
        for sale in self.sales() {
            table.row(vec![
                sale.sale_id.to_string(),
                date(&sale.sale_date),
                sale.customer_name.clone(),
                sale.book_title.clone(),
                sale.quantity.to_string(),
                money(sale.total_price),
                sale.employee_name.clone(),
            ]);
        }
        out.push_str(&table.to_string());
        if let Some(form) = self.form() {
            form_fields(&mut out, "New sale", form);
            transaction_options(&mut out, self.customers(), self.employees(), self.books());
            if let Some(total) = self.provisional_total() {
                let _ = writeln!(out, "  Total: {}", money(total));
            }
        }
        out
    }
}

impl Render for RentalsScreen {
    fn render(&self) -> String {
        let now = Utc::now();
        let mut out = String::from("Rentals\n");
        let mut table = Table::new(vec![
            "ID", "Date", "Customer", "Book", "Days", "Qty", "Cost", "Due", "Status",
        ]);
        for rental in self.rentals() {
            let badge = status_badge(rental.status);
            let mut status = match badge.tone {
                BadgeTone::Green => format!("({})", badge.label),
                BadgeTone::Gray => badge.label.to_string(),
            };
            if is_overdue(rental, now) {
                status.push_str(" OVERDUE");
            }
            table.row(vec![
                rental.rental_id.to_string(),
                date(&rental.rental_date),
                rental.customer_name.clone(),
                rental.book_title.clone(),
                rental.days.to_string(),
                rental.quantity.to_string(),
                money(rental.total_cost),
                date(&rental.expected_return_date),
                status,
            ]);
        }
        out.push_str(&table.to_string());
        if let Some(form) = self.form() {
            form_fields(&mut out, "New rental", form);
            transaction_options(&mut out, self.customers(), self.employees(), self.books());
            if let Some(cost) = self.provisional_cost() {
                let _ = writeln!(out, "  Total: {}", money(cost));
            }
        }
        out
    }
}

impl Render for DashboardScreen {
    fn render(&self) -> String {
        let stats = self.stats();
        let mut out = String::from("Dashboard\n");
        let _ = writeln!(out, "  Books:          {}", stats.total_books);
        let _ = writeln!(out, "  Customers:      {}", stats.total_customers);
        let _ = writeln!(out, "  Today's sales:  {}", money(stats.today_sales));
        let _ = writeln!(out, "  Active rentals: {}", stats.active_rentals);
        out
    }
}

impl Render for ReportsScreen {
    fn render(&self) -> String {
        let mut out = String::from("Reports\n\nSales summary\n");
        let mut summary = Table::new(vec!["Day", "Sales", "Count"]);
        for day in self.summary() {
            summary.row(vec![
                day.sale_day.to_string(),
                money(day.total_sales),
                day.number_of_sales.to_string(),
            ]);
        }
        out.push_str(&summary.to_string());

        out.push_str("\nRecent transactions\n");
        let mut recent = Table::new(vec!["Type", "ID", "Date", "Amount"]);
        for transaction in self.recent_transactions() {
            let kind = match transaction.transaction_type {
                TransactionType::Sale => "Sale",
                TransactionType::Rental => "Rental",
            };
            recent.row(vec![
                kind.to_string(),
                transaction.id.to_string(),
                date(&transaction.date),
                money(transaction.amount),
            ]);
        }
        out.push_str(&recent.to_string());
        out
    }
}
