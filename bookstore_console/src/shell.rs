use clap::{Parser, Subcommand};

use crate::forms::FormFields;
use crate::interaction::Interaction;
use crate::messages;
use crate::render::{money, Render};
use crate::screens::books::BooksScreen;
use crate::screens::categories::CategoriesScreen;
use crate::screens::customers::CustomersScreen;
use crate::screens::dashboard::DashboardScreen;
use crate::screens::rentals::RentalsScreen;
use crate::screens::reports::ReportsScreen;
use crate::screens::resource::{ResourceKind, ResourceScreen};
use crate::screens::sales::SalesScreen;
use crate::screens::MutationOutcome;
use crate::ConsoleContext;

const PROMPT: &str = "bookstore>";

const HELP: &str = "Commands: go <path>, filter [text], new, edit <id>, delete <id>, \
return <id>, submit, cancel, refresh, initialize, quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Books,
    Categories,
    Customers,
    Sales,
    Rentals,
    Reports,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Dashboard,
        Route::Books,
        Route::Categories,
        Route::Customers,
        Route::Sales,
        Route::Rentals,
        Route::Reports,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Books => "/books",
            Route::Categories => "/categories",
            Route::Customers => "/customers",
            Route::Sales => "/sales",
            Route::Rentals => "/rentals",
            Route::Reports => "/reports",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Books => "Books",
            Route::Categories => "Categories",
            Route::Customers => "Customers",
            Route::Sales => "Sales",
            Route::Rentals => "Rentals",
            Route::Reports => "Reports",
        }
    }

    /// Accepts paths with or without the leading slash, e.g. `/books` or `books`
    pub fn from_path(path: &str) -> Option<Route> {
        let path = format!("/{}", path.trim().trim_matches('/'));
        Route::ALL.into_iter().find(|route| route.path() == path)
    }
}

#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// Open a screen, e.g. `go /books`
    Go { path: String },
    /// Filter the current list, without text the filter is cleared
    Filter { text: Vec<String> },
    /// Open a new form on the current screen and fill it in
    New,
    /// Edit a listed record
    Edit { id: i32 },
    /// Delete a listed record
    Delete { id: i32 },
    /// Mark a rental as returned
    Return { id: i32 },
    /// Fill in and send the open form again
    Submit,
    /// Close the open form
    Cancel,
    /// Reload the current screen
    Refresh,
    /// Seed the default employees
    Initialize,
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlow {
    Continue,
    Exit,
}

/// Prompts every field of the form, `false` when input ends before the last one
fn fill_form<F: FormFields>(interaction: &dyn Interaction, form: &mut F) -> bool {
    for (label, value) in form.fields_mut() {
        match interaction.prompt(label, value) {
            Some(answer) => *value = answer,
            None => return false,
        }
    }
    true
}

async fn fill_and_submit<K: ResourceKind>(ctx: &ConsoleContext, screen: &mut ResourceScreen<K>) {
    let Some(form) = screen.form_mut() else {
        ctx.interaction.notify(messages::NO_OPEN_FORM);
        return;
    };
    if fill_form(ctx.interaction.as_ref(), &mut form.fields) {
        screen.submit_form(ctx).await;
    }
}

/// Navigation between the screens and the command loop driving them
pub struct Shell {
    ctx: ConsoleContext,
    route: Route,
    dashboard: DashboardScreen,
    books: BooksScreen,
    categories: CategoriesScreen,
    customers: CustomersScreen,
    sales: SalesScreen,
    rentals: RentalsScreen,
    reports: ReportsScreen,
}

impl Shell {
    pub fn new(ctx: ConsoleContext) -> Self {
        Self {
            ctx,
            route: Route::Dashboard,
            dashboard: DashboardScreen::default(),
            books: BooksScreen::default(),
            categories: CategoriesScreen::default(),
            customers: CustomersScreen::default(),
            sales: SalesScreen::default(),
            rentals: RentalsScreen::default(),
            reports: ReportsScreen::default(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub async fn navigate(&mut self, route: Route) {
        tracing::debug!(path = route.path(), "Navigating");
        self.route = route;
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        let ctx = &self.ctx;
        match self.route {
            Route::Dashboard => self.dashboard.load(ctx).await,
            Route::Books => self.books.load(ctx).await,
            Route::Categories => self.categories.load(ctx).await,
            Route::Customers => self.customers.load(ctx).await,
            Route::Sales => self.sales.load(ctx).await,
            Route::Rentals => self.rentals.load(ctx).await,
            Route::Reports => self.reports.load(ctx).await,
        }
    }

    pub fn render(&self) -> String {
        let navigation: Vec<String> = Route::ALL
            .into_iter()
            .map(|route| {
                if route == self.route {
                    format!("[{} {}]", route.label(), route.path())
                } else {
                    format!("{} {}", route.label(), route.path())
                }
            })
            .collect();
        let screen = match self.route {
            Route::Dashboard => self.dashboard.render(),
            Route::Books => self.books.render(),
            Route::Categories => self.categories.render(),
            Route::Customers => self.customers.render(),
            Route::Sales => self.sales.render(),
            Route::Rentals => self.rentals.render(),
            Route::Reports => self.reports.render(),
        };
        format!("{}\n\n{}\n{}", navigation.join(" | "), screen, HELP)
    }

    /// Runs commands until `quit` or the end of input
    pub async fn run(&mut self) {
        self.refresh().await;
        loop {
            self.ctx.interaction.display(&self.render());
            let Some(line) = self.ctx.interaction.prompt(PROMPT, "") else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match ShellLine::try_parse_from(line.split_whitespace()) {
                Ok(ShellLine { command }) => {
                    if self.execute(command).await == ShellFlow::Exit {
                        break;
                    }
                }
                Err(err) => self.ctx.interaction.notify(&err.to_string()),
            }
        }
    }

    pub async fn execute(&mut self, command: ShellCommand) -> ShellFlow {
        match command {
            ShellCommand::Go { path } => match Route::from_path(&path) {
                Some(route) => self.navigate(route).await,
                None => self.ctx.interaction.notify(&messages::unknown_route(&path)),
            },
            ShellCommand::Filter { text } => self.set_filter(text.join(" ")),
            ShellCommand::New => self.new_record().await,
            ShellCommand::Edit { id } => self.edit_record(id).await,
            ShellCommand::Delete { id } => self.delete_record(id).await,
            ShellCommand::Return { id } => {
                if self.route == Route::Rentals {
                    self.rentals.return_rental(&self.ctx, id).await;
                } else {
                    self.ctx.interaction.notify(messages::NO_RETURNS);
                }
            }
            ShellCommand::Submit => self.submit_open_form().await,
            ShellCommand::Cancel => self.cancel_form(),
            ShellCommand::Refresh => self.refresh().await,
            ShellCommand::Initialize => self.initialize().await,
            ShellCommand::Quit => return ShellFlow::Exit,
        }
        ShellFlow::Continue
    }

    fn set_filter(&mut self, filter: String) {
        match self.route {
            Route::Books => self.books.books.set_filter(filter),
            Route::Categories => self.categories.set_filter(filter),
            Route::Customers => self.customers.set_filter(filter),
            _ => self.ctx.interaction.notify(messages::NO_FILTER),
        }
    }

    async fn new_record(&mut self) {
        match self.route {
            Route::Books => {
                self.books.books.open_create_form();
            }
            Route::Categories => {
                self.categories.open_create_form();
            }
            Route::Customers => {
                self.customers.open_create_form();
            }
            Route::Sales => {
                self.sales.open_form();
            }
            Route::Rentals => {
                self.rentals.open_form();
            }
            Route::Dashboard | Route::Reports => {
                self.ctx.interaction.notify(messages::NO_FORM);
                return;
            }
        }
        self.submit_open_form().await;
    }

    async fn edit_record(&mut self, id: i32) {
        let opened = match self.route {
            Route::Books => self.books.books.open_edit_form(id).is_some(),
            Route::Categories => self.categories.open_edit_form(id).is_some(),
            Route::Customers => self.customers.open_edit_form(id).is_some(),
            _ => {
                self.ctx.interaction.notify(messages::NO_FORM);
                return;
            }
        };
        if opened {
            self.submit_open_form().await;
        } else {
            self.ctx
                .interaction
                .notify(&messages::not_listed(self.route.label(), id));
        }
    }

    async fn delete_record(&mut self, id: i32) {
        let outcome = match self.route {
            Route::Books => self.books.books.delete(&self.ctx, id).await,
            Route::Categories => self.categories.delete(&self.ctx, id).await,
            Route::Customers => self.customers.delete(&self.ctx, id).await,
            _ => {
                self.ctx.interaction.notify(messages::NO_FORM);
                return;
            }
        };
        if outcome == MutationOutcome::NotListed {
            self.ctx
                .interaction
                .notify(&messages::not_listed(self.route.label(), id));
        }
    }

    /// Fills in the open form of the current screen and sends it
    async fn submit_open_form(&mut self) {
        self.ctx.interaction.display(&self.render());
        let ctx = &self.ctx;
        match self.route {
            Route::Books => fill_and_submit(ctx, &mut self.books.books).await,
            Route::Categories => fill_and_submit(ctx, &mut self.categories).await,
            Route::Customers => fill_and_submit(ctx, &mut self.customers).await,
            Route::Sales => {
                let Some(form) = self.sales.form_mut() else {
                    ctx.interaction.notify(messages::NO_OPEN_FORM);
                    return;
                };
                if !fill_form(ctx.interaction.as_ref(), form) {
                    return;
                }
                let total = self.sales.provisional_total().map(money);
                let question = messages::confirm_transaction("sale", total.as_deref());
                if ctx.interaction.confirm(&question) {
                    self.sales.submit(ctx).await;
                }
            }
            Route::Rentals => {
                let Some(form) = self.rentals.form_mut() else {
                    ctx.interaction.notify(messages::NO_OPEN_FORM);
                    return;
                };
                if !fill_form(ctx.interaction.as_ref(), form) {
                    return;
                }
                let total = self.rentals.provisional_cost().map(money);
                let question = messages::confirm_transaction("rental", total.as_deref());
                if ctx.interaction.confirm(&question) {
                    self.rentals.submit(ctx).await;
                }
            }
            Route::Dashboard | Route::Reports => ctx.interaction.notify(messages::NO_FORM),
        }
    }

    fn cancel_form(&mut self) {
        match self.route {
            Route::Books => self.books.books.close_form(),
            Route::Categories => self.categories.close_form(),
            Route::Customers => self.customers.close_form(),
            Route::Sales => self.sales.close_form(),
            Route::Rentals => self.rentals.close_form(),
            Route::Dashboard | Route::Reports => {}
        }
    }

    async fn initialize(&mut self) {
        match self.ctx.backend.initialize_database().await {
            Ok(employees) => {
                tracing::info!(employees = employees.len(), "Database initialized");
                self.ctx.interaction.notify(messages::INITIALIZED);
                self.refresh().await;
            }
            Err(err) => {
                tracing::error!("Error initializing database: {:#}", err);
                self.ctx.interaction.notify(messages::INITIALIZE_FAILED);
            }
        }
    }
}
