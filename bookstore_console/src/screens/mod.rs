pub mod books;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod rentals;
pub mod reports;
pub mod resource;
pub mod sales;

use crate::forms::FormError;

/// What came out of a user initiated change on a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server accepted the change and the screen was reloaded
    Completed,
    /// The user declined the confirmation, nothing was sent
    Cancelled,
    /// The form did not pass the console checks, nothing was sent
    Invalid(FormError),
    /// The server call failed, the screen keeps its previous state
    Failed,
    /// The id is not in the currently loaded list
    NotListed,
    NoOpenForm,
}
