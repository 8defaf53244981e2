use std::sync::Arc;

pub mod backend;
pub mod filter;
pub mod forms;
pub mod interaction;
pub mod messages;
pub mod render;
pub mod screens;
pub mod settings;
pub mod shell;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;

use backend::BookstoreBackend;
use interaction::Interaction;

/// Collaborators every screen works with: the remote store and the person at the console
#[derive(Clone)]
pub struct ConsoleContext {
    pub backend: Arc<dyn BookstoreBackend>,
    pub interaction: Arc<dyn Interaction>,
}

impl ConsoleContext {
    pub fn new(backend: Arc<dyn BookstoreBackend>, interaction: Arc<dyn Interaction>) -> Self {
        Self {
            backend,
            interaction,
        }
    }
}
