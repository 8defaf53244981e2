use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

const CONFIG_FILE: &str = "bookstore_console";
const ENV_PREFIX: &str = "BOOKSTORE_CONSOLE";

/// Console settings, read from an optional config file and `BOOKSTORE_CONSOLE__*` variables
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Base url of the server, requests go to `{api_url}/api/...`
    pub api_url: String,
    /// Used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            log_filter: "warn".to_string(),
        }
    }
}

impl ConsoleSettings {
    /// Loads `config_file` when given, otherwise an optional `bookstore_console.toml`
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(CONFIG_FILE).required(false),
        };
        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
