use anyhow::Context;
use serde::Deserialize;

const CONFIG_FILE: &str = "bookstore_server";
const ENV_PREFIX: &str = "BOOKSTORE";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub hostname: String,
    pub username: String,
    pub password: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            hostname: "127.0.0.1".to_string(),
            username: "postgres".to_string(),
            password: "postgres".to_string(),
        }
    }
}

/// Server settings, read from an optional `bookstore_server.toml` and `BOOKSTORE__*` variables
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub use_in_memory_db: bool,
    pub database: DatabaseSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            use_in_memory_db: false,
            database: DatabaseSettings::default(),
        }
    }
}

impl ServerSettings {
    pub fn load() -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
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
