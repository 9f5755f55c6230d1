//! Server configuration from environment variables.
//!
//! | Variable        | Default                 |
//! |-----------------|-------------------------|
//! | `BIND_ADDR`     | `127.0.0.1`             |
//! | `PORT`          | `3001`                  |
//! | `DATABASE_PATH` | `data/urban_alerts.db`  |
//! | `CORS_ORIGIN`   | unset (permissive CORS) |

use std::path::{Path, PathBuf};

use urban_alerts_database::db::DEFAULT_DB_PATH;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3001;

/// Runtime settings for [`crate::run_server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Location of the `SQLite` database file.
    pub database_path: PathBuf,
    /// Single origin allowed by CORS. `None` allows any origin.
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            cors_origin: None,
        }
    }
}

/// Loads a `.env` file from the working directory (or a parent) into the
/// process environment. Variables that are already set win.
///
/// Returns the path of the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Loads the `.env`-style file at `path` into the process environment.
///
/// # Errors
///
/// Returns [`dotenvy::Error`] if the file is missing or cannot be parsed.
pub fn load_dotenv_from(path: &Path) -> Result<(), dotenvy::Error> {
    dotenvy::from_path(path)
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Call [`load_dotenv`] first for `.env` values to be seen.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset. An unparsable `PORT` falls back to the
    /// default with a warning.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = get("PORT").map_or(defaults.port, |raw| {
            raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{raw}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            })
        });

        Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            database_path: get("DATABASE_PATH").map_or(defaults.database_path, PathBuf::from),
            cors_origin: get("CORS_ORIGIN"),
        }
    }
}
