//! Handles the configuration of the importer.
//!
//! Every setting has a built-in default; deployments and tests override them
//! through `KARAOKE_*` environment variables. The binary itself takes no
//! arguments.

use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Path to the semicolon-delimited catalog file.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Where the database lives, in any form accepted by
    /// `surrealdb::engine::any` (e.g. `surrealkv://./data/karaoke-db`,
    /// `mem://`).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// The namespace to select after connecting.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// The database to select after connecting.
    #[serde(default = "default_database")]
    pub database: String,
    /// Upper bound, in seconds, on the run's whole interaction with the
    /// store.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("./data/karafuncatalog.csv")
}

fn default_endpoint() -> String {
    "surrealkv://./data/karaoke-db".to_string()
}

fn default_namespace() -> String {
    "karaoke".to_string()
}

fn default_database() -> String {
    "catalog".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            endpoint: default_endpoint(),
            namespace: default_namespace(),
            database: default_database(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from the defaults, overridden by any `KARAOKE_*`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// This function will return an error if an override cannot be
    /// deserialized into its field's type.
    pub fn init() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Environment::with_prefix("KARAOKE"))
            .build()?;

        s.try_deserialize()
    }

    /// The single deadline bounding the run's store interaction.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_point_at_the_local_catalog_and_store() {
        let settings = Settings::default();

        assert_eq!(
            settings.catalog_path,
            PathBuf::from("./data/karafuncatalog.csv")
        );
        assert_eq!(settings.endpoint, "surrealkv://./data/karaoke-db");
        assert_eq!(settings.namespace, "karaoke");
        assert_eq!(settings.database, "catalog");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn init_without_overrides_matches_the_defaults() {
        let settings = Settings::init().unwrap();

        assert_eq!(settings, Settings::default());
    }
}
