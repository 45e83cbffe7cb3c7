use serde::Deserialize;

use crate::matching::SelectionOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Postgres URL. Without it the service keeps its state in memory only.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_db_pool_size")]
    pub db_pool_size: u32,
    #[serde(default)]
    pub mutual_preference: bool,
}

fn default_port() -> u16 { 3003 }
fn default_db_pool_size() -> u32 { 10 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_url: None,
            db_pool_size: default_db_pool_size(),
            mutual_preference: false,
        }
    }
}

impl AppConfig {
    /// Reads `JODOH_MATCHING__*` environment variables, e.g.
    /// `JODOH_MATCHING__DATABASE_URL`.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("JODOH_MATCHING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn selection_options(&self) -> SelectionOptions {
        SelectionOptions {
            mutual_preference: self.mutual_preference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_uses_defaults() {
        let config: AppConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 3003);
        assert_eq!(config.db_pool_size, 10);
        assert!(config.database_url.is_none());
        assert!(!config.selection_options().mutual_preference);
    }

    #[test]
    fn overrides_are_applied() {
        let config: AppConfig = config::Config::builder()
            .set_override("port", 8080)
            .unwrap()
            .set_override("database_url", "postgres://localhost/jodoh")
            .unwrap()
            .set_override("mutual_preference", true)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/jodoh"));
        assert!(config.selection_options().mutual_preference);
    }
}
