use std::env;
use std::path::PathBuf;

use scout_core::CityScope;
use tracing::warn;

pub const DEFAULT_CATALOG_PATH: &str = "data/jurisdictions.json";

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub city_scope: CityScope,
    pub catalog_path: PathBuf,
    pub database_url: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            city_scope: CityScope::Lenient,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            database_url: None,
        }
    }
}

impl EngineSettings {
    /// Unset or blank variables keep the [`Default`] values.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let city_scope = match env::var("SCOUT_CITY_SCOPE") {
            Ok(value) => CityScope::parse(&value).unwrap_or_else(|| {
                warn!(value = %value, "unrecognized SCOUT_CITY_SCOPE, using default");
                defaults.city_scope
            }),
            Err(_) => defaults.city_scope,
        };

        let catalog_path = env::var("SCOUT_JURISDICTIONS_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.catalog_path);

        let database_url = env::var("SCOUT_DATABASE_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            city_scope,
            catalog_path,
            database_url,
        }
    }
}
