mod catalog;
mod sqlite;

use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;

pub use catalog::{CatalogDocument, JurisdictionCatalog};
pub use sqlite::SqliteJurisdictionSource;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed reading catalog at {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("country {0} is defined more than once")]
    DuplicateCountry(String),
    #[error("cultural profile for {0} is defined more than once")]
    DuplicateCultural(String),
    #[error("city override {0} is defined more than once")]
    DuplicateCity(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Where the jurisdiction catalog is loaded from at startup.
#[derive(Clone)]
pub enum CatalogSource {
    JsonFile(PathBuf),
    Sqlite(SqliteJurisdictionSource),
}

impl CatalogSource {
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self::JsonFile(path.into())
    }

    pub async fn sqlite(database_url: &str) -> Result<Self> {
        let source = SqliteJurisdictionSource::connect(database_url).await?;
        Ok(Self::Sqlite(source))
    }

    pub fn describe(&self) -> String {
        match self {
            CatalogSource::JsonFile(path) => format!("json:{}", path.display()),
            CatalogSource::Sqlite(_) => "sqlite".to_string(),
        }
    }

    pub async fn load(&self) -> Result<JurisdictionCatalog> {
        match self {
            CatalogSource::JsonFile(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("failed reading catalog at {}", path.display()))?;
                JurisdictionCatalog::from_json_str(&raw)
                    .with_context(|| format!("failed parsing catalog at {}", path.display()))
            }
            CatalogSource::Sqlite(source) => source.load_catalog().await,
        }
    }
}
