use anyhow::{Context, Result};
use scout_core::{normalize_text, CityOverrideRecord, CulturalSensitivityRecord, JurisdictionRecord};
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};

use crate::catalog::{CatalogDocument, JurisdictionCatalog};

const KIND_COUNTRY: &str = "country";
const KIND_CULTURAL: &str = "cultural";
const KIND_CITY: &str = "city";

/// Jurisdiction records kept as JSON bodies in SQLite. Only read at load time;
/// lookups are served by the [`JurisdictionCatalog`] it produces.
#[derive(Clone)]
pub struct SqliteJurisdictionSource {
    pool: SqlitePool,
}

impl SqliteJurisdictionSource {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // every in-memory connection is its own database
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            4
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .with_context(|| format!("failed connecting to sqlite at {}", database_url))?;

        let source = Self { pool };
        source.ensure_schema().await?;
        Ok(source)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jurisdiction_records (
              kind TEXT NOT NULL,
              record_key TEXT NOT NULL,
              body_json TEXT NOT NULL,
              PRIMARY KEY (kind, record_key)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn upsert_country(&self, record: &JurisdictionRecord) -> Result<()> {
        self.upsert(KIND_COUNTRY, record.country_code.as_str(), record)
            .await
    }

    pub async fn upsert_cultural(&self, record: &CulturalSensitivityRecord) -> Result<()> {
        self.upsert(KIND_CULTURAL, record.country_code.as_str(), record)
            .await
    }

    pub async fn upsert_city(&self, record: &CityOverrideRecord) -> Result<()> {
        self.upsert(KIND_CITY, &normalize_text(&record.city).to_lowercase(), record)
            .await
    }

    pub async fn import_document(&self, document: &CatalogDocument) -> Result<()> {
        for record in &document.countries {
            self.upsert_country(record).await?;
        }
        for record in &document.cultural {
            self.upsert_cultural(record).await?;
        }
        for record in &document.cities {
            self.upsert_city(record).await?;
        }
        Ok(())
    }

    pub async fn load_catalog(&self) -> Result<JurisdictionCatalog> {
        let rows = sqlx::query(
            r#"
            SELECT kind, record_key, body_json
            FROM jurisdiction_records
            ORDER BY kind, record_key
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut document = CatalogDocument::default();
        for row in rows {
            let kind: String = row.get("kind");
            let key: String = row.get("record_key");
            let body: String = row.get("body_json");

            match kind.as_str() {
                KIND_COUNTRY => document.countries.push(
                    serde_json::from_str(&body)
                        .with_context(|| format!("malformed country record {key}"))?,
                ),
                KIND_CULTURAL => document.cultural.push(
                    serde_json::from_str(&body)
                        .with_context(|| format!("malformed cultural record {key}"))?,
                ),
                KIND_CITY => document.cities.push(
                    serde_json::from_str(&body)
                        .with_context(|| format!("malformed city record {key}"))?,
                ),
                other => anyhow::bail!("unknown jurisdiction record kind '{other}'"),
            }
        }

        Ok(JurisdictionCatalog::from_document(document)?)
    }

    async fn upsert<T: Serialize>(&self, kind: &str, key: &str, record: &T) -> Result<()> {
        let body = serde_json::to_string(record)?;

        sqlx::query(
            r#"
            INSERT INTO jurisdiction_records (kind, record_key, body_json)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(kind, record_key) DO UPDATE SET
              body_json=excluded.body_json
            "#,
        )
        .bind(kind)
        .bind(key)
        .bind(body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
