mod draft;
mod settings;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use scout_core::{
    generate_with_scope, BriefRequest, CityOverrideRecord, CountryCode, CountrySummary,
    CulturalSensitivityRecord, JurisdictionRecord, JurisdictionRepository, PolicyBrief,
    PolicyError,
};
use scout_observability::EngineMetrics;
use scout_storage::{CatalogSource, JurisdictionCatalog};
use serde::Serialize;
use tracing::{info, instrument, warn};

pub use draft::BriefDraft;
pub use settings::EngineSettings;

#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionDetail {
    pub jurisdiction: JurisdictionRecord,
    pub cultural_sensitivity: Option<CulturalSensitivityRecord>,
    pub cities: Vec<CityOverrideRecord>,
}

pub struct PolicyService<R>
where
    R: JurisdictionRepository,
{
    repo: Arc<R>,
    settings: EngineSettings,
    metrics: Arc<EngineMetrics>,
}

impl<R> Clone for PolicyService<R>
where
    R: JurisdictionRepository,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            settings: self.settings.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<R> PolicyService<R>
where
    R: JurisdictionRepository,
{
    pub fn new(repo: Arc<R>, settings: EngineSettings, metrics: Arc<EngineMetrics>) -> Self {
        Self {
            repo,
            settings,
            metrics,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }

    #[instrument(skip(self, request), fields(country = %request.country_code))]
    pub fn generate(&self, request: &BriefRequest) -> Result<PolicyBrief, PolicyError> {
        let started = Instant::now();
        self.metrics.inc_request();

        let outcome = generate_with_scope(self.repo.as_ref(), request, self.settings.city_scope);
        self.metrics.observe_latency(started.elapsed());

        match &outcome {
            Ok(brief) => {
                self.metrics.record_brief(brief.risk.overall_risk);
                info!(
                    brief_id = %brief.brief_id,
                    city = ?brief.location.city,
                    city_resolution = ?brief.location.city_resolution,
                    documents = brief.checklist.len(),
                    risk = brief.risk.overall_risk.as_code(),
                    "brief generated"
                );
            }
            Err(error @ PolicyError::NotFound(_)) => {
                self.metrics.inc_not_found();
                warn!(%error, "brief rejected");
            }
            Err(error @ PolicyError::InvalidConfiguration(_)) => {
                self.metrics.inc_invalid();
                warn!(%error, "brief rejected");
            }
        }

        outcome
    }

    pub fn jurisdictions(&self) -> Vec<CountrySummary> {
        self.repo.countries()
    }

    pub fn jurisdiction_detail(&self, code: &str) -> Result<JurisdictionDetail, PolicyError> {
        let code = CountryCode::new(code)?;
        let record = self
            .repo
            .country(&code)
            .ok_or_else(|| PolicyError::NotFound(code.to_string()))?;

        let cities = self
            .repo
            .countries()
            .into_iter()
            .find(|summary| summary.country_code == code)
            .map(|summary| summary.cities)
            .unwrap_or_default()
            .iter()
            .filter_map(|name| self.repo.city_override(name))
            .filter(|city| city.applies_to(&code))
            .cloned()
            .collect();

        Ok(JurisdictionDetail {
            jurisdiction: record.clone(),
            cultural_sensitivity: self.repo.cultural_sensitivity(&code).cloned(),
            cities,
        })
    }

    pub fn draft(&self) -> BriefDraft<R> {
        BriefDraft::new(self.clone())
    }
}

/// Loads the catalog once from the configured source: SQLite when a database
/// URL is set, otherwise the JSON catalog file.
pub async fn load_catalog(settings: &EngineSettings) -> Result<JurisdictionCatalog> {
    let source = match settings.database_url.as_deref() {
        Some(url) => CatalogSource::sqlite(url).await?,
        None => CatalogSource::json_file(settings.catalog_path.clone()),
    };

    let catalog = source
        .load()
        .await
        .with_context(|| format!("failed loading jurisdictions from {}", source.describe()))?;

    info!(
        source = %source.describe(),
        countries = catalog.len(),
        "jurisdiction catalog loaded"
    );
    Ok(catalog)
}

pub async fn build_service(settings: EngineSettings) -> Result<PolicyService<JurisdictionCatalog>> {
    let catalog = load_catalog(&settings).await?;
    Ok(PolicyService::new(
        Arc::new(catalog),
        settings,
        EngineMetrics::shared(),
    ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::Arc;

    use scout_core::CityScope;
    use scout_observability::EngineMetrics;
    use scout_storage::JurisdictionCatalog;

    use crate::{EngineSettings, PolicyService};

    pub fn bundled_catalog_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/jurisdictions.json")
    }

    pub fn service(scope: CityScope) -> PolicyService<JurisdictionCatalog> {
        let catalog = JurisdictionCatalog::from_json_file(bundled_catalog_path()).unwrap();
        let settings = EngineSettings {
            city_scope: scope,
            catalog_path: bundled_catalog_path(),
            ..EngineSettings::default()
        };
        PolicyService::new(Arc::new(catalog), settings, EngineMetrics::shared())
    }
}
