use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::checklist::compose_checklist;
use crate::error::PolicyError;
use crate::models::{
    BriefRequest, CityOverrideRecord, CityResolution, CulturalSensitivityRecord,
    DocumentChecklistItem, JurisdictionRecord, PolicyBrief, ProductionConfiguration,
    ResolvedLocation, RiskAssessment,
};
use crate::normalize::{normalize_request, resolve_city_override, CityScope};
use crate::repository::JurisdictionRepository;
use crate::risk::assess_risk;

pub fn generate<R>(repo: &R, request: &BriefRequest) -> Result<PolicyBrief, PolicyError>
where
    R: JurisdictionRepository + ?Sized,
{
    generate_at(repo, request, CityScope::default(), Utc::now())
}

pub fn generate_with_scope<R>(
    repo: &R,
    request: &BriefRequest,
    scope: CityScope,
) -> Result<PolicyBrief, PolicyError>
where
    R: JurisdictionRepository + ?Sized,
{
    generate_at(repo, request, scope, Utc::now())
}

/// Full pipeline with an explicit timestamp. Fails before anything is composed
/// when the request is malformed or the country is unknown.
pub fn generate_at<R>(
    repo: &R,
    request: &BriefRequest,
    scope: CityScope,
    generated_at: DateTime<Utc>,
) -> Result<PolicyBrief, PolicyError>
where
    R: JurisdictionRepository + ?Sized,
{
    let config = normalize_request(request)?;

    let record = repo
        .country(&config.country_code)
        .ok_or_else(|| PolicyError::NotFound(config.country_code.to_string()))?;
    let cultural = repo.cultural_sensitivity(&config.country_code);
    let (city, city_resolution) = resolve_city_override(repo, &config, scope)?;

    let checklist = compose_checklist(Some(record), &config, city);
    let risk = assess_risk(&config, cultural, city);

    Ok(assemble_brief(
        config,
        city_resolution,
        Some(record),
        cultural,
        city,
        checklist,
        risk,
        generated_at,
    ))
}

#[allow(clippy::too_many_arguments)]
pub fn assemble_brief(
    config: ProductionConfiguration,
    city_resolution: CityResolution,
    record: Option<&JurisdictionRecord>,
    cultural: Option<&CulturalSensitivityRecord>,
    city: Option<&CityOverrideRecord>,
    checklist: Vec<DocumentChecklistItem>,
    risk: RiskAssessment,
    generated_at: DateTime<Utc>,
) -> PolicyBrief {
    let location = ResolvedLocation {
        country_name: record.map_or_else(
            || config.country_code.to_string(),
            |r| r.country_name.clone(),
        ),
        country_code: config.country_code.clone(),
        city: city.map(|c| c.city.clone()),
        city_resolution,
    };

    PolicyBrief {
        brief_id: Uuid::new_v4(),
        location,
        configuration: config,
        jurisdiction: record.cloned(),
        cultural_sensitivity: cultural.cloned(),
        city_override: city.cloned(),
        checklist,
        risk,
        generated_at,
    }
}
