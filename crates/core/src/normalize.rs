use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::models::{
    BriefRequest, CityOverrideRecord, CityResolution, CountryCode, ProductionConfiguration,
};
use crate::repository::JurisdictionRepository;

/// How a city that cannot be applied to the selected country is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityScope {
    /// Unknown or mismatched cities are dropped from the brief.
    #[default]
    Lenient,
    /// Unknown or mismatched cities fail the request.
    Strict,
}

impl CityScope {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

pub fn normalize_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_request(request: &BriefRequest) -> Result<ProductionConfiguration, PolicyError> {
    let country_code = CountryCode::new(request.country_code.as_str())?;

    let city_name = request
        .city_name
        .as_deref()
        .map(normalize_text)
        .filter(|city| !city.is_empty());

    let shoot_date = match request.shoot_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            PolicyError::InvalidConfiguration(format!(
                "shoot date '{raw}' is not a YYYY-MM-DD date"
            ))
        })?),
    };

    Ok(ProductionConfiguration {
        country_code,
        city_name,
        has_drones: request.has_drones,
        has_minors: request.has_minors,
        has_foreign_crew: request.has_foreign_crew,
        shoot_date,
    })
}

/// Finds the override for the configured city, if it belongs to the configured
/// country. Under [`CityScope::Strict`] an unusable city is an error.
pub fn resolve_city_override<'r, R>(
    repo: &'r R,
    config: &ProductionConfiguration,
    scope: CityScope,
) -> Result<(Option<&'r CityOverrideRecord>, CityResolution), PolicyError>
where
    R: JurisdictionRepository + ?Sized,
{
    let Some(city) = config.city_name.as_deref() else {
        return Ok((None, CityResolution::NotRequested));
    };

    let resolution = match repo.city_override(city) {
        Some(found) if found.applies_to(&config.country_code) => {
            return Ok((Some(found), CityResolution::Applied));
        }
        Some(found) => CityResolution::CountryMismatch {
            override_country: found.country.clone(),
        },
        None => CityResolution::NotFound,
    };

    if scope == CityScope::Strict {
        let reason = match &resolution {
            CityResolution::CountryMismatch { override_country } => format!(
                "city '{city}' belongs to {override_country}, not {}",
                config.country_code
            ),
            _ => format!("city '{city}' has no policy data"),
        };
        return Err(PolicyError::InvalidConfiguration(reason));
    }

    Ok((None, resolution))
}
