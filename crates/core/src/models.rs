use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PolicyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Tier for a count of triggered risk factors: 4+ is high, 2-3 medium, 0-1 low.
    pub fn from_factor_count(count: usize) -> Self {
        if count >= 4 {
            Self::High
        } else if count >= 2 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Permit,
    Legal,
    Insurance,
    Visa,
    Consent,
}

impl DocumentCategory {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Permit => "permit",
            Self::Legal => "legal",
            Self::Insurance => "insurance",
            Self::Visa => "visa",
            Self::Consent => "consent",
        }
    }
}

/// Upper-cased, non-empty country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(value: impl Into<String>) -> Result<Self, PolicyError> {
        let normalized = value.into().trim().to_uppercase();
        if normalized.is_empty() {
            return Err(PolicyError::InvalidConfiguration(
                "country code must not be empty".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitRequirements {
    pub required: bool,
    pub authority: String,
    pub lead_time: String,
    #[serde(default)]
    pub public_space_restrictions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DronePolicy {
    pub allowed: bool,
    pub requires_license: bool,
    pub license_type: String,
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(default)]
    pub night_flying: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRequirements {
    pub minors: String,
    pub general: String,
    pub property_releases: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPermitRequirements {
    pub foreign_crew_required: bool,
    pub visa_type: String,
    pub processing_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceMinimums {
    pub general_liability: String,
    pub workers_comp: String,
    #[serde(default)]
    pub equipment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionRecord {
    pub country_code: CountryCode,
    pub country_name: String,
    pub permits: PermitRequirements,
    pub drone_policy: DronePolicy,
    pub consent: ConsentRequirements,
    pub work_permits: WorkPermitRequirements,
    pub insurance: InsuranceMinimums,
    #[serde(default)]
    pub noise_restrictions: String,
    #[serde(default)]
    pub union_rules: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalSensitivityRecord {
    pub country_code: CountryCode,
    #[serde(default)]
    pub religious_considerations: Vec<String>,
    #[serde(default)]
    pub political_restrictions: Vec<String>,
    #[serde(default)]
    pub social_norms: Vec<String>,
    #[serde(default)]
    pub holidays: Vec<String>,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityOverrideRecord {
    pub city: String,
    pub country: CountryCode,
    #[serde(default)]
    pub additional_permits: Vec<String>,
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(default)]
    pub fees: String,
    #[serde(default)]
    pub contacts: Vec<String>,
}

impl CityOverrideRecord {
    pub fn applies_to(&self, country: &CountryCode) -> bool {
        &self.country == country
    }
}

/// Raw caller input, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefRequest {
    /// Missing or null is kept as empty so normalization reports it.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country_code: String,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub has_drones: bool,
    #[serde(default)]
    pub has_minors: bool,
    #[serde(default)]
    pub has_foreign_crew: bool,
    #[serde(default)]
    pub shoot_date: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionConfiguration {
    pub country_code: CountryCode,
    pub city_name: Option<String>,
    pub has_drones: bool,
    pub has_minors: bool,
    pub has_foreign_crew: bool,
    pub shoot_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChecklistItem {
    pub document: String,
    pub required: bool,
    pub lead_time: String,
    pub notes: String,
    pub category: DocumentCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    Drones,
    Minors,
    ForeignCrew,
    CulturalSensitivity,
    CityRestrictions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskFactorKind,
    pub factor: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub factors: Vec<RiskFactor>,
    pub overall_risk: RiskLevel,
}

impl RiskAssessment {
    pub fn factor_texts(&self) -> Vec<&str> {
        self.factors.iter().map(|f| f.factor.as_str()).collect()
    }

    pub fn recommendations(&self) -> Vec<&str> {
        self.factors
            .iter()
            .map(|f| f.recommendation.as_str())
            .collect()
    }

    pub fn has(&self, kind: RiskFactorKind) -> bool {
        self.factors.iter().any(|f| f.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CityResolution {
    NotRequested,
    Applied,
    NotFound,
    CountryMismatch { override_country: CountryCode },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub country_name: String,
    pub country_code: CountryCode,
    pub city: Option<String>,
    pub city_resolution: CityResolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyBrief {
    pub brief_id: Uuid,
    pub location: ResolvedLocation,
    pub configuration: ProductionConfiguration,
    pub jurisdiction: Option<JurisdictionRecord>,
    pub cultural_sensitivity: Option<CulturalSensitivityRecord>,
    pub city_override: Option<CityOverrideRecord>,
    pub checklist: Vec<DocumentChecklistItem>,
    pub risk: RiskAssessment,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefSummary {
    pub location: String,
    pub total_documents: usize,
    pub required_documents: usize,
    pub risk_factors: usize,
    pub overall_risk: RiskLevel,
}

impl PolicyBrief {
    pub fn required_documents(&self) -> impl Iterator<Item = &DocumentChecklistItem> {
        self.checklist.iter().filter(|item| item.required)
    }

    pub fn items_in(
        &self,
        category: DocumentCategory,
    ) -> impl Iterator<Item = &DocumentChecklistItem> {
        self.checklist
            .iter()
            .filter(move |item| item.category == category)
    }

    pub fn summary(&self) -> BriefSummary {
        let location = match &self.location.city {
            Some(city) => format!(
                "{}, {} ({})",
                city, self.location.country_name, self.location.country_code
            ),
            None => format!(
                "{} ({})",
                self.location.country_name, self.location.country_code
            ),
        };

        BriefSummary {
            location,
            total_documents: self.checklist.len(),
            required_documents: self.required_documents().count(),
            risk_factors: self.risk.factors.len(),
            overall_risk: self.risk.overall_risk,
        }
    }
}

/// Listing entry for one country in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub country_code: CountryCode,
    pub country_name: String,
    pub cities: Vec<String>,
    pub has_cultural_profile: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_tier_thresholds_are_exact() {
        assert_eq!(RiskLevel::from_factor_count(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_factor_count(1), RiskLevel::Low);
        assert_eq!(RiskLevel::from_factor_count(2), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_factor_count(3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_factor_count(4), RiskLevel::High);
        assert_eq!(RiskLevel::from_factor_count(5), RiskLevel::High);
    }

    #[test]
    fn country_code_is_trimmed_and_upper_cased() {
        let code = CountryCode::new("  us ").unwrap();
        assert_eq!(code.as_str(), "US");
        assert!(CountryCode::new("   ").is_err());
    }

    #[test]
    fn country_code_deserialization_validates() {
        let parsed: Result<CountryCode, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let parsed: CountryCode = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(parsed.as_str(), "FR");
    }

    #[test]
    fn absent_or_null_country_reads_as_empty() {
        let missing: BriefRequest = serde_json::from_str(r#"{"has_drones":true}"#).unwrap();
        assert_eq!(missing.country_code, "");
        assert!(missing.has_drones);

        let null: BriefRequest = serde_json::from_str(r#"{"country_code":null}"#).unwrap();
        assert_eq!(null.country_code, "");
    }
}
