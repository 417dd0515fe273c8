use crate::models::{
    CityOverrideRecord, CountryCode, CountrySummary, CulturalSensitivityRecord,
    JurisdictionRecord,
};

/// Read-only jurisdiction data. Implementations load once and answer lookups
/// without blocking; `city_override` returns whatever is stored under the name,
/// callers check the owning country before using it.
pub trait JurisdictionRepository: Send + Sync {
    fn country(&self, code: &CountryCode) -> Option<&JurisdictionRecord>;
    fn cultural_sensitivity(&self, code: &CountryCode) -> Option<&CulturalSensitivityRecord>;
    fn city_override(&self, city: &str) -> Option<&CityOverrideRecord>;
    fn countries(&self) -> Vec<CountrySummary>;
}

impl<T: JurisdictionRepository + ?Sized> JurisdictionRepository for std::sync::Arc<T> {
    fn country(&self, code: &CountryCode) -> Option<&JurisdictionRecord> {
        (**self).country(code)
    }

    fn cultural_sensitivity(&self, code: &CountryCode) -> Option<&CulturalSensitivityRecord> {
        (**self).cultural_sensitivity(code)
    }

    fn city_override(&self, city: &str) -> Option<&CityOverrideRecord> {
        (**self).city_override(city)
    }

    fn countries(&self) -> Vec<CountrySummary> {
        (**self).countries()
    }
}
