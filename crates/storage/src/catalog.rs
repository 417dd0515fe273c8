use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use scout_core::{
    normalize_text, CityOverrideRecord, CountryCode, CountrySummary, CulturalSensitivityRecord,
    JurisdictionRecord, JurisdictionRepository,
};
use serde::{Deserialize, Serialize};

use crate::StorageError;

/// On-disk shape of a jurisdiction catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub countries: Vec<JurisdictionRecord>,
    #[serde(default)]
    pub cultural: Vec<CulturalSensitivityRecord>,
    #[serde(default)]
    pub cities: Vec<CityOverrideRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct JurisdictionCatalog {
    countries: BTreeMap<CountryCode, JurisdictionRecord>,
    cultural: HashMap<CountryCode, CulturalSensitivityRecord>,
    cities: HashMap<String, CityOverrideRecord>,
}

impl JurisdictionCatalog {
    pub fn from_document(document: CatalogDocument) -> Result<Self, StorageError> {
        let mut catalog = Self::default();

        for record in document.countries {
            let code = record.country_code.clone();
            if catalog.countries.insert(code.clone(), record).is_some() {
                return Err(StorageError::DuplicateCountry(code.to_string()));
            }
        }

        for record in document.cultural {
            let code = record.country_code.clone();
            if catalog.cultural.insert(code.clone(), record).is_some() {
                return Err(StorageError::DuplicateCultural(code.to_string()));
            }
        }

        for record in document.cities {
            let key = city_key(&record.city);
            if key.is_empty() {
                return Err(StorageError::InvalidRecord(
                    "city override with empty name".to_string(),
                ));
            }
            if catalog.cities.contains_key(&key) {
                return Err(StorageError::DuplicateCity(record.city));
            }
            catalog.cities.insert(key, record);
        }

        Ok(catalog)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, StorageError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn to_document(&self) -> CatalogDocument {
        let mut cultural = self.cultural.values().cloned().collect::<Vec<_>>();
        cultural.sort_by(|a, b| a.country_code.cmp(&b.country_code));
        let mut cities = self.cities.values().cloned().collect::<Vec<_>>();
        cities.sort_by(|a, b| a.city.cmp(&b.city));

        CatalogDocument {
            countries: self.countries.values().cloned().collect(),
            cultural,
            cities,
        }
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl JurisdictionRepository for JurisdictionCatalog {
    fn country(&self, code: &CountryCode) -> Option<&JurisdictionRecord> {
        self.countries.get(code)
    }

    fn cultural_sensitivity(&self, code: &CountryCode) -> Option<&CulturalSensitivityRecord> {
        self.cultural.get(code)
    }

    fn city_override(&self, city: &str) -> Option<&CityOverrideRecord> {
        self.cities.get(&city_key(city))
    }

    fn countries(&self) -> Vec<CountrySummary> {
        self.countries
            .values()
            .map(|record| {
                let mut cities = self
                    .cities
                    .values()
                    .filter(|city| city.applies_to(&record.country_code))
                    .map(|city| city.city.clone())
                    .collect::<Vec<_>>();
                cities.sort();

                CountrySummary {
                    country_code: record.country_code.clone(),
                    country_name: record.country_name.clone(),
                    cities,
                    has_cultural_profile: self.cultural.contains_key(&record.country_code),
                }
            })
            .collect()
    }
}

fn city_key(city: &str) -> String {
    normalize_text(city).to_lowercase()
}
