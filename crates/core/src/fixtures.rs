use crate::models::{
    CityOverrideRecord, ConsentRequirements, CountryCode, CountrySummary,
    CulturalSensitivityRecord, DronePolicy, InsuranceMinimums, JurisdictionRecord,
    PermitRequirements, ProductionConfiguration, RiskLevel, WorkPermitRequirements,
};
use crate::repository::JurisdictionRepository;

pub fn code(value: &str) -> CountryCode {
    CountryCode::new(value).unwrap()
}

pub fn config(drones: bool, minors: bool, crew: bool) -> ProductionConfiguration {
    ProductionConfiguration {
        country_code: code("US"),
        city_name: None,
        has_drones: drones,
        has_minors: minors,
        has_foreign_crew: crew,
        shoot_date: None,
    }
}

pub fn record(country: &str, name: &str) -> JurisdictionRecord {
    JurisdictionRecord {
        country_code: code(country),
        country_name: name.to_string(),
        permits: PermitRequirements {
            required: true,
            authority: format!("{name} Film Office"),
            lead_time: "2-4 weeks".to_string(),
            public_space_restrictions: "Permits required for streets and parks".to_string(),
        },
        drone_policy: DronePolicy {
            allowed: true,
            requires_license: true,
            license_type: "Remote Pilot Certificate".to_string(),
            restrictions: vec![
                "Below 400ft".to_string(),
                "Visual line of sight".to_string(),
            ],
            night_flying: "Requires waiver".to_string(),
        },
        consent: ConsentRequirements {
            minors: "Parent or guardian signature required".to_string(),
            general: "Written release for identifiable people".to_string(),
            property_releases: "Owner agreement for private property".to_string(),
        },
        work_permits: WorkPermitRequirements {
            foreign_crew_required: true,
            visa_type: "O-1 / P-1".to_string(),
            processing_time: "2-3 months".to_string(),
        },
        insurance: InsuranceMinimums {
            general_liability: "$1,000,000".to_string(),
            workers_comp: "Statutory limits".to_string(),
            equipment: "Replacement value".to_string(),
        },
        noise_restrictions: "Quiet hours 22:00-07:00".to_string(),
        union_rules: vec!["SAG-AFTRA".to_string()],
        notes: String::new(),
    }
}

pub fn us_record() -> JurisdictionRecord {
    record("US", "United States")
}

pub fn cultural_for(country: &str, level: RiskLevel) -> CulturalSensitivityRecord {
    CulturalSensitivityRecord {
        country_code: code(country),
        religious_considerations: vec!["Respect places of worship".to_string()],
        political_restrictions: Vec::new(),
        social_norms: vec!["Modest dress at religious sites".to_string()],
        holidays: Vec::new(),
        risk_level: level,
    }
}

pub fn cultural(level: RiskLevel) -> CulturalSensitivityRecord {
    cultural_for("US", level)
}

pub fn us_city() -> CityOverrideRecord {
    CityOverrideRecord {
        city: "Los Angeles".to_string(),
        country: code("US"),
        additional_permits: vec![
            "FilmLA Permit".to_string(),
            "Fire Safety Officer Approval".to_string(),
        ],
        restrictions: vec!["No filming on freeways without CHP".to_string()],
        fees: "$931 application fee".to_string(),
        contacts: vec!["FilmLA".to_string()],
    }
}

pub fn mismatched_city() -> CityOverrideRecord {
    CityOverrideRecord {
        city: "Paris".to_string(),
        country: code("FR"),
        additional_permits: vec!["Préfecture de Police authorization".to_string()],
        restrictions: vec!["No drones over the city centre".to_string()],
        fees: String::new(),
        contacts: Vec::new(),
    }
}

#[derive(Debug, Default)]
pub struct FixtureRepository {
    pub countries: Vec<JurisdictionRecord>,
    pub cultural: Vec<CulturalSensitivityRecord>,
    pub cities: Vec<CityOverrideRecord>,
}

impl FixtureRepository {
    pub fn standard() -> Self {
        Self {
            countries: vec![us_record(), record("FR", "France")],
            cultural: Vec::new(),
            cities: vec![us_city(), mismatched_city()],
        }
    }
}

impl JurisdictionRepository for FixtureRepository {
    fn country(&self, code: &CountryCode) -> Option<&JurisdictionRecord> {
        self.countries.iter().find(|r| &r.country_code == code)
    }

    fn cultural_sensitivity(&self, code: &CountryCode) -> Option<&CulturalSensitivityRecord> {
        self.cultural.iter().find(|r| &r.country_code == code)
    }

    fn city_override(&self, city: &str) -> Option<&CityOverrideRecord> {
        self.cities
            .iter()
            .find(|r| r.city.eq_ignore_ascii_case(city))
    }

    fn countries(&self) -> Vec<CountrySummary> {
        self.countries
            .iter()
            .map(|r| CountrySummary {
                country_code: r.country_code.clone(),
                country_name: r.country_name.clone(),
                cities: Vec::new(),
                has_cultural_profile: false,
            })
            .collect()
    }
}
