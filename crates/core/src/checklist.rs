use crate::models::{
    CityOverrideRecord, DocumentCategory, DocumentChecklistItem, JurisdictionRecord,
    ProductionConfiguration,
};

const GENERIC_LEAD_TIME: &str = "Check with local authorities";
const GENERIC_AUTHORITY: &str = "Local film office or municipal authority";
const GENERIC_NOTE: &str = "Confirm local requirements";

/// Builds the document checklist in a fixed order: country permit, base
/// insurance, drone, minors, foreign crew, releases, then city permits.
/// `city` must already be scoped to the configured country.
pub fn compose_checklist(
    record: Option<&JurisdictionRecord>,
    config: &ProductionConfiguration,
    city: Option<&CityOverrideRecord>,
) -> Vec<DocumentChecklistItem> {
    let mut items = Vec::new();

    // A missing record keeps the permit with generic details.
    if record.map_or(true, |r| r.permits.required) {
        items.push(item(
            DocumentCategory::Permit,
            "Filming Permit",
            true,
            record.map_or(GENERIC_LEAD_TIME, |r| r.permits.lead_time.as_str()),
            record.map_or(GENERIC_AUTHORITY.to_string(), |r| {
                r.permits.authority.clone()
            }),
        ));
    }

    items.push(item(
        DocumentCategory::Insurance,
        "General Liability Insurance",
        true,
        "1-2 weeks",
        record.map_or(
            "Minimum coverage varies by jurisdiction".to_string(),
            |r| format!("Minimum: {}", r.insurance.general_liability),
        ),
    ));

    items.push(item(
        DocumentCategory::Insurance,
        "Workers Compensation",
        true,
        "1-2 weeks",
        record.map_or("Required".to_string(), |r| r.insurance.workers_comp.clone()),
    ));

    if config.has_drones {
        items.push(item(
            DocumentCategory::Permit,
            "Drone Pilot License",
            record.map_or(true, |r| r.drone_policy.requires_license),
            "2-4 weeks",
            record.map_or(GENERIC_NOTE.to_string(), |r| {
                if r.drone_policy.allowed {
                    r.drone_policy.license_type.clone()
                } else {
                    format!(
                        "Drone filming is generally not permitted; {}",
                        r.drone_policy.license_type
                    )
                }
            }),
        ));
        items.push(item(
            DocumentCategory::Permit,
            "Drone Flight Authorization",
            true,
            "1-2 weeks",
            record
                .filter(|r| !r.drone_policy.restrictions.is_empty())
                .map_or(
                    "Airspace authorization for each flight location".to_string(),
                    |r| r.drone_policy.restrictions.join("; "),
                ),
        ));
        items.push(item(
            DocumentCategory::Insurance,
            "Drone Insurance",
            true,
            "1 week",
            "Aviation liability coverage for unmanned aircraft".to_string(),
        ));
    }

    if config.has_minors {
        items.push(item(
            DocumentCategory::Consent,
            "Parental Consent Forms",
            true,
            "Before shoot",
            record.map_or(GENERIC_NOTE.to_string(), |r| r.consent.minors.clone()),
        ));
        items.push(item(
            DocumentCategory::Legal,
            "Child Work Permit",
            true,
            "2-4 weeks",
            "Required for every performer under 18".to_string(),
        ));
        items.push(item(
            DocumentCategory::Legal,
            "Studio Teacher / Welfare Worker",
            true,
            "1 week",
            "Must be on set whenever minors are working".to_string(),
        ));
    }

    if config.has_foreign_crew {
        items.push(item(
            DocumentCategory::Visa,
            "Work Visas",
            record.map_or(true, |r| r.work_permits.foreign_crew_required),
            record.map_or(GENERIC_LEAD_TIME, |r| {
                r.work_permits.processing_time.as_str()
            }),
            record.map_or(GENERIC_NOTE.to_string(), |r| {
                r.work_permits.visa_type.clone()
            }),
        ));
        items.push(item(
            DocumentCategory::Legal,
            "Equipment Carnet (ATA)",
            true,
            "2-3 weeks",
            "Temporary import of professional equipment".to_string(),
        ));
    }

    items.push(item(
        DocumentCategory::Consent,
        "Model Releases",
        true,
        "Before shoot",
        record.map_or("Signed release for everyone on camera".to_string(), |r| {
            r.consent.general.clone()
        }),
    ));
    items.push(item(
        DocumentCategory::Consent,
        "Location Releases / Property Agreements",
        true,
        "Before shoot",
        record.map_or("Written agreement with each property owner".to_string(), |r| {
            r.consent.property_releases.clone()
        }),
    ));

    if let Some(city) = city {
        for permit in &city.additional_permits {
            items.push(item(
                DocumentCategory::Permit,
                permit,
                true,
                GENERIC_LEAD_TIME,
                format!("city-specific requirement for {}", city.city),
            ));
        }
    }

    items
}

fn item(
    category: DocumentCategory,
    document: &str,
    required: bool,
    lead_time: &str,
    notes: String,
) -> DocumentChecklistItem {
    DocumentChecklistItem {
        document: document.to_string(),
        required,
        lead_time: lead_time.to_string(),
        notes,
        category,
    }
}
