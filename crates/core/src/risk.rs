use crate::models::{
    CityOverrideRecord, CulturalSensitivityRecord, ProductionConfiguration, RiskAssessment,
    RiskFactor, RiskFactorKind, RiskLevel,
};

pub fn assess_risk(
    config: &ProductionConfiguration,
    cultural: Option<&CulturalSensitivityRecord>,
    city: Option<&CityOverrideRecord>,
) -> RiskAssessment {
    let mut factors = Vec::new();

    if config.has_drones {
        factors.push(factor(
            RiskFactorKind::Drones,
            "Drone operations increase regulatory complexity".to_string(),
            "Hire certified drone operator with local experience",
        ));
    }

    if config.has_minors {
        factors.push(factor(
            RiskFactorKind::Minors,
            "Working with minors requires additional compliance".to_string(),
            "Ensure welfare worker/studio teacher is booked",
        ));
    }

    if config.has_foreign_crew {
        factors.push(factor(
            RiskFactorKind::ForeignCrew,
            "Foreign crew requires visa processing time".to_string(),
            "Start visa applications immediately",
        ));
    }

    if cultural.is_some_and(|c| c.risk_level >= RiskLevel::Medium) {
        factors.push(factor(
            RiskFactorKind::CulturalSensitivity,
            "Location has cultural/religious sensitivities".to_string(),
            "Hire local cultural advisor/fixer",
        ));
    }

    if let Some(city) = city.filter(|c| !c.restrictions.is_empty()) {
        factors.push(factor(
            RiskFactorKind::CityRestrictions,
            format!("{} has specific filming restrictions", city.city),
            "Contact local film commission early",
        ));
    }

    let overall_risk = RiskLevel::from_factor_count(factors.len());
    RiskAssessment {
        factors,
        overall_risk,
    }
}

fn factor(kind: RiskFactorKind, text: String, recommendation: &str) -> RiskFactor {
    RiskFactor {
        kind,
        factor: text,
        recommendation: recommendation.to_string(),
    }
}
