pub mod brief;
pub mod checklist;
pub mod error;
pub mod models;
pub mod normalize;
pub mod repository;
pub mod risk;

#[cfg(test)]
mod fixtures;

pub use brief::{assemble_brief, generate, generate_at, generate_with_scope};
pub use checklist::compose_checklist;
pub use error::PolicyError;
pub use models::*;
pub use normalize::{normalize_request, normalize_text, resolve_city_override, CityScope};
pub use repository::JurisdictionRepository;
pub use risk::assess_risk;
