use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no policy data available for country {0}")]
    NotFound(String),
}

impl PolicyError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::NotFound(_) => "jurisdiction_not_found",
        }
    }
}
