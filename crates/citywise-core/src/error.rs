use thiserror::Error;

#[derive(Debug, Error)]
pub enum CityWiseError {
    /// The requirement-rule or zoning table for a jurisdiction could not be
    /// loaded. Never downgraded to an empty result: an empty checklist reads
    /// as "nothing required".
    #[error("rule set unavailable for jurisdiction '{jurisdiction}': {reason}")]
    RuleSetUnavailable {
        jurisdiction: String,
        reason: String,
    },

    #[error("zoning district not found: {0}")]
    ZoningDistrictNotFound(String),

    #[error("invalid project type: {0}")]
    InvalidProjectType(String),

    #[error("invalid discipline: {0}")]
    InvalidDiscipline(String),

    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    #[error("unknown property field: {0}")]
    InvalidPropertyField(String),

    #[error("invalid data source '{0}': expected 'assessor' or 'regrid'")]
    InvalidSource(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CityWiseError {
    pub fn rule_set_unavailable(jurisdiction: &str, reason: impl Into<String>) -> Self {
        CityWiseError::RuleSetUnavailable {
            jurisdiction: jurisdiction.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CityWiseError>;
