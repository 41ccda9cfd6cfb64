use crate::attributes::ProjectAttributes;
use crate::config::PermitConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermitPath {
    OverTheCounter,
    PlanReview,
}

impl PermitPath {
    pub fn as_str(self) -> &'static str {
        match self {
            PermitPath::OverTheCounter => "OVER_THE_COUNTER",
            PermitPath::PlanReview => "PLAN_REVIEW",
        }
    }
}

impl fmt::Display for PermitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitAssessment {
    pub path: PermitPath,
    /// Why the project cannot go over the counter; empty when it can.
    pub reasons: Vec<String>,
}

/// Over the counter only when the project type is eligible, the size is
/// known and within the threshold (inclusive), and no structural work is
/// involved. Unknown size means plan review.
pub fn assess_permit(attrs: &ProjectAttributes, config: &PermitConfig) -> PermitAssessment {
    let mut reasons = Vec::new();

    if !config.otc_project_types.contains(&attrs.project_type) {
        reasons.push(format!(
            "{} projects are not eligible for over-the-counter review",
            attrs.project_type
        ));
    }
    match attrs.square_footage {
        None => reasons.push("square footage unknown".to_string()),
        Some(sqft) if sqft > config.otc_max_square_feet => reasons.push(format!(
            "{sqft} sq ft exceeds the {} sq ft over-the-counter limit",
            config.otc_max_square_feet
        )),
        Some(_) => {}
    }
    if attrs.structural_changes {
        reasons.push("structural changes require plan review".to_string());
    }

    let path = if reasons.is_empty() {
        PermitPath::OverTheCounter
    } else {
        PermitPath::PlanReview
    };
    PermitAssessment { path, reasons }
}
