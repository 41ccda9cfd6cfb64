use crate::types::Discipline;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RequirementOrigin
// ---------------------------------------------------------------------------

/// Where a requirement came from. Entries supplied by the caller without an
/// origin are treated as user-entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementOrigin {
    /// The unconditional survey every jurisdiction-attached project gets.
    Baseline,
    Rule {
        rule_id: String,
    },
    Zoning {
        district: String,
        category: String,
    },
    #[default]
    Custom,
}

// ---------------------------------------------------------------------------
// Requirement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "type")]
    pub discipline: Discipline,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub origin: RequirementOrigin,
}

fn default_required() -> bool {
    true
}

impl Requirement {
    /// A user-entered entry, as the caller would pass back in.
    pub fn custom(
        name: impl Into<String>,
        description: impl Into<String>,
        discipline: Discipline,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            discipline,
            required: true,
            origin: RequirementOrigin::Custom,
        }
    }

    /// Case-insensitive, whitespace-trimmed name comparison.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.origin, RequirementOrigin::Custom)
    }
}

// ---------------------------------------------------------------------------
// RequirementTemplate
// ---------------------------------------------------------------------------

/// The requirement a rule emits when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementTemplate {
    pub name: String,
    pub description: String,
    pub discipline: Discipline,
    #[serde(default = "default_required")]
    pub required: bool,
}

impl RequirementTemplate {
    pub fn instantiate(&self, origin: RequirementOrigin) -> Requirement {
        Requirement {
            name: self.name.clone(),
            description: self.description.clone(),
            discipline: self.discipline,
            required: self.required,
            origin,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
