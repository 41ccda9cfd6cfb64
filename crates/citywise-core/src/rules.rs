use crate::attributes::{Field, ProjectAttributes};
use crate::config::{ConfigWarning, WarnLevel};
use crate::requirement::RequirementTemplate;
use crate::trigger::{all_hold, gt, is_true, Trigger};
use crate::types::{Discipline, ProjectType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// RequirementRule / RuleSet
// ---------------------------------------------------------------------------

/// Maps a project-type filter plus an AND of triggers to one requirement.
/// OR is expressed by several rules targeting the same requirement name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementRule {
    pub id: String,
    /// Blank inherits the enclosing rule set's jurisdiction.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jurisdiction: String,
    /// Empty means every project type.
    #[serde(default)]
    pub project_types: Vec<ProjectType>,
    pub requirement: RequirementTemplate,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

impl RequirementRule {
    pub fn fires(&self, attrs: &ProjectAttributes) -> bool {
        attrs.project_type.matches(&self.project_types) && all_hold(&self.triggers, attrs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub jurisdiction: String,
    #[serde(default)]
    pub rules: Vec<RequirementRule>,
}

impl RuleSet {
    pub fn covers(&self, jurisdiction: &str) -> bool {
        self.jurisdiction.trim().eq_ignore_ascii_case(jurisdiction.trim())
    }

    /// Rules in definition order whose jurisdiction matches `attrs` and
    /// whose triggers all hold.
    pub fn firing<'a>(
        &'a self,
        attrs: &'a ProjectAttributes,
    ) -> impl Iterator<Item = &'a RequirementRule> + 'a {
        self.rules.iter().filter(move |rule| {
            let jurisdiction = if rule.jurisdiction.trim().is_empty() {
                self.jurisdiction.as_str()
            } else {
                rule.jurisdiction.as_str()
            };
            jurisdiction
                .trim()
                .eq_ignore_ascii_case(attrs.jurisdiction.trim())
                && rule.fires(attrs)
        })
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.jurisdiction.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "rule set has no jurisdiction".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("duplicate rule id '{}'", rule.id),
                });
            }
            if rule.requirement.name.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("rule '{}' targets a requirement with no name", rule.id),
                });
            }
            if !rule.jurisdiction.trim().is_empty() && !self.covers(&rule.jurisdiction) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "rule '{}' is scoped to '{}' inside the '{}' rule set and will never fire",
                        rule.id, rule.jurisdiction, self.jurisdiction
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Baseline
// ---------------------------------------------------------------------------

pub const SURVEY_NAME: &str = "Topographic Survey";

/// Emitted for every project attached to a jurisdiction, ahead of any rule.
pub fn baseline_survey() -> RequirementTemplate {
    RequirementTemplate {
        name: SURVEY_NAME.to_string(),
        description: "Boundary and topographic survey of the parcel sealed by a registered \
                      land surveyor, showing existing structures, easements and grades."
            .to_string(),
        discipline: Discipline::Civil,
        required: true,
    }
}

// ---------------------------------------------------------------------------
// Helper macro for concise rule definitions
// ---------------------------------------------------------------------------

macro_rules! rule {
    (
        id: $id:expr,
        types: [$($t:expr),* $(,)?],
        requirement: ($name:expr, $disc:expr, $desc:expr),
        triggers: [$($trig:expr),* $(,)?]
        $(, required: $req:expr)?
    ) => {
        RequirementRule {
            id: $id.to_string(),
            jurisdiction: String::new(),
            project_types: vec![$($t),*],
            requirement: RequirementTemplate {
                name: $name.to_string(),
                description: $desc.to_string(),
                discipline: $disc,
                required: {
                    #[allow(unused_assignments, unused_mut)]
                    let mut v = true;
                    $(v = $req;)?
                    v
                },
            },
            triggers: vec![$($trig),*],
        }
    };
}

// ---------------------------------------------------------------------------
// Phoenix table (definition order is output order)
// ---------------------------------------------------------------------------

/// Square footage above which conditioned space needs HVAC and energy-code
/// documents. Unconfirmed against the municipal code; kept as a boundary
/// value (strictly greater than).
pub const CONDITIONED_SPACE_THRESHOLD_SQFT: f64 = 200.0;

/// One acre.
pub const LARGE_LOT_SQFT: f64 = 43_560.0;

pub fn phoenix_rules() -> RuleSet {
    use ProjectType::*;

    let rules = vec![
        // 1. Structural: explicit structural work, or a new building shell
        rule! {
            id: "structural-changes",
            types: [],
            requirement: (
                "Structural Engineering Plans",
                Discipline::Structural,
                "Sealed structural drawings and calculations for framing, beams, \
                 headers and foundations affected by the work."
            ),
            triggers: [is_true(Field::StructuralChanges)]
        },
        rule! {
            id: "structural-new-building",
            types: [NewConstruction, Addition, Adu],
            requirement: (
                "Structural Engineering Plans",
                Discipline::Structural,
                "Sealed structural drawings and calculations for the new building shell."
            ),
            triggers: []
        },
        rule! {
            id: "soils-report",
            types: [NewConstruction, Addition, Adu],
            requirement: (
                "Soils Report",
                Discipline::Structural,
                "Geotechnical report for new foundations over 500 sq ft; may be waived \
                 by the plans examiner for standard footings."
            ),
            triggers: [gt(Field::SquareFootage, 500.0)],
            required: false
        },
        // 2. Civil
        rule! {
            id: "civil-new-construction",
            types: [NewConstruction],
            requirement: (
                "Civil Engineering Plans",
                Discipline::Civil,
                "Grading, drainage and utility plans for the site."
            ),
            triggers: []
        },
        rule! {
            id: "civil-large-adu",
            types: [Adu],
            requirement: (
                "Civil Engineering Plans",
                Discipline::Civil,
                "Grading, drainage and utility plans for the site."
            ),
            triggers: [gt(Field::SquareFootage, 800.0)]
        },
        rule! {
            id: "civil-large-addition",
            types: [Addition],
            requirement: (
                "Civil Engineering Plans",
                Discipline::Civil,
                "Grading, drainage and utility plans for the site."
            ),
            triggers: [gt(Field::SquareFootage, 1000.0)]
        },
        rule! {
            id: "grading-large-lot",
            types: [Addition, Adu, Pool],
            requirement: (
                "Grading and Drainage Plan",
                Discipline::Civil,
                "Retention and drainage calculations for lots over one acre."
            ),
            triggers: [gt(Field::LotSize, LARGE_LOT_SQFT)]
        },
        // 3. MEP
        rule! {
            id: "plumbing-work",
            types: [],
            requirement: (
                "Plumbing Plans",
                Discipline::Plumbing,
                "Plumbing layout with fixture units, waste and vent sizing."
            ),
            triggers: [is_true(Field::PlumbingWork)]
        },
        rule! {
            id: "electrical-work",
            types: [],
            requirement: (
                "Electrical Plans",
                Discipline::Electrical,
                "Electrical layout with panel schedule and load calculation."
            ),
            triggers: [is_true(Field::ElectricalWork)]
        },
        rule! {
            id: "solar-electrical",
            types: [Solar],
            requirement: (
                "Electrical Plans",
                Discipline::Electrical,
                "Electrical layout with panel schedule and load calculation."
            ),
            triggers: []
        },
        rule! {
            id: "electrical-service-upgrade",
            types: [],
            requirement: (
                "Electrical Service Upgrade",
                Discipline::Electrical,
                "Utility coordination and service entrance drawings for service above 100 A."
            ),
            triggers: [
                is_true(Field::ElectricalWork),
                gt(Field::ElectricalServiceAmps, 100.0),
            ]
        },
        rule! {
            id: "hvac-conditioned-space",
            types: [Addition, Adu, NewConstruction, GarageConversion],
            requirement: (
                "HVAC Plans",
                Discipline::Mechanical,
                "Mechanical plans with Manual J load calculation for new conditioned space."
            ),
            triggers: [gt(Field::SquareFootage, CONDITIONED_SPACE_THRESHOLD_SQFT)]
        },
        rule! {
            id: "energy-code",
            types: [Addition, Adu, NewConstruction, GarageConversion],
            requirement: (
                "Energy Code Compliance",
                Discipline::General,
                "IECC compliance documentation for the building envelope and equipment."
            ),
            triggers: [gt(Field::SquareFootage, CONDITIONED_SPACE_THRESHOLD_SQFT)]
        },
        // 4. Project-type specific
        rule! {
            id: "pool-barrier",
            types: [Pool],
            requirement: (
                "Pool Barrier Plan",
                Discipline::General,
                "Barrier, gate and alarm details meeting the residential pool safety ordinance."
            ),
            triggers: []
        },
        rule! {
            id: "demolition-plan",
            types: [Demolition],
            requirement: (
                "Demolition Plan",
                Discipline::General,
                "Site plan of structures to be removed and utility disconnect letters."
            ),
            triggers: []
        },
    ];

    RuleSet {
        jurisdiction: "Phoenix".to_string(),
        rules,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
