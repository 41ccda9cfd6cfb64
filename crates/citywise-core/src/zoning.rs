use crate::error::{CityWiseError, Result};
use crate::requirement::{Requirement, RequirementOrigin};
use crate::types::{Discipline, ProjectType};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ZoningValue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoningValue {
    Number(f64),
    Text(String),
}

impl ZoningValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ZoningValue::Number(n) => Some(*n),
            ZoningValue::Text(_) => None,
        }
    }
}

impl fmt::Display for ZoningValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoningValue::Number(n) => write!(f, "{n}"),
            ZoningValue::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// ZoningRule
// ---------------------------------------------------------------------------

/// A hard constraint (setback, height, coverage...) stored against a district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoningRule {
    pub category: String,
    pub name: String,
    pub value: ZoningValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Empty applies to every project type.
    #[serde(default)]
    pub project_types: Vec<ProjectType>,
    #[serde(default)]
    pub description: String,
}

impl ZoningRule {
    pub fn applies_to(&self, project_type: ProjectType) -> bool {
        project_type.matches(&self.project_types)
    }

    /// "20 ft", "40 %", or the bare value when there is no unit.
    pub fn display_value(&self) -> String {
        match self.unit.as_deref().map(str::trim) {
            Some(unit) if !unit.is_empty() => format!("{} {unit}", self.value),
            _ => self.value.to_string(),
        }
    }

    pub fn to_requirement(&self, district: &str) -> Requirement {
        let description = if self.description.trim().is_empty() {
            format!("{}: {}", self.name, self.display_value())
        } else {
            format!("{} ({})", self.description.trim(), self.display_value())
        };
        Requirement {
            name: self.name.clone(),
            description,
            discipline: Discipline::General,
            required: true,
            origin: RequirementOrigin::Zoning {
                district: district.to_string(),
                category: self.category.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// ZoningDistrict / Municipality
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoningDistrict {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<ZoningRule>,
}

impl ZoningDistrict {
    /// Stored order, filtered by project type.
    pub fn rules_for(&self, project_type: ProjectType) -> Vec<&ZoningRule> {
        self.rules
            .iter()
            .filter(|r| r.applies_to(project_type))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub districts: Vec<ZoningDistrict>,
}

impl Municipality {
    pub fn covers(&self, jurisdiction: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(jurisdiction.trim())
    }

    pub fn district(&self, code: &str) -> Result<&ZoningDistrict> {
        self.districts
            .iter()
            .find(|d| d.code.eq_ignore_ascii_case(code.trim()))
            .ok_or_else(|| CityWiseError::ZoningDistrictNotFound(code.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Setbacks
// ---------------------------------------------------------------------------

/// Minimum distances in feet from each lot line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Setbacks {
    pub front: f64,
    pub rear: f64,
    pub left: f64,
    pub right: f64,
}

impl Setbacks {
    /// Reads numeric `setback` rules whose name mentions front, rear, side,
    /// left or right. Wildcard rules apply first so project-specific ones
    /// override them.
    pub fn from_rules(rules: &[ZoningRule], project_type: ProjectType) -> Self {
        let mut setbacks = Setbacks::default();
        let general = rules.iter().filter(|r| r.project_types.is_empty());
        let specific = rules
            .iter()
            .filter(|r| !r.project_types.is_empty() && r.applies_to(project_type));

        for rule in general.chain(specific) {
            if !rule.category.eq_ignore_ascii_case("setback") {
                continue;
            }
            let Some(feet) = rule.value.as_number() else {
                continue;
            };
            let name = rule.name.to_ascii_lowercase();
            if name.contains("front") {
                setbacks.front = feet;
            } else if name.contains("rear") {
                setbacks.rear = feet;
            } else if name.contains("left") {
                setbacks.left = feet;
            } else if name.contains("right") {
                setbacks.right = feet;
            } else if name.contains("side") {
                setbacks.left = feet;
                setbacks.right = feet;
            }
        }
        setbacks
    }
}

// ---------------------------------------------------------------------------
// Phoenix seed
// ---------------------------------------------------------------------------

fn num(category: &str, name: &str, value: f64, unit: &str, description: &str) -> ZoningRule {
    ZoningRule {
        category: category.to_string(),
        name: name.to_string(),
        value: ZoningValue::Number(value),
        unit: Some(unit.to_string()),
        project_types: Vec::new(),
        description: description.to_string(),
    }
}

fn only(mut rule: ZoningRule, types: &[ProjectType]) -> ZoningRule {
    rule.project_types = types.to_vec();
    rule
}

struct DistrictSeed {
    code: &'static str,
    name: &'static str,
    min_lot: f64,
    front: f64,
    rear: f64,
    side: f64,
    coverage: f64,
}

fn single_family(seed: &DistrictSeed) -> ZoningDistrict {
    ZoningDistrict {
        code: seed.code.to_string(),
        name: seed.name.to_string(),
        rules: vec![
            ZoningRule {
                category: "use".to_string(),
                name: "Permitted Use".to_string(),
                value: ZoningValue::Text("Single-family detached".to_string()),
                unit: None,
                project_types: Vec::new(),
                description: "Primary permitted residential use".to_string(),
            },
            num("lot", "Minimum Lot Area", seed.min_lot, "sq ft", "Minimum lot area"),
            num("setback", "Front Setback", seed.front, "ft", "Minimum front yard"),
            num("setback", "Rear Setback", seed.rear, "ft", "Minimum rear yard"),
            num("setback", "Side Setback", seed.side, "ft", "Minimum side yard, each side"),
            num("height", "Maximum Height", 30.0, "ft", "Maximum building height"),
            num("coverage", "Maximum Lot Coverage", seed.coverage, "%", "Maximum lot coverage"),
            only(
                num("adu", "ADU Maximum Floor Area", 1000.0, "sq ft", "Maximum ADU floor area"),
                &[ProjectType::Adu],
            ),
            only(
                num("setback", "ADU Rear Setback", 5.0, "ft", "Minimum ADU rear yard"),
                &[ProjectType::Adu],
            ),
            only(
                num("setback", "Pool Setback", 5.0, "ft", "Minimum water's edge to any lot line"),
                &[ProjectType::Pool],
            ),
            only(
                num("height", "Maximum Fence Height", 6.0, "ft", "Maximum rear and side fence height"),
                &[ProjectType::Fence],
            ),
        ],
    }
}

/// Seed values for the common single-family districts. Subject to
/// confirmation against the current Phoenix Zoning Ordinance.
pub fn phoenix_zoning() -> Municipality {
    let seeds = [
        DistrictSeed {
            code: "RE-35",
            name: "Single-Family Residence (35,000 sq ft)",
            min_lot: 35_000.0,
            front: 40.0,
            rear: 40.0,
            side: 20.0,
            coverage: 20.0,
        },
        DistrictSeed {
            code: "R1-10",
            name: "Single-Family Residence (10,000 sq ft)",
            min_lot: 10_000.0,
            front: 25.0,
            rear: 25.0,
            side: 10.0,
            coverage: 40.0,
        },
        DistrictSeed {
            code: "R1-8",
            name: "Single-Family Residence (8,000 sq ft)",
            min_lot: 8_000.0,
            front: 25.0,
            rear: 25.0,
            side: 10.0,
            coverage: 40.0,
        },
        DistrictSeed {
            code: "R1-6",
            name: "Single-Family Residence (6,000 sq ft)",
            min_lot: 6_000.0,
            front: 20.0,
            rear: 15.0,
            side: 10.0,
            coverage: 50.0,
        },
    ];

    Municipality {
        name: "Phoenix".to_string(),
        state: "AZ".to_string(),
        districts: seeds.iter().map(single_family).collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_lookup_is_case_insensitive() {
        let phx = phoenix_zoning();
        assert_eq!(phx.district("r1-6").unwrap().code, "R1-6");
        let err = phx.district("C-2").unwrap_err();
        assert!(matches!(err, CityWiseError::ZoningDistrictNotFound(ref c) if c == "C-2"));
    }

    #[test]
    fn rules_filtered_by_project_type_keep_order() {
        let phx = phoenix_zoning();
        let district = phx.district("R1-6").unwrap();

        let remodel: Vec<_> = district
            .rules_for(ProjectType::Remodel)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(remodel.len(), 7);
        assert_eq!(remodel[0], "Permitted Use");
        assert!(!remodel.contains(&"ADU Maximum Floor Area"));

        let adu: Vec<_> = district
            .rules_for(ProjectType::Adu)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(adu.len(), 9);
        assert_eq!(adu[7], "ADU Maximum Floor Area");
    }

    #[test]
    fn setbacks_specific_rules_override_general() {
        let phx = phoenix_zoning();
        let rules = &phx.district("R1-6").unwrap().rules;

        let house = Setbacks::from_rules(rules, ProjectType::Addition);
        assert_eq!(
            house,
            Setbacks {
                front: 20.0,
                rear: 15.0,
                left: 10.0,
                right: 10.0
            }
        );

        let adu = Setbacks::from_rules(rules, ProjectType::Adu);
        assert_eq!(adu.rear, 5.0);
        assert_eq!(adu.front, 20.0);

        // "Pool Setback" names no side, so it is ignored.
        let pool = Setbacks::from_rules(rules, ProjectType::Pool);
        assert_eq!(pool, house);
    }

    #[test]
    fn zoning_rule_becomes_general_requirement() {
        let rule = num("setback", "Front Setback", 20.0, "ft", "Minimum front yard");
        let req = rule.to_requirement("R1-6");
        assert_eq!(req.name, "Front Setback");
        assert_eq!(req.description, "Minimum front yard (20 ft)");
        assert_eq!(req.discipline, Discipline::General);
        assert_eq!(
            req.origin,
            RequirementOrigin::Zoning {
                district: "R1-6".to_string(),
                category: "setback".to_string()
            }
        );

        let bare = ZoningRule {
            unit: None,
            description: String::new(),
            value: ZoningValue::Text("Single-family detached".to_string()),
            ..rule
        };
        assert_eq!(
            bare.to_requirement("R1-6").description,
            "Front Setback: Single-family detached"
        );
    }

    #[test]
    fn municipality_yaml_roundtrip() {
        let phx = phoenix_zoning();
        let yaml = serde_yaml::to_string(&phx).unwrap();
        assert!(yaml.contains("code: R1-6"));
        let parsed: Municipality = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, phx);
        assert!(parsed.covers("PHOENIX"));
    }
}
