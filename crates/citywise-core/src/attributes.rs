use crate::types::ProjectType;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ProjectAttributes
// ---------------------------------------------------------------------------

/// Canonical description of a project, rebuilt from intake data on every
/// resolution. Never persisted; only the resulting requirements are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAttributes {
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<f64>,
    #[serde(default)]
    pub structural_changes: bool,
    #[serde(default)]
    pub plumbing_work: bool,
    #[serde(default)]
    pub electrical_work: bool,
    /// Only meaningful when `electrical_work` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electrical_service_amps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<f64>,
}

fn non_negative(v: Option<f64>) -> Option<f64> {
    v.filter(|n| n.is_finite() && *n >= 0.0)
}

impl ProjectAttributes {
    pub fn new(project_type: ProjectType, jurisdiction: impl Into<String>) -> Self {
        Self {
            project_type,
            jurisdiction: jurisdiction.into(),
            ..Self::default()
        }
    }

    /// Drop values that violate the record's invariants: negative or
    /// non-finite measurements, and a service rating without electrical work.
    pub fn normalized(mut self) -> Self {
        self.jurisdiction = self.jurisdiction.trim().to_string();
        self.square_footage = non_negative(self.square_footage);
        self.lot_size = non_negative(self.lot_size);
        self.electrical_service_amps = if self.electrical_work {
            non_negative(self.electrical_service_amps)
        } else {
            None
        };
        self
    }

    pub fn has_jurisdiction(&self) -> bool {
        !self.jurisdiction.trim().is_empty()
    }

    /// Current value of `field`, or `None` when unknown.
    pub fn value_of(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::ProjectType => Some(FieldValue::Text(self.project_type.as_str().to_string())),
            Field::Jurisdiction => {
                if self.has_jurisdiction() {
                    Some(FieldValue::Text(self.jurisdiction.clone()))
                } else {
                    None
                }
            }
            Field::SquareFootage => self.square_footage.map(FieldValue::Number),
            Field::StructuralChanges => Some(FieldValue::Bool(self.structural_changes)),
            Field::PlumbingWork => Some(FieldValue::Bool(self.plumbing_work)),
            Field::ElectricalWork => Some(FieldValue::Bool(self.electrical_work)),
            Field::ElectricalServiceAmps => {
                if self.electrical_work {
                    self.electrical_service_amps.map(FieldValue::Number)
                } else {
                    None
                }
            }
            Field::LotSize => self.lot_size.map(FieldValue::Number),
        }
    }
}

// ---------------------------------------------------------------------------
// Field / FieldValue
// ---------------------------------------------------------------------------

/// A `ProjectAttributes` member a rule trigger can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ProjectType,
    Jurisdiction,
    SquareFootage,
    StructuralChanges,
    PlumbingWork,
    ElectricalWork,
    ElectricalServiceAmps,
    LotSize,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::ProjectType => "projectType",
            Field::Jurisdiction => "jurisdiction",
            Field::SquareFootage => "squareFootage",
            Field::StructuralChanges => "structuralChanges",
            Field::PlumbingWork => "plumbingWork",
            Field::ElectricalWork => "electricalWork",
            Field::ElectricalServiceAmps => "electricalServiceAmps",
            Field::LotSize => "lotSize",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_drops_amps_without_electrical_work() {
        let attrs = ProjectAttributes {
            electrical_service_amps: Some(200.0),
            ..ProjectAttributes::new(ProjectType::Adu, "Phoenix")
        }
        .normalized();
        assert_eq!(attrs.electrical_service_amps, None);
        assert_eq!(attrs.value_of(Field::ElectricalServiceAmps), None);
    }

    #[test]
    fn normalized_drops_negative_measurements() {
        let attrs = ProjectAttributes {
            square_footage: Some(-10.0),
            lot_size: Some(f64::NAN),
            ..ProjectAttributes::new(ProjectType::Addition, " Phoenix ")
        }
        .normalized();
        assert_eq!(attrs.square_footage, None);
        assert_eq!(attrs.lot_size, None);
        assert_eq!(attrs.jurisdiction, "Phoenix");
    }

    #[test]
    fn amps_hidden_from_triggers_when_electrical_off() {
        // Constructed directly, bypassing normalized().
        let attrs = ProjectAttributes {
            electrical_service_amps: Some(400.0),
            ..ProjectAttributes::default()
        };
        assert_eq!(attrs.value_of(Field::ElectricalServiceAmps), None);
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let json = r#"{"projectType":"ADU","squareFootage":900,"electricalWork":true}"#;
        let attrs: ProjectAttributes = serde_json::from_str(json).unwrap();
        assert_eq!(attrs.project_type, ProjectType::Adu);
        assert_eq!(attrs.square_footage, Some(900.0));
        assert!(attrs.electrical_work);
        assert!(!attrs.plumbing_work);
        assert!(attrs.jurisdiction.is_empty());
    }

    #[test]
    fn field_value_untagged_parsing() {
        let v: FieldValue = serde_yaml::from_str("true").unwrap();
        assert_eq!(v, FieldValue::Bool(true));
        let v: FieldValue = serde_yaml::from_str("800").unwrap();
        assert_eq!(v, FieldValue::Number(800.0));
        let v: FieldValue = serde_yaml::from_str("ADU").unwrap();
        assert_eq!(v, FieldValue::Text("ADU".to_string()));
    }
}
