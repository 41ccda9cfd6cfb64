use crate::attributes::{Field, FieldValue, ProjectAttributes};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "EQUALS",
            Operator::NotEquals => "NOT_EQUALS",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Operator::LessThan => "LESS_THAN",
            Operator::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operator {
    type Err = crate::error::CityWiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EQUALS" | "==" => Ok(Operator::Equals),
            "NOT_EQUALS" | "!=" => Ok(Operator::NotEquals),
            "GREATER_THAN" | ">" => Ok(Operator::GreaterThan),
            "GREATER_THAN_OR_EQUAL" | ">=" => Ok(Operator::GreaterThanOrEqual),
            "LESS_THAN" | "<" => Ok(Operator::LessThan),
            "LESS_THAN_OR_EQUAL" | "<=" => Ok(Operator::LessThanOrEqual),
            _ => Err(crate::error::CityWiseError::InvalidOperator(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// One `(field, operator, value)` comparison. A rule fires when all of its
/// triggers hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub field: Field,
    pub operator: Operator,
    pub value: FieldValue,
}

impl Trigger {
    pub fn new(field: Field, operator: Operator, value: FieldValue) -> Self {
        Self {
            field,
            operator,
            value,
        }
    }

    /// Unknown fields fail every operator, as does a type mismatch between
    /// the field and the literal. Ordered operators only apply to numbers.
    pub fn evaluate(&self, attrs: &ProjectAttributes) -> bool {
        let Some(actual) = attrs.value_of(self.field) else {
            return false;
        };
        match self.operator {
            Operator::Equals => equal(&actual, &self.value) == Some(true),
            Operator::NotEquals => equal(&actual, &self.value) == Some(false),
            ordered => {
                let (FieldValue::Number(a), FieldValue::Number(b)) = (&actual, &self.value) else {
                    return false;
                };
                let Some(ord) = a.partial_cmp(b) else {
                    return false;
                };
                match ordered {
                    Operator::GreaterThan => ord == Ordering::Greater,
                    Operator::GreaterThanOrEqual => ord != Ordering::Less,
                    Operator::LessThan => ord == Ordering::Less,
                    _ => ord != Ordering::Greater,
                }
            }
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator.symbol(), self.value)
    }
}

/// `None` when the two values are of different kinds.
fn equal(actual: &FieldValue, expected: &FieldValue) -> Option<bool> {
    match (actual, expected) {
        (FieldValue::Number(a), FieldValue::Number(b)) => Some(a == b),
        (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a == b),
        (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.trim().eq_ignore_ascii_case(b.trim())),
        _ => None,
    }
}

/// True when every trigger holds. An empty list always fires.
pub fn all_hold(triggers: &[Trigger], attrs: &ProjectAttributes) -> bool {
    triggers.iter().all(|t| t.evaluate(attrs))
}

// ---------------------------------------------------------------------------
// Constructors used by the built-in tables
// ---------------------------------------------------------------------------

pub fn is_true(field: Field) -> Trigger {
    Trigger::new(field, Operator::Equals, FieldValue::Bool(true))
}

pub fn gt(field: Field, n: f64) -> Trigger {
    Trigger::new(field, Operator::GreaterThan, FieldValue::Number(n))
}

pub fn lte(field: Field, n: f64) -> Trigger {
    Trigger::new(field, Operator::LessThanOrEqual, FieldValue::Number(n))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
