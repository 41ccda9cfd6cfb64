use crate::types::DataSource;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

/// How far two provider values may drift before they count as a conflict.
/// Text fields ignore the tolerance and compare case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tolerance {
    #[default]
    Exact,
    Absolute {
        value: f64,
    },
}

impl Tolerance {
    pub fn absolute(value: f64) -> Self {
        Tolerance::Absolute { value }
    }

    fn numbers_differ(self, a: f64, b: f64) -> bool {
        match self {
            Tolerance::Exact => a != b,
            Tolerance::Absolute { value } => (a - b).abs() > value,
        }
    }
}

// ---------------------------------------------------------------------------
// FieldPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPolicy {
    pub precedence: DataSource,
    #[serde(default)]
    pub tolerance: Tolerance,
}

impl FieldPolicy {
    pub fn assessor() -> Self {
        Self {
            precedence: DataSource::Assessor,
            tolerance: Tolerance::Exact,
        }
    }

    pub fn regrid() -> Self {
        Self {
            precedence: DataSource::Regrid,
            tolerance: Tolerance::Exact,
        }
    }

    pub fn within(mut self, tolerance: f64) -> Self {
        self.tolerance = Tolerance::absolute(tolerance);
        self
    }
}

// ---------------------------------------------------------------------------
// Reconcilable
// ---------------------------------------------------------------------------

pub trait Reconcilable: Clone {
    /// Blank values count as "not provided".
    fn is_present(&self) -> bool {
        true
    }

    fn differs(&self, other: &Self, tolerance: Tolerance) -> bool;
}

impl Reconcilable for f64 {
    fn is_present(&self) -> bool {
        self.is_finite()
    }

    fn differs(&self, other: &Self, tolerance: Tolerance) -> bool {
        tolerance.numbers_differ(*self, *other)
    }
}

impl Reconcilable for i32 {
    fn differs(&self, other: &Self, tolerance: Tolerance) -> bool {
        tolerance.numbers_differ(f64::from(*self), f64::from(*other))
    }
}

impl Reconcilable for u32 {
    fn differs(&self, other: &Self, tolerance: Tolerance) -> bool {
        tolerance.numbers_differ(f64::from(*self), f64::from(*other))
    }
}

impl Reconcilable for bool {
    fn differs(&self, other: &Self, _tolerance: Tolerance) -> bool {
        self != other
    }
}

impl Reconcilable for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }

    fn differs(&self, other: &Self, _tolerance: Tolerance) -> bool {
        !self.trim().eq_ignore_ascii_case(other.trim())
    }
}

// ---------------------------------------------------------------------------
// ReconciledField
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledField<T> {
    pub value: T,
    pub source: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessor_value: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regrid_value: Option<T>,
    pub has_conflict: bool,
}

/// Merge one attribute from the two providers.
///
/// - Both present: the precedence source wins; a conflict is flagged when
///   the values differ beyond the tolerance.
/// - One present: that value wins, no conflict.
/// - Neither: `default`, nominally attributed to the precedence source.
pub fn reconcile<T: Reconcilable>(
    field: &str,
    assessor: Option<T>,
    regrid: Option<T>,
    policy: FieldPolicy,
    default: T,
) -> ReconciledField<T> {
    let assessor = assessor.filter(Reconcilable::is_present);
    let regrid = regrid.filter(Reconcilable::is_present);

    let (value, source, has_conflict) = match (&assessor, &regrid) {
        (Some(a), Some(r)) => {
            let has_conflict = a.differs(r, policy.tolerance);
            if has_conflict {
                tracing::debug!(field, precedence = %policy.precedence, "provider values conflict");
            }
            let value = match policy.precedence {
                DataSource::Assessor => a.clone(),
                DataSource::Regrid => r.clone(),
            };
            (value, policy.precedence, has_conflict)
        }
        (Some(a), None) => (a.clone(), DataSource::Assessor, false),
        (None, Some(r)) => (r.clone(), DataSource::Regrid, false),
        (None, None) => (default, policy.precedence, false),
    };

    ReconciledField {
        value,
        source,
        assessor_value: assessor,
        regrid_value: regrid,
        has_conflict,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
