use crate::error::Result;
use crate::paths;
use crate::property::{PropertyField, ReconcilePolicy};
use crate::reconcile::{FieldPolicy, Tolerance};
use crate::source::{BuiltinRules, BuiltinZoning, DirRules, DirZoning, RuleSource, ZoningSource};
use crate::types::ProjectType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// PermitConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitConfig {
    /// Largest project, inclusive, that can be permitted over the counter.
    #[serde(default = "default_otc_max_square_feet")]
    pub otc_max_square_feet: f64,
    #[serde(default = "default_otc_project_types")]
    pub otc_project_types: Vec<ProjectType>,
}

fn default_otc_max_square_feet() -> f64 {
    500.0
}

fn default_otc_project_types() -> Vec<ProjectType> {
    vec![
        ProjectType::Remodel,
        ProjectType::PatioCover,
        ProjectType::Fence,
        ProjectType::Solar,
    ]
}

impl Default for PermitConfig {
    fn default() -> Self {
        Self {
            otc_max_square_feet: default_otc_max_square_feet(),
            otc_project_types: default_otc_project_types(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReconcileConfig
// ---------------------------------------------------------------------------

/// Per-field overrides layered on top of the default reconciliation policy.
/// Keys are property field names (`livingArea`, `ownerName`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, FieldPolicy>,
}

impl ReconcileConfig {
    /// Unknown field names are skipped here; `Config::validate` reports them.
    pub fn policy(&self) -> ReconcilePolicy {
        let mut policy = ReconcilePolicy::default();
        for (name, field_policy) in &self.overrides {
            match name.parse::<PropertyField>() {
                Ok(field) => policy.set(field, *field_policy),
                Err(_) => tracing::warn!(field = %name, "ignoring override for unknown property field"),
            }
        }
        policy
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Jurisdiction assumed when an intake does not name one.
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
    /// Directory of rule tables, relative to the project root. Unset means
    /// the built-in tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoning_dir: Option<PathBuf>,
    #[serde(default)]
    pub permits: PermitConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

fn default_version() -> u32 {
    1
}

fn default_jurisdiction() -> String {
    "Phoenix".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            jurisdiction: default_jurisdiction(),
            rules_dir: None,
            zoning_dir: None,
            permits: PermitConfig::default(),
            reconcile: ReconcileConfig::default(),
        }
    }
}

impl Config {
    /// Config for a freshly initialized project: tables live under
    /// `.citywise/` where they can be edited.
    pub fn for_project(jurisdiction: impl Into<String>) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            rules_dir: Some(PathBuf::from(paths::RULES_DIR)),
            zoning_dir: Some(PathBuf::from(paths::ZONING_DIR)),
            ..Self::default()
        }
    }

    /// A missing config file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn rule_source(&self, root: &Path) -> Box<dyn RuleSource> {
        match &self.rules_dir {
            Some(dir) => Box::new(DirRules::new(root.join(dir))),
            None => Box::new(BuiltinRules),
        }
    }

    pub fn zoning_source(&self, root: &Path) -> Box<dyn ZoningSource> {
        match &self.zoning_dir {
            Some(dir) => Box::new(DirZoning::new(root.join(dir))),
            None => Box::new(BuiltinZoning),
        }
    }

    pub fn reconcile_policy(&self) -> ReconcilePolicy {
        self.reconcile.policy()
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.jurisdiction.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "jurisdiction is empty".to_string(),
            });
        }

        let otc = self.permits.otc_max_square_feet;
        if otc.is_nan() || otc <= 0.0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "permits.otc_max_square_feet={} disables over-the-counter permits",
                    self.permits.otc_max_square_feet
                ),
            });
        }

        for (name, policy) in &self.reconcile.overrides {
            if name.parse::<PropertyField>().is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unknown property field '{name}' in reconcile.overrides"),
                });
            }
            if let Tolerance::Absolute { value } = policy.tolerance {
                if value.is_nan() || value < 0.0 {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!(
                            "reconcile.overrides.{name} has negative tolerance {value}"
                        ),
                    });
                }
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
