//! Loaders for the requirement-rule and zoning tables.
//!
//! Any failure to produce a table for the requested jurisdiction surfaces as
//! `CityWiseError::RuleSetUnavailable`, never as an empty table.

use crate::config::WarnLevel;
use crate::error::{CityWiseError, Result};
use crate::io::read_yaml;
use crate::paths::table_file;
use crate::rules::{phoenix_rules, RuleSet};
use crate::zoning::{phoenix_zoning, Municipality};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

pub trait RuleSource {
    fn load_rules(&self, jurisdiction: &str) -> Result<RuleSet>;
}

pub trait ZoningSource {
    fn load_zoning(&self, jurisdiction: &str) -> Result<Municipality>;
}

impl<S: RuleSource + ?Sized> RuleSource for Box<S> {
    fn load_rules(&self, jurisdiction: &str) -> Result<RuleSet> {
        (**self).load_rules(jurisdiction)
    }
}

impl<S: ZoningSource + ?Sized> ZoningSource for Box<S> {
    fn load_zoning(&self, jurisdiction: &str) -> Result<Municipality> {
        (**self).load_zoning(jurisdiction)
    }
}

// ---------------------------------------------------------------------------
// Built-in seed tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRules;

impl RuleSource for BuiltinRules {
    fn load_rules(&self, jurisdiction: &str) -> Result<RuleSet> {
        phoenix_rules().load_rules(jurisdiction)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinZoning;

impl ZoningSource for BuiltinZoning {
    fn load_zoning(&self, jurisdiction: &str) -> Result<Municipality> {
        phoenix_zoning().load_zoning(jurisdiction)
    }
}

/// An in-memory table serves only its own jurisdiction.
impl RuleSource for RuleSet {
    fn load_rules(&self, jurisdiction: &str) -> Result<RuleSet> {
        if self.covers(jurisdiction) {
            Ok(self.clone())
        } else {
            Err(CityWiseError::rule_set_unavailable(
                jurisdiction,
                format!("no rule table for this jurisdiction (have '{}')", self.jurisdiction),
            ))
        }
    }
}

impl ZoningSource for Municipality {
    fn load_zoning(&self, jurisdiction: &str) -> Result<Municipality> {
        if self.covers(jurisdiction) {
            Ok(self.clone())
        } else {
            Err(CityWiseError::rule_set_unavailable(
                jurisdiction,
                format!("no zoning table for this jurisdiction (have '{}')", self.name),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Directory-backed tables: <dir>/<jurisdiction-slug>.yaml
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DirRules {
    pub dir: PathBuf,
}

impl DirRules {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl RuleSource for DirRules {
    fn load_rules(&self, jurisdiction: &str) -> Result<RuleSet> {
        let path = table_file(&self.dir, jurisdiction);
        let set: RuleSet = read_table(&path, jurisdiction)?;

        let errors: Vec<String> = set
            .validate()
            .into_iter()
            .filter(|w| w.level == WarnLevel::Error)
            .map(|w| w.message)
            .collect();
        if !errors.is_empty() {
            return Err(CityWiseError::rule_set_unavailable(
                jurisdiction,
                format!("{}: {}", path.display(), errors.join("; ")),
            ));
        }

        tracing::info!(path = %path.display(), rules = set.rules.len(), "loaded rule table");
        set.load_rules(jurisdiction)
    }
}

#[derive(Debug, Clone)]
pub struct DirZoning {
    pub dir: PathBuf,
}

impl DirZoning {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ZoningSource for DirZoning {
    fn load_zoning(&self, jurisdiction: &str) -> Result<Municipality> {
        let path = table_file(&self.dir, jurisdiction);
        let municipality: Municipality = read_table(&path, jurisdiction)?;
        tracing::info!(
            path = %path.display(),
            districts = municipality.districts.len(),
            "loaded zoning table"
        );
        municipality.load_zoning(jurisdiction)
    }
}

fn read_table<T: serde::de::DeserializeOwned>(path: &Path, jurisdiction: &str) -> Result<T> {
    if !path.exists() {
        return Err(CityWiseError::rule_set_unavailable(
            jurisdiction,
            format!("{} not found", path.display()),
        ));
    }
    read_yaml(path).map_err(|e| {
        CityWiseError::rule_set_unavailable(jurisdiction, format!("{}: {e}", path.display()))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
