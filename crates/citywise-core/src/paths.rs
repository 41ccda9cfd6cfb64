use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CITYWISE_DIR: &str = ".citywise";
pub const CONFIG_FILE: &str = ".citywise/config.yaml";
pub const RULES_DIR: &str = ".citywise/rules";
pub const ZONING_DIR: &str = ".citywise/zoning";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn rules_dir(root: &Path) -> PathBuf {
    root.join(RULES_DIR)
}

pub fn zoning_dir(root: &Path) -> PathBuf {
    root.join(ZONING_DIR)
}

/// `<dir>/<jurisdiction-slug>.yaml`
pub fn table_file(dir: &Path, jurisdiction: &str) -> PathBuf {
    dir.join(format!("{}.yaml", jurisdiction_slug(jurisdiction)))
}

// ---------------------------------------------------------------------------
// Jurisdiction slugs
// ---------------------------------------------------------------------------

static NON_SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn non_slug_re() -> &'static Regex {
    NON_SLUG_RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// "Paradise Valley" -> "paradise-valley"
pub fn jurisdiction_slug(jurisdiction: &str) -> String {
    let lower = jurisdiction.trim().to_ascii_lowercase();
    non_slug_re()
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
