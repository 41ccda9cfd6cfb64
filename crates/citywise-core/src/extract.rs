//! Intake normalisation: turns a form submission or a conversation
//! transcript into `ProjectAttributes`.
//!
//! Transcript matching is keyword-based and lossy. A flag wrongly left false
//! is the expected failure mode; nothing here returns an error.

use crate::attributes::ProjectAttributes;
use crate::rules::LARGE_LOT_SQFT;
use crate::types::ProjectType;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// RawIntake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawIntake {
    Form(FormIntake),
    Transcript { turns: Vec<Turn> },
}

/// A loosely typed form value: `"1,200 sq ft"`, `1200`, `"yes"` and `true`
/// are all accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Loose {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Loose::Number(n) => Some(*n),
            Loose::Bool(_) => None,
            // Same reading as a transcript: a range counts as its upper bound.
            Loose::Text(s) => upper_bound(&number_re().captures(s)?),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Loose::Bool(b) => Some(*b),
            Loose::Number(n) => Some(*n != 0.0),
            Loose::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" | "1" | "on" | "checked" => Some(true),
                "no" | "n" | "false" | "0" | "off" | "" => Some(false),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormIntake {
    pub project_type: Option<String>,
    pub jurisdiction: Option<String>,
    pub square_footage: Option<Loose>,
    pub structural_changes: Option<Loose>,
    pub plumbing_work: Option<Loose>,
    pub electrical_work: Option<Loose>,
    pub electrical_service_amps: Option<Loose>,
    pub lot_size: Option<Loose>,
    /// Free-text project description. Scanned for anything the structured
    /// fields leave unset.
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// AttributeExtractor
// ---------------------------------------------------------------------------

/// The narrow seam the resolver depends on; the keyword heuristic below can
/// be swapped without touching resolution.
pub trait AttributeExtractor {
    fn extract(&self, intake: &RawIntake) -> ProjectAttributes;
}

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    /// Used when the intake never names a jurisdiction.
    pub default_jurisdiction: String,
}

impl KeywordExtractor {
    pub fn new(default_jurisdiction: impl Into<String>) -> Self {
        Self {
            default_jurisdiction: default_jurisdiction.into(),
        }
    }

    fn from_text(&self, text: &str) -> ProjectAttributes {
        let text = text.to_lowercase();
        let measures = scan_measures(&text);
        ProjectAttributes {
            project_type: detect_project_type(&text).unwrap_or_default(),
            jurisdiction: detect_jurisdiction(&text)
                .unwrap_or(self.default_jurisdiction.as_str())
                .to_string(),
            square_footage: measures.square_footage,
            structural_changes: mentions(&text, STRUCTURAL_KEYWORDS),
            plumbing_work: mentions(&text, PLUMBING_KEYWORDS),
            electrical_work: mentions(&text, ELECTRICAL_KEYWORDS),
            electrical_service_amps: last_amps(&text),
            lot_size: measures.lot_size,
        }
    }

    fn from_form(&self, form: &FormIntake) -> ProjectAttributes {
        let scanned = self.from_text(form.description.as_deref().unwrap_or_default());
        let flag = |v: &Option<Loose>, fallback: bool| {
            v.as_ref().and_then(Loose::as_bool).unwrap_or(fallback)
        };
        let number = |v: &Option<Loose>, fallback: Option<f64>| {
            v.as_ref().and_then(Loose::as_number).or(fallback)
        };

        let project_type = form
            .project_type
            .as_deref()
            .and_then(|s| {
                s.parse::<ProjectType>()
                    .ok()
                    .or_else(|| detect_project_type(&s.to_lowercase()))
            })
            .unwrap_or(scanned.project_type);
        let jurisdiction = form
            .jurisdiction
            .as_deref()
            .map(str::trim)
            .filter(|j| !j.is_empty())
            .map(str::to_string)
            .unwrap_or(scanned.jurisdiction);

        ProjectAttributes {
            project_type,
            jurisdiction,
            square_footage: number(&form.square_footage, scanned.square_footage),
            structural_changes: flag(&form.structural_changes, scanned.structural_changes),
            plumbing_work: flag(&form.plumbing_work, scanned.plumbing_work),
            electrical_work: flag(&form.electrical_work, scanned.electrical_work),
            electrical_service_amps: number(
                &form.electrical_service_amps,
                scanned.electrical_service_amps,
            ),
            lot_size: number(&form.lot_size, scanned.lot_size),
        }
    }
}

impl AttributeExtractor for KeywordExtractor {
    fn extract(&self, intake: &RawIntake) -> ProjectAttributes {
        let attrs = match intake {
            RawIntake::Form(form) => self.from_form(form),
            RawIntake::Transcript { turns } => {
                let user_text = turns
                    .iter()
                    .filter(|t| t.role == Role::User)
                    .map(|t| t.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                self.from_text(&user_text)
            }
        };
        attrs.normalized()
    }
}

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

const STRUCTURAL_KEYWORDS: &[&str] = &[
    "structural",
    "load-bearing",
    "load bearing",
    "bearing wall",
    "remove a wall",
    "removing a wall",
    "knock down a wall",
    "beam",
    "foundation",
    "second story",
];

const PLUMBING_KEYWORDS: &[&str] = &[
    "plumbing",
    "bathroom",
    "kitchen",
    "toilet",
    "shower",
    "sink",
    "water heater",
    "sewer",
];

const ELECTRICAL_KEYWORDS: &[&str] = &[
    "electrical",
    "wiring",
    "rewire",
    "panel",
    "outlet",
    "circuit",
    "service upgrade",
    "ev charger",
];

/// Checked in order; the first type with a matching keyword wins.
const PROJECT_TYPE_KEYWORDS: &[(ProjectType, &[&str])] = &[
    (
        ProjectType::Adu,
        &["adu", "accessory dwelling", "casita", "guest house", "granny flat"],
    ),
    (
        ProjectType::GarageConversion,
        &[
            "garage conversion",
            "convert the garage",
            "convert my garage",
            "converting the garage",
            "garage into",
        ],
    ),
    (
        ProjectType::NewConstruction,
        &["new construction", "new home", "new house", "ground up", "ground-up", "build a house"],
    ),
    (ProjectType::Demolition, &["demolition", "demolish", "tear down", "teardown"]),
    (ProjectType::Pool, &["pool", "spa"]),
    (ProjectType::Solar, &["solar", "photovoltaic", "pv system"]),
    (ProjectType::PatioCover, &["patio cover", "pergola", "ramada", "shade structure"]),
    (ProjectType::Fence, &["fence", "block wall"]),
    (
        ProjectType::Addition,
        &["addition", "add a room", "adding a room", "bump out", "expand the house"],
    ),
    (ProjectType::Remodel, &["remodel", "renovate", "renovation"]),
];

/// Phoenix metro municipalities recognised in free text.
const METRO_JURISDICTIONS: &[&str] = &[
    "Phoenix",
    "Scottsdale",
    "Tempe",
    "Mesa",
    "Chandler",
    "Gilbert",
    "Glendale",
    "Peoria",
    "Paradise Valley",
];

// ---------------------------------------------------------------------------
// Matching helpers
// ---------------------------------------------------------------------------

/// Whole-word, already-lowercased keyword match.
fn mentions(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| find_word(text, k).is_some())
}

fn find_word(text: &str, word: &str) -> Option<usize> {
    let is_word = |c: char| c.is_alphanumeric();
    let mut from = 0;
    while let Some(pos) = text[from..].find(word) {
        let start = from + pos;
        let end = start + word.len();
        let before_ok = text[..start].chars().next_back().map_or(true, |c| !is_word(c));
        let after_ok = text[end..].chars().next().map_or(true, |c| !is_word(c));
        if before_ok && after_ok {
            return Some(start);
        }
        from = end;
    }
    None
}

fn detect_project_type(text: &str) -> Option<ProjectType> {
    PROJECT_TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| mentions(text, keywords))
        .map(|(pt, _)| *pt)
}

/// The most recently mentioned metro municipality.
fn detect_jurisdiction(text: &str) -> Option<&'static str> {
    METRO_JURISDICTIONS
        .iter()
        .filter_map(|j| {
            let lower = j.to_lowercase();
            let mut last = None;
            let mut from = 0;
            while let Some(pos) = find_word(&text[from..], &lower) {
                last = Some(from + pos);
                from += pos + lower.len();
            }
            last.map(|pos| (pos, *j))
        })
        .max_by_key(|(pos, _)| *pos)
        .map(|(_, j)| j)
}

// ---------------------------------------------------------------------------
// Numeric patterns
// ---------------------------------------------------------------------------

static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static AREA_RE: OnceLock<Regex> = OnceLock::new();
static ACRE_RE: OnceLock<Regex> = OnceLock::new();
static LOT_LEAD_RE: OnceLock<Regex> = OnceLock::new();
static AMPS_RE: OnceLock<Regex> = OnceLock::new();

/// "650", "1,200", "500-1000", "500 to 1000".
fn number_re() -> &'static Regex {
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"(\d[\d,]*(?:\.\d+)?)(?:\s*(?:-|to)\s*(\d[\d,]*(?:\.\d+)?))?").unwrap()
    })
}

/// "900 sq ft", "500-1000 square feet", "900-square-foot", "8,000 sf lot".
fn area_re() -> &'static Regex {
    AREA_RE.get_or_init(|| {
        Regex::new(
            r"(?i)(\d[\d,]*(?:\.\d+)?)(?:\s*(?:-|to)\s*(\d[\d,]*(?:\.\d+)?))?[\s-]*(?:square[\s-]*(?:feet|foot|ft)|sq\.?[\s-]*(?:ft|feet|foot)|sf\b)\.?(\s+(?:lot|parcel))?",
        )
        .unwrap()
    })
}

/// Text ending in a lot lead-in: "lot size ", "parcel is about ", "lot: ".
fn lot_lead_re() -> &'static Regex {
    LOT_LEAD_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:lot|parcel)(?:\s+(?:size|area))?\s*(?:is|of|:|=)?\s*(?:about|around|roughly|approximately|approx\.?|~)?\s*$",
        )
        .unwrap()
    })
}

fn acre_re() -> &'static Regex {
    ACRE_RE.get_or_init(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*-?\s*acres?\b").unwrap())
}

/// "200 amp", "200-amp", "200A", "150 amps".
fn amps_re() -> &'static Regex {
    AMPS_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{2,4})(?:\s*-?\s*(?:amps?|amperes?)\b|a\b)").unwrap()
    })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

/// Group 2 (the top of a range) when present, else group 1.
fn upper_bound(caps: &Captures<'_>) -> Option<f64> {
    caps.get(2)
        .or_else(|| caps.get(1))
        .and_then(|v| parse_number(v.as_str()))
}

#[derive(Debug, Default)]
struct Measures {
    square_footage: Option<f64>,
    lot_size: Option<f64>,
}

/// The last area figure wins for each of project size and lot size. A range
/// counts as its upper bound. A figure is a lot size when "lot" or "parcel"
/// follows the unit or leads into the number.
fn scan_measures(text: &str) -> Measures {
    let mut m = Measures::default();
    for caps in area_re().captures_iter(text) {
        let value = upper_bound(&caps);
        let start = caps.get(0).map_or(0, |c| c.start());
        if caps.get(3).is_some() || lot_lead_re().is_match(&text[..start]) {
            m.lot_size = value.or(m.lot_size);
        } else {
            m.square_footage = value.or(m.square_footage);
        }
    }
    if m.lot_size.is_none() {
        m.lot_size = acre_re()
            .captures_iter(text)
            .filter_map(|c| c.get(1).and_then(|v| parse_number(v.as_str())))
            .last()
            .map(|acres| acres * LARGE_LOT_SQFT);
    }
    m
}

fn last_amps(text: &str) -> Option<f64> {
    amps_re()
        .captures_iter(text)
        .filter_map(|c| c.get(1).and_then(|v| parse_number(v.as_str())))
        .last()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
