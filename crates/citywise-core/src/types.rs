use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ProjectType
// ---------------------------------------------------------------------------

/// Unknown intake defaults to `Remodel`, the least intrusive category.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectType {
    Addition,
    #[default]
    Remodel,
    Adu,
    NewConstruction,
    Demolition,
    GarageConversion,
    PatioCover,
    Fence,
    Pool,
    Solar,
}

impl ProjectType {
    pub fn all() -> &'static [ProjectType] {
        &[
            ProjectType::Addition,
            ProjectType::Remodel,
            ProjectType::Adu,
            ProjectType::NewConstruction,
            ProjectType::Demolition,
            ProjectType::GarageConversion,
            ProjectType::PatioCover,
            ProjectType::Fence,
            ProjectType::Pool,
            ProjectType::Solar,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Addition => "ADDITION",
            ProjectType::Remodel => "REMODEL",
            ProjectType::Adu => "ADU",
            ProjectType::NewConstruction => "NEW_CONSTRUCTION",
            ProjectType::Demolition => "DEMOLITION",
            ProjectType::GarageConversion => "GARAGE_CONVERSION",
            ProjectType::PatioCover => "PATIO_COVER",
            ProjectType::Fence => "FENCE",
            ProjectType::Pool => "POOL",
            ProjectType::Solar => "SOLAR",
        }
    }

    /// True when `types` is empty (wildcard) or contains `self`.
    pub fn matches(self, types: &[ProjectType]) -> bool {
        types.is_empty() || types.contains(&self)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectType {
    type Err = crate::error::CityWiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "ADDITION" => Ok(ProjectType::Addition),
            "REMODEL" => Ok(ProjectType::Remodel),
            "ADU" => Ok(ProjectType::Adu),
            "NEW_CONSTRUCTION" => Ok(ProjectType::NewConstruction),
            "DEMOLITION" => Ok(ProjectType::Demolition),
            "GARAGE_CONVERSION" => Ok(ProjectType::GarageConversion),
            "PATIO_COVER" => Ok(ProjectType::PatioCover),
            "FENCE" => Ok(ProjectType::Fence),
            "POOL" => Ok(ProjectType::Pool),
            "SOLAR" => Ok(ProjectType::Solar),
            _ => Err(crate::error::CityWiseError::InvalidProjectType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Discipline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    Structural,
    Civil,
    Electrical,
    Mechanical,
    Plumbing,
    General,
}

impl Discipline {
    pub fn as_str(self) -> &'static str {
        match self {
            Discipline::Structural => "structural",
            Discipline::Civil => "civil",
            Discipline::Electrical => "electrical",
            Discipline::Mechanical => "mechanical",
            Discipline::Plumbing => "plumbing",
            Discipline::General => "general",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Discipline {
    type Err = crate::error::CityWiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" => Ok(Discipline::Structural),
            "civil" => Ok(Discipline::Civil),
            "electrical" => Ok(Discipline::Electrical),
            "mechanical" => Ok(Discipline::Mechanical),
            "plumbing" => Ok(Discipline::Plumbing),
            "general" => Ok(Discipline::General),
            _ => Err(crate::error::CityWiseError::InvalidDiscipline(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// DataSource
// ---------------------------------------------------------------------------

/// Provider of a property attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// County assessor scrape.
    Assessor,
    /// Commercial parcel-data API.
    Regrid,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Assessor => "assessor",
            DataSource::Regrid => "regrid",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DataSource {
    type Err = crate::error::CityWiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assessor" => Ok(DataSource::Assessor),
            "regrid" => Ok(DataSource::Regrid),
            _ => Err(crate::error::CityWiseError::InvalidSource(s.to_string())),
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
    fn project_type_serializes_screaming_snake() {
        let json = serde_json::to_string(&ProjectType::GarageConversion).unwrap();
        assert_eq!(json, "\"GARAGE_CONVERSION\"");
        let parsed: ProjectType = serde_json::from_str("\"NEW_CONSTRUCTION\"").unwrap();
        assert_eq!(parsed, ProjectType::NewConstruction);
    }

    #[test]
    fn project_type_from_str_is_lenient() {
        assert_eq!("adu".parse::<ProjectType>().unwrap(), ProjectType::Adu);
        assert_eq!(
            "patio-cover".parse::<ProjectType>().unwrap(),
            ProjectType::PatioCover
        );
        assert_eq!(
            "new construction".parse::<ProjectType>().unwrap(),
            ProjectType::NewConstruction
        );
        assert!("treehouse".parse::<ProjectType>().is_err());
    }

    #[test]
    fn empty_type_list_is_wildcard() {
        assert!(ProjectType::Pool.matches(&[]));
        assert!(ProjectType::Pool.matches(&[ProjectType::Pool, ProjectType::Fence]));
        assert!(!ProjectType::Pool.matches(&[ProjectType::Fence]));
    }

    #[test]
    fn display_matches_as_str() {
        for &t in ProjectType::all() {
            assert_eq!(t.to_string(), t.as_str());
            assert_eq!(t.as_str().parse::<ProjectType>().unwrap(), t);
        }
    }

    #[test]
    fn discipline_and_source_parse() {
        assert_eq!("Structural".parse::<Discipline>().unwrap(), Discipline::Structural);
        assert!("hydraulic".parse::<Discipline>().is_err());
        assert_eq!("REGRID".parse::<DataSource>().unwrap(), DataSource::Regrid);
        assert!("zillow".parse::<DataSource>().is_err());
    }
}
