use crate::error::CityWiseError;
use crate::reconcile::{reconcile, FieldPolicy, ReconciledField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// PropertyField
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyField {
    StreetAddress,
    City,
    State,
    Zip,
    Apn,
    OwnerName,
    Subdivision,
    Zoning,
    LandUse,
    LotSize,
    LivingArea,
    YearBuilt,
    Bedrooms,
    Bathrooms,
    Stories,
    FullCashValue,
    LimitedValue,
    LastSalePrice,
    LastSaleDate,
    TaxYear,
    Pool,
}

impl PropertyField {
    pub fn all() -> &'static [PropertyField] {
        &[
            PropertyField::StreetAddress,
            PropertyField::City,
            PropertyField::State,
            PropertyField::Zip,
            PropertyField::Apn,
            PropertyField::OwnerName,
            PropertyField::Subdivision,
            PropertyField::Zoning,
            PropertyField::LandUse,
            PropertyField::LotSize,
            PropertyField::LivingArea,
            PropertyField::YearBuilt,
            PropertyField::Bedrooms,
            PropertyField::Bathrooms,
            PropertyField::Stories,
            PropertyField::FullCashValue,
            PropertyField::LimitedValue,
            PropertyField::LastSalePrice,
            PropertyField::LastSaleDate,
            PropertyField::TaxYear,
            PropertyField::Pool,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyField::StreetAddress => "streetAddress",
            PropertyField::City => "city",
            PropertyField::State => "state",
            PropertyField::Zip => "zip",
            PropertyField::Apn => "apn",
            PropertyField::OwnerName => "ownerName",
            PropertyField::Subdivision => "subdivision",
            PropertyField::Zoning => "zoning",
            PropertyField::LandUse => "landUse",
            PropertyField::LotSize => "lotSize",
            PropertyField::LivingArea => "livingArea",
            PropertyField::YearBuilt => "yearBuilt",
            PropertyField::Bedrooms => "bedrooms",
            PropertyField::Bathrooms => "bathrooms",
            PropertyField::Stories => "stories",
            PropertyField::FullCashValue => "fullCashValue",
            PropertyField::LimitedValue => "limitedValue",
            PropertyField::LastSalePrice => "lastSalePrice",
            PropertyField::LastSaleDate => "lastSaleDate",
            PropertyField::TaxYear => "taxYear",
            PropertyField::Pool => "pool",
        }
    }
}

impl fmt::Display for PropertyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PropertyField {
    type Err = CityWiseError;

    /// Accepts camelCase or snake_case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s.trim().chars().filter(|c| *c != '_').collect();
        PropertyField::all()
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(&key))
            .ok_or_else(|| CityWiseError::InvalidPropertyField(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ReconcilePolicy
// ---------------------------------------------------------------------------

/// Per-field precedence and tolerance, consumed by the one generic
/// `reconcile` function.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePolicy {
    fields: BTreeMap<PropertyField, FieldPolicy>,
}

/// Area tolerance in square feet.
pub const AREA_TOLERANCE_SQFT: f64 = 100.0;

/// Dollar rounding between providers.
pub const VALUATION_TOLERANCE: f64 = 1.0;

impl Default for ReconcilePolicy {
    /// Assessor wins building and residential attributes; the parcel
    /// provider wins zoning, ownership and valuation.
    fn default() -> Self {
        use PropertyField::*;

        let mut fields = BTreeMap::new();
        for f in [
            StreetAddress,
            City,
            State,
            Zip,
            Apn,
            Subdivision,
            YearBuilt,
            Bedrooms,
            Bathrooms,
            Stories,
            TaxYear,
            Pool,
        ] {
            fields.insert(f, FieldPolicy::assessor());
        }
        fields.insert(LotSize, FieldPolicy::assessor().within(AREA_TOLERANCE_SQFT));
        fields.insert(LivingArea, FieldPolicy::assessor().within(AREA_TOLERANCE_SQFT));

        for f in [OwnerName, Zoning, LandUse, LastSaleDate] {
            fields.insert(f, FieldPolicy::regrid());
        }
        for f in [FullCashValue, LimitedValue, LastSalePrice] {
            fields.insert(f, FieldPolicy::regrid().within(VALUATION_TOLERANCE));
        }

        Self { fields }
    }
}

impl ReconcilePolicy {
    pub fn get(&self, field: PropertyField) -> FieldPolicy {
        self.fields
            .get(&field)
            .copied()
            .unwrap_or_else(FieldPolicy::assessor)
    }

    pub fn set(&mut self, field: PropertyField, policy: FieldPolicy) {
        self.fields.insert(field, policy);
    }
}

// ---------------------------------------------------------------------------
// PropertySnapshot
// ---------------------------------------------------------------------------

/// One provider's view of a parcel. Every attribute is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertySnapshot {
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub apn: Option<String>,
    pub owner_name: Option<String>,
    pub subdivision: Option<String>,
    pub zoning: Option<String>,
    pub land_use: Option<String>,
    pub lot_size: Option<f64>,
    pub living_area: Option<f64>,
    pub year_built: Option<i32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub stories: Option<u32>,
    pub full_cash_value: Option<f64>,
    pub limited_value: Option<f64>,
    pub last_sale_price: Option<f64>,
    pub last_sale_date: Option<String>,
    pub tax_year: Option<i32>,
    pub pool: Option<bool>,
}

// ---------------------------------------------------------------------------
// PropertyReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReport {
    pub street_address: ReconciledField<String>,
    pub city: ReconciledField<String>,
    pub state: ReconciledField<String>,
    pub zip: ReconciledField<String>,
    pub apn: ReconciledField<String>,
    pub owner_name: ReconciledField<String>,
    pub subdivision: ReconciledField<String>,
    pub zoning: ReconciledField<String>,
    pub land_use: ReconciledField<String>,
    pub lot_size: ReconciledField<f64>,
    pub living_area: ReconciledField<f64>,
    pub year_built: ReconciledField<i32>,
    pub bedrooms: ReconciledField<u32>,
    pub bathrooms: ReconciledField<f64>,
    pub stories: ReconciledField<u32>,
    pub full_cash_value: ReconciledField<f64>,
    pub limited_value: ReconciledField<f64>,
    pub last_sale_price: ReconciledField<f64>,
    pub last_sale_date: ReconciledField<String>,
    pub tax_year: ReconciledField<i32>,
    pub pool: ReconciledField<bool>,
}

impl PropertyReport {
    /// Reconcile every attribute independently. `as_of_year` is the
    /// tax-year fallback when neither provider reports one.
    pub fn build(
        assessor: &PropertySnapshot,
        regrid: &PropertySnapshot,
        policy: &ReconcilePolicy,
        as_of_year: i32,
    ) -> Self {
        use PropertyField as F;

        macro_rules! field {
            ($f:expr, $member:ident, $default:expr) => {
                reconcile(
                    $f.as_str(),
                    assessor.$member.clone(),
                    regrid.$member.clone(),
                    policy.get($f),
                    $default,
                )
            };
        }

        Self {
            street_address: field!(F::StreetAddress, street_address, String::new()),
            city: field!(F::City, city, String::new()),
            state: field!(F::State, state, String::new()),
            zip: field!(F::Zip, zip, String::new()),
            apn: field!(F::Apn, apn, String::new()),
            owner_name: field!(F::OwnerName, owner_name, String::new()),
            subdivision: field!(F::Subdivision, subdivision, String::new()),
            zoning: field!(F::Zoning, zoning, String::new()),
            land_use: field!(F::LandUse, land_use, String::new()),
            lot_size: field!(F::LotSize, lot_size, 0.0),
            living_area: field!(F::LivingArea, living_area, 0.0),
            year_built: field!(F::YearBuilt, year_built, 0),
            bedrooms: field!(F::Bedrooms, bedrooms, 0),
            bathrooms: field!(F::Bathrooms, bathrooms, 0.0),
            stories: field!(F::Stories, stories, 0),
            full_cash_value: field!(F::FullCashValue, full_cash_value, 0.0),
            limited_value: field!(F::LimitedValue, limited_value, 0.0),
            last_sale_price: field!(F::LastSalePrice, last_sale_price, 0.0),
            last_sale_date: field!(F::LastSaleDate, last_sale_date, String::new()),
            tax_year: field!(F::TaxYear, tax_year, as_of_year),
            pool: field!(F::Pool, pool, false),
        }
    }

    /// `build` with the current calendar year as the tax-year fallback.
    pub fn build_now(
        assessor: &PropertySnapshot,
        regrid: &PropertySnapshot,
        policy: &ReconcilePolicy,
    ) -> Self {
        use chrono::Datelike;
        Self::build(assessor, regrid, policy, chrono::Local::now().year())
    }

    fn conflict_flags(&self) -> [(PropertyField, bool); 21] {
        use PropertyField as F;
        [
            (F::StreetAddress, self.street_address.has_conflict),
            (F::City, self.city.has_conflict),
            (F::State, self.state.has_conflict),
            (F::Zip, self.zip.has_conflict),
            (F::Apn, self.apn.has_conflict),
            (F::OwnerName, self.owner_name.has_conflict),
            (F::Subdivision, self.subdivision.has_conflict),
            (F::Zoning, self.zoning.has_conflict),
            (F::LandUse, self.land_use.has_conflict),
            (F::LotSize, self.lot_size.has_conflict),
            (F::LivingArea, self.living_area.has_conflict),
            (F::YearBuilt, self.year_built.has_conflict),
            (F::Bedrooms, self.bedrooms.has_conflict),
            (F::Bathrooms, self.bathrooms.has_conflict),
            (F::Stories, self.stories.has_conflict),
            (F::FullCashValue, self.full_cash_value.has_conflict),
            (F::LimitedValue, self.limited_value.has_conflict),
            (F::LastSalePrice, self.last_sale_price.has_conflict),
            (F::LastSaleDate, self.last_sale_date.has_conflict),
            (F::TaxYear, self.tax_year.has_conflict),
            (F::Pool, self.pool.has_conflict),
        ]
    }

    /// Fields flagged for human review, in declaration order.
    pub fn conflicts(&self) -> Vec<PropertyField> {
        self.conflict_flags()
            .into_iter()
            .filter(|(_, c)| *c)
            .map(|(f, _)| f)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
