pub mod attributes;
pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod io;
pub mod paths;
pub mod permit;
pub mod property;
pub mod reconcile;
pub mod requirement;
pub mod resolver;
pub mod rules;
pub mod source;
pub mod trigger;
pub mod types;
pub mod zoning;

pub use error::{CityWiseError, Result};
