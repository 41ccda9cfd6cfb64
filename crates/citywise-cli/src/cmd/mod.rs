pub mod config;
pub mod edges;
pub mod extract;
pub mod init;
pub mod reconcile;
pub mod resolve;
pub mod rules;
pub mod zoning;
