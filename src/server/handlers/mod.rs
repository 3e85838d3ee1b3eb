pub mod config;
pub mod datasets;
pub mod health;
pub mod query;
