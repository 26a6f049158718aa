//! Domain models for the catalog census

pub mod catalog;

pub use catalog::{CategoryRecord, CountedCategory, Gender, UPDATED_FORMAT};
