//! File-backed dataset collaborators

pub mod columns;
pub mod csv_store;

pub use csv_store::*;
