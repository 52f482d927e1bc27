//! Registry records
//!
//! One module per registration screen. Every record type implements
//! [`Record`], which ties it to its backend resource and carries the
//! normalization, validation and search rules the registry applies.

pub mod account;
pub mod material;
pub mod republic;
pub mod site;
pub mod vehicle;
pub mod worker;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;

pub use account::{Accounts, Operator, SignUp};
pub use material::{Material, StorageLocation};
pub use republic::{LodgingOption, Republic};
pub use site::{Address, ConstructionSite, SiteStatus, Uf};
pub use vehicle::{Vehicle, VehicleKind};
pub use worker::{Profile, Worker, WorkerStatus};

/// A backend collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    ConstructionSites,
    Workers,
    Republics,
    Materials,
    Vehicles,
    StorageLocations,
}

impl Resource {
    /// Path of the collection relative to the API base URL
    pub fn path(self) -> &'static str {
        match self {
            Resource::ConstructionSites => "canteiros",
            Resource::Workers => "trabalhadores",
            Resource::Republics => "alojamento",
            Resource::Materials => "materiais",
            Resource::Vehicles => "veiculos",
            Resource::StorageLocations => "locais-armazenamento",
        }
    }

    /// Read-only lists that change rarely and may be cached
    pub fn is_reference(self) -> bool {
        matches!(self, Resource::StorageLocations)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A record that can be registered through the backend
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the record lives in
    const RESOURCE: Resource;

    /// Whether writes compare the record against registered ones with
    /// [`Record::conflicts_with`]
    const CHECK_CONFLICTS: bool = false;

    /// Backend-assigned identifier, absent before the first save
    fn id(&self) -> Option<&str>;

    /// Applies input masks and casing before validation
    fn normalize(&mut self) {}

    /// Checks the record's own fields, reporting the first failure
    fn validate(&self) -> Result<(), ValidationError>;

    /// Whether the record matches a search term, already lowercased
    fn matches(&self, needle: &str) -> bool;

    /// Reports a uniqueness conflict with an already registered record
    fn conflicts_with(&self, _other: &Self) -> Option<ValidationError> {
        None
    }
}

/// Filters records by a case-insensitive search term
///
/// An empty term matches everything.
pub fn filter_records<'a, R: Record>(records: &'a [R], term: &str) -> Vec<&'a R> {
    let needle = term.to_lowercase();
    records.iter().filter(|r| r.matches(&needle)).collect()
}

/// Case-insensitive substring check against a lowercased needle
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::ConstructionSites.path(), "canteiros");
        assert_eq!(Resource::Republics.to_string(), "alojamento");
        assert!(Resource::StorageLocations.is_reference());
        assert!(!Resource::Vehicles.is_reference());
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("São Paulo", "são"));
        assert!(contains_ci("CNT001", "cnt"));
        assert!(contains_ci("anything", ""));
        assert!(!contains_ci("Centro", "jardins"));
    }
}
