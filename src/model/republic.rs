//! Lodgings ("repúblicas")
//!
//! Shared houses where workers are allocated. Registered lodgings double as
//! the allocation options offered when registering a worker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{contains_ci, Record, Resource};
use crate::error::ValidationError;
use crate::utils::formatting::format_cep;
use crate::utils::validation::{require, require_cep};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Republic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default)]
    pub residents: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
}

impl Republic {
    /// Single-line address used in listings and allocation options
    pub fn address_line(&self) -> String {
        format!(
            "{}, {} - {}, {}",
            self.street, self.number, self.neighborhood, self.city
        )
    }
}

impl Record for Republic {
    const RESOURCE: Resource = Resource::Republics;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn normalize(&mut self) {
        self.postal_code = format_cep(&self.postal_code);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("street", &self.street)?;
        require("number", &self.number)?;
        require("neighborhood", &self.neighborhood)?;
        require("city", &self.city)?;
        require_cep("postalCode", &self.postal_code)
    }

    fn matches(&self, needle: &str) -> bool {
        let haystack = format!(
            "{} {} {} {}",
            self.street, self.number, self.neighborhood, self.city
        );
        contains_ci(&haystack, needle)
    }
}

/// A lodging a worker can be allocated to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LodgingOption {
    pub value: String,
    pub label: String,
}

impl LodgingOption {
    /// Builds an option from a saved lodging; unsaved lodgings have none
    pub fn from_republic(republic: &Republic) -> Option<Self> {
        let id = republic.id.as_ref()?;
        Some(Self {
            value: id.clone(),
            label: republic.address_line(),
        })
    }
}
