//! Registry service
//!
//! Typed front for a [`RegistryBackend`]. Every write goes through the same
//! pipeline: normalize input masks, validate the record, check uniqueness
//! against what is already registered, then hand the JSON to the backend.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::model::{
    filter_records, LodgingOption, Record, Republic, Resource, StorageLocation,
};
use crate::traits::RegistryBackend;

/// Typed access to the back-office collections
pub struct Registry<B> {
    backend: B,
}

impl<B: RegistryBackend> Registry<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Lists every record of type `R`
    ///
    /// # Errors
    /// Returns an error if the backend fails or a record does not decode.
    pub async fn list<R: Record>(&self) -> Result<Vec<R>> {
        let values = self.backend.fetch(R::RESOURCE).await?;
        let records: Vec<R> = decode_all(R::RESOURCE, values)?;
        debug!(resource = %R::RESOURCE, count = records.len(), "listed records");
        Ok(records)
    }

    /// Lists the records of type `R` matching a case-insensitive term
    pub async fn search<R: Record>(&self, term: &str) -> Result<Vec<R>> {
        let records = self.list::<R>().await?;
        Ok(filter_records(&records, term).into_iter().cloned().collect())
    }

    /// Validates and creates a record
    ///
    /// Any `id` on the record is dropped; the backend assigns a fresh one.
    ///
    /// # Returns
    /// The record as stored by the backend
    ///
    /// # Errors
    /// Returns a [`ValidationError`] (inside `anyhow::Error`) if the record is
    /// invalid or conflicts with a registered one, or a backend error.
    pub async fn register<R: Record>(&self, mut record: R) -> Result<R> {
        record.normalize();
        let mut body = serde_json::to_value(&record)
            .with_context(|| format!("Failed to encode {} record", R::RESOURCE))?;
        if let Some(fields) = body.as_object_mut() {
            fields.remove("id");
        }
        let record: R = decode(R::RESOURCE, body.clone())?;
        self.check(&record).await?;

        let stored = self.backend.create(R::RESOURCE, body).await?;
        let stored: R = decode(R::RESOURCE, stored)?;

        info!(resource = %R::RESOURCE, id = ?stored.id(), "registered record");
        Ok(stored)
    }

    /// Validates and replaces the record with the given id
    ///
    /// The record's own `id` is ignored in favour of `id`.
    pub async fn update<R: Record>(&self, id: &str, mut record: R) -> Result<R> {
        record.normalize();
        let mut body = serde_json::to_value(&record)
            .with_context(|| format!("Failed to encode {} record", R::RESOURCE))?;
        if let Some(fields) = body.as_object_mut() {
            fields.insert("id".to_string(), Value::String(id.to_string()));
        }
        let record: R = decode(R::RESOURCE, body.clone())?;
        self.check(&record).await?;

        let stored = self.backend.update(R::RESOURCE, id, body).await?;
        let stored: R = decode(R::RESOURCE, stored)?;

        info!(resource = %R::RESOURCE, %id, "updated record");
        Ok(stored)
    }

    /// Removes the record with the given id
    pub async fn remove<R: Record>(&self, id: &str) -> Result<()> {
        self.backend.delete(R::RESOURCE, id).await?;
        info!(resource = %R::RESOURCE, %id, "removed record");
        Ok(())
    }

    /// Storage locations a material can be assigned to
    pub async fn storage_locations(&self) -> Result<Vec<StorageLocation>> {
        let values = self.backend.fetch(Resource::StorageLocations).await?;
        decode_all(Resource::StorageLocations, values)
    }

    /// Lodgings a worker can be allocated to
    pub async fn lodging_options(&self) -> Result<Vec<LodgingOption>> {
        let republics = self.list::<Republic>().await?;
        Ok(republics
            .iter()
            .filter_map(LodgingOption::from_republic)
            .collect())
    }

    async fn check<R: Record>(&self, record: &R) -> Result<()> {
        if let Err(e) = record.validate() {
            warn!(resource = %R::RESOURCE, error = %e, "rejected invalid record");
            return Err(e.into());
        }

        if !R::CHECK_CONFLICTS {
            return Ok(());
        }

        let existing = self.list::<R>().await?;
        if let Some(conflict) = first_conflict(record, &existing) {
            warn!(resource = %R::RESOURCE, error = %conflict, "rejected conflicting record");
            return Err(conflict.into());
        }
        Ok(())
    }
}

fn first_conflict<R: Record>(record: &R, existing: &[R]) -> Option<ValidationError> {
    existing.iter().find_map(|other| record.conflicts_with(other))
}

fn decode<R: Record>(resource: Resource, value: Value) -> Result<R> {
    serde_json::from_value(value)
        .with_context(|| format!("Unexpected {} record from backend", resource))
}

fn decode_all<R: serde::de::DeserializeOwned>(
    resource: Resource,
    values: Vec<Value>,
) -> Result<Vec<R>> {
    values
        .into_iter()
        .map(|v| {
            serde_json::from_value(v)
                .with_context(|| format!("Unexpected {} record from backend", resource))
        })
        .collect()
}
