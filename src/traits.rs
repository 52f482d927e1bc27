//! Common trait definitions
//!
//! The registry talks to its storage through [`RegistryBackend`]. The REST
//! client implements it for production use; the in-memory store implements
//! it for offline mode and tests.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::model::Resource;

/// Trait for the registry's persistence backend
///
/// Records travel as JSON objects; typing happens in the registry.
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// List every record of a collection
    async fn fetch(&self, resource: Resource) -> Result<Vec<Value>>;

    /// Create a record, returning it as stored (with its id)
    async fn create(&self, resource: Resource, body: Value) -> Result<Value>;

    /// Replace the record with the given id, returning it as stored
    async fn update(&self, resource: Resource, id: &str, body: Value) -> Result<Value>;

    /// Remove the record with the given id
    async fn delete(&self, resource: Resource, id: &str) -> Result<()>;
}
