//! In-memory backend
//!
//! Keeps every collection in process memory. Used for `--offline` mode and
//! in tests. Mimics the server by assigning ids on creation and stamping
//! creation/update dates on sites and lodgings.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::model::Resource;
use crate::traits::RegistryBackend;

/// Backend storing records in memory
#[derive(Default)]
pub struct MemoryBackend {
    collections: Mutex<HashMap<Resource, Vec<Value>>>,
}

impl MemoryBackend {
    /// Creates an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend seeded with sample lodgings and storage locations
    pub fn with_sample_data() -> Self {
        let republics = vec![
            json!({
                "id": "1",
                "street": "Rua das Flores",
                "number": "123",
                "neighborhood": "Centro",
                "city": "São Paulo",
                "postalCode": "01001-000",
                "residents": 5,
                "lastUpdated": "2023-05-15"
            }),
            json!({
                "id": "2",
                "street": "Av. Principal",
                "number": "456",
                "neighborhood": "Jardins",
                "city": "Rio de Janeiro",
                "postalCode": "22021-001",
                "residents": 3,
                "lastUpdated": "2023-06-20"
            }),
            json!({
                "id": "3",
                "street": "Rua dos Estudantes",
                "number": "789",
                "neighborhood": "Vila Universitária",
                "city": "Belo Horizonte",
                "postalCode": "30310-000",
                "residents": 4,
                "lastUpdated": "2023-07-10"
            }),
        ];

        let locations = [
            "Almoxarifado Central",
            "Depósito A",
            "Depósito B",
            "Estoque Principal",
            "Sala de Materiais",
            "Galpão 1",
            "Galpão 2",
        ]
        .iter()
        .enumerate()
        .map(|(i, nome)| json!({ "id": (i + 1).to_string(), "nome": nome }))
        .collect();

        let mut collections = HashMap::new();
        collections.insert(Resource::Republics, republics);
        collections.insert(Resource::StorageLocations, locations);

        Self {
            collections: Mutex::new(collections),
        }
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Stamps the fields the server fills in
fn stamp(resource: Resource, record: &mut serde_json::Map<String, Value>, created: bool) {
    let today = Local::now().date_naive().to_string();
    match resource {
        Resource::ConstructionSites if created => {
            record.entry("dataCadastro").or_insert(Value::String(today));
        }
        Resource::Republics => {
            record.insert("lastUpdated".to_string(), Value::String(today));
        }
        _ => {}
    }
}

#[async_trait]
impl RegistryBackend for MemoryBackend {
    async fn fetch(&self, resource: Resource) -> Result<Vec<Value>> {
        let collections = self.collections.lock().await;
        Ok(collections.get(&resource).cloned().unwrap_or_default())
    }

    async fn create(&self, resource: Resource, body: Value) -> Result<Value> {
        let Value::Object(mut record) = body else {
            return Err(anyhow::anyhow!("Record for {} must be a JSON object", resource));
        };

        let mut collections = self.collections.lock().await;
        let records = collections.entry(resource).or_default();

        match record.get("id").and_then(Value::as_str) {
            Some(id) if records.iter().any(|r| record_id(r) == Some(id)) => {
                return Err(anyhow::anyhow!(
                    "A record with id '{}' already exists in {}",
                    id,
                    resource
                ));
            }
            Some(_) => {}
            None => {
                record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
            }
        }
        stamp(resource, &mut record, true);

        let record = Value::Object(record);
        debug!(%resource, id = ?record_id(&record), "stored record in memory");
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, resource: Resource, id: &str, body: Value) -> Result<Value> {
        let Value::Object(mut record) = body else {
            return Err(anyhow::anyhow!("Record for {} must be a JSON object", resource));
        };

        let mut collections = self.collections.lock().await;
        let slot = collections
            .get_mut(&resource)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .with_context(|| format!("No record with id '{}' in {}", id, resource))?;

        record.insert("id".to_string(), Value::String(id.to_string()));
        if let Some(created) = slot.get("dataCadastro") {
            record.insert("dataCadastro".to_string(), created.clone());
        }
        stamp(resource, &mut record, false);

        *slot = Value::Object(record);
        Ok(slot.clone())
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<()> {
        let mut collections = self.collections.lock().await;
        let records = collections.entry(resource).or_default();
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));

        if records.len() == before {
            return Err(anyhow::anyhow!(
                "No record with id '{}' in {}",
                id,
                resource
            ));
        }
        Ok(())
    }
}
