//! Materials and their storage locations

use serde::{Deserialize, Serialize};

use super::{contains_ci, Record, Resource};
use crate::error::ValidationError;
use crate::utils::validation::require;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nome: String,
    #[serde(default)]
    pub quantidade: i64,
    /// Name of a storage location
    pub local_armazenamento: String,
}

impl Record for Material {
    const RESOURCE: Resource = Resource::Materials;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn normalize(&mut self) {
        self.nome = self.nome.trim().to_string();
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("nome", &self.nome)?;
        if self.quantidade < 0 {
            return Err(ValidationError::Negative {
                field: "quantidade",
            });
        }
        require("localArmazenamento", &self.local_armazenamento)
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.nome, needle) || contains_ci(&self.local_armazenamento, needle)
    }
}

/// Reference entry for where materials are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub id: String,
    pub nome: String,
}
