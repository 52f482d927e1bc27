//! Workers
//!
//! Workers are identified by CPF and employee number and are allocated to
//! one of the registered lodgings.

use serde::{Deserialize, Serialize};

use super::{contains_ci, Record, Resource};
use crate::error::ValidationError;
use crate::utils::formatting::format_cpf;
use crate::utils::validation::{require, require_cpf, require_min_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Colaborador,
    Gerente,
    Motorista,
    Administrativo,
    Supervisor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    #[default]
    Ativo,
    Afastado,
    Desligado,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nome_completo: String,
    pub perfil: Profile,
    pub matricula: String,
    /// Masked as `000.000.000-00`
    pub cpf: String,
    pub funcao: String,
    #[serde(default)]
    pub status: WorkerStatus,
    /// Identifier of the lodging the worker is allocated to
    pub alocacao: String,
}

impl Record for Worker {
    const RESOURCE: Resource = Resource::Workers;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn normalize(&mut self) {
        self.cpf = format_cpf(&self.cpf);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_min_len("nomeCompleto", &self.nome_completo, 3)?;
        require("matricula", &self.matricula)?;
        require_cpf("cpf", &self.cpf)?;
        require("funcao", &self.funcao)?;
        require("alocacao", &self.alocacao)
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.nome_completo, needle)
            || contains_ci(&self.matricula, needle)
            || contains_ci(&self.funcao, needle)
    }
}
