//! Construction sites
//!
//! A site is identified by a short code (e.g. `CNT001`) that must be unique
//! across the registry, and carries a full street address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{contains_ci, Record, Resource};
use crate::error::ValidationError;
use crate::utils::formatting::format_cep;
use crate::utils::validation::{require, require_cep};

/// Brazilian federative unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Uf {
    Ac,
    Al,
    Ap,
    Am,
    Ba,
    Ce,
    Df,
    Es,
    Go,
    Ma,
    Mt,
    Ms,
    Mg,
    Pa,
    Pb,
    Pr,
    Pe,
    Pi,
    Rj,
    Rn,
    Rs,
    Ro,
    Rr,
    Sc,
    Sp,
    Se,
    To,
}

impl Uf {
    pub const ALL: [Uf; 27] = [
        Uf::Ac,
        Uf::Al,
        Uf::Ap,
        Uf::Am,
        Uf::Ba,
        Uf::Ce,
        Uf::Df,
        Uf::Es,
        Uf::Go,
        Uf::Ma,
        Uf::Mt,
        Uf::Ms,
        Uf::Mg,
        Uf::Pa,
        Uf::Pb,
        Uf::Pr,
        Uf::Pe,
        Uf::Pi,
        Uf::Rj,
        Uf::Rn,
        Uf::Rs,
        Uf::Ro,
        Uf::Rr,
        Uf::Sc,
        Uf::Sp,
        Uf::Se,
        Uf::To,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Uf::Ac => "AC",
            Uf::Al => "AL",
            Uf::Ap => "AP",
            Uf::Am => "AM",
            Uf::Ba => "BA",
            Uf::Ce => "CE",
            Uf::Df => "DF",
            Uf::Es => "ES",
            Uf::Go => "GO",
            Uf::Ma => "MA",
            Uf::Mt => "MT",
            Uf::Ms => "MS",
            Uf::Mg => "MG",
            Uf::Pa => "PA",
            Uf::Pb => "PB",
            Uf::Pr => "PR",
            Uf::Pe => "PE",
            Uf::Pi => "PI",
            Uf::Rj => "RJ",
            Uf::Rn => "RN",
            Uf::Rs => "RS",
            Uf::Ro => "RO",
            Uf::Rr => "RR",
            Uf::Sc => "SC",
            Uf::Sp => "SP",
            Uf::Se => "SE",
            Uf::To => "TO",
        }
    }
}

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Uf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Uf::ALL
            .into_iter()
            .find(|uf| uf.as_str() == wanted)
            .ok_or_else(|| format!("unknown state '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    #[default]
    Ativo,
    Inativo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub cep: String,
    pub rua: String,
    pub numero: String,
    #[serde(default)]
    pub complemento: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: Uf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionSite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub codigo: String,
    pub endereco: Address,
    pub responsavel: String,
    #[serde(default)]
    pub status: SiteStatus,
    /// Set by the backend on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_cadastro: Option<String>,
}

impl Record for ConstructionSite {
    const RESOURCE: Resource = Resource::ConstructionSites;
    const CHECK_CONFLICTS: bool = true;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn normalize(&mut self) {
        self.codigo = self.codigo.trim().to_uppercase();
        self.endereco.cep = format_cep(&self.endereco.cep);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("codigo", &self.codigo)?;
        require("cep", &self.endereco.cep)?;
        require("rua", &self.endereco.rua)?;
        require("numero", &self.endereco.numero)?;
        require("bairro", &self.endereco.bairro)?;
        require("cidade", &self.endereco.cidade)?;
        require("responsavel", &self.responsavel)?;
        require_cep("cep", &self.endereco.cep)
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.codigo, needle)
            || contains_ci(&self.endereco.cidade, needle)
            || contains_ci(&self.responsavel, needle)
    }

    fn conflicts_with(&self, other: &Self) -> Option<ValidationError> {
        let same_record = self.id.is_some() && self.id == other.id;
        if !same_record && self.codigo == other.codigo {
            return Some(ValidationError::DuplicateCode(self.codigo.clone()));
        }
        None
    }
}
