//! Fleet vehicles

use serde::{Deserialize, Serialize};

use super::{contains_ci, Record, Resource};
use crate::error::ValidationError;
use crate::utils::validation::require;

/// Passenger transport or cargo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    #[default]
    Transporte,
    Carga,
}

impl VehicleKind {
    /// What `capacidade` measures for this kind of vehicle
    pub fn capacity_label(self) -> &'static str {
        match self {
            VehicleKind::Transporte => "passenger capacity",
            VehicleKind::Carga => "cargo capacity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Fleet number
    pub frota: String,
    #[serde(default)]
    pub tipo_veiculo: VehicleKind,
    /// License plate
    pub placa: String,
    pub capacidade: u32,
}

impl Record for Vehicle {
    const RESOURCE: Resource = Resource::Vehicles;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn normalize(&mut self) {
        self.frota = self.frota.trim().to_string();
        self.placa = self.placa.trim().to_uppercase();
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("frota", &self.frota)?;
        require("placa", &self.placa)?;
        if self.capacidade == 0 {
            return Err(ValidationError::NotPositive {
                field: "capacidade",
            });
        }
        Ok(())
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.frota, needle) || contains_ci(&self.placa, needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: None,
            frota: "F-12".to_string(),
            tipo_veiculo: VehicleKind::Carga,
            placa: " abc1d23 ".to_string(),
            capacidade: 8000,
        }
    }

    #[test]
    fn test_normalize_uppercases_plate() {
        let mut v = vehicle();
        v.normalize();
        assert_eq!(v.placa, "ABC1D23");
        assert!(v.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity() {
        let mut v = vehicle();
        v.capacidade = 0;
        assert_eq!(
            v.validate(),
            Err(ValidationError::NotPositive {
                field: "capacidade"
            })
        );
    }

    #[test]
    fn test_capacity_label_follows_kind() {
        assert_eq!(VehicleKind::Transporte.capacity_label(), "passenger capacity");
        assert_eq!(VehicleKind::Carga.capacity_label(), "cargo capacity");
    }

    #[test]
    fn test_wire_format() {
        let mut v = vehicle();
        v.normalize();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "frota": "F-12",
                "tipo_veiculo": "carga",
                "placa": "ABC1D23",
                "capacidade": 8000
            })
        );
    }
}
