//! Equipment model
//!
//! Represents a piece of production gear (lights, audio, rigging, vehicles...)
//! tracked in the inventory.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EquipmentId;
use super::money::Money;
use super::resource::{Document, ResourceKind};
use super::status::EquipmentStatus;

/// A piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    #[serde(rename = "_id")]
    pub id: EquipmentId,

    pub name: String,

    /// Free-form category (e.g. "Lighting", "Audio")
    #[serde(default)]
    pub category: String,

    /// Manufacturer serial number, unique across the inventory
    #[serde(default)]
    pub serial_number: Option<String>,

    #[serde(default)]
    pub status: EquipmentStatus,

    /// Warehouse or venue where the item currently is
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,

    #[serde(default)]
    pub purchase_price: Money,

    /// QR code reference printed on the asset label
    pub qr_code: String,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    /// Create a new available piece of equipment with a generated QR reference
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Utc::now();
        let id = EquipmentId::new();
        Self {
            id,
            name: name.into(),
            category: category.into(),
            serial_number: None,
            status: EquipmentStatus::Available,
            location: None,
            purchase_date: None,
            purchase_price: Money::zero(),
            qr_code: Self::qr_code_for(id),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// QR code reference for an equipment id
    pub fn qr_code_for(id: EquipmentId) -> String {
        format!("SKP-EQ-{}", id.to_hex().to_uppercase())
    }

    /// Change the status
    pub fn set_status(&mut self, status: EquipmentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Whether the item can be assigned to a project
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.status,
            EquipmentStatus::Available | EquipmentStatus::InUse
        )
    }

    /// Validate the equipment
    pub fn validate(&self) -> Result<(), EquipmentValidationError> {
        if self.name.trim().is_empty() {
            return Err(EquipmentValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(EquipmentValidationError::NameTooLong(self.name.len()));
        }

        if self.purchase_price.is_negative() {
            return Err(EquipmentValidationError::NegativePrice);
        }

        if let Some(serial) = &self.serial_number {
            if serial.trim().is_empty() {
                return Err(EquipmentValidationError::EmptySerial);
            }
        }

        Ok(())
    }
}

impl Document for Equipment {
    type Id = EquipmentId;

    const KIND: ResourceKind = ResourceKind::Equipment;

    fn id(&self) -> EquipmentId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.status)
    }
}

/// Validation errors for equipment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipmentValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativePrice,
    EmptySerial,
}

impl fmt::Display for EquipmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Equipment name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Equipment name too long ({} chars, max 100)", len)
            }
            Self::NegativePrice => write!(f, "Purchase price cannot be negative"),
            Self::EmptySerial => write!(f, "Serial number cannot be blank"),
        }
    }
}

impl std::error::Error for EquipmentValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_equipment() {
        let eq = Equipment::new("Moving Head Spot", "Lighting");
        assert_eq!(eq.status, EquipmentStatus::Available);
        assert!(eq.qr_code.starts_with("SKP-EQ-"));
        assert!(eq.qr_code.ends_with(&eq.id.to_hex().to_uppercase()));
        assert!(eq.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut eq = Equipment::new("", "Audio");
        assert_eq!(eq.validate(), Err(EquipmentValidationError::EmptyName));

        eq.name = "a".repeat(101);
        assert!(matches!(
            eq.validate(),
            Err(EquipmentValidationError::NameTooLong(101))
        ));

        eq.name = "Mixer".into();
        eq.purchase_price = Money::from_cents(-1);
        assert_eq!(eq.validate(), Err(EquipmentValidationError::NegativePrice));
    }

    #[test]
    fn test_document_shape() {
        let eq = Equipment::new("Truss 3m", "Rigging");
        let value = serde_json::to_value(&eq).unwrap();

        assert!(value.get("_id").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("serialNumber").is_some());
        assert_eq!(value["status"], "AVAILABLE");
    }

    #[test]
    fn test_is_assignable() {
        let mut eq = Equipment::new("Projector", "Video");
        assert!(eq.is_assignable());
        eq.set_status(EquipmentStatus::Broken);
        assert!(!eq.is_assignable());
    }
}
