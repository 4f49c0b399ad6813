//! Strongly-typed ID wrappers for all entity types
//!
//! Every id is a 12-byte MongoDB-style ObjectId, rendered as 24 lowercase hex
//! characters on the wire. Newtype wrappers prevent accidentally mixing up ids
//! from different entity types at compile time.

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AdminError;

/// Check whether a string is a 24-character hex ObjectId
pub fn is_valid_object_id(s: &str) -> bool {
    s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(ObjectId);

        impl $name {
            /// Create a new, time-ordered ID
            pub fn new() -> Self {
                Self(ObjectId::new())
            }

            /// Wrap an existing ObjectId
            pub fn from_object_id(oid: ObjectId) -> Self {
                Self(oid)
            }

            /// Get the underlying ObjectId
            pub fn as_object_id(&self) -> &ObjectId {
                &self.0
            }

            /// Lowercase 24-character hex form
            pub fn to_hex(&self) -> String {
                self.0.to_hex()
            }

            /// Parse an ID from its hex form
            pub fn parse(s: &str) -> Result<Self, AdminError> {
                let s = s.trim();
                if !is_valid_object_id(s) {
                    return Err(AdminError::InvalidId(format!("{} id '{}'", $entity, s)));
                }
                ObjectId::parse_str(s)
                    .map(Self)
                    .map_err(|e| AdminError::InvalidId(format!("{} id '{}': {}", $entity, s, e)))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = AdminError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_id!(EquipmentId, "Equipment");
define_id!(ProjectId, "Project");
define_id!(TaskId, "Task");
define_id!(ClientId, "Client");
define_id!(MaintenanceId, "Maintenance");
define_id!(WidgetId, "Widget");
define_id!(UserId, "User");
define_id!(AuditLogId, "AuditLog");
define_id!(VersionId, "VersionHistory");
