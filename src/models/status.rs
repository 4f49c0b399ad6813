//! Closed status enums shared by the resource models
//!
//! Each enum serializes as SCREAMING_SNAKE_CASE (e.g. `IN_USE`) so documents
//! and diffs carry the same values the admin clients use.

/// Generate a closed enum with wire names, parsing and display
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire name of this variant
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Parse from a wire name; case-insensitive, `-` and spaces read as `_`
            pub fn parse(s: &str) -> Option<Self> {
                let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Comma-separated list of accepted values, for error messages
            pub fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str().to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_enum! {
    /// Availability of a piece of equipment
    EquipmentStatus, default = Available {
        Available => "AVAILABLE",
        InUse => "IN_USE",
        Maintenance => "MAINTENANCE",
        Broken => "BROKEN",
        Retired => "RETIRED",
    }
}

closed_enum! {
    /// Lifecycle of a production project
    ProjectStatus, default = Planning {
        Planning => "PLANNING",
        Confirmed => "CONFIRMED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

closed_enum! {
    TaskStatus, default = Todo {
        Todo => "TODO",
        InProgress => "IN_PROGRESS",
        Review => "REVIEW",
        Done => "DONE",
        Cancelled => "CANCELLED",
    }
}

closed_enum! {
    TaskPriority, default = Medium {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Urgent => "URGENT",
    }
}

closed_enum! {
    MaintenanceType, default = Preventive {
        Preventive => "PREVENTIVE",
        Repair => "REPAIR",
        Inspection => "INSPECTION",
    }
}

closed_enum! {
    MaintenanceStatus, default = Scheduled {
        Scheduled => "SCHEDULED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

closed_enum! {
    /// Kind of dashboard tile
    WidgetType, default = Stats {
        Stats => "STATS",
        EquipmentStatus => "EQUIPMENT_STATUS",
        UpcomingProjects => "UPCOMING_PROJECTS",
        Tasks => "TASKS",
        MaintenanceDue => "MAINTENANCE_DUE",
        RecentActivity => "RECENT_ACTIVITY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&EquipmentStatus::InUse).unwrap(),
            "\"IN_USE\""
        );
        assert_eq!(
            serde_json::to_string(&WidgetType::MaintenanceDue).unwrap(),
            "\"MAINTENANCE_DUE\""
        );
        assert_eq!(EquipmentStatus::InUse.to_string(), "IN_USE");
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(EquipmentStatus::parse("in-use"), Some(EquipmentStatus::InUse));
        assert_eq!(EquipmentStatus::parse("In Use"), Some(EquipmentStatus::InUse));
        assert_eq!(ProjectStatus::parse("completed"), Some(ProjectStatus::Completed));
        assert_eq!(TaskPriority::parse("whenever"), None);
    }

    #[test]
    fn test_closed_set_rejects_unknown_on_deserialize() {
        assert!(serde_json::from_str::<TaskStatus>("\"ARCHIVED\"").is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(EquipmentStatus::default(), EquipmentStatus::Available);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
        assert_eq!(MaintenanceStatus::default(), MaintenanceStatus::Scheduled);
    }

    #[test]
    fn test_expected_lists_all_values() {
        assert_eq!(
            MaintenanceType::expected(),
            "preventive, repair, inspection"
        );
    }
}
