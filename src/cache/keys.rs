//! Cache key conventions
//!
//! - `<prefix>:<id>` for a single document
//! - `api:<api path>?<query>` for list responses
//! - `dashboard:*` for aggregated dashboard data

use std::fmt::Display;

use crate::models::ResourceKind;

pub const DASHBOARD_STATS_KEY: &str = "dashboard:stats";

pub fn document_key(kind: ResourceKind, id: impl Display) -> String {
    format!("{}:{}", kind.cache_prefix(), id)
}

pub fn list_key(kind: ResourceKind, query: &str) -> String {
    format!("api:{}?{}", kind.api_path(), query)
}

/// Patterns to delete after any mutation of `kind`
pub fn invalidation_patterns(kind: ResourceKind) -> Vec<String> {
    vec![
        format!("{}:*", kind.cache_prefix()),
        format!("api:{}*", kind.api_path()),
        "dashboard:*".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(document_key(ResourceKind::Project, "abc"), "project:abc");
        assert_eq!(
            list_key(ResourceKind::Equipment, "status=AVAILABLE"),
            "api:/api/equipment?status=AVAILABLE"
        );
    }

    #[test]
    fn test_invalidation_patterns() {
        assert_eq!(
            invalidation_patterns(ResourceKind::Task),
            vec!["task:*", "api:/api/tasks*", "dashboard:*"]
        );
        assert_eq!(
            invalidation_patterns(ResourceKind::Widget),
            vec!["widget:*", "api:/api/widgets*", "dashboard:*"]
        );
    }
}
