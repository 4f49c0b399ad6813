//! Version store
//!
//! All version entries live in `versions.json`. Assigning the next version
//! number and inserting the entry happen under one write lock, so two writers
//! in the same process can never both claim the same number.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::{extract_changes, FieldChange};
use crate::error::{AdminError, AdminResult};
use crate::models::{is_valid_object_id, ResourceKind, UserId, VersionId};
use crate::storage::file_io::{read_json, write_json_atomic};

use super::entry::VersionHistory;

#[derive(Debug, Default, Serialize, Deserialize)]
struct VersionFile {
    #[serde(default)]
    versions: Vec<VersionHistory>,
}

/// Repository for version history entries
pub struct VersionStore {
    path: PathBuf,
    data: RwLock<Vec<VersionHistory>>,
}

impl VersionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> AdminResult<RwLockReadGuard<'_, Vec<VersionHistory>>> {
        self.data
            .read()
            .map_err(|e| AdminError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> AdminResult<RwLockWriteGuard<'_, Vec<VersionHistory>>> {
        self.data
            .write()
            .map_err(|e| AdminError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn persist(&self, versions: &[VersionHistory]) -> AdminResult<()> {
        #[derive(Serialize)]
        struct VersionFileRef<'a> {
            versions: &'a [VersionHistory],
        }

        write_json_atomic(&self.path, &VersionFileRef { versions })
    }

    pub fn load(&self) -> AdminResult<()> {
        let file: VersionFile = read_json(&self.path)?;
        *self.write()? = file.versions;
        Ok(())
    }

    pub fn save(&self) -> AdminResult<()> {
        let data = self.read()?;
        self.persist(&data)
    }

    /// Snapshot `new_data` as the next version of a document
    ///
    /// The version number is the current maximum for `(resource, resource_id)`
    /// plus one, or 1 for a document without history. `changes` is the field
    /// diff from `old_data`, ignoring internal fields.
    pub fn create_version_history(
        &self,
        resource: ResourceKind,
        resource_id: &str,
        old_data: &Value,
        new_data: &Value,
        changed_by: Option<UserId>,
        comment: Option<String>,
    ) -> AdminResult<VersionHistory> {
        self.append_next(
            resource,
            resource_id,
            new_data.clone(),
            extract_changes(old_data, new_data),
            changed_by,
            comment,
        )
    }

    /// Append an entry with an explicit change set under the next version number
    pub fn append_next(
        &self,
        resource: ResourceKind,
        resource_id: &str,
        data: Value,
        changes: Vec<FieldChange>,
        changed_by: Option<UserId>,
        comment: Option<String>,
    ) -> AdminResult<VersionHistory> {
        if !is_valid_object_id(resource_id) {
            return Err(AdminError::InvalidId(format!(
                "{} id '{}'",
                resource, resource_id
            )));
        }
        let resource_id = resource_id.to_lowercase();

        let mut versions = self.write()?;

        let next = versions
            .iter()
            .filter(|v| v.resource == resource && v.resource_id == resource_id)
            .map(|v| v.version)
            .max()
            .unwrap_or(0)
            + 1;

        let entry = VersionHistory {
            id: VersionId::new(),
            resource,
            resource_id,
            version: next,
            data,
            changes,
            changed_by,
            changed_at: Utc::now(),
            comment,
            is_rolled_back: false,
        };

        versions.push(entry.clone());
        if let Err(e) = self.persist(&versions) {
            versions.pop();
            return Err(e);
        }

        tracing::debug!(
            resource = %entry.resource,
            resource_id = %entry.resource_id,
            version = entry.version,
            "version recorded"
        );

        Ok(entry)
    }

    /// Highest version number recorded for a document
    pub fn latest_version(
        &self,
        resource: ResourceKind,
        resource_id: &str,
    ) -> AdminResult<Option<u32>> {
        Ok(self
            .read()?
            .iter()
            .filter(|v| v.resource == resource && v.resource_id.eq_ignore_ascii_case(resource_id))
            .map(|v| v.version)
            .max())
    }

    /// All versions of a document, newest first
    pub fn list(&self, resource: ResourceKind, resource_id: &str) -> AdminResult<Vec<VersionHistory>> {
        let mut versions: Vec<VersionHistory> = self
            .read()?
            .iter()
            .filter(|v| v.resource == resource && v.resource_id.eq_ignore_ascii_case(resource_id))
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    pub fn get(
        &self,
        resource: ResourceKind,
        resource_id: &str,
        version: u32,
    ) -> AdminResult<Option<VersionHistory>> {
        Ok(self
            .read()?
            .iter()
            .find(|v| {
                v.resource == resource
                    && v.resource_id.eq_ignore_ascii_case(resource_id)
                    && v.version == version
            })
            .cloned())
    }

    /// Field differences going from version `from` to version `to`
    pub fn compare_versions(
        &self,
        resource: ResourceKind,
        resource_id: &str,
        from: u32,
        to: u32,
    ) -> AdminResult<Vec<FieldChange>> {
        let a = self
            .get(resource, resource_id, from)?
            .ok_or_else(|| AdminError::version_not_found(resource_id, from))?;
        let b = self
            .get(resource, resource_id, to)?
            .ok_or_else(|| AdminError::version_not_found(resource_id, to))?;
        Ok(extract_changes(&a.data, &b.data))
    }

    /// Flag a version as the target of a rollback
    pub fn mark_rolled_back(
        &self,
        resource: ResourceKind,
        resource_id: &str,
        version: u32,
    ) -> AdminResult<()> {
        let mut versions = self.write()?;
        let entry = versions
            .iter_mut()
            .find(|v| {
                v.resource == resource
                    && v.resource_id.eq_ignore_ascii_case(resource_id)
                    && v.version == version
            })
            .ok_or_else(|| AdminError::version_not_found(resource_id, version))?;
        entry.is_rolled_back = true;
        self.persist(&versions)
    }

    pub fn count(&self) -> AdminResult<usize> {
        Ok(self.read()?.len())
    }
}
