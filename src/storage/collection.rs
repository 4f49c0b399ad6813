//! Generic document collection backed by one JSON file
//!
//! Documents are held in memory behind an `RwLock` keyed by id, loaded once and
//! written back whole with `save()`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AdminError;
use crate::models::Document;

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of a collection file
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
struct CollectionFile<T> {
    #[serde(default = "Vec::new")]
    documents: Vec<T>,
}

impl<T> Default for CollectionFile<T> {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
        }
    }
}

/// Repository for one document type
pub struct Collection<T: Document> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Document> Collection<T> {
    /// Create a new, empty collection backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<T::Id, T>>, AdminError> {
        self.data
            .read()
            .map_err(|e| AdminError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<T::Id, T>>, AdminError> {
        self.data
            .write()
            .map_err(|e| AdminError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load documents from disk, replacing what is in memory
    pub fn load(&self) -> Result<(), AdminError> {
        let file_data: CollectionFile<T> = read_json(&self.path)?;

        let mut data = self.write()?;
        data.clear();
        for doc in file_data.documents {
            data.insert(doc.id(), doc);
        }

        Ok(())
    }

    /// Save documents to disk, oldest first
    pub fn save(&self) -> Result<(), AdminError> {
        let data = self.read()?;

        let mut documents: Vec<T> = data.values().cloned().collect();
        documents.sort_by_key(|d| d.created_at());

        write_json_atomic(&self.path, &CollectionFile { documents })
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, AdminError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Get all documents, newest first
    pub fn get_all(&self) -> Result<Vec<T>, AdminError> {
        let mut docs: Vec<T> = self.read()?.values().cloned().collect();
        docs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(docs)
    }

    /// Documents matching a predicate, newest first
    pub fn find<F>(&self, predicate: F) -> Result<Vec<T>, AdminError>
    where
        F: Fn(&T) -> bool,
    {
        let mut docs: Vec<T> = self
            .read()?
            .values()
            .filter(|d| predicate(d))
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(docs)
    }

    /// Whether any document matches a predicate
    pub fn any<F>(&self, predicate: F) -> Result<bool, AdminError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.values().any(predicate))
    }

    /// Insert or replace a document
    pub fn upsert(&self, doc: T) -> Result<(), AdminError> {
        self.write()?.insert(doc.id(), doc);
        Ok(())
    }

    /// Insert or replace several documents under one lock
    pub fn upsert_many(&self, docs: Vec<T>) -> Result<(), AdminError> {
        let mut data = self.write()?;
        for doc in docs {
            data.insert(doc.id(), doc);
        }
        Ok(())
    }

    /// Remove a document, returning it if it existed
    pub fn delete(&self, id: T::Id) -> Result<Option<T>, AdminError> {
        Ok(self.write()?.remove(&id))
    }

    pub fn exists(&self, id: T::Id) -> Result<bool, AdminError> {
        Ok(self.read()?.contains_key(&id))
    }

    pub fn count(&self) -> Result<usize, AdminError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Equipment, EquipmentStatus};
    use tempfile::TempDir;

    fn create_test_collection() -> (TempDir, Collection<Equipment>) {
        let temp_dir = TempDir::new().unwrap();
        let collection = Collection::new(temp_dir.path().join("equipment.json"));
        (temp_dir, collection)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, collection) = create_test_collection();
        collection.load().unwrap();
        assert_eq!(collection.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, collection) = create_test_collection();
        let eq = Equipment::new("Fog Machine", "Effects");
        let id = eq.id;

        collection.upsert(eq).unwrap();

        let retrieved = collection.get(id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Fog Machine");
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, collection) = create_test_collection();
        let eq = Equipment::new("Subwoofer", "Audio");
        let id = eq.id;

        collection.upsert(eq).unwrap();
        collection.save().unwrap();

        let reloaded: Collection<Equipment> =
            Collection::new(temp_dir.path().join("equipment.json"));
        reloaded.load().unwrap();

        assert_eq!(reloaded.get(id).unwrap().unwrap().name, "Subwoofer");
    }

    #[test]
    fn test_find_and_any() {
        let (_temp_dir, collection) = create_test_collection();
        let mut broken = Equipment::new("Dimmer", "Lighting");
        broken.status = EquipmentStatus::Broken;
        collection.upsert(broken).unwrap();
        collection.upsert(Equipment::new("Par Can", "Lighting")).unwrap();

        let found = collection
            .find(|e| e.status == EquipmentStatus::Broken)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dimmer");
        assert!(collection.any(|e| e.name == "Par Can").unwrap());
        assert!(!collection.any(|e| e.name == "Hazer").unwrap());
    }

    #[test]
    fn test_delete_returns_removed_document() {
        let (_temp_dir, collection) = create_test_collection();
        let eq = Equipment::new("Cable Ramp", "Rigging");
        let id = eq.id;
        collection.upsert(eq).unwrap();

        let removed = collection.delete(id).unwrap();
        assert_eq!(removed.map(|e| e.name), Some("Cable Ramp".to_string()));
        assert!(!collection.exists(id).unwrap());
        assert!(collection.delete(id).unwrap().is_none());
    }
}
