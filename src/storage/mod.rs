//! Storage layer for SK Production Admin
//!
//! One JSON file per collection with atomic writes, plus the version store and
//! the append-only audit log. `Storage` owns all of them.

pub mod collection;
pub mod file_io;

pub use collection::Collection;
pub use file_io::{read_json, write_json_atomic};

use crate::audit::AuditLogger;
use crate::config::SkpPaths;
use crate::error::AdminError;
use crate::history::VersionStore;
use crate::models::{Client, Document, Equipment, Maintenance, Project, ResourceKind, Task, Widget};

/// Main storage coordinator that provides access to all collections
pub struct Storage {
    paths: SkpPaths,
    pub equipment: Collection<Equipment>,
    pub projects: Collection<Project>,
    pub tasks: Collection<Task>,
    pub clients: Collection<Client>,
    pub maintenance: Collection<Maintenance>,
    pub widgets: Collection<Widget>,
    pub versions: VersionStore,
    pub audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: SkpPaths) -> Result<Self, AdminError> {
        paths.ensure_directories()?;

        let file = |kind: ResourceKind| paths.collection_file(kind.collection());

        Ok(Self {
            equipment: Collection::new(file(ResourceKind::Equipment)),
            projects: Collection::new(file(ResourceKind::Project)),
            tasks: Collection::new(file(ResourceKind::Task)),
            clients: Collection::new(file(ResourceKind::Client)),
            maintenance: Collection::new(file(ResourceKind::Maintenance)),
            widgets: Collection::new(file(ResourceKind::Widget)),
            versions: VersionStore::new(paths.versions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Open storage and load everything from disk
    pub fn open(paths: SkpPaths) -> Result<Self, AdminError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SkpPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), AdminError> {
        self.equipment.load()?;
        self.projects.load()?;
        self.tasks.load()?;
        self.clients.load()?;
        self.maintenance.load()?;
        self.widgets.load()?;
        self.versions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), AdminError> {
        self.equipment.save()?;
        self.projects.save()?;
        self.tasks.save()?;
        self.clients.save()?;
        self.maintenance.save()?;
        self.widgets.save()?;
        self.versions.save()?;
        Ok(())
    }

    /// Number of documents of a kind
    pub fn count(&self, kind: ResourceKind) -> Result<usize, AdminError> {
        match kind {
            ResourceKind::Equipment => self.equipment.count(),
            ResourceKind::Project => self.projects.count(),
            ResourceKind::Task => self.tasks.count(),
            ResourceKind::Client => self.clients.count(),
            ResourceKind::Maintenance => self.maintenance.count(),
            ResourceKind::Widget => self.widgets.count(),
        }
    }
}

/// A document type with a home collection in `Storage`
pub trait StoredDocument: Document {
    fn collection(storage: &Storage) -> &Collection<Self>;
}

macro_rules! stored_in {
    ($ty:ty, $field:ident) => {
        impl StoredDocument for $ty {
            fn collection(storage: &Storage) -> &Collection<Self> {
                &storage.$field
            }
        }
    };
}

stored_in!(Equipment, equipment);
stored_in!(Project, projects);
stored_in!(Task, tasks);
stored_in!(Client, clients);
stored_in!(Maintenance, maintenance);
stored_in!(Widget, widgets);
