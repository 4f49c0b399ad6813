//! Version history
//!
//! Every versioned mutation stores a full snapshot of the document together
//! with the field diff that produced it. Snapshots are numbered per document
//! and can be compared or used to roll a document back
//! (see `services::HistoryService`).

mod entry;
mod store;

pub use entry::VersionHistory;
pub use store::VersionStore;
