//! `melorate-io`: storage seam, startup migration flow and export/import
//! documents.

pub mod error;
pub mod startup;
pub mod store;
pub mod transfer;

pub use error::{StartupError, StoreError, TransferError};
pub use startup::{run_startup, StartupReport};
pub use store::{FileStore, KvStore, MemoryStore, DATA_VERSION_KEY, ENTRIES_KEY, PROFILES_KEY};
pub use transfer::{export_document, import_document, ExportDocument, ImportOutcome};
