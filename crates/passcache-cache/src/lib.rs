//! Encrypted, self-invalidating cache of records parsed from a password
//! manager export.
//!
//! [`CacheManager`] is the single entry point: it serves the on-disk
//! [`Snapshot`] while its fingerprint matches the source file, and rebuilds it
//! through the [`ingest`] pipeline otherwise.

pub mod error;
pub mod fingerprint;
pub mod ingest;
pub mod manager;
pub mod types;

pub use error::{CacheError, Result};
pub use fingerprint::fingerprint;
pub use ingest::{parse_source, IngestReport, RecordKind};
pub use manager::{CacheManager, CacheState, LoadOrigin, Loaded, RebuildReason};
pub use types::{Credential, PaymentCard, SecureNote, Snapshot};
