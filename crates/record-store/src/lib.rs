//! Keyed record store.
//!
//! Records live in named collections, keep their insertion order and are
//! written through [`Transaction`]s that apply all-or-nothing.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use query::RecordQuery;
pub use record::{Collection, Record};
pub use store::{RecordStore, RecordStoreExt, Transaction, WriteOp, validate_transaction};
