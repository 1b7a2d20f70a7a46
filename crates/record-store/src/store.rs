use std::collections::HashSet;

use async_trait::async_trait;

use crate::{Collection, Record, RecordQuery, Result, StoreError};

/// A single write inside a [`Transaction`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Adds a new record; fails if the id already exists.
    Insert(Record),
    /// Replaces the record with the same id, or adds it if absent.
    /// A replaced record keeps its position in the collection.
    Put(Record),
    /// Removes a record; fails if the id does not exist.
    Delete { collection: Collection, id: String },
    /// Replaces the whole collection with the given records.
    ReplaceAll {
        collection: Collection,
        records: Vec<Record>,
    },
}

impl WriteOp {
    /// Returns the collection this write touches.
    pub fn collection(&self) -> Collection {
        match self {
            WriteOp::Insert(r) | WriteOp::Put(r) => r.collection,
            WriteOp::Delete { collection, .. } | WriteOp::ReplaceAll { collection, .. } => {
                *collection
            }
        }
    }
}

/// An ordered set of writes applied atomically by [`RecordStore::commit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    ops: Vec<WriteOp>,
}

impl Transaction {
    /// Creates an empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an insert.
    pub fn insert(mut self, record: Record) -> Self {
        self.ops.push(WriteOp::Insert(record));
        self
    }

    /// Adds a put.
    pub fn put(mut self, record: Record) -> Self {
        self.ops.push(WriteOp::Put(record));
        self
    }

    /// Adds a delete.
    pub fn delete(mut self, collection: Collection, id: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Delete {
            collection,
            id: id.into(),
        });
        self
    }

    /// Adds a wholesale replacement of a collection.
    pub fn replace_all(mut self, collection: Collection, records: Vec<Record>) -> Self {
        self.ops.push(WriteOp::ReplaceAll {
            collection,
            records,
        });
        self
    }

    /// Appends a write in place.
    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    /// Appends every write of another transaction.
    pub fn extend(&mut self, other: Transaction) {
        self.ops.extend(other.ops);
    }

    /// Returns the writes in order.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Consumes the transaction, returning its writes.
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Core trait for record store implementations.
///
/// All implementations must be thread-safe (Send + Sync). Readers never
/// observe a partially applied commit.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Applies every write in the transaction, or none of them.
    async fn commit(&self, tx: Transaction) -> Result<()>;

    /// Retrieves one record by id.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Record>>;

    /// Retrieves all records of a collection in insertion order.
    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>>;

    /// Retrieves records matching a query, in insertion order.
    async fn query(&self, query: RecordQuery) -> Result<Vec<Record>>;
}

/// Extension trait providing single-write convenience methods.
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    /// Inserts one record.
    async fn insert(&self, record: Record) -> Result<()> {
        self.commit(Transaction::new().insert(record)).await
    }

    /// Inserts or replaces one record.
    async fn put(&self, record: Record) -> Result<()> {
        self.commit(Transaction::new().put(record)).await
    }

    /// Deletes one record.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.commit(Transaction::new().delete(collection, id)).await
    }

    /// Replaces a whole collection.
    async fn replace_all(&self, collection: Collection, records: Vec<Record>) -> Result<()> {
        self.commit(Transaction::new().replace_all(collection, records))
            .await
    }

    /// Retrieves every record of a collection linked to a process.
    async fn get_by_process(&self, collection: Collection, process_id: &str) -> Result<Vec<Record>> {
        self.query(RecordQuery::new(collection).process_id(process_id))
            .await
    }

    /// Checks if a record exists.
    async fn exists(&self, collection: Collection, id: &str) -> Result<bool> {
        Ok(self.get(collection, id).await?.is_some())
    }
}

// Blanket implementation for all RecordStore implementations
impl<T: RecordStore + ?Sized> RecordStoreExt for T {}

/// Checks a transaction's shape before any store applies it.
pub fn validate_transaction(tx: &Transaction) -> Result<()> {
    if tx.is_empty() {
        return Err(StoreError::InvalidTransaction(
            "Cannot commit an empty transaction".to_string(),
        ));
    }

    for op in tx.ops() {
        match op {
            WriteOp::Insert(record) | WriteOp::Put(record) => {
                if record.id.is_empty() {
                    return Err(StoreError::InvalidTransaction(format!(
                        "Record in {} has an empty id",
                        record.collection
                    )));
                }
            }
            WriteOp::Delete { .. } => {}
            WriteOp::ReplaceAll {
                collection,
                records,
            } => {
                let mut seen = HashSet::new();
                for record in records {
                    if record.collection != *collection {
                        return Err(StoreError::InvalidTransaction(format!(
                            "Record {} belongs to {} but replaces {}",
                            record.id, record.collection, collection
                        )));
                    }
                    if !seen.insert(record.id.as_str()) {
                        return Err(StoreError::DuplicateRecord {
                            collection: *collection,
                            id: record.id.clone(),
                        });
                    }
                }
            }
        }
    }

    Ok(())
}
