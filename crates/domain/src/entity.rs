//! Mapping between domain records and stored records.

use record_store::{Collection, Record, RecordStore, RecordStoreExt};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::DomainError;

/// A domain type stored as one record in a fixed collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection records of this type live in.
    const COLLECTION: Collection;

    /// Returns the record key.
    fn key(&self) -> String;

    /// Returns the process this record belongs to, if any.
    fn process_key(&self) -> Option<&str> {
        None
    }

    /// Serializes into a stored record.
    fn to_record(&self) -> Result<Record, serde_json::Error> {
        let record = Record::from_value(Self::COLLECTION, self.key(), self)?;
        Ok(match self.process_key() {
            Some(pid) => record.with_process_id(pid),
            None => record,
        })
    }

    /// Deserializes from a stored record.
    fn from_record(record: &Record) -> Result<Self, serde_json::Error> {
        record.decode()
    }
}

/// Loads every record of an entity type in insertion order.
pub async fn load_all<E, S>(store: &S) -> Result<Vec<E>, DomainError>
where
    E: Entity,
    S: RecordStore + ?Sized,
{
    let records = store.get_all(E::COLLECTION).await?;
    records
        .iter()
        .map(|r| E::from_record(r).map_err(DomainError::from))
        .collect()
}

/// Loads one entity by key.
pub async fn load_one<E, S>(store: &S, key: &str) -> Result<Option<E>, DomainError>
where
    E: Entity,
    S: RecordStore + ?Sized,
{
    match store.get(E::COLLECTION, key).await? {
        Some(record) => Ok(Some(E::from_record(&record)?)),
        None => Ok(None),
    }
}

/// Loads every entity linked to a process.
pub async fn load_for_process<E, S>(store: &S, process_id: &str) -> Result<Vec<E>, DomainError>
where
    E: Entity,
    S: RecordStore + ?Sized,
{
    let records = store.get_by_process(E::COLLECTION, process_id).await?;
    records
        .iter()
        .map(|r| E::from_record(r).map_err(DomainError::from))
        .collect()
}
