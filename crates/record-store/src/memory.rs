use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Collection, Record, RecordQuery, Result, StoreError,
    store::{RecordStore, Transaction, WriteOp, validate_transaction},
};

type Collections = HashMap<Collection, Vec<Record>>;

/// In-memory record store.
///
/// Commits are applied to a staged copy under the write lock and swapped in
/// only when every write succeeded.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    collections: Arc<RwLock<Collections>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryRecordStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next commit fail with [`StoreError::InjectedFailure`].
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Returns the number of records in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }

    /// Clears every collection.
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }

    fn apply(state: &mut Collections, op: WriteOp) -> Result<()> {
        match op {
            WriteOp::Insert(record) => {
                let records = state.entry(record.collection).or_default();
                if records.iter().any(|r| r.id == record.id) {
                    return Err(StoreError::DuplicateRecord {
                        collection: record.collection,
                        id: record.id,
                    });
                }
                records.push(record);
            }
            WriteOp::Put(record) => {
                let records = state.entry(record.collection).or_default();
                match records.iter_mut().find(|r| r.id == record.id) {
                    Some(existing) => *existing = record,
                    None => records.push(record),
                }
            }
            WriteOp::Delete { collection, id } => {
                let records = state.entry(collection).or_default();
                let Some(pos) = records.iter().position(|r| r.id == id) else {
                    return Err(StoreError::RecordNotFound { collection, id });
                };
                records.remove(pos);
            }
            WriteOp::ReplaceAll {
                collection,
                records,
            } => {
                state.insert(collection, records);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn commit(&self, tx: Transaction) -> Result<()> {
        validate_transaction(&tx)?;

        let mut state = self.collections.write().await;

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            metrics::counter!("store_commit_failures_total", "backend" => "memory").increment(1);
            tracing::warn!("Injected commit failure");
            return Err(StoreError::InjectedFailure);
        }

        let writes = tx.len();
        let mut staged = state.clone();
        for op in tx.into_ops() {
            if let Err(e) = Self::apply(&mut staged, op) {
                metrics::counter!("store_commit_failures_total", "backend" => "memory")
                    .increment(1);
                return Err(e);
            }
        }
        *state = staged;

        metrics::counter!("store_commits_total", "backend" => "memory").increment(1);
        tracing::debug!(writes, "Committed transaction");
        Ok(())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let state = self.collections.read().await;
        Ok(state
            .get(&collection)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>> {
        let state = self.collections.read().await;
        Ok(state.get(&collection).cloned().unwrap_or_default())
    }

    async fn query(&self, query: RecordQuery) -> Result<Vec<Record>> {
        let state = self.collections.read().await;
        let records: Vec<_> = state
            .get(&query.collection)
            .map(|records| records.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();
        Ok(query.page(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordStoreExt;

    fn rod(id: &str, weight: f64) -> Record {
        Record::new(Collection::Rods, id, serde_json::json!({ "weight": weight }))
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = InMemoryRecordStore::new();
        store.insert(rod("a", 1.0)).await.unwrap();

        let loaded = store.get(Collection::Rods, "a").await.unwrap().unwrap();
        assert_eq!(loaded.payload["weight"], 1.0);
        assert!(store.get(Collection::Rods, "b").await.unwrap().is_none());
        assert!(store.get(Collection::Processes, "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_all_keeps_insertion_order() {
        let store = InMemoryRecordStore::new();
        for id in ["c", "a", "b"] {
            store.insert(rod(id, 1.0)).await.unwrap();
        }

        let all = store.get_all(Collection::Rods).await.unwrap();
        assert_eq!(ids(&all), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn duplicate_insert_fails() {
        let store = InMemoryRecordStore::new();
        store.insert(rod("a", 1.0)).await.unwrap();

        let result = store.insert(rod("a", 2.0)).await;
        assert!(matches!(result, Err(StoreError::DuplicateRecord { .. })));
    }

    #[tokio::test]
    async fn put_replaces_in_place() {
        let store = InMemoryRecordStore::new();
        store.insert(rod("a", 1.0)).await.unwrap();
        store.insert(rod("b", 1.0)).await.unwrap();

        store.put(rod("a", 5.0)).await.unwrap();

        let all = store.get_all(Collection::Rods).await.unwrap();
        assert_eq!(ids(&all), vec!["a", "b"]);
        assert_eq!(all[0].payload["weight"], 5.0);
    }

    #[tokio::test]
    async fn delete_missing_record_fails() {
        let store = InMemoryRecordStore::new();
        let result = store.delete(Collection::Rods, "nope").await;
        assert!(matches!(result, Err(StoreError::RecordNotFound { .. })));
    }

    #[tokio::test]
    async fn failed_write_rolls_back_whole_transaction() {
        let store = InMemoryRecordStore::new();
        store.insert(rod("a", 1.0)).await.unwrap();

        let tx = Transaction::new()
            .put(rod("a", 0.5))
            .insert(rod("b", 1.0))
            .delete(Collection::Rods, "missing");
        assert!(store.commit(tx).await.is_err());

        let all = store.get_all(Collection::Rods).await.unwrap();
        assert_eq!(ids(&all), vec!["a"]);
        assert_eq!(all[0].payload["weight"], 1.0);
    }

    #[tokio::test]
    async fn injected_failure_applies_nothing() {
        let store = InMemoryRecordStore::new();
        store.fail_next_commit();

        let result = store.insert(rod("a", 1.0)).await;
        assert!(matches!(result, Err(StoreError::InjectedFailure)));
        assert_eq!(store.count(Collection::Rods).await, 0);

        // Only the next commit fails.
        store.insert(rod("a", 1.0)).await.unwrap();
        assert_eq!(store.count(Collection::Rods).await, 1);
    }

    #[tokio::test]
    async fn replace_all_swaps_collection() {
        let store = InMemoryRecordStore::new();
        store.insert(rod("a", 1.0)).await.unwrap();

        store
            .replace_all(Collection::Rods, vec![rod("x", 2.0), rod("y", 3.0)])
            .await
            .unwrap();

        let all = store.get_all(Collection::Rods).await.unwrap();
        assert_eq!(ids(&all), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn get_by_process_filters_secondary_key() {
        let store = InMemoryRecordStore::new();
        let tx = Transaction::new()
            .insert(
                Record::new(Collection::FinishedGoods, "f1", serde_json::json!({}))
                    .with_process_id("p1"),
            )
            .insert(
                Record::new(Collection::FinishedGoods, "f2", serde_json::json!({}))
                    .with_process_id("p2"),
            );
        store.commit(tx).await.unwrap();

        let found = store
            .get_by_process(Collection::FinishedGoods, "p1")
            .await
            .unwrap();
        assert_eq!(ids(&found), vec!["f1"]);
    }

    #[tokio::test]
    async fn query_with_paging() {
        let store = InMemoryRecordStore::new();
        for id in ["a", "b", "c", "d"] {
            store.insert(rod(id, 1.0)).await.unwrap();
        }

        let page = store
            .query(RecordQuery::new(Collection::Rods).offset(2).limit(5))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["c", "d"]);
    }
}
