use crate::{Collection, Record};

/// Builder for filtering the records of one collection.
#[derive(Debug, Clone)]
pub struct RecordQuery {
    /// Collection to read from.
    pub collection: Collection,

    /// Only records linked to this process.
    pub process_id: Option<String>,

    /// Maximum number of records to return.
    pub limit: Option<usize>,

    /// Number of records to skip.
    pub offset: Option<usize>,
}

impl RecordQuery {
    /// Creates a query over a whole collection.
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            process_id: None,
            limit: None,
            offset: None,
        }
    }

    /// Filters to records linked to a process.
    pub fn process_id(mut self, process_id: impl Into<String>) -> Self {
        self.process_id = Some(process_id.into());
        self
    }

    /// Limits the number of records returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many records before returning results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns true if the record passes the filters (ignores paging).
    pub fn matches(&self, record: &Record) -> bool {
        if record.collection != self.collection {
            return false;
        }
        match &self.process_id {
            Some(pid) => record.process_id.as_deref() == Some(pid.as_str()),
            None => true,
        }
    }

    /// Applies offset and limit to an already filtered, ordered list.
    pub fn page(&self, records: Vec<Record>) -> Vec<Record> {
        let skipped = records.into_iter().skip(self.offset.unwrap_or(0));
        match self.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, pid: Option<&str>) -> Record {
        let r = Record::new(Collection::FinishedGoods, id, serde_json::json!({}));
        match pid {
            Some(p) => r.with_process_id(p),
            None => r,
        }
    }

    #[test]
    fn matches_on_collection_and_process() {
        let query = RecordQuery::new(Collection::FinishedGoods).process_id("p-1");

        assert!(query.matches(&record("a", Some("p-1"))));
        assert!(!query.matches(&record("b", Some("p-2"))));
        assert!(!query.matches(&record("c", None)));

        let other = Record::new(Collection::Rods, "d", serde_json::json!({})).with_process_id("p-1");
        assert!(!query.matches(&other));
    }

    #[test]
    fn page_applies_offset_then_limit() {
        let records: Vec<_> = ["a", "b", "c", "d"].iter().map(|id| record(id, None)).collect();
        let query = RecordQuery::new(Collection::FinishedGoods).offset(1).limit(2);

        let ids: Vec<_> = query.page(records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
