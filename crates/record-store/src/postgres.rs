use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::{PgPool, Postgres, Row, postgres::PgRow};

use crate::{
    Collection, Record, RecordQuery, Result, StoreError,
    store::{RecordStore, Transaction, WriteOp, validate_transaction},
};

const SELECT_COLUMNS: &str = "SELECT collection, id, process_id, stored_at, payload FROM records";

/// PostgreSQL-backed record store.
///
/// Every collection shares one `records` table keyed by `(collection, id)`.
/// The `seq` column preserves insertion order.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a new PostgreSQL record store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_record(row: PgRow) -> Result<Record> {
        let collection: String = row.try_get("collection")?;
        Ok(Record {
            collection: collection.parse()?,
            id: row.try_get("id")?,
            process_id: row.try_get("process_id")?,
            stored_at: row.try_get("stored_at")?,
            payload: row.try_get("payload")?,
        })
    }

    async fn insert_row(
        conn: &mut sqlx::PgConnection,
        record: &Record,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO records (collection, id, process_id, stored_at, payload)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.collection.as_str())
        .bind(&record.id)
        .bind(&record.process_id)
        .bind(record.stored_at)
        .bind(&record.payload)
        .execute(conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("records_pkey")
            {
                return StoreError::DuplicateRecord {
                    collection: record.collection,
                    id: record.id.clone(),
                };
            }
            StoreError::Database(e)
        })?;
        Ok(())
    }

    async fn apply(tx: &mut sqlx::Transaction<'_, Postgres>, op: &WriteOp) -> Result<()> {
        match op {
            WriteOp::Insert(record) => Self::insert_row(&mut **tx, record).await?,
            WriteOp::Put(record) => {
                // Conflicting rows keep their seq, so a replaced record keeps its position.
                sqlx::query(
                    r#"
                    INSERT INTO records (collection, id, process_id, stored_at, payload)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (collection, id) DO UPDATE
                    SET process_id = EXCLUDED.process_id,
                        stored_at = EXCLUDED.stored_at,
                        payload = EXCLUDED.payload
                    "#,
                )
                .bind(record.collection.as_str())
                .bind(&record.id)
                .bind(&record.process_id)
                .bind(record.stored_at)
                .bind(&record.payload)
                .execute(&mut **tx)
                .await?;
            }
            WriteOp::Delete { collection, id } => {
                let result = sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
                    .bind(collection.as_str())
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(StoreError::RecordNotFound {
                        collection: *collection,
                        id: id.clone(),
                    });
                }
            }
            WriteOp::ReplaceAll {
                collection,
                records,
            } => {
                sqlx::query("DELETE FROM records WHERE collection = $1")
                    .bind(collection.as_str())
                    .execute(&mut **tx)
                    .await?;
                for record in records {
                    Self::insert_row(&mut **tx, record).await?;
                }
            }
        }
        Ok(())
    }

    async fn commit_inner(&self, tx: &Transaction) -> Result<()> {
        let mut db_tx = self.pool.begin().await?;
        for op in tx.ops() {
            Self::apply(&mut db_tx, op).await?;
        }
        db_tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn commit(&self, tx: Transaction) -> Result<()> {
        validate_transaction(&tx)?;

        // Dropping an uncommitted sqlx transaction rolls it back.
        match self.commit_inner(&tx).await {
            Ok(()) => {
                metrics::counter!("store_commits_total", "backend" => "postgres").increment(1);
                tracing::debug!(writes = tx.len(), "Committed transaction");
                Ok(())
            }
            Err(e) => {
                metrics::counter!("store_commit_failures_total", "backend" => "postgres")
                    .increment(1);
                tracing::warn!(error = %e, "Commit rolled back");
                Err(e)
            }
        }
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let row = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE collection = $1 AND id = $2"
        ))
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn get_all(&self, collection: Collection) -> Result<Vec<Record>> {
        self.query(RecordQuery::new(collection)).await
    }

    async fn query(&self, query: RecordQuery) -> Result<Vec<Record>> {
        let mut sql = format!("{SELECT_COLUMNS} WHERE collection = $1");
        let mut param_count = 1;

        if query.process_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND process_id = ${param_count}"));
        }
        sql.push_str(" ORDER BY seq ASC");
        if query.limit.is_some() {
            param_count += 1;
            sql.push_str(&format!(" LIMIT ${param_count}"));
        }
        if query.offset.is_some() {
            param_count += 1;
            sql.push_str(&format!(" OFFSET ${param_count}"));
        }

        let mut q = sqlx::query(&sql).bind(query.collection.as_str());
        if let Some(ref pid) = query.process_id {
            q = q.bind(pid);
        }
        if let Some(limit) = query.limit {
            q = q.bind(limit as i64);
        }
        if let Some(offset) = query.offset {
            q = q.bind(offset as i64);
        }

        q.fetch(&self.pool)
            .map_err(StoreError::from)
            .and_then(|row| async move { Self::row_to_record(row) })
            .try_collect()
            .await
    }
}
