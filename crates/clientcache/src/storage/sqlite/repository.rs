//! SQLite repository implementation.
//!
//! Implements `RecordRepository` from `clientcache_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::params_from_iter;
use tokio_rusqlite::Connection;

use clientcache_core::filter::{build_predicate, FilterCriteria};
use clientcache_core::record::FlatRecord;
use clientcache_core::storage::{RecordRepository, RepositoryError, Result};

use super::conversions::{counts_to_json, param_to_value, row_to_record};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(map_tokio_rusqlite_error)
    }

    /// Inserts records in a single transaction.
    pub async fn insert_records(&self, records: &[FlatRecord]) -> Result<usize> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push((
                record.clone(),
                counts_to_json(&record.parent_counts)?,
                counts_to_json(&record.client_counts)?,
                counts_to_json(&record.customer_counts)?,
            ));
        }

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                {
                    let mut stmt = tx.prepare(schema::INSERT_RECORD).map_err(wrap_err)?;
                    for (r, parent_counts, client_counts, customer_counts) in &rows {
                        stmt.execute(rusqlite::params![
                            r.parent_id,
                            r.parent_name,
                            r.client_id,
                            r.client_name,
                            r.customer_id,
                            r.customer_name,
                            r.segment,
                            r.region,
                            r.country,
                            parent_counts,
                            client_counts,
                            customer_counts,
                        ])
                        .map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(rows.len())
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    /// Returns the number of stored records.
    pub async fn count_records(&self) -> Result<usize> {
        self.conn
            .call(|conn| {
                let count: i64 = conn
                    .query_row(schema::COUNT_RECORDS, [], |row| row.get(0))
                    .map_err(wrap_err)?;
                Ok(count as usize)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[async_trait]
impl RecordRepository for SqliteRepository {
    async fn fetch_records(&self, criteria: &FilterCriteria) -> Result<Vec<FlatRecord>> {
        let predicate = build_predicate(criteria);
        let sql = format!("{}{}", predicate.apply(schema::SELECT_RECORDS), schema::ORDER_BY_ID);
        let params: Vec<rusqlite::types::Value> =
            predicate.params.iter().map(param_to_value).collect();

        tracing::debug!(sql = %sql, params = params.len(), "Querying records");

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params_from_iter(params), row_to_record)
                    .map_err(wrap_err)?;

                let mut records = Vec::new();
                for row_result in rows {
                    records.push(row_result.map_err(wrap_err)?);
                }
                Ok(records)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}
