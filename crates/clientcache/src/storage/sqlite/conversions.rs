//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! Service counts are stored as JSON objects, one column per level.

use clientcache_core::filter::SqlParam;
use clientcache_core::record::{FlatRecord, ServiceCounts};
use clientcache_core::storage::RepositoryError;
use rusqlite::types::Value;
use rusqlite::Row;

/// Convert a SQLite row to a FlatRecord.
///
/// Expected columns: parent id, parent name, client id, client name,
/// customer id, customer name, segment, region, country, parent counts,
/// client counts, customer counts.
pub fn row_to_record(row: &Row) -> rusqlite::Result<FlatRecord> {
    let parent_counts: String = row.get(9)?;
    let client_counts: String = row.get(10)?;
    let customer_counts: String = row.get(11)?;

    Ok(FlatRecord {
        parent_id: row.get(0)?,
        parent_name: row.get(1)?,
        client_id: row.get(2)?,
        client_name: row.get(3)?,
        customer_id: row.get(4)?,
        customer_name: row.get(5)?,
        segment: row.get(6)?,
        region: row.get(7)?,
        country: row.get(8)?,
        parent_counts: parse_counts(&parent_counts, 9)?,
        client_counts: parse_counts(&client_counts, 10)?,
        customer_counts: parse_counts(&customer_counts, 11)?,
    })
}

/// Convert ServiceCounts to the JSON stored in a counts column.
pub fn counts_to_json(counts: &ServiceCounts) -> Result<String, RepositoryError> {
    serde_json::to_string(counts).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Convert a core bind parameter to a rusqlite value.
pub fn param_to_value(param: &SqlParam) -> Value {
    match param {
        SqlParam::Integer(v) => Value::Integer(*v),
        SqlParam::Text(v) => Value::Text(v.clone()),
    }
}

fn parse_counts(json: &str, column: usize) -> rusqlite::Result<ServiceCounts> {
    serde_json::from_str(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}
