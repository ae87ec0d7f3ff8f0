//! Cache key derivation.
//!
//! Record keys are built from explicit filter fields only, never from SQL text
//! or whole-object serialization:
//!
//! ```text
//! records:v1:client=101,202:segment=~:region=EMEA:country=~:parentId=~:...
//! ```
//!
//! Every recognized field appears in declaration order. List values are
//! trimmed, sorted and de-duplicated (order and repeats do not change the
//! result set). Absent or empty fields use [`KEY_SENTINEL`]. Reserved
//! characters inside values are percent-escaped so distinct values can never
//! produce the same key.

use crate::filter::FilterCriteria;

/// Namespace prefix for filtered record keys. Bump the version when the
/// cached value shape changes.
pub const RECORDS_NAMESPACE: &str = "records:v1";

/// Token used for absent or empty fields.
pub const KEY_SENTINEL: &str = "~";

/// Returns the cache key for a filtered record set.
///
/// # Examples
///
/// ```
/// use clientcache_core::cache::records_key;
/// use clientcache_core::filter::FilterCriteria;
///
/// let a = FilterCriteria::new().with_client([2, 1]).with_region(["EMEA"]);
/// let b = FilterCriteria::new().with_region(["EMEA"]).with_client([1, 2, 2]);
/// assert_eq!(records_key(&a), records_key(&b));
/// ```
pub fn records_key(criteria: &FilterCriteria) -> String {
    let mut client = criteria.client.clone();
    client.sort_unstable();
    client.dedup();
    let client: Vec<String> = client.iter().map(i64::to_string).collect();

    let segments = [
        ("client", list_value(client)),
        ("segment", list_value(criteria.segment.clone())),
        ("region", list_value(criteria.region.clone())),
        ("country", list_value(criteria.country.clone())),
        ("parentId", scalar_value(&criteria.parent_id)),
        ("parentName", scalar_value(&criteria.parent_name)),
        ("clientId", scalar_value(&criteria.client_id)),
        ("clientName", scalar_value(&criteria.client_name)),
        ("customerId", scalar_value(&criteria.customer_id)),
        ("customerName", scalar_value(&criteria.customer_name)),
    ];

    let mut key = String::from(RECORDS_NAMESPACE);
    for (name, value) in segments {
        key.push(':');
        key.push_str(name);
        key.push('=');
        key.push_str(&value);
    }
    key
}

/// Returns the cache key for the complete, unfiltered dataset.
pub fn complete_dataset_key() -> String {
    "records:complete".to_string()
}

/// Returns the namespaced key for a raw key/value entry.
pub fn raw_key(key: &str) -> String {
    format!("kv:{}", key)
}

fn list_value(values: Vec<String>) -> String {
    let mut values: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        return KEY_SENTINEL.to_string();
    }
    values.sort();
    values.dedup();
    values
        .iter()
        .map(|v| escape(v))
        .collect::<Vec<_>>()
        .join(",")
}

fn scalar_value(value: &Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => escape(v),
        _ => KEY_SENTINEL.to_string(),
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ',' => escaped.push_str("%2C"),
            ':' => escaped.push_str("%3A"),
            '=' => escaped.push_str("%3D"),
            '~' => escaped.push_str("%7E"),
            _ => escaped.push(c),
        }
    }
    escaped
}
