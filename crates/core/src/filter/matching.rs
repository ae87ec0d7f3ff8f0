//! In-process filter matching for the full-dataset cache strategy.
//!
//! Name-like fields match by case-insensitive substring. Coded fields (ids,
//! segment, region, country) match by case-insensitive equality or set
//! membership. Empty criteria short-circuit to a match.

use crate::record::FlatRecord;

use super::types::{present, present_items};
use super::FilterCriteria;

/// Returns the records that satisfy every populated criterion.
///
/// Input order is preserved. Empty criteria return the input unchanged.
pub fn filter_records(records: &[FlatRecord], criteria: &FilterCriteria) -> Vec<FlatRecord> {
    if criteria.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect()
}

/// Returns true when the record satisfies every populated criterion.
pub fn matches(record: &FlatRecord, criteria: &FilterCriteria) -> bool {
    if criteria.is_empty() {
        return true;
    }

    matches_parent_ids(&criteria.client, &record.parent_id)
        && matches_codes(&criteria.segment, record.segment.as_deref())
        && matches_codes(&criteria.region, record.region.as_deref())
        && matches_codes(&criteria.country, record.country.as_deref())
        && matches_exact(present(&criteria.parent_id), &record.parent_id)
        && matches_substring(present(&criteria.parent_name), &record.parent_name)
        && matches_exact(present(&criteria.client_id), &record.client_id)
        && matches_substring(present(&criteria.client_name), &record.client_name)
        && matches_exact(present(&criteria.customer_id), &record.customer_id)
        && matches_substring(present(&criteria.customer_name), &record.customer_name)
}

fn matches_parent_ids(ids: &[i64], parent_id: &str) -> bool {
    if ids.is_empty() {
        return true;
    }
    numeric_id(parent_id).is_some_and(|id| ids.contains(&id))
}

/// Parses an id made only of ASCII digits, ignoring surrounding whitespace.
/// Leading zeros are allowed; signs and other characters are not.
fn numeric_id(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn matches_codes(codes: &[String], value: Option<&str>) -> bool {
    let mut wanted = present_items(codes).peekable();
    if wanted.peek().is_none() {
        return true;
    }
    let Some(value) = value.map(fold) else {
        return false;
    };
    wanted.any(|code| fold(code) == value)
}

fn matches_exact(wanted: Option<&str>, value: &str) -> bool {
    match wanted {
        None => true,
        Some(wanted) => fold(wanted) == fold(value),
    }
}

fn matches_substring(wanted: Option<&str>, value: &str) -> bool {
    match wanted {
        None => true,
        Some(wanted) => fold(value).contains(&fold(wanted)),
    }
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<FlatRecord> {
        vec![
            FlatRecord::new("100", "C-1", "K-1")
                .with_names("Northwind Holdings", "Northwind Asset Mgmt", "Northwind Fund I")
                .with_segment("Asset Manager")
                .with_region("AMRS")
                .with_country("US"),
            FlatRecord::new("100", "C-1", "K-2")
                .with_names("Northwind Holdings", "Northwind Asset Mgmt", "Northwind Fund II")
                .with_segment("Asset Manager")
                .with_region("AMRS")
                .with_country("CA"),
            FlatRecord::new("200", "C-2", "K-3")
                .with_names("Contoso Group", "Contoso Pensions", "Contoso DB Plan")
                .with_segment("Asset Owner")
                .with_region("EMEA")
                .with_country("GB"),
            FlatRecord::new("not-a-number", "C-3", "K-4")
                .with_names("Orphan Parent", "Orphan Client", "Orphan Customer")
                .with_region("APAC"),
        ]
    }

    #[test]
    fn test_empty_criteria_returns_input_unchanged() {
        let records = sample_records();
        assert_eq!(filter_records(&records, &FilterCriteria::new()), records);
    }

    #[test]
    fn test_impossible_value_returns_empty() {
        let records = sample_records();
        let criteria = FilterCriteria::new().with_country(["ZZ"]);
        assert!(filter_records(&records, &criteria).is_empty());
    }

    #[test]
    fn test_names_match_case_insensitive_substring() {
        let records = sample_records();
        let criteria = FilterCriteria::new().with_client_name("  ASSET mgmt ");
        let result = filter_records(&records, &criteria);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.client_id == "C-1"));
    }

    #[test]
    fn test_codes_match_exact_not_substring() {
        let records = sample_records();

        let exact = FilterCriteria::new().with_segment(["asset manager"]);
        assert_eq!(filter_records(&records, &exact).len(), 2);

        let partial = FilterCriteria::new().with_segment(["Asset"]);
        assert!(filter_records(&records, &partial).is_empty());
    }

    #[test]
    fn test_ids_match_case_insensitive_exact() {
        let records = sample_records();
        let criteria = FilterCriteria::new().with_customer_id("k-3");
        let result = filter_records(&records, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].customer_id, "K-3");

        let prefix = FilterCriteria::new().with_customer_id("K");
        assert!(filter_records(&records, &prefix).is_empty());
    }

    #[test]
    fn test_list_fields_use_set_membership() {
        let records = sample_records();
        let criteria = FilterCriteria::new().with_country(["GB", "us"]);
        let ids: Vec<_> = filter_records(&records, &criteria)
            .into_iter()
            .map(|r| r.customer_id)
            .collect();
        assert_eq!(ids, vec!["K-1", "K-3"]);
    }

    #[test]
    fn test_client_list_matches_numeric_parent_id() {
        let records = sample_records();
        let criteria = FilterCriteria::new().with_client([200]);
        let result = filter_records(&records, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].parent_id, "200");
    }

    #[test]
    fn test_client_list_ignores_leading_zeros() {
        let record = FlatRecord::new("007", "C-7", "K-7");
        assert!(matches(&record, &FilterCriteria::new().with_client([7])));
        assert!(!matches(&record, &FilterCriteria::new().with_client([70])));
    }

    #[test]
    fn test_signed_parent_id_never_matches_client_list() {
        let record = FlatRecord::new("-7", "C-7", "K-7");
        assert!(!matches(&record, &FilterCriteria::new().with_client([-7])));
    }

    #[test]
    fn test_unparsable_parent_never_matches_client_list() {
        let record = sample_records().pop().unwrap();
        let criteria = FilterCriteria::new().with_client([0]);
        assert!(!matches(&record, &criteria));
    }

    #[test]
    fn test_missing_code_does_not_match_populated_criterion() {
        let record = sample_records().pop().unwrap();
        let criteria = FilterCriteria::new().with_segment(["Asset Owner"]);
        assert!(!matches(&record, &criteria));
    }

    #[test]
    fn test_combined_criteria_equal_intersection() {
        let records = sample_records();
        let by_region = FilterCriteria::new().with_region(["AMRS", "EMEA"]);
        let by_name = FilterCriteria::new().with_customer_name("fund");
        let combined = FilterCriteria {
            customer_name: by_name.customer_name.clone(),
            ..by_region.clone()
        };

        let left = filter_records(&records, &by_region);
        let right = filter_records(&records, &by_name);
        let intersection: Vec<_> = left.into_iter().filter(|r| right.contains(r)).collect();

        assert_eq!(filter_records(&records, &combined), intersection);
        assert_eq!(intersection.len(), 2);
    }

    #[test]
    fn test_filtering_is_commutative() {
        let records = sample_records();
        let by_segment = FilterCriteria::new().with_segment(["Asset Manager"]);
        let by_country = FilterCriteria::new().with_country(["CA"]);

        let a = filter_records(&filter_records(&records, &by_segment), &by_country);
        let b = filter_records(&filter_records(&records, &by_country), &by_segment);
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
    }
}
