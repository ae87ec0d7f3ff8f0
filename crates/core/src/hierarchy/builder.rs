use std::collections::HashMap;
use std::hash::Hash;

use crate::record::FlatRecord;

use super::types::{
    ClientNode, CustomerNode, HierarchyOutcome, NodeLevel, ParentNode, SkippedGroup,
};

/// Groups flat records into a parent -> client -> customer tree.
///
/// Records are partitioned by parent id, then client id, then customer id.
/// Groups keep first-appearance order and the first record of each group
/// supplies the group's name and counts. Client and customer nodes inherit
/// segment and region from the parent group's representative, not from their
/// own rows.
///
/// Parent ids are grouped by their parsed value, so `"1"` and `" 1"` land in
/// the same parent. A parent id that is not a valid integer drops the whole
/// parent group; it is reported in [`HierarchyOutcome::skipped`] and the rest
/// of the tree is still built.
pub fn build_hierarchy(records: &[FlatRecord]) -> HierarchyOutcome {
    let mut outcome = HierarchyOutcome::default();

    for (key, parent_records) in group_by(records.iter(), |r| ParentKey::of(&r.parent_id)) {
        match key {
            ParentKey::Id(parent_id) => outcome
                .parents
                .push(build_parent(parent_id, &parent_records)),
            ParentKey::Invalid(raw) => outcome.skipped.push(SkippedGroup {
                parent_id: raw.to_string(),
                reason: raw
                    .parse::<i64>()
                    .err()
                    .map(|e| e.to_string())
                    .unwrap_or_default(),
                records: parent_records.len(),
            }),
        }
    }

    outcome
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ParentKey<'a> {
    Id(i64),
    Invalid(&'a str),
}

impl<'a> ParentKey<'a> {
    fn of(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse()
            .map_or(ParentKey::Invalid(trimmed), ParentKey::Id)
    }
}

fn build_parent(id: i64, records: &[&FlatRecord]) -> ParentNode {
    let representative = records[0];
    let segment = representative.segment.clone();
    let region = representative.region.clone();

    let sub_rows = group_by(records.iter().copied(), |r| r.client_id.as_str())
        .into_iter()
        .map(|(client_id, client_records)| {
            let client = client_records[0];
            let customers = group_by(client_records.iter().copied(), |r| r.customer_id.as_str())
                .into_iter()
                .map(|(customer_id, customer_records)| {
                    let customer = customer_records[0];
                    CustomerNode {
                        id: customer_id.to_string(),
                        parent_id: client_id.to_string(),
                        name: customer.customer_name.clone(),
                        level: NodeLevel::Customer,
                        segment: segment.clone(),
                        region: region.clone(),
                        counts: customer.customer_counts,
                        detail_data: Vec::new(),
                    }
                })
                .collect();

            ClientNode {
                id: client_id.to_string(),
                parent_id: id,
                name: client.client_name.clone(),
                level: NodeLevel::Client,
                segment: segment.clone(),
                region: region.clone(),
                counts: client.client_counts,
                sub_rows: customers,
            }
        })
        .collect();

    ParentNode {
        id,
        name: representative.parent_name.clone(),
        level: NodeLevel::Parent,
        segment,
        region,
        counts: representative.parent_counts,
        sub_rows,
    }
}

/// Partitions records by key, keeping first-appearance order of keys and
/// input order within each group. Groups are never empty.
fn group_by<'a, K, I, F>(records: I, key: F) -> Vec<(K, Vec<&'a FlatRecord>)>
where
    K: Copy + Eq + Hash,
    I: Iterator<Item = &'a FlatRecord>,
    F: Fn(&'a FlatRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a FlatRecord>)> = Vec::new();

    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(k, groups.len());
                groups.push((k, vec![record]));
            }
        }
    }

    groups
}
