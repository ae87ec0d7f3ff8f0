use serde::{Deserialize, Serialize};

use crate::record::ServiceCounts;

/// Depth of a hierarchy node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeLevel {
    Parent,
    Client,
    Customer,
}

/// Top-level node: one per distinct parent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentNode {
    pub id: i64,
    pub name: String,
    pub level: NodeLevel,
    pub segment: Option<String>,
    pub region: Option<String>,
    #[serde(flatten)]
    pub counts: ServiceCounts,
    pub sub_rows: Vec<ClientNode>,
}

/// Second-level node: one per distinct client id within a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientNode {
    pub id: String,
    pub parent_id: i64,
    pub name: String,
    pub level: NodeLevel,
    /// Inherited from the parent group.
    pub segment: Option<String>,
    /// Inherited from the parent group.
    pub region: Option<String>,
    #[serde(flatten)]
    pub counts: ServiceCounts,
    pub sub_rows: Vec<CustomerNode>,
}

/// Leaf node: one per distinct customer id within a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerNode {
    pub id: String,
    /// The owning client id.
    pub parent_id: String,
    pub name: String,
    pub level: NodeLevel,
    pub segment: Option<String>,
    pub region: Option<String>,
    #[serde(flatten)]
    pub counts: ServiceCounts,
    /// Always empty; kept so table consumers can expand leaves uniformly.
    pub detail_data: Vec<serde_json::Value>,
}

/// A parent group left out of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGroup {
    pub parent_id: String,
    pub reason: String,
    /// Number of records in the skipped group.
    pub records: usize,
}

/// Result of grouping flat records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyOutcome {
    pub parents: Vec<ParentNode>,
    pub skipped: Vec<SkippedGroup>,
}

impl HierarchyOutcome {
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}
