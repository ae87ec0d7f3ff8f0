mod builder;
mod types;

pub use builder::build_hierarchy;
pub use types::{ClientNode, CustomerNode, HierarchyOutcome, NodeLevel, ParentNode, SkippedGroup};
