mod types;

pub use types::{FlatRecord, ServiceCounts};
