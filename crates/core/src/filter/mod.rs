mod matching;
mod sql;
mod types;

pub use matching::{filter_records, matches};
pub use sql::{build_predicate, SqlParam, SqlPredicate};
pub use types::FilterCriteria;
