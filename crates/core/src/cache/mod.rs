mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{complete_dataset_key, raw_key, records_key, KEY_SENTINEL, RECORDS_NAMESPACE};
pub use serialization::{
    deserialize_json, deserialize_records, serialize_json, serialize_records, SerializationError,
};
pub use traits::Cache;
