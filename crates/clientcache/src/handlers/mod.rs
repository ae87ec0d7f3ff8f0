pub mod cache;
pub mod error;
pub mod health;
pub mod hierarchy;
pub mod records;
pub mod response;

pub use error::{ApiJson, AppError, RequestError};
pub use response::ApiResponse;
