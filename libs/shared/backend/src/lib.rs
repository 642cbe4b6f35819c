pub mod client;
pub mod error;

pub use client::{cookie_pairs, query_string, BackendClient};
pub use error::{extract_error_message, to_app_error, ApiError};
