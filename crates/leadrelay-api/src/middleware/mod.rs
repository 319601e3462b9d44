pub mod client_cache;
pub mod error_details;

pub use client_cache::{client_cache_middleware, ClientCacheConfig};
pub use error_details::{error_details_middleware, ErrorDetailsConfig};
