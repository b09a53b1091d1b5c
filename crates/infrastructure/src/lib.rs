//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_admin_api_client;
mod in_memory_query_cache;

pub use http_admin_api_client::{HttpAdminApiClient, TENANT_HEADER};
pub use in_memory_query_cache::InMemoryQueryCache;
