//! Adapters - concrete gateway implementations

pub mod http;
pub mod memory;

pub use http::HttpSyncGateway;
pub use memory::MemorySyncGateway;
