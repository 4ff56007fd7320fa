//! Random number source adapters

mod http_client;
mod resilient_source;

pub use http_client::HttpRandomNumberClient;
pub use resilient_source::{FallbackRange, ResilientRandomSource};
