//! Search backend adapters
//!
//! - [`HttpSearchBackend`] posts to the remote search service
//! - [`MockSearchBackend`] matches against a local JSON dataset

mod http;
mod mock;

pub use http::HttpSearchBackend;
pub use mock::{DATASET_BUCKETS, MockSearchBackend};
