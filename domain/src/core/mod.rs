//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated, non-blank user query
//! - [`request::RequestId`]: fencing token for one dispatch
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod query;
pub mod request;
pub mod string;
