//! Application-level configuration.
//!
//! - [`DispatchConfig`] controls which dispatch stages run

pub mod dispatch_config;

pub use dispatch_config::DispatchConfig;
