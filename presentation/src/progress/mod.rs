//! Progress reporting for dispatches

pub mod reporter;
