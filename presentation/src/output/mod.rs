//! Output formatting for dispatch results

pub mod console;
