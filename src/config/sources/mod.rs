//! Config sources, one module per location.

pub mod environment;
pub mod global_file;
pub mod working_file;
