//! Config merge: source ordering and deserialization.

pub mod service;
