//! Integration tests for upstream hydrofabric extraction

mod end_to_end;
mod subset_consistency;
mod support;
