//! Helpers shared by the integration tests of several crates.

pub mod deployment;
pub mod fakes;
pub mod requests;
