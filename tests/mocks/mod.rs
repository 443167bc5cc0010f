//! Mock implementations for testing

// Each test file compiles this module separately and uses a different subset.
#![allow(dead_code)]

pub mod betting_api;

pub use betting_api::{MockBettingApi, MockFaults};
