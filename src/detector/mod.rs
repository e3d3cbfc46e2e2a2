//! Detector module for test and hook registration calls

pub mod test_calls;

pub use test_calls::{TestCallDetector, TestCallKind};
