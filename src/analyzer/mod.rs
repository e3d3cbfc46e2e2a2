//! Analyzer module - lint engine and rules

pub mod engine;
pub mod rules;

pub use engine::Linter;
