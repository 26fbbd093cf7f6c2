//! Core building blocks: array processing primitives and synthetic test data.
//! These are consumed by the public `transforms` and by the CLI.
pub mod processing;
pub mod synthetic;
