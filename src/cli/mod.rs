//! Command Line Interface (CLI) layer for CROPPAD.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that loads an image (or generates a
//! synthetic one), applies a single transform to it and to its label, and
//! writes the results as JSON array files.
//!
//! If you are embedding CROPPAD into another application, use the library
//! transforms directly instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
