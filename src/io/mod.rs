//! I/O layer for the CLI: reading and writing arrays as JSON files.
pub mod array_file;
pub use array_file::{ArrayFile, read_array, write_array, write_arrays};
