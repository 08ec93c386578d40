//! Object-file loading and memory dumping for the LC4 simulator.
//!
//! This crate hosts the simulator's external collaborators: the binary
//! object-file parser that populates a [`lc4_core::MachineState`] memory
//! image before execution starts, the dump writer the driver uses to
//! report loaded memory, and the `lc4-trace` CLI binary itself.

// `tempfile` is a dev-dependency used by the integration tests in `tests/`;
// silence `unused_crate_dependencies` for the lib test target.
#[cfg(test)]
use tempfile as _;

/// Memory-image dump serialization.
pub mod dump;
/// Binary object-file parsing.
pub mod object;

pub use dump::write_memory_dump;
pub use object::{
    load_object, load_object_file, LoadError, CODE_BLOCK, DATA_BLOCK, FILE_NAME_RECORD,
    LINE_NUMBER_RECORD, SYMBOL_RECORD,
};
