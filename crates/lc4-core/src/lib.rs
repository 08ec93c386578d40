//! Core simulator crate for the LC4 teaching processor.
//!
//! The crate models a 16-bit word-addressed machine: a flat 64Ki-word
//! memory image shared by code and data, eight general registers, and a
//! status register holding the supervisor bit and the `N/Z/P` condition
//! codes. [`step`] executes one instruction at a time and reports either a
//! cycle-accurate [`TraceRecord`], a run-ending halt condition, or a fatal
//! [`FaultCode`]; [`run_to_halt`] drives it to completion.

/// Memory model primitives, address-space windows, and protection policy.
pub mod memory;
pub use memory::{
    new_address_space, pc_halt_reason, validate_data_access, HaltReason, ADDRESS_SPACE_WORDS,
    HALT_ADDRESS, RESET_VECTOR, TRAP_VECTOR_BASE,
};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{
    ArchitecturalState, GeneralRegister, GENERAL_REGISTER_COUNT, PSR_CONDITION_MASK, PSR_N, PSR_P,
    PSR_PRIVILEGE, PSR_Z,
};

/// Deterministic primary-opcode classification tables.
pub mod encoding;
pub use encoding::{primary_opcode, sign_extend, Opcode, OPCODE_TABLE};

/// Instruction decode pipeline producing tagged variants.
pub mod decoder;
pub use decoder::{
    ArithmeticOp, CompareOp, Decoded, Decoder, Instruction, JumpTarget, LogicalOp, ShiftOp,
};

/// Fault taxonomy for runtime execution faults.
pub mod fault;
pub use fault::FaultCode;

/// Per-cycle control-signal model and trace serialization.
pub mod trace;
pub use trace::{CycleSignals, NullSink, TraceRecord, TraceSink};

/// Host-facing machine model and stepping surface.
pub mod api;
pub use api::{MachineState, RunOutcome, StepOutcome};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{run_to_halt, step, update_condition_codes, ConditionCode};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
