//! Host-facing machine model and stepping surface.

use crate::memory::{new_address_space, HaltReason};
use crate::state::ArchitecturalState;
use crate::trace::TraceRecord;
use crate::FaultCode;

/// Complete mutable machine snapshot: registers, status, and the flat
/// 64Ki-word memory image shared by code and data.
///
/// Exactly one execution context owns a `MachineState` for the lifetime of
/// a run; each step reads it, applies one instruction, and writes it back.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    /// Architectural register file and status block.
    pub arch: ArchitecturalState,
    /// Flat 64Ki-word memory image.
    pub memory: Box<[u16]>,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            arch: ArchitecturalState::default(),
            memory: new_address_space(),
        }
    }
}

impl MachineState {
    /// Creates a machine in its reset state with zeroed memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores register reset defaults, leaving the memory image intact.
    pub fn reset(&mut self) {
        self.arch = ArchitecturalState::default();
    }

    /// Reads the memory word at `addr`.
    #[must_use]
    pub fn read_word(&self, addr: u16) -> u16 {
        self.memory[usize::from(addr)]
    }

    /// Writes the memory word at `addr`.
    pub fn write_word(&mut self, addr: u16, value: u16) {
        self.memory[usize::from(addr)] = value;
    }
}

/// Output status from one execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Instruction executed; carries the cycle's trace record.
    Executed(TraceRecord),
    /// The run ended without executing an instruction.
    Halted(HaltReason),
    /// A fatal fault was raised; the driver must stop stepping.
    Fault(FaultCode),
}

impl StepOutcome {
    /// Returns `true` when the driver may call `step` again.
    #[must_use]
    pub const fn should_continue(&self) -> bool {
        matches!(self, Self::Executed(_))
    }
}

/// Aggregated outcome from running steps until the machine stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of instructions executed during this run call.
    pub steps: u32,
    /// The terminal step status (`Halted` or `Fault`).
    pub final_step: StepOutcome,
}

#[cfg(test)]
mod tests {
    use super::{MachineState, StepOutcome};
    use crate::memory::{HaltReason, ADDRESS_SPACE_WORDS, RESET_VECTOR};
    use crate::state::GeneralRegister;

    #[test]
    fn new_machine_allocates_the_full_address_space() {
        let machine = MachineState::new();
        assert_eq!(machine.memory.len(), ADDRESS_SPACE_WORDS);
        assert_eq!(machine.arch.pc(), RESET_VECTOR);
        assert!(machine.arch.privileged());
    }

    #[test]
    fn reset_preserves_the_memory_image() {
        let mut machine = MachineState::new();
        machine.write_word(0x4000, 0xBEEF);
        machine.arch.set_pc(0x1234);
        machine.arch.set_gpr(GeneralRegister::R3, 77);

        machine.reset();

        assert_eq!(machine.arch.pc(), RESET_VECTOR);
        assert_eq!(machine.arch.gpr(GeneralRegister::R3), 0);
        assert_eq!(machine.read_word(0x4000), 0xBEEF);
    }

    #[test]
    fn only_executed_steps_continue_the_run() {
        assert!(!StepOutcome::Halted(HaltReason::HaltAddress).should_continue());
        assert!(!StepOutcome::Fault(crate::FaultCode::DivideByZero).should_continue());
    }
}
