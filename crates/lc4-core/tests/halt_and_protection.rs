//! Termination windows, memory protection, and branch-predicate
//! properties over the full 16-bit domains.

#![allow(clippy::pedantic, clippy::nursery, clippy::cast_possible_truncation)]

use lc4_core::{
    pc_halt_reason, step, validate_data_access, FaultCode, GeneralRegister, HaltReason,
    MachineState, StepOutcome, RESET_VECTOR,
};
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

#[test]
fn pre_dispatch_halts_do_not_touch_the_machine() {
    for pc in [0x80FFu16, 0xA001, 0xFFFE, 0x2001, 0x7FFE] {
        let mut machine = MachineState::new();
        machine.arch.set_pc(pc);
        machine.write_word(pc, 0x9205); // would execute if fetched

        let outcome = step(&mut machine);

        assert!(matches!(outcome, StepOutcome::Halted(_)), "pc {pc:#06X}");
        assert_eq!(machine.arch.pc(), pc);
        assert_eq!(machine.arch.gpr(GeneralRegister::R1), 0);
    }
}

#[test]
fn protection_violations_fault_before_the_access() {
    // STR R5, R1, #0 at a rejected address: memory stays untouched.
    let mut machine = MachineState::new();
    machine.arch.set_gpr(GeneralRegister::R1, 0x1000);
    machine.arch.set_gpr(GeneralRegister::R5, 0xBEEF);
    machine.write_word(RESET_VECTOR, 0x7A40);

    let outcome = step(&mut machine);

    assert_eq!(outcome, StepOutcome::Fault(FaultCode::IllegalMemoryAccess));
    assert_eq!(machine.read_word(0x1000), 0);
    assert_eq!(machine.arch.pc(), RESET_VECTOR);
}

#[test]
fn user_mode_cannot_reach_the_system_data_window() {
    let mut machine = MachineState::new();
    machine.arch.set_psr(0); // user mode
    machine.arch.set_gpr(GeneralRegister::R1, 0xA001);
    machine.write_word(RESET_VECTOR, 0x6441); // LDR R2, R1, #1

    // The fetch address itself is legal; only the data access faults.
    let outcome = step(&mut machine);
    assert_eq!(outcome, StepOutcome::Fault(FaultCode::IllegalMemoryAccess));
}

#[test]
fn supervisor_mode_reaches_the_system_data_window() {
    let mut machine = MachineState::new();
    machine.arch.set_gpr(GeneralRegister::R1, 0xA001);
    machine.write_word(0xA002, 0x1234);
    machine.write_word(RESET_VECTOR, 0x6441); // LDR R2, R1, #1

    let outcome = step(&mut machine);

    assert!(matches!(outcome, StepOutcome::Executed(_)));
    assert_eq!(machine.arch.gpr(GeneralRegister::R2), 0x1234);
}

proptest! {
    #[test]
    fn halt_windows_match_their_definition(pc in any::<u16>()) {
        let expected = if pc == 0x80FF {
            Some(HaltReason::HaltAddress)
        } else if pc > 0xA000 && pc < 0xFFFF {
            Some(HaltReason::ReservedWindow)
        } else if pc > 0x2000 && pc < 0x7FFF {
            Some(HaltReason::UnmappedWindow)
        } else {
            None
        };
        prop_assert_eq!(pc_halt_reason(pc), expected);
    }

    #[test]
    fn supervisor_protection_matches_the_window_formula(addr in any::<u16>()) {
        let invalid = addr <= 0x1FFF || (addr > 0x8000 && addr < 0x9FFF);
        prop_assert_eq!(validate_data_access(addr, true).is_err(), invalid);
    }

    #[test]
    fn user_protection_adds_the_system_data_window(addr in any::<u16>()) {
        let invalid = addr <= 0x1FFF
            || (addr > 0x8000 && addr < 0x9FFF)
            || (addr > 0xA000 && addr < 0xFFFF);
        prop_assert_eq!(validate_data_access(addr, false).is_err(), invalid);
    }

    #[test]
    fn branch_taken_iff_mask_intersects_flags(mask in 0u16..8, flag_bit in 0u32..3) {
        let flags = 1u16 << flag_bit;
        let mut machine = MachineState::new();
        machine.arch.set_condition_codes(flags);
        machine.write_word(RESET_VECTOR, (mask << 9) | 0x0002); // BR<mask> #+2

        let outcome = step(&mut machine);
        prop_assert!(matches!(outcome, StepOutcome::Executed(_)));

        let taken = (flags & mask) != 0;
        let expected = if taken { RESET_VECTOR + 3 } else { RESET_VECTOR + 1 };
        prop_assert_eq!(machine.arch.pc(), expected);
        if mask == 0 {
            prop_assert_eq!(machine.arch.pc(), RESET_VECTOR + 1);
        }
        if mask == 7 {
            prop_assert_eq!(machine.arch.pc(), RESET_VECTOR + 3);
        }
    }

    #[test]
    fn random_programs_never_panic_the_step_pipeline(
        words in proptest::collection::vec(any::<u16>(), 16),
        seed_regs in proptest::collection::vec(any::<u16>(), 8),
    ) {
        let mut machine = MachineState::new();
        for (i, word) in words.iter().enumerate() {
            machine.write_word(RESET_VECTOR.wrapping_add(i as u16), *word);
        }
        for (reg, value) in GeneralRegister::ALL.iter().zip(&seed_regs) {
            machine.arch.set_gpr(*reg, *value);
        }

        for _ in 0..64 {
            if !step(&mut machine).should_continue() {
                break;
            }
        }
    }
}
