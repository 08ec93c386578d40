//! Instruction execution pipeline for the LC4 ISA.
//!
//! One step = pre-dispatch halt checks, fetch, decode, one handler, one
//! trace record. Handlers validate before they mutate, so a faulting step
//! leaves registers, memory, and `PC` untouched.

#![allow(
    clippy::pedantic,
    clippy::nursery,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]

mod flags;

pub use flags::{update_condition_codes, ConditionCode};

use crate::decoder::{
    ArithmeticOp, CompareOp, Decoded, Decoder, Instruction, JumpTarget, LogicalOp, ShiftOp,
};
use crate::memory::access::validate_data_access;
use crate::memory::map::{pc_halt_reason, PRIVILEGE_REGION_BIT, TRAP_VECTOR_BASE};
use crate::memory::HaltReason;
use crate::state::GeneralRegister;
use crate::trace::{CycleSignals, TraceRecord, TraceSink};
use crate::{FaultCode, MachineState, RunOutcome, StepOutcome};

/// Executes exactly one instruction.
///
/// The pre-dispatch halt windows are checked before fetch; a hit ends the
/// run with no trace record and no state change. Otherwise the word at `PC`
/// is fetched, decoded, and dispatched to its family handler, which updates
/// registers/memory/flags, advances or redirects `PC`, and reports the
/// cycle's control signals for the trace record.
pub fn step(machine: &mut MachineState) -> StepOutcome {
    let pc = machine.arch.pc();
    if let Some(reason) = pc_halt_reason(pc) {
        return StepOutcome::Halted(reason);
    }

    let word = machine.read_word(pc);
    let instruction = match Decoder::decode(word) {
        Decoded::Instruction(instruction) => instruction,
        Decoded::UnknownOpcode(op) => return StepOutcome::Halted(HaltReason::UnknownOpcode(op)),
        Decoded::Fault(code) => return StepOutcome::Fault(code),
    };

    match execute_instruction(&instruction, machine) {
        Ok(signals) => StepOutcome::Executed(TraceRecord {
            pc,
            instruction: word,
            signals,
        }),
        Err(code) => StepOutcome::Fault(code),
    }
}

/// Drives [`step`] until the machine halts or faults, feeding every trace
/// record to `sink` in execution order.
pub fn run_to_halt(machine: &mut MachineState, sink: &mut dyn TraceSink) -> RunOutcome {
    let mut steps = 0u32;
    loop {
        let outcome = step(machine);
        match outcome {
            StepOutcome::Executed(record) => {
                sink.record(&record);
                steps += 1;
            }
            StepOutcome::Halted(_) | StepOutcome::Fault(_) => {
                return RunOutcome {
                    steps,
                    final_step: outcome,
                }
            }
        }
    }
}

fn execute_instruction(
    instruction: &Instruction,
    machine: &mut MachineState,
) -> Result<CycleSignals, FaultCode> {
    match *instruction {
        Instruction::Branch { mask, offset } => Ok(execute_branch(machine, mask, offset)),
        Instruction::Arithmetic { rd, rs, op } => execute_arithmetic(machine, rd, rs, op),
        Instruction::Compare { rs, op } => Ok(execute_compare(machine, rs, op)),
        Instruction::JumpSubroutine { target } => Ok(execute_jump_subroutine(machine, target)),
        Instruction::Logical { rd, rs, op } => Ok(execute_logical(machine, rd, rs, op)),
        Instruction::Load { rd, rs, offset } => execute_load(machine, rd, rs, offset),
        Instruction::Store { rt, rs, offset } => execute_store(machine, rt, rs, offset),
        Instruction::ReturnFromTrap => Ok(execute_return_from_trap(machine)),
        Instruction::Const { rd, value } => Ok(execute_const(machine, rd, value)),
        Instruction::ShiftMod { rd, rs, op } => execute_shift_mod(machine, rd, rs, op),
        Instruction::Jump { target } => Ok(execute_jump(machine, target)),
        Instruction::Hiconst { rd, value } => Ok(execute_hiconst(machine, rd, value)),
        Instruction::Trap { vector } => Ok(execute_trap(machine, vector)),
    }
}

fn advance_pc(machine: &mut MachineState) {
    let pc = machine.arch.pc();
    machine.arch.set_pc(pc.wrapping_add(1));
}

/// Signals for the common register-write shape: destination index and value
/// on the write port, flag write asserted, no data write.
fn register_write_signals(rd_index: u8, value: u16, code: ConditionCode) -> CycleSignals {
    CycleSignals {
        register_write_enable: true,
        nzp_write_enable: true,
        rd_index,
        register_input: value,
        nzp_value: code.one_hot(),
        ..CycleSignals::default()
    }
}

const fn jump_target_pc(pc: u16, target: JumpTarget) -> u16 {
    match target {
        // The register form takes the field value itself, never the
        // register contents.
        JumpTarget::Register(reg) => reg.index() as u16,
        // The long form stays in the privilege half the PC is already in.
        JumpTarget::PcRelative(imm) => (pc & PRIVILEGE_REGION_BIT) | ((imm as u16) << 4),
    }
}

fn execute_branch(machine: &mut MachineState, mask: u8, offset: i16) -> CycleSignals {
    let taken = machine.arch.condition_codes() & u16::from(mask) != 0;

    let pc = machine.arch.pc().wrapping_add(1);
    let pc = if taken { pc.wrapping_add(offset as u16) } else { pc };
    machine.arch.set_pc(pc);

    CycleSignals::default()
}

fn execute_arithmetic(
    machine: &mut MachineState,
    rd: GeneralRegister,
    rs: GeneralRegister,
    op: ArithmeticOp,
) -> Result<CycleSignals, FaultCode> {
    let lhs = machine.arch.gpr(rs) as i16;
    let result = match op {
        ArithmeticOp::Add(rt) => lhs.wrapping_add(machine.arch.gpr(rt) as i16),
        ArithmeticOp::Multiply(rt) => lhs.wrapping_mul(machine.arch.gpr(rt) as i16),
        ArithmeticOp::Subtract(rt) => lhs.wrapping_sub(machine.arch.gpr(rt) as i16),
        ArithmeticOp::Divide(rt) => {
            let divisor = machine.arch.gpr(rt);
            if divisor == 0 {
                return Err(FaultCode::DivideByZero);
            }
            lhs.wrapping_div(divisor as i16)
        }
        ArithmeticOp::AddImmediate(imm) => lhs.wrapping_add(imm),
    };

    machine.arch.set_gpr(rd, result as u16);
    let code = update_condition_codes(&mut machine.arch, result);
    advance_pc(machine);

    Ok(register_write_signals(rd.index() as u8, result as u16, code))
}

fn execute_compare(machine: &mut MachineState, rs: GeneralRegister, op: CompareOp) -> CycleSignals {
    let lhs = machine.arch.gpr(rs);
    let result = match op {
        CompareOp::Register(rt) => (lhs as i16).wrapping_sub(machine.arch.gpr(rt) as i16),
        CompareOp::RegisterUnsigned(rt) => lhs.wrapping_sub(machine.arch.gpr(rt)) as i16,
        CompareOp::Immediate(imm) => (lhs as i16).wrapping_sub(imm),
        CompareOp::ImmediateUnsigned(imm) => lhs.wrapping_sub(imm) as i16,
    };

    let code = update_condition_codes(&mut machine.arch, result);
    advance_pc(machine);

    CycleSignals {
        nzp_write_enable: true,
        nzp_value: code.one_hot(),
        rs_index: rs.index() as u8,
        ..CycleSignals::default()
    }
}

fn execute_logical(
    machine: &mut MachineState,
    rd: GeneralRegister,
    rs: GeneralRegister,
    op: LogicalOp,
) -> CycleSignals {
    let lhs = machine.arch.gpr(rs);
    let (result, rt_index) = match op {
        LogicalOp::And(rt) => (lhs & machine.arch.gpr(rt), rt.index() as u8),
        LogicalOp::Not => (!lhs, 0),
        LogicalOp::Or(rt) => (lhs | machine.arch.gpr(rt), rt.index() as u8),
        LogicalOp::Xor(rt) => (lhs ^ machine.arch.gpr(rt), rt.index() as u8),
        LogicalOp::AndImmediate(imm) => (lhs & imm as u16, 0),
    };

    machine.arch.set_gpr(rd, result);
    let code = update_condition_codes(&mut machine.arch, result as i16);
    advance_pc(machine);

    let mut signals = register_write_signals(rd.index() as u8, result, code);
    signals.rs_index = rs.index() as u8;
    signals.rt_index = rt_index;
    signals
}

fn execute_load(
    machine: &mut MachineState,
    rd: GeneralRegister,
    rs: GeneralRegister,
    offset: i16,
) -> Result<CycleSignals, FaultCode> {
    let addr = machine.arch.gpr(rs).wrapping_add(offset as u16);
    validate_data_access(addr, machine.arch.privileged())?;
    if rs == rd {
        return Err(FaultCode::AliasedOperands);
    }

    let value = machine.read_word(addr);
    machine.arch.set_gpr(rd, value);
    let code = update_condition_codes(&mut machine.arch, value as i16);
    advance_pc(machine);

    let mut signals = register_write_signals(rd.index() as u8, value, code);
    signals.rs_index = rs.index() as u8;
    Ok(signals)
}

fn execute_store(
    machine: &mut MachineState,
    rt: GeneralRegister,
    rs: GeneralRegister,
    offset: i16,
) -> Result<CycleSignals, FaultCode> {
    let addr = machine.arch.gpr(rs).wrapping_add(offset as u16);
    validate_data_access(addr, machine.arch.privileged())?;
    if rs == rt {
        return Err(FaultCode::AliasedOperands);
    }

    let value = machine.arch.gpr(rt);
    machine.write_word(addr, value);
    advance_pc(machine);

    Ok(CycleSignals {
        data_write_enable: true,
        rs_index: rs.index() as u8,
        rt_index: rt.index() as u8,
        data_address: addr,
        data_value: value,
        ..CycleSignals::default()
    })
}

fn execute_return_from_trap(machine: &mut MachineState) -> CycleSignals {
    // All write enables stay clear; the supervisor bit is left as-is.
    let return_pc = machine.arch.gpr(GeneralRegister::RETURN_ADDRESS);
    machine.arch.set_pc(return_pc);

    CycleSignals::default()
}

fn execute_const(machine: &mut MachineState, rd: GeneralRegister, value: i16) -> CycleSignals {
    machine.arch.set_gpr(rd, value as u16);
    let code = update_condition_codes(&mut machine.arch, value);
    advance_pc(machine);

    register_write_signals(rd.index() as u8, value as u16, code)
}

fn execute_shift_mod(
    machine: &mut MachineState,
    rd: GeneralRegister,
    rs: GeneralRegister,
    op: ShiftOp,
) -> Result<CycleSignals, FaultCode> {
    let lhs = machine.arch.gpr(rs);
    let result = match op {
        ShiftOp::LeftLogical(amount) => lhs << amount,
        // SRA drives the same left-shift path as SLL in the modeled
        // datapath.
        ShiftOp::RightArithmetic(amount) => lhs << amount,
        ShiftOp::RightLogical(amount) => lhs >> amount,
        ShiftOp::Modulo(rt) => {
            let divisor = machine.arch.gpr(rt);
            if divisor == 0 {
                return Err(FaultCode::DivideByZero);
            }
            lhs % divisor
        }
    };

    machine.arch.set_gpr(rd, result);
    let code = update_condition_codes(&mut machine.arch, result as i16);
    advance_pc(machine);

    // This family drives index 0 on the destination select even though a
    // register is written.
    Ok(register_write_signals(0, result, code))
}

fn execute_jump(machine: &mut MachineState, target: JumpTarget) -> CycleSignals {
    let pc = machine.arch.pc();
    machine.arch.set_pc(jump_target_pc(pc, target));

    CycleSignals::default()
}

fn execute_jump_subroutine(machine: &mut MachineState, target: JumpTarget) -> CycleSignals {
    let pc = machine.arch.pc();
    let return_address = pc.wrapping_add(1);

    machine
        .arch
        .set_gpr(GeneralRegister::RETURN_ADDRESS, return_address);
    let code = update_condition_codes(&mut machine.arch, return_address as i16);
    machine.arch.set_pc(jump_target_pc(pc, target));

    register_write_signals(
        GeneralRegister::RETURN_ADDRESS.index() as u8,
        return_address,
        code,
    )
}

fn execute_hiconst(machine: &mut MachineState, rd: GeneralRegister, value: u8) -> CycleSignals {
    let merged = (machine.arch.gpr(rd) & 0x00FF) | (u16::from(value) << 8);

    machine.arch.set_gpr(rd, merged);
    let code = update_condition_codes(&mut machine.arch, merged as i16);
    advance_pc(machine);

    register_write_signals(rd.index() as u8, merged, code)
}

fn execute_trap(machine: &mut MachineState, vector: u8) -> CycleSignals {
    let return_address = machine.arch.pc().wrapping_add(1);

    machine
        .arch
        .set_gpr(GeneralRegister::RETURN_ADDRESS, return_address);
    let code = update_condition_codes(&mut machine.arch, return_address as i16);
    machine.arch.enter_supervisor_mode();
    machine.arch.set_pc(TRAP_VECTOR_BASE | u16::from(vector));

    register_write_signals(
        GeneralRegister::RETURN_ADDRESS.index() as u8,
        return_address,
        code,
    )
}
