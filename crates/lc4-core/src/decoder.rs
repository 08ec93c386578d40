//! Instruction decoder for the LC4 ISA.
//!
//! Decoding turns a raw 16-bit word into a tagged [`Instruction`] variant
//! with every field already extracted and sign-extended, so execution is a
//! single exhaustive match and unhandled encodings cannot slip through.

use crate::encoding::{primary_opcode, sign_extend, Opcode};
use crate::fault::FaultCode;
use crate::state::GeneralRegister;

/// Sub-operations of the arithmetic family (opcode 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// Signed register add.
    Add(GeneralRegister),
    /// Signed register multiply.
    Multiply(GeneralRegister),
    /// Signed register subtract.
    Subtract(GeneralRegister),
    /// Signed register divide, truncating toward zero.
    Divide(GeneralRegister),
    /// Add a sign-extended 5-bit immediate.
    AddImmediate(i16),
}

/// Sub-operations of the comparative family (opcode 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Signed register compare.
    Register(GeneralRegister),
    /// Unsigned register compare.
    RegisterUnsigned(GeneralRegister),
    /// Signed compare against a sign-extended 7-bit immediate.
    Immediate(i16),
    /// Unsigned compare against a zero-extended 7-bit immediate.
    ImmediateUnsigned(u16),
}

/// Sub-operations of the logical family (opcode 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// Bitwise AND of two registers.
    And(GeneralRegister),
    /// Bitwise complement; the second operand field is unused.
    Not,
    /// Bitwise OR of two registers.
    Or(GeneralRegister),
    /// Bitwise XOR of two registers.
    Xor(GeneralRegister),
    /// Bitwise AND with a sign-extended 5-bit immediate.
    AndImmediate(i16),
}

/// Sub-operations of the shift/modulo family (opcode 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    /// Logical left shift by a 4-bit amount.
    LeftLogical(u16),
    /// Nominal arithmetic right shift; drives the same left-shift path as
    /// [`ShiftOp::LeftLogical`] in the modeled datapath.
    RightArithmetic(u16),
    /// Logical right shift by a 4-bit amount.
    RightLogical(u16),
    /// Unsigned remainder of two registers.
    Modulo(GeneralRegister),
}

/// Control-transfer target shared by the jump and jump-to-subroutine
/// families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    /// Register form: the 3-bit register field value itself becomes the new
    /// `PC`; the register contents are never read.
    Register(GeneralRegister),
    /// Long form: an 11-bit immediate, sign-extended, shifted left by 4 and
    /// OR'd with the privilege half of the current `PC`.
    PcRelative(i16),
}

/// One decoded LC4 instruction, one variant per opcode family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Instruction {
    /// Conditional branch on a 3-bit `N/Z/P` mask.
    Branch { mask: u8, offset: i16 },
    /// Add/multiply/subtract/divide or add-immediate into `rd`.
    Arithmetic {
        rd: GeneralRegister,
        rs: GeneralRegister,
        op: ArithmeticOp,
    },
    /// Flag-only comparison of `rs` against a register or immediate.
    Compare { rs: GeneralRegister, op: CompareOp },
    /// Subroutine call: saves `PC + 1` into `R7`, then transfers control.
    JumpSubroutine { target: JumpTarget },
    /// Bitwise operation into `rd`.
    Logical {
        rd: GeneralRegister,
        rs: GeneralRegister,
        op: LogicalOp,
    },
    /// Memory read at `rs` plus a sign-extended 6-bit offset.
    Load {
        rd: GeneralRegister,
        rs: GeneralRegister,
        offset: i16,
    },
    /// Memory write of `rt` at `rs` plus a sign-extended 6-bit offset.
    Store {
        rt: GeneralRegister,
        rs: GeneralRegister,
        offset: i16,
    },
    /// Return from trap: loads `PC` from `R7`.
    ReturnFromTrap,
    /// Load a sign-extended 9-bit immediate into `rd`.
    Const { rd: GeneralRegister, value: i16 },
    /// Shift or modulo into `rd`.
    ShiftMod {
        rd: GeneralRegister,
        rs: GeneralRegister,
        op: ShiftOp,
    },
    /// Unconditional control transfer.
    Jump { target: JumpTarget },
    /// Replace the upper byte of `rd`, preserving the lower byte.
    Hiconst { rd: GeneralRegister, value: u8 },
    /// Supervisor call through the trap vector table.
    Trap { vector: u8 },
}

/// Result of decoding one instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// Successfully decoded instruction.
    Instruction(Instruction),
    /// Unassigned primary opcode; ends the run without faulting.
    UnknownOpcode(u8),
    /// Structurally invalid encoding; raises a fatal fault.
    Fault(FaultCode),
}

impl Decoded {
    /// Returns the decoded instruction if present.
    #[must_use]
    pub const fn instruction(self) -> Option<Instruction> {
        match self {
            Self::Instruction(i) => Some(i),
            Self::UnknownOpcode(_) | Self::Fault(_) => None,
        }
    }

    /// Returns the fault code if decoding raised one.
    #[must_use]
    pub const fn fault(self) -> Option<FaultCode> {
        match self {
            Self::Fault(f) => Some(f),
            Self::Instruction(_) | Self::UnknownOpcode(_) => None,
        }
    }
}

/// Instruction decoder for the LC4 ISA.
pub struct Decoder;

const fn register(bits: u16) -> GeneralRegister {
    match bits & 0x7 {
        0 => GeneralRegister::R0,
        1 => GeneralRegister::R1,
        2 => GeneralRegister::R2,
        3 => GeneralRegister::R3,
        4 => GeneralRegister::R4,
        5 => GeneralRegister::R5,
        6 => GeneralRegister::R6,
        _ => GeneralRegister::R7,
    }
}

const fn rd_field(word: u16) -> GeneralRegister {
    register(word >> 9)
}

const fn rs_field(word: u16) -> GeneralRegister {
    register(word >> 6)
}

const fn rt_field(word: u16) -> GeneralRegister {
    register(word)
}

impl Decoder {
    /// Decodes a 16-bit instruction word.
    ///
    /// Every word maps to exactly one [`Decoded`] arm: a tagged instruction,
    /// an unassigned primary opcode, or a fatal encoding fault (only the
    /// `HICONST` family can produce one, when its format bit is clear).
    #[must_use]
    pub const fn decode(word: u16) -> Decoded {
        let op = primary_opcode(word);
        let family = match Opcode::from_u4(op) {
            Some(family) => family,
            None => return Decoded::UnknownOpcode(op),
        };

        let instruction = match family {
            Opcode::Branch => Instruction::Branch {
                mask: ((word >> 9) & 0x7) as u8,
                offset: sign_extend(word & 0x1FF, 9),
            },
            Opcode::Arithmetic => Instruction::Arithmetic {
                rd: rd_field(word),
                rs: rs_field(word),
                op: decode_arithmetic_op(word),
            },
            Opcode::Compare => Instruction::Compare {
                rs: rd_field(word),
                op: decode_compare_op(word),
            },
            Opcode::JumpSubroutine => Instruction::JumpSubroutine {
                target: decode_jump_target(word),
            },
            Opcode::Logical => Instruction::Logical {
                rd: rd_field(word),
                rs: rs_field(word),
                op: decode_logical_op(word),
            },
            Opcode::Load => Instruction::Load {
                rd: rd_field(word),
                rs: rs_field(word),
                offset: sign_extend(word & 0x3F, 6),
            },
            Opcode::Store => Instruction::Store {
                rt: rd_field(word),
                rs: rs_field(word),
                offset: sign_extend(word & 0x3F, 6),
            },
            Opcode::ReturnFromTrap => Instruction::ReturnFromTrap,
            Opcode::Const => Instruction::Const {
                rd: rd_field(word),
                value: sign_extend(word & 0x1FF, 9),
            },
            Opcode::ShiftMod => Instruction::ShiftMod {
                rd: rd_field(word),
                rs: rs_field(word),
                op: decode_shift_op(word),
            },
            Opcode::Jump => Instruction::Jump {
                target: decode_jump_target(word),
            },
            Opcode::Hiconst => {
                if (word >> 8) & 0x1 == 0 {
                    return Decoded::Fault(FaultCode::MalformedHiconst);
                }
                Instruction::Hiconst {
                    rd: rd_field(word),
                    value: (word & 0xFF) as u8,
                }
            }
            Opcode::Trap => Instruction::Trap {
                vector: (word & 0xFF) as u8,
            },
        };

        Decoded::Instruction(instruction)
    }
}

const fn decode_arithmetic_op(word: u16) -> ArithmeticOp {
    if word & 0x0020 != 0 {
        return ArithmeticOp::AddImmediate(sign_extend(word & 0x1F, 5));
    }
    // Bit 5 is clear, so the sub-operation field spans two bits.
    match (word >> 3) & 0x3 {
        0 => ArithmeticOp::Add(rt_field(word)),
        1 => ArithmeticOp::Multiply(rt_field(word)),
        2 => ArithmeticOp::Subtract(rt_field(word)),
        _ => ArithmeticOp::Divide(rt_field(word)),
    }
}

const fn decode_compare_op(word: u16) -> CompareOp {
    match (word >> 7) & 0x3 {
        0 => CompareOp::Register(rt_field(word)),
        1 => CompareOp::RegisterUnsigned(rt_field(word)),
        2 => CompareOp::Immediate(sign_extend(word & 0x7F, 7)),
        _ => CompareOp::ImmediateUnsigned(word & 0x7F),
    }
}

const fn decode_logical_op(word: u16) -> LogicalOp {
    match (word >> 3) & 0x7 {
        0 => LogicalOp::And(rt_field(word)),
        1 => LogicalOp::Not,
        2 => LogicalOp::Or(rt_field(word)),
        3 => LogicalOp::Xor(rt_field(word)),
        _ => LogicalOp::AndImmediate(sign_extend(word & 0x1F, 5)),
    }
}

const fn decode_shift_op(word: u16) -> ShiftOp {
    let amount = word & 0xF;
    match (word >> 4) & 0x3 {
        0 => ShiftOp::LeftLogical(amount),
        1 => ShiftOp::RightArithmetic(amount),
        2 => ShiftOp::RightLogical(amount),
        _ => ShiftOp::Modulo(rt_field(word)),
    }
}

const fn decode_jump_target(word: u16) -> JumpTarget {
    if (word >> 11) & 0x1 == 1 {
        JumpTarget::PcRelative(sign_extend(word & 0x7FF, 11))
    } else {
        JumpTarget::Register(rs_field(word))
    }
}
