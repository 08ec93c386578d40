//! Per-cycle control-signal model and trace serialization.
//!
//! Each executed instruction produces one freshly constructed
//! [`TraceRecord`]; nothing here persists across steps or lives on the
//! machine state. The rendered line format is consumed by downstream
//! verification tooling and must not change.

use std::fmt;

/// Control signals observable during one datapath cycle.
///
/// The record starts cleared and is filled in by the instruction handler
/// that executed; it is fully determined by that instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CycleSignals {
    /// Register-file write enable.
    pub register_write_enable: bool,
    /// Condition-code write enable.
    pub nzp_write_enable: bool,
    /// Data-memory write enable.
    pub data_write_enable: bool,
    /// Source register index driven this cycle.
    pub rs_index: u8,
    /// Target register index driven this cycle.
    pub rt_index: u8,
    /// Destination register index driven this cycle.
    pub rd_index: u8,
    /// Value presented to the register-file write port.
    pub register_input: u16,
    /// One-hot `N/Z/P` code (`N=4`, `Z=2`, `P=1`).
    pub nzp_value: u8,
    /// Data-memory address driven this cycle.
    pub data_address: u16,
    /// Data-memory value driven this cycle.
    pub data_value: u16,
}

/// One trace line worth of observable state for an executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TraceRecord {
    /// Program counter the instruction was fetched from.
    pub pc: u16,
    /// The raw 16-bit instruction word.
    pub instruction: u16,
    /// Control signals the instruction drove.
    pub signals: CycleSignals,
}

impl fmt::Display for TraceRecord {
    /// Renders the fixed-format record: `PC` in hex, the instruction as
    /// sixteen binary digits MSB-first, then each write-enable bit followed
    /// by its payload fields or zero placeholders.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.signals;

        write!(
            f,
            "{:04X} {:016b} {:01X} ",
            self.pc,
            self.instruction,
            u8::from(s.register_write_enable)
        )?;
        if s.register_write_enable {
            write!(f, "{:01X} {:04X} ", s.rd_index, s.register_input)?;
        } else {
            f.write_str("0 0000 ")?;
        }

        write!(f, "{:01X} ", u8::from(s.nzp_write_enable))?;
        if s.nzp_write_enable {
            write!(f, "{:01X} ", s.nzp_value)?;
        } else {
            f.write_str("0 ")?;
        }

        write!(f, "{:01X} ", u8::from(s.data_write_enable))?;
        if s.data_write_enable {
            write!(f, "{:04X} {:04X}", s.data_address, s.data_value)
        } else {
            f.write_str("0000 0000")
        }
    }
}

/// Sink consuming trace records in execution order.
pub trait TraceSink {
    /// Records one executed instruction.
    fn record(&mut self, record: &TraceRecord);
}

impl TraceSink for Vec<TraceRecord> {
    fn record(&mut self, record: &TraceRecord) {
        self.push(*record);
    }
}

/// Sink that drops every record; for runs where only the final state
/// matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&mut self, _record: &TraceRecord) {}
}
