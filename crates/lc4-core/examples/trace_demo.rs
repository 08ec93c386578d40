//! Runs a tiny hand-assembled program and prints its execution trace.

#![allow(clippy::cast_possible_truncation)]

use lc4_core::{run_to_halt, MachineState, StepOutcome, TraceRecord, TraceSink, RESET_VECTOR};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

struct StdoutSink;

impl TraceSink for StdoutSink {
    fn record(&mut self, record: &TraceRecord) {
        println!("{record}");
    }
}

fn main() {
    // CONST R1, #5
    // ADD R2, R1, R1
    // HICONST R2, #0x12
    // CMP R2, R1
    // TRAP #0xFF        ; vectors to the halt address
    let program: [u16; 5] = [0x9205, 0x1441, 0xD512, 0x2401, 0xF0FF];

    let mut machine = MachineState::new();
    for (i, word) in program.iter().enumerate() {
        machine.write_word(RESET_VECTOR + i as u16, *word);
    }

    let outcome = run_to_halt(&mut machine, &mut StdoutSink);

    match outcome.final_step {
        StepOutcome::Halted(reason) => {
            eprintln!("halted after {} instructions: {reason:?}", outcome.steps);
        }
        StepOutcome::Fault(code) => {
            eprintln!("faulted after {} instructions: {code}", outcome.steps);
        }
        StepOutcome::Executed(_) => unreachable!("run_to_halt only stops on halt or fault"),
    }
}
