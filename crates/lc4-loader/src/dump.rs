//! Memory-image dump serialization.

use std::io::{self, Write};

use lc4_core::MachineState;

/// Writes every non-zero memory cell in ascending address order, one line
/// per cell: `address: <5-digit decimal> contents: 0x<4-digit hex>`.
///
/// # Errors
///
/// Returns any I/O error from the underlying writer.
pub fn write_memory_dump<W: Write>(machine: &MachineState, out: &mut W) -> io::Result<()> {
    for (addr, value) in machine.memory.iter().enumerate() {
        if *value != 0 {
            writeln!(out, "address: {addr:05} contents: 0x{value:04X}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_memory_dump;
    use lc4_core::MachineState;

    fn dump_to_string(machine: &MachineState) -> String {
        let mut bytes = Vec::new();
        write_memory_dump(machine, &mut bytes).expect("write to vec");
        String::from_utf8(bytes).expect("dump is ascii")
    }

    #[test]
    fn zero_memory_produces_an_empty_dump() {
        let machine = MachineState::new();
        assert_eq!(dump_to_string(&machine), "");
    }

    #[test]
    fn lines_are_zero_padded_decimal_and_uppercase_hex() {
        let mut machine = MachineState::new();
        machine.write_word(0x0042, 0x00AB);
        machine.write_word(0xFFFF, 0xBEEF);

        assert_eq!(
            dump_to_string(&machine),
            "address: 00066 contents: 0x00AB\naddress: 65535 contents: 0xBEEF\n"
        );
    }

    #[test]
    fn cells_appear_in_ascending_address_order() {
        let mut machine = MachineState::new();
        machine.write_word(0x9000, 1);
        machine.write_word(0x0001, 2);
        machine.write_word(0x4000, 3);

        let dump = dump_to_string(&machine);
        let addresses: Vec<&str> = dump
            .lines()
            .map(|line| line.split_whitespace().nth(1).expect("address field"))
            .collect();
        assert_eq!(addresses, ["00001", "16384", "36864"]);
    }
}
