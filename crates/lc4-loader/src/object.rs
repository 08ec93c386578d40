//! Binary object-file parsing.
//!
//! An object file is a stream of big-endian 16-bit words: a header word
//! naming the record kind, followed by that record's payload. Code and
//! data blocks populate the machine's memory image; the remaining record
//! kinds carry debugger metadata and are skipped.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use lc4_core::MachineState;
use thiserror::Error;

/// Header word introducing a code block.
pub const CODE_BLOCK: u16 = 0xCADE;
/// Header word introducing a data block.
pub const DATA_BLOCK: u16 = 0xDADA;
/// Header word introducing a symbol record (skipped).
pub const SYMBOL_RECORD: u16 = 0xC3B7;
/// Header word introducing a file-name record (skipped).
pub const FILE_NAME_RECORD: u16 = 0xF17E;
/// Header word introducing a line-number record (skipped).
pub const LINE_NUMBER_RECORD: u16 = 0x715E;

/// Failure surfaced while parsing an object file.
///
/// Memory regions already populated before the failure stay in place;
/// there is no rollback across records or files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A header word matched none of the defined record kinds.
    #[error("unrecognized object file header {0:#06X}")]
    BadHeader(u16),
    /// The stream ended inside a record; only end-of-stream at a header
    /// boundary ends loading cleanly.
    #[error("object file ended in the middle of a record")]
    UnexpectedEof,
    /// The underlying reader failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Reads one big-endian word, or `None` at a clean end of stream.
fn read_word<R: Read>(reader: &mut R) -> Result<Option<u16>, LoadError> {
    let mut buf = [0u8; 2];
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            return if filled == 0 {
                Ok(None)
            } else {
                Err(LoadError::UnexpectedEof)
            };
        }
        filled += n;
    }
    Ok(Some(u16::from_be_bytes(buf)))
}

/// Reads one big-endian word that must be present inside a record.
fn payload_word<R: Read>(reader: &mut R) -> Result<u16, LoadError> {
    read_word(reader)?.ok_or(LoadError::UnexpectedEof)
}

fn skip_bytes<R: Read>(reader: &mut R, count: u64) -> Result<(), LoadError> {
    let copied = io::copy(&mut reader.by_ref().take(count), &mut io::sink())?;
    if copied == count {
        Ok(())
    } else {
        Err(LoadError::UnexpectedEof)
    }
}

/// Parses one object-file stream into the machine's memory image.
///
/// Later records (and later files) overwrite earlier loads at overlapping
/// addresses. Block addresses wrap modulo the 16-bit address space.
///
/// # Errors
///
/// Returns [`LoadError::BadHeader`] for an unknown record kind,
/// [`LoadError::UnexpectedEof`] for a truncated record, or the underlying
/// I/O error.
pub fn load_object<R: Read>(reader: &mut R, machine: &mut MachineState) -> Result<(), LoadError> {
    while let Some(header) = read_word(reader)? {
        match header {
            CODE_BLOCK | DATA_BLOCK => {
                let address = payload_word(reader)?;
                let count = payload_word(reader)?;
                for i in 0..count {
                    let word = payload_word(reader)?;
                    machine.write_word(address.wrapping_add(i), word);
                }
            }
            SYMBOL_RECORD => {
                let _ = payload_word(reader)?;
                let length = payload_word(reader)?;
                skip_bytes(reader, u64::from(length))?;
            }
            FILE_NAME_RECORD => {
                let length = payload_word(reader)?;
                skip_bytes(reader, u64::from(length))?;
            }
            LINE_NUMBER_RECORD => {
                for _ in 0..3 {
                    payload_word(reader)?;
                }
            }
            other => return Err(LoadError::BadHeader(other)),
        }
    }
    Ok(())
}

/// Opens `path` and loads it as an object file.
///
/// # Errors
///
/// Returns any [`LoadError`] from opening or parsing the file.
pub fn load_object_file(path: &Path, machine: &mut MachineState) -> Result<(), LoadError> {
    let mut reader = BufReader::new(File::open(path)?);
    load_object(&mut reader, machine)
}
