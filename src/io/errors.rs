// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::nes::opcode::{AddressingMode, Operation};
use std::io;
use thiserror::Error;

// Exit codes used throughout the application. These exit codes has specific
// meanings and are used when no OS error codes are available.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1; // Generic error ¯\_(ツ)_/¯.
pub const EXIT_INVALID_ROM: i32 = 2; // Invalid rom passed.
pub const EXIT_DECODE_FAILURE: i32 = 3;
pub const EXIT_INVALID_ARGUMENTS: i32 = 4;

/// Errors raised while reading a cartridge image. No partial rom is ever
/// returned alongside one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read rom: {0}")]
    Io(#[from] io::Error),

    #[error("rom is {len} bytes, too short to contain an iNES header")]
    HeaderTooShort { len: usize },

    #[error("rom declares {expected} bytes of {section} data but only {available} are present")]
    Truncated {
        section: &'static str,
        expected: usize,
        available: usize,
    },
}

/// Raised when the PRG stream ends in the middle of an instruction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("opcode {opcode:#04X} at offset {offset:#06X} needs {needed} operand bytes but only {available} remain")]
    Truncated {
        offset: usize,
        opcode: u8,
        needed: usize,
        available: usize,
    },
}

/// Fatal conditions hit while executing an instruction. The machine state is
/// left exactly as it was before the failing instruction started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecError {
    #[error("{operation:?} cannot be executed with {mode:?} addressing")]
    InvalidAddressingMode {
        operation: Operation,
        mode: AddressingMode,
    },

    #[error("{mode:?} addressing needs {expected} operand bytes but the instruction carries {found}")]
    MissingOperand {
        mode: AddressingMode,
        expected: usize,
        found: usize,
    },

    #[error("no operation is encoded by tag {0:#04X}")]
    UnknownOperation(u8),

    #[error("no addressing mode is encoded by tag {0:#04X}")]
    UnknownAddressingMode(u8),
}
