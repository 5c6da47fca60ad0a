// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::io::binutils::{self, INESHeader, HEADER_SIZE, TRAINER_SIZE};
use crate::io::errors::{DecodeError, LoadError};
use crate::nes::instruction::{decode_program, Instruction};
use std::path::Path;

/// A cartridge image split into its program and graphics blocks. Once
/// `decode` has run it also owns the decoded instruction stream of the PRG
/// block.
#[derive(Debug, Clone)]
pub struct Rom {
    pub header: INESHeader,
    pub prg: Vec<u8>,
    pub chr: Vec<u8>,
    instructions: Vec<Instruction>,
}

impl Rom {
    /// Splits a raw iNES image. PRG data starts right after the header (and
    /// the trainer, if one is flagged) and CHR data follows it immediately.
    /// Fails if the image holds fewer bytes than the header declares.
    pub fn parse(bytes: &[u8]) -> Result<Rom, LoadError> {
        let header = binutils::parse_rom_header(bytes)?;

        let mut offset = HEADER_SIZE;
        if header.has_trainer() {
            offset += TRAINER_SIZE;
        }

        let prg = Rom::section(bytes, offset, header.prg_len(), "PRG")?;
        offset += prg.len();
        let chr = Rom::section(bytes, offset, header.chr_len(), "CHR")?;

        Ok(Rom {
            header,
            prg,
            chr,
            instructions: Vec::new(),
        })
    }

    /// Reads and splits the iNES image at the given path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Rom, LoadError> {
        let bytes = binutils::read_bin(path)?;
        Rom::parse(&bytes)
    }

    fn section(bytes: &[u8], start: usize, len: usize, section: &'static str) -> Result<Vec<u8>, LoadError> {
        let available = bytes.len().saturating_sub(start);
        if available < len {
            return Err(LoadError::Truncated { section, expected: len, available });
        }
        Ok(bytes[start..start + len].to_vec())
    }

    pub fn prg_len(&self) -> usize {
        self.prg.len()
    }

    pub fn chr_len(&self) -> usize {
        self.chr.len()
    }

    /// Decodes the whole PRG block and keeps the result. On failure the
    /// previously decoded stream (if any) is left untouched.
    pub fn decode(&mut self) -> Result<&[Instruction], DecodeError> {
        self.instructions = decode_program(&self.prg)?;
        Ok(&self.instructions)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}
