// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::io::errors::LoadError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

// Used to identify a rom as being in the iNES format. This byte sequence should
// be at the start of every rom.
pub const INES_IDENTIFIER: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

pub const HEADER_SIZE: usize = 0x10;
pub const TRAINER_SIZE: usize = 512;
pub const PRG_BLOCK_SIZE: usize = 16384;
pub const CHR_BLOCK_SIZE: usize = 8192;

const TRAINER_FLAG: u8 = 0x04;

/// Structure that represents the 16 byte header of an iNES rom. Only missing
/// the zero fill as it's unused space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct INESHeader {
    pub identifier: [u8; 4], // File format identifier.
    pub prg_rom_size: u8,    // Size of PRG ROM in 16 KB units.
    pub chr_rom_size: u8,    // Size of CHR ROM in 8 KB units.
    pub flags_6: u8,
    pub flags_7: u8,
    pub prg_ram_size: u8,    // Size of PRG RAM in 8 KB units (0 infers 8 KB for
                             // compatibility).
    pub flags_9: u8,
    pub flags_10: u8         // Unofficial, unused by most emulators.
}

impl INESHeader {
    /// A 512 byte trainer sits between the header and PRG data when bit 2 of
    /// flags 6 is set.
    pub fn has_trainer(&self) -> bool {
        self.flags_6 & TRAINER_FLAG == TRAINER_FLAG
    }

    /// True if the identifier matches "NES<0x1A>".
    pub fn is_ines(&self) -> bool {
        self.identifier == INES_IDENTIFIER
    }

    pub fn prg_len(&self) -> usize {
        self.prg_rom_size as usize * PRG_BLOCK_SIZE
    }

    pub fn chr_len(&self) -> usize {
        self.chr_rom_size as usize * CHR_BLOCK_SIZE
    }
}

/// Reads a binary file at a given path and stores it in a vector of bytes.
pub fn read_bin<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, LoadError> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut file = File::open(path)?;
    file.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Parses the header of a rom (assumed to be in the iNES format).
///
/// The first 16 bytes of the rom contain the header. Only the block counts at
/// offsets 4 and 5 matter for loading, so the identifier is recorded but not
/// enforced here.
pub fn parse_rom_header(rom: &[u8]) -> Result<INESHeader, LoadError> {
    if rom.len() < HEADER_SIZE {
        return Err(LoadError::HeaderTooShort { len: rom.len() });
    }

    let mut identifier: [u8; 4] = [0; 4];
    identifier.copy_from_slice(&rom[0x0..0x4]);

    Ok(INESHeader {
        identifier,
        prg_rom_size: rom[0x4],
        chr_rom_size: rom[0x5],
        flags_6: rom[0x6],
        flags_7: rom[0x7],
        prg_ram_size: rom[0x8],
        flags_9: rom[0x9],
        flags_10: rom[0xA]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(prg: u8, chr: u8, flags_6: u8) -> Vec<u8> {
        let mut bytes = vec![0x4E, 0x45, 0x53, 0x1A, prg, chr, flags_6];
        bytes.resize(HEADER_SIZE, 0);
        bytes
    }

    #[test]
    fn parses_block_counts() {
        let parsed = parse_rom_header(&header(2, 1, 0)).unwrap();
        assert!(parsed.is_ines());
        assert_eq!(parsed.prg_len(), 32768);
        assert_eq!(parsed.chr_len(), 8192);
        assert!(!parsed.has_trainer());
    }

    #[test]
    fn detects_trainer() {
        let parsed = parse_rom_header(&header(1, 0, 0x04)).unwrap();
        assert!(parsed.has_trainer());
    }

    #[test]
    fn foreign_identifier_is_not_rejected() {
        let mut bytes = header(1, 1, 0);
        bytes[0] = 0;
        let parsed = parse_rom_header(&bytes).unwrap();
        assert!(!parsed.is_ines());
    }

    #[test]
    fn short_header_is_rejected() {
        match parse_rom_header(&[0x4E, 0x45, 0x53]) {
            Err(LoadError::HeaderTooShort { len }) => assert_eq!(len, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        match read_bin("/nonexistent/path/to/rom.nes") {
            Err(LoadError::Io(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
