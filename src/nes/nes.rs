// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::io::errors::{DecodeError, ExecError};
use crate::io::log;
use crate::nes::cpu::CPU;
use crate::nes::execute;
use crate::nes::instruction::Instruction;
use crate::nes::memory::Memory;
use crate::nes::rom::Rom;

/// Options passed from the command-line that may influence how the emulator
/// behaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    // Print timestamped log lines.
    pub verbose: bool,
}

/// One machine instance: a CPU, its RAM and the cartridge currently inserted.
/// Instances share nothing, so several can run side by side.
pub struct NES {
    pub runtime_options: RuntimeOptions,
    pub cpu: CPU,
    pub memory: Memory,
    rom: Option<Rom>,
}

impl NES {
    /// Powers on a machine with zeroed RAM and no cartridge.
    pub fn new(runtime_options: RuntimeOptions) -> NES {
        NES {
            runtime_options,
            cpu: CPU::new(),
            memory: Memory::new(),
            rom: None,
        }
    }

    /// Inserts a cartridge and decodes its PRG block. The cartridge is only
    /// kept if decoding succeeds.
    pub fn load(&mut self, mut rom: Rom) -> Result<(), DecodeError> {
        if !rom.header.is_ines() {
            log::log("rom", "missing iNES identifier, loading anyway", &self.runtime_options);
        }
        if rom.header.has_trainer() {
            log::log("rom", "Trainer data found", &self.runtime_options);
        }
        log::log("rom", format!("{} PRG-ROM bank(s), {} CHR-ROM bank(s)",
                                rom.header.prg_rom_size, rom.header.chr_rom_size), &self.runtime_options);

        let count = rom.decode()?.len();
        log::log("rom", format!("decoded {} instructions", count), &self.runtime_options);

        self.rom = Some(rom);
        Ok(())
    }

    pub fn rom(&self) -> Option<&Rom> {
        self.rom.as_ref()
    }

    /// Executes one instruction against this machine and adds the cycles it
    /// took to the CPU's running total. A failing instruction is logged along
    /// with a dump of the CPU.
    pub fn step(&mut self, instr: &Instruction) -> Result<u8, ExecError> {
        let cycles = match execute::step(&mut self.cpu, &mut self.memory, instr) {
            Ok(cycles) => cycles,
            Err(e) => {
                log::log("cpu", format!("{}: {}\n{}", instr.log(&self.cpu), e, self.cpu), &self.runtime_options);
                return Err(e);
            },
        };
        self.cpu.cycles += cycles as u64;
        Ok(cycles)
    }
}
