// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use byteorder::{ByteOrder, LittleEndian};
use crate::nes::cpu::CPU;

// Size of the internal RAM chip.
pub const RAM_SIZE: usize = 0x800;

// Partitioned virtual memory map bounds. The 2kB of RAM is repeated three more
// times up to 0x1FFF; everything above belongs to the PPU, APU and cartridge
// which are not modeled here.
pub const RAM_START_ADDR  : u16 = 0x0;
pub const RAM_END_ADDR    : u16 = 0x7FF;
pub const RAM_MIRROR_START: u16 = 0x800;
pub const RAM_MIRROR_END  : u16 = 0x1FFF;

// Location of the first byte on the bottom of the stack. The stack starts on
// memory page 2 (0x100).
pub const STACK_OFFSET: u16 = 0x100;

/// CPU visible memory. Only the internal RAM exists; every access goes through
/// `map` which folds the mirrors onto the physical array.
///
/// Reads above the mirrored RAM return 0 and writes there are dropped, so a
/// program poking at PPU or APU registers keeps running without touching
/// RAM.
#[derive(Clone)]
pub struct Memory {
    // 2kB of internal RAM for which it's use is entirely up to the programmer.
    ram: [u8; RAM_SIZE],
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            ram: [0; RAM_SIZE],
        }
    }

    /// Reads an unsigned 8-bit byte value located at the given virtual address.
    #[inline(always)]
    pub fn read_u8(&self, addr: u16) -> u8 {
        match Memory::map(addr) {
            Some(idx) => self.ram[idx],
            None => 0,
        }
    }

    /// Writes an unsigned 8-bit byte value to the given virtual address.
    #[inline(always)]
    pub fn write_u8(&mut self, addr: u16, val: u8) {
        if let Some(idx) = Memory::map(addr) {
            self.ram[idx] = val;
        }
    }

    /// Reads an unsigned 16-bit value at the given virtual address
    /// (little-endian).
    #[inline(always)]
    pub fn read_u16(&self, addr: u16) -> u16 {
        let bytes = [self.read_u8(addr), self.read_u8(addr.wrapping_add(1))];
        LittleEndian::read_u16(&bytes)
    }

    /// Reads an unsigned 16-bit value at the given virtual address
    /// (little-endian) where the MSB is read at page start if the LSB is at
    /// the end of a page. This exists to properly emulate a hardware bug in the
    /// 2A03 where indirect jumps cannot fetch addresses outside it's own page.
    #[inline(always)]
    pub fn read_u16_wrapped_msb(&self, addr: u16) -> u16 {
        if addr & 0xFF != 0xFF {
            return self.read_u16(addr);
        }

        let bytes = [self.read_u8(addr), self.read_u8(addr & 0xFF00)];
        LittleEndian::read_u16(&bytes)
    }

    /// Reads a 16-bit pointer stored in the zero page. The high byte wraps
    /// around to 0x00 instead of spilling into page one.
    #[inline(always)]
    pub fn read_u16_zero_page(&self, addr: u8) -> u16 {
        let bytes = [self.read_u8(addr as u16), self.read_u8(addr.wrapping_add(1) as u16)];
        LittleEndian::read_u16(&bytes)
    }

    /// Dumps the contents of a slice starting at a given address.
    pub fn memdump(&mut self, addr: u16, buf: &[u8]) {
        for (i, byte) in buf.iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u16), *byte);
        }
    }

    // Utility functions for managing the stack.

    /// Pushes an 8-bit number onto the stack.
    pub fn stack_push_u8(&mut self, cpu: &mut CPU, value: u8) {
        self.write_u8(STACK_OFFSET | cpu.sp as u16, value);
        cpu.sp = cpu.sp.wrapping_sub(1);
    }

    /// Pops an 8-bit number off the stack.
    pub fn stack_pop_u8(&mut self, cpu: &mut CPU) -> u8 {
        cpu.sp = cpu.sp.wrapping_add(1);
        self.read_u8(STACK_OFFSET | cpu.sp as u16)
    }

    /// Pushes a 16-bit number (usually an address) onto the stack. The low
    /// byte goes in first so the high byte ends up on top.
    pub fn stack_push_u16(&mut self, cpu: &mut CPU, value: u16) {
        self.stack_push_u8(cpu, value as u8);
        self.stack_push_u8(cpu, (value >> 8) as u8);
    }

    /// Pops a 16-bit number (usually an address) off the stack, high byte
    /// first.
    pub fn stack_pop_u16(&mut self, cpu: &mut CPU) -> u16 {
        let msb = self.stack_pop_u8(cpu);
        let lsb = self.stack_pop_u8(cpu);
        LittleEndian::read_u16(&[lsb, msb])
    }

    /// Maps a given virtual address to an index into the physical RAM array,
    /// or `None` when the address lies outside the mirrored RAM.
    pub fn map(addr: u16) -> Option<usize> {
        match addr {
            RAM_START_ADDR..=RAM_END_ADDR =>
                Some(addr as usize),
            RAM_MIRROR_START..=RAM_MIRROR_END =>
                Some(addr as usize % RAM_SIZE),
            _ => None,
        }
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::new()
    }
}
