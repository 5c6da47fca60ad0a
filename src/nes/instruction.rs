// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use byteorder::{ByteOrder, LittleEndian};
use crate::io::errors::{DecodeError, ExecError};
use crate::nes::cpu::CPU;
use crate::nes::memory::Memory;
use crate::nes::opcode::{classify, AddressingMode, Operation};
use crate::utils::paging;

/// One instruction occurrence in program memory. All 6502 instructions are a
/// maximum size of 3 bytes. The first byte is the opcode which determines the
/// action of the instruction. The following bytes (the body) are the operands
/// and are present depending on the addressing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    // Position of the opcode byte in the PRG buffer it was decoded from.
    pub offset: usize,
    pub opcode: u8,
    pub operation: Operation,
    pub mode: AddressingMode,
    pub size: u8,
    pub cycles: u8,
    pub page_cross_cycles: u8,
    pub branch_cycles: u8,
    pub body: Vec<u8>,
}

/// Result of resolving an instruction's operand against the current machine
/// state. It only lives for one execution since it depends on registers and
/// memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub value: u8,

    // Effective memory address, for modes that name one.
    pub address: Option<u16>,

    // `None` when the addressing mode doesn't check for page crossings.
    pub page_crossed: Option<bool>,
}

impl Operand {
    fn value(value: u8) -> Operand {
        Operand { value, address: None, page_crossed: None }
    }

    fn memory(memory: &Memory, addr: u16) -> Operand {
        Operand { value: memory.read_u8(addr), address: Some(addr), page_crossed: None }
    }

    fn indexed(memory: &Memory, base: u16, addr: u16) -> Operand {
        Operand {
            value: memory.read_u8(addr),
            address: Some(addr),
            page_crossed: Some(paging::page_crossed(base, addr)),
        }
    }
}

impl Instruction {
    /// Decodes the instruction at the start of `bytes`, which is taken to sit
    /// at `offset` within its PRG buffer. The operand bytes declared by the
    /// catalog must all be present.
    pub fn decode_at(bytes: &[u8], offset: usize) -> Result<Instruction, DecodeError> {
        let opcode = match bytes.first() {
            Some(opcode) => *opcode,
            None => {
                return Err(DecodeError::Truncated { offset, opcode: 0, needed: 1, available: 0 });
            }
        };

        let shape = classify(opcode);
        let len = shape.size as usize;
        if bytes.len() < len {
            return Err(DecodeError::Truncated {
                offset,
                opcode,
                needed: len - 1,
                available: bytes.len() - 1,
            });
        }

        Ok(Instruction {
            offset,
            opcode,
            operation: shape.operation,
            mode: shape.mode,
            size: shape.size,
            cycles: shape.cycles,
            page_cross_cycles: shape.page_cross_cycles,
            branch_cycles: shape.branch_cycles,
            body: bytes[1..len].to_vec(),
        })
    }

    /// Decodes a single instruction from raw bytes, e.g. `&[0xA9, 0x10]`.
    pub fn decode(bytes: &[u8]) -> Result<Instruction, DecodeError> {
        Instruction::decode_at(bytes, 0)
    }

    /// First operand byte (zero page address, immediate value or
    /// displacement).
    fn byte(&self) -> Result<u8, ExecError> {
        self.body.first().copied().ok_or(ExecError::MissingOperand {
            mode: self.mode,
            expected: self.mode.operand_len(),
            found: self.body.len(),
        })
    }

    /// Both operand bytes as a little-endian absolute address.
    fn word(&self) -> Result<u16, ExecError> {
        if self.body.len() < 2 {
            return Err(ExecError::MissingOperand {
                mode: self.mode,
                expected: self.mode.operand_len(),
                found: self.body.len(),
            });
        }
        Ok(LittleEndian::read_u16(&self.body[0..2]))
    }

    /// Resolves the operand according to the addressing mode. Indexed modes
    /// report whether the index moved the address into another page.
    pub fn resolve(&self, cpu: &CPU, memory: &Memory) -> Result<Operand, ExecError> {
        use crate::nes::opcode::AddressingMode::*;

        Ok(match self.mode {
            Implied => Operand::value(0),
            Accumulator => Operand::value(cpu.a),
            Immediate | Relative => Operand::value(self.byte()?),
            ZeroPage => Operand::memory(memory, self.byte()? as u16),
            ZeroPageX => {
                let base = self.byte()?;
                Operand::indexed(memory, base as u16, base.wrapping_add(cpu.x) as u16)
            },
            ZeroPageY => {
                let base = self.byte()?;
                Operand::indexed(memory, base as u16, base.wrapping_add(cpu.y) as u16)
            },
            Absolute => Operand::memory(memory, self.word()?),
            AbsoluteX => {
                let base = self.word()?;
                Operand::indexed(memory, base, base.wrapping_add(cpu.x as u16))
            },
            AbsoluteY => {
                let base = self.word()?;
                Operand::indexed(memory, base, base.wrapping_add(cpu.y as u16))
            },
            Indirect => {
                // Only JMP uses this mode. The jump target is read by the
                // handler since it has to reproduce the page wrap bug.
                let pointer = self.word()?;
                Operand { value: memory.read_u8(pointer), address: Some(pointer), page_crossed: None }
            },
            IndirectX => {
                let pointer = self.byte()?.wrapping_add(cpu.x);
                Operand::memory(memory, memory.read_u16_zero_page(pointer))
            },
            IndirectY => {
                let base = memory.read_u16_zero_page(self.byte()?);
                Operand::indexed(memory, base, base.wrapping_add(cpu.y as u16))
            },
        })
    }

    /// Disassembles the instruction into assembler syntax, e.g. `STA $0200,X`.
    pub fn disassemble(&self) -> String {
        use crate::nes::opcode::AddressingMode::*;

        let name = self.operation.mnemonic();
        let b = self.body.first().copied().unwrap_or(0);
        let w = if self.body.len() >= 2 { LittleEndian::read_u16(&self.body[0..2]) } else { b as u16 };

        match self.mode {
            Implied     => name.to_string(),
            Accumulator => format!("{} A", name),
            Immediate   => format!("{} #${:02X}", name, b),
            ZeroPage    => format!("{} ${:02X}", name, b),
            ZeroPageX   => format!("{} ${:02X},X", name, b),
            ZeroPageY   => format!("{} ${:02X},Y", name, b),
            Relative    => format!("{} ${:02X}", name, b),
            Absolute    => format!("{} ${:04X}", name, w),
            AbsoluteX   => format!("{} ${:04X},X", name, w),
            AbsoluteY   => format!("{} ${:04X},Y", name, w),
            Indirect    => format!("{} (${:04X})", name, w),
            IndirectX   => format!("{} (${:02X},X)", name, b),
            IndirectY   => format!("{} (${:02X}),Y", name, b),
        }
    }

    /// The raw bytes of the instruction formatted as hex, padded to the width
    /// of the longest instruction.
    pub fn hex_bytes(&self) -> String {
        let mut bytes = vec![format!("{:02X}", self.opcode)];
        bytes.extend(self.body.iter().map(|b| format!("{:02X}", b)));
        while bytes.len() < 3 {
            bytes.push(String::from("  "));
        }
        bytes.join(" ")
    }

    /// Formats a trace line in the column layout of Nintendulator logs.
    pub fn log(&self, cpu: &CPU) -> String {
        format!("{:04X}  {}  {:30}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{:3}",
                cpu.pc, self.hex_bytes(), self.disassemble(), cpu.a, cpu.x,
                cpu.y, cpu.p, cpu.sp, cpu.cycles)
    }
}

/// Walks a PRG buffer from offset 0 and decodes every instruction in it. The
/// result covers the whole buffer without gaps; an instruction whose operands
/// run past the end of the buffer aborts decoding.
pub fn decode_program(prg: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
    let mut instructions = Vec::new();
    let mut offset = 0;

    while offset < prg.len() {
        let instr = Instruction::decode_at(&prg[offset..], offset)?;
        offset += instr.size as usize;
        instructions.push(instr);
    }

    Ok(instructions)
}
