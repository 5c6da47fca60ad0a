// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The instruction catalog. Every one of the 256 opcode values maps to a
//! fixed instruction shape: which operation runs, how its operand is
//! addressed, how many bytes it occupies and how many cycles it costs.

use crate::io::errors::ExecError;
use enum_primitive::FromPrimitive;
use std::convert::TryFrom;

enum_from_primitive! {
    /// Rules for locating an instruction's operand.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum AddressingMode {
        Implied     = 0,
        Accumulator = 1,
        Immediate   = 2,
        ZeroPage    = 3,
        ZeroPageX   = 4,
        ZeroPageY   = 5,
        Relative    = 6,
        Absolute    = 7,
        AbsoluteX   = 8,
        AbsoluteY   = 9,
        Indirect    = 10,
        IndirectX   = 11,
        IndirectY   = 12,
    }
}

impl AddressingMode {
    /// Number of operand bytes trailing the opcode.
    pub fn operand_len(self) -> usize {
        use self::AddressingMode::*;

        match self {
            Implied | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | Relative | IndirectX | IndirectY => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }
}

impl TryFrom<u8> for AddressingMode {
    type Error = ExecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        AddressingMode::from_u8(tag).ok_or(ExecError::UnknownAddressingMode(tag))
    }
}

enum_from_primitive! {
    /// The operations the 2A03 understands. Undocumented opcodes all collapse
    /// into `NOP`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Operation {
        NOP =  0, ADC =  1, AND =  2, ASL =  3,
        BCC =  4, BCS =  5, BEQ =  6, BIT =  7,
        BMI =  8, BNE =  9, BPL = 10, BRK = 11,
        BVC = 12, BVS = 13, CLC = 14, CLD = 15,
        CLI = 16, CLV = 17, CMP = 18, CPX = 19,
        CPY = 20, DEC = 21, DEX = 22, DEY = 23,
        EOR = 24, INC = 25, INX = 26, INY = 27,
        JMP = 28, JSR = 29, LDA = 30, LDX = 31,
        LDY = 32, LSR = 33, ORA = 34, PHA = 35,
        PHP = 36, PLA = 37, PLP = 38, ROL = 39,
        ROR = 40, RTI = 41, RTS = 42, SBC = 43,
        SEC = 44, SED = 45, SEI = 46, STA = 47,
        STX = 48, STY = 49, TAX = 50, TAY = 51,
        TSX = 52, TXA = 53, TXS = 54, TYA = 55,
    }
}

// Indexed by the operation's discriminant.
const MNEMONICS: [&str; 56] = [
    "NOP", "ADC", "AND", "ASL",
    "BCC", "BCS", "BEQ", "BIT",
    "BMI", "BNE", "BPL", "BRK",
    "BVC", "BVS", "CLC", "CLD",
    "CLI", "CLV", "CMP", "CPX",
    "CPY", "DEC", "DEX", "DEY",
    "EOR", "INC", "INX", "INY",
    "JMP", "JSR", "LDA", "LDX",
    "LDY", "LSR", "ORA", "PHA",
    "PHP", "PLA", "PLP", "ROL",
    "ROR", "RTI", "RTS", "SBC",
    "SEC", "SED", "SEI", "STA",
    "STX", "STY", "TAX", "TAY",
    "TSX", "TXA", "TXS", "TYA",
];

impl Operation {
    /// Three letter assembler name of the operation.
    pub fn mnemonic(self) -> &'static str {
        MNEMONICS[self as usize]
    }

    /// Branches are the only operations whose cost depends on a condition.
    pub fn is_branch(self) -> bool {
        use self::Operation::*;

        match self {
            BCC | BCS | BEQ | BMI | BNE | BPL | BVC | BVS => true,
            _ => false,
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = ExecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Operation::from_u8(tag).ok_or(ExecError::UnknownOperation(tag))
    }
}

/// Static description of an opcode. Bonus cycles are the catalog defaults;
/// execution zeroes them per pass when the condition they pay for is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionShape {
    pub operation: Operation,
    pub mode: AddressingMode,
    pub size: u8,
    pub cycles: u8,
    pub page_cross_cycles: u8,
    pub branch_cycles: u8,
}

#[inline(always)]
fn shape(operation: Operation, mode: AddressingMode, size: u8, cycles: u8,
         page_cross_cycles: u8, branch_cycles: u8) -> InstructionShape {
    InstructionShape {
        operation,
        mode,
        size,
        cycles,
        page_cross_cycles,
        branch_cycles,
    }
}

/// Shape given to every byte that isn't a documented opcode.
pub const NOP_SHAPE: InstructionShape = InstructionShape {
    operation: Operation::NOP,
    mode: AddressingMode::Implied,
    size: 1,
    cycles: 2,
    page_cross_cycles: 0,
    branch_cycles: 0,
};

enum_from_primitive! {
    /// Every documented opcode of the 2A03, named after the operation and its
    /// addressing mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Opcode {
        ADCImm   = 0x69,
        ADCZero  = 0x65,
        ADCZeroX = 0x75,
        ADCAbs   = 0x6D,
        ADCAbsX  = 0x7D,
        ADCAbsY  = 0x79,
        ADCIndX  = 0x61,
        ADCIndY  = 0x71,

        ANDImm   = 0x29,
        ANDZero  = 0x25,
        ANDZeroX = 0x35,
        ANDAbs   = 0x2D,
        ANDAbsX  = 0x3D,
        ANDAbsY  = 0x39,
        ANDIndX  = 0x21,
        ANDIndY  = 0x31,

        ASLAcc   = 0x0A,
        ASLZero  = 0x06,
        ASLZeroX = 0x16,
        ASLAbs   = 0x0E,
        ASLAbsX  = 0x1E,

        BCCRel   = 0x90,

        BCSRel   = 0xB0,

        BEQRel   = 0xF0,

        BITZero  = 0x24,
        BITAbs   = 0x2C,

        BMIRel   = 0x30,

        BNERel   = 0xD0,

        BPLRel   = 0x10,

        BRKImpl  = 0x00,

        BVCRel   = 0x50,

        BVSRel   = 0x70,

        CLCImpl  = 0x18,

        CLDImpl  = 0xD8,

        CLIImpl  = 0x58,

        CLVImpl  = 0xB8,

        CMPImm   = 0xC9,
        CMPZero  = 0xC5,
        CMPZeroX = 0xD5,
        CMPAbs   = 0xCD,
        CMPAbsX  = 0xDD,
        CMPAbsY  = 0xD9,
        CMPIndX  = 0xC1,
        CMPIndY  = 0xD1,

        CPXImm   = 0xE0,
        CPXZero  = 0xE4,
        CPXAbs   = 0xEC,

        CPYImm   = 0xC0,
        CPYZero  = 0xC4,
        CPYAbs   = 0xCC,

        DECZero  = 0xC6,
        DECZeroX = 0xD6,
        DECAbs   = 0xCE,
        DECAbsX  = 0xDE,

        DEXImpl  = 0xCA,

        DEYImpl  = 0x88,

        EORImm   = 0x49,
        EORZero  = 0x45,
        EORZeroX = 0x55,
        EORAbs   = 0x4D,
        EORAbsX  = 0x5D,
        EORAbsY  = 0x59,
        EORIndX  = 0x41,
        EORIndY  = 0x51,

        INCZero  = 0xE6,
        INCZeroX = 0xF6,
        INCAbs   = 0xEE,
        INCAbsX  = 0xFE,

        INXImpl  = 0xE8,

        INYImpl  = 0xC8,

        JMPAbs   = 0x4C,
        JMPInd   = 0x6C,

        JSRAbs   = 0x20,

        LDAImm   = 0xA9,
        LDAZero  = 0xA5,
        LDAZeroX = 0xB5,
        LDAAbs   = 0xAD,
        LDAAbsX  = 0xBD,
        LDAAbsY  = 0xB9,
        LDAIndX  = 0xA1,
        LDAIndY  = 0xB1,

        LDXImm   = 0xA2,
        LDXZero  = 0xA6,
        LDXZeroY = 0xB6,
        LDXAbs   = 0xAE,
        LDXAbsY  = 0xBE,

        LDYImm   = 0xA0,
        LDYZero  = 0xA4,
        LDYZeroX = 0xB4,
        LDYAbs   = 0xAC,
        LDYAbsX  = 0xBC,

        LSRAcc   = 0x4A,
        LSRZero  = 0x46,
        LSRZeroX = 0x56,
        LSRAbs   = 0x4E,
        LSRAbsX  = 0x5E,

        NOPImpl  = 0xEA,

        ORAImm   = 0x09,
        ORAZero  = 0x05,
        ORAZeroX = 0x15,
        ORAAbs   = 0x0D,
        ORAAbsX  = 0x1D,
        ORAAbsY  = 0x19,
        ORAIndX  = 0x01,
        ORAIndY  = 0x11,

        PHAImpl  = 0x48,

        PHPImpl  = 0x08,

        PLAImpl  = 0x68,

        PLPImpl  = 0x28,

        ROLAcc   = 0x2A,
        ROLZero  = 0x26,
        ROLZeroX = 0x36,
        ROLAbs   = 0x2E,
        ROLAbsX  = 0x3E,

        RORAcc   = 0x6A,
        RORZero  = 0x66,
        RORZeroX = 0x76,
        RORAbs   = 0x6E,
        RORAbsX  = 0x7E,

        RTIImpl  = 0x40,

        RTSImpl  = 0x60,

        SBCImm   = 0xE9,
        SBCZero  = 0xE5,
        SBCZeroX = 0xF5,
        SBCAbs   = 0xED,
        SBCAbsX  = 0xFD,
        SBCAbsY  = 0xF9,
        SBCIndX  = 0xE1,
        SBCIndY  = 0xF1,

        SECImpl  = 0x38,

        SEDImpl  = 0xF8,

        SEIImpl  = 0x78,

        STAZero  = 0x85,
        STAZeroX = 0x95,
        STAAbs   = 0x8D,
        STAAbsX  = 0x9D,
        STAAbsY  = 0x99,
        STAIndX  = 0x81,
        STAIndY  = 0x91,

        STXZero  = 0x86,
        STXZeroY = 0x96,
        STXAbs   = 0x8E,

        STYZero  = 0x84,
        STYZeroX = 0x94,
        STYAbs   = 0x8C,

        TAXImpl  = 0xAA,

        TAYImpl  = 0xA8,

        TSXImpl  = 0xBA,

        TXAImpl  = 0x8A,

        TXSImpl  = 0x9A,

        TYAImpl  = 0x98,
    }
}

impl Opcode {
    /// Looks up the catalog entry of the opcode.
    pub fn shape(self) -> InstructionShape {
        use self::AddressingMode::*;
        use self::Opcode::*;
        use self::Operation::*;

        match self {
        ADCImm   => shape(ADC, Immediate, 2, 2, 0, 0),
        ADCZero  => shape(ADC, ZeroPage, 2, 3, 0, 0),
        ADCZeroX => shape(ADC, ZeroPageX, 2, 4, 0, 0),
        ADCAbs   => shape(ADC, Absolute, 3, 4, 0, 0),
        ADCAbsX  => shape(ADC, AbsoluteX, 3, 4, 1, 0),
        ADCAbsY  => shape(ADC, AbsoluteY, 3, 4, 1, 0),
        ADCIndX  => shape(ADC, IndirectX, 2, 6, 0, 0),
        ADCIndY  => shape(ADC, IndirectY, 2, 5, 1, 0),

        ANDImm   => shape(AND, Immediate, 2, 2, 0, 0),
        ANDZero  => shape(AND, ZeroPage, 2, 3, 0, 0),
        ANDZeroX => shape(AND, ZeroPageX, 2, 4, 0, 0),
        ANDAbs   => shape(AND, Absolute, 3, 4, 0, 0),
        ANDAbsX  => shape(AND, AbsoluteX, 3, 4, 1, 0),
        ANDAbsY  => shape(AND, AbsoluteY, 3, 4, 1, 0),
        ANDIndX  => shape(AND, IndirectX, 2, 6, 0, 0),
        ANDIndY  => shape(AND, IndirectY, 2, 5, 1, 0),

        ASLAcc   => shape(ASL, Accumulator, 1, 2, 0, 0),
        ASLZero  => shape(ASL, ZeroPage, 2, 5, 0, 0),
        ASLZeroX => shape(ASL, ZeroPageX, 2, 6, 0, 0),
        ASLAbs   => shape(ASL, Absolute, 3, 6, 0, 0),
        ASLAbsX  => shape(ASL, AbsoluteX, 3, 7, 0, 0),

        BCCRel   => shape(BCC, Relative, 2, 2, 1, 1),

        BCSRel   => shape(BCS, Relative, 2, 2, 1, 1),

        BEQRel   => shape(BEQ, Relative, 2, 2, 1, 1),

        BITZero  => shape(BIT, ZeroPage, 2, 3, 0, 0),
        BITAbs   => shape(BIT, Absolute, 3, 4, 0, 0),

        BMIRel   => shape(BMI, Relative, 2, 2, 1, 1),

        BNERel   => shape(BNE, Relative, 2, 2, 1, 1),

        BPLRel   => shape(BPL, Relative, 2, 2, 1, 1),

        BRKImpl  => shape(BRK, Implied, 1, 7, 0, 0),

        BVCRel   => shape(BVC, Relative, 2, 2, 1, 1),

        BVSRel   => shape(BVS, Relative, 2, 2, 1, 1),

        CLCImpl  => shape(CLC, Implied, 1, 2, 0, 0),

        CLDImpl  => shape(CLD, Implied, 1, 2, 0, 0),

        CLIImpl  => shape(CLI, Implied, 1, 2, 0, 0),

        CLVImpl  => shape(CLV, Implied, 1, 2, 0, 0),

        CMPImm   => shape(CMP, Immediate, 2, 2, 0, 0),
        CMPZero  => shape(CMP, ZeroPage, 2, 3, 0, 0),
        CMPZeroX => shape(CMP, ZeroPageX, 2, 4, 0, 0),
        CMPAbs   => shape(CMP, Absolute, 3, 4, 0, 0),
        CMPAbsX  => shape(CMP, AbsoluteX, 3, 4, 1, 0),
        CMPAbsY  => shape(CMP, AbsoluteY, 3, 4, 1, 0),
        CMPIndX  => shape(CMP, IndirectX, 2, 6, 0, 0),
        CMPIndY  => shape(CMP, IndirectY, 2, 5, 1, 0),

        CPXImm   => shape(CPX, Immediate, 2, 2, 0, 0),
        CPXZero  => shape(CPX, ZeroPage, 2, 3, 0, 0),
        CPXAbs   => shape(CPX, Absolute, 3, 4, 0, 0),

        CPYImm   => shape(CPY, Immediate, 2, 2, 0, 0),
        CPYZero  => shape(CPY, ZeroPage, 2, 3, 0, 0),
        CPYAbs   => shape(CPY, Absolute, 3, 4, 0, 0),

        DECZero  => shape(DEC, ZeroPage, 2, 5, 0, 0),
        DECZeroX => shape(DEC, ZeroPageX, 2, 6, 0, 0),
        DECAbs   => shape(DEC, Absolute, 3, 6, 0, 0),
        DECAbsX  => shape(DEC, AbsoluteX, 3, 7, 0, 0),

        DEXImpl  => shape(DEX, Implied, 1, 2, 0, 0),

        DEYImpl  => shape(DEY, Implied, 1, 2, 0, 0),

        EORImm   => shape(EOR, Immediate, 2, 2, 0, 0),
        EORZero  => shape(EOR, ZeroPage, 2, 3, 0, 0),
        EORZeroX => shape(EOR, ZeroPageX, 2, 4, 0, 0),
        EORAbs   => shape(EOR, Absolute, 3, 4, 0, 0),
        EORAbsX  => shape(EOR, AbsoluteX, 3, 4, 1, 0),
        EORAbsY  => shape(EOR, AbsoluteY, 3, 4, 1, 0),
        EORIndX  => shape(EOR, IndirectX, 2, 6, 0, 0),
        EORIndY  => shape(EOR, IndirectY, 2, 5, 1, 0),

        INCZero  => shape(INC, ZeroPage, 2, 5, 0, 0),
        INCZeroX => shape(INC, ZeroPageX, 2, 6, 0, 0),
        INCAbs   => shape(INC, Absolute, 3, 6, 0, 0),
        INCAbsX  => shape(INC, AbsoluteX, 3, 7, 0, 0),

        INXImpl  => shape(INX, Implied, 1, 2, 0, 0),

        INYImpl  => shape(INY, Implied, 1, 2, 0, 0),

        JMPAbs   => shape(JMP, Absolute, 3, 3, 0, 0),
        JMPInd   => shape(JMP, Indirect, 3, 5, 0, 0),

        JSRAbs   => shape(JSR, Absolute, 3, 6, 0, 0),

        LDAImm   => shape(LDA, Immediate, 2, 2, 0, 0),
        LDAZero  => shape(LDA, ZeroPage, 2, 3, 0, 0),
        LDAZeroX => shape(LDA, ZeroPageX, 2, 4, 0, 0),
        LDAAbs   => shape(LDA, Absolute, 3, 4, 0, 0),
        LDAAbsX  => shape(LDA, AbsoluteX, 3, 4, 1, 0),
        LDAAbsY  => shape(LDA, AbsoluteY, 3, 4, 1, 0),
        LDAIndX  => shape(LDA, IndirectX, 2, 6, 0, 0),
        LDAIndY  => shape(LDA, IndirectY, 2, 5, 1, 0),

        LDXImm   => shape(LDX, Immediate, 2, 2, 0, 0),
        LDXZero  => shape(LDX, ZeroPage, 2, 3, 0, 0),
        LDXZeroY => shape(LDX, ZeroPageY, 2, 4, 0, 0),
        LDXAbs   => shape(LDX, Absolute, 3, 4, 0, 0),
        LDXAbsY  => shape(LDX, AbsoluteY, 3, 4, 1, 0),

        LDYImm   => shape(LDY, Immediate, 2, 2, 0, 0),
        LDYZero  => shape(LDY, ZeroPage, 2, 3, 0, 0),
        LDYZeroX => shape(LDY, ZeroPageX, 2, 4, 0, 0),
        LDYAbs   => shape(LDY, Absolute, 3, 4, 0, 0),
        LDYAbsX  => shape(LDY, AbsoluteX, 3, 4, 1, 0),

        LSRAcc   => shape(LSR, Accumulator, 1, 2, 0, 0),
        LSRZero  => shape(LSR, ZeroPage, 2, 5, 0, 0),
        LSRZeroX => shape(LSR, ZeroPageX, 2, 6, 0, 0),
        LSRAbs   => shape(LSR, Absolute, 3, 6, 0, 0),
        LSRAbsX  => shape(LSR, AbsoluteX, 3, 7, 0, 0),

        NOPImpl  => shape(NOP, Implied, 1, 2, 0, 0),

        ORAImm   => shape(ORA, Immediate, 2, 2, 0, 0),
        ORAZero  => shape(ORA, ZeroPage, 2, 3, 0, 0),
        ORAZeroX => shape(ORA, ZeroPageX, 2, 4, 0, 0),
        ORAAbs   => shape(ORA, Absolute, 3, 4, 0, 0),
        ORAAbsX  => shape(ORA, AbsoluteX, 3, 4, 1, 0),
        ORAAbsY  => shape(ORA, AbsoluteY, 3, 4, 1, 0),
        ORAIndX  => shape(ORA, IndirectX, 2, 6, 0, 0),
        ORAIndY  => shape(ORA, IndirectY, 2, 5, 1, 0),

        PHAImpl  => shape(PHA, Implied, 1, 3, 0, 0),

        PHPImpl  => shape(PHP, Implied, 1, 3, 0, 0),

        PLAImpl  => shape(PLA, Implied, 1, 4, 0, 0),

        PLPImpl  => shape(PLP, Implied, 1, 4, 0, 0),

        ROLAcc   => shape(ROL, Accumulator, 1, 2, 0, 0),
        ROLZero  => shape(ROL, ZeroPage, 2, 5, 0, 0),
        ROLZeroX => shape(ROL, ZeroPageX, 2, 6, 0, 0),
        ROLAbs   => shape(ROL, Absolute, 3, 6, 0, 0),
        ROLAbsX  => shape(ROL, AbsoluteX, 3, 7, 0, 0),

        RORAcc   => shape(ROR, Accumulator, 1, 2, 0, 0),
        RORZero  => shape(ROR, ZeroPage, 2, 5, 0, 0),
        RORZeroX => shape(ROR, ZeroPageX, 2, 6, 0, 0),
        RORAbs   => shape(ROR, Absolute, 3, 6, 0, 0),
        RORAbsX  => shape(ROR, AbsoluteX, 3, 7, 0, 0),

        RTIImpl  => shape(RTI, Implied, 1, 6, 0, 0),

        RTSImpl  => shape(RTS, Implied, 1, 6, 0, 0),

        SBCImm   => shape(SBC, Immediate, 2, 2, 0, 0),
        SBCZero  => shape(SBC, ZeroPage, 2, 3, 0, 0),
        SBCZeroX => shape(SBC, ZeroPageX, 2, 4, 0, 0),
        SBCAbs   => shape(SBC, Absolute, 3, 4, 0, 0),
        SBCAbsX  => shape(SBC, AbsoluteX, 3, 4, 1, 0),
        SBCAbsY  => shape(SBC, AbsoluteY, 3, 4, 1, 0),
        SBCIndX  => shape(SBC, IndirectX, 2, 6, 0, 0),
        SBCIndY  => shape(SBC, IndirectY, 2, 5, 1, 0),

        SECImpl  => shape(SEC, Implied, 1, 2, 0, 0),

        SEDImpl  => shape(SED, Implied, 1, 2, 0, 0),

        SEIImpl  => shape(SEI, Implied, 1, 2, 0, 0),

        STAZero  => shape(STA, ZeroPage, 2, 3, 0, 0),
        STAZeroX => shape(STA, ZeroPageX, 2, 4, 0, 0),
        STAAbs   => shape(STA, Absolute, 3, 4, 0, 0),
        STAAbsX  => shape(STA, AbsoluteX, 3, 5, 0, 0),
        STAAbsY  => shape(STA, AbsoluteY, 3, 5, 0, 0),
        STAIndX  => shape(STA, IndirectX, 2, 6, 0, 0),
        STAIndY  => shape(STA, IndirectY, 2, 6, 0, 0),

        STXZero  => shape(STX, ZeroPage, 2, 3, 0, 0),
        STXZeroY => shape(STX, ZeroPageY, 2, 4, 0, 0),
        STXAbs   => shape(STX, Absolute, 3, 4, 0, 0),

        STYZero  => shape(STY, ZeroPage, 2, 3, 0, 0),
        STYZeroX => shape(STY, ZeroPageX, 2, 4, 0, 0),
        STYAbs   => shape(STY, Absolute, 3, 4, 0, 0),

        TAXImpl  => shape(TAX, Implied, 1, 2, 0, 0),

        TAYImpl  => shape(TAY, Implied, 1, 2, 0, 0),

        TSXImpl  => shape(TSX, Implied, 1, 2, 0, 0),

        TXAImpl  => shape(TXA, Implied, 1, 2, 0, 0),

        TXSImpl  => shape(TXS, Implied, 1, 2, 0, 0),

        TYAImpl  => shape(TYA, Implied, 1, 2, 0, 0),
        }
    }
}

/// Decodes an opcode by converting an opcode number to an enum value. Bytes
/// that name no documented opcode yield `None`.
pub fn decode_opcode(opcode: u8) -> Option<Opcode> {
    Opcode::from_u8(opcode)
}

/// Classifies any byte into an instruction shape. Undocumented opcodes run as
/// a single byte `NOP`.
pub fn classify(opcode: u8) -> InstructionShape {
    match decode_opcode(opcode) {
        Some(opcode) => opcode.shape(),
        None => NOP_SHAPE,
    }
}
