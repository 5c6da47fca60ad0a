// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::utils::arithmetic;
use std::fmt;

// Flag constants that allow easy bitwise getting and setting of flag values.
pub const CARRY_FLAG       : u8 = 0x1;
pub const ZERO_FLAG        : u8 = 0x2;
pub const INTERRUPT_DISABLE: u8 = 0x4;
pub const DECIMAL_MODE     : u8 = 0x8;
pub const BREAK_COMMAND    : u8 = 0x10;
pub const OVERFLOW_FLAG    : u8 = 0x40;
pub const NEGATIVE_FLAG    : u8 = 0x80;

// Power-on register values. Bit 5 of the status register has no flag behind it
// but reads back as set.
pub const RESET_STACK_POINTER: u8 = 0xFD;
pub const RESET_STATUS       : u8 = 0x34;

/// This is an implementation of 2A03 processor used in the NES. The 2A03 is
/// based off the 6502 processor with some minor changes such as having no
/// binary-coded decimal mode.
///
/// Every register wraps on overflow exactly like the hardware: 8-bit
/// registers modulo 256 and the program counter modulo 65536.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CPU {
    // The program counter is a 16-bit register which points to the
    // instruction being executed. Only control flow instructions (jumps,
    // branches, subroutine calls and returns, interrupts) modify it.
    pub pc: u16,

    // The processor supports a 256 byte stack located between $0100 and $01FF.
    // The stack pointer is an 8-bit register and holds the next free location
    // on the stack. The location of the stack is fixed and cannot be moved and
    // grows downwards.
    pub sp: u8,

    // The 8-bit accumulator is used all arithmetic and logical operations (with
    // the exception of increments and decrements). The contents of the
    // accumulator can be stored and retrieved either from memory or the stack.
    pub a: u8,

    // The 8-bit X register can be used to control information, compare values
    // in memory, and be incremented or decremented. The X register is special
    // as it can be used to get a copy of the stack pointer or change its value.
    pub x: u8,

    // The 8-bit Y register like X, can be used to manage information and be
    // incremented or decremented; however it doesn't have any special functions
    // like the X register does.
    pub y: u8,

    // The Processor Status register contains a list of flags that are set and
    // cleared by instructions to record the results of operations. The bit
    // layout is the one pushed by PHP and BRK:
    //
    //   7 6 5 4 3 2 1 0
    //   N V - B D I Z C
    //
    // The decimal flag can be set and cleared but has no effect on the 2A03.
    pub p: u8,

    // The amount of cycles accumulated since power-on. Different instructions
    // take a different amount of cycles to complete depending on their
    // complexity and on page crossings.
    pub cycles: u64,
}

impl CPU {
    pub fn new() -> CPU {
        CPU {
            pc: 0,
            sp: RESET_STACK_POINTER,
            a: 0,
            x: 0,
            y: 0,
            p: RESET_STATUS,
            cycles: 0,
        }
    }

    /// Returns true if every bit of the given flag mask is set.
    #[inline(always)]
    pub fn flag(&self, flag: u8) -> bool {
        self.p & flag == flag
    }

    /// Sets or clears the bits of the given flag mask.
    #[inline(always)]
    pub fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.p |= flag;
        } else {
            self.p &= !flag;
        }
    }

    /// Sets the carry flag in the status register.
    #[inline(always)]
    pub fn set_carry_flag(&mut self) {
        self.p |= CARRY_FLAG;
    }

    /// Sets the interrupt disable flag in the status register.
    #[inline(always)]
    pub fn set_interrupt_disable(&mut self) {
        self.p |= INTERRUPT_DISABLE;
    }

    /// Sets the decimal mode flag in the status register.
    /// NOTE: This flag is disabled in the 2A03 variation of the 6502.
    #[inline(always)]
    pub fn set_decimal_mode(&mut self) {
        self.p |= DECIMAL_MODE;
    }

    /// Sets the break command flag in the status register.
    #[inline(always)]
    pub fn set_break_command(&mut self) {
        self.p |= BREAK_COMMAND;
    }

    /// Unsets the carry flag in the status register.
    #[inline(always)]
    pub fn unset_carry_flag(&mut self) {
        self.p &= !CARRY_FLAG;
    }

    /// Unsets the interrupt disable flag in the status register.
    #[inline(always)]
    pub fn unset_interrupt_disable(&mut self) {
        self.p &= !INTERRUPT_DISABLE;
    }

    /// Unsets the decimal mode flag in the status register.
    /// NOTE: This flag is disabled in the 2A03 variation of the 6502.
    #[inline(always)]
    pub fn unset_decimal_mode(&mut self) {
        self.p &= !DECIMAL_MODE;
    }

    /// Unsets the overflow flag in the status register.
    #[inline(always)]
    pub fn unset_overflow_flag(&mut self) {
        self.p &= !OVERFLOW_FLAG;
    }

    #[inline(always)]
    pub fn carry_flag_set(&self) -> bool {
        self.flag(CARRY_FLAG)
    }

    #[inline(always)]
    pub fn zero_flag_set(&self) -> bool {
        self.flag(ZERO_FLAG)
    }

    #[inline(always)]
    pub fn interrupt_disable_set(&self) -> bool {
        self.flag(INTERRUPT_DISABLE)
    }

    #[inline(always)]
    pub fn decimal_mode_set(&self) -> bool {
        self.flag(DECIMAL_MODE)
    }

    #[inline(always)]
    pub fn break_command_set(&self) -> bool {
        self.flag(BREAK_COMMAND)
    }

    #[inline(always)]
    pub fn overflow_flag_set(&self) -> bool {
        self.flag(OVERFLOW_FLAG)
    }

    #[inline(always)]
    pub fn negative_flag_set(&self) -> bool {
        self.flag(NEGATIVE_FLAG)
    }

    /// Sets the carry flag if the passed overflow is true, otherwise the flag
    /// is unset.
    #[inline(always)]
    pub fn toggle_carry_flag(&mut self, overflow: bool) {
        self.set_flag(CARRY_FLAG, overflow);
    }

    /// Sets the overflow flag on a signed (two's complement) overflow.
    #[inline(always)]
    pub fn toggle_overflow_flag(&mut self, overflow: bool) {
        self.set_flag(OVERFLOW_FLAG, overflow);
    }

    /// Sets the zero flag if the value passed (typically a reference to a
    /// register) if the value is zero, otherwise it's unset.
    #[inline(always)]
    pub fn toggle_zero_flag(&mut self, value: u8) {
        self.set_flag(ZERO_FLAG, value == 0);
    }

    /// Sets the negative flag if the value passed (typically a reference to a
    /// register) if the value is negative, otherwise it's unset.
    #[inline(always)]
    pub fn toggle_negative_flag(&mut self, value: u8) {
        self.set_flag(NEGATIVE_FLAG, arithmetic::is_negative(value));
    }

    /// The common case of updating the zero and negative flags from a result.
    #[inline(always)]
    pub fn update_zero_negative(&mut self, value: u8) {
        self.toggle_zero_flag(value);
        self.toggle_negative_flag(value);
    }

    /// Returns "SET" if the passed boolean is true, otherwise "UNSET". This
    /// function is used to display flags when the CPU crashes.
    fn fmt_flag(flag: bool) -> &'static str {
        if flag { "SET" } else { "UNSET" }
    }
}

impl Default for CPU {
    fn default() -> CPU {
        CPU::new()
    }
}

impl fmt::Display for CPU {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\nCPU Crash State:")?;
        writeln!(f, "    Program Counter: {:#X}", self.pc)?;
        writeln!(f, "    Stack Pointer:   {:#X}", self.sp)?;
        writeln!(f, "    Accumulator:     {:#X}", self.a)?;
        writeln!(f, "    X Register:      {:#X}", self.x)?;
        writeln!(f, "    Y Register:      {:#X}", self.y)?;
        writeln!(f, "    Cycles:          {}", self.cycles)?;
        writeln!(f)?;
        writeln!(f, "Status Register: {:#X}", self.p)?;
        writeln!(f, "    Carry Flag:        {}", CPU::fmt_flag(self.carry_flag_set()))?;
        writeln!(f, "    Zero Flag:         {}", CPU::fmt_flag(self.zero_flag_set()))?;
        writeln!(f, "    Interrupt Disable: {}", CPU::fmt_flag(self.interrupt_disable_set()))?;
        writeln!(f, "    Decimal Mode:      {}", CPU::fmt_flag(self.decimal_mode_set()))?;
        writeln!(f, "    Break Command:     {}", CPU::fmt_flag(self.break_command_set()))?;
        writeln!(f, "    Overflow Flag:     {}", CPU::fmt_flag(self.overflow_flag_set()))?;
        writeln!(f, "    Negative Flag:     {}", CPU::fmt_flag(self.negative_flag_set()))
    }
}
