// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Instruction semantics. `step` resolves an instruction's operand, runs the
//! handler for its operation and reports how many cycles it took.

use crate::io::errors::ExecError;
use crate::nes::cpu::{CPU, CARRY_FLAG, NEGATIVE_FLAG, OVERFLOW_FLAG, ZERO_FLAG};
use crate::nes::instruction::{Instruction, Operand};
use crate::nes::memory::Memory;
use crate::nes::opcode::AddressingMode;
use crate::utils::{arithmetic, paging};

// BRK jumps to the IRQ/BRK vector address itself.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Per-execution state of an instruction: the resolved operand and whichever
/// bonus cycles survived this pass. Built fresh by every `step`.
struct Execution<'a> {
    instr: &'a Instruction,
    operand: Operand,
    page_cross_cycles: u8,
    branch_cycles: u8,
}

impl<'a> Execution<'a> {
    fn new(instr: &'a Instruction, operand: Operand) -> Execution<'a> {
        let page_cross_cycles = match operand.page_crossed {
            Some(false) => 0,
            _ => instr.page_cross_cycles,
        };

        let branch_cycles = if instr.operation.is_branch() {
            instr.branch_cycles
        } else {
            0
        };

        Execution {
            instr,
            operand,
            page_cross_cycles,
            branch_cycles,
        }
    }

    /// Effective address of the operand. Operations that write memory fail
    /// here when paired with a mode that names no address.
    fn address(&self) -> Result<u16, ExecError> {
        self.operand.address.ok_or(ExecError::InvalidAddressingMode {
            operation: self.instr.operation,
            mode: self.instr.mode,
        })
    }

    fn invalid_mode(&self) -> ExecError {
        ExecError::InvalidAddressingMode {
            operation: self.instr.operation,
            mode: self.instr.mode,
        }
    }

    fn cycles(&self) -> u8 {
        self.instr.cycles + self.page_cross_cycles + self.branch_cycles
    }
}

/// Executes a single decoded instruction and returns the cycles it consumed:
/// the base cost plus any page-cross or branch-taken bonus that applied.
///
/// The program counter is expected to hold the address of `instr`. It is only
/// changed by control flow; moving on to the next instruction is up to the
/// caller. On error nothing has been modified.
pub fn step(cpu: &mut CPU, memory: &mut Memory, instr: &Instruction) -> Result<u8, ExecError> {
    let operand = instr.resolve(cpu, memory)?;
    let mut exec = Execution::new(instr, operand);
    dispatch(cpu, memory, &mut exec)?;
    Ok(exec.cycles())
}

fn dispatch(cpu: &mut CPU, memory: &mut Memory, exec: &mut Execution) -> Result<(), ExecError> {
    use crate::nes::opcode::Operation::*;

    let value = exec.operand.value;

    match exec.instr.operation {
        NOP => {},

        // Arithmetic and logic.
        ADC => add_with_carry(cpu, value),
        SBC => add_with_carry(cpu, !value),
        AND => {
            cpu.a &= value;
            cpu.update_zero_negative(cpu.a);
        },
        EOR => {
            cpu.a ^= value;
            cpu.update_zero_negative(cpu.a);
        },
        ORA => {
            cpu.a |= value;
            cpu.update_zero_negative(cpu.a);
        },
        BIT => {
            let result = cpu.a & value;
            cpu.set_flag(ZERO_FLAG, result == 0);
            cpu.set_flag(OVERFLOW_FLAG, arithmetic::bit_set(result, 6));
            cpu.set_flag(NEGATIVE_FLAG, arithmetic::bit_set(result, 7));
        },
        CMP => { let a = cpu.a; compare(cpu, a, value) },
        CPX => { let x = cpu.x; compare(cpu, x, value) },
        CPY => { let y = cpu.y; compare(cpu, y, value) },

        // Shifts and rotates never pay for page crossings.
        ASL => modify(cpu, memory, exec, |cpu, v| {
            cpu.toggle_carry_flag(arithmetic::bit_set(v, 7));
            v << 1
        })?,
        LSR => modify(cpu, memory, exec, |cpu, v| {
            cpu.toggle_carry_flag(arithmetic::bit_set(v, 0));
            v >> 1
        })?,
        ROL => modify(cpu, memory, exec, |cpu, v| {
            let carry_in = cpu.carry_flag_set() as u8;
            cpu.toggle_carry_flag(arithmetic::bit_set(v, 7));
            (v << 1) | carry_in
        })?,
        ROR => modify(cpu, memory, exec, |cpu, v| {
            let carry_in = cpu.carry_flag_set() as u8;
            cpu.toggle_carry_flag(arithmetic::bit_set(v, 0));
            (v >> 1) | (carry_in << 7)
        })?,

        // Increments and decrements.
        INC => modify_memory(memory, cpu, exec, |v| v.wrapping_add(1))?,
        DEC => modify_memory(memory, cpu, exec, |v| v.wrapping_sub(1))?,
        INX => {
            cpu.x = cpu.x.wrapping_add(1);
            cpu.update_zero_negative(cpu.x);
        },
        INY => {
            cpu.y = cpu.y.wrapping_add(1);
            cpu.update_zero_negative(cpu.y);
        },
        DEX => {
            cpu.x = cpu.x.wrapping_sub(1);
            cpu.update_zero_negative(cpu.x);
        },
        DEY => {
            cpu.y = cpu.y.wrapping_sub(1);
            cpu.update_zero_negative(cpu.y);
        },

        // Branches.
        BCC => { let c = !cpu.carry_flag_set(); branch(cpu, exec, c) },
        BCS => { let c = cpu.carry_flag_set(); branch(cpu, exec, c) },
        BEQ => { let c = cpu.zero_flag_set(); branch(cpu, exec, c) },
        BNE => { let c = !cpu.zero_flag_set(); branch(cpu, exec, c) },
        BMI => { let c = cpu.negative_flag_set(); branch(cpu, exec, c) },
        BPL => { let c = !cpu.negative_flag_set(); branch(cpu, exec, c) },
        BVC => { let c = !cpu.overflow_flag_set(); branch(cpu, exec, c) },
        BVS => { let c = cpu.overflow_flag_set(); branch(cpu, exec, c) },

        // Jumps, subroutines and interrupts.
        JMP => {
            cpu.pc = match exec.instr.mode {
                AddressingMode::Absolute => exec.address()?,
                AddressingMode::Indirect => memory.read_u16_wrapped_msb(exec.address()?),
                _ => return Err(exec.invalid_mode()),
            };
        },
        JSR => {
            let target = exec.address()?;
            let return_addr = cpu.pc.wrapping_add(exec.instr.size as u16);
            memory.stack_push_u16(cpu, return_addr.wrapping_sub(1));
            cpu.pc = target;
        },
        RTS => {
            cpu.pc = memory.stack_pop_u16(cpu);
        },
        BRK => {
            let (pc, p) = (cpu.pc, cpu.p);
            memory.stack_push_u16(cpu, pc);
            memory.stack_push_u8(cpu, p);
            cpu.pc = IRQ_VECTOR;
            cpu.set_break_command();
        },
        RTI => {
            cpu.p = memory.stack_pop_u8(cpu);
            cpu.pc = memory.stack_pop_u16(cpu);
        },

        // Stack.
        PHA => { let a = cpu.a; memory.stack_push_u8(cpu, a) },
        PHP => { let p = cpu.p; memory.stack_push_u8(cpu, p) },
        PLA => {
            cpu.a = memory.stack_pop_u8(cpu);
            cpu.update_zero_negative(cpu.a);
        },
        PLP => {
            cpu.p = memory.stack_pop_u8(cpu);
        },

        // Loads and stores.
        LDA => {
            cpu.a = value;
            cpu.update_zero_negative(value);
        },
        LDX => {
            cpu.x = value;
            cpu.update_zero_negative(value);
        },
        LDY => {
            cpu.y = value;
            cpu.update_zero_negative(value);
        },
        STA => memory.write_u8(exec.address()?, cpu.a),
        STX => memory.write_u8(exec.address()?, cpu.x),
        STY => memory.write_u8(exec.address()?, cpu.y),

        // Register transfers. TXS is the only one leaving the flags alone.
        TAX => {
            cpu.x = cpu.a;
            cpu.update_zero_negative(cpu.x);
        },
        TAY => {
            cpu.y = cpu.a;
            cpu.update_zero_negative(cpu.y);
        },
        TSX => {
            cpu.x = cpu.sp;
            cpu.update_zero_negative(cpu.x);
        },
        TXA => {
            cpu.a = cpu.x;
            cpu.update_zero_negative(cpu.a);
        },
        TYA => {
            cpu.a = cpu.y;
            cpu.update_zero_negative(cpu.a);
        },
        TXS => cpu.sp = cpu.x,

        // Flags.
        CLC => cpu.unset_carry_flag(),
        CLD => cpu.unset_decimal_mode(),
        CLI => cpu.unset_interrupt_disable(),
        CLV => cpu.unset_overflow_flag(),
        SEC => cpu.set_carry_flag(),
        SED => cpu.set_decimal_mode(),
        SEI => cpu.set_interrupt_disable(),
    }

    Ok(())
}

/// Binary addition of the operand and carry into the accumulator. SBC runs
/// through here with the operand's one's complement, which yields the
/// subtraction with borrow = !carry.
fn add_with_carry(cpu: &mut CPU, value: u8) {
    let sum = cpu.a as u16 + value as u16 + cpu.carry_flag_set() as u16;
    let result = sum as u8;

    cpu.toggle_carry_flag(sum > 0xFF);
    cpu.toggle_overflow_flag((cpu.a ^ result) & (value ^ result) & 0x80 != 0);
    cpu.a = result;
    cpu.update_zero_negative(result);
}

fn compare(cpu: &mut CPU, register: u8, value: u8) {
    cpu.set_flag(CARRY_FLAG, register >= value);
    cpu.set_flag(ZERO_FLAG, register == value);
    cpu.set_flag(NEGATIVE_FLAG, arithmetic::is_negative(register.wrapping_sub(value)));
}

/// Takes the branch when `condition` holds. The displacement is relative to
/// the instruction following the branch. The branch bonus only survives a
/// taken branch and the page-cross bonus only a taken branch whose target
/// lies in another page than that following instruction.
fn branch(cpu: &mut CPU, exec: &mut Execution, condition: bool) {
    if !condition {
        exec.branch_cycles = 0;
        exec.page_cross_cycles = 0;
        return;
    }

    let next = cpu.pc.wrapping_add(exec.instr.size as u16);
    cpu.pc = arithmetic::add_relative(next, exec.operand.value as i8);

    if !paging::page_crossed(next, cpu.pc) {
        exec.page_cross_cycles = 0;
    }
}

/// Read-modify-write on either the accumulator or memory. Updates zero and
/// negative from the result.
fn modify<F>(cpu: &mut CPU, memory: &mut Memory, exec: &mut Execution, f: F) -> Result<(), ExecError>
    where F: FnOnce(&mut CPU, u8) -> u8
{
    exec.page_cross_cycles = 0;

    if exec.instr.mode == AddressingMode::Accumulator {
        let a = cpu.a;
        let result = f(cpu, a);
        cpu.a = result;
        cpu.update_zero_negative(result);
    } else {
        let addr = exec.address()?;
        let result = f(cpu, exec.operand.value);
        memory.write_u8(addr, result);
        cpu.update_zero_negative(result);
    }

    Ok(())
}

/// Read-modify-write that only exists in a memory form (INC, DEC).
fn modify_memory<F>(memory: &mut Memory, cpu: &mut CPU, exec: &mut Execution, f: F) -> Result<(), ExecError>
    where F: FnOnce(u8) -> u8
{
    exec.page_cross_cycles = 0;

    let addr = exec.address()?;
    let result = f(exec.operand.value);
    memory.write_u8(addr, result);
    cpu.update_zero_negative(result);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nes::cpu::{BREAK_COMMAND, INTERRUPT_DISABLE, DECIMAL_MODE};
    use crate::nes::opcode::Operation;

    fn machine() -> (CPU, Memory) {
        let mut cpu = CPU::new();
        cpu.p = 0;
        (cpu, Memory::new())
    }

    fn run(cpu: &mut CPU, memory: &mut Memory, bytes: &[u8]) -> u8 {
        let instr = Instruction::decode(bytes).unwrap();
        step(cpu, memory, &instr).unwrap()
    }

    #[test]
    fn adc_signed_overflow() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x50;
        run(&mut cpu, &mut memory, &[0x69, 0x50]);
        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.overflow_flag_set());
        assert!(!cpu.carry_flag_set());
        assert!(cpu.negative_flag_set());
        assert!(!cpu.zero_flag_set());
    }

    #[test]
    fn adc_carry_out_and_carry_in() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0xFF;
        cpu.set_carry_flag();
        run(&mut cpu, &mut memory, &[0x69, 0x01]);
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.carry_flag_set());
        assert!(!cpu.overflow_flag_set());

        cpu.a = 0xFF;
        cpu.unset_carry_flag();
        run(&mut cpu, &mut memory, &[0x69, 0x01]);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.carry_flag_set());
        assert!(cpu.zero_flag_set());
    }

    #[test]
    fn sbc_without_borrow() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x50;
        cpu.set_carry_flag();
        run(&mut cpu, &mut memory, &[0xE9, 0x10]);
        assert_eq!(cpu.a, 0x40);
        assert!(cpu.carry_flag_set());
        assert!(!cpu.overflow_flag_set());
    }

    #[test]
    fn sbc_borrow_clears_carry() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x10;
        cpu.set_carry_flag();
        run(&mut cpu, &mut memory, &[0xE9, 0x20]);
        assert_eq!(cpu.a, 0xF0);
        assert!(!cpu.carry_flag_set());
        assert!(cpu.negative_flag_set());

        // With carry clear one extra is subtracted.
        cpu.a = 0x10;
        cpu.unset_carry_flag();
        run(&mut cpu, &mut memory, &[0xE9, 0x0F]);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.carry_flag_set());
        assert!(cpu.zero_flag_set());
    }

    #[test]
    fn sbc_signed_overflow() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x80;
        cpu.set_carry_flag();
        run(&mut cpu, &mut memory, &[0xE9, 0x01]);
        assert_eq!(cpu.a, 0x7F);
        assert!(cpu.overflow_flag_set());
        assert!(cpu.carry_flag_set());
    }

    #[test]
    fn logic_ops() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0b1100_1100;
        run(&mut cpu, &mut memory, &[0x29, 0b1010_1010]);
        assert_eq!(cpu.a, 0b1000_1000);
        assert!(cpu.negative_flag_set());

        run(&mut cpu, &mut memory, &[0x49, 0b1000_1000]);
        assert_eq!(cpu.a, 0);
        assert!(cpu.zero_flag_set());

        run(&mut cpu, &mut memory, &[0x09, 0x01]);
        assert_eq!(cpu.a, 0x01);
        assert!(!cpu.zero_flag_set());
        assert!(!cpu.negative_flag_set());
    }

    #[test]
    fn asl_accumulator_and_memory() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x81;
        run(&mut cpu, &mut memory, &[0x0A]);
        assert_eq!(cpu.a, 0x02);
        assert!(cpu.carry_flag_set());

        memory.write_u8(0x0010, 0x40);
        run(&mut cpu, &mut memory, &[0x06, 0x10]);
        assert_eq!(memory.read_u8(0x0010), 0x80);
        assert!(!cpu.carry_flag_set());
        assert!(cpu.negative_flag_set());
    }

    #[test]
    fn lsr_moves_bit_zero_into_carry() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x01;
        run(&mut cpu, &mut memory, &[0x4A]);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.carry_flag_set());
        assert!(cpu.zero_flag_set());
        assert!(!cpu.negative_flag_set());
    }

    #[test]
    fn rotates_use_carry() {
        let (mut cpu, mut memory) = machine();
        cpu.set_carry_flag();
        cpu.a = 0x80;
        run(&mut cpu, &mut memory, &[0x2A]);
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.carry_flag_set());

        memory.write_u8(0x0020, 0x02);
        run(&mut cpu, &mut memory, &[0x66, 0x20]);
        assert_eq!(memory.read_u8(0x0020), 0x81);
        assert!(!cpu.carry_flag_set());
        assert!(cpu.negative_flag_set());
    }

    #[test]
    fn read_modify_write_never_pays_page_cross() {
        let (mut cpu, mut memory) = machine();
        cpu.x = 1;
        assert_eq!(run(&mut cpu, &mut memory, &[0x1E, 0xFF, 0x01]), 7);
        assert_eq!(run(&mut cpu, &mut memory, &[0xFE, 0xFF, 0x01]), 7);
        assert_eq!(memory.read_u8(0x0200), 0x01);
    }

    #[test]
    fn bit_tests_masked_value() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0xC0;
        memory.write_u8(0x0010, 0xFF);
        run(&mut cpu, &mut memory, &[0x24, 0x10]);
        assert!(!cpu.zero_flag_set());
        assert!(cpu.overflow_flag_set());
        assert!(cpu.negative_flag_set());
        assert_eq!(cpu.a, 0xC0);

        cpu.a = 0x00;
        run(&mut cpu, &mut memory, &[0x24, 0x10]);
        assert!(cpu.zero_flag_set());
        assert!(!cpu.overflow_flag_set());
        assert!(!cpu.negative_flag_set());
    }

    #[test]
    fn compares_leave_register_alone() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x40;
        run(&mut cpu, &mut memory, &[0xC9, 0x40]);
        assert!(cpu.carry_flag_set() && cpu.zero_flag_set() && !cpu.negative_flag_set());

        cpu.x = 0x10;
        run(&mut cpu, &mut memory, &[0xE0, 0x20]);
        assert!(!cpu.carry_flag_set() && !cpu.zero_flag_set() && cpu.negative_flag_set());

        cpu.y = 0x30;
        run(&mut cpu, &mut memory, &[0xC0, 0x20]);
        assert!(cpu.carry_flag_set() && !cpu.zero_flag_set() && !cpu.negative_flag_set());
        assert_eq!((cpu.a, cpu.x, cpu.y), (0x40, 0x10, 0x30));
    }

    #[test]
    fn increments_wrap() {
        let (mut cpu, mut memory) = machine();
        memory.write_u8(0x0030, 0xFF);
        run(&mut cpu, &mut memory, &[0xE6, 0x30]);
        assert_eq!(memory.read_u8(0x0030), 0x00);
        assert!(cpu.zero_flag_set());

        run(&mut cpu, &mut memory, &[0xC6, 0x30]);
        assert_eq!(memory.read_u8(0x0030), 0xFF);
        assert!(cpu.negative_flag_set());

        cpu.x = 0xFF;
        run(&mut cpu, &mut memory, &[0xE8]);
        assert_eq!(cpu.x, 0);
        cpu.y = 0;
        run(&mut cpu, &mut memory, &[0x88]);
        assert_eq!(cpu.y, 0xFF);
        run(&mut cpu, &mut memory, &[0xC8]);
        assert_eq!(cpu.y, 0);
        run(&mut cpu, &mut memory, &[0xCA]);
        assert_eq!(cpu.x, 0xFF);
    }

    #[test]
    fn branch_cycle_accounting() {
        let (mut cpu, mut memory) = machine();
        let beq_near = Instruction::decode(&[0xF0, 0x10]).unwrap();

        cpu.pc = 0x0300;
        cpu.set_flag(ZERO_FLAG, false);
        assert_eq!(step(&mut cpu, &mut memory, &beq_near).unwrap(), 2);
        assert_eq!(cpu.pc, 0x0300);

        cpu.set_flag(ZERO_FLAG, true);
        assert_eq!(step(&mut cpu, &mut memory, &beq_near).unwrap(), 3);
        assert_eq!(cpu.pc, 0x0312);

        cpu.pc = 0x03F8;
        assert_eq!(step(&mut cpu, &mut memory, &beq_near).unwrap(), 4);
        assert_eq!(cpu.pc, 0x040A);
    }

    #[test]
    fn branch_backwards() {
        let (mut cpu, mut memory) = machine();
        cpu.pc = 0x0410;
        run(&mut cpu, &mut memory, &[0xD0, 0xFC]);
        assert_eq!(cpu.pc, 0x040E);

        cpu.pc = 0x0400;
        assert_eq!(run(&mut cpu, &mut memory, &[0xD0, 0xFC]), 4);
        assert_eq!(cpu.pc, 0x03FE);
    }

    #[test]
    fn branch_to_itself() {
        let (mut cpu, mut memory) = machine();
        cpu.pc = 0x0200;
        cpu.set_flag(ZERO_FLAG, false);
        assert_eq!(run(&mut cpu, &mut memory, &[0xD0, 0xFE]), 3);
        assert_eq!(cpu.pc, 0x0200);
    }

    #[test]
    fn branch_page_is_measured_from_next_instruction() {
        let (mut cpu, mut memory) = machine();
        let beq = Instruction::decode(&[0xF0, 0x02]).unwrap();
        cpu.set_flag(ZERO_FLAG, true);

        // The branch sits in page 2, but the following instruction and the
        // target are both in page 3.
        cpu.pc = 0x02FE;
        let cycles = step(&mut cpu, &mut memory, &beq).unwrap();
        assert_eq!((cpu.pc, cycles), (0x0302, 3));

        cpu.pc = 0x02FC;
        let cycles = step(&mut cpu, &mut memory, &beq).unwrap();
        assert_eq!((cpu.pc, cycles), (0x0300, 4));
    }

    #[test]
    fn branch_bonus_needs_a_branch() {
        let (mut cpu, mut memory) = machine();
        let mut nop = Instruction::decode(&[0xEA]).unwrap();
        nop.branch_cycles = 1;
        assert_eq!(step(&mut cpu, &mut memory, &nop).unwrap(), 2);
    }

    #[test]
    fn every_branch_condition() {
        let cases = [
            (0x90, CARRY_FLAG, false),
            (0xB0, CARRY_FLAG, true),
            (0xF0, ZERO_FLAG, true),
            (0xD0, ZERO_FLAG, false),
            (0x30, NEGATIVE_FLAG, true),
            (0x10, NEGATIVE_FLAG, false),
            (0x70, OVERFLOW_FLAG, true),
            (0x50, OVERFLOW_FLAG, false),
        ];
        for &(opcode, flag, taken_when_set) in cases.iter() {
            for &set in [false, true].iter() {
                let (mut cpu, mut memory) = machine();
                cpu.pc = 0x0200;
                cpu.set_flag(flag, set);
                run(&mut cpu, &mut memory, &[opcode, 0x04]);
                let expected = if set == taken_when_set { 0x0206 } else { 0x0200 };
                assert_eq!(cpu.pc, expected, "opcode {:#04X} flag set: {}", opcode, set);
            }
        }
    }

    #[test]
    fn jmp_absolute() {
        let (mut cpu, mut memory) = machine();
        assert_eq!(run(&mut cpu, &mut memory, &[0x4C, 0x34, 0x12]), 3);
        assert_eq!(cpu.pc, 0x1234);
    }

    #[test]
    fn jmp_indirect_page_wrap_bug() {
        let (mut cpu, mut memory) = machine();
        memory.write_u8(0x02FF, 0x80);
        memory.write_u8(0x0200, 0x12);
        memory.write_u8(0x0300, 0x34);
        run(&mut cpu, &mut memory, &[0x6C, 0xFF, 0x02]);
        assert_eq!(cpu.pc, 0x1280);

        memory.memdump(0x0250, &[0xCD, 0xAB]);
        run(&mut cpu, &mut memory, &[0x6C, 0x50, 0x02]);
        assert_eq!(cpu.pc, 0xABCD);
    }

    #[test]
    fn jsr_then_rts() {
        let (mut cpu, mut memory) = machine();
        cpu.pc = 0x8000;
        assert_eq!(run(&mut cpu, &mut memory, &[0x20, 0x00, 0x90]), 6);
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.sp, 0xFB);
        assert_eq!(memory.read_u8(0x01FC), 0x80);
        assert_eq!(memory.read_u8(0x01FD), 0x02);

        run(&mut cpu, &mut memory, &[0x60]);
        assert_eq!(cpu.pc, 0x8002);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    fn brk_then_rti_restores_state() {
        let (mut cpu, mut memory) = machine();
        cpu.pc = 0x0C31;
        cpu.p = CARRY_FLAG | NEGATIVE_FLAG;

        assert_eq!(run(&mut cpu, &mut memory, &[0x00]), 7);
        assert_eq!(cpu.pc, IRQ_VECTOR);
        assert!(cpu.break_command_set());
        assert_eq!(cpu.sp, 0xFA);

        run(&mut cpu, &mut memory, &[0x40]);
        assert_eq!(cpu.pc, 0x0C31);
        assert_eq!(cpu.p, CARRY_FLAG | NEGATIVE_FLAG);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    fn stack_transfers() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x80;
        run(&mut cpu, &mut memory, &[0x48]);
        cpu.a = 0;
        run(&mut cpu, &mut memory, &[0x68]);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.negative_flag_set());

        cpu.p = 0xC3;
        run(&mut cpu, &mut memory, &[0x08]);
        cpu.p = 0;
        run(&mut cpu, &mut memory, &[0x28]);
        assert_eq!(cpu.p, 0xC3);
    }

    #[test]
    fn plp_overwrites_status_verbatim() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x00;
        run(&mut cpu, &mut memory, &[0x48]);
        cpu.p = 0xFF;
        run(&mut cpu, &mut memory, &[0x28]);
        assert_eq!(cpu.p, 0x00);
    }

    #[test]
    fn loads_and_stores() {
        let (mut cpu, mut memory) = machine();
        run(&mut cpu, &mut memory, &[0xA9, 0x00]);
        assert!(cpu.zero_flag_set());
        run(&mut cpu, &mut memory, &[0xA2, 0x05]);
        run(&mut cpu, &mut memory, &[0xA0, 0x90]);
        assert!(cpu.negative_flag_set());

        cpu.a = 0x11;
        run(&mut cpu, &mut memory, &[0x9D, 0x00, 0x02]);
        assert_eq!(memory.read_u8(0x0205), 0x11);
        run(&mut cpu, &mut memory, &[0x86, 0x40]);
        assert_eq!(memory.read_u8(0x0040), 0x05);
        run(&mut cpu, &mut memory, &[0x8C, 0x00, 0x08]);
        assert_eq!(memory.read_u8(0x0000), 0x90);

        let flags = cpu.p;
        cpu.a = 0;
        run(&mut cpu, &mut memory, &[0x85, 0x41]);
        assert_eq!(cpu.p, flags);
    }

    #[test]
    fn load_page_cross_bonus() {
        let (mut cpu, mut memory) = machine();
        cpu.y = 0x01;
        assert_eq!(run(&mut cpu, &mut memory, &[0xB9, 0xFF, 0x01]), 5);
        assert_eq!(run(&mut cpu, &mut memory, &[0xB9, 0x00, 0x01]), 4);
        // Stores have the extra cycle in their base cost.
        assert_eq!(run(&mut cpu, &mut memory, &[0x99, 0xFF, 0x01]), 5);
    }

    #[test]
    fn register_transfers() {
        let (mut cpu, mut memory) = machine();
        cpu.a = 0x80;
        run(&mut cpu, &mut memory, &[0xAA]);
        assert_eq!(cpu.x, 0x80);
        assert!(cpu.negative_flag_set());
        run(&mut cpu, &mut memory, &[0xA8]);
        assert_eq!(cpu.y, 0x80);

        cpu.x = 0x00;
        let flags = cpu.p;
        run(&mut cpu, &mut memory, &[0x9A]);
        assert_eq!(cpu.sp, 0x00);
        assert_eq!(cpu.p, flags);

        cpu.sp = 0x00;
        run(&mut cpu, &mut memory, &[0xBA]);
        assert_eq!(cpu.x, 0);
        assert!(cpu.zero_flag_set());

        cpu.x = 0x7F;
        run(&mut cpu, &mut memory, &[0x8A]);
        assert_eq!(cpu.a, 0x7F);
        cpu.y = 0x01;
        run(&mut cpu, &mut memory, &[0x98]);
        assert_eq!(cpu.a, 0x01);
    }

    #[test]
    fn flag_instructions() {
        let (mut cpu, mut memory) = machine();
        run(&mut cpu, &mut memory, &[0x38]);
        run(&mut cpu, &mut memory, &[0xF8]);
        run(&mut cpu, &mut memory, &[0x78]);
        assert_eq!(cpu.p, CARRY_FLAG | DECIMAL_MODE | INTERRUPT_DISABLE);

        cpu.p |= OVERFLOW_FLAG;
        run(&mut cpu, &mut memory, &[0x18]);
        run(&mut cpu, &mut memory, &[0xD8]);
        run(&mut cpu, &mut memory, &[0x58]);
        run(&mut cpu, &mut memory, &[0xB8]);
        assert_eq!(cpu.p, 0);
    }

    #[test]
    fn nop_only_costs_cycles() {
        let (mut cpu, mut memory) = machine();
        let before = cpu.clone();
        assert_eq!(run(&mut cpu, &mut memory, &[0xEA]), 2);
        assert_eq!(run(&mut cpu, &mut memory, &[0xFF]), 2);
        assert_eq!(cpu, before);
    }

    #[test]
    fn store_without_address_is_rejected() {
        let (mut cpu, mut memory) = machine();
        let mut instr = Instruction::decode(&[0x85, 0x10]).unwrap();
        instr.mode = AddressingMode::Immediate;
        let before = cpu.clone();
        assert_eq!(step(&mut cpu, &mut memory, &instr),
                   Err(ExecError::InvalidAddressingMode { operation: Operation::STA, mode: AddressingMode::Immediate }));
        assert_eq!(cpu, before);
    }

    #[test]
    fn jmp_rejects_other_modes() {
        let (mut cpu, mut memory) = machine();
        let mut instr = Instruction::decode(&[0x4C, 0x00, 0x02]).unwrap();
        instr.mode = AddressingMode::AbsoluteX;
        assert_eq!(step(&mut cpu, &mut memory, &instr),
                   Err(ExecError::InvalidAddressingMode { operation: Operation::JMP, mode: AddressingMode::AbsoluteX }));
        assert_eq!(cpu.pc, 0);
    }

    #[test]
    fn break_flag_is_set_after_push() {
        let (mut cpu, mut memory) = machine();
        run(&mut cpu, &mut memory, &[0x00]);
        assert_eq!(memory.read_u8(0x01FB) & BREAK_COMMAND, 0);
        assert!(cpu.flag(BREAK_COMMAND));
    }
}
