//! The seed end-to-end scenarios (S1-S6): each assembles a short program
//! against the reference instruction set, runs it to completion on a fresh
//! [`MinimalComputer`], and checks the resulting machine state.

mod support;

use signal::{Byte, Word};
use signal_core::program::{AddressRef, Arg, Program};
use signal_reference::MnemonicBuilderExt;

use support::{boot, run};

const STATUS_CARRY: u8 = 0x01;
const STATUS_ZERO: u8 = 0x02;

#[test]
fn s1_lda_immediate_then_halt() {
    let mut computer = boot();
    let program = Program::builder()
        .lda(Arg::Immediate(Byte(0x03)))
        .hlt()
        .build();
    computer.assemble_and_load(&program).unwrap();

    run(&mut computer, 64);

    assert_eq!(computer.a(), Byte(0x03));
    assert_eq!(computer.pc(), Word(0x0003));
    assert!(computer.halted());
}

#[test]
fn s2_adc_with_carry_out_sets_carry_and_zero() {
    let mut computer = boot();
    let program = Program::builder()
        .lda(Arg::Immediate(Byte(0xFF)))
        .clc()
        .adc(Arg::Immediate(Byte(0x01)))
        .hlt()
        .build();
    computer.assemble_and_load(&program).unwrap();

    run(&mut computer, 64);

    assert_eq!(computer.a(), Byte(0x00));
    let status = computer.status().0;
    assert_ne!(status & STATUS_CARRY, 0, "carry_out should be latched");
    assert_ne!(status & STATUS_ZERO, 0, "zero should be latched");
}

#[test]
fn s3_sta_absolute_writes_memory() {
    let mut computer = boot();
    let program = Program::builder()
        .lda(Arg::Immediate(Byte(0xAB)))
        .sta(Arg::Absolute(AddressRef::Label("label".to_string())))
        .hlt()
        .label("label")
        .data(&[Byte(0x00)])
        .build();
    computer.assemble_and_load(&program).unwrap();

    run(&mut computer, 64);

    assert_eq!(computer.memory_peek(Word(0x0006)), Byte(0xAB));
}

#[test]
fn s4_jmp_absolute_transfers_control() {
    let mut computer = boot();
    let program = Program::builder()
        .jmp(AddressRef::Literal(Word(0xBEEF)))
        .at(Word(0xBEEF))
        .hlt()
        .build();
    computer.assemble_and_load(&program).unwrap();

    run(&mut computer, 64);

    assert_eq!(computer.pc(), Word(0xBEF0));
}

#[test]
fn s5_beq_taken_skips_the_following_instruction() {
    let mut computer = boot();
    let program = Program::builder()
        .lda(Arg::Immediate(Byte(0x00)))
        .adc(Arg::Immediate(Byte(0x00)))
        .beq(AddressRef::Label("end".to_string()))
        .lda(Arg::Immediate(Byte(0x05)))
        .label("end")
        .hlt()
        .build();
    computer.assemble_and_load(&program).unwrap();

    run(&mut computer, 64);

    assert_eq!(computer.a(), Byte(0x00));
}

#[test]
fn s6_jsr_rts_nesting_restores_the_stack() {
    let mut computer = boot();
    let initial_sp = computer.sp();

    let program = Program::builder()
        .lda(Arg::Immediate(Byte(0x01)))
        .jsr(AddressRef::Label("sub".to_string()))
        .jsr(AddressRef::Label("sub".to_string()))
        .hlt()
        .label("sub")
        .inc()
        .rts()
        .build();
    computer.assemble_and_load(&program).unwrap();

    run(&mut computer, 256);

    assert_eq!(computer.a(), Byte(0x03));
    assert_eq!(computer.sp(), initial_sp);
}
