//! Computes a short run of Fibonacci numbers iteratively, using three
//! zero-page cells (`prev`, `curr`, `next`) and a countdown in `x` checked
//! with `dex`/`bne` — the same loop idiom real 6502 code uses.

use signal::{Byte, Word};
use signal_core::program::{AddressRef, Arg, Program};
use signal_reference::{MinimalComputer, MnemonicBuilderExt};

const PREV: Byte = Byte(0x00);
const CURR: Byte = Byte(0x01);
const NEXT: Byte = Byte(0x02);
const ITERATIONS: Byte = Byte(8);

fn main() {
    env_logger::init();

    let mut computer = MinimalComputer::new().expect("reference instruction set is valid");

    let program = Program::builder()
        .lda(Arg::Immediate(Byte(0x00)))
        .sta(Arg::ZeroPage(PREV))
        .lda(Arg::Immediate(Byte(0x01)))
        .sta(Arg::ZeroPage(CURR))
        .ldx(Arg::Immediate(ITERATIONS))
        .label("loop")
        .clc()
        .lda(Arg::ZeroPage(PREV))
        .adc(Arg::ZeroPage(CURR))
        .sta(Arg::ZeroPage(NEXT))
        .lda(Arg::ZeroPage(CURR))
        .sta(Arg::ZeroPage(PREV))
        .lda(Arg::ZeroPage(NEXT))
        .sta(Arg::ZeroPage(CURR))
        .dex()
        .bne(AddressRef::Label("loop".to_string()))
        .hlt()
        .build();

    computer
        .assemble_and_load(&program)
        .expect("program assembles against the reference instruction set");

    let ticks = computer
        .tick_until_halt_with_budget(10_000)
        .expect("program halts within budget");

    let prev = computer.memory_peek(Word(u16::from(PREV.0)));
    let curr = computer.memory_peek(Word(u16::from(CURR.0)));
    println!("Halted after {ticks} ticks: prev={}, curr={}", prev.0, curr.0);
}
