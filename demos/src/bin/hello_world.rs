//! Assembles a tiny program that copies "Hello!" into memory one byte at a
//! time via `lda #imm` / `sta $nnnn`, then prints what's there afterwards.

use signal::{Byte, Word};
use signal_core::program::{AddressRef, Arg, Program};
use signal_reference::{MinimalComputer, MnemonicBuilderExt};

const TEXT_ADDR: u16 = 0x0200;
const MESSAGE: &[u8] = b"Hello!";

fn main() {
    env_logger::init();

    let mut computer = MinimalComputer::new().expect("reference instruction set is valid");

    let mut builder = Program::builder();
    for (offset, &byte) in MESSAGE.iter().enumerate() {
        let addr = Word(TEXT_ADDR + offset as u16);
        builder = builder
            .lda(Arg::Immediate(Byte(byte)))
            .sta(Arg::Absolute(AddressRef::Literal(addr)));
    }
    let program = builder.hlt().build();

    computer
        .assemble_and_load(&program)
        .expect("program assembles against the reference instruction set");

    let ticks = computer
        .tick_until_halt_with_budget(10_000)
        .expect("program halts within budget");

    let mut rendered = String::new();
    for offset in 0..MESSAGE.len() {
        let addr = Word(TEXT_ADDR + offset as u16);
        rendered.push(computer.memory_peek(addr).0 as char);
    }

    println!("Program finished after {ticks} ticks");
    println!("Memory at ${TEXT_ADDR:04X}: {rendered}");
}
