//! Calls a small subroutine twice via `jsr`/`rts`, and has the subroutine
//! save/restore the accumulator across its own work with `pha`/`pla`,
//! showing that nested call frames and stack saves compose correctly.

use signal::Byte;
use signal_core::program::{AddressRef, Arg, Program};
use signal_reference::{MinimalComputer, MnemonicBuilderExt};

fn main() {
    env_logger::init();

    let mut computer = MinimalComputer::new().expect("reference instruction set is valid");
    let initial_sp = computer.sp();

    // `bump_and_restore` increments a running total in `x`, but clobbers the
    // accumulator while doing scratch work, so it saves and restores it.
    let program = Program::builder()
        .lda(Arg::Immediate(Byte(0x00)))
        .jsr(AddressRef::Label("bump_and_restore".to_string()))
        .jsr(AddressRef::Label("bump_and_restore".to_string()))
        .jsr(AddressRef::Label("bump_and_restore".to_string()))
        .hlt()
        .label("bump_and_restore")
        .pha()
        .inx()
        .lda(Arg::Immediate(Byte(0xFF)))
        .pla()
        .rts()
        .build();

    computer
        .assemble_and_load(&program)
        .expect("program assembles against the reference instruction set");

    let ticks = computer
        .tick_until_halt_with_budget(10_000)
        .expect("program halts within budget");

    println!("Halted after {ticks} ticks");
    println!("a={:#04x} x={:#04x}", computer.a().0, computer.x().0);
    println!(
        "stack pointer restored: {}",
        computer.sp() == initial_sp
    );
}
