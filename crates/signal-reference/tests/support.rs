//! Shared helpers for the end-to-end scenario tests.

use signal::{Byte, Word};
use signal_reference::MinimalComputer;

pub fn boot() -> MinimalComputer {
    let _ = env_logger::try_init();
    MinimalComputer::new().expect("reference instruction set builds a valid computer")
}

pub fn run(computer: &mut MinimalComputer, budget: usize) {
    computer
        .tick_until_halt_with_budget(budget)
        .expect("program halts within budget");
    assert!(computer.halted());
}

#[allow(dead_code)]
pub fn byte_at(computer: &MinimalComputer, address: u16) -> Byte {
    computer.memory_peek(Word(address))
}
