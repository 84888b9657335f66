//! Shared fixtures for crate-level integration tests: small instruction
//! sets built directly against the public builder surface, independent of
//! `signal-reference`'s full 6502-like set.
//!
//! Every fixture below uses opcode `0x00`, the `instruction_buffer`'s
//! reset-state value, so a fresh [`Computer`] decodes it from the very
//! first tick without needing a fetch header to load it.

use std::sync::Arc;

use signal::Byte;
use signal_core::computer::Computer;
use signal_core::instruction::{InstructionSet, Mode};

/// `a.write, x.read` every step, forever. Exercises a same-tick
/// write-then-read bus transfer and the auto-clear sweep that follows it.
#[allow(dead_code)]
pub fn mov_set() -> InstructionSet {
    InstructionSet::builder()
        .footer(&["controller.step_counter.reset"])
        .instruction("mov")
        .mode(Mode::None, Byte(0x00))
        .impl_always()
        .step(&["a.write", "x.read"])
        .end_impl()
        .end_mode()
        .end_instruction()
        .build()
        .unwrap()
}

/// Asserts `halt` on its very first step. `halt` is sticky (not
/// auto-clear), so once asserted it reads `true` on every later tick too.
#[allow(dead_code)]
pub fn halt_set() -> InstructionSet {
    InstructionSet::builder()
        .footer(&["controller.step_counter.reset"])
        .instruction("hlt")
        .mode(Mode::None, Byte(0x00))
        .impl_always()
        .step(&["halt"])
        .end_impl()
        .end_mode()
        .end_instruction()
        .build()
        .unwrap()
}

/// A deliberately broken instruction: two distinct registers both assert
/// `.write` in the same step, which must raise `BusConflict` when ticked.
#[allow(dead_code)]
pub fn conflicting_write_set() -> InstructionSet {
    InstructionSet::builder()
        .footer(&["controller.step_counter.reset"])
        .instruction("conflict")
        .mode(Mode::None, Byte(0x00))
        .impl_always()
        .step(&["a.write", "x.write", "y.read"])
        .end_impl()
        .end_mode()
        .end_instruction()
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn computer_with(set: InstructionSet) -> Computer {
    Computer::new(Arc::new(set), &["a", "x", "y"], None).expect("fixture instruction set is valid")
}
