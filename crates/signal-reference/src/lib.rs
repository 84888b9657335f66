//! A concrete MOS-6502-like instruction set, a mnemonic-per-method program
//! builder, and a ready-wired [`minimal_computer::MinimalComputer`], all
//! built on `signal-core`'s declarative machinery.
//!
//! `signal-core` knows nothing about `lda` or `adc`; this crate is where
//! those names exist, expressed as composable [`signal_core::instruction::Step`]
//! sequences rather than a hand-written opcode table.

#![no_std]

extern crate alloc;

pub mod instruction_set;
pub mod minimal_computer;
pub mod program_ext;

pub use instruction_set::reference_instruction_set;
pub use minimal_computer::MinimalComputer;
pub use program_ext::MnemonicBuilderExt;
