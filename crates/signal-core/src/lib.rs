//! A `no_std` simulator for a small 8-bit microcoded CPU in the spirit of
//! the MOS 6502.
//!
//! `signal-core` is the control plane: a declarative instruction-set model,
//! an assembler that flattens it into a bit-indexed microcode ROM, a
//! five-phase tick pipeline that drives a tree of bus-addressable
//! components, and a program assembler that turns labeled statements into
//! a memory image. A concrete 6502-like instruction set and mnemonic
//! builder live one layer up, in `signal-reference`; this crate only knows
//! about the machinery, never about `lda` or `adc` by name.
//!
//! # Architecture
//!
//! Every simulated element — a control line, a register, the ALU, the
//! whole computer — is a node in one [`component::ComponentTree`] arena,
//! addressed by [`component::ComponentId`]. A tick runs five strictly
//! ordered phases ([`phase::Phase`]) across that tree: `Control` (the
//! controller asserts this cycle's signals from the compiled ROM),
//! `Write`, `Read`, `Process`, `Clear`.
//!
//! # Quick Start
//!
//! ```
//! extern crate alloc;
//!
//! use alloc::collections::BTreeMap;
//! use alloc::sync::Arc;
//! use signal::{Byte, Word};
//! use signal_core::computer::Computer;
//! use signal_core::instruction::{InstructionSet, Mode};
//!
//! let instructions = InstructionSet::builder()
//!     .header_step(&[
//!         "pc.low.write",
//!         "memory.address.low.read",
//!     ])
//!     .header_step(&[
//!         "memory.write",
//!         "controller.instruction_buffer.read",
//!         "pc.increment",
//!     ])
//!     .footer(&["controller.step_counter.reset"])
//!     .instruction("hlt")
//!     .mode(Mode::None, Byte(0x00))
//!     .impl_always()
//!     .step(&["halt"])
//!     .end_impl()
//!     .end_mode()
//!     .end_instruction()
//!     .build()
//!     .unwrap();
//!
//! let mut computer = Computer::new(Arc::new(instructions), &[], None).unwrap();
//! let mut image = BTreeMap::new();
//! image.insert(Word(0x0000), Byte(0x00));
//! computer.load(&image);
//! computer.tick_until_halt_with_budget(16).unwrap();
//! assert!(computer.halted());
//! ```

#![no_std]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

pub mod alu;
pub mod assembler;
pub mod builder;
pub mod bus;
pub mod component;
pub mod computer;
pub mod control;
pub mod controller;
pub mod counter;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod microcode;
pub mod phase;
pub mod program;
pub mod register;
pub mod status;
pub mod status_register;
mod tick_dispatch;

pub use component::{ComponentId, ComponentTree};
pub use computer::Computer;
pub use error::{BuildError, ComputerError, MicrocodeError, ProgramError, TickError};
pub use instruction::{Impl, Instruction, InstructionMode, InstructionSet, Mode, Step};
pub use microcode::{MicrocodeAssembler, MicrocodeRom};
pub use phase::Phase;
pub use program::{AddressRef, Arg, Program, ProgramBuilder, Statement};
pub use status_register::{FormatEntry, default_format};
