//! Error types for every fallible stage of the simulator: instruction-set
//! construction, microcode assembly, program assembly, and ticking.

use alloc::string::String;
use signal::{Byte, Word};
use thiserror::Error;

/// Errors raised while building an [`crate::instruction::InstructionSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("instruction `{0}` is declared more than once")]
    DuplicateInstructionName(String),

    #[error("opcode {opcode:#04x} is already used by `{first}`, cannot reuse for `{second}`")]
    DuplicateOpcode {
        opcode: Byte,
        first: String,
        second: String,
    },

    #[error("component `{parent}` already has a child named `{name}`")]
    DuplicateChildName { parent: String, name: String },

    #[error("control bit {bit} is already assigned to `{first}`, cannot reuse for `{second}`")]
    DuplicateControlBit {
        bit: usize,
        first: String,
        second: String,
    },

    #[error("status bit index {bit} is out of range (must be 0..8)")]
    StatusIndexOutOfRange { bit: usize },
}

/// Errors raised while compiling an [`crate::instruction::InstructionSet`]
/// into a [`crate::microcode::MicrocodeRom`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MicrocodeError {
    #[error(
        "microcode address {address:#x} (opcode {opcode:#04x}, step {step}) is written by more than one impl"
    )]
    DuplicateMicrocodeAddress {
        address: usize,
        opcode: Byte,
        step: usize,
    },
}

/// Errors raised while assembling a [`crate::program::Program`] into a
/// memory image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("instruction `{0}` is not in the instruction set")]
    InstructionNotFound(String),

    #[error("instruction `{name}` has no `{mode:?}` addressing mode")]
    InstructionModeNotFound {
        name: String,
        mode: crate::instruction::Mode,
    },

    #[error("label `{0}` is declared more than once")]
    DuplicateLabel(String),

    #[error("label `{0}` is referenced but never declared")]
    LabelNotFound(String),

    #[error("address {0:#06x} is written by more than one statement")]
    DuplicatePosition(Word),
}

/// Runtime errors raised while ticking a [`crate::computer::Computer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickError {
    #[error("bus conflict at `{bus}`: `{existing_writer}` already wrote this tick, `{new_writer}` tried to write too")]
    BusConflict {
        bus: String,
        existing_writer: String,
        new_writer: String,
    },

    #[error("`{reader}` asserted `.read` but the bus `{bus}` is open (no writer this tick)")]
    OpenBusRead { reader: String, bus: String },

    #[error("status `{0}` referenced by the status register format is not present in the component tree")]
    MissingStatus(String),

    #[error("control `{0}` referenced by the microcode ROM is not present in the component tree")]
    MissingControl(String),

    #[error(
        "no microcode entry for opcode {opcode:#04x}, status word {status_word:#x}, step {step}"
    )]
    MicrocodeMiss {
        opcode: Byte,
        status_word: u32,
        step: usize,
    },

    #[error("tick_until_halt exceeded its budget of {0} ticks without halting")]
    HaltTimeout(usize),
}

/// Errors raised while assembling a [`crate::computer::Computer`]: building
/// its component tree, compiling the microcode ROM, and resolving the
/// controller's control/status paths are each fallible in their own way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputerError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Microcode(#[from] MicrocodeError),

    #[error(transparent)]
    Tick(#[from] TickError),
}
