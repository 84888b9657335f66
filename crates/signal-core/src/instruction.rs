//! The instruction model: `Instruction → Mode → Impl → Step`.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use signal::Byte;

/// An instruction's addressing-mode tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    None,
    Immediate,
    Absolute,
    ZeroPage,
    IndexX,
    IndexY,
    Relative,
}

impl Mode {
    /// Number of argument bytes this mode carries, per §4.9's pass-A sizing
    /// rule (`0` for `None`, `1` for `Immediate`/`ZeroPage`, `2` otherwise).
    #[must_use]
    pub fn arg_size(self) -> usize {
        match self {
            Mode::None => 0,
            Mode::Immediate | Mode::ZeroPage => 1,
            Mode::Absolute | Mode::IndexX | Mode::IndexY | Mode::Relative => 2,
        }
    }
}

/// One cycle of an instruction's microcode: an unordered set of control
/// paths asserted that cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    pub controls: BTreeSet<String>,
}

impl Step {
    #[must_use]
    pub fn new(controls: &[&str]) -> Self {
        Step {
            controls: controls.iter().map(|s| String::from(*s)).collect(),
        }
    }
}

/// One concrete step sequence for an instruction mode, selected by a
/// partial predicate over named statuses.
#[derive(Debug, Clone, Default)]
pub struct Impl {
    pub predicate: BTreeMap<String, bool>,
    pub steps: Vec<Step>,
}

/// An addressing-mode variant of an instruction: its own opcode and the
/// `Impl`s that select among alternative step sequences.
#[derive(Debug, Clone)]
pub struct InstructionMode {
    pub mode: Mode,
    pub opcode: Byte,
    pub impls: Vec<Impl>,
}

/// A named instruction: a set of addressing-mode variants, each with its
/// own opcode.
#[derive(Debug, Clone, Default)]
pub struct Instruction {
    pub name: String,
    pub modes: Vec<InstructionMode>,
}

impl Instruction {
    #[must_use]
    pub fn mode(&self, mode: Mode) -> Option<&InstructionMode> {
        self.modes.iter().find(|m| m.mode == mode)
    }
}

/// The full, already header/footer-merged instruction model: every
/// `Impl`'s steps already begin with the header and end with the footer
/// unioned in, so the microcode assembler and the controller never need to
/// know header/footer exist.
#[derive(Debug, Clone, Default)]
pub struct InstructionSet {
    pub instructions: Vec<Instruction>,
}

impl InstructionSet {
    #[must_use]
    pub fn instruction(&self, name: &str) -> Option<&Instruction> {
        self.instructions.iter().find(|i| i.name == name)
    }

    /// `(name, mode) → opcode`, used by the program assembler.
    #[must_use]
    pub fn opcode(&self, name: &str, mode: Mode) -> Option<Byte> {
        self.instruction(name)?.mode(mode).map(|m| m.opcode)
    }
}
