//! Fluent, explicit-method construction of an [`InstructionSet`].
//!
//! Each nesting level is its own builder type that owns its parent by
//! value; `.end_*()` folds the accumulated piece back in and returns the
//! parent. This avoids the overloaded "begin child vs. add atom" ambiguity
//! the original builder surface had — there is exactly one method for each
//! intent, and no variadic argument-presence dispatch.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use signal::Byte;

use crate::error::BuildError;
use crate::instruction::{Impl, Instruction, InstructionMode, InstructionSet, Mode, Step};

/// Entry point: `InstructionSet::builder()`.
#[derive(Default)]
pub struct InstructionSetBuilder {
    instructions: Vec<Instruction>,
    header: Vec<Step>,
    footer: Step,
}

impl InstructionSet {
    #[must_use]
    pub fn builder() -> InstructionSetBuilder {
        InstructionSetBuilder::default()
    }
}

impl InstructionSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one step to the header, prepended to every instruction's
    /// `Impl`s (typically the opcode-fetch sequence).
    #[must_use]
    pub fn header_step(mut self, controls: &[&str]) -> Self {
        self.header.push(Step::new(controls));
        self
    }

    /// Sets the footer: controls unioned into every `Impl`'s *last* step
    /// (typically `controller.step_counter.reset`, `status.latch`).
    #[must_use]
    pub fn footer(mut self, controls: &[&str]) -> Self {
        self.footer = Step::new(controls);
        self
    }

    #[must_use]
    pub fn instruction(self, name: &str) -> InstructionBuilder {
        InstructionBuilder {
            parent: self,
            name: name.to_string(),
            modes: Vec::new(),
        }
    }

    /// Validates uniqueness, merges header/footer into every `Impl`, and
    /// produces the final [`InstructionSet`].
    pub fn build(self) -> Result<InstructionSet, BuildError> {
        let InstructionSetBuilder {
            instructions,
            header,
            footer,
        } = self;
        let mut seen_names = BTreeSet::new();
        let mut seen_opcodes: BTreeMap<Byte, String> = BTreeMap::new();
        let mut built = Vec::with_capacity(instructions.len());
        for instr in instructions {
            if !seen_names.insert(instr.name.clone()) {
                return Err(BuildError::DuplicateInstructionName(instr.name));
            }
            let mut modes = Vec::with_capacity(instr.modes.len());
            for m in instr.modes {
                if let Some(first) = seen_opcodes.get(&m.opcode) {
                    return Err(BuildError::DuplicateOpcode {
                        opcode: m.opcode,
                        first: first.clone(),
                        second: instr.name.clone(),
                    });
                }
                seen_opcodes.insert(m.opcode, instr.name.clone());
                let impls = m
                    .impls
                    .into_iter()
                    .map(|imp| merge_header_footer(&header, &footer, imp))
                    .collect();
                modes.push(InstructionMode {
                    mode: m.mode,
                    opcode: m.opcode,
                    impls,
                });
            }
            built.push(Instruction {
                name: instr.name,
                modes,
            });
        }
        Ok(InstructionSet {
            instructions: built,
        })
    }
}

fn merge_header_footer(header: &[Step], footer: &Step, imp: Impl) -> Impl {
    let mut steps = header.to_vec();
    steps.extend(imp.steps);
    match steps.last_mut() {
        Some(last) => last.controls.extend(footer.controls.iter().cloned()),
        None => steps.push(footer.clone()),
    }
    Impl {
        predicate: imp.predicate,
        steps,
    }
}

pub struct InstructionBuilder {
    parent: InstructionSetBuilder,
    name: String,
    modes: Vec<InstructionMode>,
}

impl InstructionBuilder {
    #[must_use]
    pub fn mode(self, mode: Mode, opcode: Byte) -> ModeBuilder {
        ModeBuilder {
            parent: self,
            mode,
            opcode,
            impls: Vec::new(),
        }
    }

    #[must_use]
    pub fn end_instruction(mut self) -> InstructionSetBuilder {
        self.parent.instructions.push(Instruction {
            name: self.name,
            modes: self.modes,
        });
        self.parent
    }
}

pub struct ModeBuilder {
    parent: InstructionBuilder,
    mode: Mode,
    opcode: Byte,
    impls: Vec<Impl>,
}

impl ModeBuilder {
    /// Begins an `Impl` selected when every named status matches.
    #[must_use]
    pub fn impl_when(self, predicate: &[(&str, bool)]) -> ImplBuilder {
        ImplBuilder {
            parent: self,
            predicate: predicate
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
            steps: Vec::new(),
        }
    }

    /// Begins the single unconditional `Impl` for this mode (empty
    /// predicate — always matches).
    #[must_use]
    pub fn impl_always(self) -> ImplBuilder {
        self.impl_when(&[])
    }

    #[must_use]
    pub fn end_mode(mut self) -> InstructionBuilder {
        self.parent.modes.push(InstructionMode {
            mode: self.mode,
            opcode: self.opcode,
            impls: self.impls,
        });
        self.parent
    }
}

pub struct ImplBuilder {
    parent: ModeBuilder,
    predicate: BTreeMap<String, bool>,
    steps: Vec<Step>,
}

impl ImplBuilder {
    /// Appends one microcode step (a cycle's worth of asserted controls).
    #[must_use]
    pub fn step(mut self, controls: &[&str]) -> Self {
        self.steps.push(Step::new(controls));
        self
    }

    #[must_use]
    pub fn end_impl(mut self) -> ModeBuilder {
        self.parent.impls.push(Impl {
            predicate: self.predicate,
            steps: self.steps,
        });
        self.parent
    }
}
