//! The microcode assembler: flattens an [`InstructionSet`] into a
//! read-only, bit-indexed `{address → controls bitmap}` ROM.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use signal::Byte;

use crate::error::MicrocodeError;
use crate::instruction::InstructionSet;

/// The compiled control-signal ROM: `get(opcode, status_word, step_index)`
/// returns the set of control indices to assert, or `None` if that address
/// was never written (a step-counter overflow at runtime).
#[derive(Debug, Clone, Default)]
pub struct MicrocodeRom {
    /// Sorted, deduplicated control paths; position is the bit index used
    /// in every stored bitmap.
    pub controls_index: Vec<String>,
    /// Sorted, deduplicated status paths mentioned in any impl predicate;
    /// position is the bit index packed into `status_word`.
    pub statuses_index: Vec<String>,
    pub step_bits: u32,
    table: BTreeMap<usize, BTreeSet<usize>>,
}

impl MicrocodeRom {
    /// The bit-exact address layout from §6: `opcode` in the high bits,
    /// then `status_word`, then `step_index` in the low `step_bits` bits.
    #[must_use]
    pub fn address(&self, opcode: Byte, status_word: usize, step_index: usize) -> usize {
        let s_bits = self.statuses_index.len() as u32;
        ((opcode.0 as usize) << (s_bits + self.step_bits)) | (status_word << self.step_bits) | step_index
    }

    #[must_use]
    pub fn get(&self, opcode: Byte, status_word: usize, step_index: usize) -> Option<&BTreeSet<usize>> {
        self.table.get(&self.address(opcode, status_word, step_index))
    }
}

/// Stateless compiler from an [`InstructionSet`] to a [`MicrocodeRom`].
pub struct MicrocodeAssembler;

impl MicrocodeAssembler {
    pub fn assemble(set: &InstructionSet) -> Result<MicrocodeRom, MicrocodeError> {
        let controls_index = Self::collect_controls(set);
        let statuses_index = Self::collect_statuses(set);
        let step_bits = Self::step_bits(set);

        let mut rom = MicrocodeRom {
            controls_index: controls_index.clone(),
            statuses_index: statuses_index.clone(),
            step_bits,
            table: BTreeMap::new(),
        };

        for instr in &set.instructions {
            for mode in &instr.modes {
                for imp in &mode.impls {
                    let status_words = Self::expand_status_words(&imp.predicate, &statuses_index);
                    for &status_word in &status_words {
                        for (step_index, step) in imp.steps.iter().enumerate() {
                            let address = rom.address(mode.opcode, status_word, step_index);
                            let bitmap: BTreeSet<usize> = step
                                .controls
                                .iter()
                                .map(|path| {
                                    controls_index
                                        .binary_search(path)
                                        .expect("control path collected from this same set")
                                })
                                .collect();
                            if rom.table.insert(address, bitmap).is_some() {
                                return Err(MicrocodeError::DuplicateMicrocodeAddress {
                                    address,
                                    opcode: mode.opcode,
                                    step: step_index,
                                });
                            }
                        }
                    }
                }
            }
        }

        Ok(rom)
    }

    fn collect_controls(set: &InstructionSet) -> Vec<String> {
        let mut all = BTreeSet::new();
        for instr in &set.instructions {
            for mode in &instr.modes {
                for imp in &mode.impls {
                    for step in &imp.steps {
                        all.extend(step.controls.iter().cloned());
                    }
                }
            }
        }
        all.into_iter().collect()
    }

    fn collect_statuses(set: &InstructionSet) -> Vec<String> {
        let mut all = BTreeSet::new();
        for instr in &set.instructions {
            for mode in &instr.modes {
                for imp in &mode.impls {
                    all.extend(imp.predicate.keys().cloned());
                }
            }
        }
        all.into_iter().collect()
    }

    fn step_bits(set: &InstructionSet) -> u32 {
        let max_steps = set
            .instructions
            .iter()
            .flat_map(|i| &i.modes)
            .flat_map(|m| &m.impls)
            .map(|imp| imp.steps.len())
            .max()
            .unwrap_or(1)
            .max(1);
        ceil_log2(max_steps)
    }

    /// Every full status-word consistent with `predicate`: statuses not
    /// named in `predicate` are "don't-cares", branched both ways, per
    /// §4.7's cartesian expansion.
    fn expand_status_words(predicate: &BTreeMap<String, bool>, statuses_index: &[String]) -> Vec<usize> {
        let mut words = vec![0usize];
        for (i, name) in statuses_index.iter().enumerate() {
            let bit = 1usize << i;
            words = match predicate.get(name) {
                Some(true) => words.into_iter().map(|w| w | bit).collect(),
                Some(false) => words,
                None => words.into_iter().flat_map(|w| [w, w | bit]).collect(),
            };
        }
        words
    }
}

/// `ceil(log2(n))`, `0` for `n <= 1`.
const fn ceil_log2(n: usize) -> u32 {
    let mut bits = 0;
    let mut capacity: usize = 1;
    while capacity < n {
        capacity <<= 1;
        bits += 1;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{InstructionSet, Mode, Step};

    fn single_instruction_set() -> InstructionSet {
        InstructionSet::builder()
            .header_step(&["pc.low.write", "memory.address.low.read"])
            .footer(&["controller.step_counter.reset"])
            .instruction("nop")
            .mode(Mode::None, Byte(0x00))
            .impl_always()
            .step(&["controller.step_counter.increment"])
            .end_impl()
            .end_mode()
            .end_instruction()
            .build()
            .unwrap()
    }

    #[test]
    fn address_layout_matches_spec_formula() {
        let set = single_instruction_set();
        let rom = MicrocodeAssembler::assemble(&set).unwrap();
        assert_eq!(rom.statuses_index.len(), 0);
        let expected = (0x00usize << rom.step_bits) | 0;
        assert_eq!(rom.address(Byte(0x00), 0, 0), expected);
    }

    #[test]
    fn header_and_footer_are_merged_into_every_impl() {
        let set = single_instruction_set();
        let rom = MicrocodeAssembler::assemble(&set).unwrap();
        let step0 = rom.get(Byte(0x00), 0, 0).unwrap();
        assert_eq!(step0.len(), 2);
        let step1 = rom.get(Byte(0x00), 0, 1).unwrap();
        assert_eq!(step1.len(), 2);
    }

    #[test]
    fn conflicting_impls_raise_duplicate_address() {
        let set = InstructionSet::builder()
            .instruction("amb")
            .mode(Mode::None, Byte(0x01))
            .impl_when(&[("a", true)])
            .step(&["x"])
            .end_impl()
            .impl_when(&[("b", true)])
            .step(&["y"])
            .end_impl()
            .end_mode()
            .end_instruction()
            .build()
            .unwrap();
        let err = MicrocodeAssembler::assemble(&set).unwrap_err();
        assert!(matches!(err, MicrocodeError::DuplicateMicrocodeAddress { .. }));
    }

    #[test]
    fn dont_care_statuses_expand_to_every_assignment() {
        let set = InstructionSet::builder()
            .instruction("branch")
            .mode(Mode::Relative, Byte(0x02))
            .impl_when(&[("alu.zero", true)])
            .step(&["take"])
            .end_impl()
            .impl_when(&[("alu.zero", false)])
            .step(&["skip"])
            .end_impl()
            .end_mode()
            .end_instruction()
            .instruction("other")
            .mode(Mode::None, Byte(0x03))
            .impl_always()
            .step(&["carry_in"])
            .end_impl()
            .end_mode()
            .end_instruction()
            .build()
            .unwrap();
        let rom = MicrocodeAssembler::assemble(&set).unwrap();
        assert_eq!(rom.statuses_index, alloc::vec![String::from("alu.zero")]);
        assert!(rom.get(Byte(0x02), 1, 0).is_some());
        assert!(rom.get(Byte(0x02), 0, 0).is_some());
    }
}
