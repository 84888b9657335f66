//! Two-pass assembly of a [`Program`] into a `{Word → Byte}` memory image.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use signal::{Byte, Word};

use crate::error::ProgramError;
use crate::instruction::InstructionSet;
use crate::program::{AddressRef, Arg, Program, Statement};

/// Resolves a [`Program`] against an [`InstructionSet`], solely to look up
/// `(name, mode) → opcode`; it has no knowledge of microcode.
pub struct Assembler<'a> {
    instructions: &'a InstructionSet,
}

impl<'a> Assembler<'a> {
    #[must_use]
    pub fn new(instructions: &'a InstructionSet) -> Self {
        Assembler { instructions }
    }

    pub fn assemble(&self, program: &Program) -> Result<BTreeMap<Word, Byte>, ProgramError> {
        let (positions, labels) = self.layout(program)?;
        self.bind(program, &positions, &labels)
    }

    /// Pass A: walk the statement list carrying a cursor, recording each
    /// statement's resolved position and every label's bound address.
    fn layout(&self, program: &Program) -> Result<(Vec<u16>, BTreeMap<String, Word>), ProgramError> {
        let mut position: u16 = 0;
        let mut positions = Vec::with_capacity(program.statements.len());
        let mut labels: BTreeMap<String, Word> = BTreeMap::new();

        for (stmt, size) in program.statements.iter().zip(program.layout_sizes()) {
            match stmt {
                Statement::At(address) => {
                    position = address.0;
                    positions.push(position);
                }
                Statement::Label(name) => {
                    if labels.insert(name.clone(), Word(position)).is_some() {
                        return Err(ProgramError::DuplicateLabel(name.clone()));
                    }
                    positions.push(position);
                }
                Statement::Literal(_) | Statement::Instruction(_, _) => {
                    positions.push(position);
                    position = position.wrapping_add(size as u16);
                }
            }
        }

        Ok((positions, labels))
    }

    /// Pass B: write every statement's bytes into the memory map.
    fn bind(
        &self,
        program: &Program,
        positions: &[u16],
        labels: &BTreeMap<String, Word>,
    ) -> Result<BTreeMap<Word, Byte>, ProgramError> {
        let mut image = BTreeMap::new();

        for (stmt, &position) in program.statements.iter().zip(positions) {
            match stmt {
                Statement::Label(_) | Statement::At(_) => {}
                Statement::Literal(bytes) => {
                    for (offset, &byte) in bytes.iter().enumerate() {
                        Self::write(&mut image, Word(position.wrapping_add(offset as u16)), byte)?;
                    }
                }
                Statement::Instruction(name, arg) => {
                    let opcode = self.opcode_for(name, arg)?;
                    Self::write(&mut image, Word(position), opcode)?;
                    for (offset, &byte) in self.operand_bytes(arg, labels)?.iter().enumerate() {
                        Self::write(
                            &mut image,
                            Word(position.wrapping_add(1 + offset as u16)),
                            byte,
                        )?;
                    }
                }
            }
        }

        Ok(image)
    }

    fn opcode_for(&self, name: &str, arg: &Arg) -> Result<Byte, ProgramError> {
        let instruction = self
            .instructions
            .instruction(name)
            .ok_or_else(|| ProgramError::InstructionNotFound(name.to_string()))?;
        instruction
            .mode(arg.mode())
            .map(|mode| mode.opcode)
            .ok_or_else(|| ProgramError::InstructionModeNotFound {
                name: name.to_string(),
                mode: arg.mode(),
            })
    }

    fn operand_bytes(&self, arg: &Arg, labels: &BTreeMap<String, Word>) -> Result<Vec<Byte>, ProgramError> {
        match arg {
            Arg::None => Ok(Vec::new()),
            Arg::Immediate(byte) | Arg::ZeroPage(byte) => Ok(vec![*byte]),
            Arg::Absolute(r) | Arg::IndexX(r) | Arg::IndexY(r) | Arg::Relative(r) => {
                let word = Self::resolve(r, labels)?;
                let (low, high) = word.lo_hi();
                Ok(vec![low, high])
            }
        }
    }

    fn resolve(r: &AddressRef, labels: &BTreeMap<String, Word>) -> Result<Word, ProgramError> {
        match r {
            AddressRef::Literal(word) => Ok(*word),
            AddressRef::Label(name) => labels
                .get(name)
                .copied()
                .ok_or_else(|| ProgramError::LabelNotFound(name.clone())),
        }
    }

    fn write(image: &mut BTreeMap<Word, Byte>, address: Word, value: Byte) -> Result<(), ProgramError> {
        if image.insert(address, value).is_some() {
            return Err(ProgramError::DuplicatePosition(address));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal::Byte;

    use crate::instruction::Mode;

    fn tiny_set() -> InstructionSet {
        InstructionSet::builder()
            .instruction("lda")
            .mode(Mode::Immediate, Byte(0xA9))
            .impl_always()
            .step(&["noop"])
            .end_impl()
            .end_mode()
            .end_instruction()
            .instruction("jmp")
            .mode(Mode::Absolute, Byte(0x4C))
            .impl_always()
            .step(&["noop"])
            .end_impl()
            .end_mode()
            .end_instruction()
            .instruction("hlt")
            .mode(Mode::None, Byte(0x00))
            .impl_always()
            .step(&["noop"])
            .end_impl()
            .end_mode()
            .end_instruction()
            .build()
            .unwrap()
    }

    #[test]
    fn literal_and_instructions_lay_out_sequentially() {
        let set = tiny_set();
        let program = Program::builder()
            .instruction("lda", Arg::Immediate(Byte(0x03)))
            .instruction("hlt", Arg::None)
            .build();
        let image = Assembler::new(&set).assemble(&program).unwrap();
        assert_eq!(image.get(&Word(0x0000)), Some(&Byte(0xA9)));
        assert_eq!(image.get(&Word(0x0001)), Some(&Byte(0x03)));
        assert_eq!(image.get(&Word(0x0002)), Some(&Byte(0x00)));
    }

    #[test]
    fn labels_resolve_to_little_endian_addresses() {
        let set = tiny_set();
        let program = Program::builder()
            .instruction("jmp", Arg::Absolute(AddressRef::Label("target".to_string())))
            .label("target")
            .instruction("hlt", Arg::None)
            .build();
        let image = Assembler::new(&set).assemble(&program).unwrap();
        assert_eq!(image.get(&Word(0x0001)), Some(&Byte(0x03)));
        assert_eq!(image.get(&Word(0x0002)), Some(&Byte(0x00)));
    }

    #[test]
    fn duplicate_label_is_an_error() {
        let set = tiny_set();
        let program = Program::builder()
            .label("l")
            .instruction("hlt", Arg::None)
            .label("l")
            .build();
        let err = Assembler::new(&set).assemble(&program).unwrap_err();
        assert!(matches!(err, ProgramError::DuplicateLabel(_)));
    }

    #[test]
    fn unresolved_label_is_an_error() {
        let set = tiny_set();
        let program = Program::builder()
            .instruction("jmp", Arg::Absolute(AddressRef::Label("nowhere".to_string())))
            .build();
        let err = Assembler::new(&set).assemble(&program).unwrap_err();
        assert!(matches!(err, ProgramError::LabelNotFound(_)));
    }

    #[test]
    fn at_moves_the_cursor() {
        let set = tiny_set();
        let program = Program::builder()
            .at(Word(0x8000))
            .instruction("hlt", Arg::None)
            .build();
        let image = Assembler::new(&set).assemble(&program).unwrap();
        assert_eq!(image.get(&Word(0x8000)), Some(&Byte(0x00)));
    }
}
