//! Invariant: the compiled [`MicrocodeRom`] decodes, at every `(opcode,
//! status_word, step_index)` triple, to exactly the set of controls named by
//! the source `Step` that produced it, once the instruction set's header and
//! footer steps are folded in.

use signal::Byte;
use signal_core::instruction::{InstructionSet, Mode};
use signal_core::microcode::MicrocodeAssembler;

#[test]
fn header_and_footer_steps_surround_every_impl() {
    let set = InstructionSet::builder()
        .header_step(&["pc.low.write", "memory.address.low.read"])
        .footer(&["controller.step_counter.reset"])
        .instruction("nop")
        .mode(Mode::None, Byte(0x01))
        .impl_always()
        .step(&["halt"])
        .end_impl()
        .end_mode()
        .end_instruction()
        .build()
        .unwrap();

    let rom = MicrocodeAssembler::assemble(&set).unwrap();

    let header = rom.get(Byte(0x01), 0, 0).unwrap();
    assert!(header.contains(&index_of(&rom, "pc.low.write")));
    assert!(header.contains(&index_of(&rom, "memory.address.low.read")));

    let body = rom.get(Byte(0x01), 0, 1).unwrap();
    assert!(body.contains(&index_of(&rom, "halt")));

    let footer = rom.get(Byte(0x01), 0, 2).unwrap();
    assert!(footer.contains(&index_of(&rom, "controller.step_counter.reset")));

    assert!(rom.get(Byte(0x01), 0, 3).is_none());
}

#[test]
fn distinct_opcodes_never_alias_in_the_rom() {
    let set = InstructionSet::builder()
        .footer(&["controller.step_counter.reset"])
        .instruction("a")
        .mode(Mode::None, Byte(0x01))
        .impl_always()
        .step(&["a.write", "x.read"])
        .end_impl()
        .end_mode()
        .end_instruction()
        .instruction("b")
        .mode(Mode::None, Byte(0x02))
        .impl_always()
        .step(&["x.write", "a.read"])
        .end_impl()
        .end_mode()
        .end_instruction()
        .build()
        .unwrap();

    let rom = MicrocodeAssembler::assemble(&set).unwrap();

    let a_step = rom.get(Byte(0x01), 0, 0).unwrap();
    let b_step = rom.get(Byte(0x02), 0, 0).unwrap();
    assert_ne!(a_step, b_step);
    assert!(a_step.contains(&index_of(&rom, "a.write")));
    assert!(b_step.contains(&index_of(&rom, "x.write")));
}

#[test]
fn status_dependent_impls_occupy_distinct_status_words() {
    let set = InstructionSet::builder()
        .footer(&["controller.step_counter.reset"])
        .instruction("branch")
        .mode(Mode::None, Byte(0x01))
        .impl_when(&[("alu.zero", true)])
        .step(&["pc.low.read"])
        .end_impl()
        .impl_when(&[("alu.zero", false)])
        .step(&["pc.increment"])
        .end_impl()
        .end_mode()
        .end_instruction()
        .build()
        .unwrap();

    let rom = MicrocodeAssembler::assemble(&set).unwrap();
    assert_eq!(rom.statuses_index, alloc_vec(&["alu.zero"]));

    let zero_bit = rom
        .statuses_index
        .iter()
        .position(|s| s == "alu.zero")
        .unwrap();
    let taken_word = 1usize << zero_bit;
    let not_taken_word = 0usize;

    let taken = rom.get(Byte(0x01), taken_word, 0).unwrap();
    let not_taken = rom.get(Byte(0x01), not_taken_word, 0).unwrap();
    assert!(taken.contains(&index_of(&rom, "pc.low.read")));
    assert!(not_taken.contains(&index_of(&rom, "pc.increment")));
}

fn index_of(rom: &signal_core::microcode::MicrocodeRom, path: &str) -> usize {
    rom.controls_index
        .binary_search(&path.to_string())
        .unwrap_or_else(|_| panic!("`{path}` missing from controls_index"))
}

fn alloc_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
