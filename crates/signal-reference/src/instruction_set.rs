//! A concrete, MOS-6502-like [`InstructionSet`] built on `signal_core`'s
//! declarative model. None of this lives in `signal-core` itself — the
//! core only knows about components, buses, and microcode; naming `lda` or
//! `adc` is the external collaborator's job.
//!
//! # Addressing conventions
//!
//! Every path below is relative to a [`crate::minimal_computer::MinimalComputer`]'s
//! own root (so `"pc.low.write"`, not `"computer.pc.low.write"` — the root
//! itself plays the part "computer" would in an absolute path). Bus
//! transfers move one byte per step (one writer, any number of readers),
//! so loading two distinct source registers into the ALU's `lhs`/`rhs`
//! always takes two steps.
//!
//! `Relative` mode stores and emits the *absolute* branch target (2 bytes,
//! little-endian) rather than a signed 8-bit PC-relative delta — the
//! assembler never needs delta arithmetic, and the addressing-mode tag
//! still lets the microcode assembler and the controller dispatch on it
//! distinctly from `Absolute`. Indexed addressing (`IndexX`/`IndexY`) adds
//! the index register into the address's low byte only; it does not
//! propagate a carry into the high byte on page crossing, a deliberate
//! simplification of this reference layer (see `DESIGN.md`).
//!
//! Incrementing/decrementing a register forces `alu.carry_in` to a known
//! state first: `carry_in`'s `.clear` sub-control only takes effect at the
//! end of the tick it's asserted in (the `Clear` phase), so clearing it
//! ahead of an `adc`-based increment needs its own preceding step, while
//! setting it ahead of an `sbc`-based decrement can be asserted directly in
//! the same step as the operation (ordinary control asserts take effect
//! immediately, in `Control`, well before that tick's `Process`).

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use signal::Byte;
use signal_core::alu::{OPERATIONS, opcode_bits};
use signal_core::instruction::{InstructionSet, Mode, Step};

const PC_LOW_WRITE: &str = "pc.low.write";
const PC_HIGH_WRITE: &str = "pc.high.write";
const PC_LOW_READ: &str = "pc.low.read";
const PC_HIGH_READ: &str = "pc.high.read";
const PC_INCREMENT: &str = "pc.increment";

const MEM_ADDR_LOW_WRITE: &str = "memory.address.low.write";
const MEM_ADDR_HIGH_WRITE: &str = "memory.address.high.write";
const MEM_ADDR_LOW_READ: &str = "memory.address.low.read";
const MEM_ADDR_HIGH_READ: &str = "memory.address.high.read";
const MEM_ADDR_HIGH_RESET: &str = "memory.address.high.reset";
const MEM_WRITE: &str = "memory.write";
const MEM_READ: &str = "memory.read";

const IB_READ: &str = "controller.instruction_buffer.read";
const STEP_RESET: &str = "controller.step_counter.reset";
const STATUS_LATCH: &str = "controller.status.latch";
const STATUS_WRITE: &str = "controller.status.write";
const STATUS_READ: &str = "controller.status.read";

const ALU_LHS_READ: &str = "alu.lhs.read";
const ALU_RHS_READ: &str = "alu.rhs.read";
const ALU_OUTPUT_WRITE: &str = "alu.output.write";
const ALU_OUTPUT_READ: &str = "alu.output.read";
const ALU_LHS_WRITE: &str = "alu.lhs.write";
const ALU_RHS_ONE: &str = "alu.rhs_one";
const ALU_CARRY_IN: &str = "alu.carry_in";
const ALU_CARRY_IN_CLEAR: &str = "alu.carry_in.clear";

const SP_LOW_WRITE: &str = "sp.low.write";
const SP_HIGH_WRITE: &str = "sp.high.write";
const SP_INCREMENT: &str = "sp.increment";
const SP_DECREMENT: &str = "sp.decrement";

const HALT: &str = "halt";
const A_WRITE: &str = "a.write";
const A_READ: &str = "a.read";

fn reg(name: &str, sub: &str) -> String {
    format!("{name}.{sub}")
}

/// Control paths for `op`'s opcode bits, derived from its sorted position
/// in [`OPERATIONS`] rather than a hardcoded index.
fn alu_opcode_controls(op: &str) -> Vec<String> {
    let index = OPERATIONS
        .iter()
        .position(|candidate| candidate.name == op)
        .unwrap_or_else(|| panic!("unknown alu operation `{op}`"));
    let code = (index + 1) as u32;
    (0..opcode_bits())
        .filter(|bit| (code >> bit) & 1 == 1)
        .map(|bit| format!("alu.opcode_{bit}"))
        .collect()
}

/// Three steps: point `memory.address` at the current `pc`, drive memory's
/// content onto the bus, and latch it into `dest_read` while advancing
/// `pc`. Used for opcode fetch and every one-byte operand fetch.
fn fetch_byte_into(dest_read: &str) -> Vec<Step> {
    alloc::vec![
        Step::new(&[PC_LOW_WRITE, MEM_ADDR_LOW_READ]),
        Step::new(&[PC_HIGH_WRITE, MEM_ADDR_HIGH_READ]),
        Step::new(&[MEM_WRITE, dest_read, PC_INCREMENT]),
    ]
}

/// Resolves a two-byte absolute operand into `memory.address`.
fn resolve_absolute_address() -> Vec<Step> {
    let mut steps = fetch_byte_into(MEM_ADDR_LOW_READ);
    steps.extend(fetch_byte_into(MEM_ADDR_HIGH_READ));
    steps
}

/// Resolves a one-byte zero-page operand: fetches the low byte and forces
/// `memory.address.high` to zero in the same step.
fn resolve_zero_page_address() -> Vec<Step> {
    let mut steps = fetch_byte_into(MEM_ADDR_LOW_READ);
    steps
        .last_mut()
        .expect("fetch_byte_into always returns 3 steps")
        .controls
        .insert(MEM_ADDR_HIGH_RESET.to_string());
    steps
}

/// Adds `index_write`'s value into `memory.address.low` (no carry into
/// `.high` — see the module-level note on indexed addressing). `carry_in`
/// is cleared one step ahead of the `adc`, in the same step that loads
/// `lhs` (a `.clear` lands at the end of the tick it's asserted in, so it's
/// already in effect by the time the following step's `adc` runs).
fn add_index_into_address_low(index_write: &str) -> Vec<Step> {
    let mut rhs_step: Vec<String> = alloc::vec![index_write.to_string(), ALU_RHS_READ.to_string()];
    rhs_step.extend(alu_opcode_controls("adc"));
    alloc::vec![
        Step::new(&[MEM_ADDR_LOW_WRITE, ALU_LHS_READ, ALU_CARRY_IN_CLEAR]),
        Step {
            controls: rhs_step.into_iter().collect(),
        },
        Step::new(&[ALU_OUTPUT_WRITE, MEM_ADDR_LOW_READ]),
    ]
}

/// Loads an operand byte straight into `alu.rhs`.
fn load_operand_immediate() -> Vec<Step> {
    fetch_byte_into(ALU_RHS_READ)
}

fn load_operand_absolute() -> Vec<Step> {
    let mut steps = resolve_absolute_address();
    steps.push(Step::new(&[MEM_WRITE, ALU_RHS_READ]));
    steps
}

/// Moves `src_write`'s value into `dst_read` in a single step.
fn move_step(src_write: &str, dst_read: &str) -> Step {
    Step::new(&[src_write, dst_read])
}

/// Loads `lhs_write` into `alu.lhs`, asserts `op`'s opcode bits plus
/// `extra`, and (if given) writes `alu.output` back into `dst_read` on a
/// second step.
fn execute_alu(lhs_write: &str, op: &str, extra: &[&str], dst_read: Option<&str>) -> Vec<Step> {
    let mut controls: Vec<String> = alloc::vec![lhs_write.to_string(), ALU_LHS_READ.to_string()];
    controls.extend(alu_opcode_controls(op));
    controls.extend(extra.iter().map(|s| s.to_string()));
    let execute = Step {
        controls: controls.into_iter().collect(),
    };
    match dst_read {
        Some(dst) => alloc::vec![execute, Step::new(&[ALU_OUTPUT_WRITE, dst])],
        None => alloc::vec![execute],
    }
}

/// `name += 1`, via `adc` with `rhs_one`. `carry_in` must already read
/// `false` when the op runs, so this clears it one step ahead.
fn increment_register(name: &str) -> Vec<Step> {
    let write = reg(name, "write");
    let read = reg(name, "read");
    let mut steps = alloc::vec![Step::new(&[ALU_CARRY_IN_CLEAR])];
    steps.extend(execute_alu(&write, "adc", &[ALU_RHS_ONE], Some(&read)));
    steps
}

/// `name -= 1`, via `sbc` with `rhs_one` and `carry_in` forced true inline
/// ("no borrow"), exactly like a `cmp`/`sbc` convention where the
/// programmer is expected to `sec` first.
fn decrement_register(name: &str) -> Vec<Step> {
    let write = reg(name, "write");
    let read = reg(name, "read");
    execute_alu(&write, "sbc", &[ALU_RHS_ONE, ALU_CARRY_IN], Some(&read))
}

/// Pushes one byte (driven by `src_write`) onto the stack, decrementing
/// `sp` afterwards. Points `memory.address` at the full `sp` (both bytes,
/// not just `low`) since nothing else keeps `memory.address.high` pinned
/// to the stack page between instructions.
fn push_byte(src_write: &str) -> Vec<Step> {
    alloc::vec![
        Step::new(&[SP_LOW_WRITE, MEM_ADDR_LOW_READ]),
        Step::new(&[SP_HIGH_WRITE, MEM_ADDR_HIGH_READ]),
        Step::new(&[src_write, MEM_READ, SP_DECREMENT]),
    ]
}

/// Pops one byte off the stack into `dst_read`, incrementing `sp` first.
fn pop_into(dst_read: &str) -> Vec<Step> {
    alloc::vec![
        Step::new(&[SP_INCREMENT]),
        Step::new(&[SP_LOW_WRITE, MEM_ADDR_LOW_READ]),
        Step::new(&[SP_HIGH_WRITE, MEM_ADDR_HIGH_READ]),
        Step::new(&[MEM_WRITE, dst_read]),
    ]
}

/// `jmp`/`jsr`'s shared tail: resolve the absolute operand, stash it in
/// the ALU's spare registers (nothing else touches the ALU for the rest of
/// this instruction), optionally push the return address, then copy the
/// stashed target into `pc`.
fn jump_to_resolved_address(push_return_address: bool) -> Vec<Step> {
    let mut steps = resolve_absolute_address();
    steps.push(move_step(MEM_ADDR_LOW_WRITE, ALU_LHS_READ));
    steps.push(move_step(MEM_ADDR_HIGH_WRITE, ALU_OUTPUT_READ));
    if push_return_address {
        steps.extend(push_byte(PC_LOW_WRITE));
        steps.extend(push_byte(PC_HIGH_WRITE));
    }
    steps.push(move_step(ALU_LHS_WRITE, PC_LOW_READ));
    steps.push(move_step(ALU_OUTPUT_WRITE, PC_HIGH_READ));
    steps
}

/// Folds a prebuilt step sequence into an in-progress `ImplBuilder` chain.
/// The builder's own `.step()` only takes a literal `&[&str]`, so composite
/// sequences built by the helpers above go through here one step at a time.
macro_rules! steps {
    ($builder:expr, $seq:expr) => {{
        let mut b = $builder;
        for step in &$seq {
            let refs: Vec<&str> = step.controls.iter().map(String::as_str).collect();
            b = b.step(&refs);
        }
        b
    }};
}

/// Builds the reference instruction set: every mnemonic in the surface
/// `nop, hlt, tax, txa, tay, tya, lda, ldx, ldy, sta, stx, sty, jmp, sec,
/// clc, adc, sbc, and, ora, eor, asl, lsr, rol, ror, inc, dec, inx, dex,
/// iny, dey, cmp, beq, bne, bmi, bpl, bcs, bcc, bvs, bvc, pha, pla, php,
/// plp, jsr, rts`.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn reference_instruction_set() -> InstructionSet {
    let mut next_opcode: u8 = 0x01;
    let mut opcode = move || {
        let value = next_opcode;
        next_opcode = next_opcode.wrapping_add(1);
        Byte(value)
    };

    let mut set = InstructionSet::builder()
        .header_step(&[PC_LOW_WRITE, MEM_ADDR_LOW_READ])
        .header_step(&[PC_HIGH_WRITE, MEM_ADDR_HIGH_READ])
        .header_step(&[MEM_WRITE, IB_READ, PC_INCREMENT])
        .footer(&[STEP_RESET, STATUS_LATCH]);

    set = set
        .instruction("hlt")
        .mode(Mode::None, Byte(0x00))
        .impl_always()
        .step(&[HALT])
        .end_impl()
        .end_mode()
        .end_instruction();

    set = set
        .instruction("nop")
        .mode(Mode::None, opcode())
        .impl_always()
        .end_impl()
        .end_mode()
        .end_instruction();

    for (name, src, dst) in [
        ("tax", "a", "x"),
        ("txa", "x", "a"),
        ("tay", "a", "y"),
        ("tya", "y", "a"),
    ] {
        let src_write = reg(src, "write");
        let dst_read = reg(dst, "read");
        set = set
            .instruction(name)
            .mode(Mode::None, opcode())
            .impl_always()
            .step(&[&src_write, &dst_read])
            .end_impl()
            .end_mode()
            .end_instruction();
    }

    set = set
        .instruction("sec")
        .mode(Mode::None, opcode())
        .impl_always()
        .step(&[ALU_CARRY_IN])
        .end_impl()
        .end_mode()
        .end_instruction();
    set = set
        .instruction("clc")
        .mode(Mode::None, opcode())
        .impl_always()
        .step(&[ALU_CARRY_IN_CLEAR])
        .end_impl()
        .end_mode()
        .end_instruction();

    // lda / ldx / ldy: direct memory -> register loads.
    for (name, dst) in [("lda", "a"), ("ldx", "x"), ("ldy", "y")] {
        let dst_read = reg(dst, "read");

        let imm = set.instruction(name).mode(Mode::Immediate, opcode());
        let imm = steps!(imm.impl_always(), fetch_byte_into(&dst_read));
        set = imm.end_impl().end_mode().end_instruction();

        let abs_mode = set.instruction(name).mode(Mode::Absolute, opcode());
        let mut seq = resolve_absolute_address();
        seq.push(Step::new(&[MEM_WRITE, &dst_read]));
        let abs_mode = steps!(abs_mode.impl_always(), seq);
        set = abs_mode.end_impl().end_mode().end_instruction();

        let zp_mode = set.instruction(name).mode(Mode::ZeroPage, opcode());
        let mut seq = resolve_zero_page_address();
        seq.push(Step::new(&[MEM_WRITE, &dst_read]));
        let zp_mode = steps!(zp_mode.impl_always(), seq);
        set = zp_mode.end_impl().end_mode().end_instruction();
    }
    // lda/ldy index off x, ldx indexes off y (classic 6502 asymmetry).
    for (name, dst, index_write) in [("lda", "a", "x.write"), ("ldy", "y", "x.write"), ("ldx", "x", "y.write")] {
        let dst_read = reg(dst, "read");
        let mode = set.instruction(name).mode(
            if name == "ldx" { Mode::IndexY } else { Mode::IndexX },
            opcode(),
        );
        let mut seq = resolve_absolute_address();
        seq.extend(add_index_into_address_low(index_write));
        seq.push(Step::new(&[MEM_WRITE, &dst_read]));
        let mode = steps!(mode.impl_always(), seq);
        set = mode.end_impl().end_mode().end_instruction();
    }

    // sta / stx / sty: direct register -> memory stores.
    for (name, src) in [("sta", "a"), ("stx", "x"), ("sty", "y")] {
        let src_write = reg(src, "write");

        let abs_mode = set.instruction(name).mode(Mode::Absolute, opcode());
        let mut seq = resolve_absolute_address();
        seq.push(Step::new(&[&src_write, MEM_READ]));
        let abs_mode = steps!(abs_mode.impl_always(), seq);
        set = abs_mode.end_impl().end_mode().end_instruction();

        let zp_mode = set.instruction(name).mode(Mode::ZeroPage, opcode());
        let mut seq = resolve_zero_page_address();
        seq.push(Step::new(&[&src_write, MEM_READ]));
        let zp_mode = steps!(zp_mode.impl_always(), seq);
        set = zp_mode.end_impl().end_mode().end_instruction();
    }
    {
        let mode = set.instruction("sta").mode(Mode::IndexX, opcode());
        let mut seq = resolve_absolute_address();
        seq.extend(add_index_into_address_low("x.write"));
        seq.push(Step::new(&[A_WRITE, MEM_READ]));
        let mode = steps!(mode.impl_always(), seq);
        set = mode.end_impl().end_mode().end_instruction();
    }

    // Binary ALU ops on the accumulator: immediate and absolute operands.
    for (name, writes_back) in [
        ("adc", true),
        ("sbc", true),
        ("and", true),
        ("ora", true),
        ("eor", true),
        ("cmp", false),
    ] {
        let op = match name {
            "ora" => "or",
            "eor" => "xor",
            "cmp" => "sbc",
            other => other,
        };
        let dst_read = if writes_back { Some(A_READ) } else { None };
        let extra: &[&str] = if name == "cmp" { &[ALU_CARRY_IN] } else { &[] };

        let imm = set.instruction(name).mode(Mode::Immediate, opcode());
        let mut seq = load_operand_immediate();
        seq.extend(execute_alu(A_WRITE, op, extra, dst_read));
        let imm = steps!(imm.impl_always(), seq);
        set = imm.end_impl().end_mode().end_instruction();

        let abs_mode = set.instruction(name).mode(Mode::Absolute, opcode());
        let mut seq = load_operand_absolute();
        seq.extend(execute_alu(A_WRITE, op, extra, dst_read));
        let abs_mode = steps!(abs_mode.impl_always(), seq);
        set = abs_mode.end_impl().end_mode().end_instruction();
    }

    // Unary ALU ops on the accumulator: no operand fetch at all.
    for (name, op) in [("asl", "shl"), ("lsr", "shr"), ("rol", "rol"), ("ror", "ror")] {
        let seq = execute_alu(A_WRITE, op, &[], Some(A_READ));
        let mode = set.instruction(name).mode(Mode::None, opcode());
        let mode = steps!(mode.impl_always(), seq);
        set = mode.end_impl().end_mode().end_instruction();
    }

    for (name, target) in [("inc", "a"), ("inx", "x"), ("iny", "y")] {
        let seq = increment_register(target);
        let mode = set.instruction(name).mode(Mode::None, opcode());
        let mode = steps!(mode.impl_always(), seq);
        set = mode.end_impl().end_mode().end_instruction();
    }
    for (name, target) in [("dec", "a"), ("dex", "x"), ("dey", "y")] {
        let seq = decrement_register(target);
        let mode = set.instruction(name).mode(Mode::None, opcode());
        let mode = steps!(mode.impl_always(), seq);
        set = mode.end_impl().end_mode().end_instruction();
    }

    // jmp / jsr / rts.
    {
        let mode = set.instruction("jmp").mode(Mode::Absolute, opcode());
        let mode = steps!(mode.impl_always(), jump_to_resolved_address(false));
        set = mode.end_impl().end_mode().end_instruction();
    }
    {
        let mode = set.instruction("jsr").mode(Mode::Absolute, opcode());
        let mode = steps!(mode.impl_always(), jump_to_resolved_address(true));
        set = mode.end_impl().end_mode().end_instruction();
    }
    {
        let mut seq = pop_into(PC_HIGH_READ);
        seq.extend(pop_into(PC_LOW_READ));
        let mode = set.instruction("rts").mode(Mode::None, opcode());
        let mode = steps!(mode.impl_always(), seq);
        set = mode.end_impl().end_mode().end_instruction();
    }

    // Stack ops.
    {
        let mode = set.instruction("pha").mode(Mode::None, opcode());
        let mode = steps!(mode.impl_always(), push_byte(A_WRITE));
        set = mode.end_impl().end_mode().end_instruction();
    }
    {
        let mode = set.instruction("pla").mode(Mode::None, opcode());
        let mode = steps!(mode.impl_always(), pop_into(A_READ));
        set = mode.end_impl().end_mode().end_instruction();
    }
    {
        let mode = set.instruction("php").mode(Mode::None, opcode());
        let mode = steps!(mode.impl_always(), push_byte(STATUS_WRITE));
        set = mode.end_impl().end_mode().end_instruction();
    }
    {
        let mode = set.instruction("plp").mode(Mode::None, opcode());
        let mode = steps!(mode.impl_always(), pop_into(STATUS_READ));
        set = mode.end_impl().end_mode().end_instruction();
    }

    // Conditional branches: two impls per mode, selected by a status
    // predicate, sharing one opcode.
    for (name, status, taken_on) in [
        ("beq", "alu.zero", true),
        ("bne", "alu.zero", false),
        ("bmi", "alu.negative", true),
        ("bpl", "alu.negative", false),
        ("bcs", "alu.carry_out", true),
        ("bcc", "alu.carry_out", false),
        ("bvs", "alu.overflow", true),
        ("bvc", "alu.overflow", false),
    ] {
        let mode = set.instruction(name).mode(Mode::Relative, opcode());
        let taken = mode.impl_when(&[(status, taken_on)]);
        let taken = steps!(taken, jump_to_resolved_address(false));
        let mode = taken.end_impl();
        let not_taken = mode.impl_when(&[(status, !taken_on)]);
        let not_taken = steps!(not_taken, resolve_absolute_address());
        let mode = not_taken.end_impl();
        set = mode.end_mode().end_instruction();
    }

    set.build().expect("reference instruction set is internally consistent")
}
