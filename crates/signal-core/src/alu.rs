//! `Alu`: a 9-operation combinational unit (ADC/SBC/AND/OR/XOR/SHL/SHR/ROL/ROR)
//! with flag outputs, built on [`signal::ByteOps`].

use alloc::vec::Vec;

use signal::{Byte, ByteOps};

use crate::component::{ComponentId, ComponentTree, NodeKind};
use crate::error::{BuildError, TickError};
use crate::phase::Phase;

/// One ALU operation: a name (for the sorted opcode assignment in §6) and
/// the pure function that implements it.
#[derive(Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    pub apply: fn(Byte, Byte, bool) -> signal::FlaggedByte,
}

/// The fixed 9-operation set, sorted by name so the on-wire opcode
/// assignment (`index + 1`) is reproducible from the name alone.
pub const OPERATIONS: [Operation; 9] = [
    Operation {
        name: "adc",
        apply: ByteOps::add,
    },
    Operation {
        name: "and",
        apply: |a, b, _carry| ByteOps::and(a, b),
    },
    Operation {
        name: "or",
        apply: |a, b, _carry| ByteOps::or(a, b),
    },
    Operation {
        name: "rol",
        apply: |a, _b, carry| ByteOps::roll_left(a, carry),
    },
    Operation {
        name: "ror",
        apply: |a, _b, carry| ByteOps::roll_right(a, carry),
    },
    Operation {
        name: "sbc",
        apply: ByteOps::sub,
    },
    Operation {
        name: "shl",
        apply: |a, _b, _carry| ByteOps::shift_left(a),
    },
    Operation {
        name: "shr",
        apply: |a, _b, _carry| ByteOps::shift_right(a),
    },
    Operation {
        name: "xor",
        apply: |a, b, _carry| ByteOps::xor(a, b),
    },
];

/// Number of control bits needed to encode `0..=OPERATIONS.len()`
/// (`0` reserved for "inactive").
#[must_use]
pub const fn opcode_bits() -> u32 {
    let n = OPERATIONS.len() as u32 + 1;
    // ceil(log2(n))
    let mut bits = 0;
    let mut capacity: u32 = 1;
    while capacity < n {
        capacity <<= 1;
        bits += 1;
    }
    bits
}

/// State backing the `Alu` component.
#[derive(Debug, Clone)]
pub struct AluState {
    pub lhs: ComponentId,
    pub rhs: ComponentId,
    pub output: ComponentId,
    pub carry_in: ComponentId,
    pub rhs_one: ComponentId,
    pub opcode_bits: Vec<ComponentId>,
    pub carry_out: ComponentId,
    pub zero: ComponentId,
    pub negative: ComponentId,
    pub overflow: ComponentId,
    pub half_carry: ComponentId,
}

impl ComponentTree {
    /// Adds an `Alu`: `lhs`/`rhs`/`output` registers on `bus`, a sticky
    /// `carry_in`, an `rhs_one` control, `ceil(log2(N+1))` `opcode_k`
    /// control bits, and the five status outputs.
    pub fn add_alu(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
    ) -> Result<ComponentId, BuildError> {
        let id = self.push(Some(parent), name, NodeKind::Group)?;
        let lhs = self.push_register(id, "lhs", bus)?;
        let rhs = self.push_register(id, "rhs", bus)?;
        let output = self.push_register(id, "output", bus)?;
        let carry_in = self.add_control(id, "carry_in", false)?;
        let rhs_one = self.add_control(id, "rhs_one", true)?;
        let mut opcode_ids = Vec::with_capacity(opcode_bits() as usize);
        for k in 0..opcode_bits() {
            opcode_ids.push(self.add_control(id, &alloc::format!("opcode_{k}"), true)?);
        }
        let carry_out = self.add_status(id, "carry_out")?;
        let zero = self.add_status(id, "zero")?;
        let negative = self.add_status(id, "negative")?;
        let overflow = self.add_status(id, "overflow")?;
        let half_carry = self.add_status(id, "half_carry")?;
        *self.kind_mut(id) = NodeKind::Alu(AluState {
            lhs,
            rhs,
            output,
            carry_in,
            rhs_one,
            opcode_bits: opcode_ids,
            carry_out,
            zero,
            negative,
            overflow,
            half_carry,
        });
        Ok(id)
    }

    #[must_use]
    pub fn alu_output(&self, id: ComponentId) -> Byte {
        match self.kind(id) {
            NodeKind::Alu(state) => self.register_value(state.output),
            _ => Byte::ZERO,
        }
    }
}

fn decode_opcode(tree: &ComponentTree, bits: &[ComponentId]) -> usize {
    bits.iter()
        .enumerate()
        .filter(|(_, &id)| tree.control_value(id))
        .map(|(k, _)| 1usize << k)
        .sum()
}

pub(crate) fn run_alu_phase(
    tree: &mut ComponentTree,
    _id: ComponentId,
    phase: Phase,
    state: &AluState,
) -> Result<(), TickError> {
    match phase {
        Phase::Read => {
            if tree.control_value(state.rhs_one) {
                tree.set_register_value(state.rhs, Byte(0x01));
            }
        }
        Phase::Process => {
            let opcode = decode_opcode(tree, &state.opcode_bits);
            if opcode != 0 && opcode <= OPERATIONS.len() {
                let op = OPERATIONS[opcode - 1];
                let lhs = tree.register_value(state.lhs);
                let rhs = tree.register_value(state.rhs);
                let carry_in = tree.control_value(state.carry_in);
                let result = (op.apply)(lhs, rhs, carry_in);
                tree.set_register_value(state.output, result.value);
                tree.set_status(state.carry_out, result.carry);
                tree.set_status(state.zero, result.zero);
                tree.set_status(state.negative, result.negative);
                tree.set_status(state.overflow, result.overflow);
                tree.set_status(state.half_carry, result.half_carry);
                tree.set_control(state.carry_in, result.carry);
            }
        }
        Phase::Control | Phase::Write | Phase::Clear => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_are_sorted_by_name() {
        let mut names: Vec<&str> = OPERATIONS.iter().map(|op| op.name).collect();
        let sorted = {
            let mut copy = names.clone();
            copy.sort_unstable();
            copy
        };
        assert_eq!(names, sorted);
        names.dedup();
        assert_eq!(names.len(), OPERATIONS.len());
    }

    #[test]
    fn opcode_bits_fits_nine_operations_plus_inactive() {
        assert_eq!(opcode_bits(), 4);
    }
}
