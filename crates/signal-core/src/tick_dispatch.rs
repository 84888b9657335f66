//! Dispatches one phase's worth of work for a single component, by kind.
//!
//! Lives apart from `component.rs` because `run_phase_at` needs to call it
//! while a node's kind is moved out of the arena (see the `mem::replace` in
//! `ComponentTree::run_phase_at`); keeping the match here, rather than as a
//! method on `NodeKind`, keeps that borrow trick contained to one file.

use crate::alu::run_alu_phase;
use crate::component::{ComponentId, ComponentTree, NodeKind};
use crate::controller::run_controller_phase;
use crate::counter::{run_counter_phase, run_program_counter_phase, run_stack_pointer_phase};
use crate::error::TickError;
use crate::memory::run_memory_phase;
use crate::phase::Phase;
use crate::register::run_register_phase;
use crate::status_register::run_status_register_phase;

pub(crate) fn run(
    tree: &mut ComponentTree,
    id: ComponentId,
    phase: Phase,
    kind: &mut NodeKind,
) -> Result<(), TickError> {
    match kind {
        NodeKind::Control(state) => {
            // A non-auto-clear control's dedicated `clear` child, once
            // asserted, forces the parent back to false. The `clear` child
            // itself is auto-clear and is swept away below by
            // `ComponentTree::sweep_auto_clear`.
            if phase == Phase::Clear
                && !state.auto_clear
                && let Some(clear_id) = tree.child(id, "clear")
                && tree.control_value(clear_id)
            {
                state.value = false;
            }
            Ok(())
        }
        NodeKind::Status(_) => Ok(()),
        NodeKind::Bus(_) => {
            if phase == Phase::Clear {
                tree.bus_clear(id);
            }
            Ok(())
        }
        NodeKind::Register(state) => run_register_phase(tree, id, phase, state),
        NodeKind::WordRegister(_) => Ok(()),
        NodeKind::ProgramCounter(state) => run_program_counter_phase(tree, id, phase, state),
        NodeKind::StackPointer(state) => run_stack_pointer_phase(tree, id, phase, state),
        NodeKind::Counter(state) => run_counter_phase(tree, id, phase, state),
        NodeKind::Alu(state) => run_alu_phase(tree, id, phase, state),
        NodeKind::Memory(state) => run_memory_phase(tree, id, phase, state),
        NodeKind::StatusRegister(state) => run_status_register_phase(tree, id, phase, state),
        NodeKind::Controller(state) => run_controller_phase(tree, id, phase, state),
        NodeKind::Group | NodeKind::Empty => Ok(()),
    }
}
