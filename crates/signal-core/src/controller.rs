//! `Controller`: the microcoded heart of the machine. Each `Control` phase
//! it decodes `(opcode, status bits, step)`, looks up the asserted controls
//! in the compiled [`MicrocodeRom`], and raises them.

use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;

use log::trace;

use crate::component::{ComponentId, ComponentTree, NodeKind};
use crate::error::TickError;
use crate::microcode::MicrocodeRom;
use crate::phase::Phase;
use crate::status_register::FormatEntry;

/// State backing the `Controller` component. `status` is the §4.6 output
/// `StatusRegister`, latched on the instruction's last step — it is
/// deliberately *not* what the ROM lookup decodes from, since the ROM's
/// `statuses_index` can exceed the 8 bits a `StatusRegister` byte holds.
/// `resolved_controls`/`resolved_statuses` are the ROM's index entries
/// resolved to live `ComponentId`s once, at construction, per §9's
/// "precompute `{path → &Control}` maps" note.
pub struct ControllerState {
    pub step_counter: ComponentId,
    pub instruction_buffer: ComponentId,
    pub status: ComponentId,
    pub(crate) rom: Arc<MicrocodeRom>,
    pub(crate) resolved_controls: Vec<ComponentId>,
    pub(crate) resolved_statuses: Vec<ComponentId>,
}

impl ComponentTree {
    /// Adds a `Controller`: `step_counter` (byte `Counter`), `instruction_buffer`
    /// (byte `Register`), an output `status` `StatusRegister`, and the
    /// compiled ROM. Every control/status path the ROM names is resolved
    /// against `root` immediately, failing with `MissingControl`/
    /// `MissingStatus` if the tree doesn't contain it.
    pub fn add_controller(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
        root: ComponentId,
        rom: Arc<MicrocodeRom>,
        status_format: Vec<FormatEntry>,
    ) -> Result<ComponentId, TickError> {
        let id = self
            .add_group(Some(parent), name)
            .map_err(|_| TickError::MissingControl(name.to_string()))?;
        let step_counter = self
            .add_counter(id, "step_counter", bus)
            .map_err(|_| TickError::MissingControl("step_counter".to_string()))?;
        let instruction_buffer = self
            .add_register(id, "instruction_buffer", bus)
            .map_err(|_| TickError::MissingControl("instruction_buffer".to_string()))?;
        let status = self
            .add_status_register(id, "status", bus, status_format)
            .map_err(|_| TickError::MissingStatus("status".to_string()))?;

        let mut resolved_controls = Vec::with_capacity(rom.controls_index.len());
        for path in &rom.controls_index {
            let control_id = self
                .child_by_path(root, path)
                .ok_or_else(|| TickError::MissingControl(path.clone()))?;
            resolved_controls.push(control_id);
        }
        let mut resolved_statuses = Vec::with_capacity(rom.statuses_index.len());
        for path in &rom.statuses_index {
            let status_id = self
                .child_by_path(root, path)
                .ok_or_else(|| TickError::MissingStatus(path.clone()))?;
            resolved_statuses.push(status_id);
        }

        *self.kind_mut(id) = NodeKind::Controller(ControllerState {
            step_counter,
            instruction_buffer,
            status,
            rom,
            resolved_controls,
            resolved_statuses,
        });
        Ok(id)
    }
}

/// Only the `Control` phase does anything here: the controller's children
/// (`step_counter`, `instruction_buffer`, `status`) are ordinary tree nodes,
/// visited and driven by their own dispatch during every other phase.
pub(crate) fn run_controller_phase(
    tree: &mut ComponentTree,
    _id: ComponentId,
    phase: Phase,
    state: &ControllerState,
) -> Result<(), TickError> {
    if phase != Phase::Control {
        return Ok(());
    }

    let opcode = tree.register_value(state.instruction_buffer);
    let step_index = tree.counter_value(state.step_counter).0 as usize;

    let mut status_word: usize = 0;
    for (bit, &status_id) in state.resolved_statuses.iter().enumerate() {
        if tree.status_value(status_id) {
            status_word |= 1 << bit;
        }
    }

    let bitmap = state
        .rom
        .get(opcode, status_word, step_index)
        .ok_or(TickError::MicrocodeMiss {
            opcode,
            status_word: status_word as u32,
            step: step_index,
        })?
        .clone();

    trace!(
        "controller: opcode={opcode:?} step={step_index} status_word={status_word:#x} controls={}",
        bitmap.len()
    );

    for bit in bitmap {
        let control_id = *state
            .resolved_controls
            .get(bit)
            .ok_or_else(|| TickError::MissingControl(alloc::format!("#{bit}")))?;
        tree.set_control(control_id, true);
    }

    let increment = tree.counter_increment_control(state.step_counter);
    tree.set_control(increment, true);
    Ok(())
}
