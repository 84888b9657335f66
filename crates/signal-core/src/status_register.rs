//! `StatusRegister`: a `Register` plus a `Format` that packs named statuses
//! into a byte on `latch`.

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use signal::Byte;

use crate::component::{ComponentId, ComponentTree, NodeKind};
use crate::error::{BuildError, TickError};
use crate::phase::Phase;

/// One entry of a status register's bit layout: which status feeds which
/// bit (0..8) of the latched byte.
#[derive(Debug, Clone)]
pub struct FormatEntry {
    pub status_path: String,
    pub bit: u8,
}

/// The default 6502-style `P`-register layout: `N` (bit 7), `V` (bit 6),
/// `Z` (bit 1), `C` (bit 0), relative to an ALU named `alu`.
#[must_use]
pub fn default_format() -> Vec<FormatEntry> {
    vec![
        FormatEntry {
            status_path: "alu.negative".to_string(),
            bit: 7,
        },
        FormatEntry {
            status_path: "alu.overflow".to_string(),
            bit: 6,
        },
        FormatEntry {
            status_path: "alu.zero".to_string(),
            bit: 1,
        },
        FormatEntry {
            status_path: "alu.carry_out".to_string(),
            bit: 0,
        },
    ]
}

/// State backing the `StatusRegister` component.
pub struct StatusRegisterState {
    pub value: Byte,
    pub write: ComponentId,
    pub read: ComponentId,
    pub reset: ComponentId,
    pub latch: ComponentId,
    pub(crate) bus: ComponentId,
    pub(crate) format: Vec<FormatEntry>,
    pub(crate) resolved: Vec<(ComponentId, u8)>,
}

impl ComponentTree {
    /// Adds a `StatusRegister`: a `Register` plus `latch` (non-auto-clear)
    /// and an unresolved `format`. Call [`ComponentTree::resolve_status_register`]
    /// once the whole tree (and in particular every status the format
    /// names) has been built.
    pub fn add_status_register(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
        format: Vec<FormatEntry>,
    ) -> Result<ComponentId, BuildError> {
        for entry in &format {
            if entry.bit >= 8 {
                return Err(BuildError::StatusIndexOutOfRange {
                    bit: entry.bit as usize,
                });
            }
        }
        for (i, a) in format.iter().enumerate() {
            for b in &format[i + 1..] {
                if a.bit == b.bit {
                    return Err(BuildError::DuplicateControlBit {
                        bit: a.bit as usize,
                        first: a.status_path.clone(),
                        second: b.status_path.clone(),
                    });
                }
            }
        }
        let id = self.push(Some(parent), name, NodeKind::Group)?;
        let write = self.add_control(id, "write", true)?;
        let read = self.add_control(id, "read", true)?;
        let reset = self.add_control(id, "reset", true)?;
        let latch = self.add_control(id, "latch", false)?;
        *self.kind_mut(id) = NodeKind::StatusRegister(StatusRegisterState {
            value: Byte::ZERO,
            write,
            read,
            reset,
            latch,
            bus,
            format,
            resolved: Vec::new(),
        });
        Ok(id)
    }

    /// Resolves a status register's format paths against `root`, failing
    /// with [`TickError::MissingStatus`] if any name doesn't exist.
    pub fn resolve_status_register(
        &mut self,
        id: ComponentId,
        root: ComponentId,
    ) -> Result<(), TickError> {
        let format = match self.kind(id) {
            NodeKind::StatusRegister(state) => state.format.clone(),
            _ => return Ok(()),
        };
        let mut resolved = Vec::with_capacity(format.len());
        for entry in &format {
            let status_id = self
                .child_by_path(root, &entry.status_path)
                .ok_or_else(|| TickError::MissingStatus(entry.status_path.clone()))?;
            resolved.push((status_id, entry.bit));
        }
        if let NodeKind::StatusRegister(state) = self.kind_mut(id) {
            state.resolved = resolved;
        }
        Ok(())
    }

    #[must_use]
    pub fn status_register_value(&self, id: ComponentId) -> Byte {
        match self.kind(id) {
            NodeKind::StatusRegister(state) => state.value,
            _ => Byte::ZERO,
        }
    }
}

pub(crate) fn run_status_register_phase(
    tree: &mut ComponentTree,
    id: ComponentId,
    phase: Phase,
    state: &mut StatusRegisterState,
) -> Result<(), TickError> {
    match phase {
        Phase::Write => {
            if tree.control_value(state.write) {
                tree.bus_write(state.bus, id, state.value)?;
            }
        }
        Phase::Read => {
            if tree.control_value(state.read) {
                state.value = tree.bus_read_or_err(state.bus, id)?;
            }
        }
        Phase::Process => {
            if tree.control_value(state.reset) {
                state.value = Byte::ZERO;
            }
        }
        Phase::Clear => {
            if tree.control_value(state.latch) {
                let mut packed: u8 = 0;
                for &(status_id, bit) in &state.resolved {
                    if tree.status_value(status_id) {
                        packed |= 1 << bit;
                    }
                }
                state.value = Byte(packed);
                tree.set_control(state.latch, false);
            }
        }
        Phase::Control => {}
    }
    Ok(())
}
