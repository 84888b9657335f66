//! `Memory`: a 16-bit addressable byte store, bus-mediated at `address`.

use alloc::collections::BTreeMap;

use signal::{Byte, Word};

use crate::component::{ComponentId, ComponentTree, NodeKind};
use crate::error::{BuildError, TickError};
use crate::phase::Phase;

/// State backing the `Memory` component: an `address` `WordRegister`, a
/// sparse byte store (absent addresses read as `0x00`), and the `write`/
/// `read` controls that gate the bus transfer at `address`.
pub struct MemoryState {
    pub address: ComponentId,
    pub(crate) bus: ComponentId,
    pub write: ComponentId,
    pub read: ComponentId,
    pub(crate) data: BTreeMap<u16, Byte>,
}

impl ComponentTree {
    /// Adds a `Memory`: an `address` `WordRegister` plus `write`/`read`
    /// controls gating a byte transfer between the bus and `data[address]`.
    pub fn add_memory(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
    ) -> Result<ComponentId, BuildError> {
        let id = self.push(Some(parent), name, NodeKind::Group)?;
        let address = self.add_word_register(id, "address", bus)?;
        let write = self.add_control(id, "write", true)?;
        let read = self.add_control(id, "read", true)?;
        *self.kind_mut(id) = NodeKind::Memory(MemoryState {
            address,
            bus,
            write,
            read,
            data: BTreeMap::new(),
        });
        Ok(id)
    }

    /// Bulk-loads a memory image, bypassing the bus (used to install an
    /// assembled program before the first tick).
    pub fn memory_load(&mut self, id: ComponentId, image: &BTreeMap<Word, Byte>) {
        if let NodeKind::Memory(state) = self.kind_mut(id) {
            for (&addr, &value) in image {
                state.data.insert(addr.0, value);
            }
        }
    }

    /// Reads a single byte directly, bypassing the bus. Useful for test
    /// assertions and inspection, not part of the tick pipeline.
    #[must_use]
    pub fn memory_peek(&self, id: ComponentId, address: Word) -> Byte {
        match self.kind(id) {
            NodeKind::Memory(state) => state.data.get(&address.0).copied().unwrap_or(Byte::ZERO),
            _ => Byte::ZERO,
        }
    }

    /// Writes a single byte directly, bypassing the bus.
    pub fn memory_poke(&mut self, id: ComponentId, address: Word, value: Byte) {
        if let NodeKind::Memory(state) = self.kind_mut(id) {
            state.data.insert(address.0, value);
        }
    }
}

pub(crate) fn run_memory_phase(
    tree: &mut ComponentTree,
    id: ComponentId,
    phase: Phase,
    state: &mut MemoryState,
) -> Result<(), TickError> {
    match phase {
        Phase::Write => {
            if tree.control_value(state.write) {
                let address = tree.word_register_value(state.address);
                let value = state.data.get(&address.0).copied().unwrap_or(Byte::ZERO);
                tree.bus_write(state.bus, id, value)?;
            }
        }
        Phase::Read => {
            if tree.control_value(state.read) {
                let address = tree.word_register_value(state.address);
                let value = tree.bus_read_or_err(state.bus, id)?;
                state.data.insert(address.0, value);
            }
        }
        Phase::Control | Phase::Process | Phase::Clear => {}
    }
    Ok(())
}
