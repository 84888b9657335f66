//! `Register` and `WordRegister`: bus-addressable byte/word storage with
//! `write`/`read`/`reset` control pins.

use signal::{Byte, Word};

use crate::component::{ComponentId, ComponentTree, NodeKind};
use crate::error::{BuildError, TickError};
use crate::phase::Phase;

/// State backing a `Register`: an 8-bit value plus the bus it reads/writes
/// and the three controls that drive its behavior.
#[derive(Debug, Clone, Copy)]
pub struct RegisterState {
    pub value: Byte,
    pub(crate) bus: ComponentId,
    pub write: ComponentId,
    pub read: ComponentId,
    pub reset: ComponentId,
}

impl RegisterState {
    fn placeholder(bus: ComponentId) -> Self {
        // write/read/reset are overwritten immediately by `add_register`,
        // before any phase ever runs against this node.
        RegisterState {
            value: Byte::ZERO,
            bus,
            write: bus,
            read: bus,
            reset: bus,
        }
    }
}

/// State backing a `WordRegister`: a pure container composing two `Register`
/// children named `low` and `high`. It owns no controls of its own — each
/// half is driven independently.
#[derive(Debug, Clone, Copy)]
pub struct WordRegisterState {
    pub low: ComponentId,
    pub high: ComponentId,
}

impl ComponentTree {
    /// Adds a `Register`: an 8-bit value with `write`/`read`/`reset`
    /// controls, bus-addressable via `bus`.
    pub fn add_register(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
    ) -> Result<ComponentId, BuildError> {
        let id = self.push_register(parent, name, bus)?;
        Ok(id)
    }

    pub(crate) fn push_register(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
    ) -> Result<ComponentId, BuildError> {
        let id = self.push(
            Some(parent),
            name,
            NodeKind::Register(RegisterState::placeholder(bus)),
        )?;
        let write = self.add_control(id, "write", true)?;
        let read = self.add_control(id, "read", true)?;
        let reset = self.add_control(id, "reset", true)?;
        if let NodeKind::Register(state) = self.kind_mut(id) {
            state.write = write;
            state.read = read;
            state.reset = reset;
        }
        Ok(id)
    }

    /// Adds a `WordRegister`: a `low`/`high` pair of `Register`s sharing
    /// `bus`, whose combined value is `(high << 8) | low`.
    pub fn add_word_register(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
    ) -> Result<ComponentId, BuildError> {
        let id = self.push(Some(parent), name, NodeKind::Group)?;
        let low = self.push_register(id, "low", bus)?;
        let high = self.push_register(id, "high", bus)?;
        *self.kind_mut(id) = NodeKind::WordRegister(WordRegisterState { low, high });
        Ok(id)
    }

    #[must_use]
    pub fn register_value(&self, id: ComponentId) -> Byte {
        match self.kind(id) {
            NodeKind::Register(state) => state.value,
            _ => Byte::ZERO,
        }
    }

    pub fn set_register_value(&mut self, id: ComponentId, value: Byte) {
        if let NodeKind::Register(state) = self.kind_mut(id) {
            state.value = value;
        }
    }

    #[must_use]
    pub fn word_register_value(&self, id: ComponentId) -> Word {
        match self.kind(id) {
            NodeKind::WordRegister(state) => {
                Word::from((self.register_value(state.low), self.register_value(state.high)))
            }
            _ => Word(0),
        }
    }

    pub fn set_word_register_value(&mut self, id: ComponentId, value: Word) {
        let (low, high) = value.lo_hi();
        let children = match self.kind(id) {
            NodeKind::WordRegister(state) => Some((state.low, state.high)),
            _ => None,
        };
        if let Some((low_id, high_id)) = children {
            self.set_register_value(low_id, low);
            self.set_register_value(high_id, high);
        }
    }
}

pub(crate) fn run_register_phase(
    tree: &mut ComponentTree,
    id: ComponentId,
    phase: Phase,
    state: &mut RegisterState,
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
        Phase::Control | Phase::Clear => {}
    }
    Ok(())
}
