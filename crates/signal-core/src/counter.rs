//! `Counter`, `ProgramCounter`, `StackPointer`: registers specialized with
//! increment/decrement/reset semantics.

use signal::{Byte, Word};

use crate::component::{ComponentId, ComponentTree, NodeKind};
use crate::error::{BuildError, TickError};
use crate::phase::Phase;
use crate::register::{RegisterState, run_register_phase};

/// A `Register` plus an `increment` control that adds 1 during `Process`,
/// unless `reset` is also asserted this tick (reset wins).
#[derive(Debug, Clone, Copy)]
pub struct CounterState {
    pub(crate) register: RegisterState,
    pub increment: ComponentId,
}

/// A `WordRegister` plus top-level `increment`/`reset` controls that act on
/// the full 16-bit value directly (carry propagates from `low` into
/// `high`), bypassing `low`/`high`'s own write/read/reset pins — those
/// remain available for explicitly loading the counter from the bus.
#[derive(Debug, Clone, Copy)]
pub struct ProgramCounterState {
    pub low: ComponentId,
    pub high: ComponentId,
    pub increment: ComponentId,
    pub reset: ComponentId,
}

/// A `WordRegister` whose `increment`/`decrement` controls act on `low`
/// only (no carry into `high`), matching single-page stack-pointer wrap.
/// `high` is fixed at construction (conventionally `0x01`) and never
/// touched by increment/decrement.
#[derive(Debug, Clone, Copy)]
pub struct StackPointerState {
    pub low: ComponentId,
    pub high: ComponentId,
    pub increment: ComponentId,
    pub decrement: ComponentId,
}

impl ComponentTree {
    /// Adds a `Counter`: a `Register` with an extra `increment` control.
    pub fn add_counter(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
    ) -> Result<ComponentId, BuildError> {
        let id = self.push(Some(parent), name, NodeKind::Group)?;
        let write = self.add_control(id, "write", true)?;
        let read = self.add_control(id, "read", true)?;
        let reset = self.add_control(id, "reset", true)?;
        let increment = self.add_control(id, "increment", true)?;
        let register = RegisterState {
            value: Byte::ZERO,
            bus,
            write,
            read,
            reset,
        };
        *self.kind_mut(id) = NodeKind::Counter(CounterState { register, increment });
        Ok(id)
    }

    /// Adds a `ProgramCounter`: a `WordRegister` with its own
    /// `increment`/`reset` controls acting on the full 16-bit value.
    pub fn add_program_counter(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
    ) -> Result<ComponentId, BuildError> {
        let id = self.push(Some(parent), name, NodeKind::Group)?;
        let low = self.push_register(id, "low", bus)?;
        let high = self.push_register(id, "high", bus)?;
        let increment = self.add_control(id, "increment", true)?;
        let reset = self.add_control(id, "reset", true)?;
        *self.kind_mut(id) = NodeKind::ProgramCounter(ProgramCounterState {
            low,
            high,
            increment,
            reset,
        });
        Ok(id)
    }

    /// Adds a `StackPointer`: a `WordRegister` whose `increment`/`decrement`
    /// controls wrap within `high`'s fixed page.
    pub fn add_stack_pointer(
        &mut self,
        parent: ComponentId,
        name: &str,
        bus: ComponentId,
        page: Byte,
    ) -> Result<ComponentId, BuildError> {
        let id = self.push(Some(parent), name, NodeKind::Group)?;
        let low = self.push_register(id, "low", bus)?;
        let high = self.push_register(id, "high", bus)?;
        self.set_register_value(high, page);
        let increment = self.add_control(id, "increment", true)?;
        let decrement = self.add_control(id, "decrement", true)?;
        *self.kind_mut(id) = NodeKind::StackPointer(StackPointerState {
            low,
            high,
            increment,
            decrement,
        });
        Ok(id)
    }

    #[must_use]
    pub fn counter_value(&self, id: ComponentId) -> Byte {
        match self.kind(id) {
            NodeKind::Counter(state) => state.register.value,
            _ => Byte::ZERO,
        }
    }

    /// The `increment` control of a `Counter`, so a driver (the controller,
    /// asserting `step_counter.increment` every cycle) can raise it without
    /// reaching into `CounterState` directly.
    #[must_use]
    pub fn counter_increment_control(&self, id: ComponentId) -> ComponentId {
        match self.kind(id) {
            NodeKind::Counter(state) => state.increment,
            _ => id,
        }
    }

    #[must_use]
    pub fn program_counter_value(&self, id: ComponentId) -> Word {
        match self.kind(id) {
            NodeKind::ProgramCounter(state) => {
                Word::from((self.register_value(state.low), self.register_value(state.high)))
            }
            _ => Word(0),
        }
    }

    pub fn set_program_counter_value(&mut self, id: ComponentId, value: Word) {
        let children = match self.kind(id) {
            NodeKind::ProgramCounter(state) => Some((state.low, state.high)),
            _ => None,
        };
        if let Some((low, high)) = children {
            let (lo, hi) = value.lo_hi();
            self.set_register_value(low, lo);
            self.set_register_value(high, hi);
        }
    }

    #[must_use]
    pub fn stack_pointer_value(&self, id: ComponentId) -> Word {
        match self.kind(id) {
            NodeKind::StackPointer(state) => {
                Word::from((self.register_value(state.low), self.register_value(state.high)))
            }
            _ => Word(0),
        }
    }
}

pub(crate) fn run_counter_phase(
    tree: &mut ComponentTree,
    id: ComponentId,
    phase: Phase,
    state: &mut CounterState,
) -> Result<(), TickError> {
    run_register_phase(tree, id, phase, &mut state.register)?;
    if phase == Phase::Process
        && !tree.control_value(state.register.reset)
        && tree.control_value(state.increment)
    {
        state.register.value += 1u8;
    }
    Ok(())
}

pub(crate) fn run_program_counter_phase(
    tree: &mut ComponentTree,
    _id: ComponentId,
    phase: Phase,
    state: &ProgramCounterState,
) -> Result<(), TickError> {
    if phase != Phase::Process {
        return Ok(());
    }
    if tree.control_value(state.reset) {
        tree.set_register_value(state.low, Byte::ZERO);
        tree.set_register_value(state.high, Byte::ZERO);
    } else if tree.control_value(state.increment) {
        let current = Word::from((tree.register_value(state.low), tree.register_value(state.high)));
        let next = current + 1u16;
        let (lo, hi) = next.lo_hi();
        tree.set_register_value(state.low, lo);
        tree.set_register_value(state.high, hi);
    }
    Ok(())
}

pub(crate) fn run_stack_pointer_phase(
    tree: &mut ComponentTree,
    _id: ComponentId,
    phase: Phase,
    state: &StackPointerState,
) -> Result<(), TickError> {
    if phase != Phase::Process {
        return Ok(());
    }
    if tree.control_value(state.increment) {
        let low = tree.register_value(state.low) + 1u8;
        tree.set_register_value(state.low, low);
    } else if tree.control_value(state.decrement) {
        let low = tree.register_value(state.low) - 1u8;
        tree.set_register_value(state.low, low);
    }
    Ok(())
}
