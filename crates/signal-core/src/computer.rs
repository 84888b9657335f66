//! `Computer`: a `Memory + ProgramCounter + Controller + ALU + optional
//! StackPointer + user-defined registers + halt control`, all sharing one
//! `Bus`, ticked through the five-phase pipeline in [`crate::phase`].

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

use log::debug;
use signal::{Byte, Word};

use crate::component::{ComponentId, ComponentTree, NodeKind};
use crate::error::{ComputerError, TickError};
use crate::instruction::InstructionSet;
use crate::microcode::{MicrocodeAssembler, MicrocodeRom};
use crate::phase::Phase;
use crate::status_register::default_format;

/// A fully wired machine: the compiled [`InstructionSet`]/[`MicrocodeRom`]
/// are shared, immutable, and built once, per §9's "Global/module state"
/// note — no per-tick recompilation, no class-level cache.
pub struct Computer {
    tree: ComponentTree,
    root: ComponentId,
    memory: ComponentId,
    program_counter: ComponentId,
    controller: ComponentId,
    alu: ComponentId,
    stack_pointer: Option<ComponentId>,
    halt: ComponentId,
    registers: BTreeMap<String, ComponentId>,
    #[allow(dead_code)]
    instructions: Arc<InstructionSet>,
    #[allow(dead_code)]
    rom: Arc<MicrocodeRom>,
}

impl Computer {
    /// Builds a fresh machine around `instructions`: compiles its microcode
    /// ROM, constructs the component tree (`memory`, `pc`, `alu`, an
    /// optional `sp` with its high byte fixed to `stack_page`, one register
    /// per name in `register_names`, and a `controller` wired to the
    /// compiled ROM with the default 6502-style status format), and
    /// resolves every control/status path the ROM names.
    pub fn new(
        instructions: Arc<InstructionSet>,
        register_names: &[&str],
        stack_page: Option<Byte>,
    ) -> Result<Self, ComputerError> {
        let rom = Arc::new(MicrocodeAssembler::assemble(&instructions)?);
        debug!(
            "computer: compiled rom with {} controls, {} statuses, step_bits={}",
            rom.controls_index.len(),
            rom.statuses_index.len(),
            rom.step_bits
        );

        let mut tree = ComponentTree::new();
        let root = tree.add_group(None, "computer")?;
        let bus = tree.add_bus(root, "bus")?;
        let memory = tree.add_memory(root, "memory", bus)?;
        let program_counter = tree.add_program_counter(root, "pc", bus)?;
        let alu = tree.add_alu(root, "alu", bus)?;
        let stack_pointer = match stack_page {
            Some(page) => Some(tree.add_stack_pointer(root, "sp", bus, page)?),
            None => None,
        };
        let halt = tree.add_control(root, "halt", false)?;

        let mut registers = BTreeMap::new();
        for &name in register_names {
            let id = tree.add_register(root, name, bus)?;
            registers.insert(name.to_string(), id);
        }

        let controller =
            tree.add_controller(root, "controller", bus, root, Arc::clone(&rom), default_format())?;
        let status_id = match tree.kind(controller) {
            NodeKind::Controller(state) => state.status,
            _ => unreachable!("add_controller always installs NodeKind::Controller"),
        };
        tree.resolve_status_register(status_id, root)?;
        tree.freeze(root);

        Ok(Computer {
            tree,
            root,
            memory,
            program_counter,
            controller,
            alu,
            stack_pointer,
            halt,
            registers,
            instructions,
            rom,
        })
    }

    /// Installs a memory image, bypassing the bus.
    pub fn load(&mut self, image: &BTreeMap<Word, Byte>) {
        self.tree.memory_load(self.memory, image);
    }

    /// Runs exactly one tick: the five phases in order, then sweeps
    /// auto-clear controls back to `false`.
    pub fn tick(&mut self) -> Result<(), TickError> {
        for phase in Phase::ALL {
            self.tree.run_phase(self.root, phase)?;
        }
        self.tree.sweep_auto_clear();
        Ok(())
    }

    /// Ticks until `halt` is observed asserted, returning the tick count.
    pub fn tick_until_halt(&mut self) -> Result<usize, TickError> {
        let mut ticks = 0usize;
        while !self.halted() {
            self.tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }

    /// As [`Computer::tick_until_halt`], but fails with `HaltTimeout` if
    /// `halt` isn't asserted within `budget` ticks.
    pub fn tick_until_halt_with_budget(&mut self, budget: usize) -> Result<usize, TickError> {
        let mut ticks = 0usize;
        while !self.halted() {
            if ticks >= budget {
                return Err(TickError::HaltTimeout(budget));
            }
            self.tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }

    #[must_use]
    pub fn halted(&self) -> bool {
        self.tree.control_value(self.halt)
    }

    #[must_use]
    pub fn register(&self, name: &str) -> Byte {
        self.registers
            .get(name)
            .map_or(Byte::ZERO, |&id| self.tree.register_value(id))
    }

    #[must_use]
    pub fn program_counter(&self) -> Word {
        self.tree.program_counter_value(self.program_counter)
    }

    #[must_use]
    pub fn stack_pointer(&self) -> Option<Word> {
        self.stack_pointer.map(|id| self.tree.stack_pointer_value(id))
    }

    #[must_use]
    pub fn alu_output(&self) -> Byte {
        self.tree.alu_output(self.alu)
    }

    #[must_use]
    pub fn memory_peek(&self, address: Word) -> Byte {
        self.tree.memory_peek(self.memory, address)
    }

    /// The controller's latched status byte (see §4.6's default format).
    #[must_use]
    pub fn status(&self) -> Byte {
        match self.tree.kind(self.controller) {
            NodeKind::Controller(state) => self.tree.status_register_value(state.status),
            _ => Byte::ZERO,
        }
    }

    /// Direct access to the underlying component tree, for introspection
    /// (e.g. `asserted_control_paths()`) that the typed accessors above
    /// don't cover.
    #[must_use]
    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }
}
