//! The component tree: an arena of named, parented nodes plus the per-kind
//! state the rest of the crate hangs off of.
//!
//! Every simulated element — a single control line, a register, the ALU,
//! the whole computer — is a node in one flat arena, addressed by
//! [`ComponentId`]. Parent/child links are plain indices, not `Rc`/`RefCell`
//! cycles, per the tree's lifetime following construction order: nothing is
//! ever removed.

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::alu::AluState;
use crate::bus::BusState;
use crate::control::ControlState;
use crate::controller::ControllerState;
use crate::counter::{CounterState, ProgramCounterState, StackPointerState};
use crate::error::{BuildError, TickError};
use crate::memory::MemoryState;
use crate::phase::Phase;
use crate::register::{RegisterState, WordRegisterState};
use crate::status::StatusState;
use crate::status_register::StatusRegisterState;

/// An index into a [`ComponentTree`]'s arena. Cheap to copy, stable for the
/// tree's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub(crate) usize);

pub(crate) struct Node {
    pub name: String,
    pub parent: Option<ComponentId>,
    pub children: Vec<ComponentId>,
    pub kind: NodeKind,
}

/// The closed set of component kinds a tree can contain.
pub(crate) enum NodeKind {
    Control(ControlState),
    Status(StatusState),
    Bus(BusState),
    Register(RegisterState),
    WordRegister(WordRegisterState),
    ProgramCounter(ProgramCounterState),
    StackPointer(StackPointerState),
    Counter(CounterState),
    Alu(AluState),
    Memory(MemoryState),
    StatusRegister(StatusRegisterState),
    Controller(ControllerState),
    /// A plain named container with no tick behavior of its own
    /// (the computer root, a controller's grouping node, and so on).
    Group,
    /// Placeholder used only while a node's kind is moved out during phase
    /// dispatch; never observed outside `ComponentTree::run_phase`.
    Empty,
}

/// The arena holding every component in a simulated machine, plus the
/// cached `controls`/`statuses` subtree indexes spec.md §3 requires.
pub struct ComponentTree {
    pub(crate) nodes: Vec<Node>,
    controls_cache: Option<Vec<ComponentId>>,
    statuses_cache: Option<Vec<ComponentId>>,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    #[must_use]
    pub fn new() -> Self {
        ComponentTree {
            nodes: Vec::new(),
            controls_cache: None,
            statuses_cache: None,
        }
    }

    pub(crate) fn push(
        &mut self,
        parent: Option<ComponentId>,
        name: &str,
        kind: NodeKind,
    ) -> Result<ComponentId, BuildError> {
        if let Some(parent_id) = parent
            && self.nodes[parent_id.0]
                .children
                .iter()
                .any(|child| self.nodes[child.0].name == name)
        {
            return Err(BuildError::DuplicateChildName {
                parent: self.path(parent_id),
                name: name.to_string(),
            });
        }
        let id = ComponentId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        self.controls_cache = None;
        self.statuses_cache = None;
        Ok(id)
    }

    pub(crate) fn add_group(
        &mut self,
        parent: Option<ComponentId>,
        name: &str,
    ) -> Result<ComponentId, BuildError> {
        self.push(parent, name, NodeKind::Group)
    }

    /// Adds a `Bus` component: a single-cycle shared byte channel.
    pub fn add_bus(
        &mut self,
        parent: ComponentId,
        name: &str,
    ) -> Result<ComponentId, BuildError> {
        self.push(Some(parent), name, NodeKind::Bus(BusState::default()))
    }

    /// Adds a named 1-bit control signal. `auto_clear = false` marks a
    /// sticky control (`carry_in`, `halt`, a status register's `latch`);
    /// such controls get a companion `clear` sub-control automatically.
    pub fn add_control(
        &mut self,
        parent: ComponentId,
        name: &str,
        auto_clear: bool,
    ) -> Result<ComponentId, BuildError> {
        let id = self.push(
            Some(parent),
            name,
            NodeKind::Control(ControlState {
                value: false,
                auto_clear,
            }),
        )?;
        if !auto_clear {
            self.push(
                Some(id),
                "clear",
                NodeKind::Control(ControlState {
                    value: false,
                    auto_clear: true,
                }),
            )?;
        }
        Ok(id)
    }

    pub fn add_status(
        &mut self,
        parent: ComponentId,
        name: &str,
    ) -> Result<ComponentId, BuildError> {
        self.push(
            Some(parent),
            name,
            NodeKind::Status(StatusState { value: false }),
        )
    }

    pub(crate) fn node(&self, id: ComponentId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: ComponentId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn kind(&self, id: ComponentId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub(crate) fn kind_mut(&mut self, id: ComponentId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    #[must_use]
    pub fn name(&self, id: ComponentId) -> &str {
        &self.nodes[id.0].name
    }

    /// Dotted path from the root down to `id` (e.g. `alu.lhs.low`).
    #[must_use]
    pub fn path(&self, id: ComponentId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            segments.push(self.nodes[cur.0].name.clone());
            current = self.nodes[cur.0].parent;
        }
        segments.reverse();
        segments.join(".")
    }

    /// Resolves a dotted path (relative to `root`) to a [`ComponentId`].
    #[must_use]
    pub fn child_by_path(&self, root: ComponentId, path: &str) -> Option<ComponentId> {
        let mut current = root;
        for segment in path.split('.') {
            current = *self.nodes[current.0]
                .children
                .iter()
                .find(|child| self.nodes[child.0].name == segment)?;
        }
        Some(current)
    }

    #[must_use]
    pub fn child(&self, parent: ComponentId, name: &str) -> Option<ComponentId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|child| self.nodes[child.0].name == name)
    }

    fn collect(&self, id: ComponentId, out: &mut Vec<ComponentId>, want_control: bool) {
        match &self.nodes[id.0].kind {
            NodeKind::Control(_) if want_control => out.push(id),
            NodeKind::Status(_) if !want_control => out.push(id),
            _ => {}
        }
        for &child in &self.nodes[id.0].children {
            self.collect(child, out, want_control);
        }
    }

    /// Populates the `controls`/`statuses` caches from `root` down. Call
    /// once after the tree's shape is final; the simulator never adds or
    /// removes components afterwards, so there is no live invalidation to
    /// perform.
    pub fn freeze(&mut self, root: ComponentId) {
        let mut controls = Vec::new();
        self.collect(root, &mut controls, true);
        let mut statuses = Vec::new();
        self.collect(root, &mut statuses, false);
        self.controls_cache = Some(controls);
        self.statuses_cache = Some(statuses);
    }

    /// All `Control` leaves in the subtree rooted at the tree's root.
    /// Populated by [`ComponentTree::freeze`].
    #[must_use]
    pub fn controls(&self) -> &[ComponentId] {
        self.controls_cache.as_deref().unwrap_or(&[])
    }

    /// All `Status` leaves in the subtree rooted at the tree's root.
    /// Populated by [`ComponentTree::freeze`].
    #[must_use]
    pub fn statuses(&self) -> &[ComponentId] {
        self.statuses_cache.as_deref().unwrap_or(&[])
    }

    #[must_use]
    pub fn control_value(&self, id: ComponentId) -> bool {
        match &self.nodes[id.0].kind {
            NodeKind::Control(state) => state.value,
            _ => false,
        }
    }

    pub fn set_control(&mut self, id: ComponentId, value: bool) {
        if let NodeKind::Control(state) = &mut self.nodes[id.0].kind {
            state.value = value;
        }
    }

    #[must_use]
    pub fn status_value(&self, id: ComponentId) -> bool {
        match &self.nodes[id.0].kind {
            NodeKind::Status(state) => state.value,
            _ => false,
        }
    }

    pub fn set_status(&mut self, id: ComponentId, value: bool) {
        if let NodeKind::Status(state) = &mut self.nodes[id.0].kind {
            state.value = value;
        }
    }

    /// Every control path asserted `true` right now, sorted for
    /// deterministic iteration (used by the microcode assembler and by
    /// tests that assert exact control sets).
    #[must_use]
    pub fn asserted_control_paths(&self) -> BTreeSet<String> {
        self.controls()
            .iter()
            .filter(|&&id| self.control_value(id))
            .map(|&id| self.path(id))
            .collect()
    }

    /// Runs one phase across the whole tree, self before children
    /// (pre-order); relative order between siblings never matters because
    /// components only observe state set in a strictly earlier phase.
    pub fn run_phase(&mut self, root: ComponentId, phase: Phase) -> Result<(), TickError> {
        self.run_phase_at(root, phase)
    }

    fn run_phase_at(&mut self, id: ComponentId, phase: Phase) -> Result<(), TickError> {
        // Swap the node's kind out so component-local handlers can take a
        // `&mut ComponentTree` (needed for bus access and, for the
        // controller, writes to arbitrary other nodes) without a double
        // borrow.
        let mut kind = core::mem::replace(&mut self.nodes[id.0].kind, NodeKind::Empty);
        let result = crate::tick_dispatch::run(self, id, phase, &mut kind);
        self.nodes[id.0].kind = kind;
        result?;

        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.run_phase_at(child, phase)?;
        }
        Ok(())
    }

    /// Clears every auto-clear control back to `false`. Run as part of the
    /// `Clear` phase, after non-auto-clear controls have had a chance to
    /// observe their `clear` sub-control.
    pub(crate) fn sweep_auto_clear(&mut self) {
        for node in &mut self.nodes {
            if let NodeKind::Control(state) = &mut node.kind
                && state.auto_clear
            {
                state.value = false;
            }
        }
    }
}
