//! `Bus`: a single-cycle shared byte channel with at-most-one-writer
//! semantics.

use signal::Byte;

use crate::component::{ComponentId, ComponentTree};
use crate::error::TickError;

/// State backing a `Bus` component. Holds at most one `(byte, writer)`
/// pair per tick; cleared at the end of every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusState {
    slot: Option<(Byte, ComponentId)>,
}

impl ComponentTree {
    /// Drives `value` onto `bus`, attributed to `writer`. Fails with
    /// [`TickError::BusConflict`] if a *different* writer already drove
    /// this bus earlier in the same tick; the same writer re-asserting
    /// (even with a different value) simply overwrites, which keeps a
    /// multi-source writer (e.g. the ALU writing its own output register)
    /// idempotent across repeated calls within a step.
    pub fn bus_write(
        &mut self,
        bus: ComponentId,
        writer: ComponentId,
        value: Byte,
    ) -> Result<(), TickError> {
        let existing = match self.kind(bus) {
            crate::component::NodeKind::Bus(state) => state.slot,
            _ => None,
        };
        if let Some((_, existing_writer)) = existing
            && existing_writer != writer
        {
            return Err(TickError::BusConflict {
                bus: self.path(bus),
                existing_writer: self.path(existing_writer),
                new_writer: self.path(writer),
            });
        }
        if let crate::component::NodeKind::Bus(state) = self.kind_mut(bus) {
            state.slot = Some((value, writer));
        }
        Ok(())
    }

    /// Reads the current value on `bus`, or `None` if nothing drove it
    /// this tick (an "open bus").
    #[must_use]
    pub fn bus_read(&self, bus: ComponentId) -> Option<Byte> {
        match self.kind(bus) {
            crate::component::NodeKind::Bus(state) => state.slot.map(|(value, _)| value),
            _ => None,
        }
    }

    /// Reads `bus`, raising [`TickError::OpenBusRead`] if it's open.
    /// `reader` identifies the component asserting `.read`, for the error
    /// message.
    pub fn bus_read_or_err(
        &self,
        bus: ComponentId,
        reader: ComponentId,
    ) -> Result<Byte, TickError> {
        self.bus_read(bus).ok_or_else(|| TickError::OpenBusRead {
            reader: self.path(reader),
            bus: self.path(bus),
        })
    }

    pub(crate) fn bus_clear(&mut self, bus: ComponentId) {
        if let crate::component::NodeKind::Bus(state) = self.kind_mut(bus) {
            state.slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal::Byte;

    fn make_tree() -> (ComponentTree, ComponentId, ComponentId, ComponentId) {
        let mut tree = ComponentTree::new();
        let root = tree.add_group(None, "root").unwrap();
        let bus = tree.add_bus(root, "bus").expect("bus construction");
        let a = tree.add_group(Some(root), "a").unwrap();
        let b = tree.add_group(Some(root), "b").unwrap();
        (tree, bus, a, b)
    }

    #[test]
    fn second_distinct_writer_conflicts() {
        let (mut tree, bus, a, b) = make_tree();
        tree.bus_write(bus, a, Byte(1)).unwrap();
        let err = tree.bus_write(bus, b, Byte(2)).unwrap_err();
        assert!(matches!(err, TickError::BusConflict { .. }));
    }

    #[test]
    fn same_writer_can_rewrite() {
        let (mut tree, bus, a, _b) = make_tree();
        tree.bus_write(bus, a, Byte(1)).unwrap();
        tree.bus_write(bus, a, Byte(2)).unwrap();
        assert_eq!(tree.bus_read(bus), Some(Byte(2)));
    }

    #[test]
    fn open_bus_reads_none() {
        let (tree, bus, _a, _b) = make_tree();
        assert_eq!(tree.bus_read(bus), None);
    }

    #[test]
    fn clear_wipes_the_slot() {
        let (mut tree, bus, a, _b) = make_tree();
        tree.bus_write(bus, a, Byte(9)).unwrap();
        tree.bus_clear(bus);
        assert_eq!(tree.bus_read(bus), None);
    }
}
