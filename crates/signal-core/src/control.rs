//! `Control`: a named 1-bit signal raised by the controller (or directly by
//! a test) and observed by its owning component during later phases.

/// State backing a `Control` leaf.
///
/// `auto_clear = true` controls (the common case: `write`, `read`,
/// `increment`, ...) are forced back to `false` at the end of every tick.
/// `auto_clear = false` controls are sticky (`carry_in`, `halt`, a status
/// register's `latch`) and retain their value until their `clear`
/// sub-control — added automatically by [`crate::component::ComponentTree::add_control`] —
/// is asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub value: bool,
    pub auto_clear: bool,
}
