//! `Status`: a named 1-bit observable, read-only from the controller's
//! perspective and written by its producer (the ALU, a result analyzer).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusState {
    pub value: bool,
}
