//! Core primitives shared by the microcode simulator: type-safe byte-ish
//! newtypes and the [`ByteOps`] flag-producing arithmetic they're built on.
//!
//! `signal` has no knowledge of components, buses, or instructions — it only
//! supplies the small, well-tested vocabulary ([`Byte`], [`Word`], [`Nibble`],
//! [`byte_ops`]) that the rest of the simulator is built from.

#![no_std]

extern crate alloc;

pub mod byte;
pub use byte::Byte;
pub mod byte_ops;
pub use byte_ops::{ByteOps, FlaggedByte};
pub mod nibble;
pub use nibble::Nibble;
pub mod word;
pub use word::Word;
