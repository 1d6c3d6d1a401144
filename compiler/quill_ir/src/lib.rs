//! Quill IR - shared leaf types for the symbol core.
//!
//! This crate holds the small value types every other Quill crate agrees on:
//! - `Name`: interned identifier (`u32`), produced by `StringInterner`
//! - `Location`: declaring source location of a symbol
//! - `ConstantValue`: constants attached to fields, parameters and attributes
//! - `AssemblyIdentity`: identity of a referenced binary library
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers are `Name(u32)`, compared in O(1)
//! - **Plain Values**: everything here is `Clone + Eq + Hash` so it can be
//!   used as a cache key by the resolution crates
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.

mod constant;
mod identity;
mod interner;
mod location;
mod name;

pub use constant::ConstantValue;
pub use identity::{AssemblyIdentity, Version};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use location::Location;
pub use name::Name;
