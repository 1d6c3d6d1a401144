//! Symbol handle.

use std::fmt;

/// A 32-bit handle into the `SymbolTable` arena.
///
/// Two symbols are the same symbol iff their ids are equal. Constructed
/// generic views are deduplicated by the table, so equal constructions share
/// one id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Create an id from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the arena.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Create an id for the arena slot `index`.
    ///
    /// # Panics
    /// Panics if the arena outgrows `u32::MAX` symbols.
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or_else(|_| {
            panic!("symbol table exceeded u32::MAX symbols ({index})")
        }))
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol#{}", self.0)
    }
}

const _: () = assert!(std::mem::size_of::<SymbolId>() == 4);
