//! Declaring source locations.

use std::fmt;

use crate::Name;

/// A declaring location of a source symbol.
///
/// Binary-origin symbols have no locations; namespaces have none of their own.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    /// Interned path of the source file.
    pub file: Name,
    /// Byte offset of the start of the declaration.
    pub start: u32,
    /// Byte offset (exclusive) of the end of the declaration.
    pub end: u32,
}

impl Location {
    /// Create a new location.
    #[inline]
    pub const fn new(file: Name, start: u32, end: u32) -> Self {
        Location { file, start, end }
    }

    /// Length of the declaration in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the location covers no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
