//! Interned identifier.
//!
//! Symbol names, namespace segments and metadata names are all interned so
//! that name comparison during lookup is a single `u32` compare.

use std::fmt;

/// Handle to a string owned by a `StringInterner`.
///
/// Only the interner mints names. The high four bits select the interner
/// shard and the low 28 bits the slot within it, so a `Name` from one
/// compilation's interner is meaningless in another's.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

const SLOT_BITS: u32 = 28;

impl Name {
    /// The empty string, pre-interned in every interner.
    ///
    /// Names global namespaces and anonymous sentinels.
    pub const EMPTY: Name = Name(0);

    /// Largest slot a shard can hand out.
    pub(crate) const MAX_SLOT: u32 = (1 << SLOT_BITS) - 1;

    pub(crate) const SHARDS: usize = 16;

    #[inline]
    pub(crate) const fn pack(shard: usize, slot: u32) -> Self {
        debug_assert!(shard < Self::SHARDS);
        debug_assert!(slot <= Self::MAX_SLOT);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard is below SHARDS (16)"
        )]
        let shard = shard as u32;
        Name((shard << SLOT_BITS) | slot)
    }

    #[inline]
    pub(crate) const fn shard(self) -> usize {
        (self.0 >> SLOT_BITS) as usize
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0 & Self::MAX_SLOT) as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.slot())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
