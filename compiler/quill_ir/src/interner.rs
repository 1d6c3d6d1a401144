//! Sharded string interner for symbol and metadata names.
//!
//! One interner is owned per compilation. Interned strings are leaked so that
//! lookups can hand out `&'static str` without holding a shard lock.

use std::hash::{BuildHasher, Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashMap};

use super::Name;

/// A shard ran out of slots.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("interner shard {shard} is full ({slots} names)")]
pub struct InternError {
    pub shard: usize,
    pub slots: usize,
}

#[derive(Default)]
struct Shard {
    slots: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Shard {
    fn insert(&mut self, shard: usize, s: &str) -> Result<Name, InternError> {
        if let Some(&slot) = self.slots.get(s) {
            return Ok(Name::pack(shard, slot));
        }
        let slot = u32::try_from(self.strings.len())
            .ok()
            .filter(|&slot| slot <= Name::MAX_SLOT)
            .ok_or(InternError {
                shard,
                slots: self.strings.len(),
            })?;
        let leaked: &'static str = Box::leak(Box::<str>::from(s));
        self.strings.push(leaked);
        self.slots.insert(leaked, slot);
        Ok(Name::pack(shard, slot))
    }
}

/// Metadata names looked up by nearly every compilation.
const PRELUDE: &[&str] = &[
    ".ctor",
    ".cctor",
    "System",
    "Object",
    "ValueType",
    "Enum",
    "Void",
    "String",
    "Array",
    "Nullable`1",
    "Invoke",
    "op_Implicit",
    "op_Explicit",
];

/// Sharded string interner.
///
/// Each shard sits behind its own `RwLock`, so resolving an already
/// interned name only takes a read lock on one shard.
pub struct StringInterner {
    shards: [RwLock<Shard>; Name::SHARDS],
}

impl StringInterner {
    /// Create an interner holding the empty string and the metadata prelude.
    pub fn new() -> Self {
        let interner = StringInterner {
            shards: std::array::from_fn(|_| RwLock::new(Shard::default())),
        };
        // The empty string must land on `Name::EMPTY`, slot 0 of shard 0.
        {
            let mut first = interner.shards[0].write();
            first.strings.push("");
            first.slots.insert("", 0);
        }
        for name in PRELUDE {
            interner.intern(name);
        }
        interner
    }

    fn shard_of(s: &str) -> usize {
        if s.is_empty() {
            return 0;
        }
        let mut hasher = FxBuildHasher.build_hasher();
        s.hash(&mut hasher);
        usize::try_from(hasher.finish() % Name::SHARDS as u64).unwrap_or(0)
    }

    /// Intern `s`, failing only when its shard is full.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(name) = self.get(s) {
            return Ok(name);
        }
        let shard = Self::shard_of(s);
        // `insert` re-checks under the write lock; another thread may have
        // interned `s` in between.
        self.shards[shard].write().insert(shard, s)
    }

    /// Intern `s`.
    ///
    /// # Panics
    /// Panics when a shard holds 2^28 names. Use `try_intern` to handle that.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The string behind `name`.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.shards[name.shard()].read().strings[name.slot()]
    }

    /// The name of `s` if it was ever interned.
    ///
    /// Lookups use this to bail out early: no symbol can carry a name the
    /// interner has never seen.
    pub fn get(&self, s: &str) -> Option<Name> {
        let shard = Self::shard_of(s);
        self.shards[shard]
            .read()
            .slots
            .get(s)
            .map(|&slot| Name::pack(shard, slot))
    }

    /// Compare two names ignoring ASCII case.
    ///
    /// Guest-language function and method names are case-insensitive.
    pub fn eq_ignore_ascii_case(&self, a: Name, b: Name) -> bool {
        a == b || self.lookup(a).eq_ignore_ascii_case(self.lookup(b))
    }

    /// Number of interned strings, the empty string included.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().strings.len()).sum()
    }

    /// Whether nothing beyond the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared interner handle.
///
/// The symbol table and the reference graph builder both intern names; the
/// compilation hands each of them a clone of this handle.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
