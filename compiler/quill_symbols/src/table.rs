//! The per-compilation symbol arena.
//!
//! # Locking
//!
//! The table holds four locks. When more than one is taken they are taken in
//! this order and released in reverse: a keyed cache (`constructed` or
//! `derived`), then `symbols`, then `members`. Symbol records themselves are
//! immutable `Arc`s; their write-once parts are `OnceLock`s and need no table
//! lock at all.

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use quill_ir::{AssemblyIdentity, Name, SharedInterner};
use rustc_hash::FxHashMap;

use crate::{Symbol, SymbolId, TypeWithModifiers};

/// Cache key of a constructed generic type or method.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct ConstructKey {
    pub(crate) constructed_from: SymbolId,
    /// Arguments including their custom modifiers: constructions that differ
    /// only in modifiers are distinct symbols.
    pub(crate) arguments: Vec<TypeWithModifiers>,
}

/// Cache key of any other deduplicated synthesized symbol.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum DerivedKey {
    /// Nested type seen through a substituted container.
    Nested {
        container: SymbolId,
        nested: SymbolId,
    },
    Array {
        element: TypeWithModifiers,
        rank: u32,
    },
    Pointer(TypeWithModifiers),
    /// Missing-by-name error type.
    MissingType {
        assembly: Option<AssemblyIdentity>,
        namespace: Name,
        name: Name,
        arity: usize,
    },
    /// Merge view over several namespaces.
    MergedNamespace(Vec<SymbolId>),
    /// Child namespace of a concrete namespace.
    Namespace {
        parent: SymbolId,
        name: Name,
    },
    /// Implicit receiver parameter of a method.
    Receiver(SymbolId),
    /// The single unbound type argument placeholder.
    UnboundArgument,
}

/// Append-only arena of symbols for one compilation.
///
/// # Thread Safety
/// All operations take `&self`. Queries may run concurrently with lazy
/// computations; the only mutation is appending symbols, registering members
/// and publishing write-once parts.
pub struct SymbolTable {
    interner: SharedInterner,
    symbols: RwLock<Vec<Arc<Symbol>>>,
    /// Members of definitions, namespaces, modules and assemblies in
    /// declaration order. Substituted types keep their members on the record.
    members: RwLock<FxHashMap<SymbolId, Vec<SymbolId>>>,
    pub(crate) constructed: RwLock<FxHashMap<ConstructKey, SymbolId>>,
    pub(crate) derived: RwLock<FxHashMap<DerivedKey, SymbolId>>,
}

impl SymbolTable {
    /// Create an empty table that interns names in `interner`.
    pub fn new(interner: SharedInterner) -> Self {
        SymbolTable {
            interner,
            symbols: RwLock::new(Vec::with_capacity(1024)),
            members: RwLock::new(FxHashMap::default()),
            constructed: RwLock::new(FxHashMap::default()),
            derived: RwLock::new(FxHashMap::default()),
        }
    }

    /// The interner shared with the rest of the compilation.
    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Intern a name.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// The text of a name.
    #[inline]
    pub fn name_str(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    /// The text of a symbol's name.
    pub fn symbol_name(&self, id: SymbolId) -> &'static str {
        self.name_str(self.get(id).name)
    }

    /// Get a symbol record.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this table.
    pub fn get(&self, id: SymbolId) -> Arc<Symbol> {
        Arc::clone(&self.symbols.read()[id.index()])
    }

    /// Number of symbols in the arena.
    pub fn len(&self) -> usize {
        self.symbols.read().len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.read().is_empty()
    }

    /// Append a symbol that is not listed as a member of its container.
    pub(crate) fn alloc(&self, symbol: Symbol) -> SymbolId {
        let mut symbols = self.symbols.write();
        let id = SymbolId::from_index(symbols.len());
        symbols.push(Arc::new(symbol));
        id
    }

    /// Append a symbol and list it as the last member of its container.
    pub(crate) fn alloc_member(&self, symbol: Symbol) -> SymbolId {
        let container = symbol.containing;
        let id = self.alloc(symbol);
        if let Some(container) = container {
            self.members.write().entry(container).or_default().push(id);
        }
        id
    }

    /// Members registered for `container`, in declaration order.
    pub(crate) fn declared_members(&self, container: SymbolId) -> Vec<SymbolId> {
        self.members
            .read()
            .get(&container)
            .cloned()
            .unwrap_or_default()
    }

    /// Deduplicating allocation.
    ///
    /// `make` runs without any table lock held, so it may query the table
    /// freely. If another thread published the same key first, the computed
    /// record is dropped unallocated and the winner is returned.
    pub(crate) fn intern_keyed<K: Eq + Hash>(
        &self,
        cache: &RwLock<FxHashMap<K, SymbolId>>,
        key: K,
        register_member: bool,
        make: impl FnOnce() -> Symbol,
    ) -> SymbolId {
        if let Some(&id) = cache.read().get(&key) {
            return id;
        }
        let symbol = make();
        let mut cache = cache.write();
        if let Some(&id) = cache.get(&key) {
            return id;
        }
        let id = if register_member {
            self.alloc_member(symbol)
        } else {
            self.alloc(symbol)
        };
        cache.insert(key, id);
        id
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("symbols", &self.len())
            .field("constructed", &self.constructed.read().len())
            .finish_non_exhaustive()
    }
}
