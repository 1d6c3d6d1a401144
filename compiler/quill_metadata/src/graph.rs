//! Reference graph construction and top-level type lookup.

use std::collections::VecDeque;
use std::path::PathBuf;

use parking_lot::RwLock;
use quill_ir::AssemblyIdentity;
use quill_symbols::{ErrorTypeKind, ModuleReference, SpecialType, SymbolId, SymbolTable};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::materialize::{bind_module, define_module_shell, ModuleShell};
use crate::{lookup_metadata_type, MetadataError, MetadataReader, MetadataTypeName};

/// Name of the guest-runtime library when none is configured.
pub const DEFAULT_RUNTIME_LIBRARY: &str = "Quill.Runtime";

/// How references are located and bound.
#[derive(Clone, Debug)]
pub struct ReferenceOptions {
    /// Directories handed to the reader, in search order.
    pub search_paths: Vec<PathBuf>,
    /// Simple name of the guest-runtime library (compared ignoring case).
    pub runtime_library_name: Box<str>,
    /// Bind a transitive reference that cannot be located to an already
    /// bound assembly with the same name and major version.
    pub coalesce_near_duplicates: bool,
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        ReferenceOptions {
            search_paths: Vec::new(),
            runtime_library_name: DEFAULT_RUNTIME_LIBRARY.into(),
            coalesce_near_duplicates: true,
        }
    }
}

impl ReferenceOptions {
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    #[must_use]
    pub fn with_runtime_library_name(mut self, name: &str) -> Self {
        self.runtime_library_name = name.into();
        self
    }

    #[must_use]
    pub fn with_coalesce_near_duplicates(mut self, coalesce: bool) -> Self {
        self.coalesce_near_duplicates = coalesce;
        self
    }
}

/// Binds a set of references, and everything they reference, into a
/// symbol table.
pub struct ReferenceManager<'a> {
    table: &'a SymbolTable,
    reader: &'a dyn MetadataReader,
    options: ReferenceOptions,
    by_identity: FxHashMap<AssemblyIdentity, SymbolId>,
    /// Located or missing assemblies in binding order.
    assemblies: Vec<SymbolId>,
    shells: Vec<ModuleShell>,
    queue: VecDeque<AssemblyIdentity>,
    /// Transitive references the reader could not locate, first seen first.
    /// Bound only once every locatable assembly is known.
    unlocated: Vec<AssemblyIdentity>,
}

impl<'a> ReferenceManager<'a> {
    pub fn new(
        table: &'a SymbolTable,
        reader: &'a dyn MetadataReader,
        options: ReferenceOptions,
    ) -> Self {
        ReferenceManager {
            table,
            reader,
            options,
            by_identity: FxHashMap::default(),
            assemblies: Vec::new(),
            shells: Vec::new(),
            queue: VecDeque::new(),
            unlocated: Vec::new(),
        }
    }

    /// Bind `references` and their transitive closure.
    ///
    /// An explicit reference that cannot be located, or any module that
    /// cannot be read, is fatal. Transitive references that cannot be
    /// located are bound after every locatable assembly, to a near duplicate
    /// when coalescing is on and to a missing-assembly sentinel otherwise.
    #[tracing::instrument(level = "debug", skip_all, fields(references = references.len()))]
    pub fn build(mut self, references: &[AssemblyIdentity]) -> Result<ReferenceGraph, MetadataError> {
        let mut explicit = Vec::with_capacity(references.len());
        for identity in references {
            let Some(assembly) = self.bind(identity, true)? else {
                continue;
            };
            if !explicit.contains(&assembly) {
                explicit.push(assembly);
            }
        }
        while let Some(identity) = self.queue.pop_front() {
            self.bind(&identity, false)?;
        }
        for identity in std::mem::take(&mut self.unlocated) {
            self.bind_unlocated(&identity);
        }

        for shell in &self.shells {
            let table_references = shell
                .image
                .references
                .iter()
                .map(|identity| ModuleReference {
                    identity: identity.clone(),
                    assembly: self
                        .by_identity
                        .get(identity)
                        .copied()
                        .unwrap_or_else(|| self.table.define_missing_assembly(identity.clone())),
                })
                .collect();
            self.table.set_module_references(shell.module, table_references);
        }

        let table = self.table;
        let primitive_library = self
            .assemblies
            .iter()
            .copied()
            .find(|&assembly| table.is_cor_library(assembly));
        let runtime_library = self.assemblies.iter().copied().find(|&assembly| {
            !table.is_missing_assembly(assembly)
                && table
                    .assembly_identity(assembly)
                    .is_some_and(|identity| {
                        identity
                            .name
                            .eq_ignore_ascii_case(&self.options.runtime_library_name)
                    })
        });

        let graph = ReferenceGraph {
            explicit,
            assemblies: self.assemblies,
            by_identity: self.by_identity,
            primitive_library,
            runtime_library,
            special_types: RwLock::new(FxHashMap::default()),
        };
        for shell in &self.shells {
            bind_module(table, &graph, shell);
        }
        debug!(
            assemblies = graph.assemblies.len(),
            modules = self.shells.len(),
            "reference graph bound"
        );
        Ok(graph)
    }

    /// Locate and bind one assembly. Returns `None` for a transitive
    /// reference that cannot be located; it is set aside for
    /// `bind_unlocated`.
    fn bind(
        &mut self,
        identity: &AssemblyIdentity,
        explicit: bool,
    ) -> Result<Option<SymbolId>, MetadataError> {
        if let Some(&assembly) = self.by_identity.get(identity) {
            return Ok(Some(assembly));
        }
        if self.unlocated.contains(identity) {
            return Ok(None);
        }
        let modules = self.reader.locate(identity, &self.options.search_paths)?;
        let Some(primary) = modules.first() else {
            if explicit {
                return Err(MetadataError::ModuleNotFound {
                    identity: identity.clone(),
                    search_paths: self.options.search_paths.clone(),
                });
            }
            self.unlocated.push(identity.clone());
            return Ok(None);
        };

        let actual = primary.assembly.clone();
        if let Some(&assembly) = self.by_identity.get(&actual) {
            self.by_identity.insert(identity.clone(), assembly);
            return Ok(Some(assembly));
        }

        let table = self.table;
        let is_cor_library = primary.references.is_empty()
            && modules.iter().any(|module| module.defines("System", "Object"));
        let assembly = table.define_assembly(actual.clone(), is_cor_library);
        self.by_identity.insert(identity.clone(), assembly);
        self.by_identity.insert(actual, assembly);
        self.assemblies.push(assembly);
        debug!(%identity, is_cor_library, modules = modules.len(), "located assembly");

        for image in modules {
            for reference in &image.references {
                if !self.by_identity.contains_key(reference) {
                    self.queue.push_back(reference.clone());
                }
            }
            for forwarded in &image.forwarded_types {
                if !self.by_identity.contains_key(&forwarded.target) {
                    self.queue.push_back(forwarded.target.clone());
                }
            }
            self.shells
                .push(define_module_shell(table, assembly, image, is_cor_library));
        }
        Ok(Some(assembly))
    }

    /// Bind a transitive reference that could not be located, either to a
    /// located near duplicate or to a missing-assembly sentinel.
    fn bind_unlocated(&mut self, identity: &AssemblyIdentity) -> SymbolId {
        let table = self.table;
        if self.options.coalesce_near_duplicates {
            let near = self.assemblies.iter().copied().find(|&assembly| {
                !table.is_missing_assembly(assembly)
                    && table
                        .assembly_identity(assembly)
                        .is_some_and(|bound| bound.is_near_duplicate(identity))
            });
            if let Some(assembly) = near {
                debug!(%identity, "coalesced unlocated reference to near duplicate");
                self.by_identity.insert(identity.clone(), assembly);
                return assembly;
            }
        }
        debug!(%identity, "referenced assembly not found");
        let assembly = table.define_missing_assembly(identity.clone());
        self.by_identity.insert(identity.clone(), assembly);
        self.assemblies.push(assembly);
        assembly
    }
}

/// The bound reference set of one compilation.
pub struct ReferenceGraph {
    explicit: Vec<SymbolId>,
    assemblies: Vec<SymbolId>,
    by_identity: FxHashMap<AssemblyIdentity, SymbolId>,
    primitive_library: Option<SymbolId>,
    runtime_library: Option<SymbolId>,
    special_types: RwLock<FxHashMap<SpecialType, SymbolId>>,
}

impl ReferenceGraph {
    /// Assemblies bound for the explicit references, deduplicated, in
    /// reference order.
    pub fn explicit_assemblies(&self) -> &[SymbolId] {
        &self.explicit
    }

    /// Every bound assembly, including missing-assembly sentinels.
    pub fn assemblies(&self) -> &[SymbolId] {
        &self.assemblies
    }

    /// The assembly bound for `identity`, if any reference named it.
    pub fn assembly(&self, identity: &AssemblyIdentity) -> Option<SymbolId> {
        self.by_identity.get(identity).copied()
    }

    /// The library defining the primitive types.
    pub fn primitive_library(&self) -> Option<SymbolId> {
        self.primitive_library
    }

    /// The guest-runtime library.
    pub fn runtime_library(&self) -> Option<SymbolId> {
        self.runtime_library
    }

    /// The assembly a module refers to as `identity`.
    ///
    /// Uses the module's reference table, falling back to the graph-wide
    /// identity map.
    pub fn resolve_reference(
        &self,
        table: &SymbolTable,
        module: SymbolId,
        identity: &AssemblyIdentity,
    ) -> Option<SymbolId> {
        table
            .module_references(module)
            .into_iter()
            .find(|reference| &reference.identity == identity)
            .map(|reference| reference.assembly)
            .or_else(|| self.assembly(identity))
    }

    /// Look up a top-level type of `assembly`, following type-forwarders.
    ///
    /// Returns a missing-type sentinel when the name is not defined, and a
    /// `ForwardingCycle` error type when forwarding revisits an assembly.
    pub fn lookup_top_level_type(
        &self,
        table: &SymbolTable,
        assembly: SymbolId,
        name: &MetadataTypeName,
    ) -> SymbolId {
        let mut visited: Vec<AssemblyIdentity> = Vec::new();
        let mut current = assembly;
        loop {
            let Some(identity) = table.assembly_identity(current) else {
                return missing(table, None, name);
            };
            if visited.contains(&identity) {
                visited.push(identity);
                debug!(name = %name.qualified(), "type forwarding cycle");
                return table.error_type(
                    ErrorTypeKind::ForwardingCycle {
                        assemblies: visited,
                    },
                    table.intern(name.name()),
                    name.inferred_arity(),
                );
            }

            let modules = table.modules(current);
            let found = modules.iter().find_map(|&module| {
                let global = table.global_namespace(module)?;
                let namespace = table.lookup_namespace_path(global, name.namespace())?;
                lookup_metadata_type(table, namespace, name)
            });
            if let Some(ty) = found {
                return ty;
            }

            let qualified = name.qualified();
            let forwarded = modules.iter().find_map(|&module| {
                table
                    .forwarded_type(module, &qualified)
                    .map(|target| (module, target))
            });
            let Some((module, target)) = forwarded else {
                return missing(table, Some(identity), name);
            };
            visited.push(identity);
            match self.resolve_reference(table, module, &target) {
                Some(next) => current = next,
                None => return missing(table, Some(target), name),
            }
        }
    }

    /// Look a type up by full metadata name across the explicit references.
    ///
    /// Returns `None` unless exactly one explicit assembly defines it.
    pub fn get_type_by_metadata_name(&self, table: &SymbolTable, full_name: &str) -> Option<SymbolId> {
        let name = MetadataTypeName::from_full_name(full_name);
        let mut found: Vec<SymbolId> = Vec::new();
        for &assembly in &self.explicit {
            let ty = self.lookup_top_level_type(table, assembly, &name);
            if !table.is_error(ty) && !found.contains(&ty) {
                found.push(ty);
            }
        }
        match found.as_slice() {
            [ty] => Some(*ty),
            [] => None,
            _ => {
                debug!(full_name, count = found.len(), "type defined by several references");
                None
            }
        }
    }

    /// The primitive library's type tagged `special`.
    ///
    /// A missing-type sentinel when there is no primitive library or it does
    /// not define the type. Results are cached per graph.
    pub fn special_type(&self, table: &SymbolTable, special: SpecialType) -> SymbolId {
        if let Some(&ty) = self.special_types.read().get(&special) {
            return ty;
        }
        let name = MetadataTypeName::from_full_name(special.metadata_name().unwrap_or_default());
        let ty = match self.primitive_library {
            Some(library) => self.lookup_top_level_type(table, library, &name),
            None => missing(table, None, &name),
        };
        *self.special_types.write().entry(special).or_insert(ty)
    }
}

impl std::fmt::Debug for ReferenceGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceGraph")
            .field("explicit", &self.explicit)
            .field("assemblies", &self.assemblies)
            .field("primitive_library", &self.primitive_library)
            .field("runtime_library", &self.runtime_library)
            .finish_non_exhaustive()
    }
}

fn missing(
    table: &SymbolTable,
    assembly: Option<AssemblyIdentity>,
    name: &MetadataTypeName,
) -> SymbolId {
    let arity = name.forced_arity().unwrap_or(name.inferred_arity());
    let simple = if name.inferred_arity() > 0 {
        name.unmangled_name()
    } else {
        name.name()
    };
    table.missing_type(
        assembly,
        table.intern(name.namespace()),
        table.intern(simple),
        arity,
    )
}
