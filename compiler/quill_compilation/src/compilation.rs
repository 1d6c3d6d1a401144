//! The per-compilation symbol context.

use quill_ir::SharedInterner;
use quill_metadata::{MetadataReader, ReferenceGraph, ReferenceManager};
use quill_resolve::well_known::catalog;
use quill_resolve::{
    CallArgument, CoreField, CoreMethod, CoreProperty, CoreType, MethodResolution,
    OverloadsList, OverrideResolver, VisibilityScope, WellKnownError, WellKnownMembers,
};
use quill_symbols::{ModuleReference, SpecialType, SymbolId, SymbolTable};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{CompilationError, CompilationOptions};

/// Everything the semantic core knows about one compilation.
///
/// Owns the symbol table, the bound references and every cache derived from
/// them. Independent compilations share nothing.
pub struct Compilation {
    options: CompilationOptions,
    table: SymbolTable,
    references: ReferenceGraph,
    primitive_library: SymbolId,
    runtime_library: SymbolId,
    source_assembly: SymbolId,
    source_module: SymbolId,
    well_known: WellKnownMembers,
}

impl Compilation {
    /// Bind `options.references` through `reader` and set up the source
    /// assembly.
    ///
    /// Fails when a reference cannot be bound, when either privileged
    /// library is absent, or when the runtime lacks a core type.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(assembly = %options.assembly_name, references = options.references.len())
    )]
    pub fn new(
        options: CompilationOptions,
        reader: &dyn MetadataReader,
    ) -> Result<Self, CompilationError> {
        let table = SymbolTable::new(SharedInterner::new());
        let references = ReferenceManager::new(&table, reader, options.reference_options.clone())
            .build(&options.references)?;

        let primitive_library = references
            .primitive_library()
            .ok_or(CompilationError::PrimitiveLibraryMissing)?;
        let runtime_library =
            references
                .runtime_library()
                .ok_or_else(|| CompilationError::RuntimeLibraryMissing {
                    name: options.reference_options.runtime_library_name.clone(),
                })?;

        let identity = options.assembly_identity();
        let source_assembly = table.define_source_assembly(identity);
        let source_module = table.define_module(
            source_assembly,
            table.intern(&format!("{}.dll", options.assembly_name)),
            FxHashMap::default(),
        );
        let module_references = options
            .references
            .iter()
            .filter_map(|identity| {
                references.assembly(identity).map(|assembly| ModuleReference {
                    identity: identity.clone(),
                    assembly,
                })
            })
            .collect();
        table.set_module_references(source_module, module_references);

        let well_known = WellKnownMembers::new();
        well_known.verify_core_types(&table, &references, catalog::CORE_TYPES)?;
        debug!(
            assemblies = references.assemblies().len(),
            "compilation ready"
        );

        Ok(Compilation {
            options,
            table,
            references,
            primitive_library,
            runtime_library,
            source_assembly,
            source_module,
            well_known,
        })
    }

    pub fn options(&self) -> &CompilationOptions {
        &self.options
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn references(&self) -> &ReferenceGraph {
        &self.references
    }

    /// The library defining `System.Object` and the other primitive types.
    pub fn primitive_library(&self) -> SymbolId {
        self.primitive_library
    }

    pub fn runtime_library(&self) -> SymbolId {
        self.runtime_library
    }

    pub fn source_assembly(&self) -> SymbolId {
        self.source_assembly
    }

    pub fn source_module(&self) -> SymbolId {
        self.source_module
    }

    /// Global namespace of the source module.
    pub fn global_namespace(&self) -> SymbolId {
        self.table
            .global_namespace(self.source_module)
            .unwrap_or(self.source_module)
    }

    /// The primitive library's type tagged `special`, or a missing-type
    /// sentinel.
    pub fn special_type(&self, special: SpecialType) -> SymbolId {
        self.references.special_type(&self.table, special)
    }

    pub fn core_type(&self, ty: CoreType) -> Result<SymbolId, WellKnownError> {
        self.well_known.resolve_type(&self.table, &self.references, ty)
    }

    pub fn core_method(&self, method: &CoreMethod) -> Result<SymbolId, WellKnownError> {
        self.well_known
            .resolve_method(&self.table, &self.references, method)
    }

    pub fn core_field(&self, field: CoreField) -> Result<SymbolId, WellKnownError> {
        self.well_known
            .resolve_field(&self.table, &self.references, field)
    }

    pub fn core_property(&self, property: CoreProperty) -> Result<SymbolId, WellKnownError> {
        self.well_known
            .resolve_property(&self.table, &self.references, property)
    }

    /// Look a type up by full metadata name across the explicit references.
    pub fn get_type_by_metadata_name(&self, full_name: &str) -> Option<SymbolId> {
        self.references
            .get_type_by_metadata_name(&self.table, full_name)
    }

    pub fn resolve_overload(
        &self,
        overloads: &OverloadsList,
        arguments: &[CallArgument],
        scope: VisibilityScope,
    ) -> MethodResolution {
        overloads.resolve(&self.table, arguments, scope)
    }

    /// An override resolver treating the runtime's value and alias types as
    /// universally convertible.
    pub fn override_resolver(&self) -> OverrideResolver<'_> {
        [catalog::VALUE, catalog::ALIAS]
            .into_iter()
            .filter_map(|ty| self.core_type(ty).ok())
            .fold(OverrideResolver::new(&self.table), OverrideResolver::with_universal_type)
    }

    pub fn resolve_override(&self, method: SymbolId) -> Option<SymbolId> {
        self.override_resolver().resolve_override(method)
    }

    pub fn resolve_implementation(&self, method: SymbolId, ty: SymbolId) -> Option<SymbolId> {
        self.override_resolver().resolve_implementation(method, ty)
    }
}

impl std::fmt::Debug for Compilation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compilation")
            .field("assembly", &self.options.assembly_name)
            .field("references", &self.references)
            .field("well_known", &self.well_known)
            .finish_non_exhaustive()
    }
}
