//! Compiler-required members of the privileged libraries.
//!
//! Lowering needs a fixed set of runtime operations (value boxing, operator
//! helpers, array construction, ...) and primitive types. They are named by
//! static descriptors and resolved against the reference graph on first use.
//! Unlike user-code lookups, a descriptor that does not resolve is fatal: the
//! referenced runtime is missing or incompatible with this compiler.

pub mod catalog;

use std::fmt;

use parking_lot::RwLock;
use quill_metadata::{MetadataTypeName, ReferenceGraph};
use quill_symbols::{MethodKind, SymbolCategory, SymbolFlags, SymbolId, SymbolTable};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// One of the two privileged libraries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoreLibrary {
    /// Defines `System.Object` and the other primitive types.
    Primitive,
    /// The guest-language runtime.
    Runtime,
}

impl fmt::Display for CoreLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreLibrary::Primitive => f.write_str("primitive"),
            CoreLibrary::Runtime => f.write_str("runtime"),
        }
    }
}

/// A top-level type of a privileged library.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoreType {
    pub library: CoreLibrary,
    /// Full metadata name, `Namespace.Name` (arity-mangled for generics).
    pub full_name: &'static str,
}

impl CoreType {
    pub const fn primitive(full_name: &'static str) -> Self {
        CoreType {
            library: CoreLibrary::Primitive,
            full_name,
        }
    }

    pub const fn runtime(full_name: &'static str) -> Self {
        CoreType {
            library: CoreLibrary::Runtime,
            full_name,
        }
    }
}

/// Expected type of one parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoreParam {
    Type(CoreType),
    /// Single-dimensional array of the type.
    ArrayOf(CoreType),
    /// Passed by reference.
    ByRef(CoreType),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoreMethodKind {
    Ordinary,
    /// Instance constructor.
    Constructor,
    /// `op_*` special-name method.
    Operator,
    /// Static `op_Explicit` conversion.
    ExplicitCast,
}

/// A method of a privileged library, matched by exact name and parameter
/// types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoreMethod {
    pub declaring: CoreType,
    pub name: &'static str,
    pub kind: CoreMethodKind,
    pub parameters: &'static [CoreParam],
    /// Checked when present. Always present for explicit casts.
    pub return_type: Option<CoreType>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoreField {
    pub declaring: CoreType,
    pub name: &'static str,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoreProperty {
    pub declaring: CoreType,
    pub name: &'static str,
}

/// A compiler-required symbol that cannot be resolved.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WellKnownError {
    #[error("no {library} library is referenced")]
    LibraryMissing { library: CoreLibrary },
    #[error("type {full_name} is missing from the {library} library")]
    TypeMissing {
        library: CoreLibrary,
        full_name: &'static str,
    },
    #[error("member {declaring}.{member} is missing or has an unexpected signature")]
    MemberMissing {
        declaring: &'static str,
        member: &'static str,
    },
}

/// Per-compilation cache of resolved descriptors.
///
/// Each descriptor is resolved at most once per winner; concurrent first
/// calls may both search, and the first published result is kept.
#[derive(Default)]
pub struct WellKnownMembers {
    types: RwLock<FxHashMap<CoreType, SymbolId>>,
    methods: RwLock<FxHashMap<CoreMethod, SymbolId>>,
    fields: RwLock<FxHashMap<CoreField, SymbolId>>,
    properties: RwLock<FxHashMap<CoreProperty, SymbolId>>,
}

impl WellKnownMembers {
    pub fn new() -> Self {
        WellKnownMembers::default()
    }

    pub fn resolve_type(
        &self,
        table: &SymbolTable,
        graph: &ReferenceGraph,
        ty: CoreType,
    ) -> Result<SymbolId, WellKnownError> {
        if let Some(&found) = self.types.read().get(&ty) {
            return Ok(found);
        }
        let library = match ty.library {
            CoreLibrary::Primitive => graph.primitive_library(),
            CoreLibrary::Runtime => graph.runtime_library(),
        }
        .ok_or(WellKnownError::LibraryMissing {
            library: ty.library,
        })?;
        let found = graph.lookup_top_level_type(
            table,
            library,
            &MetadataTypeName::from_full_name(ty.full_name),
        );
        if table.is_error(found) {
            debug!(full_name = ty.full_name, library = %ty.library, "core type missing");
            return Err(WellKnownError::TypeMissing {
                library: ty.library,
                full_name: ty.full_name,
            });
        }
        Ok(*self.types.write().entry(ty).or_insert(found))
    }

    pub fn resolve_method(
        &self,
        table: &SymbolTable,
        graph: &ReferenceGraph,
        method: &CoreMethod,
    ) -> Result<SymbolId, WellKnownError> {
        if let Some(&found) = self.methods.read().get(method) {
            return Ok(found);
        }
        let declaring = self.resolve_type(table, graph, method.declaring)?;
        let parameters = method
            .parameters
            .iter()
            .map(|&parameter| self.resolve_param(table, graph, parameter))
            .collect::<Result<Vec<_>, _>>()?;
        let return_type = method
            .return_type
            .map(|ty| self.resolve_type(table, graph, ty))
            .transpose()?;

        let found = table
            .members_named(declaring, table.intern(method.name))
            .into_iter()
            .find(|&candidate| {
                table.get(candidate).is_method()
                    && has_kind(table, candidate, method)
                    && same_parameters(table, candidate, &parameters)
                    && return_type.map_or(true, |expected| {
                        table.return_type(candidate).map(|ty| ty.ty) == Some(expected)
                    })
            })
            .ok_or(WellKnownError::MemberMissing {
                declaring: method.declaring.full_name,
                member: method.name,
            })?;
        trace!(name = method.name, ?found, "resolved core method");
        Ok(*self.methods.write().entry(*method).or_insert(found))
    }

    pub fn resolve_field(
        &self,
        table: &SymbolTable,
        graph: &ReferenceGraph,
        field: CoreField,
    ) -> Result<SymbolId, WellKnownError> {
        if let Some(&found) = self.fields.read().get(&field) {
            return Ok(found);
        }
        let declaring = self.resolve_type(table, graph, field.declaring)?;
        let found = member_of_category(table, declaring, field.name, SymbolCategory::Field)
            .ok_or(WellKnownError::MemberMissing {
                declaring: field.declaring.full_name,
                member: field.name,
            })?;
        Ok(*self.fields.write().entry(field).or_insert(found))
    }

    pub fn resolve_property(
        &self,
        table: &SymbolTable,
        graph: &ReferenceGraph,
        property: CoreProperty,
    ) -> Result<SymbolId, WellKnownError> {
        if let Some(&found) = self.properties.read().get(&property) {
            return Ok(found);
        }
        let declaring = self.resolve_type(table, graph, property.declaring)?;
        let found =
            member_of_category(table, declaring, property.name, SymbolCategory::Property)
                .ok_or(WellKnownError::MemberMissing {
                    declaring: property.declaring.full_name,
                    member: property.name,
                })?;
        Ok(*self.properties.write().entry(property).or_insert(found))
    }

    /// Resolve every type in `types`, failing on the first that is missing.
    pub fn verify_core_types(
        &self,
        table: &SymbolTable,
        graph: &ReferenceGraph,
        types: &[CoreType],
    ) -> Result<(), WellKnownError> {
        for &ty in types {
            self.resolve_type(table, graph, ty)?;
        }
        Ok(())
    }

    /// The type a parameter must have, and whether it is passed by reference.
    fn resolve_param(
        &self,
        table: &SymbolTable,
        graph: &ReferenceGraph,
        parameter: CoreParam,
    ) -> Result<(SymbolId, bool), WellKnownError> {
        Ok(match parameter {
            CoreParam::Type(ty) => (self.resolve_type(table, graph, ty)?, false),
            CoreParam::ArrayOf(ty) => (table.array_type(self.resolve_type(table, graph, ty)?, 1), false),
            CoreParam::ByRef(ty) => (self.resolve_type(table, graph, ty)?, true),
        })
    }
}

impl fmt::Debug for WellKnownMembers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WellKnownMembers")
            .field("types", &self.types.read().len())
            .field("methods", &self.methods.read().len())
            .field("fields", &self.fields.read().len())
            .field("properties", &self.properties.read().len())
            .finish()
    }
}

fn has_kind(table: &SymbolTable, candidate: SymbolId, method: &CoreMethod) -> bool {
    let flags = table.flags(candidate);
    let kind = table.method_kind(candidate);
    match method.kind {
        CoreMethodKind::Ordinary => !matches!(
            kind,
            Some(MethodKind::Constructor | MethodKind::StaticConstructor)
        ),
        CoreMethodKind::Constructor => {
            kind == Some(MethodKind::Constructor) && !flags.contains(SymbolFlags::STATIC)
        }
        CoreMethodKind::Operator => {
            flags.contains(SymbolFlags::SPECIAL_NAME) && method.name.starts_with("op_")
        }
        CoreMethodKind::ExplicitCast => {
            flags.contains(SymbolFlags::STATIC)
                && method.name == "op_Explicit"
                && table.parameters(candidate).len() == 1
        }
    }
}

fn same_parameters(table: &SymbolTable, candidate: SymbolId, expected: &[(SymbolId, bool)]) -> bool {
    let parameters = table.parameters(candidate);
    parameters.len() == expected.len()
        && parameters.iter().zip(expected).all(|(&parameter, &(ty, by_ref))| {
            table.flags(parameter).contains(SymbolFlags::BY_REF) == by_ref
                && table.parameter_type(parameter).map(|actual| actual.ty) == Some(ty)
        })
}

fn member_of_category(
    table: &SymbolTable,
    declaring: SymbolId,
    name: &str,
    category: SymbolCategory,
) -> Option<SymbolId> {
    table
        .members_named(declaring, table.intern(name))
        .into_iter()
        .find(|&member| table.category(member) == category)
}
