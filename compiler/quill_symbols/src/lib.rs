//! Symbol model for the Quill compiler.
//!
//! Every named entity the compiler reasons about (assemblies, modules,
//! namespaces, types, methods, fields, properties, parameters) is a `Symbol`
//! stored in a per-compilation `SymbolTable` and referenced by a 32-bit
//! `SymbolId`. Identity is `SymbolId` equality.
//!
//! # Design
//!
//! - **Arena**: symbols are appended, never removed or replaced. Containing
//!   symbol and original definition links are plain ids.
//! - **Tagged variants**: `SymbolKind` distinguishes the entity; named types
//!   and methods additionally carry a `Definition` or `Substituted` form.
//! - **Write-once parts**: base types, interfaces, signatures and every lazily
//!   computed view are `OnceLock`s, published once and never reassigned.
//! - **Sentinels as values**: unresolved, ambiguous or inaccessible lookups
//!   produce `ErrorType`/`Error` symbols or `ErrorReason`s, never panics.

mod access;
mod define;
mod error;
#[cfg(test)]
mod fixtures;
mod flags;
mod id;
mod lazy;
mod query;
mod special;
mod subst;
mod symbol;
mod table;

pub use access::AccessScope;
pub use define::{
    MethodDef, MethodSignature, ParameterDecl, SymbolDecl, TypeDef, TypeParameterDecl,
};
pub use error::{ConstructError, ErrorReason, ErrorTypeKind};
pub use flags::SymbolFlags;
pub use id::SymbolId;
pub use special::SpecialType;
pub use subst::SubstitutionMap;
pub use symbol::{
    Accessibility, ArrayTypeData, Attribute, CustomModifier, DefaultValue, ErrorSymbolData,
    ErrorTypeData, FieldData, FieldForm, MethodData, MethodForm, MethodKind, ModuleData,
    MethodDefinition, ModuleReference, NamedTypeData, NamedTypeForm, NamespaceData,
    ParameterData, PointerTypeData, PropertyData, SubstitutedMethod, SubstitutedType, Symbol,
    SymbolCategory, SymbolKind, SymbolOrigin, TypeDefinition, TypeKind, TypeParameterData,
    TypeParameterOwner, TypeWithModifiers, Variance, AssemblyData,
};
pub use table::SymbolTable;
