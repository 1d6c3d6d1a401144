//! Symbol records.
//!
//! A `Symbol` is the common header (name, container, accessibility, flags,
//! origin, locations, attributes) plus a `SymbolKind` payload. Payload parts
//! that may refer to symbols created later (base types, signatures, field
//! types, members of substituted views) are `OnceLock`s owned by the record
//! and read through `SymbolTable` queries.

use std::sync::OnceLock;

use quill_ir::{AssemblyIdentity, ConstantValue, Location, Name};
use rustc_hash::FxHashMap;

use crate::{ErrorReason, ErrorTypeKind, SpecialType, SubstitutionMap, SymbolFlags, SymbolId};

/// Declared accessibility.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Accessibility {
    /// Namespaces, assemblies, parameters and type parameters.
    #[default]
    NotApplicable,
    Private,
    Protected,
    Internal,
    ProtectedOrInternal,
    Public,
}

/// Where a symbol came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum SymbolOrigin {
    /// Declared in compiled source.
    #[default]
    Source,
    /// Read from a pre-compiled binary module.
    Metadata,
    /// Created by the compiler (constructed views, sentinels, receivers).
    Synthesized,
}

/// Opaque attribute annotation: a key plus constructor arguments.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Attribute {
    pub key: Name,
    pub arguments: Vec<ConstantValue>,
}

/// Optional or required modifier attached to a type occurrence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CustomModifier {
    /// The modifier type.
    pub modifier: SymbolId,
    pub is_optional: bool,
}

/// A type occurrence together with its custom modifiers.
///
/// Modifiers survive substitution but do not take part in type identity
/// unless a comparison asks for them.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeWithModifiers {
    pub ty: SymbolId,
    pub modifiers: Vec<CustomModifier>,
}

impl TypeWithModifiers {
    /// A type occurrence without modifiers.
    #[inline]
    pub fn plain(ty: SymbolId) -> Self {
        TypeWithModifiers {
            ty,
            modifiers: Vec::new(),
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Vec<CustomModifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn has_modifiers(&self) -> bool {
        !self.modifiers.is_empty()
    }

    /// Compare types, optionally ignoring modifiers.
    pub fn same_type(&self, other: &TypeWithModifiers, ignore_modifiers: bool) -> bool {
        self.ty == other.ty && (ignore_modifiers || self.modifiers == other.modifiers)
    }
}

impl From<SymbolId> for TypeWithModifiers {
    fn from(ty: SymbolId) -> Self {
        TypeWithModifiers::plain(ty)
    }
}

/// Default value of a field or optional parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DefaultValue {
    /// Representable inline in metadata.
    Constant(ConstantValue),
    /// Not representable inline; the value lives in this static field.
    StaticHolder(SymbolId),
}

/// Coarse classification of a symbol.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolCategory {
    Assembly,
    Module,
    Namespace,
    Type,
    Method,
    Field,
    Property,
    Parameter,
    Error,
}

/// Kind of a type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
    Array,
    Pointer,
    TypeParameter,
    Error,
}

/// Kind of a method.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum MethodKind {
    #[default]
    Ordinary,
    Constructor,
    StaticConstructor,
    PropertyGet,
    PropertySet,
    Operator,
    /// `op_Implicit` / `op_Explicit`.
    Conversion,
}

/// Declared variance of a generic parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

/// What declares a type parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeParameterOwner {
    Type,
    Method,
}

/// A symbol record.
#[derive(Debug)]
pub struct Symbol {
    pub name: Name,
    /// Non-owning link to the containing symbol. `None` only for assemblies
    /// and synthesized types that have no container (arrays, pointers,
    /// sentinels).
    pub containing: Option<SymbolId>,
    pub accessibility: Accessibility,
    pub flags: SymbolFlags,
    pub origin: SymbolOrigin,
    /// Declaring source locations; empty for binary-origin symbols.
    pub locations: Vec<Location>,
    pub attributes: Vec<Attribute>,
    pub kind: SymbolKind,
}

impl Symbol {
    /// Coarse classification of the payload.
    pub fn category(&self) -> SymbolCategory {
        match &self.kind {
            SymbolKind::Assembly(_) => SymbolCategory::Assembly,
            SymbolKind::Module(_) => SymbolCategory::Module,
            SymbolKind::Namespace(_) => SymbolCategory::Namespace,
            SymbolKind::NamedType(_)
            | SymbolKind::TypeParameter(_)
            | SymbolKind::Array(_)
            | SymbolKind::Pointer(_)
            | SymbolKind::ErrorType(_) => SymbolCategory::Type,
            SymbolKind::Method(_) => SymbolCategory::Method,
            SymbolKind::Field(_) => SymbolCategory::Field,
            SymbolKind::Property(_) => SymbolCategory::Property,
            SymbolKind::Parameter(_) => SymbolCategory::Parameter,
            SymbolKind::Error(_) => SymbolCategory::Error,
        }
    }

    /// Whether this symbol stands in for a failed resolution.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, SymbolKind::ErrorType(_) | SymbolKind::Error(_))
    }

    /// Whether this is a method symbol.
    pub fn is_method(&self) -> bool {
        matches!(self.kind, SymbolKind::Method(_))
    }

    /// Whether this is a named type (definition or constructed).
    pub fn is_named_type(&self) -> bool {
        matches!(self.kind, SymbolKind::NamedType(_))
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(SymbolFlags::STATIC)
    }
}

/// Symbol payload.
#[derive(Debug)]
pub enum SymbolKind {
    Assembly(AssemblyData),
    Module(ModuleData),
    Namespace(NamespaceData),
    NamedType(NamedTypeData),
    TypeParameter(TypeParameterData),
    Array(ArrayTypeData),
    Pointer(PointerTypeData),
    ErrorType(ErrorTypeData),
    Method(MethodData),
    Field(FieldData),
    Property(PropertyData),
    Parameter(ParameterData),
    /// Non-type sentinel (missing, ambiguous or inaccessible member).
    Error(ErrorSymbolData),
}

/// Assembly payload. Modules are the assembly's members, primary first.
#[derive(Debug)]
pub struct AssemblyData {
    pub identity: AssemblyIdentity,
    /// Stand-in for a referenced assembly that could not be located.
    pub is_missing: bool,
    /// Has no references and defines `System.Object`.
    pub is_cor_library: bool,
}

/// One entry of a module's reference table.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ModuleReference {
    /// Identity as written in the referencing module.
    pub identity: AssemblyIdentity,
    /// Bound assembly, possibly a missing-assembly sentinel.
    pub assembly: SymbolId,
}

/// Module payload.
#[derive(Debug)]
pub struct ModuleData {
    /// Position within the assembly; the primary module is 0.
    pub ordinal: u32,
    /// Type-forwarders: fully qualified metadata name to target assembly.
    pub forwarded_types: FxHashMap<Box<str>, AssemblyIdentity>,
    pub(crate) global_namespace: OnceLock<SymbolId>,
    pub(crate) references: OnceLock<Vec<ModuleReference>>,
}

/// Namespace payload.
#[derive(Debug)]
pub enum NamespaceData {
    /// Declared by a single module; members live in the table's member index.
    Concrete { module: SymbolId },
    /// Merge view over same-named namespaces of several modules/assemblies.
    Merged { constituents: Vec<SymbolId> },
}

/// Named type payload (class, interface, struct, enum, delegate).
#[derive(Debug)]
pub struct NamedTypeData {
    pub type_kind: TypeKind,
    pub special: SpecialType,
    /// Number of own type parameters (not counting the container's).
    pub arity: usize,
    /// Whether the emitted name carries a `` `arity`` suffix.
    pub mangle_name: bool,
    pub form: NamedTypeForm,
    pub(crate) all_interfaces: OnceLock<Vec<SymbolId>>,
}

/// Definition vs. substituted view of a named type.
#[derive(Debug)]
pub enum NamedTypeForm {
    Definition(TypeDefinition),
    Substituted(SubstitutedType),
}

/// Write-once parts of a type definition.
#[derive(Debug, Default)]
pub struct TypeDefinition {
    pub(crate) type_parameters: OnceLock<Vec<SymbolId>>,
    pub(crate) base_type: OnceLock<Option<SymbolId>>,
    pub(crate) interfaces: OnceLock<Vec<SymbolId>>,
}

/// A named type seen through a substitution: either constructed with type
/// arguments, or a nested type re-parented into a constructed container.
#[derive(Debug)]
pub struct SubstitutedType {
    pub original_definition: SymbolId,
    /// The unconstructed symbol this was built from; `None` when the view is
    /// itself unconstructed (a nested type of a constructed container).
    pub constructed_from: Option<SymbolId>,
    /// Own type arguments; empty for an unconstructed view.
    pub type_arguments: Vec<TypeWithModifiers>,
    pub map: SubstitutionMap,
    pub(crate) base_type: OnceLock<Option<SymbolId>>,
    pub(crate) interfaces: OnceLock<Vec<SymbolId>>,
    pub(crate) members: OnceLock<Vec<SymbolId>>,
}

/// Generic parameter payload.
#[derive(Debug)]
pub struct TypeParameterData {
    pub ordinal: usize,
    pub owner: TypeParameterOwner,
    pub variance: Variance,
    pub has_reference_constraint: bool,
    pub has_value_constraint: bool,
}

/// Array type payload (`T[]`, `T[,]`).
#[derive(Debug)]
pub struct ArrayTypeData {
    pub element: TypeWithModifiers,
    pub rank: u32,
}

/// Unmanaged pointer payload.
#[derive(Debug)]
pub struct PointerTypeData {
    pub pointee: TypeWithModifiers,
}

/// Error type payload.
#[derive(Debug)]
pub struct ErrorTypeData {
    pub kind: ErrorTypeKind,
    pub arity: usize,
}

/// Method payload.
#[derive(Debug)]
pub struct MethodData {
    pub method_kind: MethodKind,
    /// Number of own type parameters.
    pub arity: usize,
    pub form: MethodForm,
}

/// Definition vs. substituted view of a method.
#[derive(Debug)]
pub enum MethodForm {
    Definition(MethodDefinition),
    Substituted(SubstitutedMethod),
}

/// Write-once parts of a method definition.
#[derive(Debug, Default)]
pub struct MethodDefinition {
    pub(crate) type_parameters: OnceLock<Vec<SymbolId>>,
    pub(crate) parameters: OnceLock<Vec<SymbolId>>,
    pub(crate) return_type: OnceLock<TypeWithModifiers>,
}

/// A method seen through a substitution: a member of a constructed type,
/// or a generic method constructed with explicit type arguments.
#[derive(Debug)]
pub struct SubstitutedMethod {
    pub original_definition: SymbolId,
    /// `None` for members of constructed types; the generic method for
    /// explicit constructions.
    pub constructed_from: Option<SymbolId>,
    pub type_arguments: Vec<TypeWithModifiers>,
    pub map: SubstitutionMap,
    pub(crate) parameters: OnceLock<Vec<SymbolId>>,
    pub(crate) return_type: OnceLock<TypeWithModifiers>,
}

/// Field payload.
#[derive(Debug)]
pub struct FieldData {
    pub form: FieldForm,
}

/// Definition vs. substituted view of a field.
#[derive(Debug)]
pub enum FieldForm {
    Definition {
        /// Published once; may be set after the field itself is created so
        /// that a field can refer to a type still being built.
        ty: OnceLock<TypeWithModifiers>,
        default_value: Option<DefaultValue>,
    },
    Substituted {
        original_definition: SymbolId,
        map: SubstitutionMap,
        ty: OnceLock<TypeWithModifiers>,
    },
}

/// Property payload.
#[derive(Debug)]
pub struct PropertyData {
    pub ty: TypeWithModifiers,
    pub getter: Option<SymbolId>,
    pub setter: Option<SymbolId>,
    /// Definition this property was substituted from.
    pub original_definition: Option<SymbolId>,
}

/// Parameter payload.
#[derive(Debug)]
pub struct ParameterData {
    /// Position in the signature; `-1` for the implicit receiver.
    pub ordinal: i32,
    pub ty: TypeWithModifiers,
    pub default_value: Option<DefaultValue>,
    /// Definition this parameter was substituted from.
    pub original_definition: Option<SymbolId>,
}

/// Non-type sentinel payload.
#[derive(Debug)]
pub struct ErrorSymbolData {
    pub reason: ErrorReason,
}
