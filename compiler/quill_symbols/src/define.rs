//! Defining symbols.
//!
//! Children are always defined after their parent. Parts that may refer to
//! symbols defined later (base type, interfaces, field types) can be supplied
//! afterwards through the `set_*` operations, each of which publishes once:
//! a second call is ignored and reported by returning `false`.

use std::sync::OnceLock;

use quill_ir::{AssemblyIdentity, Location, Name};
use rustc_hash::FxHashMap;

use crate::lazy::publish;
use crate::symbol::{MethodDefinition, TypeDefinition};
use crate::table::DerivedKey;
use crate::{
    Accessibility, AssemblyData, Attribute, DefaultValue, ErrorReason, ErrorSymbolData,
    ErrorTypeData, ErrorTypeKind, FieldData, FieldForm, MethodData, MethodForm, MethodKind,
    ModuleData, ModuleReference, NamedTypeData, NamedTypeForm, NamespaceData, ParameterData,
    PropertyData, SpecialType, Symbol, SymbolFlags, SymbolId, SymbolKind, SymbolOrigin,
    SymbolTable, TypeKind, TypeParameterData, TypeParameterOwner, TypeWithModifiers, Variance,
};

/// Common header of a symbol being defined.
#[derive(Clone, Debug)]
pub struct SymbolDecl {
    pub name: Name,
    pub accessibility: Accessibility,
    pub flags: SymbolFlags,
    pub origin: SymbolOrigin,
    pub locations: Vec<Location>,
    pub attributes: Vec<Attribute>,
}

impl SymbolDecl {
    /// A public, source-origin declaration without flags.
    pub fn new(name: Name) -> Self {
        SymbolDecl {
            name,
            accessibility: Accessibility::Public,
            flags: SymbolFlags::empty(),
            origin: SymbolOrigin::Source,
            locations: Vec::new(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: SymbolOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    fn into_symbol(self, containing: Option<SymbolId>, kind: SymbolKind) -> Symbol {
        Symbol {
            name: self.name,
            containing,
            accessibility: self.accessibility,
            flags: self.flags,
            origin: self.origin,
            locations: self.locations,
            attributes: self.attributes,
            kind,
        }
    }
}

/// Generic parameter being defined.
#[derive(Clone, Debug)]
pub struct TypeParameterDecl {
    pub name: Name,
    pub variance: Variance,
    pub has_reference_constraint: bool,
    pub has_value_constraint: bool,
}

impl TypeParameterDecl {
    /// An invariant, unconstrained parameter.
    pub fn new(name: Name) -> Self {
        TypeParameterDecl {
            name,
            variance: Variance::Invariant,
            has_reference_constraint: false,
            has_value_constraint: false,
        }
    }
}

/// Named type being defined.
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub decl: SymbolDecl,
    pub type_kind: TypeKind,
    pub special: SpecialType,
    pub type_parameters: Vec<TypeParameterDecl>,
    /// Whether the emitted name gets a `` `arity`` suffix. Metadata types
    /// whose name already carries the suffix set this.
    pub mangle_name: bool,
}

impl TypeDef {
    /// A non-generic type of the given kind.
    pub fn new(decl: SymbolDecl, type_kind: TypeKind) -> Self {
        TypeDef {
            decl,
            type_kind,
            special: SpecialType::None,
            type_parameters: Vec::new(),
            mangle_name: false,
        }
    }

    #[must_use]
    pub fn with_special(mut self, special: SpecialType) -> Self {
        self.special = special;
        self
    }

    /// Add generic parameters; the emitted name gets the arity suffix.
    #[must_use]
    pub fn with_type_parameters(mut self, type_parameters: Vec<TypeParameterDecl>) -> Self {
        self.mangle_name = !type_parameters.is_empty();
        self.type_parameters = type_parameters;
        self
    }

    #[must_use]
    pub fn with_mangle_name(mut self, mangle_name: bool) -> Self {
        self.mangle_name = mangle_name;
        self
    }
}

/// Method being defined (everything but the signature).
#[derive(Clone, Debug)]
pub struct MethodDef {
    pub decl: SymbolDecl,
    pub method_kind: MethodKind,
    pub type_parameters: Vec<TypeParameterDecl>,
}

impl MethodDef {
    pub fn new(decl: SymbolDecl, method_kind: MethodKind) -> Self {
        MethodDef {
            decl,
            method_kind,
            type_parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type_parameters(mut self, type_parameters: Vec<TypeParameterDecl>) -> Self {
        self.type_parameters = type_parameters;
        self
    }
}

/// Parameter being defined.
#[derive(Clone, Debug)]
pub struct ParameterDecl {
    pub name: Name,
    pub ty: TypeWithModifiers,
    pub flags: SymbolFlags,
    pub default_value: Option<DefaultValue>,
}

impl ParameterDecl {
    pub fn new(name: Name, ty: impl Into<TypeWithModifiers>) -> Self {
        ParameterDecl {
            name,
            ty: ty.into(),
            flags: SymbolFlags::empty(),
            default_value: None,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Make the parameter optional with the given default.
    #[must_use]
    pub fn with_default(mut self, value: DefaultValue) -> Self {
        self.flags |= SymbolFlags::OPTIONAL;
        self.default_value = Some(value);
        self
    }
}

/// Parameters and return type of a method.
#[derive(Clone, Debug)]
pub struct MethodSignature {
    pub parameters: Vec<ParameterDecl>,
    pub return_type: TypeWithModifiers,
}

impl MethodSignature {
    pub fn new(parameters: Vec<ParameterDecl>, return_type: impl Into<TypeWithModifiers>) -> Self {
        MethodSignature {
            parameters,
            return_type: return_type.into(),
        }
    }
}

impl SymbolTable {
    /// Define an assembly. Its modules are defined with `define_module`.
    pub fn define_assembly(&self, identity: AssemblyIdentity, is_cor_library: bool) -> SymbolId {
        self.define_assembly_symbol(identity, false, is_cor_library, SymbolOrigin::Metadata)
    }

    /// Define the assembly being compiled from source.
    pub fn define_source_assembly(&self, identity: AssemblyIdentity) -> SymbolId {
        self.define_assembly_symbol(identity, false, false, SymbolOrigin::Source)
    }

    /// Define a stand-in for a referenced assembly that could not be located.
    ///
    /// The stand-in has a single empty module, so name lookups into it
    /// uniformly produce missing-type sentinels.
    pub fn define_missing_assembly(&self, identity: AssemblyIdentity) -> SymbolId {
        let name = self.intern(&identity.name);
        let assembly =
            self.define_assembly_symbol(identity, true, false, SymbolOrigin::Synthesized);
        self.define_module(assembly, name, FxHashMap::default());
        assembly
    }

    fn define_assembly_symbol(
        &self,
        identity: AssemblyIdentity,
        is_missing: bool,
        is_cor_library: bool,
        origin: SymbolOrigin,
    ) -> SymbolId {
        let decl = SymbolDecl::new(self.intern(&identity.name))
            .with_accessibility(Accessibility::NotApplicable)
            .with_origin(origin);
        self.alloc(decl.into_symbol(
            None,
            SymbolKind::Assembly(AssemblyData {
                identity,
                is_missing,
                is_cor_library,
            }),
        ))
    }

    /// Define the next module of `assembly` together with its global
    /// namespace. The first module defined is the primary module.
    pub fn define_module(
        &self,
        assembly: SymbolId,
        name: Name,
        forwarded_types: FxHashMap<Box<str>, AssemblyIdentity>,
    ) -> SymbolId {
        let ordinal = u32::try_from(self.declared_members(assembly).len()).unwrap_or(u32::MAX);
        let origin = self.get(assembly).origin;
        let module = self.alloc_member(
            SymbolDecl::new(name)
                .with_accessibility(Accessibility::NotApplicable)
                .with_origin(origin)
                .into_symbol(
                    Some(assembly),
                    SymbolKind::Module(ModuleData {
                        ordinal,
                        forwarded_types,
                        global_namespace: OnceLock::new(),
                        references: OnceLock::new(),
                    }),
                ),
        );
        let global = self.alloc(
            SymbolDecl::new(Name::EMPTY)
                .with_accessibility(Accessibility::NotApplicable)
                .with_origin(origin)
                .into_symbol(
                    Some(module),
                    SymbolKind::Namespace(NamespaceData::Concrete { module }),
                ),
        );
        if let SymbolKind::Module(data) = &self.get(module).kind {
            publish(&data.global_namespace, || global);
        }
        module
    }

    /// Set the reference table of a module.
    pub fn set_module_references(&self, module: SymbolId, references: Vec<ModuleReference>) -> bool {
        match &self.get(module).kind {
            SymbolKind::Module(data) => data.references.set(references).is_ok(),
            _ => false,
        }
    }

    /// Get or define the child namespace `name` of a concrete namespace.
    ///
    /// Returns `parent` itself when it is not a concrete namespace.
    pub fn get_or_define_namespace(&self, parent: SymbolId, name: Name) -> SymbolId {
        let parent_symbol = self.get(parent);
        let SymbolKind::Namespace(NamespaceData::Concrete { module }) = &parent_symbol.kind else {
            return parent;
        };
        let module = *module;
        let origin = parent_symbol.origin;
        self.intern_keyed(
            &self.derived,
            DerivedKey::Namespace { parent, name },
            true,
            || {
                SymbolDecl::new(name)
                    .with_accessibility(Accessibility::NotApplicable)
                    .with_origin(origin)
                    .into_symbol(
                        Some(parent),
                        SymbolKind::Namespace(NamespaceData::Concrete { module }),
                    )
            },
        )
    }

    /// Get or define a dotted namespace path (`"System.Collections"`) below
    /// `root`.
    pub fn get_or_define_namespace_path(&self, root: SymbolId, path: &str) -> SymbolId {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .fold(root, |parent, segment| {
                self.get_or_define_namespace(parent, self.intern(segment))
            })
    }

    /// Define a named type in a namespace or as a nested type.
    pub fn define_type(&self, container: SymbolId, def: TypeDef) -> SymbolId {
        let arity = def.type_parameters.len();
        let ty = self.alloc_member(def.decl.into_symbol(
            Some(container),
            SymbolKind::NamedType(NamedTypeData {
                type_kind: def.type_kind,
                special: def.special,
                arity,
                mangle_name: def.mangle_name,
                form: NamedTypeForm::Definition(TypeDefinition::default()),
                all_interfaces: OnceLock::new(),
            }),
        ));
        let params = self.define_type_parameters(ty, TypeParameterOwner::Type, def.type_parameters);
        if let SymbolKind::NamedType(NamedTypeData {
            form: NamedTypeForm::Definition(definition),
            ..
        }) = &self.get(ty).kind
        {
            publish(&definition.type_parameters, || params);
        }
        ty
    }

    fn define_type_parameters(
        &self,
        owner_symbol: SymbolId,
        owner: TypeParameterOwner,
        decls: Vec<TypeParameterDecl>,
    ) -> Vec<SymbolId> {
        let origin = self.get(owner_symbol).origin;
        decls
            .into_iter()
            .enumerate()
            .map(|(ordinal, decl)| {
                self.alloc(
                    SymbolDecl::new(decl.name)
                        .with_accessibility(Accessibility::NotApplicable)
                        .with_origin(origin)
                        .into_symbol(
                            Some(owner_symbol),
                            SymbolKind::TypeParameter(TypeParameterData {
                                ordinal,
                                owner,
                                variance: decl.variance,
                                has_reference_constraint: decl.has_reference_constraint,
                                has_value_constraint: decl.has_value_constraint,
                            }),
                        ),
                )
            })
            .collect()
    }

    /// Set the base type of a type definition.
    pub fn set_base_type(&self, ty: SymbolId, base: Option<SymbolId>) -> bool {
        match &self.get(ty).kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Definition(definition),
                ..
            }) => definition.base_type.set(base).is_ok(),
            _ => false,
        }
    }

    /// Set the declared interfaces of a type definition.
    pub fn set_interfaces(&self, ty: SymbolId, interfaces: Vec<SymbolId>) -> bool {
        match &self.get(ty).kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Definition(definition),
                ..
            }) => definition.interfaces.set(interfaces).is_ok(),
            _ => false,
        }
    }

    /// Define a method of a type.
    ///
    /// `signature` receives the method's own type parameters so that the
    /// parameter and return types can refer to them.
    pub fn define_method(
        &self,
        container: SymbolId,
        def: MethodDef,
        signature: impl FnOnce(&[SymbolId]) -> MethodSignature,
    ) -> SymbolId {
        let arity = def.type_parameters.len();
        let origin = def.decl.origin;
        let method = self.alloc_member(def.decl.into_symbol(
            Some(container),
            SymbolKind::Method(MethodData {
                method_kind: def.method_kind,
                arity,
                form: MethodForm::Definition(MethodDefinition::default()),
            }),
        ));
        let type_parameters =
            self.define_type_parameters(method, TypeParameterOwner::Method, def.type_parameters);
        let signature = signature(&type_parameters);
        let parameters = self.define_parameters(method, origin, signature.parameters);

        let symbol = self.get(method);
        if let SymbolKind::Method(MethodData {
            form: MethodForm::Definition(definition),
            ..
        }) = &symbol.kind
        {
            publish(&definition.type_parameters, || type_parameters);
            publish(&definition.parameters, || parameters);
            publish(&definition.return_type, || signature.return_type);
        }
        method
    }

    fn define_parameters(
        &self,
        method: SymbolId,
        origin: SymbolOrigin,
        decls: Vec<ParameterDecl>,
    ) -> Vec<SymbolId> {
        decls
            .into_iter()
            .enumerate()
            .map(|(ordinal, decl)| {
                let ordinal = i32::try_from(ordinal).unwrap_or(i32::MAX);
                self.alloc(
                    SymbolDecl::new(decl.name)
                        .with_accessibility(Accessibility::NotApplicable)
                        .with_flags(decl.flags)
                        .with_origin(origin)
                        .into_symbol(
                            Some(method),
                            SymbolKind::Parameter(ParameterData {
                                ordinal,
                                ty: decl.ty,
                                default_value: decl.default_value,
                                original_definition: None,
                            }),
                        ),
                )
            })
            .collect()
    }

    /// Define a field with a known type.
    pub fn define_field(
        &self,
        container: SymbolId,
        decl: SymbolDecl,
        ty: impl Into<TypeWithModifiers>,
        default_value: Option<DefaultValue>,
    ) -> SymbolId {
        let field = self.define_field_deferred(container, decl, default_value);
        self.set_field_type(field, ty.into());
        field
    }

    /// Define a field whose type is supplied later with `set_field_type`.
    pub fn define_field_deferred(
        &self,
        container: SymbolId,
        decl: SymbolDecl,
        default_value: Option<DefaultValue>,
    ) -> SymbolId {
        self.alloc_member(decl.into_symbol(
            Some(container),
            SymbolKind::Field(FieldData {
                form: FieldForm::Definition {
                    ty: OnceLock::new(),
                    default_value,
                },
            }),
        ))
    }

    /// Publish the type of a field defined with `define_field_deferred`.
    pub fn set_field_type(&self, field: SymbolId, ty: TypeWithModifiers) -> bool {
        match &self.get(field).kind {
            SymbolKind::Field(FieldData {
                form: FieldForm::Definition { ty: cell, .. },
            }) => cell.set(ty).is_ok(),
            _ => false,
        }
    }

    /// Define a property with its accessor methods.
    pub fn define_property(
        &self,
        container: SymbolId,
        decl: SymbolDecl,
        ty: impl Into<TypeWithModifiers>,
        getter: Option<SymbolId>,
        setter: Option<SymbolId>,
    ) -> SymbolId {
        self.alloc_member(decl.into_symbol(
            Some(container),
            SymbolKind::Property(PropertyData {
                ty: ty.into(),
                getter,
                setter,
                original_definition: None,
            }),
        ))
    }

    /// The missing-by-name error type for `namespace.name` with `arity`,
    /// deduplicated per expected assembly.
    pub fn missing_type(
        &self,
        assembly: Option<AssemblyIdentity>,
        namespace: Name,
        name: Name,
        arity: usize,
    ) -> SymbolId {
        let key = DerivedKey::MissingType {
            assembly: assembly.clone(),
            namespace,
            name,
            arity,
        };
        self.intern_keyed(&self.derived, key, false, || {
            Self::error_type_symbol(ErrorTypeKind::Missing { assembly, namespace }, name, arity)
        })
    }

    /// A fresh error type that is not deduplicated (unsupported metadata,
    /// forwarding cycles, ambiguous lookups).
    pub fn error_type(&self, kind: ErrorTypeKind, name: Name, arity: usize) -> SymbolId {
        self.alloc(Self::error_type_symbol(kind, name, arity))
    }

    /// The placeholder standing for an omitted type argument (`List<>`).
    pub fn unbound_argument(&self) -> SymbolId {
        self.intern_keyed(&self.derived, DerivedKey::UnboundArgument, false, || {
            Self::error_type_symbol(ErrorTypeKind::UnboundArgument, Name::EMPTY, 0)
        })
    }

    fn error_type_symbol(kind: ErrorTypeKind, name: Name, arity: usize) -> Symbol {
        SymbolDecl::new(name)
            .with_origin(SymbolOrigin::Synthesized)
            .into_symbol(None, SymbolKind::ErrorType(ErrorTypeData { kind, arity }))
    }

    /// A non-type sentinel for a failed member lookup.
    pub fn error_symbol(&self, name: Name, reason: ErrorReason) -> SymbolId {
        self.alloc(
            SymbolDecl::new(name)
                .with_origin(SymbolOrigin::Synthesized)
                .into_symbol(None, SymbolKind::Error(ErrorSymbolData { reason })),
        )
    }

    /// The implicit receiver parameter (`this`) of an instance method.
    ///
    /// Returns `None` for static methods and non-methods.
    pub fn this_parameter(&self, method: SymbolId) -> Option<SymbolId> {
        let symbol = self.get(method);
        if !symbol.is_method() || symbol.is_static() {
            return None;
        }
        let receiver = symbol.containing?;
        let name = self.intern("this");
        Some(
            self.intern_keyed(&self.derived, DerivedKey::Receiver(method), false, || {
                SymbolDecl::new(name)
                    .with_accessibility(Accessibility::NotApplicable)
                    .with_flags(SymbolFlags::IMPLICIT)
                    .with_origin(SymbolOrigin::Synthesized)
                    .into_symbol(
                        Some(method),
                        SymbolKind::Parameter(ParameterData {
                            ordinal: -1,
                            ty: TypeWithModifiers::plain(receiver),
                            default_value: None,
                            original_definition: None,
                        }),
                    )
            }),
        )
    }
}

#[cfg(test)]
mod tests;
