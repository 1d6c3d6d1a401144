//! Decoded module records.
//!
//! A `ModuleImage` is what a metadata reader yields for one module file:
//! the owning assembly's identity, the assemblies it references, its type
//! definitions and its type-forwarders. Type references inside the records
//! are unresolved `TypeRef`s; binding them is the reference manager's job.

use quill_ir::{AssemblyIdentity, ConstantValue};
use quill_symbols::{Accessibility, MethodKind, SymbolFlags, TypeKind};

/// Where a named type reference points.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeScope {
    /// A type defined in the referencing module's own assembly.
    CurrentAssembly,
    /// A type defined in a referenced assembly.
    Assembly(AssemblyIdentity),
}

/// An unresolved type occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// `namespace.name`, optionally followed by nested type names.
    ///
    /// `type_arguments` is the flattened argument list of the whole nesting
    /// chain, outermost type's arguments first.
    Named {
        scope: TypeScope,
        namespace: Box<str>,
        name: Box<str>,
        nested: Vec<Box<str>>,
        type_arguments: Vec<TypeRef>,
    },
    /// Generic parameter of the enclosing type chain. Indexes the
    /// concatenation of every enclosing type's parameters, outermost first.
    TypeParameter(u32),
    /// Generic parameter of the enclosing method.
    MethodTypeParameter(u32),
    Array { element: Box<TypeRef>, rank: u32 },
    Pointer(Box<TypeRef>),
    /// A type occurrence annotated with a custom modifier.
    Modified {
        ty: Box<TypeRef>,
        modifier: Box<TypeRef>,
        is_optional: bool,
    },
    /// An encoding the reader could not decode.
    Unsupported,
}

impl TypeRef {
    /// A non-generic type in another assembly.
    pub fn named(scope: TypeScope, namespace: &str, name: &str) -> Self {
        TypeRef::Named {
            scope,
            namespace: namespace.into(),
            name: name.into(),
            nested: Vec::new(),
            type_arguments: Vec::new(),
        }
    }

    /// A type of the referencing assembly.
    pub fn local(namespace: &str, name: &str) -> Self {
        TypeRef::named(TypeScope::CurrentAssembly, namespace, name)
    }

    /// A type of the assembly `identity`.
    pub fn external(identity: &AssemblyIdentity, namespace: &str, name: &str) -> Self {
        TypeRef::named(TypeScope::Assembly(identity.clone()), namespace, name)
    }

    /// Append a nested type name.
    #[must_use]
    pub fn nested(mut self, nested_name: &str) -> Self {
        if let TypeRef::Named { nested, .. } = &mut self {
            nested.push(nested_name.into());
        }
        self
    }

    /// Attach type arguments to a named reference.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<TypeRef>) -> Self {
        if let TypeRef::Named { type_arguments, .. } = &mut self {
            *type_arguments = arguments;
        }
        self
    }

    /// `self[]`.
    #[must_use]
    pub fn array(self) -> Self {
        TypeRef::Array {
            element: Box::new(self),
            rank: 1,
        }
    }

    /// `self*`.
    #[must_use]
    pub fn pointer(self) -> Self {
        TypeRef::Pointer(Box::new(self))
    }

    /// `self modopt(modifier)` / `self modreq(modifier)`.
    #[must_use]
    pub fn modified(self, modifier: TypeRef, is_optional: bool) -> Self {
        TypeRef::Modified {
            ty: Box::new(self),
            modifier: Box::new(modifier),
            is_optional,
        }
    }
}

/// A custom attribute application.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeRecord {
    /// Full name of the attribute type.
    pub name: Box<str>,
    pub arguments: Vec<ConstantValue>,
}

/// A method parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterRecord {
    pub name: Box<str>,
    pub ty: TypeRef,
    pub flags: SymbolFlags,
    pub default_value: Option<ConstantValue>,
}

impl ParameterRecord {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        ParameterRecord {
            name: name.into(),
            ty,
            flags: SymbolFlags::empty(),
            default_value: None,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Optional parameter with a default.
    #[must_use]
    pub fn with_default(mut self, value: ConstantValue) -> Self {
        self.flags |= SymbolFlags::OPTIONAL;
        self.default_value = Some(value);
        self
    }
}

/// A method definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodRecord {
    pub name: Box<str>,
    pub kind: MethodKind,
    pub accessibility: Accessibility,
    pub flags: SymbolFlags,
    pub generic_parameters: Vec<Box<str>>,
    pub parameters: Vec<ParameterRecord>,
    pub return_type: TypeRef,
    pub attributes: Vec<AttributeRecord>,
}

impl MethodRecord {
    /// A public ordinary method.
    pub fn new(name: &str, return_type: TypeRef) -> Self {
        MethodRecord {
            name: name.into(),
            kind: MethodKind::Ordinary,
            accessibility: Accessibility::Public,
            flags: SymbolFlags::empty(),
            generic_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type,
            attributes: Vec::new(),
        }
    }

    /// A public instance constructor (`.ctor`) returning `void`.
    pub fn constructor(void: TypeRef) -> Self {
        MethodRecord {
            kind: MethodKind::Constructor,
            flags: SymbolFlags::SPECIAL_NAME,
            ..MethodRecord::new(".ctor", void)
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_generic_parameters(mut self, names: &[&str]) -> Self {
        self.generic_parameters = names.iter().map(|&name| name.into()).collect();
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterRecord) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// A field definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRecord {
    pub name: Box<str>,
    pub accessibility: Accessibility,
    pub flags: SymbolFlags,
    pub ty: TypeRef,
    /// Literal value of a constant field.
    pub constant: Option<ConstantValue>,
}

impl FieldRecord {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        FieldRecord {
            name: name.into(),
            accessibility: Accessibility::Public,
            flags: SymbolFlags::empty(),
            ty,
            constant: None,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_constant(mut self, value: ConstantValue) -> Self {
        self.flags |= SymbolFlags::CONST | SymbolFlags::STATIC;
        self.constant = Some(value);
        self
    }
}

/// A property definition. Accessors are indices into the declaring type's
/// method list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRecord {
    pub name: Box<str>,
    pub accessibility: Accessibility,
    pub flags: SymbolFlags,
    pub ty: TypeRef,
    pub getter: Option<usize>,
    pub setter: Option<usize>,
}

impl PropertyRecord {
    pub fn new(name: &str, ty: TypeRef, getter: Option<usize>, setter: Option<usize>) -> Self {
        PropertyRecord {
            name: name.into(),
            accessibility: Accessibility::Public,
            flags: SymbolFlags::empty(),
            ty,
            getter,
            setter,
        }
    }
}

/// A type definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefRecord {
    /// Namespace; empty for nested types.
    pub namespace: Box<str>,
    /// Name as emitted, possibly arity-mangled (`"List`1"`).
    pub name: Box<str>,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    pub flags: SymbolFlags,
    /// Own generic parameters (not repeating the enclosing types').
    pub generic_parameters: Vec<Box<str>>,
    pub base_type: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub nested_types: Vec<TypeDefRecord>,
    pub methods: Vec<MethodRecord>,
    pub fields: Vec<FieldRecord>,
    pub properties: Vec<PropertyRecord>,
    pub attributes: Vec<AttributeRecord>,
}

impl TypeDefRecord {
    /// A public, non-generic type without members.
    pub fn new(namespace: &str, name: &str, kind: TypeKind) -> Self {
        TypeDefRecord {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            accessibility: Accessibility::Public,
            flags: SymbolFlags::empty(),
            generic_parameters: Vec::new(),
            base_type: None,
            interfaces: Vec::new(),
            nested_types: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Full metadata name (`"System.Collections.Generic.List`1"`).
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_generic_parameters(mut self, names: &[&str]) -> Self {
        self.generic_parameters = names.iter().map(|&name| name.into()).collect();
        self
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base_type = Some(base);
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn with_nested(mut self, nested: TypeDefRecord) -> Self {
        self.nested_types.push(nested);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodRecord) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldRecord) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertyRecord) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, arguments: Vec<ConstantValue>) -> Self {
        self.attributes.push(AttributeRecord {
            name: name.into(),
            arguments,
        });
        self
    }
}

/// A type-forwarder: lookups of `full_name` continue in `target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ForwardedTypeRecord {
    pub full_name: Box<str>,
    pub target: AssemblyIdentity,
}

/// One decoded module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleImage {
    /// Identity of the assembly this module belongs to.
    pub assembly: AssemblyIdentity,
    pub module_name: Box<str>,
    /// Referenced assemblies, in reference-table order.
    pub references: Vec<AssemblyIdentity>,
    pub types: Vec<TypeDefRecord>,
    pub forwarded_types: Vec<ForwardedTypeRecord>,
}

impl ModuleImage {
    /// The primary module of `assembly`, named `<name>.dll`.
    pub fn new(assembly: AssemblyIdentity) -> Self {
        let module_name = format!("{}.dll", assembly.name).into_boxed_str();
        ModuleImage {
            assembly,
            module_name,
            references: Vec::new(),
            types: Vec::new(),
            forwarded_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_module_name(mut self, name: &str) -> Self {
        self.module_name = name.into();
        self
    }

    #[must_use]
    pub fn with_reference(mut self, identity: AssemblyIdentity) -> Self {
        self.references.push(identity);
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeDefRecord) -> Self {
        self.types.push(ty);
        self
    }

    #[must_use]
    pub fn with_forwarded_type(mut self, full_name: &str, target: AssemblyIdentity) -> Self {
        self.forwarded_types.push(ForwardedTypeRecord {
            full_name: full_name.into(),
            target,
        });
        self
    }

    /// Whether this module defines the top-level type `namespace.name`.
    pub fn defines(&self, namespace: &str, name: &str) -> bool {
        self.types
            .iter()
            .any(|ty| &*ty.namespace == namespace && &*ty.name == name)
    }
}
