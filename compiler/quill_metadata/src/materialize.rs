//! Turning module images into symbols.
//!
//! Shells (modules, namespaces, type definitions) are defined as soon as an
//! assembly is located. Everything that refers to other types is bound in a
//! second pass, after the whole reference graph is known, through a
//! `TypeResolver` that carries the generic context of the declaration being
//! bound.

use std::sync::Arc;

use quill_ir::{AssemblyIdentity, Name};
use quill_symbols::{
    Accessibility, Attribute, CustomModifier, DefaultValue, ErrorTypeKind, MethodDef,
    MethodSignature, ParameterDecl, SpecialType, SymbolDecl, SymbolFlags, SymbolId, SymbolOrigin,
    SymbolTable, TypeDef, TypeParameterDecl, TypeWithModifiers,
};
use rustc_hash::FxHashMap;

use crate::{
    lookup_metadata_type, split_arity, AttributeRecord, MetadataTypeName, ModuleImage,
    ReferenceGraph, TypeDefRecord, TypeRef, TypeScope,
};

/// A module whose shells are defined but whose members are not bound yet.
pub(crate) struct ModuleShell {
    pub assembly: SymbolId,
    pub module: SymbolId,
    pub image: Arc<ModuleImage>,
    types: Vec<TypeShell>,
}

/// A defined type paired with the shells of its nested types, in record
/// order.
struct TypeShell {
    symbol: SymbolId,
    nested: Vec<TypeShell>,
}

/// Define a module of `assembly` with its namespaces and type shells.
///
/// Special-type tags are assigned to top-level types when `is_cor_library`.
pub(crate) fn define_module_shell(
    table: &SymbolTable,
    assembly: SymbolId,
    image: Arc<ModuleImage>,
    is_cor_library: bool,
) -> ModuleShell {
    let forwarded: FxHashMap<Box<str>, AssemblyIdentity> = image
        .forwarded_types
        .iter()
        .map(|record| (record.full_name.clone(), record.target.clone()))
        .collect();
    let module = table.define_module(assembly, table.intern(&image.module_name), forwarded);
    let global = table.global_namespace(module).unwrap_or(module);

    let types = image
        .types
        .iter()
        .map(|record| {
            let namespace = table.get_or_define_namespace_path(global, &record.namespace);
            let special = if is_cor_library {
                SpecialType::from_metadata_name(&record.full_name())
            } else {
                SpecialType::None
            };
            define_type_shell(table, namespace, record, special)
        })
        .collect();

    ModuleShell {
        assembly,
        module,
        image,
        types,
    }
}

fn define_type_shell(
    table: &SymbolTable,
    container: SymbolId,
    record: &TypeDefRecord,
    special: SpecialType,
) -> TypeShell {
    let own_arity = record.generic_parameters.len();
    let (base_name, suffix_arity) = split_arity(&record.name);
    let mangle_name = own_arity > 0 && suffix_arity == own_arity;
    let name = if mangle_name { base_name } else { &*record.name };

    let type_parameters = record
        .generic_parameters
        .iter()
        .map(|parameter| TypeParameterDecl::new(table.intern(parameter)))
        .collect();
    let symbol = table.define_type(
        container,
        TypeDef::new(
            declaration(table, name, record.accessibility, record.flags, &record.attributes),
            record.kind,
        )
        .with_special(special)
        .with_type_parameters(type_parameters)
        .with_mangle_name(mangle_name),
    );
    let nested = record
        .nested_types
        .iter()
        .map(|nested| define_type_shell(table, symbol, nested, SpecialType::None))
        .collect();
    TypeShell { symbol, nested }
}

fn declaration(
    table: &SymbolTable,
    name: &str,
    accessibility: Accessibility,
    flags: SymbolFlags,
    attributes: &[AttributeRecord],
) -> SymbolDecl {
    attributes.iter().fold(
        SymbolDecl::new(table.intern(name))
            .with_accessibility(accessibility)
            .with_flags(flags)
            .with_origin(SymbolOrigin::Metadata),
        |decl, attribute| {
            decl.with_attribute(Attribute {
                key: table.intern(&attribute.name),
                arguments: attribute.arguments.clone(),
            })
        },
    )
}

/// Bind base types, interfaces and members of every type in `shell`.
pub(crate) fn bind_module(table: &SymbolTable, graph: &ReferenceGraph, shell: &ModuleShell) {
    for (record, ty) in shell.image.types.iter().zip(&shell.types) {
        bind_type(table, graph, shell, record, ty, &[]);
    }
}

fn bind_type(
    table: &SymbolTable,
    graph: &ReferenceGraph,
    shell: &ModuleShell,
    record: &TypeDefRecord,
    ty: &TypeShell,
    enclosing: &[SymbolId],
) {
    let mut type_parameters = enclosing.to_vec();
    type_parameters.extend(table.type_parameters(ty.symbol));
    let resolver = TypeResolver {
        table,
        graph,
        module: shell.module,
        assembly: shell.assembly,
        type_parameters: &type_parameters,
        method_type_parameters: &[],
    };

    table.set_base_type(
        ty.symbol,
        record.base_type.as_ref().map(|base| resolver.resolve(base).ty),
    );
    table.set_interfaces(
        ty.symbol,
        record
            .interfaces
            .iter()
            .map(|interface| resolver.resolve(interface).ty)
            .collect(),
    );

    let methods: Vec<SymbolId> = record
        .methods
        .iter()
        .map(|method| {
            let generic = method
                .generic_parameters
                .iter()
                .map(|parameter| TypeParameterDecl::new(table.intern(parameter)))
                .collect();
            let decl = declaration(
                table,
                &method.name,
                method.accessibility,
                method.flags,
                &method.attributes,
            );
            let def = MethodDef::new(decl, method.kind).with_type_parameters(generic);
            table.define_method(ty.symbol, def, |method_type_parameters| {
                let resolver = resolver.for_method(method_type_parameters);
                let parameters = method
                    .parameters
                    .iter()
                    .map(|parameter| {
                        let decl = ParameterDecl::new(
                            table.intern(&parameter.name),
                            resolver.resolve(&parameter.ty),
                        )
                        .with_flags(parameter.flags);
                        match &parameter.default_value {
                            Some(value) => decl.with_default(DefaultValue::Constant(value.clone())),
                            None => decl,
                        }
                    })
                    .collect();
                MethodSignature::new(parameters, resolver.resolve(&method.return_type))
            })
        })
        .collect();

    for field in &record.fields {
        table.define_field(
            ty.symbol,
            declaration(table, &field.name, field.accessibility, field.flags, &[]),
            resolver.resolve(&field.ty),
            field.constant.clone().map(DefaultValue::Constant),
        );
    }

    for property in &record.properties {
        let accessor = |index: Option<usize>| index.and_then(|i| methods.get(i).copied());
        table.define_property(
            ty.symbol,
            declaration(table, &property.name, property.accessibility, property.flags, &[]),
            resolver.resolve(&property.ty),
            accessor(property.getter),
            accessor(property.setter),
        );
    }

    for (nested_record, nested) in record.nested_types.iter().zip(&ty.nested) {
        bind_type(table, graph, shell, nested_record, nested, &type_parameters);
    }
}

/// Resolves `TypeRef`s in the context of one declaration.
pub(crate) struct TypeResolver<'a> {
    table: &'a SymbolTable,
    graph: &'a ReferenceGraph,
    module: SymbolId,
    assembly: SymbolId,
    /// Generic parameters of the enclosing type chain, outermost first.
    type_parameters: &'a [SymbolId],
    method_type_parameters: &'a [SymbolId],
}

impl<'a> TypeResolver<'a> {
    fn for_method<'b>(&'b self, method_type_parameters: &'b [SymbolId]) -> TypeResolver<'b>
    where
        'a: 'b,
    {
        TypeResolver {
            table: self.table,
            graph: self.graph,
            module: self.module,
            assembly: self.assembly,
            type_parameters: self.type_parameters,
            method_type_parameters,
        }
    }

    /// Resolve a type occurrence. Never fails: unresolvable references
    /// become error types.
    pub(crate) fn resolve(&self, ty: &TypeRef) -> TypeWithModifiers {
        let table = self.table;
        match ty {
            TypeRef::Named {
                scope,
                namespace,
                name,
                nested,
                type_arguments,
            } => TypeWithModifiers::plain(self.resolve_named(
                scope,
                namespace,
                name,
                nested,
                type_arguments,
            )),
            TypeRef::TypeParameter(index) => {
                TypeWithModifiers::plain(self.parameter(self.type_parameters, *index))
            }
            TypeRef::MethodTypeParameter(index) => {
                TypeWithModifiers::plain(self.parameter(self.method_type_parameters, *index))
            }
            TypeRef::Array { element, rank } => {
                TypeWithModifiers::plain(table.array_type(self.resolve(element), *rank))
            }
            TypeRef::Pointer(pointee) => {
                TypeWithModifiers::plain(table.pointer_type(self.resolve(pointee)))
            }
            TypeRef::Modified {
                ty,
                modifier,
                is_optional,
            } => {
                let mut inner = self.resolve(ty);
                inner.modifiers.push(CustomModifier {
                    modifier: self.resolve(modifier).ty,
                    is_optional: *is_optional,
                });
                inner
            }
            TypeRef::Unsupported => TypeWithModifiers::plain(self.unsupported()),
        }
    }

    fn parameter(&self, parameters: &[SymbolId], index: u32) -> SymbolId {
        usize::try_from(index)
            .ok()
            .and_then(|index| parameters.get(index).copied())
            .unwrap_or_else(|| self.unsupported())
    }

    fn unsupported(&self) -> SymbolId {
        self.table.error_type(ErrorTypeKind::Unsupported, Name::EMPTY, 0)
    }

    fn resolve_named(
        &self,
        scope: &TypeScope,
        namespace: &str,
        name: &str,
        nested: &[Box<str>],
        type_arguments: &[TypeRef],
    ) -> SymbolId {
        let table = self.table;
        let target = match scope {
            TypeScope::CurrentAssembly => self.assembly,
            TypeScope::Assembly(identity) => {
                match self.graph.resolve_reference(table, self.module, identity) {
                    Some(assembly) => assembly,
                    None => {
                        let (unmangled, arity) = split_arity(name);
                        return table.missing_type(
                            Some(identity.clone()),
                            table.intern(namespace),
                            table.intern(unmangled),
                            arity,
                        );
                    }
                }
            }
        };

        let mut chain = vec![self.graph.lookup_top_level_type(
            table,
            target,
            &MetadataTypeName::from_parts(namespace, name),
        )];
        for nested_name in nested {
            let Some(&container) = chain.last() else {
                break;
            };
            if table.is_error(container) {
                return container;
            }
            let lookup = MetadataTypeName::from_parts("", nested_name);
            let found = lookup_metadata_type(table, container, &lookup).unwrap_or_else(|| {
                table.missing_type(
                    table
                        .containing_assembly(container)
                        .and_then(|assembly| table.assembly_identity(assembly)),
                    table.intern(&table.qualified_name(container)),
                    table.intern(lookup.unmangled_name()),
                    lookup.inferred_arity(),
                )
            });
            chain.push(found);
        }

        if type_arguments.is_empty() {
            return chain.last().copied().unwrap_or_else(|| self.unsupported());
        }
        if chain.iter().any(|&ty| table.is_error(ty)) {
            return chain.last().copied().unwrap_or_else(|| self.unsupported());
        }

        let arguments: Vec<TypeWithModifiers> =
            type_arguments.iter().map(|argument| self.resolve(argument)).collect();
        let mut offset = 0;
        let mut current: Option<SymbolId> = None;
        for definition in chain {
            let view = match current {
                Some(container) => table.substituted_nested(container, definition),
                None => definition,
            };
            let arity = table.arity(definition);
            let Some(own) = arguments.get(offset..offset + arity) else {
                return self.unsupported();
            };
            offset += arity;
            let constructed = if arity == 0 {
                view
            } else {
                match table.construct(view, own.to_vec()) {
                    Ok(constructed) => constructed,
                    Err(error) => {
                        tracing::debug!(%error, "cannot construct metadata type reference");
                        return self.unsupported();
                    }
                }
            };
            current = Some(constructed);
        }
        match current {
            Some(ty) if offset == arguments.len() => ty,
            _ => self.unsupported(),
        }
    }
}
