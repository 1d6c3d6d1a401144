//! Uniform queries over symbols of every origin and form.
//!
//! Queries on substituted views route through the view's substitution map
//! the first time a part is asked for and publish the result; later calls
//! return the published part.

use std::fmt::Write as _;
use std::sync::OnceLock;

use quill_ir::{AssemblyIdentity, Name};
use rustc_hash::FxHashSet;

use crate::lazy::publish;
use crate::table::DerivedKey;
use crate::{
    Accessibility, ErrorReason, ErrorTypeData, ErrorTypeKind, FieldForm, MethodForm, MethodKind,
    ModuleReference, NamedTypeData, NamedTypeForm, NamespaceData, SpecialType, Symbol,
    SymbolCategory, SymbolFlags, SymbolId, SymbolKind, SymbolOrigin, SymbolTable, TypeKind,
    TypeWithModifiers,
};

impl SymbolTable {
    // === Classification ===

    pub fn category(&self, id: SymbolId) -> SymbolCategory {
        self.get(id).category()
    }

    /// Whether `id` is a sentinel (error type or error symbol).
    pub fn is_error(&self, id: SymbolId) -> bool {
        self.get(id).is_error()
    }

    pub fn flags(&self, id: SymbolId) -> SymbolFlags {
        self.get(id).flags
    }

    pub fn accessibility(&self, id: SymbolId) -> Accessibility {
        self.get(id).accessibility
    }

    pub fn origin(&self, id: SymbolId) -> SymbolOrigin {
        self.get(id).origin
    }

    /// The kind of a type symbol, `None` for non-types.
    pub fn type_kind(&self, id: SymbolId) -> Option<TypeKind> {
        match &self.get(id).kind {
            SymbolKind::NamedType(data) => Some(data.type_kind),
            SymbolKind::TypeParameter(_) => Some(TypeKind::TypeParameter),
            SymbolKind::Array(_) => Some(TypeKind::Array),
            SymbolKind::Pointer(_) => Some(TypeKind::Pointer),
            SymbolKind::ErrorType(_) => Some(TypeKind::Error),
            _ => None,
        }
    }

    /// Whether `id` is a type of any kind.
    pub fn is_type(&self, id: SymbolId) -> bool {
        self.type_kind(id).is_some()
    }

    /// The special-type tag. Constructed types are never tagged.
    pub fn special_type(&self, id: SymbolId) -> SpecialType {
        match &self.get(id).kind {
            SymbolKind::NamedType(data) => data.special,
            _ => SpecialType::None,
        }
    }

    /// The method kind, `None` for non-methods.
    pub fn method_kind(&self, id: SymbolId) -> Option<MethodKind> {
        match &self.get(id).kind {
            SymbolKind::Method(data) => Some(data.method_kind),
            _ => None,
        }
    }

    /// The classification of a non-type sentinel.
    pub fn error_reason(&self, id: SymbolId) -> Option<ErrorReason> {
        match &self.get(id).kind {
            SymbolKind::Error(data) => Some(data.reason.clone()),
            _ => None,
        }
    }

    /// The classification of an error type.
    pub fn error_type_kind(&self, id: SymbolId) -> Option<ErrorTypeKind> {
        match &self.get(id).kind {
            SymbolKind::ErrorType(data) => Some(data.kind.clone()),
            _ => None,
        }
    }

    /// Whether `id` is the unbound type argument placeholder.
    pub fn is_unbound_argument(&self, id: SymbolId) -> bool {
        matches!(
            &self.get(id).kind,
            SymbolKind::ErrorType(data) if data.kind == ErrorTypeKind::UnboundArgument
        )
    }

    pub fn is_reference_type(&self, id: SymbolId) -> bool {
        match &self.get(id).kind {
            SymbolKind::NamedType(data) => matches!(
                data.type_kind,
                TypeKind::Class | TypeKind::Interface | TypeKind::Delegate
            ),
            SymbolKind::Array(_) => true,
            SymbolKind::TypeParameter(data) => data.has_reference_constraint,
            _ => false,
        }
    }

    pub fn is_value_type(&self, id: SymbolId) -> bool {
        match &self.get(id).kind {
            SymbolKind::NamedType(data) => {
                matches!(data.type_kind, TypeKind::Struct | TypeKind::Enum)
            }
            SymbolKind::TypeParameter(data) => data.has_value_constraint,
            _ => false,
        }
    }

    pub fn is_interface(&self, id: SymbolId) -> bool {
        self.type_kind(id) == Some(TypeKind::Interface)
    }

    // === Generics ===

    /// Number of own type parameters of a named type or method.
    pub fn arity(&self, id: SymbolId) -> usize {
        match &self.get(id).kind {
            SymbolKind::NamedType(data) => data.arity,
            SymbolKind::Method(data) => data.arity,
            SymbolKind::ErrorType(data) => data.arity,
            _ => 0,
        }
    }

    pub fn is_generic(&self, id: SymbolId) -> bool {
        self.arity(id) > 0
    }

    /// Own type parameters of the original definition.
    pub fn type_parameters(&self, id: SymbolId) -> Vec<SymbolId> {
        match &self.get(id).kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Definition(definition),
                ..
            }) => definition.type_parameters.get().cloned().unwrap_or_default(),
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Substituted(view),
                ..
            }) => self.type_parameters(view.original_definition),
            SymbolKind::Method(data) => match &data.form {
                MethodForm::Definition(definition) => {
                    definition.type_parameters.get().cloned().unwrap_or_default()
                }
                MethodForm::Substituted(view) => self.type_parameters(view.original_definition),
            },
            _ => Vec::new(),
        }
    }

    /// Own type arguments. Unconstructed symbols report their own type
    /// parameters.
    pub fn type_arguments(&self, id: SymbolId) -> Vec<TypeWithModifiers> {
        let symbol = self.get(id);
        let constructed = match &symbol.kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Substituted(view),
                ..
            }) if view.constructed_from.is_some() => Some(view.type_arguments.clone()),
            SymbolKind::Method(data) => match &data.form {
                MethodForm::Substituted(view) if view.constructed_from.is_some() => {
                    Some(view.type_arguments.clone())
                }
                _ => None,
            },
            _ => None,
        };
        constructed.unwrap_or_else(|| {
            self.type_parameters(id)
                .into_iter()
                .map(TypeWithModifiers::plain)
                .collect()
        })
    }

    /// The unconstructed symbol a construction was built from; the symbol
    /// itself otherwise.
    pub fn constructed_from(&self, id: SymbolId) -> SymbolId {
        match &self.get(id).kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Substituted(view),
                ..
            }) => view.constructed_from.unwrap_or(id),
            SymbolKind::Method(data) => match &data.form {
                MethodForm::Substituted(view) => view.constructed_from.unwrap_or(id),
                MethodForm::Definition(_) => id,
            },
            _ => id,
        }
    }

    /// Whether `id` was constructed with explicit type arguments.
    pub fn is_constructed(&self, id: SymbolId) -> bool {
        self.constructed_from(id) != id
    }

    /// The definition a substituted view was derived from; the symbol itself
    /// for definitions.
    pub fn original_definition(&self, id: SymbolId) -> SymbolId {
        match &self.get(id).kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Substituted(view),
                ..
            }) => view.original_definition,
            SymbolKind::Method(data) => match &data.form {
                MethodForm::Substituted(view) => view.original_definition,
                MethodForm::Definition(_) => id,
            },
            SymbolKind::Field(data) => match &data.form {
                FieldForm::Substituted {
                    original_definition,
                    ..
                } => *original_definition,
                FieldForm::Definition { .. } => id,
            },
            SymbolKind::Property(data) => data.original_definition.unwrap_or(id),
            SymbolKind::Parameter(data) => data.original_definition.unwrap_or(id),
            _ => id,
        }
    }

    pub fn is_definition(&self, id: SymbolId) -> bool {
        self.original_definition(id) == id
    }

    // === Hierarchy ===

    /// The base type, substituted for constructed types.
    pub fn base_type(&self, id: SymbolId) -> Option<SymbolId> {
        match &self.get(id).kind {
            SymbolKind::NamedType(NamedTypeData { form, .. }) => match form {
                NamedTypeForm::Definition(definition) => definition.base_type.get().copied()?,
                NamedTypeForm::Substituted(view) => *self.publish_substituted(
                    &view.base_type,
                    view.original_definition,
                    |table, original| {
                        let (base, _) = table.definition_hierarchy(original)?;
                        Some(base.map(|base| table.substitute(base, &view.map)))
                    },
                )?,
            },
            _ => None,
        }
    }

    /// The declared interfaces, substituted for constructed types.
    pub fn interfaces(&self, id: SymbolId) -> Vec<SymbolId> {
        match &self.get(id).kind {
            SymbolKind::NamedType(NamedTypeData { form, .. }) => match form {
                NamedTypeForm::Definition(definition) => {
                    definition.interfaces.get().cloned().unwrap_or_default()
                }
                NamedTypeForm::Substituted(view) => self
                    .publish_substituted(&view.interfaces, view.original_definition, |table, original| {
                        let (_, interfaces) = table.definition_hierarchy(original)?;
                        Some(
                            interfaces
                                .into_iter()
                                .map(|iface| table.substitute(iface, &view.map))
                                .collect(),
                        )
                    })
                    .cloned()
                    .unwrap_or_default(),
            },
            _ => Vec::new(),
        }
    }

    /// Base type and interfaces of a definition, `None` until both are set.
    fn definition_hierarchy(&self, definition: SymbolId) -> Option<(Option<SymbolId>, Vec<SymbolId>)> {
        match &self.get(definition).kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Definition(parts),
                type_kind,
                ..
            }) => {
                let base = match parts.base_type.get() {
                    Some(base) => *base,
                    // Interfaces never get a base type assigned.
                    None if *type_kind == TypeKind::Interface => None,
                    None => return None,
                };
                let interfaces = parts.interfaces.get().cloned().unwrap_or_default();
                Some((base, interfaces))
            }
            _ => None,
        }
    }

    /// Publish a substituted part once the definition it derives from is
    /// complete; before that, report nothing and publish nothing.
    fn publish_substituted<'a, T>(
        &self,
        cell: &'a OnceLock<T>,
        original: SymbolId,
        compute: impl FnOnce(&Self, SymbolId) -> Option<T>,
    ) -> Option<&'a T> {
        if let Some(value) = cell.get() {
            return Some(value);
        }
        let value = compute(self, original)?;
        Some(publish(cell, || value))
    }

    /// Transitive closure of implemented interfaces, deduplicated, in
    /// discovery order: own interfaces (depth first) before the base type's.
    ///
    /// Never contains the type itself, and terminates on cyclic hierarchies.
    pub fn all_interfaces(&self, id: SymbolId) -> Vec<SymbolId> {
        let symbol = self.get(id);
        let SymbolKind::NamedType(data) = &symbol.kind else {
            return Vec::new();
        };
        if let Some(all) = data.all_interfaces.get() {
            return all.clone();
        }
        let all = self.compute_all_interfaces(id);
        let complete = match &data.form {
            NamedTypeForm::Definition(_) => self.definition_hierarchy(id).is_some(),
            NamedTypeForm::Substituted(view) => {
                self.definition_hierarchy(view.original_definition).is_some()
            }
        };
        if complete {
            publish(&data.all_interfaces, || all).clone()
        } else {
            all
        }
    }

    fn compute_all_interfaces(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut seen = FxHashSet::default();
        seen.insert(id);
        let mut result = Vec::new();
        for ty in std::iter::once(id).chain(self.base_types(id)) {
            let mut path = vec![self.original_definition(ty)];
            self.collect_interfaces(ty, &mut path, &mut seen, &mut result);
        }
        result
    }

    /// Depth-first walk of the interfaces of `ty`.
    ///
    /// `path` holds the original definitions of the interfaces being
    /// expanded. An edge back to one of them is a cycle, even when it goes
    /// through a new construction (`I<T> : I<I<T>>`), and is not followed.
    fn collect_interfaces(
        &self,
        ty: SymbolId,
        path: &mut Vec<SymbolId>,
        seen: &mut FxHashSet<SymbolId>,
        result: &mut Vec<SymbolId>,
    ) {
        for iface in self.interfaces(ty) {
            let definition = self.original_definition(iface);
            if path.contains(&definition) || !seen.insert(iface) {
                continue;
            }
            result.push(iface);
            path.push(definition);
            self.collect_interfaces(iface, path, seen, result);
            path.pop();
        }
    }

    /// Base types of `id`, nearest first.
    ///
    /// Stops at the first base whose original definition already appeared,
    /// which also ends chains growing through generics (`C<T> : C<C<T>>`).
    pub fn base_types(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut seen = FxHashSet::default();
        seen.insert(self.original_definition(id));
        let mut result = Vec::new();
        let mut current = self.base_type(id);
        while let Some(base) = current {
            if !seen.insert(self.original_definition(base)) {
                break;
            }
            result.push(base);
            current = self.base_type(base);
        }
        result
    }

    /// Whether `base` is a proper base type of `derived`.
    pub fn derives_from(&self, derived: SymbolId, base: SymbolId) -> bool {
        self.base_types(derived).contains(&base)
    }

    /// Whether `derived` is `target`, derives from it, or implements it.
    pub fn is_subtype_of(&self, derived: SymbolId, target: SymbolId) -> bool {
        derived == target
            || self.derives_from(derived, target)
            || self.all_interfaces(derived).contains(&target)
    }

    /// Like `derives_from`, comparing original definitions: `Derived<int>`
    /// inherits from `Base<T>` when `Derived<T>` derives from any
    /// construction of `Base<T>`.
    pub fn inherits_from_definition(&self, derived: SymbolId, base: SymbolId) -> bool {
        let base = self.original_definition(base);
        self.original_definition(derived) == base
            || self
                .base_types(derived)
                .into_iter()
                .any(|ty| self.original_definition(ty) == base)
    }

    // === Containment ===

    pub fn containing_symbol(&self, id: SymbolId) -> Option<SymbolId> {
        self.get(id).containing
    }

    /// Nearest containing named type.
    pub fn containing_type(&self, id: SymbolId) -> Option<SymbolId> {
        self.ancestors(id)
            .find(|&ancestor| self.get(ancestor).is_named_type())
    }

    /// Nearest containing namespace.
    pub fn containing_namespace(&self, id: SymbolId) -> Option<SymbolId> {
        self.ancestors(id)
            .find(|&ancestor| self.category(ancestor) == SymbolCategory::Namespace)
    }

    pub fn containing_module(&self, id: SymbolId) -> Option<SymbolId> {
        self.ancestors(id)
            .find(|&ancestor| self.category(ancestor) == SymbolCategory::Module)
    }

    /// The assembly a symbol belongs to. For merged namespaces this is the
    /// assembly of the first constituent.
    pub fn containing_assembly(&self, id: SymbolId) -> Option<SymbolId> {
        if self.category(id) == SymbolCategory::Assembly {
            return Some(id);
        }
        let mut current = id;
        loop {
            let symbol = self.get(current);
            match (&symbol.kind, symbol.containing) {
                (SymbolKind::Assembly(_), _) => return Some(current),
                (SymbolKind::Namespace(NamespaceData::Merged { constituents }), _) => {
                    current = *constituents.first()?;
                }
                (_, Some(containing)) => current = containing,
                (_, None) => return None,
            }
        }
    }

    /// Containing symbols, nearest first.
    pub fn ancestors(&self, id: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        std::iter::successors(self.containing_symbol(id), move |&current| {
            self.containing_symbol(current)
        })
    }

    // === Names ===

    /// Name as emitted in metadata: named types get a `` `arity`` suffix when
    /// `mangle_name` is set.
    pub fn metadata_name(&self, id: SymbolId) -> String {
        let symbol = self.get(id);
        let name = self.name_str(symbol.name);
        match &symbol.kind {
            SymbolKind::NamedType(data) if data.mangle_name && data.arity > 0 => {
                format!("{name}`{}", data.arity)
            }
            SymbolKind::Array(array) => {
                format!("{}{}", self.metadata_name(array.element.ty), array_suffix(array.rank))
            }
            SymbolKind::Pointer(pointer) => format!("{}*", self.metadata_name(pointer.pointee.ty)),
            _ => name.to_owned(),
        }
    }

    /// Fully qualified name: namespaces joined with `.`, nested types with
    /// `+`, type arguments in brackets.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let symbol = self.get(id);
        match &symbol.kind {
            SymbolKind::Namespace(_) => self.namespace_path(id),
            SymbolKind::NamedType(_) => {
                let mut out = match symbol.containing {
                    Some(container) if self.get(container).is_named_type() => {
                        format!("{}+", self.qualified_name(self.original_definition(container)))
                    }
                    Some(container) => {
                        let path = self.namespace_path(container);
                        if path.is_empty() {
                            String::new()
                        } else {
                            format!("{path}.")
                        }
                    }
                    None => String::new(),
                };
                out.push_str(&self.metadata_name(id));
                if self.is_constructed(id) {
                    let arguments: Vec<String> = self
                        .type_arguments(id)
                        .iter()
                        .map(|arg| self.qualified_name(arg.ty))
                        .collect();
                    let _ = write!(out, "[{}]", arguments.join(","));
                }
                out
            }
            SymbolKind::Array(array) => {
                format!("{}{}", self.qualified_name(array.element.ty), array_suffix(array.rank))
            }
            SymbolKind::Pointer(pointer) => format!("{}*", self.qualified_name(pointer.pointee.ty)),
            SymbolKind::ErrorType(ErrorTypeData {
                kind: ErrorTypeKind::Missing { namespace, .. },
                ..
            }) if !namespace.is_empty() => {
                format!("{}.{}", self.name_str(*namespace), self.name_str(symbol.name))
            }
            _ => self.name_str(symbol.name).to_owned(),
        }
    }

    /// Dotted path of a namespace; empty for a global namespace.
    pub fn namespace_path(&self, namespace: SymbolId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(namespace);
        while let Some(ns) = current {
            let symbol = self.get(ns);
            if !matches!(symbol.kind, SymbolKind::Namespace(_)) || symbol.name.is_empty() {
                break;
            }
            segments.push(self.name_str(symbol.name));
            current = symbol.containing;
        }
        segments.reverse();
        segments.join(".")
    }

    // === Members ===

    /// Members in declaration order. Substituted types report substituted
    /// views of their definition's members; merged namespaces report the
    /// union of their constituents with same-named child namespaces merged.
    pub fn members(&self, id: SymbolId) -> Vec<SymbolId> {
        let symbol = self.get(id);
        match &symbol.kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Substituted(view),
                ..
            }) => publish(&view.members, || self.substitute_members(id, view)).clone(),
            SymbolKind::Namespace(NamespaceData::Merged { constituents }) => {
                self.merged_namespace_members(id, constituents)
            }
            _ => self.declared_members(id),
        }
    }

    /// Members with exactly this name.
    pub fn members_named(&self, id: SymbolId, name: Name) -> Vec<SymbolId> {
        self.members(id)
            .into_iter()
            .filter(|&member| self.get(member).name == name)
            .collect()
    }

    /// Members whose name equals `name` ignoring ASCII case.
    pub fn members_named_ignore_case(&self, id: SymbolId, name: Name) -> Vec<SymbolId> {
        self.members(id)
            .into_iter()
            .filter(|&member| self.interner().eq_ignore_ascii_case(self.get(member).name, name))
            .collect()
    }

    /// Nested or namespace-level named types.
    pub fn type_members(&self, id: SymbolId) -> Vec<SymbolId> {
        self.members(id)
            .into_iter()
            .filter(|&member| self.get(member).is_named_type())
            .collect()
    }

    /// Methods declared on a type (or substituted views of them).
    pub fn methods(&self, id: SymbolId) -> Vec<SymbolId> {
        self.members(id)
            .into_iter()
            .filter(|&member| self.get(member).is_method())
            .collect()
    }

    // === Signatures ===

    /// Parameters of a method in declaration order (receiver excluded).
    pub fn parameters(&self, method: SymbolId) -> Vec<SymbolId> {
        let symbol = self.get(method);
        match &symbol.kind {
            SymbolKind::Method(data) => match &data.form {
                MethodForm::Definition(definition) => {
                    definition.parameters.get().cloned().unwrap_or_default()
                }
                MethodForm::Substituted(view) => {
                    publish(&view.parameters, || self.substitute_parameters(method, view)).clone()
                }
            },
            _ => Vec::new(),
        }
    }

    /// Return type of a method, substituted for views.
    pub fn return_type(&self, method: SymbolId) -> Option<TypeWithModifiers> {
        match &self.get(method).kind {
            SymbolKind::Method(data) => match &data.form {
                MethodForm::Definition(definition) => definition.return_type.get().cloned(),
                MethodForm::Substituted(view) => {
                    let original = self.return_type(view.original_definition)?;
                    Some(
                        publish(&view.return_type, || {
                            self.substitute_with_modifiers(&original, &view.map)
                        })
                        .clone(),
                    )
                }
            },
            _ => None,
        }
    }

    /// Type of a parameter.
    pub fn parameter_type(&self, parameter: SymbolId) -> Option<TypeWithModifiers> {
        match &self.get(parameter).kind {
            SymbolKind::Parameter(data) => Some(data.ty.clone()),
            _ => None,
        }
    }

    /// Position of a parameter; `-1` for the implicit receiver.
    pub fn parameter_ordinal(&self, parameter: SymbolId) -> Option<i32> {
        match &self.get(parameter).kind {
            SymbolKind::Parameter(data) => Some(data.ordinal),
            _ => None,
        }
    }

    /// Type of a field, substituted for views. `None` while a deferred field
    /// type has not been set.
    pub fn field_type(&self, field: SymbolId) -> Option<TypeWithModifiers> {
        match &self.get(field).kind {
            SymbolKind::Field(data) => match &data.form {
                FieldForm::Definition { ty, .. } => ty.get().cloned(),
                FieldForm::Substituted {
                    original_definition,
                    map,
                    ty,
                } => {
                    if let Some(ty) = ty.get() {
                        return Some(ty.clone());
                    }
                    let original = self.field_type(*original_definition)?;
                    Some(publish(ty, || self.substitute_with_modifiers(&original, map)).clone())
                }
            },
            _ => None,
        }
    }

    /// Type of a property.
    pub fn property_type(&self, property: SymbolId) -> Option<TypeWithModifiers> {
        match &self.get(property).kind {
            SymbolKind::Property(data) => Some(data.ty.clone()),
            _ => None,
        }
    }

    /// Getter and setter of a property.
    pub fn property_accessors(&self, property: SymbolId) -> (Option<SymbolId>, Option<SymbolId>) {
        match &self.get(property).kind {
            SymbolKind::Property(data) => (data.getter, data.setter),
            _ => (None, None),
        }
    }

    // === Assemblies and namespaces ===

    /// Modules of an assembly, primary first.
    pub fn modules(&self, assembly: SymbolId) -> Vec<SymbolId> {
        self.declared_members(assembly)
            .into_iter()
            .filter(|&member| self.category(member) == SymbolCategory::Module)
            .collect()
    }

    pub fn assembly_identity(&self, assembly: SymbolId) -> Option<AssemblyIdentity> {
        match &self.get(assembly).kind {
            SymbolKind::Assembly(data) => Some(data.identity.clone()),
            _ => None,
        }
    }

    pub fn is_missing_assembly(&self, assembly: SymbolId) -> bool {
        matches!(&self.get(assembly).kind, SymbolKind::Assembly(data) if data.is_missing)
    }

    pub fn is_cor_library(&self, assembly: SymbolId) -> bool {
        matches!(&self.get(assembly).kind, SymbolKind::Assembly(data) if data.is_cor_library)
    }

    /// Reference table of a module; empty until set.
    pub fn module_references(&self, module: SymbolId) -> Vec<ModuleReference> {
        match &self.get(module).kind {
            SymbolKind::Module(data) => data.references.get().cloned().unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Target assembly of a type-forwarder in `module`, if any.
    pub fn forwarded_type(&self, module: SymbolId, full_name: &str) -> Option<AssemblyIdentity> {
        match &self.get(module).kind {
            SymbolKind::Module(data) => data.forwarded_types.get(full_name).cloned(),
            _ => None,
        }
    }

    /// Global namespace of a module, or of an assembly (merged over its
    /// modules when it has several).
    pub fn global_namespace(&self, id: SymbolId) -> Option<SymbolId> {
        let symbol = self.get(id);
        match &symbol.kind {
            SymbolKind::Module(data) => data.global_namespace.get().copied(),
            SymbolKind::Assembly(_) => {
                let globals: Vec<SymbolId> = self
                    .modules(id)
                    .into_iter()
                    .filter_map(|module| self.global_namespace(module))
                    .collect();
                match globals.len() {
                    0 => None,
                    1 => globals.first().copied(),
                    _ => Some(self.merged_namespace(None, globals)),
                }
            }
            _ => None,
        }
    }

    /// A merge view over `constituents`; a single constituent is returned
    /// unchanged.
    pub fn merged_namespace(&self, parent: Option<SymbolId>, constituents: Vec<SymbolId>) -> SymbolId {
        if let [single] = constituents.as_slice() {
            return *single;
        }
        let name = constituents
            .first()
            .map_or(Name::EMPTY, |&first| self.get(first).name);
        self.intern_keyed(
            &self.derived,
            DerivedKey::MergedNamespace(constituents.clone()),
            false,
            || Symbol {
                name,
                containing: parent,
                accessibility: Accessibility::NotApplicable,
                flags: SymbolFlags::empty(),
                origin: SymbolOrigin::Synthesized,
                locations: Vec::new(),
                attributes: Vec::new(),
                kind: SymbolKind::Namespace(NamespaceData::Merged { constituents }),
            },
        )
    }

    fn merged_namespace_members(&self, merged: SymbolId, constituents: &[SymbolId]) -> Vec<SymbolId> {
        let mut result = Vec::new();
        let mut namespaces: Vec<(Name, Vec<SymbolId>)> = Vec::new();
        for &constituent in constituents {
            for member in self.members(constituent) {
                let symbol = self.get(member);
                if matches!(symbol.kind, SymbolKind::Namespace(_)) {
                    match namespaces.iter_mut().find(|(name, _)| *name == symbol.name) {
                        Some((_, group)) => group.push(member),
                        None => namespaces.push((symbol.name, vec![member])),
                    }
                } else {
                    result.push(member);
                }
            }
        }
        for (_, group) in namespaces {
            result.push(self.merged_namespace(Some(merged), group));
        }
        result
    }

    /// Child namespace `name` of a (concrete or merged) namespace.
    pub fn lookup_namespace(&self, namespace: SymbolId, name: Name) -> Option<SymbolId> {
        self.members_named(namespace, name)
            .into_iter()
            .find(|&member| self.category(member) == SymbolCategory::Namespace)
    }

    /// Resolve a dotted namespace path below `root`.
    pub fn lookup_namespace_path(&self, root: SymbolId, path: &str) -> Option<SymbolId> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(root, |current, segment| {
                let name = self.interner().get(segment)?;
                self.lookup_namespace(current, name)
            })
    }
}

fn array_suffix(rank: u32) -> String {
    if rank <= 1 {
        "[]".to_owned()
    } else {
        let commas = ",".repeat(rank as usize - 1);
        format!("[{commas}]")
    }
}
