//! Generic substitution and construction.
//!
//! Substitution never mutates a definition: it produces substituted views
//! that point back at their original definition. Views are deduplicated, so
//! substituting or constructing the same thing twice yields the same
//! `SymbolId`, and a substitution that changes nothing returns its input.

use std::sync::{Arc, OnceLock};

use quill_ir::Name;
use rustc_hash::FxHashMap;

use crate::symbol::{SubstitutedMethod, SubstitutedType};
use crate::table::{ConstructKey, DerivedKey};
use crate::{
    Accessibility, ArrayTypeData, ConstructError, FieldData, FieldForm, MethodData, MethodForm,
    NamedTypeData, NamedTypeForm, ParameterData, PointerTypeData, PropertyData, SpecialType,
    Symbol, SymbolFlags, SymbolId, SymbolKind, SymbolOrigin, SymbolTable, TypeWithModifiers,
};

/// Immutable mapping from type parameters to type arguments.
///
/// Parameters without an entry substitute to themselves. Maps are shared
/// between a constructed type and the views of its members.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    entries: Arc<FxHashMap<SymbolId, TypeWithModifiers>>,
}

impl SubstitutionMap {
    /// The identity map.
    pub fn empty() -> Self {
        SubstitutionMap::default()
    }

    /// Extend `parent` with `parameters[i] -> arguments[i]`.
    pub fn new(
        parent: &SubstitutionMap,
        parameters: &[SymbolId],
        arguments: &[TypeWithModifiers],
    ) -> Self {
        let mut entries = (*parent.entries).clone();
        entries.extend(
            parameters
                .iter()
                .copied()
                .zip(arguments.iter().cloned()),
        );
        SubstitutionMap {
            entries: Arc::new(entries),
        }
    }

    /// The argument mapped to `parameter`, if any.
    #[inline]
    pub fn get(&self, parameter: SymbolId) -> Option<&TypeWithModifiers> {
        self.entries.get(&parameter)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether `arguments` are exactly `parameters`, in order, without modifiers.
fn is_identity(parameters: &[SymbolId], arguments: &[TypeWithModifiers]) -> bool {
    parameters.len() == arguments.len()
        && parameters
            .iter()
            .zip(arguments)
            .all(|(&parameter, argument)| argument.ty == parameter && !argument.has_modifiers())
}

impl SymbolTable {
    /// The substitution map of a view; the identity map for definitions.
    pub fn substitution_map(&self, id: SymbolId) -> SubstitutionMap {
        match &self.get(id).kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Substituted(view),
                ..
            }) => view.map.clone(),
            SymbolKind::Method(MethodData {
                form: MethodForm::Substituted(view),
                ..
            }) => view.map.clone(),
            _ => SubstitutionMap::empty(),
        }
    }

    /// Replace every free type parameter reachable in `ty` with its mapped
    /// argument. Returns `ty` itself when nothing changes.
    pub fn substitute(&self, ty: SymbolId, map: &SubstitutionMap) -> SymbolId {
        if map.is_empty() {
            return ty;
        }
        let symbol = self.get(ty);
        match &symbol.kind {
            SymbolKind::TypeParameter(_) => map.get(ty).map_or(ty, |argument| argument.ty),
            SymbolKind::NamedType(data) => self.substitute_named(ty, &symbol, data, map),
            SymbolKind::Array(array) => {
                let element = self.substitute_with_modifiers(&array.element, map);
                if element == array.element {
                    ty
                } else {
                    self.array_type(element, array.rank)
                }
            }
            SymbolKind::Pointer(pointer) => {
                let pointee = self.substitute_with_modifiers(&pointer.pointee, map);
                if pointee == pointer.pointee {
                    ty
                } else {
                    self.pointer_type(pointee)
                }
            }
            _ => ty,
        }
    }

    /// Substitute a type occurrence, keeping its custom modifiers. When the
    /// occurrence is a mapped parameter, the argument's modifiers come first.
    pub fn substitute_with_modifiers(
        &self,
        ty: &TypeWithModifiers,
        map: &SubstitutionMap,
    ) -> TypeWithModifiers {
        if let Some(argument) = map.get(ty.ty) {
            let mut modifiers = argument.modifiers.clone();
            modifiers.extend(ty.modifiers.iter().copied());
            return TypeWithModifiers {
                ty: argument.ty,
                modifiers,
            };
        }
        TypeWithModifiers {
            ty: self.substitute(ty.ty, map),
            modifiers: ty.modifiers.clone(),
        }
    }

    fn substitute_named(
        &self,
        ty: SymbolId,
        symbol: &Symbol,
        data: &NamedTypeData,
        map: &SubstitutionMap,
    ) -> SymbolId {
        let container = symbol
            .containing
            .filter(|&container| self.get(container).is_named_type());
        let new_container = container.map(|container| self.substitute(container, map));

        let (unconstructed, arguments) = match &data.form {
            NamedTypeForm::Substituted(SubstitutedType {
                constructed_from: Some(from),
                type_arguments,
                ..
            }) => (*from, type_arguments.clone()),
            _ => (ty, self.type_arguments(ty)),
        };
        let new_arguments: Vec<TypeWithModifiers> = arguments
            .iter()
            .map(|argument| self.substitute_with_modifiers(argument, map))
            .collect();

        let container_changed = new_container != container;
        if !container_changed && new_arguments == arguments {
            return ty;
        }
        let unconstructed = match new_container {
            Some(new_container) if container_changed => {
                self.substituted_nested(new_container, self.original_definition(unconstructed))
            }
            _ => unconstructed,
        };
        self.construct_unchecked(unconstructed, new_arguments)
    }

    /// Construct a generic named type with type arguments.
    ///
    /// `ty` must be an unconstructed named type (a definition, or a nested
    /// type seen through a constructed container). Arguments identical to the
    /// type's own parameters return `ty` itself.
    pub fn construct(
        &self,
        ty: SymbolId,
        arguments: Vec<TypeWithModifiers>,
    ) -> Result<SymbolId, ConstructError> {
        let symbol = self.get(ty);
        let arity = match &symbol.kind {
            SymbolKind::NamedType(NamedTypeData {
                form: NamedTypeForm::Substituted(SubstitutedType {
                    constructed_from: Some(_),
                    ..
                }),
                ..
            }) => return Err(ConstructError::NotConstructible { symbol: ty }),
            SymbolKind::NamedType(data) => data.arity,
            _ => return Err(ConstructError::NotConstructible { symbol: ty }),
        };
        self.check_arguments(ty, arity, &arguments)?;
        Ok(self.construct_unchecked(ty, arguments))
    }

    fn check_arguments(
        &self,
        symbol: SymbolId,
        arity: usize,
        arguments: &[TypeWithModifiers],
    ) -> Result<(), ConstructError> {
        if arguments.len() != arity {
            return Err(ConstructError::ArityMismatch {
                symbol,
                expected: arity,
                found: arguments.len(),
            });
        }
        if arguments
            .iter()
            .any(|argument| self.is_unbound_argument(argument.ty))
        {
            return Err(ConstructError::UnboundArgument { symbol });
        }
        Ok(())
    }

    /// Construct without validating arity or placeholders.
    pub(crate) fn construct_unchecked(
        &self,
        from: SymbolId,
        arguments: Vec<TypeWithModifiers>,
    ) -> SymbolId {
        let parameters = self.type_parameters(from);
        if is_identity(&parameters, &arguments) {
            return from;
        }
        let symbol = self.get(from);
        let SymbolKind::NamedType(data) = &symbol.kind else {
            return from;
        };
        let original_definition = self.original_definition(from);
        let parent = self.substitution_map(from);
        let key = ConstructKey {
            constructed_from: from,
            arguments: arguments.clone(),
        };
        let id = self.intern_keyed(&self.constructed, key, false, || {
            let map = SubstitutionMap::new(&parent, &parameters, &arguments);
            view_of(
                &symbol,
                symbol.containing,
                SymbolKind::NamedType(NamedTypeData {
                    type_kind: data.type_kind,
                    special: SpecialType::None,
                    arity: data.arity,
                    mangle_name: data.mangle_name,
                    form: NamedTypeForm::Substituted(SubstitutedType {
                        original_definition,
                        constructed_from: Some(from),
                        type_arguments: arguments,
                        map,
                        base_type: OnceLock::new(),
                        interfaces: OnceLock::new(),
                        members: OnceLock::new(),
                    }),
                    all_interfaces: OnceLock::new(),
                }),
            )
        });
        tracing::trace!(?from, ?id, "constructed generic type");
        id
    }

    /// Construct a generic method with explicit type arguments.
    ///
    /// The result is distinct from the member view obtained through a
    /// constructed containing type, but shares its original definition.
    pub fn construct_method(
        &self,
        method: SymbolId,
        arguments: Vec<TypeWithModifiers>,
    ) -> Result<SymbolId, ConstructError> {
        let symbol = self.get(method);
        let SymbolKind::Method(data) = &symbol.kind else {
            return Err(ConstructError::NotConstructible { symbol: method });
        };
        if let MethodForm::Substituted(SubstitutedMethod {
            constructed_from: Some(_),
            ..
        }) = &data.form
        {
            return Err(ConstructError::NotConstructible { symbol: method });
        }
        self.check_arguments(method, data.arity, &arguments)?;

        let parameters = self.type_parameters(method);
        if is_identity(&parameters, &arguments) {
            return Ok(method);
        }
        let original_definition = self.original_definition(method);
        let parent = self.substitution_map(method);
        let key = ConstructKey {
            constructed_from: method,
            arguments: arguments.clone(),
        };
        Ok(self.intern_keyed(&self.constructed, key, false, || {
            let map = SubstitutionMap::new(&parent, &parameters, &arguments);
            view_of(
                &symbol,
                symbol.containing,
                SymbolKind::Method(method_view(
                    data,
                    original_definition,
                    Some(method),
                    arguments,
                    map,
                )),
            )
        }))
    }

    /// A nested type seen through a substituted container. Returns `nested`
    /// itself when `container` carries no substitution.
    pub fn substituted_nested(&self, container: SymbolId, nested: SymbolId) -> SymbolId {
        let map = self.substitution_map(container);
        if map.is_empty() {
            return nested;
        }
        let nested = self.original_definition(nested);
        let symbol = self.get(nested);
        let SymbolKind::NamedType(data) = &symbol.kind else {
            return nested;
        };
        self.intern_keyed(
            &self.derived,
            DerivedKey::Nested { container, nested },
            false,
            || {
                view_of(
                    &symbol,
                    Some(container),
                    SymbolKind::NamedType(NamedTypeData {
                        type_kind: data.type_kind,
                        special: SpecialType::None,
                        arity: data.arity,
                        mangle_name: data.mangle_name,
                        form: NamedTypeForm::Substituted(SubstitutedType {
                            original_definition: nested,
                            constructed_from: None,
                            type_arguments: Vec::new(),
                            map,
                            base_type: OnceLock::new(),
                            interfaces: OnceLock::new(),
                            members: OnceLock::new(),
                        }),
                        all_interfaces: OnceLock::new(),
                    }),
                )
            },
        )
    }

    /// The array type `element[]` (rank 1) or `element[,..]`.
    pub fn array_type(&self, element: impl Into<TypeWithModifiers>, rank: u32) -> SymbolId {
        let element = element.into();
        let rank = rank.max(1);
        self.intern_keyed(
            &self.derived,
            DerivedKey::Array {
                element: element.clone(),
                rank,
            },
            false,
            || synthesized_type(SymbolKind::Array(ArrayTypeData { element, rank })),
        )
    }

    /// The unmanaged pointer type `pointee*`.
    pub fn pointer_type(&self, pointee: impl Into<TypeWithModifiers>) -> SymbolId {
        let pointee = pointee.into();
        self.intern_keyed(
            &self.derived,
            DerivedKey::Pointer(pointee.clone()),
            false,
            || synthesized_type(SymbolKind::Pointer(PointerTypeData { pointee })),
        )
    }

    /// Element type of an array, `None` for non-arrays.
    pub fn array_element(&self, ty: SymbolId) -> Option<TypeWithModifiers> {
        match &self.get(ty).kind {
            SymbolKind::Array(array) => Some(array.element.clone()),
            _ => None,
        }
    }

    /// The member of a substituted type that was derived from `original`.
    pub fn substituted_member(&self, container: SymbolId, original: SymbolId) -> Option<SymbolId> {
        let original = self.original_definition(original);
        self.members(container)
            .into_iter()
            .find(|&member| self.original_definition(member) == original)
    }

    /// Views of a definition's members through a substituted type.
    ///
    /// Methods, fields and nested types are substituted first; properties in
    /// a second pass so that their accessors point at the substituted methods.
    pub(crate) fn substitute_members(
        &self,
        container: SymbolId,
        view: &SubstitutedType,
    ) -> Vec<SymbolId> {
        let originals = self.declared_members(view.original_definition);
        let mut members: Vec<Option<SymbolId>> = Vec::with_capacity(originals.len());
        let mut methods: FxHashMap<SymbolId, SymbolId> = FxHashMap::default();
        let mut properties = Vec::new();

        for original in originals {
            let symbol = self.get(original);
            let member = match &symbol.kind {
                SymbolKind::Method(data) => {
                    let method = self.alloc(view_of(
                        &symbol,
                        Some(container),
                        SymbolKind::Method(method_view(
                            data,
                            original,
                            None,
                            Vec::new(),
                            view.map.clone(),
                        )),
                    ));
                    methods.insert(original, method);
                    Some(method)
                }
                SymbolKind::Field(_) => Some(self.alloc(view_of(
                    &symbol,
                    Some(container),
                    SymbolKind::Field(FieldData {
                        form: FieldForm::Substituted {
                            original_definition: original,
                            map: view.map.clone(),
                            ty: OnceLock::new(),
                        },
                    }),
                ))),
                SymbolKind::NamedType(_) => Some(self.substituted_nested(container, original)),
                SymbolKind::Property(_) => {
                    properties.push((members.len(), original));
                    None
                }
                _ => Some(original),
            };
            members.push(member);
        }

        for (index, original) in properties {
            let symbol = self.get(original);
            let SymbolKind::Property(data) = &symbol.kind else {
                continue;
            };
            let accessor = |accessor: Option<SymbolId>| {
                accessor.map(|method| methods.get(&method).copied().unwrap_or(method))
            };
            let property = self.alloc(view_of(
                &symbol,
                Some(container),
                SymbolKind::Property(PropertyData {
                    ty: self.substitute_with_modifiers(&data.ty, &view.map),
                    getter: accessor(data.getter),
                    setter: accessor(data.setter),
                    original_definition: Some(original),
                }),
            ));
            if let Some(slot) = members.get_mut(index) {
                *slot = Some(property);
            }
        }

        members.into_iter().flatten().collect()
    }

    /// Parameters of a substituted method, with types routed through its map.
    pub(crate) fn substitute_parameters(
        &self,
        method: SymbolId,
        view: &SubstitutedMethod,
    ) -> Vec<SymbolId> {
        self.parameters(view.original_definition)
            .into_iter()
            .map(|original| {
                let symbol = self.get(original);
                let SymbolKind::Parameter(data) = &symbol.kind else {
                    return original;
                };
                self.alloc(view_of(
                    &symbol,
                    Some(method),
                    SymbolKind::Parameter(ParameterData {
                        ordinal: data.ordinal,
                        ty: self.substitute_with_modifiers(&data.ty, &view.map),
                        default_value: data.default_value.clone(),
                        original_definition: Some(original),
                    }),
                ))
            })
            .collect()
    }
}

/// A synthesized view sharing the header of `original`.
fn view_of(original: &Symbol, containing: Option<SymbolId>, kind: SymbolKind) -> Symbol {
    Symbol {
        name: original.name,
        containing,
        accessibility: original.accessibility,
        flags: original.flags,
        origin: SymbolOrigin::Synthesized,
        locations: original.locations.clone(),
        attributes: original.attributes.clone(),
        kind,
    }
}

fn method_view(
    data: &MethodData,
    original_definition: SymbolId,
    constructed_from: Option<SymbolId>,
    type_arguments: Vec<TypeWithModifiers>,
    map: SubstitutionMap,
) -> MethodData {
    MethodData {
        method_kind: data.method_kind,
        arity: data.arity,
        form: MethodForm::Substituted(SubstitutedMethod {
            original_definition,
            constructed_from,
            type_arguments,
            map,
            parameters: OnceLock::new(),
            return_type: OnceLock::new(),
        }),
    }
}

fn synthesized_type(kind: SymbolKind) -> Symbol {
    Symbol {
        name: Name::EMPTY,
        containing: None,
        accessibility: Accessibility::Public,
        flags: SymbolFlags::empty(),
        origin: SymbolOrigin::Synthesized,
        locations: Vec::new(),
        attributes: Vec::new(),
        kind,
    }
}

#[cfg(test)]
mod tests;
