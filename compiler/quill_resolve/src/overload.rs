//! Overload resolution for guest-language calls.
//!
//! The guest language passes arguments dynamically: argument types are only
//! partially known, arguments can be spread (`...$args`) and visibility may
//! depend on the run-time calling context. Resolution therefore aims at a
//! conservative answer: a single method when one is provably best, an
//! ambiguity otherwise, telling the caller whether finer static rules may
//! still decide or whether dispatch has to happen at run time.

use quill_ir::Name;
use quill_symbols::{
    AccessScope, Accessibility, ErrorReason, SymbolFlags, SymbolId, SymbolTable,
};
use smallvec::SmallVec;
use tracing::trace;

/// An argument of a call site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct CallArgument {
    /// Statically inferred type, `None` when unknown.
    pub ty: Option<SymbolId>,
    /// The inferred type may also be null. Ignored when matching types.
    pub is_nullable: bool,
    /// Spread argument (`...$args`) standing for any number of values.
    pub is_unpacking: bool,
}

impl CallArgument {
    /// An argument of a known type.
    pub fn of(ty: SymbolId) -> Self {
        CallArgument {
            ty: Some(ty),
            ..CallArgument::default()
        }
    }

    /// An argument of unknown type.
    pub fn unknown() -> Self {
        CallArgument::default()
    }

    /// A spread argument.
    pub fn unpacking(ty: Option<SymbolId>) -> Self {
        CallArgument {
            ty,
            is_nullable: false,
            is_unpacking: true,
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }
}

/// Where a call is made from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VisibilityScope {
    /// Type whose code makes the call; `None` for global code.
    pub calling_type: Option<SymbolId>,
    pub assembly: SymbolId,
    /// The effective calling context is only known at run time (global code,
    /// closures bound later, dynamically dispatched code).
    pub is_dynamic: bool,
}

impl VisibilityScope {
    /// Code inside `ty`.
    pub fn within(ty: SymbolId, assembly: SymbolId) -> Self {
        VisibilityScope {
            calling_type: Some(ty),
            assembly,
            is_dynamic: false,
        }
    }

    /// Code with no calling type.
    pub fn global(assembly: SymbolId) -> Self {
        VisibilityScope {
            calling_type: None,
            assembly,
            is_dynamic: false,
        }
    }

    #[must_use]
    pub fn dynamic(mut self) -> Self {
        self.is_dynamic = true;
        self
    }

    fn access_scope(self) -> AccessScope {
        AccessScope {
            within_type: self.calling_type,
            within_assembly: self.assembly,
        }
    }
}

/// Outcome of overload resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MethodResolution {
    Resolved(SymbolId),
    Unresolved(ErrorReason),
}

impl MethodResolution {
    /// The chosen method, if any.
    pub fn method(&self) -> Option<SymbolId> {
        match self {
            MethodResolution::Resolved(method) => Some(*method),
            MethodResolution::Unresolved(_) => None,
        }
    }

    /// The chosen method, or a fresh error symbol named `name` carrying the
    /// failure.
    pub fn into_symbol(self, table: &SymbolTable, name: Name) -> SymbolId {
        match self {
            MethodResolution::Resolved(method) => method,
            MethodResolution::Unresolved(reason) => table.error_symbol(name, reason),
        }
    }
}

type Candidates = SmallVec<[SymbolId; 4]>;

/// Candidate methods of one call, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverloadsList {
    candidates: Candidates,
}

/// What overload matching needs to know about one candidate.
struct Shape {
    mandatory: usize,
    total: usize,
    has_params: bool,
    exact: bool,
}

impl OverloadsList {
    pub fn new(candidates: impl IntoIterator<Item = SymbolId>) -> Self {
        OverloadsList {
            candidates: candidates.into_iter().collect(),
        }
    }

    pub fn candidates(&self) -> &[SymbolId] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Pick the method a call with `arguments` made from `scope` binds to.
    pub fn resolve(
        &self,
        table: &SymbolTable,
        arguments: &[CallArgument],
        scope: VisibilityScope,
    ) -> MethodResolution {
        let resolution = self.resolve_inner(table, arguments, scope);
        trace!(
            candidates = self.candidates.len(),
            arguments = arguments.len(),
            ?resolution,
            "resolved overload"
        );
        resolution
    }

    fn resolve_inner(
        &self,
        table: &SymbolTable,
        arguments: &[CallArgument],
        scope: VisibilityScope,
    ) -> MethodResolution {
        match self.candidates.as_slice() {
            [] => return MethodResolution::Unresolved(ErrorReason::Missing),
            [single] => {
                if let Some(reason) = table.error_reason(*single) {
                    return MethodResolution::Unresolved(reason);
                }
            }
            _ => {}
        }

        let access = scope.access_scope();
        let survivors: Candidates = self
            .candidates
            .iter()
            .copied()
            .filter(|&candidate| !table.is_error(candidate))
            .filter(|&candidate| !table.flags(candidate).contains(SymbolFlags::INIT_FIELDS_ONLY))
            .filter(|&candidate| scope.is_dynamic || table.is_accessible(candidate, access))
            .collect();

        match survivors.as_slice() {
            [] => {
                return MethodResolution::Unresolved(ErrorReason::Inaccessible {
                    candidates: self.candidates.to_vec(),
                })
            }
            _ if scope.is_dynamic
                && survivors
                    .iter()
                    .any(|&candidate| table.accessibility(candidate) != Accessibility::Public) =>
            {
                return MethodResolution::Unresolved(ErrorReason::Ambiguous {
                    candidates: survivors.to_vec(),
                    overloadable: false,
                })
            }
            [single] => return MethodResolution::Resolved(*single),
            _ => {}
        }

        let has_unpacking = arguments.iter().any(|argument| argument.is_unpacking);
        let mut eligible: Candidates = SmallVec::new();
        for &candidate in &survivors {
            let shape = shape(table, candidate, arguments, has_unpacking);
            let enough = arguments.len() >= shape.mandatory || has_unpacking;
            let not_too_many = shape.has_params || arguments.len() <= shape.total;
            if !(enough && not_too_many) {
                continue;
            }
            if shape.exact && !shape.has_params {
                return MethodResolution::Resolved(candidate);
            }
            eligible.push(candidate);
        }

        match eligible.as_slice() {
            [single] => MethodResolution::Resolved(*single),
            [] => MethodResolution::Unresolved(ErrorReason::Ambiguous {
                candidates: survivors.to_vec(),
                overloadable: true,
            }),
            _ => MethodResolution::Unresolved(ErrorReason::Ambiguous {
                candidates: eligible.to_vec(),
                overloadable: true,
            }),
        }
    }
}

/// Signature shape of `candidate` against the call's arguments. Parameters
/// supplied by the runtime are not counted.
fn shape(
    table: &SymbolTable,
    candidate: SymbolId,
    arguments: &[CallArgument],
    has_unpacking: bool,
) -> Shape {
    let parameters: SmallVec<[(SymbolFlags, Option<SymbolId>); 8]> = table
        .parameters(candidate)
        .into_iter()
        .map(|parameter| {
            (
                table.flags(parameter),
                table.parameter_type(parameter).map(|ty| ty.ty),
            )
        })
        .filter(|(flags, _)| !flags.contains(SymbolFlags::IMPLICIT))
        .collect();

    let mandatory = parameters
        .iter()
        .rposition(|(flags, _)| !flags.is_omittable_parameter())
        .map_or(0, |last| last + 1);
    let has_params = parameters
        .last()
        .is_some_and(|(flags, _)| flags.contains(SymbolFlags::PARAMS));
    let exact = !has_unpacking
        && arguments.len() <= parameters.len()
        && arguments
            .iter()
            .zip(&parameters)
            .all(|(argument, (_, ty))| argument.ty.is_some() && argument.ty == *ty);

    Shape {
        mandatory,
        total: parameters.len(),
        has_params,
        exact,
    }
}

#[cfg(test)]
mod tests;
