//! Accessibility checks.

use crate::{Accessibility, SymbolId, SymbolTable};

/// The point of view of an accessibility check.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AccessScope {
    /// Type whose code performs the access; `None` for global code.
    pub within_type: Option<SymbolId>,
    /// Assembly performing the access.
    pub within_assembly: SymbolId,
}

impl AccessScope {
    /// Global code of `assembly`.
    pub fn global(assembly: SymbolId) -> Self {
        AccessScope {
            within_type: None,
            within_assembly: assembly,
        }
    }

    /// Code inside `ty`, declared in `assembly`.
    pub fn within(ty: SymbolId, assembly: SymbolId) -> Self {
        AccessScope {
            within_type: Some(ty),
            within_assembly: assembly,
        }
    }
}

impl SymbolTable {
    /// Whether `symbol` is accessible from `scope`.
    ///
    /// Members of a type are only accessible when the type itself is. Checks
    /// compare original definitions, so a member of `List<int>` is judged by
    /// the declaration in `List<T>`.
    pub fn is_accessible(&self, symbol: SymbolId, scope: AccessScope) -> bool {
        if let Some(container) = self.containing_type(symbol) {
            if !self.is_accessible(container, scope) {
                return false;
            }
        }
        match self.accessibility(symbol) {
            Accessibility::NotApplicable | Accessibility::Public => true,
            Accessibility::Internal => self.is_same_assembly(symbol, scope),
            Accessibility::Private => self.is_private_accessible(symbol, scope),
            Accessibility::Protected => self.is_protected_accessible(symbol, scope),
            Accessibility::ProtectedOrInternal => {
                self.is_same_assembly(symbol, scope) || self.is_protected_accessible(symbol, scope)
            }
        }
    }

    fn is_same_assembly(&self, symbol: SymbolId, scope: AccessScope) -> bool {
        self.containing_assembly(self.original_definition(symbol)) == Some(scope.within_assembly)
    }

    /// Code inside the declaring type, or inside a type nested in it.
    fn is_private_accessible(&self, symbol: SymbolId, scope: AccessScope) -> bool {
        let Some(declaring) = self.containing_type(symbol) else {
            // A private top-level type is internal.
            return self.is_same_assembly(symbol, scope);
        };
        let declaring = self.original_definition(declaring);
        self.enclosing_types(scope)
            .any(|ty| self.original_definition(ty) == declaring)
    }

    /// Code inside the declaring type, a type derived from it, or a type
    /// nested in either.
    fn is_protected_accessible(&self, symbol: SymbolId, scope: AccessScope) -> bool {
        let Some(declaring) = self.containing_type(symbol) else {
            return self.is_same_assembly(symbol, scope);
        };
        self.enclosing_types(scope)
            .any(|ty| self.inherits_from_definition(ty, declaring))
    }

    /// The scope's type followed by its containing types.
    fn enclosing_types(&self, scope: AccessScope) -> impl Iterator<Item = SymbolId> + '_ {
        std::iter::successors(scope.within_type, move |&ty| self.containing_type(ty))
    }
}
