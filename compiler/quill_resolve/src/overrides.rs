//! Override and interface implementation resolution.
//!
//! Guest-language method names are case-insensitive and its values may flow
//! through the runtime's universal value type, so signatures are compared by
//! conversion cost rather than by strict equality.

use quill_symbols::{Accessibility, SymbolFlags, SymbolId, SymbolTable};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::trace;

use crate::ConversionCost;

/// Finds the declarations a method overrides or implements.
pub struct OverrideResolver<'a> {
    table: &'a SymbolTable,
    /// Types compatible with every other type (the runtime's value and
    /// alias types).
    universal_types: SmallVec<[SymbolId; 2]>,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        OverrideResolver {
            table,
            universal_types: SmallVec::new(),
        }
    }

    /// Treat `ty` as implicitly convertible to and from any type.
    #[must_use]
    pub fn with_universal_type(mut self, ty: SymbolId) -> Self {
        if !self.universal_types.contains(&ty) {
            self.universal_types.push(ty);
        }
        self
    }

    /// Cost of `method` overriding `overridden`. At least `NO_CONVERSION`
    /// when `overridden` cannot be overridden at all.
    pub fn override_cost(&self, method: SymbolId, overridden: SymbolId) -> ConversionCost {
        if !self.is_overridable(overridden) {
            return ConversionCost::NO_CONVERSION;
        }
        self.signature_cost(method, overridden)
    }

    /// The base or interface declaration `method` overrides, if any.
    ///
    /// Base types are searched nearest first, then every transitively
    /// implemented interface. An exact match ends the search; otherwise the
    /// cheapest accepted candidate wins, nearer declarations winning ties.
    pub fn resolve_override(&self, method: SymbolId) -> Option<SymbolId> {
        let table = self.table;
        let flags = table.flags(method);
        if flags.contains(SymbolFlags::STATIC) || table.accessibility(method) == Accessibility::Private {
            return None;
        }
        let containing = table.containing_type(method)?;
        let name = table.get(method).name;

        let mut seen: FxHashSet<SymbolId> = FxHashSet::default();
        seen.insert(containing);
        let mut ancestry: Vec<SymbolId> = Vec::new();
        for ty in table
            .base_types(containing)
            .into_iter()
            .chain(table.all_interfaces(containing))
        {
            if seen.insert(ty) {
                ancestry.push(ty);
            }
        }

        // Declarations already overridden by something nearer.
        let mut hidden: FxHashSet<SymbolId> = FxHashSet::default();
        let mut best: Option<(ConversionCost, SymbolId)> = None;
        for (level, &ty) in ancestry.iter().enumerate() {
            let candidates: SmallVec<[SymbolId; 4]> = table
                .members_named_ignore_case(ty, name)
                .into_iter()
                .filter(|&candidate| table.get(candidate).is_method())
                .filter(|&candidate| self.is_overridable(candidate))
                .collect();
            for &candidate in &candidates {
                if hidden.contains(&table.original_definition(candidate)) {
                    continue;
                }
                let cost = self.signature_cost(method, candidate);
                if cost.is_pass() {
                    trace!(?method, ?candidate, "exact override");
                    return Some(candidate);
                }
                if cost.is_accepted() && best.map_or(true, |(best_cost, _)| cost < best_cost) {
                    best = Some((cost, candidate));
                }
            }
            for &candidate in &candidates {
                if table.flags(candidate).contains(SymbolFlags::OVERRIDE) {
                    self.hide_overridden(candidate, &ancestry[level + 1..], &mut hidden);
                }
            }
        }
        trace!(?method, ?best, "resolved override");
        best.map(|(_, candidate)| candidate)
    }

    /// The member of `ty` (or of its base types) implementing `method`, a
    /// method of an interface or abstract base.
    pub fn resolve_implementation(&self, method: SymbolId, ty: SymbolId) -> Option<SymbolId> {
        let table = self.table;
        let name = table.get(method).name;
        let mut best: Option<(ConversionCost, SymbolId)> = None;
        let mut seen: FxHashSet<SymbolId> = FxHashSet::default();
        for current in std::iter::once(ty).chain(table.base_types(ty)) {
            if !seen.insert(current) {
                continue;
            }
            for candidate in table.members_named_ignore_case(current, name) {
                if candidate == method
                    || !table.get(candidate).is_method()
                    || table.flags(candidate).contains(SymbolFlags::STATIC)
                    || table.flags(candidate).contains(SymbolFlags::ABSTRACT)
                    || table.accessibility(candidate) == Accessibility::Private
                {
                    continue;
                }
                let cost = self.signature_cost(candidate, method);
                if cost.is_pass() {
                    return Some(candidate);
                }
                if cost.is_accepted() && best.map_or(true, |(best_cost, _)| cost < best_cost) {
                    best = Some((cost, candidate));
                }
            }
        }
        trace!(?method, ?ty, ?best, "resolved implementation");
        best.map(|(_, candidate)| candidate)
    }

    fn is_overridable(&self, method: SymbolId) -> bool {
        let table = self.table;
        table.get(method).is_method()
            && table.flags(method).is_overridable()
            && table.accessibility(method) != Accessibility::Private
    }

    /// Record the declarations `overrider` overrides exactly among `farther`.
    fn hide_overridden(
        &self,
        overrider: SymbolId,
        farther: &[SymbolId],
        hidden: &mut FxHashSet<SymbolId>,
    ) {
        let table = self.table;
        let name = table.get(overrider).name;
        for &ty in farther {
            for candidate in table.members_named_ignore_case(ty, name) {
                if self.is_overridable(candidate) && self.signature_cost(overrider, candidate).is_pass() {
                    hidden.insert(table.original_definition(candidate));
                }
            }
        }
    }

    /// Cost of using `method`'s signature where `target`'s is expected.
    fn signature_cost(&self, method: SymbolId, target: SymbolId) -> ConversionCost {
        let table = self.table;
        let method_symbol = table.get(method);
        let target_symbol = table.get(target);
        if !table
            .interner()
            .eq_ignore_ascii_case(method_symbol.name, target_symbol.name)
            || method_symbol.is_static() != target_symbol.is_static()
        {
            return ConversionCost::NO_CONVERSION;
        }

        let ours = self.explicit_parameter_types(method);
        let theirs = self.explicit_parameter_types(target);
        let mut cost = ConversionCost::PASS;
        if ours.len() > theirs.len() {
            cost |= ConversionCost::TOO_MANY_ARGS;
        } else if ours.len() < theirs.len() {
            cost |= ConversionCost::MISSING_ARGS;
        }
        for (&our, &their) in ours.iter().zip(&theirs) {
            cost |= self.type_cost(our, their);
        }
        if let (Some(our), Some(their)) = (table.return_type(method), table.return_type(target)) {
            cost |= self.type_cost(our.ty, their.ty);
        }
        cost
    }

    fn type_cost(&self, ours: SymbolId, theirs: SymbolId) -> ConversionCost {
        let table = self.table;
        if ours == theirs {
            ConversionCost::PASS
        } else if self.universal_types.contains(&ours)
            || self.universal_types.contains(&theirs)
            || table.is_subtype_of(ours, theirs)
            || table.is_subtype_of(theirs, ours)
        {
            ConversionCost::IMPLICIT_CAST
        } else {
            ConversionCost::NO_CONVERSION
        }
    }

    fn explicit_parameter_types(&self, method: SymbolId) -> SmallVec<[SymbolId; 8]> {
        let table = self.table;
        table
            .parameters(method)
            .into_iter()
            .filter(|&parameter| !table.flags(parameter).contains(SymbolFlags::IMPLICIT))
            .filter_map(|parameter| table.parameter_type(parameter).map(|ty| ty.ty))
            .collect()
    }
}
