//! Lookup of types by metadata name inside a namespace or type.

use quill_symbols::{NamedTypeData, SymbolId, SymbolKind, SymbolTable};
use tracing::debug;

use crate::MetadataTypeName;

/// Find the type named `name` directly inside `container` (a namespace or a
/// type, for nested lookups).
///
/// Two passes are made:
///
/// 1. when the name carries an arity suffix (and any forced arity agrees),
///    types whose unmangled name and own arity match and whose emitted name
///    is mangled;
/// 2. types whose name equals the name as written and whose emitted name is
///    not mangled, restricted to the forced arity when one is given.
///
/// A pass with more than one match is ambiguous and yields `None`; the
/// caller turns that into a missing or ambiguous error type.
pub fn lookup_metadata_type(
    table: &SymbolTable,
    container: SymbolId,
    name: &MetadataTypeName,
) -> Option<SymbolId> {
    let candidates: Vec<(SymbolId, usize, bool)> = table
        .type_members(container)
        .into_iter()
        .filter_map(|ty| match &table.get(ty).kind {
            SymbolKind::NamedType(NamedTypeData {
                arity, mangle_name, ..
            }) => Some((ty, *arity, *mangle_name)),
            _ => None,
        })
        .collect();

    let inferred = name.inferred_arity();
    if inferred > 0 && name.forced_arity().map_or(true, |forced| forced == inferred) {
        let matches: Vec<SymbolId> = candidates
            .iter()
            .filter(|&&(ty, arity, mangle_name)| {
                mangle_name && arity == inferred && table.symbol_name(ty) == name.unmangled_name()
            })
            .map(|&(ty, ..)| ty)
            .collect();
        if let Some(found) = single(&matches, name) {
            return found;
        }
    }

    let matches: Vec<SymbolId> = candidates
        .iter()
        .filter(|&&(ty, arity, mangle_name)| {
            !mangle_name
                && name.forced_arity().map_or(true, |forced| forced == arity)
                && table.symbol_name(ty) == name.name()
        })
        .map(|&(ty, ..)| ty)
        .collect();
    single(&matches, name).flatten()
}

/// `None` when there is nothing to decide, `Some(result)` otherwise.
fn single(matches: &[SymbolId], name: &MetadataTypeName) -> Option<Option<SymbolId>> {
    match matches {
        [] => None,
        [found] => Some(Some(*found)),
        _ => {
            debug!(
                name = %name.qualified(),
                count = matches.len(),
                "ambiguous metadata type lookup"
            );
            Some(None)
        }
    }
}
