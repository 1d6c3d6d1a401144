//! Sentinel classifications and construction errors.
//!
//! Expected resolution failures are values: `ErrorReason` for member lookups
//! and `ErrorTypeKind` for type lookups. Both are carried by sentinel symbols
//! in the table. `ConstructError` is reserved for misuse of the substitution
//! API by the caller.

use quill_ir::{AssemblyIdentity, Name};

use crate::SymbolId;

/// Why a member lookup or overload resolution produced no single symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    /// No candidate exists.
    Missing,
    /// Several candidates are equally valid.
    Ambiguous {
        candidates: Vec<SymbolId>,
        /// `true` when finer static overload rules may still pick one;
        /// `false` when the choice must be deferred to run time.
        overloadable: bool,
    },
    /// Candidates exist, but none is visible from the calling scope.
    /// Carries the full candidate set before filtering.
    Inaccessible { candidates: Vec<SymbolId> },
    /// The member comes from metadata this compiler cannot represent.
    Unsupported,
}

impl ErrorReason {
    /// Candidates carried for diagnostics (empty for `Missing`/`Unsupported`).
    pub fn candidates(&self) -> &[SymbolId] {
        match self {
            ErrorReason::Ambiguous { candidates, .. } | ErrorReason::Inaccessible { candidates } => {
                candidates
            }
            ErrorReason::Missing | ErrorReason::Unsupported => &[],
        }
    }
}

/// Why a type reference could not be bound to a real type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorTypeKind {
    /// No type with this name exists in the expected assembly.
    Missing {
        /// Assembly the type was expected in, `None` if unknown.
        assembly: Option<AssemblyIdentity>,
        namespace: Name,
    },
    /// The metadata describing the type is malformed or uses a feature the
    /// compiler cannot represent.
    Unsupported,
    /// Following type-forwarders revisited an assembly.
    ForwardingCycle { assemblies: Vec<AssemblyIdentity> },
    /// More than one type matches the name equally well.
    Ambiguous { candidates: Vec<SymbolId> },
    /// Placeholder type argument of an unbound generic (`List<>`).
    UnboundArgument,
}

/// Misuse of the generic construction API.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConstructError {
    /// The symbol is not an unconstructed generic type or method.
    #[error("{symbol} cannot be constructed: it is not an unconstructed named type or method")]
    NotConstructible { symbol: SymbolId },
    /// The number of type arguments differs from the arity.
    #[error("{symbol} expects {expected} type argument(s), found {found}")]
    ArityMismatch {
        symbol: SymbolId,
        expected: usize,
        found: usize,
    },
    /// A type argument is an unbound placeholder.
    #[error("type arguments of {symbol} contain an unbound placeholder")]
    UnboundArgument { symbol: SymbolId },
}
