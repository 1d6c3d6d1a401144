//! Fatal metadata conditions.

use std::path::PathBuf;

use quill_ir::AssemblyIdentity;

/// A reference that cannot be bound at all.
///
/// These abort the build of the reference graph. Expected lookup failures
/// inside readable modules are error-type sentinels instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    /// An explicitly referenced assembly was not found on any search path.
    #[error("metadata module not found: {identity} (searched {} path(s))", search_paths.len())]
    ModuleNotFound {
        identity: AssemblyIdentity,
        search_paths: Vec<PathBuf>,
    },
    /// A module was found but could not be read. Not retried.
    #[error("cannot read metadata module {identity}: {reason}")]
    Unreadable {
        identity: AssemblyIdentity,
        reason: String,
    },
}
