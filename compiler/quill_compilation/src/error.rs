use quill_metadata::MetadataError;
use quill_resolve::WellKnownError;

/// A compilation that cannot be set up.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompilationError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("no referenced assembly defines the primitive types")]
    PrimitiveLibraryMissing,
    #[error("runtime library `{name}` is not referenced")]
    RuntimeLibraryMissing { name: Box<str> },
    #[error(transparent)]
    WellKnown(#[from] WellKnownError),
}
