//! The metadata reader seam.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use quill_ir::AssemblyIdentity;

use crate::{MetadataError, ModuleImage};

/// Locates and decodes binary modules.
///
/// Implementations must be deterministic for the lifetime of a compilation:
/// the reference manager locates each identity at most once and treats an
/// error as permanent.
pub trait MetadataReader: Send + Sync {
    /// Every module of the assembly matching `identity`, primary module
    /// first. `Ok(vec![])` means the assembly was not found.
    fn locate(
        &self,
        identity: &AssemblyIdentity,
        search_paths: &[PathBuf],
    ) -> Result<Vec<Arc<ModuleImage>>, MetadataError>;
}

/// A reader serving images registered in memory.
///
/// Lookup matches the simple name (ignoring case) and the exact version.
/// Search paths are ignored.
#[derive(Default)]
pub struct MemoryReader {
    assemblies: RwLock<Vec<Vec<Arc<ModuleImage>>>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        MemoryReader::default()
    }

    /// Register an assembly consisting of `modules`, primary first.
    ///
    /// Empty module lists are ignored.
    pub fn add(&self, modules: Vec<ModuleImage>) {
        if modules.is_empty() {
            return;
        }
        self.assemblies
            .write()
            .push(modules.into_iter().map(Arc::new).collect());
    }

    /// Register a single-module assembly.
    #[must_use]
    pub fn with(self, module: ModuleImage) -> Self {
        self.add(vec![module]);
        self
    }
}

impl MetadataReader for MemoryReader {
    fn locate(
        &self,
        identity: &AssemblyIdentity,
        _search_paths: &[PathBuf],
    ) -> Result<Vec<Arc<ModuleImage>>, MetadataError> {
        let assemblies = self.assemblies.read();
        let found = assemblies.iter().find(|modules| {
            modules.first().is_some_and(|primary| {
                primary.assembly.same_name(identity) && primary.assembly.version == identity.version
            })
        });
        Ok(found.cloned().unwrap_or_default())
    }
}

impl std::fmt::Debug for MemoryReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryReader")
            .field("assemblies", &self.assemblies.read().len())
            .finish()
    }
}
