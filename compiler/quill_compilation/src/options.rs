//! Compilation configuration.

use std::path::PathBuf;

use quill_ir::{AssemblyIdentity, Version};
use quill_metadata::ReferenceOptions;

/// What to compile against.
#[derive(Clone, Debug)]
pub struct CompilationOptions {
    /// Simple name of the assembly being compiled.
    pub assembly_name: Box<str>,
    pub assembly_version: Version,
    /// Explicit references, in order. Must include the primitive and runtime
    /// libraries, directly or transitively.
    pub references: Vec<AssemblyIdentity>,
    pub reference_options: ReferenceOptions,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        CompilationOptions {
            assembly_name: "app".into(),
            assembly_version: Version::new(1, 0, 0, 0),
            references: Vec::new(),
            reference_options: ReferenceOptions::default(),
        }
    }
}

impl CompilationOptions {
    #[must_use]
    pub fn with_assembly_name(mut self, name: &str) -> Self {
        self.assembly_name = name.into();
        self
    }

    #[must_use]
    pub fn with_assembly_version(mut self, version: Version) -> Self {
        self.assembly_version = version;
        self
    }

    #[must_use]
    pub fn with_reference(mut self, identity: AssemblyIdentity) -> Self {
        self.references.push(identity);
        self
    }

    #[must_use]
    pub fn with_references(mut self, identities: impl IntoIterator<Item = AssemblyIdentity>) -> Self {
        self.references.extend(identities);
        self
    }

    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_options = self.reference_options.with_search_path(path);
        self
    }

    #[must_use]
    pub fn with_runtime_library_name(mut self, name: &str) -> Self {
        self.reference_options = self.reference_options.with_runtime_library_name(name);
        self
    }

    #[must_use]
    pub fn with_coalesce_near_duplicates(mut self, coalesce: bool) -> Self {
        self.reference_options = self
            .reference_options
            .with_coalesce_near_duplicates(coalesce);
        self
    }

    /// Identity of the assembly being compiled.
    pub fn assembly_identity(&self) -> AssemblyIdentity {
        AssemblyIdentity::new(&self.assembly_name, self.assembly_version)
    }
}
