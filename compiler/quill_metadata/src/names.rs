//! Arity-mangled metadata type names.
//!
//! Generic types are emitted as `Name`N` where `N` is the number of the
//! type's own generic parameters. A name whose suffix does not parse as a
//! positive decimal without leading zeros is not mangled.

/// Split a metadata name into its unmangled base and inferred arity.
///
/// Returns `(name, 0)` when the name carries no valid arity suffix.
pub fn split_arity(name: &str) -> (&str, usize) {
    let Some(tick) = name.rfind('`') else {
        return (name, 0);
    };
    let (base, suffix) = (&name[..tick], &name[tick + 1..]);
    if base.is_empty()
        || suffix.is_empty()
        || suffix.starts_with('0')
        || !suffix.bytes().all(|b| b.is_ascii_digit())
    {
        return (name, 0);
    }
    match suffix.parse::<usize>() {
        Ok(arity) => (base, arity),
        Err(_) => (name, 0),
    }
}

/// A parsed top-level or nested type name as used by metadata lookups.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MetadataTypeName {
    namespace: Box<str>,
    /// Name as written, possibly mangled.
    full_name: Box<str>,
    unmangled_name: Box<str>,
    inferred_arity: usize,
    /// Arity the caller insists on, independent of the name's suffix.
    forced_arity: Option<usize>,
}

impl MetadataTypeName {
    /// Parse `"Namespace.Name`N"`. The namespace is everything before the
    /// last dot.
    pub fn from_full_name(full_name: &str) -> Self {
        match full_name.rfind('.') {
            Some(dot) => Self::from_parts(&full_name[..dot], &full_name[dot + 1..]),
            None => Self::from_parts("", full_name),
        }
    }

    /// Build from an explicit namespace and (possibly mangled) name.
    pub fn from_parts(namespace: &str, name: &str) -> Self {
        let (unmangled, arity) = split_arity(name);
        MetadataTypeName {
            namespace: namespace.into(),
            full_name: name.into(),
            unmangled_name: unmangled.into(),
            inferred_arity: arity,
            forced_arity: None,
        }
    }

    /// Require matches to have exactly `arity` own generic parameters.
    #[must_use]
    pub fn with_forced_arity(mut self, arity: usize) -> Self {
        self.forced_arity = Some(arity);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The name as written (`"List`1"`).
    pub fn name(&self) -> &str {
        &self.full_name
    }

    /// The name without arity suffix (`"List"`).
    pub fn unmangled_name(&self) -> &str {
        &self.unmangled_name
    }

    pub fn inferred_arity(&self) -> usize {
        self.inferred_arity
    }

    pub fn forced_arity(&self) -> Option<usize> {
        self.forced_arity
    }

    /// `namespace.name` as written, or just the name for the global namespace.
    pub fn qualified(&self) -> String {
        if self.namespace.is_empty() {
            self.full_name.to_string()
        } else {
            format!("{}.{}", self.namespace, self.full_name)
        }
    }
}
