//! Assembly identities.
//!
//! A referenced binary library is identified by simple name, four-part
//! version, culture and public key token. The reference graph builder uses
//! identities as keys of its lookup-by-identity map.

use std::fmt;

/// Four-part assembly version.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl Version {
    /// Create a version from its four parts.
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Version {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Parse a dotted version string (`"4.0"`, `"1.2.3.4"`).
    ///
    /// Missing trailing parts default to zero; more than four parts or a
    /// non-numeric part yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = [0u16; 4];
        let mut count = 0;
        for part in text.split('.') {
            if count == 4 {
                return None;
            }
            parts[count] = part.trim().parse().ok()?;
            count += 1;
        }
        Some(Version::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Identity of an assembly.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AssemblyIdentity {
    /// Simple name (`"System.Runtime"`).
    pub name: Box<str>,
    pub version: Version,
    /// Culture, `None` for neutral.
    pub culture: Option<Box<str>>,
    /// Public key token, `None` for unsigned assemblies.
    pub public_key_token: Option<[u8; 8]>,
}

impl AssemblyIdentity {
    /// Create a culture-neutral, unsigned identity.
    pub fn new(name: &str, version: Version) -> Self {
        AssemblyIdentity {
            name: name.into(),
            version,
            culture: None,
            public_key_token: None,
        }
    }

    /// Set the public key token.
    #[must_use]
    pub fn with_public_key_token(mut self, token: [u8; 8]) -> Self {
        self.public_key_token = Some(token);
        self
    }

    /// Set the culture.
    #[must_use]
    pub fn with_culture(mut self, culture: &str) -> Self {
        self.culture = Some(culture.into());
        self
    }

    /// Whether the simple names match (assembly names are case-insensitive).
    pub fn same_name(&self, other: &AssemblyIdentity) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }

    /// Whether `other` has the same simple name and major version.
    ///
    /// This is the near-duplicate test used by the reference graph's
    /// compatibility fallback.
    pub fn is_near_duplicate(&self, other: &AssemblyIdentity) -> bool {
        self.same_name(other) && self.version.major == other.version.major
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Version={}", self.name, self.version)?;
        write!(f, ", Culture={}", self.culture.as_deref().unwrap_or("neutral"))?;
        match self.public_key_token {
            Some(token) => {
                write!(f, ", PublicKeyToken=")?;
                for byte in token {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            None => write!(f, ", PublicKeyToken=null"),
        }
    }
}
