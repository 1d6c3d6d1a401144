//! Special-type tags.
//!
//! Types defined by the primitive-type library carry a `SpecialType` tag so
//! that identity checks ("is this `System.String`?") do not need a name
//! comparison. Tags are assigned once, when the library is bound.

/// Tag for types the compiler knows by identity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum SpecialType {
    #[default]
    None,
    Object,
    Void,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    String,
    IntPtr,
    UIntPtr,
    Array,
    ValueType,
    Enum,
    Delegate,
    MulticastDelegate,
    Nullable,
    IEnumerable,
    IDisposable,
}

/// Metadata names of every tagged type, in declaration order.
const METADATA_NAMES: &[(SpecialType, &str)] = &[
    (SpecialType::Object, "System.Object"),
    (SpecialType::Void, "System.Void"),
    (SpecialType::Boolean, "System.Boolean"),
    (SpecialType::Char, "System.Char"),
    (SpecialType::SByte, "System.SByte"),
    (SpecialType::Byte, "System.Byte"),
    (SpecialType::Int16, "System.Int16"),
    (SpecialType::UInt16, "System.UInt16"),
    (SpecialType::Int32, "System.Int32"),
    (SpecialType::UInt32, "System.UInt32"),
    (SpecialType::Int64, "System.Int64"),
    (SpecialType::UInt64, "System.UInt64"),
    (SpecialType::Single, "System.Single"),
    (SpecialType::Double, "System.Double"),
    (SpecialType::Decimal, "System.Decimal"),
    (SpecialType::String, "System.String"),
    (SpecialType::IntPtr, "System.IntPtr"),
    (SpecialType::UIntPtr, "System.UIntPtr"),
    (SpecialType::Array, "System.Array"),
    (SpecialType::ValueType, "System.ValueType"),
    (SpecialType::Enum, "System.Enum"),
    (SpecialType::Delegate, "System.Delegate"),
    (SpecialType::MulticastDelegate, "System.MulticastDelegate"),
    (SpecialType::Nullable, "System.Nullable`1"),
    (SpecialType::IEnumerable, "System.Collections.IEnumerable"),
    (SpecialType::IDisposable, "System.IDisposable"),
];

impl SpecialType {
    /// Fully qualified (arity-mangled) metadata name, `None` for `None`.
    pub fn metadata_name(self) -> Option<&'static str> {
        METADATA_NAMES
            .iter()
            .find(|(special, _)| *special == self)
            .map(|(_, name)| *name)
    }

    /// Tag for a fully qualified metadata name, `None` if untagged.
    pub fn from_metadata_name(name: &str) -> SpecialType {
        METADATA_NAMES
            .iter()
            .find(|(_, candidate)| *candidate == name)
            .map_or(SpecialType::None, |(special, _)| *special)
    }

    /// All tags other than `None`.
    pub fn all() -> impl Iterator<Item = SpecialType> {
        METADATA_NAMES.iter().map(|(special, _)| *special)
    }

    /// Whether this is a primitive value type of the target platform.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            SpecialType::Boolean
                | SpecialType::Char
                | SpecialType::SByte
                | SpecialType::Byte
                | SpecialType::Int16
                | SpecialType::UInt16
                | SpecialType::Int32
                | SpecialType::UInt32
                | SpecialType::Int64
                | SpecialType::UInt64
                | SpecialType::Single
                | SpecialType::Double
                | SpecialType::IntPtr
                | SpecialType::UIntPtr
        )
    }

    /// Whether this is an integral numeric type.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            SpecialType::SByte
                | SpecialType::Byte
                | SpecialType::Int16
                | SpecialType::UInt16
                | SpecialType::Int32
                | SpecialType::UInt32
                | SpecialType::Int64
                | SpecialType::UInt64
        )
    }

    /// Whether this is a numeric type (integral or floating point).
    pub fn is_numeric(self) -> bool {
        self.is_integral()
            || matches!(
                self,
                SpecialType::Single | SpecialType::Double | SpecialType::Decimal
            )
    }
}
