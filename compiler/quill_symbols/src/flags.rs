//! Modifier flags shared by all symbol kinds.
//!
//! Flags are fixed when a symbol is defined and never change afterwards;
//! substituted views copy the flags of their original definition.

use bitflags::bitflags;

bitflags! {
    /// Declaration modifiers of a symbol.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymbolFlags: u32 {
        // === Member modifiers (bits 0-7) ===

        /// `static` member or static class.
        const STATIC = 1 << 0;
        /// `abstract` member or type.
        const ABSTRACT = 1 << 1;
        /// `sealed` type or `final` method.
        const SEALED = 1 << 2;
        /// Introduces a new virtual slot.
        const VIRTUAL = 1 << 3;
        /// Overrides an inherited virtual slot.
        const OVERRIDE = 1 << 4;
        /// Implemented outside of managed code.
        const EXTERN = 1 << 5;

        // === Field modifiers (bits 8-11) ===

        /// Compile-time constant field.
        const CONST = 1 << 8;
        /// Field assignable only during construction.
        const READONLY = 1 << 9;

        // === Metadata markers (bits 12-15) ===

        /// Metadata "special name" marker (operators, accessors).
        const SPECIAL_NAME = 1 << 12;
        /// Compiler-generated declaration with no source counterpart.
        const IMPLICITLY_DECLARED = 1 << 13;
        /// Constructor variant that only initializes fields. Never an
        /// overload resolution candidate.
        const INIT_FIELDS_ONLY = 1 << 14;

        // === Parameter modifiers (bits 16-19) ===

        /// Parameter has a default value and may be omitted.
        const OPTIONAL = 1 << 16;
        /// Variadic tail parameter (`...$args`), typed as an array.
        const PARAMS = 1 << 17;
        /// Parameter supplied by the runtime (context, receiver) rather than
        /// by the caller.
        const IMPLICIT = 1 << 18;
        /// Parameter passed by reference.
        const BY_REF = 1 << 19;
    }
}

impl SymbolFlags {
    /// Flags that make a method participate in virtual dispatch.
    pub const DISPATCH_MASK: Self = Self::from_bits_truncate(
        Self::VIRTUAL.bits() | Self::ABSTRACT.bits() | Self::OVERRIDE.bits(),
    );

    /// Whether this method can be overridden by a derived declaration,
    /// ignoring accessibility.
    #[inline]
    pub const fn is_overridable(self) -> bool {
        self.intersects(Self::DISPATCH_MASK)
            && !self.contains(Self::STATIC)
            && !self.contains(Self::SEALED)
    }

    /// Whether the parameter can be left out by the caller.
    #[inline]
    pub const fn is_omittable_parameter(self) -> bool {
        self.intersects(Self::OPTIONAL.union(Self::PARAMS))
    }
}
