//! Conversion cost.
//!
//! Costs are bit sets that combine with `|`. They are ordered by numeric
//! value, so a cost carrying any bit at or above `NO_CONVERSION` compares
//! greater than every acceptable cost.

use bitflags::bitflags;

bitflags! {
    /// Cost of using a candidate signature for a given one. Lower is better.
    #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
    pub struct ConversionCost: u16 {
        // === Acceptable ===

        /// Matches, but through a slower path.
        const PASS_COSTLY = 1 << 0;
        /// Needs an implicit conversion.
        const IMPLICIT_CAST = 1 << 1;
        /// The conversion may lose precision.
        const LOSING_PRECISION = 1 << 2;
        /// Accepted with a warning.
        const WARNING = 1 << 3;
        /// A parameter is filled with its default value.
        const DEFAULT_VALUE = 1 << 4;

        // === Rejected ===

        /// A parameter type is incompatible.
        const NO_CONVERSION = 1 << 5;
        /// More arguments than parameters.
        const TOO_MANY_ARGS = 1 << 6;
        /// Fewer arguments than mandatory parameters.
        const MISSING_ARGS = 1 << 7;
        const ERROR = 1 << 8;
    }
}

impl ConversionCost {
    /// Exact match.
    pub const PASS: Self = Self::empty();

    /// Whether a candidate with this cost may be chosen.
    #[inline]
    pub fn is_accepted(self) -> bool {
        self < Self::NO_CONVERSION
    }

    #[inline]
    pub fn is_pass(self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests;
