//! Member resolution for the Quill compiler.
//!
//! - `OverloadsList`: which overload a guest-language call binds to, given
//!   partially known argument types and a possibly dynamic calling scope.
//! - `OverrideResolver`: which base or interface declaration a method
//!   overrides or implements, ranked by `ConversionCost`.
//! - `WellKnownMembers`: the privileged-library types and members lowering
//!   relies on, resolved once per compilation from static descriptors.
//!
//! Expected failures are values (`MethodResolution::Unresolved`, `None`).
//! Only a missing well-known symbol is an error.

mod cost;
#[cfg(test)]
mod fixtures;
mod overload;
mod overrides;
pub mod well_known;

pub use cost::ConversionCost;
pub use overload::{CallArgument, MethodResolution, OverloadsList, VisibilityScope};
pub use overrides::OverrideResolver;
pub use well_known::{
    CoreField, CoreLibrary, CoreMethod, CoreMethodKind, CoreParam, CoreProperty, CoreType,
    WellKnownError, WellKnownMembers,
};
