//! Compilation context for the Quill compiler.
//!
//! A `Compilation` binds the referenced libraries, checks that the primitive
//! and runtime libraries are usable, and is the entry point the binder uses
//! for overload, override and well-known member resolution. Every cache
//! lives inside it.

mod compilation;
mod error;
mod options;

use std::sync::Once;

pub use compilation::Compilation;
pub use error::CompilationError;
pub use options::CompilationOptions;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debugging.
///
/// Set `RUST_LOG=quill_metadata=debug` (or similar) to see output.
/// Calling this more than once is harmless.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
