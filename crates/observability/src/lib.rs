//! Log output for catalog binaries.
//!
//! Call [`init`] once at the top of `main`. `RUST_LOG` picks what is logged,
//! `CATALOG_LOG_FORMAT` picks how it is printed.

pub mod tracing;

pub use tracing::{ENV_LOG_FORMAT, LogFormat, init_with};

/// Install the global subscriber using the format from `CATALOG_LOG_FORMAT`.
///
/// A second call leaves the first subscriber in place.
pub fn init() {
    tracing::init();
}
