//! Build-time and construction-time configuration surface.
//!
//! Compile-time toggles (cargo features) decide the defaults; per-instance
//! options are carried by [`ParserConfig`] and handed to the parser core at
//! construction. Grammar features are opaque here: the core reads them back,
//! this module only resolves and validates them.

use std::env;

use anyhow::{Context, ensure};
use const_format::concatcp;

/// Default number of trailing input bytes retained for error context.
pub const DEFAULT_CONTEXT_BYTES: usize = 1024;

/// Environment variable overriding the context retention budget.
pub const CONTEXT_BYTES_ENV: &str = "RXPAT_CONTEXT_BYTES";

pub const VERSION_STRING: &str = concatcp!(
    env!("CARGO_PKG_NAME"),
    " ",
    env!("CARGO_PKG_VERSION")
);

/// Per-instance parser options.
///
/// `namespaces` and `dtd` are read-only grammar toggles consumed by the
/// parser core; `context_bytes` is the capacity of the error-context window
/// (`0` disables retention entirely).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub namespaces: bool,
    pub dtd: bool,
    pub context_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            namespaces: cfg!(feature = "namespaces"),
            dtd: cfg!(feature = "dtd"),
            context_bytes: DEFAULT_CONTEXT_BYTES,
        }
    }
}

impl ParserConfig {
    /// Resolve a configuration from build defaults plus environment
    /// overrides.
    ///
    /// An invalid `RXPAT_CONTEXT_BYTES` (unparsable or negative) is a
    /// configuration error surfaced here, at construction time, never later
    /// from the retention window itself.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let mut config = Self::default();
        if let Ok(raw) = env::var(CONTEXT_BYTES_ENV) {
            config.context_bytes = parse_context_bytes(&raw)?;
        }
        Ok(config)
    }
}

fn parse_context_bytes(raw: &str) -> Result<usize, anyhow::Error> {
    let value = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("{CONTEXT_BYTES_ENV} is not an integer: {raw:?}"))?;
    ensure!(
        value >= 0,
        "{CONTEXT_BYTES_ENV} must be non-negative, got {value}"
    );
    Ok(value as usize)
}
