//! Parser-instance wiring for the hardening core.
//!
//! The tokenizer and grammar machinery live elsewhere; this module owns the
//! per-instance state they rely on. Construction acquires the hash seed
//! exactly once, builds the context window from the configured budget, and
//! freezes the grammar toggles.

use anyhow::Context;

use crate::{
    config::ParserConfig,
    context::ContextWindow,
    entropy::{
        EntropyCaps, Seed, SeedQuality, SeedReport, acquire_seed_report, acquire_seed_report_with,
    },
    hash::SeededHasher,
};

/// Instance-scoped parser state: one seed, one retention window, one set of
/// grammar toggles. Single-owner, driven by one logical thread of control;
/// sharing an instance across threads is the caller's problem.
pub struct ParserCtxt {
    config: ParserConfig,
    report: SeedReport,
    hasher: SeededHasher,
    context: ContextWindow,
}

impl ParserCtxt {
    /// Build an instance from an already-validated configuration. The seed
    /// is acquired here and never again for this instance.
    pub fn new(config: ParserConfig) -> Self {
        Self::with_report(config, acquire_seed_report())
    }

    /// Like [`ParserCtxt::new`] with an explicit capability table, used by
    /// diagnostics and tests to steer the strategy chain.
    pub fn with_caps(config: ParserConfig, caps: &EntropyCaps) -> Self {
        Self::with_report(config, acquire_seed_report_with(caps))
    }

    /// Build defaults plus environment overrides; configuration problems
    /// surface here rather than during parsing.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ParserConfig::from_env().context("Failed to resolve parser configuration")?;
        Ok(Self::new(config))
    }

    fn with_report(config: ParserConfig, report: SeedReport) -> Self {
        Self {
            config,
            report,
            hasher: SeededHasher::new(report.seed),
            context: ContextWindow::new(config.context_bytes),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn namespaces_enabled(&self) -> bool {
        self.config.namespaces
    }

    pub fn dtd_enabled(&self) -> bool {
        self.config.dtd
    }

    pub fn seed(&self) -> Seed {
        self.report.seed
    }

    /// Diagnostic only. A weak seed never fails construction; it just means
    /// every platform strategy was unavailable and the deterministic mix was
    /// used.
    pub fn seed_quality(&self) -> SeedQuality {
        self.report.quality
    }

    pub fn seed_report(&self) -> SeedReport {
        self.report
    }

    pub fn hasher(&self) -> &SeededHasher {
        &self.hasher
    }

    /// Hash key for a name under this instance's seed. Stable for the
    /// lifetime of the instance.
    pub fn name_key(&self, name: &[u8]) -> u64 {
        self.hasher.hash_name(name)
    }

    /// Record consumed input, in stream order, for later error context.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.context.push(bytes);
    }

    /// The retained bytes around the current parse point and the absolute
    /// offset of the first of them; the error-reporting read path.
    pub fn error_context(&self) -> (u64, &[u8]) {
        self.context.snapshot()
    }

    pub fn context(&self) -> &ContextWindow {
        &self.context
    }
}
