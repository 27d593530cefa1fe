//! Repeatable draws for randomized-test integration.
//!
//! A [`Sampler`] bundles a parsed and analyzed grammar with a start symbol,
//! a resolved depth budget, and a seedable RNG, and yields one generated
//! string per [`Sampler::draw`] call. Property-testing harnesses wrap this as
//! their strategy; the advisories computed at construction are exposed so
//! callers can report them instead of parsing log output.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::depth::{Analysis, Warning};
use crate::grammar::Grammar;
use crate::utils::{GrammarError, Result};

/// Depth budget used when none is requested and the grammar has no finite
/// minimum to fall back on.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// A reusable source of random strings from one grammar.
#[derive(Debug, Clone)]
pub struct Sampler {
    grammar: Grammar,
    start: String,
    max_depth: usize,
    rng: StdRng,
    analysis: Analysis,
    warnings: Vec<Warning>,
}

impl Sampler {
    /// Build a sampler seeded from OS entropy.
    ///
    /// The depth budget is the explicit `max_depth` if given, else the
    /// grammar's minimum required depth, else [`DEFAULT_MAX_DEPTH`]. Fails
    /// immediately if `start` is not a symbol of the grammar.
    pub fn new(grammar: Grammar, start: &str, max_depth: Option<usize>) -> Result<Self> {
        Self::build(grammar, start, max_depth, StdRng::from_entropy())
    }

    /// Build a sampler with a fixed seed, for reproducible draws.
    pub fn with_seed(
        grammar: Grammar,
        start: &str,
        max_depth: Option<usize>,
        seed: u64,
    ) -> Result<Self> {
        Self::build(grammar, start, max_depth, StdRng::seed_from_u64(seed))
    }

    /// Load a grammar definition from a file and build a sampler for it.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        start: &str,
        max_depth: Option<usize>,
    ) -> Result<Self> {
        Self::new(Grammar::from_file(path)?, start, max_depth)
    }

    fn build(
        mut grammar: Grammar,
        start: &str,
        max_depth: Option<usize>,
        rng: StdRng,
    ) -> Result<Self> {
        if grammar.lookup(start).is_none() {
            return Err(GrammarError::UnknownStartSymbol(start.to_string()));
        }

        let analysis = grammar.analyze();
        let resolved = max_depth
            .or(analysis.min_required_depth)
            .unwrap_or(DEFAULT_MAX_DEPTH);
        let warnings = analysis.warnings(Some(resolved));

        Ok(Sampler {
            grammar,
            start: start.to_string(),
            max_depth: resolved,
            rng,
            analysis,
            warnings,
        })
    }

    /// Produce one generated string.
    pub fn draw(&mut self) -> Result<String> {
        self.grammar
            .generate_with(&self.start, self.max_depth, &mut self.rng)
    }

    /// Advisories computed when the sampler was built.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The depth analysis of the underlying grammar.
    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// The resolved depth budget used for every draw.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn start_symbol(&self) -> &str {
        &self.start
    }
}
