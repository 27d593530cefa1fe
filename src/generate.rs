//! Bounded random generation.
//!
//! Repeatedly expands the leftmost nonterminal of a working sequence,
//! choosing uniformly among the alternatives that still fit the remaining
//! depth budget, until only terminals remain. The budget counts expansion
//! steps: at most `max_depth + 1` expansions are ever applied.

use rand::Rng;
use serde::Serialize;

use crate::grammar::{Grammar, Part};
use crate::utils::{GrammarError, Result};

/// One expansion choice made during generation: which rule was expanded and
/// which of its alternatives (by position) was picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub nonterminal: String,
    pub expansion: usize,
}

/// A successful generation: the output text plus the trace of choices that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Derivation {
    pub text: String,
    pub steps: Vec<Step>,
}

impl Grammar {
    /// Generate one string derivable from `start` within `max_depth`
    /// expansion steps, returning the full derivation trace.
    ///
    /// Runs the depth analyzer first if it has not run yet. Fails with
    /// [`GrammarError::UnknownStartSymbol`] for a name the grammar never
    /// mentions, [`GrammarError::UnreachableStartSymbol`] when no finite
    /// derivation exists at any budget, and [`GrammarError::DepthExhausted`]
    /// when this particular budget ran out mid-derivation.
    pub fn derive_with<R: Rng + ?Sized>(
        &mut self,
        start: &str,
        max_depth: usize,
        rng: &mut R,
    ) -> Result<Derivation> {
        if !self.analyzed {
            self.analyze();
        }

        let start_id = self
            .lookup(start)
            .ok_or_else(|| GrammarError::UnknownStartSymbol(start.to_string()))?;
        if self.nonterminal(start_id).min_depth().is_none() {
            return Err(GrammarError::UnreachableStartSymbol(start.to_string()));
        }

        let mut sequence: Vec<Part> = vec![Part::Nonterminal(start_id)];
        let mut steps = Vec::new();
        let mut remaining = max_depth;
        let mut overdrawn = false;

        loop {
            let next = sequence.iter().enumerate().find_map(|(pos, part)| match part {
                Part::Nonterminal(id) => Some((pos, *id)),
                Part::Terminal(_) => None,
            });
            let Some((pos, id)) = next else {
                break;
            };

            // Budget spent while a nonterminal is still unresolved.
            if overdrawn {
                return Err(GrammarError::DepthExhausted(
                    self.nonterminal(id).name().to_string(),
                ));
            }

            // An alternative is viable when applying it (one step) leaves
            // enough budget for the nested steps its parts still need.
            let viable: Vec<usize> = self
                .nonterminal(id)
                .expansions()
                .iter()
                .enumerate()
                .filter_map(|(idx, expansion)| {
                    let depth = self.expansion_min_depth(expansion)?;
                    (depth - 1 <= remaining).then_some(idx)
                })
                .collect();
            if viable.is_empty() {
                return Err(GrammarError::DepthExhausted(
                    self.nonterminal(id).name().to_string(),
                ));
            }

            let choice = viable[rng.gen_range(0..viable.len())];
            steps.push(Step {
                nonterminal: self.nonterminal(id).name().to_string(),
                expansion: choice,
            });

            let parts = self.nonterminal(id).expansions()[choice].parts.clone();
            sequence.splice(pos..=pos, parts);
            if remaining == 0 {
                overdrawn = true;
            } else {
                remaining -= 1;
            }
        }

        let mut text = String::new();
        for part in &sequence {
            if let Part::Terminal(fragment) = part {
                text.push_str(fragment);
            }
        }
        Ok(Derivation { text, steps })
    }

    /// Like [`Grammar::derive_with`], keeping only the output text.
    pub fn generate_with<R: Rng + ?Sized>(
        &mut self,
        start: &str,
        max_depth: usize,
        rng: &mut R,
    ) -> Result<String> {
        self.derive_with(start, max_depth, rng).map(|d| d.text)
    }

    /// Convenience wrapper over [`Grammar::generate_with`] using the thread
    /// RNG. Prefer the seedable variant in tests.
    pub fn generate(&mut self, start: &str, max_depth: usize) -> Result<String> {
        let mut rng = rand::thread_rng();
        self.generate_with(start, max_depth, &mut rng)
    }
}
