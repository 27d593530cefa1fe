//! Minimum-derivation-depth analysis.
//!
//! Annotates every nonterminal with the smallest number of nested expansion
//! steps needed to reduce it to terminals only. Recursive rules make the
//! dependency graph cyclic, so the depths are computed by bounded fixed-point
//! relaxation rather than recursion.

use serde::Serialize;

use crate::grammar::{Grammar, NonterminalId};

/// Result of running the depth analyzer over a grammar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Names of nonterminals that no finite derivation can ground, in
    /// first-mention order.
    pub unreachable: Vec<String>,
    /// The largest finite min-depth in the grammar; a budget of at least this
    /// much is needed to reach every groundable rule. `None` when nothing in
    /// the grammar is groundable.
    pub min_required_depth: Option<usize>,
    /// Per-nonterminal min-depths, in first-mention order, for diagnostics.
    pub depths: Vec<(String, Option<usize>)>,
}

/// Non-fatal advisory about a grammar or a requested depth budget.
///
/// Generation can still succeed under either warning, so these are returned
/// to the caller rather than raised as errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Some nonterminals can never be reduced to terminals. Fatal only if
    /// one of them is used as the start symbol.
    UnreachableNonterminals { names: Vec<String> },
    /// The requested budget is below the grammar's deepest necessary
    /// expansion chain.
    DepthBelowMinimum { requested: usize, required: usize },
}

impl Analysis {
    /// The advisories for this analysis, given the depth budget the caller
    /// intends to use (if any).
    pub fn warnings(&self, requested_depth: Option<usize>) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if !self.unreachable.is_empty() {
            warnings.push(Warning::UnreachableNonterminals {
                names: self.unreachable.clone(),
            });
        }
        if let (Some(requested), Some(required)) = (requested_depth, self.min_required_depth) {
            if requested < required {
                warnings.push(Warning::DepthBelowMinimum {
                    requested,
                    required,
                });
            }
        }
        warnings
    }
}

impl Grammar {
    /// Compute min-depths for every nonterminal, in place.
    ///
    /// Bellman-Ford over the rule dependency graph: each nonterminal is a
    /// node, each expansion a hyperedge whose cost is the tree-depth metric.
    /// `|V|` relaxation rounds bound the longest useful derivation chain, so
    /// cyclic rules converge. Nonterminals still unannotated afterwards are
    /// unreachable: no finite derivation grounds them.
    ///
    /// Safe to call repeatedly; each run starts from a clean slate.
    pub fn analyze(&mut self) -> Analysis {
        let n = self.len();

        for i in 0..n {
            self.nonterminal_mut(NonterminalId(i)).min_depth = None;
        }

        // Seed: a rule with an all-terminal alternative grounds in one step.
        for i in 0..n {
            let grounded = self
                .nonterminal(NonterminalId(i))
                .expansions()
                .iter()
                .any(|e| e.produces_only_terminals());
            if grounded {
                self.nonterminal_mut(NonterminalId(i)).min_depth = Some(1);
            }
        }

        for _ in 0..n {
            for i in 0..n {
                let id = NonterminalId(i);
                for j in 0..self.nonterminal(id).expansions().len() {
                    let candidate = {
                        let nt = self.nonterminal(id);
                        self.expansion_min_depth(&nt.expansions()[j])
                    };
                    if let Some(depth) = candidate {
                        let nt = self.nonterminal_mut(id);
                        if nt.min_depth.map_or(true, |current| depth < current) {
                            nt.min_depth = Some(depth);
                        }
                    }
                }
            }
        }

        let mut unreachable = Vec::new();
        let mut depths = Vec::with_capacity(n);
        let mut min_required_depth: Option<usize> = None;
        for nt in self.iter() {
            depths.push((nt.name().to_string(), nt.min_depth()));
            match nt.min_depth() {
                None => unreachable.push(nt.name().to_string()),
                Some(depth) => {
                    min_required_depth = Some(min_required_depth.map_or(depth, |m| m.max(depth)));
                }
            }
        }

        self.analyzed = true;
        Analysis {
            unreachable,
            min_required_depth,
            depths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn min_depth(grammar: &Grammar, name: &str) -> Option<usize> {
        grammar.nonterminal(grammar.lookup(name).unwrap()).min_depth()
    }

    #[test]
    fn test_all_terminal_expansion_gives_depth_one() {
        let mut grammar = Grammar::parse("<S> := abc | <S>x").unwrap();
        let analysis = grammar.analyze();
        assert_eq!(min_depth(&grammar, "S"), Some(1));
        assert_eq!(analysis.min_required_depth, Some(1));
        assert!(analysis.unreachable.is_empty());
    }

    #[test]
    fn test_self_recursive_rule_converges() {
        // The cycle through <S> must not prevent the terminal alternative
        // from fixing the depth at 1.
        let mut grammar = Grammar::parse("<S> := a<S>b | c").unwrap();
        let analysis = grammar.analyze();
        assert_eq!(min_depth(&grammar, "S"), Some(1));
        assert_eq!(analysis.min_required_depth, Some(1));
    }

    #[test]
    fn test_chain_depths() {
        let mut grammar = Grammar::parse("<S> := <A>\n<A> := z").unwrap();
        let analysis = grammar.analyze();
        assert_eq!(min_depth(&grammar, "A"), Some(1));
        assert_eq!(min_depth(&grammar, "S"), Some(2));
        assert_eq!(analysis.min_required_depth, Some(2));
        // Diagnostic depths follow first-mention order.
        assert_eq!(
            analysis.depths,
            vec![("S".to_string(), Some(2)), ("A".to_string(), Some(1))]
        );
    }

    #[test]
    fn test_depth_is_max_over_parts_not_sum() {
        // <S> needs both branches grounded, but they nest in parallel.
        let mut grammar = Grammar::parse("<S> := <A><B>\n<A> := a\n<B> := <A>").unwrap();
        grammar.analyze();
        assert_eq!(min_depth(&grammar, "A"), Some(1));
        assert_eq!(min_depth(&grammar, "B"), Some(2));
        assert_eq!(min_depth(&grammar, "S"), Some(3));
    }

    #[test]
    fn test_cycle_without_exit_is_unreachable() {
        let mut grammar = Grammar::parse("<S> := <A>\n<A> := <B>\n<B> := <A>").unwrap();
        let analysis = grammar.analyze();
        assert_eq!(
            analysis.unreachable,
            vec!["S".to_string(), "A".to_string(), "B".to_string()]
        );
        assert_eq!(analysis.min_required_depth, None);
        assert_eq!(min_depth(&grammar, "S"), None);
    }

    #[test]
    fn test_rule_with_no_expansions_is_unreachable() {
        let mut grammar = Grammar::parse("<S> := <Missing>x").unwrap();
        let analysis = grammar.analyze();
        assert!(analysis.unreachable.contains(&"Missing".to_string()));
        // And everything depending on it is dragged down too.
        assert!(analysis.unreachable.contains(&"S".to_string()));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let mut grammar =
            Grammar::parse("<S> := a<S>b | <A>\n<A> := <B>c\n<B> := d | <B>e").unwrap();
        let first = grammar.analyze();
        let second = grammar.analyze();
        assert_eq!(first, second);
    }

    #[test]
    fn test_warnings() {
        let mut grammar = Grammar::parse("<S> := <A>\n<A> := z\n<Dead> := <Dead>").unwrap();
        let analysis = grammar.analyze();

        let warnings = analysis.warnings(Some(1));
        assert_eq!(
            warnings,
            vec![
                Warning::UnreachableNonterminals {
                    names: vec!["Dead".to_string()]
                },
                Warning::DepthBelowMinimum {
                    requested: 1,
                    required: 2
                },
            ]
        );

        // A sufficient budget leaves only the unreachable advisory.
        assert_eq!(analysis.warnings(Some(5)).len(), 1);
    }
}
