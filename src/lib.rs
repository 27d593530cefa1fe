//! Cfg-gen generates random strings from context-free grammars.
//!
//! A grammar is a newline-separated list of productions in the form
//! `<lhs> := alt1 | alt2 | ...`, where angle brackets delimit nonterminal
//! references and everything else is literal terminal text. Parsing yields a
//! [`Grammar`]; a fixed-point analysis then annotates every nonterminal with
//! the minimum derivation depth needed to reach terminals only, and the
//! generator uses those annotations to produce strings that are guaranteed
//! derivable within a caller-supplied depth budget.
//!
//! # Example
//!
//! ```rust
//! use cfg_gen::Grammar;
//!
//! let mut grammar = Grammar::parse("<S> := a<S>b | c").unwrap();
//!
//! let analysis = grammar.analyze();
//! assert_eq!(analysis.min_required_depth, Some(1));
//! assert!(analysis.unreachable.is_empty());
//!
//! let text = grammar.generate("S", 8).unwrap();
//! assert!(text.contains('c'));
//! assert!(!text.contains('<'));
//! ```
//!
//! For repeatable draws (e.g. as a randomized-test strategy), see
//! [`Sampler`].

pub mod depth;
pub mod generate;
pub mod grammar;
pub mod sampler;
pub mod utils;

pub use depth::{Analysis, Warning};
pub use generate::{Derivation, Step};
pub use grammar::{Expansion, Grammar, Nonterminal, NonterminalId, Part};
pub use sampler::{Sampler, DEFAULT_MAX_DEPTH};
pub use utils::{GrammarError, Result};
