use std::io;
use thiserror::Error;

/// Errors produced while parsing, analyzing, or generating from a grammar.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed production: {0:?}")]
    MalformedProduction(String),

    #[error("unterminated nonterminal reference in alternative {0:?}")]
    UnterminatedNonterminal(String),

    #[error("grammar contains no productions")]
    EmptyGrammar,

    #[error("unknown start symbol: {0:?}")]
    UnknownStartSymbol(String),

    #[error("start symbol <{0}> can never be reduced to terminals")]
    UnreachableStartSymbol(String),

    #[error("depth budget exhausted while <{0}> was still unresolved")]
    DepthExhausted(String),
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

impl GrammarError {
    /// True for failures that a larger depth budget cannot fix.
    ///
    /// `DepthExhausted` is the one retryable outcome: the grammar itself is
    /// fine, a particular generation attempt just ran out of budget.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, GrammarError::DepthExhausted(_))
    }
}
