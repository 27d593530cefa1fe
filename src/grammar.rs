use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::utils::{GrammarError, Result};

/// Index of a nonterminal in its [`Grammar`]'s arena.
///
/// Every mention of a name, on either side of a production, resolves to the
/// same index, so a depth annotation written through one reference is seen
/// through all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonterminalId(pub(crate) usize);

/// One part of an expansion body: literal text, or a reference to another
/// rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// A terminal fragment, emitted as-is.
    Terminal(String),
    /// A reference to a nonterminal in the same grammar.
    Nonterminal(NonterminalId),
}

impl Part {
    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Part::Nonterminal(_))
    }
}

/// One alternative right-hand side: an ordered sequence of parts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expansion {
    pub parts: Vec<Part>,
}

impl Expansion {
    /// True when every part is a terminal (an empty body counts too).
    pub fn produces_only_terminals(&self) -> bool {
        self.parts.iter().all(|p| matches!(p, Part::Terminal(_)))
    }
}

/// A named rule: its alternatives plus the depth annotation written by the
/// analyzer. `min_depth` of `None` means "not yet known to be groundable".
#[derive(Debug, Clone)]
pub struct Nonterminal {
    name: String,
    pub(crate) min_depth: Option<usize>,
    pub(crate) expansions: Vec<Expansion>,
}

impl Nonterminal {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum number of nested expansion steps needed to reduce this
    /// nonterminal to terminals only. `None` until analyzed, and permanently
    /// `None` when no finite derivation exists.
    pub fn min_depth(&self) -> Option<usize> {
        self.min_depth
    }

    pub fn expansions(&self) -> &[Expansion] {
        &self.expansions
    }
}

/// A context-free grammar: an arena of nonterminals plus a name index.
///
/// Built by [`Grammar::parse`], annotated in place by [`Grammar::analyze`],
/// and read by the generator. Iteration follows first-mention order.
#[derive(Debug, Clone)]
pub struct Grammar {
    nonterminals: Vec<Nonterminal>,
    index: HashMap<String, NonterminalId>,
    pub(crate) analyzed: bool,
}

impl Grammar {
    fn new() -> Self {
        Grammar {
            nonterminals: Vec::new(),
            index: HashMap::new(),
            analyzed: false,
        }
    }

    /// Parse a grammar from its textual definition.
    ///
    /// Each non-blank line is a production `<lhs> := alt1 | alt2 | ...`.
    /// Angle brackets delimit nonterminal references inside an alternative;
    /// everything else is literal terminal text. Repeated left-hand sides
    /// append further alternatives to the same rule.
    pub fn parse(text: &str) -> Result<Self> {
        let lhs_regex = Regex::new(r"^<([^<>|]+)>$").unwrap();
        let mut grammar = Grammar::new();
        let mut saw_production = false;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (lhs, rhs) = line
                .split_once(":=")
                .ok_or_else(|| GrammarError::MalformedProduction(line.to_string()))?;
            let name = lhs_regex
                .captures(lhs.trim())
                .map(|caps| caps[1].to_string())
                .ok_or_else(|| GrammarError::MalformedProduction(line.to_string()))?;

            let id = grammar.intern(&name);
            for alternative in rhs.trim().split('|') {
                let expansion = grammar.parse_alternative(alternative.trim())?;
                grammar.nonterminals[id.0].expansions.push(expansion);
            }
            saw_production = true;
        }

        if !saw_production {
            return Err(GrammarError::EmptyGrammar);
        }
        Ok(grammar)
    }

    /// Load and parse a grammar definition from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Append alternatives to a rule programmatically. `body` uses the same
    /// syntax as the right-hand side of a production line.
    ///
    /// Invalidates any previous depth analysis.
    pub fn add_production(&mut self, name: &str, body: &str) -> Result<()> {
        let id = self.intern(name);
        for alternative in body.trim().split('|') {
            let expansion = self.parse_alternative(alternative.trim())?;
            self.nonterminals[id.0].expansions.push(expansion);
        }
        self.analyzed = false;
        Ok(())
    }

    /// Scan a single alternative into an [`Expansion`].
    ///
    /// Plain characters accumulate into a pending terminal fragment; `<`
    /// flushes the fragment and opens a nonterminal name; `>` closes it and
    /// interns the name. A `>` outside a name is taken literally (the format
    /// has no escaping). A `<` left open at the end of the alternative, or
    /// re-opened before the previous one closed, is an error.
    fn parse_alternative(&mut self, body: &str) -> Result<Expansion> {
        let mut parts = Vec::new();
        let mut buf = String::new();
        let mut in_name = false;

        for ch in body.chars() {
            match ch {
                '<' => {
                    if in_name {
                        return Err(GrammarError::UnterminatedNonterminal(body.to_string()));
                    }
                    if !buf.is_empty() {
                        parts.push(Part::Terminal(std::mem::take(&mut buf)));
                    }
                    in_name = true;
                }
                '>' if in_name => {
                    let id = self.intern(&buf);
                    buf.clear();
                    parts.push(Part::Nonterminal(id));
                    in_name = false;
                }
                _ => buf.push(ch),
            }
        }

        if in_name {
            return Err(GrammarError::UnterminatedNonterminal(body.to_string()));
        }
        if !buf.is_empty() {
            parts.push(Part::Terminal(buf));
        }
        Ok(Expansion { parts })
    }

    /// Return the id for `name`, creating an empty rule on first mention.
    pub(crate) fn intern(&mut self, name: &str) -> NonterminalId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = NonterminalId(self.nonterminals.len());
        self.nonterminals.push(Nonterminal {
            name: name.to_string(),
            min_depth: None,
            expansions: Vec::new(),
        });
        self.index.insert(name.to_string(), id);
        id
    }

    /// Look up a nonterminal by name.
    pub fn lookup(&self, name: &str) -> Option<NonterminalId> {
        self.index.get(name).copied()
    }

    pub fn nonterminal(&self, id: NonterminalId) -> &Nonterminal {
        &self.nonterminals[id.0]
    }

    /// Check whether the grammar defines (or mentions) a nonterminal.
    pub fn has_nonterminal(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of distinct nonterminals.
    pub fn len(&self) -> usize {
        self.nonterminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nonterminals.is_empty()
    }

    /// Iterate nonterminals in first-mention order.
    pub fn iter(&self) -> impl Iterator<Item = &Nonterminal> {
        self.nonterminals.iter()
    }

    pub(crate) fn nonterminal_mut(&mut self, id: NonterminalId) -> &mut Nonterminal {
        &mut self.nonterminals[id.0]
    }

    /// Tree-depth metric for one expansion: 1 when the body is empty or all
    /// terminals, otherwise one more than the deepest nonterminal part.
    /// `None` when some part is not (yet) known to be groundable.
    pub(crate) fn expansion_min_depth(&self, expansion: &Expansion) -> Option<usize> {
        let mut deepest = 0usize;
        for part in &expansion.parts {
            if let Part::Nonterminal(id) = part {
                match self.nonterminal(*id).min_depth {
                    Some(depth) => deepest = deepest.max(depth),
                    None => return None,
                }
            }
        }
        Some(deepest + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_production() {
        let grammar = Grammar::parse("<S> := a<S>b | c").unwrap();
        assert_eq!(grammar.len(), 1);

        let s = grammar.nonterminal(grammar.lookup("S").unwrap());
        assert_eq!(s.expansions().len(), 2);
        assert_eq!(
            s.expansions()[0].parts,
            vec![
                Part::Terminal("a".to_string()),
                Part::Nonterminal(NonterminalId(0)),
                Part::Terminal("b".to_string()),
            ]
        );
        assert_eq!(s.expansions()[1].parts, vec![Part::Terminal("c".to_string())]);
    }

    #[test]
    fn test_rhs_mention_registers_nonterminal() {
        let grammar = Grammar::parse("<S> := <A>x").unwrap();
        // <A> appears only on a right-hand side but still gets a record.
        assert!(grammar.has_nonterminal("A"));
        let a = grammar.nonterminal(grammar.lookup("A").unwrap());
        assert!(a.expansions().is_empty());
    }

    #[test]
    fn test_repeated_lhs_merges_expansions() {
        let grammar = Grammar::parse("<S> := a\n<S> := b | c").unwrap();
        let s = grammar.nonterminal(grammar.lookup("S").unwrap());
        assert_eq!(s.expansions().len(), 3);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let grammar = Grammar::parse("\n<S> := a\n\n<T> := b\n").unwrap();
        assert_eq!(grammar.len(), 2);
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        let err = Grammar::parse("<S> = a | b").unwrap_err();
        assert!(matches!(err, GrammarError::MalformedProduction(_)));
    }

    #[test]
    fn test_unbracketed_lhs_is_malformed() {
        let err = Grammar::parse("S := a").unwrap_err();
        assert!(matches!(err, GrammarError::MalformedProduction(_)));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(Grammar::parse(""), Err(GrammarError::EmptyGrammar)));
        assert!(matches!(
            Grammar::parse("\n  \n"),
            Err(GrammarError::EmptyGrammar)
        ));
    }

    #[test]
    fn test_unterminated_reference_is_an_error() {
        let err = Grammar::parse("<S> := a<B").unwrap_err();
        assert!(matches!(err, GrammarError::UnterminatedNonterminal(_)));

        // Re-opening before the previous name closed is the same error.
        let err = Grammar::parse("<S> := <A<B>").unwrap_err();
        assert!(matches!(err, GrammarError::UnterminatedNonterminal(_)));
    }

    #[test]
    fn test_stray_close_bracket_is_literal() {
        let grammar = Grammar::parse("<S> := a>b").unwrap();
        let s = grammar.nonterminal(grammar.lookup("S").unwrap());
        assert_eq!(s.expansions()[0].parts, vec![Part::Terminal("a>b".to_string())]);
    }

    #[test]
    fn test_empty_alternative_is_epsilon() {
        let grammar = Grammar::parse("<S> := a |").unwrap();
        let s = grammar.nonterminal(grammar.lookup("S").unwrap());
        assert_eq!(s.expansions().len(), 2);
        assert!(s.expansions()[1].parts.is_empty());
        assert!(s.expansions()[1].produces_only_terminals());
    }

    #[test]
    fn test_add_production() {
        let mut grammar = Grammar::parse("<S> := <A>").unwrap();
        grammar.add_production("A", "x | y").unwrap();
        let a = grammar.nonterminal(grammar.lookup("A").unwrap());
        assert_eq!(a.expansions().len(), 2);
    }
}
