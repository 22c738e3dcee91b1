use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub non_terminal: String,
    pub terminal: String,
    pub candidates: Vec<Vec<String>>,
}

impl Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let candidates = self
            .candidates
            .iter()
            .map(|right| format!("{} -> {}", self.non_terminal, right.join(" ")))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "M[{}, {}] is claimed by {}",
            self.non_terminal, self.terminal, candidates
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    UndeclaredNonterminal(String),
    NoProductions(String),
    NoStartSymbol,
    /// `cycle` lists the nonterminals of the offending left-corner cycle, starting and ending at
    /// `non_terminal`.
    IrreducibleLeftRecursion {
        non_terminal: String,
        cycle: Vec<String>,
    },
    LL1Conflict(Vec<Conflict>),
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::UndeclaredNonterminal(name) => {
                write!(f, "\"{}\" is not a declared nonterminal", name)
            }
            GrammarError::NoProductions(name) => {
                write!(f, "nonterminal \"{}\" has no productions", name)
            }
            GrammarError::NoStartSymbol => write!(f, "grammar has no start symbol"),
            GrammarError::IrreducibleLeftRecursion {
                non_terminal,
                cycle,
            } => write!(
                f,
                "left recursion of \"{}\" cannot be eliminated: {}",
                non_terminal,
                cycle.join(" => ")
            ),
            GrammarError::LL1Conflict(conflicts) => {
                write!(f, "grammar is not LL(1): ")?;
                let conflicts = conflicts
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                write!(f, "{}", conflicts)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// Rejections of the table-driven parser. `position` is the index of the offending token in the
/// input (the appended end marker has index `input.len()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    SymbolMismatch {
        expected: String,
        found: String,
        position: usize,
    },
    NoApplicableProduction {
        non_terminal: String,
        lookahead: String,
        position: usize,
    },
    UnexpectedTrailingInput {
        found: String,
        position: usize,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::SymbolMismatch {
                expected,
                found,
                position,
            } => write!(
                f,
                "expected \"{}\" but found \"{}\" at {}",
                expected, found, position
            ),
            ParseError::NoApplicableProduction {
                non_terminal,
                lookahead,
                position,
            } => write!(
                f,
                "no production of {} applies to \"{}\" at {}",
                non_terminal, lookahead, position
            ),
            ParseError::UnexpectedTrailingInput { found, position } => {
                write!(f, "unexpected trailing input \"{}\" at {}", found, position)
            }
        }
    }
}

impl std::error::Error for ParseError {}
