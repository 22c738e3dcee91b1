use std::collections::{HashMap, HashSet};

use super::{GrammarError, END_MARK, END_MARK_INDEX, EPSILON, EPSILON_ALIASES, EPSILON_INDEX};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    pub productions: Vec<Vec<usize>>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            productions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Epsilon,
    EndMark,
    Terminal(String),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }

    pub fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductionId {
    pub left: usize,
    pub index: usize,
}

/// Symbol 0 is always epsilon and symbol 1 the end marker. Nonterminals keep their declaration
/// order in `non_terminals`, which drives rule numbering and the left-recursion order. A grammar
/// is never modified by the stages that read it; every transformation returns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) symbol_table: HashMap<String, usize>,
    pub(crate) non_terminals: Vec<usize>,
    pub(crate) start_symbol: Option<usize>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        let mut g = Self {
            symbols: vec![Symbol::Epsilon, Symbol::EndMark],
            symbol_table: HashMap::new(),
            non_terminals: Vec::new(),
            start_symbol: None,
        };

        g.symbol_table.insert(EPSILON.to_string(), EPSILON_INDEX);
        for alias in EPSILON_ALIASES {
            g.symbol_table.insert(alias.to_string(), EPSILON_INDEX);
        }
        g.symbol_table.insert(END_MARK.to_string(), END_MARK_INDEX);

        g
    }

    pub fn from_entries<L, P, B, S>(entries: impl IntoIterator<Item = (L, P)>) -> Result<Self, GrammarError>
    where
        L: AsRef<str>,
        P: IntoIterator<Item = B>,
        B: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(entries, None)
    }

    /// Like [`Grammar::from_entries`], but body symbols must be declared nonterminals, members
    /// of `terminals`, or epsilon.
    pub fn from_entries_with_terminals<L, P, B, S, T>(
        entries: impl IntoIterator<Item = (L, P)>,
        terminals: impl IntoIterator<Item = T>,
    ) -> Result<Self, GrammarError>
    where
        L: AsRef<str>,
        P: IntoIterator<Item = B>,
        B: IntoIterator<Item = S>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let terminals: HashSet<String> = terminals
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .collect();
        Self::build(entries, Some(&terminals))
    }

    fn build<L, P, B, S>(
        entries: impl IntoIterator<Item = (L, P)>,
        terminals: Option<&HashSet<String>>,
    ) -> Result<Self, GrammarError>
    where
        L: AsRef<str>,
        P: IntoIterator<Item = B>,
        B: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<(String, Vec<Vec<String>>)> = entries
            .into_iter()
            .map(|(left, productions)| {
                (
                    left.as_ref().trim().to_string(),
                    productions
                        .into_iter()
                        .map(|p| p.into_iter().map(|s| s.as_ref().to_string()).collect())
                        .collect(),
                )
            })
            .collect();

        let mut g = Self::new();
        for (left, _) in &entries {
            match g.get_symbol_index(left) {
                None => {
                    g.add_non_terminal(left);
                }
                Some(idx) if g.is_non_terminal(idx) => {}
                // epsilon and the end marker cannot be declared
                Some(_) => return Err(GrammarError::UndeclaredNonterminal(left.clone())),
            }
        }

        for (left, productions) in entries {
            let left = g.symbol_table[&left];
            for production in productions {
                let mut right = Vec::with_capacity(production.len());
                for s in production {
                    let idx = match g.get_symbol_index(&s) {
                        Some(idx) => idx,
                        None => match terminals {
                            Some(declared) if !declared.contains(&s) => {
                                return Err(GrammarError::UndeclaredNonterminal(s))
                            }
                            _ => g.add_terminal(s),
                        },
                    };
                    right.push(idx);
                }
                g.add_production(left, right);
            }
        }

        if let Some(nt) = g.non_terminal_iter().find(|nt| nt.productions.is_empty()) {
            return Err(GrammarError::NoProductions(nt.name.clone()));
        }

        g.start_symbol = g.non_terminals.first().cloned();
        Ok(g)
    }

    pub fn with_start_symbol(mut self, name: &str) -> Result<Self, GrammarError> {
        match self.get_symbol_index(name) {
            Some(idx) if self.is_non_terminal(idx) => {
                self.start_symbol = Some(idx);
                Ok(self)
            }
            _ => Err(GrammarError::UndeclaredNonterminal(name.to_string())),
        }
    }

    pub fn start_symbol(&self) -> Option<usize> {
        self.start_symbol
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = &String> {
        self.symbols.iter().filter_map(|s| {
            if let Symbol::Terminal(name) = s {
                Some(name)
            } else {
                None
            }
        })
    }

    pub fn terminal_indices(&self) -> Vec<usize> {
        (0..self.symbols.len())
            .filter(|&i| matches!(self.symbols[i], Symbol::Terminal(_)))
            .collect()
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.non_terminals
            .iter()
            .filter_map(|&idx| self.symbols[idx].non_terminal())
    }

    pub fn non_terminal_names(&self) -> Vec<&str> {
        self.non_terminal_iter().map(|nt| nt.name.as_str()).collect()
    }

    pub fn non_terminal(&self, idx: usize) -> Option<&NonTerminal> {
        self.symbols.get(idx).and_then(|s| s.non_terminal())
    }

    pub fn is_non_terminal(&self, idx: usize) -> bool {
        self.non_terminal(idx).is_some()
    }

    pub fn is_terminal(&self, idx: usize) -> bool {
        matches!(self.symbols.get(idx), Some(Symbol::Terminal(_)))
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        match &self.symbols[index] {
            Symbol::Epsilon => EPSILON,
            Symbol::EndMark => END_MARK,
            Symbol::NonTerminal(e) => e.name.as_str(),
            Symbol::Terminal(e) => e.as_str(),
        }
    }

    pub(crate) fn symbol_names(&self) -> impl Iterator<Item = &str> {
        self.symbol_table.keys().map(|s| s.as_str())
    }

    pub fn productions_of(&self, name: &str) -> Result<&[Vec<usize>], GrammarError> {
        self.get_symbol_index(name)
            .and_then(|idx| self.non_terminal(idx))
            .map(|nt| nt.productions.as_slice())
            .ok_or_else(|| GrammarError::UndeclaredNonterminal(name.to_string()))
    }

    pub fn production(&self, id: ProductionId) -> &[usize] {
        &self.symbols[id.left].non_terminal().unwrap().productions[id.index]
    }

    pub fn production_ids(&self) -> impl Iterator<Item = ProductionId> + '_ {
        self.non_terminal_iter().flat_map(|nt| {
            (0..nt.productions.len()).map(move |index| ProductionId {
                left: nt.index,
                index,
            })
        })
    }

    pub fn rule_number(&self, id: ProductionId) -> usize {
        self.production_ids().position(|p| p == id).map_or(0, |i| i + 1)
    }

    pub fn production_to_vec_str(&self, production: &[usize]) -> Vec<&str> {
        production
            .iter()
            .map(|idx| self.get_symbol_name(*idx))
            .collect()
    }

    pub fn named_productions(&self) -> Vec<(String, Vec<Vec<String>>)> {
        self.non_terminal_iter()
            .map(|nt| {
                (
                    nt.name.clone(),
                    nt.productions
                        .iter()
                        .map(|p| {
                            self.production_to_vec_str(p)
                                .into_iter()
                                .map(|s| s.to_string())
                                .collect()
                        })
                        .collect(),
                )
            })
            .collect()
    }

    pub(crate) fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.push_non_terminal(name);
        self.non_terminals.push(idx);
        idx
    }

    pub(crate) fn add_non_terminal_after(&mut self, anchor: usize, name: &str) -> usize {
        let idx = self.push_non_terminal(name);
        let position = self
            .non_terminals
            .iter()
            .position(|&i| i == anchor)
            .map_or(self.non_terminals.len(), |p| p + 1);
        self.non_terminals.insert(position, idx);
        idx
    }

    fn push_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string())));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    pub(crate) fn add_terminal(&mut self, name: String) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.clone()));
        self.symbol_table.insert(name, idx);
        idx
    }

    pub(crate) fn add_production(&mut self, left: usize, right: Vec<usize>) {
        let right = normalize(right);
        self.symbols[left]
            .mut_non_terminal()
            .unwrap()
            .productions
            .push(right);
    }

    pub(crate) fn set_productions(&mut self, left: usize, productions: Vec<Vec<usize>>) {
        self.symbols[left].mut_non_terminal().unwrap().productions =
            productions.into_iter().map(normalize).collect();
    }
}

pub(crate) fn normalize(mut production: Vec<usize>) -> Vec<usize> {
    production.retain(|&s| s != EPSILON_INDEX);
    if production.is_empty() {
        production.push(EPSILON_INDEX);
    }
    production
}

pub(crate) fn concat(prefix: &[usize], rest: &[usize]) -> Vec<usize> {
    normalize(prefix.iter().chain(rest.iter()).cloned().collect())
}
