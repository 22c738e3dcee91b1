use std::collections::HashSet;

use super::{grammar::Symbol, Grammar, END_MARK_INDEX, EPSILON_INDEX};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets(Vec<HashSet<usize>>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets(Vec<HashSet<usize>>);

impl FirstSets {
    pub fn of(&self, symbol: usize) -> &HashSet<usize> {
        &self.0[symbol]
    }

    pub fn nullable(&self, symbol: usize) -> bool {
        self.0[symbol].contains(&EPSILON_INDEX)
    }

    pub fn of_sequence(&self, production: &[usize]) -> HashSet<usize> {
        let mut first: HashSet<usize> = HashSet::new();
        for symbol in production {
            let f = &self.0[*symbol];
            first.extend(f.iter().filter(|&&s| s != EPSILON_INDEX).cloned());
            if !f.contains(&EPSILON_INDEX) {
                return first;
            }
        }
        first.insert(EPSILON_INDEX);
        first
    }
}

impl FollowSets {
    pub fn of(&self, symbol: usize) -> &HashSet<usize> {
        &self.0[symbol]
    }
}

impl Grammar {
    pub fn calculate_first(&self) -> FirstSets {
        let mut first = FirstSets(
            self.symbols
                .iter()
                .enumerate()
                .map(|(idx, symbol)| match symbol {
                    Symbol::NonTerminal(_) => HashSet::new(),
                    _ => std::iter::once(idx).collect(),
                })
                .collect(),
        );

        while self.first_iteration(&mut first) {}
        first
    }

    pub(crate) fn first_iteration(&self, first: &mut FirstSets) -> bool {
        let mut changed = false;
        for nt in self.non_terminal_iter() {
            let mut update: HashSet<usize> = HashSet::new();
            for production in &nt.productions {
                update.extend(first.of_sequence(production));
            }

            let set = &mut first.0[nt.index];
            for s in update {
                changed |= set.insert(s);
            }
        }
        changed
    }

    // all sets stay empty without a start symbol
    pub fn calculate_follow(&self, first: &FirstSets) -> FollowSets {
        let mut follow = FollowSets(vec![HashSet::new(); self.symbols.len()]);
        if let Some(start_idx) = self.start_symbol {
            follow.0[start_idx].insert(END_MARK_INDEX);
            while self.follow_iteration(first, &mut follow) {}
        }
        follow
    }

    pub(crate) fn follow_iteration(&self, first: &FirstSets, follow: &mut FollowSets) -> bool {
        let mut changed = false;
        for left in self.non_terminal_iter() {
            for production in &left.productions {
                for (i, &symbol) in production.iter().enumerate() {
                    if !self.is_non_terminal(symbol) {
                        continue;
                    }

                    let rest = first.of_sequence(&production[i + 1..]);
                    let mut update: Vec<usize> = rest
                        .iter()
                        .filter(|&&s| s != EPSILON_INDEX)
                        .cloned()
                        .collect();
                    if rest.contains(&EPSILON_INDEX) {
                        update.extend(follow.0[left.index].iter().cloned());
                    }

                    for s in update {
                        changed |= follow.0[symbol].insert(s);
                    }
                }
            }
        }
        changed
    }
}
