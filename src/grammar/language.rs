use std::collections::{BTreeSet, HashSet, VecDeque};

use super::{Grammar, EPSILON_INDEX};

impl Grammar {
    /// Sentential forms longer than `max_len` plus the number of nonterminals are pruned. For
    /// grammars without epsilon productions the result is exact; otherwise sentences whose
    /// derivations pass through longer forms may be missing.
    pub fn sentences(&self, max_len: usize) -> BTreeSet<Vec<String>> {
        let mut result = BTreeSet::new();
        let start = match self.start_symbol {
            Some(start) => start,
            None => return result,
        };
        let form_limit = max_len + self.non_terminals.len() + 1;

        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut q: VecDeque<Vec<usize>> = VecDeque::new();
        seen.insert(vec![start]);
        q.push_back(vec![start]);

        while let Some(form) = q.pop_front() {
            let k = match form.iter().position(|&s| self.is_non_terminal(s)) {
                Some(k) => k,
                None => {
                    result.insert(
                        form.iter()
                            .map(|&s| self.get_symbol_name(s).to_string())
                            .collect(),
                    );
                    continue;
                }
            };

            for production in &self.symbols[form[k]].non_terminal().unwrap().productions {
                let next: Vec<usize> = form[..k]
                    .iter()
                    .chain(production.iter().filter(|&&s| s != EPSILON_INDEX))
                    .chain(form[k + 1..].iter())
                    .cloned()
                    .collect();
                let terminals = next.iter().filter(|&&s| !self.is_non_terminal(s)).count();
                if terminals > max_len || next.len() > form_limit {
                    continue;
                }
                if seen.insert(next.clone()) {
                    q.push_back(next);
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use crate::Grammar;

    fn joined(g: &Grammar, max_len: usize) -> Vec<String> {
        g.sentences(max_len).into_iter().map(|s| s.join("")).collect()
    }

    #[test]
    fn bounded_sentences() {
        let g = Grammar::parse("S -> A B\nA -> a A | ε\nB -> b").unwrap();

        assert_eq!(joined(&g, 3), vec!["aab", "ab", "b"]);
    }

    #[test]
    fn left_recursive_grammar_terminates() {
        let g = Grammar::parse("E -> E + n | n").unwrap();

        assert_eq!(joined(&g, 5), vec!["n", "n+n", "n+n+n"]);
    }

    #[test]
    fn empty_string() {
        let g = Grammar::parse("S -> a S b | ε").unwrap();

        assert_eq!(joined(&g, 4), vec!["", "aabb", "ab"]);
    }
}
