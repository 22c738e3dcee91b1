use log::debug;

use super::{grammar::normalize, FreshSymbolAllocator, Grammar, EPSILON_INDEX};

impl Grammar {
    pub fn left_factor(&self) -> Grammar {
        let mut allocator = FreshSymbolAllocator::for_grammar(self);
        self.left_factor_with(&mut allocator)
    }

    pub fn left_factor_with(&self, allocator: &mut FreshSymbolAllocator) -> Grammar {
        allocator.reserve_grammar(self);

        let mut g = self.clone();
        for &left in &self.non_terminals {
            let productions = self.symbols[left].non_terminal().unwrap().productions.clone();
            let mut anchor = left;
            g.factor(allocator, left, productions, &mut anchor);
        }
        g
    }

    fn factor(
        &mut self,
        allocator: &mut FreshSymbolAllocator,
        left: usize,
        productions: Vec<Vec<usize>>,
        anchor: &mut usize,
    ) {
        // epsilon productions stay singleton groups
        let mut groups: Vec<Vec<Vec<usize>>> = Vec::new();
        for production in productions {
            let key = production[0];
            if key != EPSILON_INDEX {
                if let Some(group) = groups.iter_mut().find(|group| group[0][0] == key) {
                    group.push(production);
                    continue;
                }
            }
            groups.push(vec![production]);
        }

        let mut result: Vec<Vec<usize>> = Vec::new();
        for group in groups {
            let prefix_len = if group.len() > 1 {
                common_prefix_len(&group)
            } else {
                0
            };
            if prefix_len == 0 {
                result.extend(group);
                continue;
            }

            let name = allocator.fresh(self.get_symbol_name(left));
            let prime = self.add_non_terminal_after(*anchor, &name);
            *anchor = prime;
            debug!(
                "factoring {} alternatives of {} into {}",
                group.len(),
                self.get_symbol_name(left),
                name
            );

            let mut factored = group[0][..prefix_len].to_vec();
            factored.push(prime);
            result.push(factored);

            let suffixes = group
                .iter()
                .map(|production| normalize(production[prefix_len..].to_vec()))
                .collect();
            self.factor(allocator, prime, suffixes, anchor);
        }

        self.set_productions(left, result);
    }
}

fn common_prefix_len(group: &[Vec<usize>]) -> usize {
    let shortest = group.iter().map(|p| p.len()).min().unwrap_or(0);
    (0..shortest)
        .find(|&i| group.iter().any(|p| p[i] != group[0][i]))
        .unwrap_or(shortest)
}

#[cfg(test)]
mod tests {
    use super::common_prefix_len;
    use crate::Grammar;

    fn listing(g: &Grammar) -> Vec<String> {
        g.named_productions()
            .into_iter()
            .map(|(left, rights)| {
                format!(
                    "{} -> {}",
                    left,
                    rights
                        .iter()
                        .map(|right| right.join(" "))
                        .collect::<Vec<_>>()
                        .join(" | ")
                )
            })
            .collect()
    }

    #[test]
    fn prefix_length() {
        assert_eq!(common_prefix_len(&[vec![1, 2, 3], vec![1, 2, 4], vec![1, 2]]), 2);
        assert_eq!(common_prefix_len(&[vec![1, 2], vec![1, 2]]), 2);
        assert_eq!(common_prefix_len(&[vec![1], vec![2]]), 0);
    }

    #[test]
    fn nested_prefixes() {
        let g = Grammar::parse(
            "S -> a p p l e | a p p l y | a p p l i c a t i o n | b a l l | b a t | b a t h | X b
             X -> a b | a c | a d",
        )
        .unwrap();
        let r = g.left_factor();

        assert_eq!(
            listing(&r),
            vec![
                "S -> a p p l S' | b a S'' | X b",
                "S' -> e | y | i c a t i o n",
                "S'' -> l l | t S'''",
                "S''' -> ε | h",
                "X -> a X'",
                "X' -> b | c | d",
            ]
        );
    }

    #[test]
    fn multi_character_symbols() {
        let g = Grammar::parse("stmt -> if expr then stmt | if expr then stmt else stmt | other")
            .unwrap();
        let r = g.left_factor();

        assert_eq!(
            listing(&r),
            vec![
                "stmt -> if expr then stmt stmt' | other",
                "stmt' -> ε | else stmt",
            ]
        );
    }

    #[test]
    fn whole_production_as_prefix() {
        let g = Grammar::parse("S -> id ( args ) | id = expr | id").unwrap();
        let r = g.left_factor();

        assert_eq!(listing(&r), vec!["S -> id S'", "S' -> ( args ) | = expr | ε"]);
    }

    #[test]
    fn duplicate_alternatives() {
        let g = Grammar::parse("S -> a | a").unwrap();
        let r = g.left_factor();

        assert_eq!(listing(&r), vec!["S -> a S'", "S' -> ε | ε"]);
    }

    #[test]
    fn idempotent() {
        let g = Grammar::parse(
            "E -> T + E | T - E | T\nT -> F * T | F\nF -> ( E ) | id | id ( E ) | ε | ε",
        )
        .unwrap();
        let once = g.left_factor();
        let twice = once.left_factor();

        assert_eq!(once, twice);
        for nt in once.non_terminal_iter() {
            for (i, a) in nt.productions.iter().enumerate() {
                for b in &nt.productions[i + 1..] {
                    assert!(a[0] != b[0] || a[0] == 0, "{} is not factored", nt.name);
                }
            }
        }
    }

    #[test]
    fn factored_grammar_is_unchanged() {
        let g = Grammar::parse("A -> ε | a | b A").unwrap();

        assert_eq!(g.left_factor(), g);
    }
}
