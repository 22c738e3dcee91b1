use std::collections::{HashMap, VecDeque};

use log::debug;

use super::{grammar::concat, FreshSymbolAllocator, Grammar, GrammarError, EPSILON_INDEX};

impl Grammar {
    pub fn eliminate_left_recursion(&self) -> Result<Grammar, GrammarError> {
        let mut allocator = FreshSymbolAllocator::for_grammar(self);
        self.eliminate_left_recursion_with(&mut allocator)
    }

    pub fn eliminate_left_recursion_with(
        &self,
        allocator: &mut FreshSymbolAllocator,
    ) -> Result<Grammar, GrammarError> {
        allocator.reserve_grammar(self);
        self.check_left_recursion_reducible()?;

        let mut g = self.clone();
        let order = self.non_terminals.clone();
        let longest = self
            .non_terminal_iter()
            .flat_map(|nt| nt.productions.iter().map(|p| p.len()))
            .max()
            .unwrap_or(0);
        let pass_limit = order.len() * (longest + 1) + 1;

        for (i, &left) in order.iter().enumerate() {
            let mut productions = g.symbols[left].non_terminal().unwrap().productions.clone();

            // an epsilon production of some Aj can expose an earlier Ak
            let mut passes = 0;
            loop {
                let mut substituted = false;
                for &earlier in &order[..i] {
                    if !productions.iter().any(|p| p.first() == Some(&earlier)) {
                        continue;
                    }
                    let replacements = &g.symbols[earlier].non_terminal().unwrap().productions;
                    productions = productions
                        .into_iter()
                        .flat_map(|production| {
                            if production.first() == Some(&earlier) {
                                replacements
                                    .iter()
                                    .map(|prefix| concat(prefix, &production[1..]))
                                    .collect::<Vec<_>>()
                            } else {
                                vec![production]
                            }
                        })
                        .collect();
                    substituted = true;
                }
                if !substituted {
                    break;
                }
                passes += 1;
                if passes > pass_limit {
                    return Err(GrammarError::IrreducibleLeftRecursion {
                        non_terminal: g.get_symbol_name(left).to_string(),
                        cycle: vec![g.get_symbol_name(left).to_string()],
                    });
                }
            }

            let (recursive, others): (Vec<Vec<usize>>, Vec<Vec<usize>>) = productions
                .into_iter()
                .partition(|production| production.first() == Some(&left));

            if recursive.is_empty() {
                g.set_productions(left, others);
                continue;
            }
            if others.is_empty() {
                let name = g.get_symbol_name(left).to_string();
                return Err(GrammarError::IrreducibleLeftRecursion {
                    non_terminal: name.clone(),
                    cycle: vec![name.clone(), name],
                });
            }

            let prime_name = allocator.fresh(g.get_symbol_name(left));
            let prime = g.add_non_terminal_after(left, &prime_name);
            debug!(
                "{} is left recursive, introducing {}",
                g.get_symbol_name(left),
                prime_name
            );

            let betas = others
                .iter()
                .map(|beta| concat(beta, &[prime]))
                .collect();
            let alphas = recursive
                .iter()
                .map(|production| concat(&production[1..], &[prime]))
                .chain(std::iter::once(vec![EPSILON_INDEX]))
                .collect();
            g.set_productions(left, betas);
            g.set_productions(prime, alphas);
        }

        g.check_no_left_corner_cycle()?;
        Ok(g)
    }

    // (A, B, unit): B follows a nullable prefix in a body of A; unit when the rest is nullable
    fn left_corner_edges(&self) -> Vec<(usize, usize, bool)> {
        let first = self.calculate_first();

        let mut edges = Vec::new();
        for nt in self.non_terminal_iter() {
            for production in &nt.productions {
                for (k, &symbol) in production.iter().enumerate() {
                    if self.is_non_terminal(symbol) {
                        let unit = first
                            .of_sequence(&production[k + 1..])
                            .contains(&EPSILON_INDEX);
                        edges.push((nt.index, symbol, unit));
                    }
                    if !first.nullable(symbol) {
                        break;
                    }
                }
            }
        }
        edges
    }

    fn check_left_recursion_reducible(&self) -> Result<(), GrammarError> {
        let units: Vec<(usize, usize)> = self
            .left_corner_edges()
            .into_iter()
            .filter(|&(_, _, unit)| unit)
            .map(|(from, to, _)| (from, to))
            .collect();
        match find_cycle(&units) {
            Some((from, path)) => Err(self.cycle_error(from, path)),
            None => Ok(()),
        }
    }

    fn check_no_left_corner_cycle(&self) -> Result<(), GrammarError> {
        let edges: Vec<(usize, usize)> = self
            .left_corner_edges()
            .into_iter()
            .map(|(from, to, _)| (from, to))
            .collect();
        match find_cycle(&edges) {
            Some((from, path)) => Err(self.cycle_error(from, path)),
            None => Ok(()),
        }
    }

    fn cycle_error(&self, from: usize, path: Vec<usize>) -> GrammarError {
        GrammarError::IrreducibleLeftRecursion {
            non_terminal: self.get_symbol_name(from).to_string(),
            cycle: std::iter::once(from)
                .chain(path)
                .map(|idx| self.get_symbol_name(idx).to_string())
                .collect(),
        }
    }
}

fn find_cycle(edges: &[(usize, usize)]) -> Option<(usize, Vec<usize>)> {
    let mut graph: HashMap<usize, Vec<usize>> = HashMap::new();
    for &(from, to) in edges {
        graph.entry(from).or_default().push(to);
    }

    edges
        .iter()
        .find_map(|&(from, to)| find_path(&graph, to, from).map(|path| (from, path)))
}

/// Shortest path `from ... to` in `graph`, both ends included.
fn find_path(graph: &HashMap<usize, Vec<usize>>, from: usize, to: usize) -> Option<Vec<usize>> {
    let mut parent: HashMap<usize, usize> = HashMap::new();
    let mut q: VecDeque<usize> = VecDeque::new();
    q.push_back(from);
    parent.insert(from, from);

    while let Some(node) = q.pop_front() {
        if node == to {
            let mut path = vec![node];
            let mut current = node;
            while current != from {
                current = parent[&current];
                path.push(current);
            }
            path.reverse();
            return Some(path);
        }
        for &next in graph.get(&node).into_iter().flatten() {
            if !parent.contains_key(&next) {
                parent.insert(next, node);
                q.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::grammar::{FreshSymbolAllocator, GrammarError};
    use crate::Grammar;

    fn productions(g: &Grammar) -> Vec<(String, Vec<String>)> {
        g.named_productions()
            .into_iter()
            .map(|(left, rights)| {
                (
                    left,
                    rights.into_iter().map(|right| right.join(" ")).collect(),
                )
            })
            .collect()
    }

    fn expected(rules: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
        rules
            .iter()
            .map(|(left, rights)| {
                (
                    left.to_string(),
                    rights.iter().map(|right| right.to_string()).collect(),
                )
            })
            .collect()
    }

    fn assert_no_left_recursion(original: &Grammar, g: &Grammar) {
        let order: Vec<usize> = original
            .non_terminal_names()
            .into_iter()
            .map(|name| g.get_symbol_index(name).unwrap())
            .collect();
        for nt in g.non_terminal_iter() {
            assert!(!nt.productions.is_empty());
            for production in &nt.productions {
                assert_ne!(production[0], nt.index, "{} is left recursive", nt.name);
            }
        }
        for (i, &left) in order.iter().enumerate() {
            for production in &g.non_terminal(left).unwrap().productions {
                assert!(!order[..i].contains(&production[0]));
            }
        }
    }

    #[test]
    fn direct_left_recursion() {
        let g = Grammar::parse("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | id").unwrap();
        let r = g.eliminate_left_recursion().unwrap();

        assert_eq!(
            productions(&r),
            expected(&[
                ("E", &["T E'"]),
                ("E'", &["+ T E'", "ε"]),
                ("T", &["F T'"]),
                ("T'", &["* F T'", "ε"]),
                ("F", &["( E )", "id"]),
            ])
        );
        assert_no_left_recursion(&g, &r);
    }

    #[test]
    fn indirect_left_recursion() {
        let g = Grammar::parse("S -> A a | b\nA -> A c | S d | ε").unwrap();
        let r = g.eliminate_left_recursion().unwrap();

        assert_eq!(
            productions(&r),
            expected(&[
                ("S", &["A a", "b"]),
                ("A", &["b d A'", "A'"]),
                ("A'", &["c A'", "a d A'", "ε"]),
            ])
        );
        assert_no_left_recursion(&g, &r);
    }

    #[test]
    fn mutual_left_recursion_through_substitution() {
        let g = Grammar::parse("A -> B x | y\nB -> A z | w").unwrap();
        let r = g.eliminate_left_recursion().unwrap();

        assert_eq!(
            productions(&r),
            expected(&[
                ("A", &["B x", "y"]),
                ("B", &["y z B'", "w B'"]),
                ("B'", &["x z B'", "ε"]),
            ])
        );
        assert_no_left_recursion(&g, &r);
    }

    #[test]
    fn epsilon_exposes_earlier_nonterminal() {
        let g = Grammar::parse("S -> a | b\nA -> c | ε\nB -> A S d | B e").unwrap();
        let r = g.eliminate_left_recursion().unwrap();

        assert_no_left_recursion(&g, &r);
        assert_eq!(
            productions(&r)[2],
            (
                "B".to_string(),
                vec![
                    "c S d B'".to_string(),
                    "a d B'".to_string(),
                    "b d B'".to_string()
                ]
            )
        );
    }

    #[test]
    fn fresh_names_never_collide() {
        let g = Grammar::parse("E -> E + T | T\nT -> id | E'\nE' -> x").unwrap();
        let r = g.eliminate_left_recursion().unwrap();

        assert_eq!(r.non_terminal_names(), vec!["E", "E''", "T", "E'"]);
    }

    #[test]
    fn allocator_is_shared_across_runs() {
        let g = Grammar::parse("E -> E + n | n").unwrap();
        let mut allocator = FreshSymbolAllocator::new();
        let first = g.eliminate_left_recursion_with(&mut allocator).unwrap();
        let second = g.eliminate_left_recursion_with(&mut allocator).unwrap();

        assert_eq!(first.non_terminal_names(), vec!["E", "E'"]);
        assert_eq!(second.non_terminal_names(), vec!["E", "E''"]);
    }

    #[test]
    fn grammar_without_left_recursion_is_unchanged() {
        let g = Grammar::parse("S -> a S | b").unwrap();

        assert_eq!(g.eliminate_left_recursion().unwrap(), g);
    }

    #[test]
    fn unit_production_into_indirect_recursion() {
        let g = Grammar::parse("A -> B | a\nB -> A c | b").unwrap();
        let r = g.eliminate_left_recursion().unwrap();

        assert_eq!(
            productions(&r),
            expected(&[
                ("A", &["B", "a"]),
                ("B", &["a c B'", "b B'"]),
                ("B'", &["c B'", "ε"]),
            ])
        );
        assert_no_left_recursion(&g, &r);
    }

    #[test]
    fn unit_start_symbol() {
        let g = Grammar::parse("E -> T\nT -> E + n | n").unwrap();
        let r = g.eliminate_left_recursion().unwrap();

        assert_eq!(
            productions(&r),
            expected(&[("E", &["T"]), ("T", &["n T'"]), ("T'", &["+ n T'", "ε"])])
        );
        assert_no_left_recursion(&g, &r);
    }

    #[test]
    fn nullable_prefix_resolved_by_substitution() {
        let g = Grammar::parse("S -> A B c | d\nA -> a | ε\nB -> S e | b").unwrap();
        let r = g.eliminate_left_recursion().unwrap();

        assert_eq!(
            productions(&r),
            expected(&[
                ("S", &["A B c", "d"]),
                ("A", &["a", "ε"]),
                ("B", &["a B c e B'", "d e B'", "b B'"]),
                ("B'", &["c e B'", "ε"]),
            ])
        );
        assert_no_left_recursion(&g, &r);
    }

    #[test]
    fn cycle_is_irreducible() {
        let g = Grammar::parse("A -> B | a\nB -> A | b").unwrap();

        match g.eliminate_left_recursion() {
            Err(GrammarError::IrreducibleLeftRecursion { cycle, .. }) => {
                assert_eq!(cycle.first(), cycle.last());
                assert!(cycle.len() >= 3);
            }
            r => panic!("expected irreducible left recursion, got {:?}", r),
        }
    }

    #[test]
    fn hidden_left_recursion_is_irreducible() {
        let g = Grammar::parse("S -> A S c | d\nA -> a | ε").unwrap();

        assert_eq!(
            g.eliminate_left_recursion(),
            Err(GrammarError::IrreducibleLeftRecursion {
                non_terminal: "S".to_string(),
                cycle: vec!["S".to_string(), "S".to_string()],
            })
        );
    }

    #[test]
    fn left_recursion_without_base_case_is_irreducible() {
        let g = Grammar::parse("A -> A a").unwrap();

        assert!(matches!(
            g.eliminate_left_recursion(),
            Err(GrammarError::IrreducibleLeftRecursion { .. })
        ));
    }
}
