use super::{
    grammar::Symbol, Grammar, GrammarError, LL1ParsingTable, ParseError, END_MARK, END_MARK_INDEX,
    EPSILON_INDEX,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAction {
    Match(String),
    Expand {
        rule: usize,
        left: String,
        right: Vec<String>,
    },
    Accept,
    Error(ParseError),
}

/// Parser state before `action` is taken. `stack` is listed bottom first, `input` ends with `$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStep {
    pub stack: Vec<String>,
    pub input: Vec<String>,
    pub action: ParseAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTrace {
    pub steps: Vec<ParseStep>,
    pub verdict: Result<(), ParseError>,
}

impl ParseTrace {
    pub fn accepted(&self) -> bool {
        self.verdict.is_ok()
    }
}

impl LL1ParsingTable<'_> {
    pub fn parse<S: AsRef<str>>(&self, input: &[S]) -> ParseTrace {
        let g = self.grammar();
        let tokens: Vec<&str> = input.iter().map(|s| s.as_ref()).collect();

        let mut stack: Vec<usize> = vec![END_MARK_INDEX, self.start()];
        let mut position = 0;
        let mut steps = Vec::new();

        loop {
            let lookahead = tokens.get(position).cloned().unwrap_or(END_MARK);
            let stack_names = stack
                .iter()
                .map(|&s| g.get_symbol_name(s).to_string())
                .collect();
            let remaining = tokens[position..]
                .iter()
                .map(|s| s.to_string())
                .chain(std::iter::once(END_MARK.to_string()))
                .collect();
            let step = |action: ParseAction| {
                steps.push(ParseStep {
                    stack: stack_names,
                    input: remaining,
                    action,
                })
            };

            let top = match stack.pop() {
                Some(top) => top,
                None => unreachable!("the end marker is never popped without returning"),
            };

            let error = match &g.symbols[top] {
                Symbol::EndMark => {
                    if position == tokens.len() {
                        step(ParseAction::Accept);
                        return ParseTrace {
                            steps,
                            verdict: Ok(()),
                        };
                    }
                    ParseError::UnexpectedTrailingInput {
                        found: lookahead.to_string(),
                        position,
                    }
                }
                Symbol::Terminal(name) => {
                    if position < tokens.len() && name == lookahead {
                        step(ParseAction::Match(name.clone()));
                        position += 1;
                        continue;
                    }
                    ParseError::SymbolMismatch {
                        expected: name.clone(),
                        found: lookahead.to_string(),
                        position,
                    }
                }
                Symbol::NonTerminal(nt) => {
                    let column = if position == tokens.len() {
                        Some(END_MARK_INDEX)
                    } else {
                        g.get_symbol_index(lookahead).filter(|&t| g.is_terminal(t))
                    };
                    match column.and_then(|t| self.get(top, t)) {
                        Some(id) => {
                            let production = g.production(id);
                            step(ParseAction::Expand {
                                rule: g.rule_number(id),
                                left: nt.name.clone(),
                                right: g
                                    .production_to_vec_str(production)
                                    .into_iter()
                                    .map(|s| s.to_string())
                                    .collect(),
                            });
                            stack.extend(
                                production
                                    .iter()
                                    .rev()
                                    .filter(|&&s| s != EPSILON_INDEX)
                                    .cloned(),
                            );
                            continue;
                        }
                        None => ParseError::NoApplicableProduction {
                            non_terminal: nt.name.clone(),
                            lookahead: lookahead.to_string(),
                            position,
                        },
                    }
                }
                Symbol::Epsilon => unreachable!("epsilon is never pushed"),
            };

            step(ParseAction::Error(error.clone()));
            return ParseTrace {
                steps,
                verdict: Err(error),
            };
        }
    }
}

impl Grammar {
    pub fn ll1_parse<S: AsRef<str>>(&self, input: &[S]) -> Result<ParseTrace, GrammarError> {
        let first = self.calculate_first();
        let follow = self.calculate_follow(&first);
        let table = self.generate_ll1_parsing_table(&first, &follow)?;
        Ok(table.parse(input))
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{ParseAction, ParseError};
    use crate::Grammar;

    fn actions(g: &Grammar, input: &[&str]) -> (Vec<String>, bool) {
        let trace = g.ll1_parse(input).unwrap();
        let actions = trace
            .steps
            .iter()
            .map(|step| match &step.action {
                ParseAction::Match(t) => format!("match {}", t),
                ParseAction::Expand { left, right, .. } => {
                    format!("{} -> {}", left, right.join(" "))
                }
                ParseAction::Accept => "accept".to_string(),
                ParseAction::Error(e) => format!("error {}", e),
            })
            .collect();
        (actions, trace.accepted())
    }

    #[test]
    fn accepts_with_trace() {
        let g = Grammar::parse("S -> A B\nA -> a A | ε\nB -> b").unwrap();
        let trace = g.ll1_parse(&["a", "b"]).unwrap();

        assert!(trace.accepted());
        let (actions, _) = actions(&g, &["a", "b"]);
        assert_eq!(
            actions,
            vec![
                "S -> A B",
                "A -> a A",
                "match a",
                "A -> ε",
                "B -> b",
                "match b",
                "accept"
            ]
        );
        assert_eq!(trace.steps[0].stack, vec!["$", "S"]);
        assert_eq!(trace.steps[0].input, vec!["a", "b", "$"]);
        assert_eq!(trace.steps[1].stack, vec!["$", "B", "A"]);
        assert_eq!(trace.steps.last().unwrap().stack, vec!["$"]);
        assert_eq!(trace.steps.last().unwrap().input, vec!["$"]);
    }

    #[test]
    fn rule_numbers_in_expansions() {
        let g = Grammar::parse("S -> A B\nA -> a A | ε\nB -> b").unwrap();
        let trace = g.ll1_parse(&["b"]).unwrap();

        let rules: Vec<usize> = trace
            .steps
            .iter()
            .filter_map(|step| match step.action {
                ParseAction::Expand { rule, .. } => Some(rule),
                _ => None,
            })
            .collect();
        assert_eq!(rules, vec![1, 3, 4]);
    }

    #[test]
    fn symbol_mismatch() {
        let g = Grammar::parse("S -> a b").unwrap();
        let trace = g.ll1_parse(&["a", "c"]).unwrap();

        assert_eq!(
            trace.verdict,
            Err(ParseError::SymbolMismatch {
                expected: "b".to_string(),
                found: "c".to_string(),
                position: 1,
            })
        );
    }

    #[test]
    fn missing_input_is_a_mismatch_against_end_marker() {
        let g = Grammar::parse("S -> a b").unwrap();
        let trace = g.ll1_parse(&["a"]).unwrap();

        assert_eq!(
            trace.verdict,
            Err(ParseError::SymbolMismatch {
                expected: "b".to_string(),
                found: "$".to_string(),
                position: 1,
            })
        );
    }

    #[test]
    fn no_applicable_production() {
        let g = Grammar::parse("S -> A B\nA -> a A | ε\nB -> b").unwrap();
        let trace = g.ll1_parse(&["c"]).unwrap();

        assert_eq!(
            trace.verdict,
            Err(ParseError::NoApplicableProduction {
                non_terminal: "S".to_string(),
                lookahead: "c".to_string(),
                position: 0,
            })
        );
        assert!(matches!(
            trace.steps.last().unwrap().action,
            ParseAction::Error(_)
        ));
    }

    #[test]
    fn unexpected_trailing_input() {
        let g = Grammar::parse("S -> a").unwrap();
        let trace = g.ll1_parse(&["a", "a"]).unwrap();

        assert_eq!(
            trace.verdict,
            Err(ParseError::UnexpectedTrailingInput {
                found: "a".to_string(),
                position: 1,
            })
        );
    }

    #[test]
    fn empty_input() {
        let g = Grammar::parse("S -> A B\nA -> a A | ε\nB -> b | ε").unwrap();

        assert!(g.ll1_parse::<&str>(&[]).unwrap().accepted());
    }

    #[test]
    fn expression_grammar() {
        let g = Grammar::parse("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | id")
            .unwrap()
            .eliminate_left_recursion()
            .unwrap();

        for (input, accepted) in [
            ("id+id*id", true),
            ("(id+id)*id", true),
            ("id", true),
            ("id+", false),
            ("(id", false),
            ("id id", false),
        ] {
            let tokens = g.tokenize_input(input);
            assert_eq!(
                g.ll1_parse(&tokens).unwrap().accepted(),
                accepted,
                "{}",
                input
            );
        }
    }

    #[test]
    fn conflicts_prevent_parsing() {
        let g = Grammar::parse("S -> a | a").unwrap();

        assert!(g.ll1_parse(&["a"]).is_err());
    }
}
