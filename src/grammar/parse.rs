use log::warn;

use super::{GrammarError, EPSILON};
use crate::Grammar;

impl Grammar {
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut entries: Vec<(String, Vec<Vec<String>>)> = Vec::new();

        let mut previous_left: Option<usize> = None;
        for (i, line) in grammar.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            let (left, rights): (usize, &str) = if parts.len() > 2 {
                warn!("line {}: too many \"->\", skipped", i + 1);
                previous_left = None;
                continue;
            } else if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    warn!("line {}: empty left side, skipped", i + 1);
                    previous_left = None;
                    continue;
                } else if left_str.split_whitespace().count() != 1 {
                    warn!("line {}: left side contains whitespace, skipped", i + 1);
                    previous_left = None;
                    continue;
                }
                let idx = match entries.iter().position(|(left, _)| left == left_str) {
                    Some(idx) => idx,
                    None => {
                        entries.push((left_str.to_string(), Vec::new()));
                        entries.len() - 1
                    }
                };
                (idx, parts[1])
            } else if let Some(rest) = line.strip_prefix('|') {
                if let Some(idx) = previous_left {
                    (idx, rest)
                } else {
                    warn!("line {}: cannot find left side, skipped", i + 1);
                    continue;
                }
            } else {
                warn!("line {}: missing \"->\", skipped", i + 1);
                continue;
            };

            previous_left = Some(left);

            for right in rights.split('|') {
                entries[left].1.push(tokenize_production(right));
            }
        }

        Grammar::from_entries(entries)
    }

    pub fn tokenize_input(&self, input: &str) -> Vec<String> {
        let mut terminals: Vec<&str> = self.terminal_iter().map(|t| t.as_str()).collect();
        terminals.sort_by_key(|t| std::cmp::Reverse(t.len()));

        let mut tokens = Vec::new();
        let mut rest = input;
        loop {
            rest = rest.trim_start();
            let c = match rest.chars().next() {
                Some(c) => c,
                None => break,
            };
            let len = terminals
                .iter()
                .find(|t| rest.starts_with(**t))
                .map_or(c.len_utf8(), |t| t.len());
            tokens.push(rest[..len].to_string());
            rest = &rest[len..];
        }
        tokens
    }
}

fn is_epsilon_char(c: char) -> bool {
    c == 'ε' || c == 'ϵ'
}

fn is_name_char(c: char) -> bool {
    (c.is_alphanumeric() || c == '_' || c == '\'') && !is_epsilon_char(c)
}

pub fn tokenize_production(right: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = right.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if is_epsilon_char(c) {
            tokens.push(EPSILON.to_string());
            chars.next();
        } else if is_name_char(c) {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if !is_name_char(c) {
                    break;
                }
                name.push(c);
                chars.next();
            }
            tokens.push(name);
        } else {
            tokens.push(c.to_string());
            chars.next();
        }
    }
    tokens
}
