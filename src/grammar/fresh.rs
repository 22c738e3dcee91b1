use std::collections::HashSet;

use super::Grammar;

#[derive(Debug, Clone, Default)]
pub struct FreshSymbolAllocator {
    taken: HashSet<String>,
}

impl FreshSymbolAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_grammar(grammar: &Grammar) -> Self {
        let mut allocator = Self::new();
        allocator.reserve_grammar(grammar);
        allocator
    }

    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    pub fn reserve_grammar(&mut self, grammar: &Grammar) {
        for name in grammar.symbol_names() {
            self.reserve(name);
        }
    }

    pub fn fresh(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        while self.taken.contains(&name) {
            name.push('\'');
        }
        self.taken.insert(name.clone());
        name
    }
}
