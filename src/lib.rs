extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{
    FirstSets, FollowSets, FreshSymbolAllocator, Grammar, GrammarError, LL1ParsingTable,
    ParseError, ParseTrace,
};

fn error_json(e: &GrammarError) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => {
            let first = g.calculate_first();
            let follow = g.calculate_follow(&first);
            g.to_non_terminal_output_vec(&first, &follow).to_json()
        }
        Err(e) => error_json(&e),
    }
}

#[wasm_bindgen]
pub fn ll1_parse_to_json(grammar: &str, input: &str) -> String {
    let trace = crate::Grammar::parse(grammar).and_then(|g| {
        let tokens = g.tokenize_input(input);
        g.ll1_parse(&tokens).map(|trace| trace.to_output())
    });
    match trace {
        Ok(t) => serde_json::to_string(&t).unwrap_or_default(),
        Err(e) => error_json(&e),
    }
}
