pub mod eliminate_left_recursion;
pub mod error;
pub mod first_follow;
pub mod fresh;
pub mod grammar;
pub mod language;
pub mod left_factor;
pub mod ll1_parser;
pub mod ll1_parsing_table;
pub mod parse;
pub mod pretty_print;

pub use error::{Conflict, GrammarError, ParseError};
pub use first_follow::{FirstSets, FollowSets};
pub use fresh::FreshSymbolAllocator;
pub use grammar::{Grammar, ProductionId};
pub use ll1_parser::{ParseAction, ParseStep, ParseTrace};
pub use ll1_parsing_table::LL1ParsingTable;

pub const EPSILON: &str = "ε";
pub const EPSILON_ALIASES: [&str; 2] = ["ϵ", "epsilon"];
pub const END_MARK: &str = "$";

pub(crate) const EPSILON_INDEX: usize = 0;
pub(crate) const END_MARK_INDEX: usize = 1;
