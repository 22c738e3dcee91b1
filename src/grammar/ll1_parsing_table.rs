use std::collections::HashMap;

use log::debug;

use super::{
    Conflict, FirstSets, FollowSets, Grammar, GrammarError, ProductionId, END_MARK_INDEX,
    EPSILON_INDEX,
};

#[derive(Debug, Clone)]
pub struct LL1ParsingTable<'a> {
    grammar: &'a Grammar,
    start: usize,
    columns: Vec<usize>,
    cells: HashMap<(usize, usize), ProductionId>,
}

impl<'a> LL1ParsingTable<'a> {
    pub fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn get(&self, non_terminal: usize, terminal: usize) -> Option<ProductionId> {
        self.cells.get(&(non_terminal, terminal)).cloned()
    }

    pub fn lookup(&self, non_terminal: &str, terminal: &str) -> Option<ProductionId> {
        let nt = self.grammar.get_symbol_index(non_terminal)?;
        let t = self.grammar.get_symbol_index(terminal)?;
        self.get(nt, t)
    }
}

impl Grammar {
    pub fn generate_ll1_parsing_table(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> Result<LL1ParsingTable, GrammarError> {
        let start = self.start_symbol.ok_or(GrammarError::NoStartSymbol)?;

        let mut columns = self.terminal_indices();
        columns.push(END_MARK_INDEX);

        let mut candidates: HashMap<(usize, usize), Vec<ProductionId>> = HashMap::new();
        for id in self.production_ids() {
            let f = first.of_sequence(self.production(id));
            let mut lookaheads: Vec<usize> = f
                .iter()
                .filter(|&&s| s != EPSILON_INDEX)
                .cloned()
                .collect();
            if f.contains(&EPSILON_INDEX) {
                lookaheads.extend(follow.of(id.left).iter().cloned());
            }

            for t in lookaheads {
                let cell = candidates.entry((id.left, t)).or_default();
                if !cell.contains(&id) {
                    cell.push(id);
                }
            }
        }

        let row_of = |nt: usize| self.non_terminals.iter().position(|&i| i == nt);
        let column_of = |t: usize| columns.iter().position(|&i| i == t);
        let mut conflicting: Vec<(&(usize, usize), &Vec<ProductionId>)> = candidates
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .collect();
        conflicting.sort_by_key(|((nt, t), _)| (row_of(*nt), column_of(*t)));

        if !conflicting.is_empty() {
            let conflicts = conflicting
                .into_iter()
                .map(|(&(nt, t), ids)| Conflict {
                    non_terminal: self.get_symbol_name(nt).to_string(),
                    terminal: self.get_symbol_name(t).to_string(),
                    candidates: ids
                        .iter()
                        .map(|&id| {
                            self.production_to_vec_str(self.production(id))
                                .into_iter()
                                .map(|s| s.to_string())
                                .collect()
                        })
                        .collect(),
                })
                .collect::<Vec<_>>();
            debug!("{} conflicting LL(1) cells", conflicts.len());
            return Err(GrammarError::LL1Conflict(conflicts));
        }

        let cells = candidates
            .into_iter()
            .map(|(cell, ids)| (cell, ids[0]))
            .collect();

        Ok(LL1ParsingTable {
            grammar: self,
            start,
            columns,
            cells,
        })
    }
}
