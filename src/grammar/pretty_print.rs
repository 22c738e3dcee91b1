use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    FirstSets, FollowSets, Grammar, LL1ParsingTable, ParseAction, ParseTrace, EPSILON,
};

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub numbers: Vec<usize>,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        let number_width = self
            .numbers
            .iter()
            .map(|n| n.to_string().len())
            .max()
            .unwrap_or(0);
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                let number = match (multiline, self.numbers.get(i)) {
                    (true, Some(n)) => format!("({:>width$}) ", n, width = number_width),
                    _ => String::new(),
                };
                if i == 0 {
                    format!(
                        "{}{:>width$} -> {}",
                        number,
                        self.left,
                        right,
                        width = left_width
                    )
                } else if multiline {
                    format!("{}{:>width$}  | {}", number, "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| escape::tex(*s))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        let output = left + &right;
        output.replace(EPSILON, "\\epsilon")
    }
}

#[derive(Debug, Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex(true)))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let mut productions = Vec::new();
        let mut number = 0;
        for non_terminal in self.non_terminal_iter() {
            let mut rights = Vec::new();
            let mut numbers = Vec::new();
            for production in &non_terminal.productions {
                number += 1;
                numbers.push(number);
                rights.push(self.production_to_vec_str(production));
            }
            productions.push(ProductionOutput {
                left: non_terminal.name.as_str(),
                numbers,
                rights,
            });
        }
        ProductionOutputVec { productions }
    }
}

#[derive(Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self, name_width: usize) -> String {
        format!(
            "{:>width$} | {:>5} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", "),
            width = name_width
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let width = self
            .data
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(0);
        self.data
            .iter()
            .map(|s| s.to_plaintext(width))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    pub fn to_non_terminal_output_vec(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> NonTerminalOutputVec {
        let mut data = Vec::new();
        for non_terminal in self.non_terminal_iter() {
            let mut t = NonTerminalOutput {
                name: non_terminal.name.as_str(),
                nullable: first.nullable(non_terminal.index),
                first: first
                    .of(non_terminal.index)
                    .iter()
                    .map(|idx| self.get_symbol_name(*idx))
                    .collect(),
                follow: follow
                    .of(non_terminal.index)
                    .iter()
                    .map(|idx| self.get_symbol_name(*idx))
                    .collect(),
            };
            t.first.sort();
            t.follow.sort();
            data.push(t);
        }
        NonTerminalOutputVec { data }
    }
}

#[derive(Serialize)]
pub struct LL1ParsingTableOutput<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<ProductionOutput<'a>>)>,
}

impl LL1ParsingTableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(
                row.iter()
                    .map(|productions| productions.to_plaintext(0, false)),
            );
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| {
                output
                    .iter()
                    .map(|line| line[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape::tex(t))),
        );
        let header = header.join(" & ");

        let output = self
            .rows
            .iter()
            .map(|(left, row)| {
                std::iter::once(escape::tex(*left).to_string())
                    .chain(row.iter().map(|production| production.to_latex(false)))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

impl<'a> LL1ParsingTable<'a> {
    pub fn to_output(&self) -> LL1ParsingTableOutput<'a> {
        let g = self.grammar();
        let terminals = self
            .columns()
            .iter()
            .map(|&t| g.get_symbol_name(t))
            .collect();

        let rows = g
            .non_terminal_iter()
            .map(|nt| {
                let left = nt.name.as_str();
                let row = self
                    .columns()
                    .iter()
                    .map(|&t| {
                        let cell = self.get(nt.index, t);
                        ProductionOutput {
                            left,
                            numbers: cell.iter().map(|&id| g.rule_number(id)).collect(),
                            rights: cell
                                .iter()
                                .map(|&id| g.production_to_vec_str(g.production(id)))
                                .collect(),
                        }
                    })
                    .collect();
                (left, row)
            })
            .collect();

        LL1ParsingTableOutput { terminals, rows }
    }
}

#[derive(Serialize)]
struct ParseStepOutput {
    stack: String,
    input: String,
    action: String,
}

#[derive(Serialize)]
pub struct ParseTraceOutput {
    steps: Vec<ParseStepOutput>,
    accepted: bool,
    error: Option<String>,
}

impl ParseTraceOutput {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<[&str; 3]> = vec![["Stack", "Input", "Action"]];
        output.extend(
            self.steps
                .iter()
                .map(|s| [s.stack.as_str(), s.input.as_str(), s.action.as_str()]),
        );

        let width: Vec<usize> = (0..3)
            .map(|j| {
                output
                    .iter()
                    .map(|line| line[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let table = output
            .iter()
            .map(|line| {
                format!(
                    "{:<w0$} | {:>w1$} | {}",
                    line[0],
                    line[1],
                    line[2],
                    w0 = width[0],
                    w1 = width[1]
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let verdict = match &self.error {
            None => "accepted".to_string(),
            Some(e) => format!("rejected: {}", e),
        };
        table + "\n" + &verdict
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .steps
            .iter()
            .map(|s| {
                format!(
                    "{} & {} & {}",
                    escape::tex(s.stack.as_str()),
                    escape::tex(s.input.as_str()),
                    escape::tex(s.action.as_str()).replace(EPSILON, "$\\epsilon$")
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        "\\begin{tabular}{l|r|l}\n".to_string()
            + "Stack & Input & Action\\\\\\hline\n"
            + &content
            + "\n\\end{tabular}"
    }
}

impl ParseAction {
    pub fn to_plaintext(&self) -> String {
        match self {
            ParseAction::Match(t) => format!("match {}", t),
            ParseAction::Expand { rule, left, right } => {
                format!("({}) {} -> {}", rule, left, right.join(" "))
            }
            ParseAction::Accept => "accept".to_string(),
            ParseAction::Error(e) => format!("error: {}", e),
        }
    }
}

impl ParseTrace {
    pub fn to_output(&self) -> ParseTraceOutput {
        ParseTraceOutput {
            steps: self
                .steps
                .iter()
                .map(|step| ParseStepOutput {
                    stack: step.stack.join(" "),
                    input: step.input.join(" "),
                    action: step.action.to_plaintext(),
                })
                .collect(),
            accepted: self.accepted(),
            error: self.verdict.as_ref().err().map(|e| e.to_string()),
        }
    }
}
