use std::io::Read;

use anyhow::{anyhow, Context, Result};
use clap::{builder::PossibleValuesParser, Arg, ArgAction, Command};
use log::info;

use ll1_helper::{FreshSymbolAllocator, Grammar};

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

macro_rules! emit {
    ($format:expr, $t:expr) => {
        println!(
            "{}",
            match $format {
                OutputFormat::Plain => $t.to_plaintext(),
                OutputFormat::LaTeX => $t.to_latex(),
                OutputFormat::JSON => serde_json::to_string(&$t)?,
            }
        )
    };
}

fn main() -> Result<()> {
    let matches = Command::new("ll1-helper")
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about("Transforms a context-free grammar towards LL(1) and runs the predictive parser.")
        .arg(
            Arg::new("elf")
                .long("elf")
                .help("Eliminate left recursion")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("lf")
                .long("lf")
                .help("Left factor, after left-recursion elimination when both are given")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("outputs")
                .required(true)
                .num_args(1..)
                .value_parser(PossibleValuesParser::new([
                    "prod",
                    "ff",
                    "ll1",
                    "parse",
                    "sentences",
                ]))
                .help("What to print: productions, FIRST/FOLLOW, LL(1) table, parse trace, sentences"),
        )
        .arg(
            Arg::new("grammar")
                .short('g')
                .long("grammar")
                .value_name("FILE")
                .help("Grammar file, read from stdin when absent"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("TEXT")
                .help("Input for the parse output"),
        )
        .arg(
            Arg::new("max-len")
                .short('n')
                .long("max-len")
                .value_parser(clap::value_parser!(usize))
                .default_value("4")
                .help("Longest sentence printed by the sentences output"),
        )
        .arg(
            Arg::new("latex")
                .short('l')
                .help("Print in LaTeX format")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .help("Print in JSON format")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let source = match matches.get_one::<String>("grammar") {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read grammar file {}", path))?,
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read grammar from stdin")?;
            source
        }
    };

    let mut g = Grammar::parse(&source)?;
    info!(
        "Grammar has {} productions, {} nonterminals, {} terminals",
        g.production_ids().count(),
        g.non_terminal_iter().count(),
        g.terminal_iter().count(),
    );

    let mut allocator = FreshSymbolAllocator::for_grammar(&g);
    if matches.get_flag("elf") {
        g = g.eliminate_left_recursion_with(&mut allocator)?;
        info!("{} nonterminals after left-recursion elimination", g.non_terminal_iter().count());
    }
    if matches.get_flag("lf") {
        g = g.left_factor_with(&mut allocator);
        info!("{} nonterminals after left factoring", g.non_terminal_iter().count());
    }

    let format = if matches.get_flag("latex") {
        OutputFormat::LaTeX
    } else if matches.get_flag("json") {
        OutputFormat::JSON
    } else {
        OutputFormat::Plain
    };

    let first = g.calculate_first();
    let follow = g.calculate_follow(&first);

    for output in matches.get_many::<String>("outputs").into_iter().flatten() {
        match output.as_str() {
            "prod" => {
                let t = g.to_production_output_vec();
                emit!(format, t);
            }
            "ff" => {
                let t = g.to_non_terminal_output_vec(&first, &follow);
                emit!(format, t);
            }
            "ll1" => {
                let t = g.generate_ll1_parsing_table(&first, &follow)?.to_output();
                emit!(format, t);
            }
            "parse" => {
                let input = matches
                    .get_one::<String>("input")
                    .ok_or_else(|| anyhow!("the parse output needs --input"))?;
                let table = g.generate_ll1_parsing_table(&first, &follow)?;
                let tokens = g.tokenize_input(input);
                info!("Input tokens: {}", tokens.join(" "));
                let t = table.parse(&tokens).to_output();
                emit!(format, t);
            }
            "sentences" => {
                let max_len = *matches.get_one::<usize>("max-len").unwrap_or(&4);
                for sentence in g.sentences(max_len) {
                    if sentence.is_empty() {
                        println!("{}", ll1_helper::grammar::EPSILON);
                    } else {
                        println!("{}", sentence.join(" "));
                    }
                }
            }
            _ => unreachable!(),
        }
    }

    Ok(())
}
