use std::time::Duration;

use clap::Parser;
use folprover::engine::Budget;
use folprover::error::{CommandError, Kind};
use folprover::kb::{KnowledgeBase, ProveOutcome};
use folprover::parser::parse;
use folprover::ranker::{IdentityRanker, PremiseRanker};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

#[derive(Parser)]
#[command(about = "An interactive first-order logic theorem prover")]
struct Args {
    /// Maximum number of resolvents generated per `prove` call.
    #[arg(long)]
    max_resolvents: Option<usize>,

    /// Maximum number of clauses moved to the processed pool per `prove` call.
    #[arg(long)]
    max_clauses: Option<usize>,

    /// Maximum number of literals a single clause may carry.
    #[arg(long)]
    max_literals: Option<usize>,

    /// Maximum term nesting depth a clause's arguments may reach.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Wall-clock budget for a single `prove` call, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Start with premise-selection diagnostics enabled.
    #[arg(long)]
    verbose: bool,

    /// Path to an ONNX sentence-embedding model for the premise ranker.
    /// Requires the `embedding-ranker` feature; without it this flag is rejected.
    #[arg(long)]
    embedding_model: Option<String>,
}

fn budget_from_args(args: &Args) -> Budget {
    let default = Budget::default();
    Budget {
        max_resolvents: args.max_resolvents.unwrap_or(default.max_resolvents),
        max_processed: args.max_clauses.unwrap_or(default.max_processed),
        max_literals_per_clause: args.max_literals.unwrap_or(default.max_literals_per_clause),
        max_term_depth: args.max_depth.unwrap_or(default.max_term_depth),
        deadline: args.timeout_ms.map(Duration::from_millis).or(default.deadline),
    }
}

fn build_ranker(args: &Args) -> Box<dyn PremiseRanker> {
    if let Some(_path) = &args.embedding_model {
        #[cfg(feature = "embedding-ranker")]
        {
            match folprover::ranker::EmbeddingRanker::load(std::path::Path::new(_path)) {
                Ok(ranker) => return Box::new(ranker),
                Err(err) => {
                    eprintln!("could not load embedding model: {err}");
                    std::process::exit(1);
                }
            }
        }
        #[cfg(not(feature = "embedding-ranker"))]
        {
            eprintln!("--embedding-model requires the `embedding-ranker` feature");
            std::process::exit(1);
        }
    }
    Box::new(IdentityRanker)
}

fn main() {
    color_backtrace::install();
    env_logger::init();
    let args = Args::parse();

    let budget = budget_from_args(&args);
    let ranker = build_ranker(&args);
    let mut kb = KnowledgeBase::new();
    let mut verbose = args.verbose;

    let mut editor = DefaultEditor::new().expect("failed to initialize line editor");
    loop {
        match editor.readline(">>> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" {
                    break;
                }
                if let Err(err) = handle_command(line, &mut kb, &budget, ranker.as_ref(), &mut editor, &mut verbose)
                {
                    println!("error: {err}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {err}");
                break;
            }
        }
    }
    std::process::exit(0);
}

fn handle_command(
    line: &str,
    kb: &mut KnowledgeBase,
    budget: &Budget,
    ranker: &dyn PremiseRanker,
    editor: &mut DefaultEditor,
    verbose: &mut bool,
) -> Result<(), CommandError> {
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "axiom" => {
            let formula = parse(rest)?;
            let description = prompt_for_description(editor);
            let index = kb.add_axiom(formula, description);
            println!("Added axiom {}", index);
        }
        "theorem" => {
            let formula = parse(rest)?;
            let description = prompt_for_description(editor);
            log::debug!(target: "shell::theorem", "attempting proof of {}", rest);
            match kb.prove(formula, description, budget, ranker, *verbose) {
                ProveOutcome::Proof(trace) => {
                    for step in &trace {
                        println!("{}", step);
                    }
                }
                ProveOutcome::Saturated => println!("Proof failed: saturated"),
                ProveOutcome::BudgetExhausted => println!("Proof failed: budget exhausted"),
            }
        }
        "describe" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let kind: Kind = parts
                .next()
                .ok_or_else(|| CommandError::BadCommand("usage: describe <kind> <index> <description>".to_string()))?
                .parse()?;
            let index: usize = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| CommandError::BadCommand("expected a numeric index".to_string()))?;
            let description = parts.next().unwrap_or("").to_string();
            kb.describe(kind, index, description)?;
            println!("Updated {} {}", kind, index);
        }
        "show" => {
            let mut parts = rest.splitn(2, char::is_whitespace);
            let kind: Kind = parts
                .next()
                .ok_or_else(|| CommandError::BadCommand("usage: show <kind> [index]".to_string()))?
                .parse()?;
            match parts.next().filter(|s| !s.is_empty()) {
                Some(index_str) => {
                    let index: usize = index_str
                        .parse()
                        .map_err(|_| CommandError::BadCommand("expected a numeric index".to_string()))?;
                    let entry = kb.get(kind, index)?;
                    print_entry(entry);
                }
                None => {
                    for entry in kb.list(kind) {
                        print_entry(entry);
                    }
                }
            }
        }
        "verbose" => {
            *verbose = !*verbose;
            println!("verbose = {}", verbose);
        }
        other => {
            return Err(CommandError::BadCommand(format!("unknown command '{}'", other)));
        }
    }
    Ok(())
}

fn print_entry(entry: &folprover::kb::KbEntry) {
    match &entry.description {
        Some(description) if !description.is_empty() => {
            println!("{}. {} — {}", entry.index, entry.original_formula, description);
        }
        _ => println!("{}. {}", entry.index, entry.original_formula),
    }
}

fn prompt_for_description(editor: &mut DefaultEditor) -> Option<String> {
    match editor.readline("Enter description (Optional): ") {
        Ok(line) => {
            let _ = editor.add_history_entry(line.as_str());
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}
