use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cfg_gen::{Grammar, Sampler};

/// Bounded random string generation from context-free grammars
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the grammar file
    #[arg(help = "Path to the grammar file")]
    grammar_file: Option<PathBuf>,

    /// The starting nonterminal symbol
    #[arg(help = "Starting nonterminal symbol", default_value = "S")]
    start_symbol: String,

    /// Number of strings to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Depth budget (defaults to the grammar's minimum required depth)
    #[arg(short, long)]
    depth: Option<usize>,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the depth analysis of a grammar as JSON
    Analyze {
        /// Path to the grammar file
        grammar_file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Commands::Analyze { grammar_file }) = cli.command {
        let mut grammar = Grammar::from_file(&grammar_file)?;
        let analysis = grammar.analyze();
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let grammar_file = cli.grammar_file.ok_or("Grammar file path required")?;
    let grammar = Grammar::from_file(&grammar_file)?;

    let mut sampler = match cli.seed {
        Some(seed) => Sampler::with_seed(grammar, &cli.start_symbol, cli.depth, seed)?,
        None => Sampler::new(grammar, &cli.start_symbol, cli.depth)?,
    };

    for warning in sampler.warnings() {
        eprintln!("warning: {:?}", warning);
    }

    for i in 0..cli.count {
        let generated = sampler.draw()?;
        println!("{}. {}", i + 1, generated);
    }

    Ok(())
}
