// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates to Layer 2 (application).
//
// Two commands are supported:
//   1. `extract`       - build training examples and the target index
//   2. `inspect-chart` - show the chart of one sentence
//
// The filtering summary goes to stderr so stdout stays free.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ExtractArgs, InspectArgs};

use crate::domain::span::Span;
use crate::extraction::resolver::SyntaxSpanResolver;

#[derive(Parser, Debug)]
#[command(
    name = "extract-syntax-features",
    version,
    about = "Extract phrase-sense disambiguation training examples with syntactic span features."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Extract(args)      => run_extract(args),
            Commands::InspectChart(args) => run_inspect(args),
        }
    }
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    use crate::application::extract_use_case::ExtractUseCase;

    let report = ExtractUseCase::new(args.into()).execute()?;
    eprintln!("{report}");
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectChartUseCase;

    let resolver = match args.max_widening_steps {
        Some(limit) => SyntaxSpanResolver::with_step_limit(limit),
        None        => SyntaxSpanResolver::new(),
    };
    let span = match (args.start, args.end) {
        (Some(start), Some(end)) => Some(Span::new(start, end)),
        _                        => None,
    };

    let inspection = InspectChartUseCase::new(resolver).inspect(&args.sentence, &args.parse, span)?;
    print!("{inspection}");
    Ok(())
}
