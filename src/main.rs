use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hbp_curation::analysis::WarningDisplay;
use hbp_curation::analysis::warnings::WARNINGS_EXIT_CODE;
use hbp_curation::io::rdf::{self, RdfFormat};
use hbp_curation::model::GraphMetadata;
use hbp_curation::pipeline::{self, Outcome, ResultsOptions};
use hbp_curation::repository::SheetsRepository;
use hbp_curation::{CurationError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let outcome = init_logging(cli.verbose).and_then(|()| run(cli));
    match outcome {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::WarningsShown) => std::process::exit(WARNINGS_EXIT_CODE),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| CurationError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<Outcome> {
    let repository = SheetsRepository::new(&cli.rounds, &cli.output, GraphMetadata::default())?;
    let display = WarningDisplay::detect();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Convert => pipeline::convert(&repository, &display, &mut stdout),
        Command::Summary => pipeline::summarize(&repository, &mut stdout),
        Command::Results(args) => {
            let export_rdf = match args.export_rdf {
                Some(path) => {
                    let format = resolve_rdf_format(&path)?;
                    Some((path, format))
                }
                None => None,
            };
            let options = ResultsOptions {
                show_warnings: args.show_warnings,
                warning_display: display,
                reload: args.reload,
                export_rdf,
            };
            pipeline::results(&repository, &args.prior, &options, &mut stdout)
        }
    }
}

fn resolve_rdf_format(path: &Path) -> Result<RdfFormat> {
    rdf::detect_format(path).ok_or_else(|| {
        CurationError::Rdf(format!(
            "unable to infer RDF format from extension for file {}",
            path.display()
        ))
    })
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Turn curation sheets into BEL graphs and report on them."
)]
struct Cli {
    /// Directory holding the curation round files.
    #[arg(long, global = true, default_value = "rounds")]
    rounds: PathBuf,

    /// Directory receiving the graph cache and reports.
    #[arg(long, global = true, default_value = "data")]
    output: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the sheets to BEL; stop and show warnings if there are any.
    Convert,
    /// Write the curation summary and summarise the sheets graph.
    Summary,
    /// Report reader usage and per-subgraph statistics against prior knowledge.
    Results(ResultsArgs),
}

#[derive(clap::Args)]
struct ResultsArgs {
    /// Prior knowledge graph: a directory of curation sheets or a JSON graph.
    #[arg(long)]
    prior: PathBuf,

    /// Page through the warnings and exit with a non-zero status.
    #[arg(short = 'w', long)]
    show_warnings: bool,

    /// Ignore the graph cache and reparse every sheet.
    #[arg(short = 'r', long)]
    reload: bool,

    /// Export the combined graph as RDF (.ttl, .nt, .nq, .trig, .jsonld).
    #[arg(long)]
    export_rdf: Option<PathBuf>,
}
