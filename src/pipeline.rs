//! End-to-end runs behind the command line entry points.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::analysis::{
    ApiHistogram, SubgraphSummary, WarningDisplay, WarningReport, assign_subgraphs,
    node_subgraphs,
};
use crate::error::Result;
use crate::io::rdf::{self, RdfFormat};
use crate::model::BelGraph;
use crate::repository::{SheetsRepository, load_prior_graph};

pub const API_SUMMARY_FILE_NAME: &str = "api_summary.tsv";
pub const SUBGRAPH_SUMMARY_FILE_NAME: &str = "subgraph_summary.tsv";

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Warnings were shown to the user; the process should exit non-zero.
    WarningsShown,
}

/// Options of the results run.
#[derive(Debug, Clone, Default)]
pub struct ResultsOptions {
    /// Show the warnings and stop when there are any.
    pub show_warnings: bool,
    /// Where shown warnings go.
    pub warning_display: WarningDisplay,
    /// Reparse every sheet instead of using the graph cache.
    pub reload: bool,
    /// Also write the combined graph as RDF.
    pub export_rdf: Option<(PathBuf, RdfFormat)>,
}

/// Converts the sheets to a fresh graph and refuses to produce the curation
/// summary while any warning remains.
#[instrument(level = "info", skip_all, fields(directory = %repository.directory().display()))]
pub fn convert(
    repository: &SheetsRepository,
    display: &WarningDisplay,
    out: &mut impl Write,
) -> Result<Outcome> {
    let graph = repository.get_graph(false, true)?;
    write!(out, "{}", graph.summary())?;

    let report = WarningReport::from_graph(&graph);
    if !report.is_empty() {
        writeln!(out, "Graph had {} warnings", report.number_of_warnings())?;
        report.show(display, out)?;
        return Ok(Outcome::WarningsShown);
    }

    repository.generate_curation_summary()?;
    Ok(Outcome::Completed)
}

/// Writes the curation summary and prints the summary of the sheets graph.
#[instrument(level = "info", skip_all, fields(directory = %repository.directory().display()))]
pub fn summarize(repository: &SheetsRepository, out: &mut impl Write) -> Result<Outcome> {
    repository.generate_curation_summary()?;
    let graph = repository.get_graph(false, true)?;
    write!(out, "{}", graph.summary())?;
    Ok(Outcome::Completed)
}

/// Produces the reader usage and per-subgraph reports for the curated graph
/// against the prior knowledge graph found at `prior`.
#[instrument(
    level = "info",
    skip_all,
    fields(directory = %repository.directory().display(), prior = %prior.display())
)]
pub fn results(
    repository: &SheetsRepository,
    prior: &Path,
    options: &ResultsOptions,
    out: &mut impl Write,
) -> Result<Outcome> {
    repository.generate_curation_summary()?;

    let mut graph = repository.get_graph(!options.reload, true)?;
    write!(out, "{}", graph.summary())?;

    let histogram = ApiHistogram::from_graph(&graph);
    write!(out, "{}", histogram.render())?;
    let api_path = repository.output_directory().join(API_SUMMARY_FILE_NAME);
    histogram.write_tsv(&api_path)?;
    info!(path = %api_path.display(), "reader summary written");

    let report = WarningReport::from_graph(&graph);
    if !report.is_empty() {
        writeln!(out, "{}", report.message())?;
        if options.show_warnings {
            report.show(&options.warning_display, out)?;
            return Ok(Outcome::WarningsShown);
        }
    }

    let prior = load_prior_graph(prior)?;
    let node_subgraphs = node_subgraphs(&prior);
    let labels = node_subgraphs.labels();
    assign_subgraphs(&mut graph, &node_subgraphs);

    let combined = BelGraph::merge(&prior, &graph);
    write!(out, "{}", combined.summary())?;

    let summary = SubgraphSummary::from_combined(&combined, &labels);
    if summary.is_empty() {
        warn!("no subgraph of the prior graph is annotated on any edge");
    }
    let subgraph_path = repository.output_directory().join(SUBGRAPH_SUMMARY_FILE_NAME);
    summary.write_tsv(&subgraph_path)?;
    info!(
        path = %subgraph_path.display(),
        subgraphs = summary.len(),
        "subgraph summary written"
    );

    if let Some((path, format)) = &options.export_rdf {
        rdf::write_rdf(path, &combined, format.clone())?;
        info!(path = %path.display(), "combined graph exported");
    }

    Ok(Outcome::Completed)
}
