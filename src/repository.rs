//! Curation round repository: where the sheets live, where outputs go, and how
//! the two are turned into a graph.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::error::{CurationError, Result};
use crate::io::excel_write::{self, CellValue, SheetTable};
use crate::io::{cache, excel_read, tsv};
use crate::model::{BelGraph, GraphMetadata};
use crate::sheets::{self, RawSheet, SheetStatistics};

pub const GRAPH_NAME: &str = "HBP - INDRA Curation";
pub const GRAPH_VERSION: &str = "0.1.0";
pub const CONTACT: &str = "charles.hoyt@scai.fraunhofer.de";
pub const AUTHORS: [&str; 8] = [
    "Charles Tapley Hoyt",
    "Daniel Domingo-Fernández",
    "Esther Wollert",
    "Sandra Spalek",
    "Keerthika Lohanadan",
    "Rana Al Disi",
    "Lingling Xu",
    "Kristian Kolpeja",
];

pub const CACHE_FILE_NAME: &str = "sheets.bel.json";
pub const CURATION_SUMMARY_FILE_NAME: &str = "curation_summary.xlsx";

/// Authors sorted by last name and joined with commas.
pub fn author_string() -> String {
    fn last_name(author: &str) -> &str {
        author.split_whitespace().last().unwrap_or(author)
    }

    let mut authors = AUTHORS.to_vec();
    authors.sort_by(|lhs, rhs| last_name(lhs).cmp(last_name(rhs)));
    authors.join(", ")
}

impl Default for GraphMetadata {
    fn default() -> Self {
        Self {
            name: GRAPH_NAME.to_string(),
            version: GRAPH_VERSION.to_string(),
            authors: author_string(),
            contact: CONTACT.to_string(),
        }
    }
}

/// A directory of curation sheets paired with an output directory for the
/// graph cache and reports.
#[derive(Debug, Clone)]
pub struct SheetsRepository {
    directory: PathBuf,
    output_directory: PathBuf,
    metadata: GraphMetadata,
}

impl SheetsRepository {
    /// Fails when `directory` does not exist; creates `output_directory`.
    pub fn new(
        directory: impl Into<PathBuf>,
        output_directory: impl Into<PathBuf>,
        metadata: GraphMetadata,
    ) -> Result<Self> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(CurationError::MissingInputDirectory(directory));
        }
        let output_directory = output_directory.into();
        fs::create_dir_all(&output_directory)?;

        Ok(Self {
            directory,
            output_directory,
            metadata,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn cache_path(&self) -> PathBuf {
        self.output_directory.join(CACHE_FILE_NAME)
    }

    /// Curation files under the input directory, sorted by path. Editor lock
    /// files and hidden files are skipped.
    pub fn curation_files(&self) -> Result<Vec<PathBuf>> {
        find_curation_files(&self.directory)
    }

    /// Returns the graph built from all curation sheets. With `use_cached`, a
    /// valid cache file is returned as is; otherwise every sheet is parsed and
    /// the cache is refreshed.
    #[instrument(level = "info", skip(self), fields(directory = %self.directory.display()))]
    pub fn get_graph(&self, use_cached: bool, use_tqdm: bool) -> Result<BelGraph> {
        let cache_path = self.cache_path();
        if use_cached {
            if let Some(graph) = cache::load(&cache_path) {
                info!(path = %cache_path.display(), "loaded graph from cache");
                return Ok(graph);
            }
        }

        let (graph, _) = self.parse(use_tqdm)?;
        cache::store(&cache_path, &graph)?;
        debug!(path = %cache_path.display(), "graph cache refreshed");
        Ok(graph)
    }

    /// Parses every curation sheet into a fresh graph together with the
    /// per-sheet statistics.
    pub fn parse(&self, use_tqdm: bool) -> Result<(BelGraph, Vec<SheetStatistics>)> {
        let files = self.curation_files()?;
        let progress = if use_tqdm {
            progress_bar(files.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let mut graph = BelGraph::new(self.metadata.clone());
        let mut statistics = Vec::new();
        for path in &files {
            progress.set_message(path.display().to_string());
            for sheet in read_curation_file(path)? {
                let stats = sheets::process_sheet(&sheet, &mut graph);
                debug!(
                    source = %stats.source,
                    included = stats.included,
                    warnings = stats.warnings,
                    "processed curation sheet"
                );
                statistics.push(stats);
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            files = files.len(),
            nodes = graph.number_of_nodes(),
            edges = graph.number_of_edges(),
            warnings = graph.number_of_warnings(),
            "parsed curation sheets"
        );
        Ok((graph, statistics))
    }

    /// Writes an Excel overview of curation progress, one row per sheet plus a
    /// total row, and returns its path.
    #[instrument(level = "info", skip(self), fields(output = %self.output_directory.display()))]
    pub fn generate_curation_summary(&self) -> Result<PathBuf> {
        let (_, statistics) = self.parse(false)?;
        let total = SheetStatistics::total("Total", &statistics);

        let rows = statistics
            .iter()
            .chain(std::iter::once(&total))
            .map(|stats| {
                std::iter::once(CellValue::Text(stats.source.clone()))
                    .chain(stats.counts().map(|count| CellValue::Number(count as f64)))
                    .collect()
            })
            .collect();
        let table = SheetTable {
            sheet_name: "Summary".to_string(),
            columns: SheetStatistics::COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        };

        let path = self.output_directory.join(CURATION_SUMMARY_FILE_NAME);
        excel_write::write_workbook(&path, &[table])?;
        info!(path = %path.display(), sheets = statistics.len(), "curation summary written");
        Ok(path)
    }
}

/// Loads a prior knowledge graph: a directory is read as a curation
/// repository (without caching), a file as a JSON-serialised graph.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_prior_graph(path: &Path) -> Result<BelGraph> {
    if path.is_dir() {
        let metadata = GraphMetadata {
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "prior".to_string()),
            ..GraphMetadata::default()
        };
        let mut graph = BelGraph::new(metadata);
        for file in &find_curation_files(path)? {
            for sheet in read_curation_file(file)? {
                sheets::process_sheet(&sheet, &mut graph);
            }
        }
        Ok(graph)
    } else {
        cache::read_graph(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SheetFormat {
    Xlsx,
    Tsv,
}

impl SheetFormat {
    fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_ascii_lowercase();
        match extension.to_str()? {
            "xlsx" => Some(SheetFormat::Xlsx),
            "tsv" => Some(SheetFormat::Tsv),
            _ => None,
        }
    }
}

fn find_curation_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with("~$") || name.starts_with('.') {
            continue;
        }
        if SheetFormat::detect(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn read_curation_file(path: &Path) -> Result<Vec<RawSheet>> {
    match SheetFormat::detect(path) {
        Some(SheetFormat::Xlsx) => excel_read::read_sheets(path),
        Some(SheetFormat::Tsv) => Ok(vec![tsv::read_sheet(path)?]),
        None => Err(CurationError::InvalidSheet(format!(
            "unsupported curation file {}",
            path.display()
        ))),
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let progress = ProgressBar::new(total);
    let style =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress
}
