use std::path::PathBuf;

use oxigraph::model::IriParseError;
use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, CurationError>;

/// Error type covering the failures that can occur while loading curation
/// sheets, building graphs, or writing reports.
///
/// Malformed curation rows are not represented here: they are recorded as
/// graph warnings and never abort a run.
#[derive(Debug, Error)]
pub enum CurationError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when a tab-separated file cannot be read or written.
    #[error("TSV error: {0}")]
    Tsv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the curation directory cannot be traversed.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Raised when the curation rounds directory is absent at startup.
    #[error("input directory not found: {0}")]
    MissingInputDirectory(PathBuf),

    /// Raised when a curation file cannot be interpreted at all.
    #[error("invalid curation sheet: {0}")]
    InvalidSheet(String),

    /// Raised when a serialized graph is structurally inconsistent.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Raised when RDF serialization fails.
    #[error("RDF error: {0}")]
    Rdf(String),

    /// Raised when an invalid IRI is produced while exporting RDF.
    #[error("invalid IRI: {0}")]
    InvalidIri(#[from] IriParseError),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
