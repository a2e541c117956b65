use std::collections::BTreeSet;
use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{BelGraph, Warning};

/// Exit status used when warnings were displayed on request.
pub const WARNINGS_EXIT_CODE: i32 = -1;

const DEFAULT_PAGER: &str = "less";

/// Warnings of a graph grouped by the document they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningReport {
    warnings: Vec<Warning>,
    documents: BTreeSet<String>,
}

impl WarningReport {
    pub fn from_graph(graph: &BelGraph) -> Self {
        let warnings = graph.warnings().to_vec();
        let documents = warnings.iter().map(|warning| warning.path.clone()).collect();
        Self {
            warnings,
            documents,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn number_of_warnings(&self) -> usize {
        self.warnings.len()
    }

    /// Number of distinct source documents that produced warnings.
    pub fn number_of_documents(&self) -> usize {
        self.documents.len()
    }

    pub fn message(&self) -> String {
        format!("Warnings from {} documents", self.number_of_documents())
    }

    /// One `path:line message` entry per warning.
    pub fn render_warnings(&self) -> String {
        self.warnings
            .iter()
            .map(|warning| format!("{}:{} {}\n", warning.path, warning.line, warning.message))
            .collect()
    }

    /// Shows the warnings as `display` asks: through a pager, or written to
    /// `out`. A pager that cannot be started falls back to `out`.
    pub fn show(&self, display: &WarningDisplay, out: &mut impl Write) -> Result<()> {
        let text = self.render_warnings();
        let WarningDisplay::Pager(pager) = display else {
            out.write_all(text.as_bytes())?;
            return Ok(());
        };

        let mut parts = pager.split_whitespace();
        let program = parts.next().unwrap_or(DEFAULT_PAGER);
        match Command::new(program).args(parts).stdin(Stdio::piped()).spawn() {
            Ok(mut child) => {
                if let Some(mut stdin) = child.stdin.take() {
                    // The pager may quit before reading everything.
                    if let Err(err) = stdin.write_all(text.as_bytes()) {
                        debug!(error = %err, "pager closed its input early");
                    }
                }
                child.wait()?;
            }
            Err(err) => {
                warn!(pager = program, error = %err, "failed to start pager");
                out.write_all(text.as_bytes())?;
            }
        }
        Ok(())
    }
}

/// How warnings are shown when a run stops on them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WarningDisplay {
    /// Written into the run's output.
    #[default]
    Inline,
    /// Piped into the given pager command.
    Pager(String),
}

impl WarningDisplay {
    /// `$PAGER` (or `less`) when stdout is a terminal, inline otherwise.
    pub fn detect() -> Self {
        if !io::stdout().is_terminal() {
            return WarningDisplay::Inline;
        }
        let pager = std::env::var("PAGER")
            .ok()
            .filter(|pager| !pager.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAGER.to_string());
        WarningDisplay::Pager(pager)
    }
}
