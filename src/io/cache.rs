use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::BelGraph;

/// Loads a cached graph. A missing or unreadable cache yields `None` so the
/// caller falls back to reparsing.
pub fn load(path: &Path) -> Option<BelGraph> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "no graph cache available");
            return None;
        }
    };

    match read_graph_json(&source) {
        Ok(graph) => Some(graph),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring invalid graph cache");
            None
        }
    }
}

/// Persists the graph as pretty-printed JSON.
pub fn store(path: &Path, graph: &BelGraph) -> Result<()> {
    let json = serde_json::to_string_pretty(graph)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a JSON-serialised graph from disk.
pub fn read_graph(path: &Path) -> Result<BelGraph> {
    let source = fs::read_to_string(path)?;
    read_graph_json(&source)
}

fn read_graph_json(source: &str) -> Result<BelGraph> {
    Ok(serde_json::from_str(source)?)
}
