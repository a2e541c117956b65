use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::io::tsv;
use crate::model::BelGraph;

/// Edge annotation naming the text-mining readers that extracted a statement.
pub const READER_API_ANNOTATION: &str = "INDRA_API";

/// Placeholder spreadsheets export for blank cells.
const MISSING_VALUE: &str = "nan";

/// Number of edges each reader contributed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiHistogram {
    /// Readers in order of first occurrence with their counts.
    entries: Vec<(String, usize)>,
}

impl ApiHistogram {
    /// Counts each reader once per edge carrying the reader annotation.
    /// Empty values and `nan` placeholders are ignored; anything else is
    /// counted verbatim.
    pub fn from_graph(graph: &BelGraph) -> Self {
        let mut histogram = Self::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for edge in graph.edges() {
            let Some(readers) = edge.data.annotation(READER_API_ANNOTATION) else {
                continue;
            };
            for reader in readers {
                let reader = reader.as_str();
                if reader.is_empty() || reader == MISSING_VALUE {
                    continue;
                }
                match positions.get(reader) {
                    Some(&position) => histogram.entries[position].1 += 1,
                    None => {
                        positions.insert(reader.to_string(), histogram.entries.len());
                        histogram.entries.push((reader.to_string(), 1));
                    }
                }
            }
        }

        histogram
    }

    pub fn get(&self, reader: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == reader)
            .map(|(_, count)| *count)
    }

    /// Readers by descending count; ties keep first-occurrence order.
    pub fn most_common(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .entries
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        entries.sort_by(|lhs, rhs| rhs.1.cmp(&lhs.1));
        entries
    }

    /// Console rendering with reader names padded to a common width.
    pub fn render(&self) -> String {
        let width = self
            .entries
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0);
        let mut output = String::from("Readers Used:\n");
        for (name, count) in self.most_common() {
            output.push_str(&format!("  {name:width$}: {count}\n"));
        }
        output
    }

    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        tsv::write_table(
            path,
            &["reader", "count"],
            self.most_common()
                .into_iter()
                .map(|(name, count)| [name.to_string(), count.to_string()]),
        )
    }
}
