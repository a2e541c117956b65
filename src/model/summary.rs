use std::collections::BTreeSet;
use std::fmt;

use super::BelGraph;

/// Column headers of the tabular projection of a [`GraphSummary`].
pub const SUMMARY_COLUMNS: [&str; 6] = [
    "Number of Nodes",
    "Number of Edges",
    "Number of Citations",
    "Network Density",
    "Number of Components",
    "Number of Warnings",
];

/// Headline statistics of a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSummary {
    pub name: String,
    pub version: String,
    pub nodes: usize,
    pub edges: usize,
    pub citations: usize,
    pub density: f64,
    pub components: usize,
    pub warnings: usize,
}

impl GraphSummary {
    pub fn of(graph: &BelGraph) -> Self {
        let nodes = graph.number_of_nodes();
        let edges = graph.number_of_edges();
        let citations = graph
            .edges()
            .filter_map(|edge| edge.data.citation.as_deref())
            .filter(|citation| !citation.is_empty())
            .collect::<BTreeSet<_>>()
            .len();
        let density = if nodes < 2 {
            0.0
        } else {
            edges as f64 / (nodes as f64 * (nodes as f64 - 1.0))
        };

        Self {
            name: graph.metadata.name.clone(),
            version: graph.metadata.version.clone(),
            nodes,
            edges,
            citations,
            density,
            components: graph.number_of_components(),
            warnings: graph.number_of_warnings(),
        }
    }

    pub fn columns() -> &'static [&'static str] {
        &SUMMARY_COLUMNS
    }

    /// Values in the same order as [`GraphSummary::columns`].
    pub fn values(&self) -> Vec<String> {
        vec![
            self.nodes.to_string(),
            self.edges.to_string(),
            self.citations.to_string(),
            self.density.to_string(),
            self.components.to_string(),
            self.warnings.to_string(),
        ]
    }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} v{}", self.name, self.version)?;
        let width = SUMMARY_COLUMNS.iter().map(|column| column.len()).max().unwrap_or(0);
        for (column, value) in SUMMARY_COLUMNS.iter().zip(self.values()) {
            writeln!(f, "{column:width$}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, EdgeData, GraphMetadata, Relation};

    fn metadata() -> GraphMetadata {
        GraphMetadata {
            name: "test".into(),
            version: "1.0.0".into(),
            authors: String::new(),
            contact: String::new(),
        }
    }

    #[test]
    fn counts_components_and_citations() {
        let mut graph = BelGraph::new(metadata());
        let mut cited = EdgeData::new(Relation::Increases);
        cited.citation = Some("pubmed:1".into());
        graph.add_edge(Edge::new("p(HGNC:A)", "p(HGNC:B)", cited.clone()));
        graph.add_edge(Edge::new("p(HGNC:B)", "p(HGNC:C)", cited));
        graph.add_edge(Edge::new("p(HGNC:D)", "p(HGNC:E)", EdgeData::new(Relation::Decreases)));
        graph.add_node("a(CHEBI:water)");

        let summary = graph.summary();
        assert_eq!(summary.nodes, 6);
        assert_eq!(summary.edges, 3);
        assert_eq!(summary.citations, 1);
        assert_eq!(summary.components, 3);
        assert!((summary.density - 0.1).abs() < 1e-9);
    }

    #[test]
    fn empty_graph_has_zero_density() {
        let summary = BelGraph::new(metadata()).summary();
        assert_eq!(summary.density, 0.0);
        assert_eq!(summary.components, 0);
        assert!(summary.to_string().starts_with("test v1.0.0\n"));
    }
}
