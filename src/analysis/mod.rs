//! Aggregations over curated graphs: reader usage, warning reports, and
//! per-subgraph statistics.

pub mod api;
pub mod subgraph;
pub mod warnings;

pub use api::{ApiHistogram, READER_API_ANNOTATION};
pub use subgraph::{
    NodeSubgraphs, SUBGRAPH_ANNOTATION, SubgraphSummary, assign_subgraphs, node_subgraphs,
};
pub use warnings::{WarningDisplay, WarningReport};
