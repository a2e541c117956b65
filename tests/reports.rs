use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use hbp_curation::analysis::{
    ApiHistogram, SUBGRAPH_ANNOTATION, SubgraphSummary, WarningDisplay, WarningReport,
    assign_subgraphs, node_subgraphs,
};
use hbp_curation::io::cache;
use hbp_curation::io::rdf::RdfFormat;
use hbp_curation::model::{Annotations, BelGraph, Edge, EdgeData, GraphMetadata, Relation};
use hbp_curation::pipeline::{
    self, API_SUMMARY_FILE_NAME, Outcome, ResultsOptions, SUBGRAPH_SUMMARY_FILE_NAME,
};
use hbp_curation::repository::{CURATION_SUMMARY_FILE_NAME, SheetsRepository};
use tempfile::tempdir;

fn annotated(pairs: &[(&str, &[&str])]) -> EdgeData {
    let mut data = EdgeData::new(Relation::Increases);
    let mut annotations = Annotations::new();
    for (key, values) in pairs {
        annotations.insert(
            key.to_string(),
            values.iter().map(|value| value.to_string()).collect(),
        );
    }
    data.annotations = Some(annotations);
    data
}

fn labels(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn prior_graph() -> BelGraph {
    let mut prior = BelGraph::new(GraphMetadata::default());
    prior.add_edge(Edge::new("p(X)", "p(W)", annotated(&[("Subgraph", &["S1"])])));
    prior.add_edge(Edge::new("p(Y)", "p(V)", annotated(&[("Subgraph", &["S2"])])));
    prior
}

#[test]
fn reader_histogram_counts_edges_per_reader() {
    let mut graph = BelGraph::new(GraphMetadata::default());
    graph.add_edge(Edge::new("p(A)", "p(B)", annotated(&[("INDRA_API", &["reach", "sparser"])])));
    graph.add_edge(Edge::new("p(B)", "p(C)", annotated(&[("INDRA_API", &["reach"])])));
    graph.add_edge(Edge::new("p(C)", "p(D)", annotated(&[("INDRA_API", &["nan", ""])])));
    graph.add_edge(Edge::new("p(D)", "p(E)", EdgeData::new(Relation::Decreases)));

    let histogram = ApiHistogram::from_graph(&graph);
    assert_eq!(histogram.get("reach"), Some(2));
    assert_eq!(histogram.get("sparser"), Some(1));
    assert_eq!(histogram.most_common().len(), 2);
}

#[test]
fn curated_edges_take_union_of_endpoint_labels() {
    let prior = prior_graph();
    let mut curated = BelGraph::new(GraphMetadata::default());
    curated.add_edge(Edge::new("p(X)", "p(Y)", annotated(&[])));
    curated.add_edge(Edge::new("p(Y)", "p(Q)", EdgeData::new(Relation::Decreases)));

    assign_subgraphs(&mut curated, &node_subgraphs(&prior));

    let edges: Vec<_> = curated.edges().collect();
    assert_eq!(edges[0].data.annotation(SUBGRAPH_ANNOTATION), Some(&labels(&["S1", "S2"])));
    assert_eq!(edges[1].data.annotations, None);
}

#[test]
fn summary_keeps_only_prior_subgraph_names() {
    let prior = prior_graph();
    let prior_labels = node_subgraphs(&prior).labels();

    let mut curated = BelGraph::new(GraphMetadata::default());
    curated.add_edge(Edge::new("p(X)", "p(Z)", annotated(&[("Subgraph", &["S1", "S3"])])));

    let summary = SubgraphSummary::build(&prior, &curated, &prior_labels);
    assert_eq!(summary.names().collect::<Vec<_>>(), vec!["S1", "S2"]);
    let s1 = summary.get("S1").expect("S1 summarised");
    assert_eq!(s1.nodes, 3);
    assert_eq!(s1.edges, 2);
    assert_eq!(s1.components, 1);
}

#[test]
fn merge_replaces_duplicate_edges() {
    let prior = prior_graph();
    let mut curated = BelGraph::new(GraphMetadata::default());
    let mut edge = prior.edges().next().expect("prior edge").clone();
    edge.data.evidence = Some("curated".into());
    curated.add_edge(edge);
    curated.add_edge(Edge::new("p(W)", "p(U)", EdgeData::new(Relation::Association)));

    let combined = BelGraph::merge(&prior, &curated);
    assert_eq!(combined.number_of_edges(), 3);
    assert_eq!(combined.number_of_nodes(), 5);
    let first = combined.edges().next().expect("combined edge");
    assert_eq!(first.data.evidence.as_deref(), Some("curated"));
}

#[test]
fn zero_warnings_report_is_empty() {
    let report = WarningReport::from_graph(&prior_graph());
    assert!(report.is_empty());
    assert_eq!(report.number_of_documents(), 0);
}

fn write_rounds(rounds: &Path) {
    fs::create_dir_all(rounds).expect("rounds created");
    fs::write(
        rounds.join("round1.tsv"),
        "Subject\tRelation\tObject\tPMID\tChecked\tCorrect\tINDRA_API\n\
         p(HGNC:X)\tincreases\tp(HGNC:Y)\t1\tTRUE\tTRUE\treach|sparser\n\
         p(HGNC:Y)\tdecreases\tp(HGNC:Z)\t2\tTRUE\tTRUE\treach\n\
         p(HGNC:Z)\tbinds\tp(HGNC:Q)\t3\tTRUE\tTRUE\treach\n",
    )
    .expect("round written");
}

fn write_prior(prior: &Path) {
    fs::create_dir_all(prior).expect("prior created");
    fs::write(
        prior.join("knowledge.tsv"),
        "Subject\tRelation\tObject\tChecked\tCorrect\tSubgraph\n\
         p(HGNC:X)\tincreases\tp(HGNC:W)\tTRUE\tTRUE\tTau protein subgraph\n\
         p(HGNC:Z)\tincreases\tp(HGNC:V)\tTRUE\tTRUE\tInflammatory response\n\
         p(HGNC:Y)\tassociation\tp(HGNC:U)\tTRUE\tTRUE\t\n",
    )
    .expect("prior written");
}

#[test]
fn results_run_writes_reports() {
    let temp_dir = tempdir().expect("temporary directory");
    let rounds = temp_dir.path().join("rounds");
    let prior = temp_dir.path().join("prior");
    let data = temp_dir.path().join("data");
    write_rounds(&rounds);
    write_prior(&prior);

    let repository =
        SheetsRepository::new(&rounds, &data, GraphMetadata::default()).expect("repository");
    let options = ResultsOptions {
        export_rdf: Some((data.join("combined.nt"), RdfFormat::NTriples)),
        ..ResultsOptions::default()
    };
    let mut out = Vec::new();
    let outcome = pipeline::results(&repository, &prior, &options, &mut out).expect("results run");
    assert_eq!(outcome, Outcome::Completed);

    let printed = String::from_utf8(out).expect("utf-8 output");
    assert!(printed.contains("Readers Used:\n  reach  : 2\n  sparser: 1\n"));
    assert!(printed.contains("Warnings from 1 documents"));

    let api = fs::read_to_string(data.join(API_SUMMARY_FILE_NAME)).expect("api summary read");
    assert_eq!(api, "reader\tcount\nreach\t2\nsparser\t1\n");

    let subgraphs =
        fs::read_to_string(data.join(SUBGRAPH_SUMMARY_FILE_NAME)).expect("subgraph summary read");
    let lines: Vec<&str> = subgraphs.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("subgraph\tNumber of Nodes\tNumber of Edges"));
    assert!(lines[1].starts_with("Inflammatory response\t3\t2\t"));
    assert!(lines[2].starts_with("Tau protein subgraph\t3\t2\t"));

    assert!(data.join("curation_summary.xlsx").is_file());
    let rdf = fs::read_to_string(data.join("combined.nt")).expect("RDF export read");
    assert!(rdf.contains("<http://www.openbel.org/vocabulary/decreases>"));
}

#[test]
fn results_accept_a_serialized_prior_graph() {
    let temp_dir = tempdir().expect("temporary directory");
    let rounds = temp_dir.path().join("rounds");
    let data = temp_dir.path().join("data");
    write_rounds(&rounds);

    let mut prior = BelGraph::new(GraphMetadata::default());
    prior.add_edge(Edge::new(
        "p(HGNC:X)",
        "p(HGNC:W)",
        annotated(&[("Subgraph", &["Tau protein subgraph"])]),
    ));
    let prior_path = temp_dir.path().join("prior.json");
    cache::store(&prior_path, &prior).expect("prior stored");

    let repository =
        SheetsRepository::new(&rounds, &data, GraphMetadata::default()).expect("repository");
    let options = ResultsOptions {
        reload: true,
        ..ResultsOptions::default()
    };
    let mut out = Vec::new();
    pipeline::results(&repository, &prior_path, &options, &mut out).expect("results run");

    let subgraphs =
        fs::read_to_string(data.join(SUBGRAPH_SUMMARY_FILE_NAME)).expect("subgraph summary read");
    let rows: Vec<&str> = subgraphs.lines().skip(1).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("Tau protein subgraph\t3\t2\t"));
}

#[test]
fn summary_command_prints_graph_statistics() {
    let temp_dir = tempdir().expect("temporary directory");
    let rounds = temp_dir.path().join("rounds");
    let data = temp_dir.path().join("data");
    write_rounds(&rounds);

    let repository =
        SheetsRepository::new(&rounds, &data, GraphMetadata::default()).expect("repository");
    let mut out = Vec::new();
    let outcome = pipeline::summarize(&repository, &mut out).expect("summary run");
    assert_eq!(outcome, Outcome::Completed);

    let printed = String::from_utf8(out).expect("utf-8 output");
    assert!(printed.starts_with("HBP - INDRA Curation v0.1.0\n"));
    assert!(printed.contains("Number of Edges"));
    assert!(printed.contains("Number of Warnings  : 1\n"));
}

fn write_clean_rounds(rounds: &Path) {
    fs::create_dir_all(rounds).expect("rounds created");
    fs::write(
        rounds.join("round1.tsv"),
        "Subject\tRelation\tObject\tPMID\tChecked\tCorrect\tINDRA_API\n\
         p(HGNC:X)\tincreases\tp(HGNC:Y)\t1\tTRUE\tTRUE\treach\n",
    )
    .expect("round written");
}

#[test]
fn shown_warnings_stop_the_results_run() {
    let temp_dir = tempdir().expect("temporary directory");
    let rounds = temp_dir.path().join("rounds");
    let prior = temp_dir.path().join("prior");
    let data = temp_dir.path().join("data");
    write_rounds(&rounds);
    write_prior(&prior);

    let repository =
        SheetsRepository::new(&rounds, &data, GraphMetadata::default()).expect("repository");
    let options = ResultsOptions {
        show_warnings: true,
        warning_display: WarningDisplay::Inline,
        ..ResultsOptions::default()
    };
    let mut out = Vec::new();
    let outcome = pipeline::results(&repository, &prior, &options, &mut out).expect("results run");
    assert_eq!(outcome, Outcome::WarningsShown);

    let printed = String::from_utf8(out).expect("utf-8 output");
    assert!(printed.contains("Warnings from 1 documents\n"));
    assert!(printed.contains("round1.tsv:4 unknown relation 'binds'\n"));
    assert!(data.join(API_SUMMARY_FILE_NAME).is_file());
    assert!(!data.join(SUBGRAPH_SUMMARY_FILE_NAME).exists());
}

#[test]
fn show_warnings_without_warnings_completes() {
    let temp_dir = tempdir().expect("temporary directory");
    let rounds = temp_dir.path().join("rounds");
    let prior = temp_dir.path().join("prior");
    let data = temp_dir.path().join("data");
    write_clean_rounds(&rounds);
    write_prior(&prior);

    let repository =
        SheetsRepository::new(&rounds, &data, GraphMetadata::default()).expect("repository");
    let options = ResultsOptions {
        show_warnings: true,
        ..ResultsOptions::default()
    };
    let mut out = Vec::new();
    let outcome = pipeline::results(&repository, &prior, &options, &mut out).expect("results run");
    assert_eq!(outcome, Outcome::Completed);

    let printed = String::from_utf8(out).expect("utf-8 output");
    assert!(!printed.contains("Warnings from"));
    assert!(data.join(SUBGRAPH_SUMMARY_FILE_NAME).is_file());
}

#[test]
fn convert_refuses_summary_while_warnings_remain() {
    let temp_dir = tempdir().expect("temporary directory");
    let rounds = temp_dir.path().join("rounds");
    let data = temp_dir.path().join("data");
    write_rounds(&rounds);

    let repository =
        SheetsRepository::new(&rounds, &data, GraphMetadata::default()).expect("repository");
    let mut out = Vec::new();
    let outcome =
        pipeline::convert(&repository, &WarningDisplay::Inline, &mut out).expect("convert run");
    assert_eq!(outcome, Outcome::WarningsShown);

    let printed = String::from_utf8(out).expect("utf-8 output");
    assert!(printed.contains("Graph had 1 warnings\n"));
    assert!(printed.ends_with("round1.tsv:4 unknown relation 'binds'\n"));
    assert!(!data.join(CURATION_SUMMARY_FILE_NAME).exists());
}

#[test]
fn convert_writes_summary_for_clean_rounds() {
    let temp_dir = tempdir().expect("temporary directory");
    let rounds = temp_dir.path().join("rounds");
    let data = temp_dir.path().join("data");
    write_clean_rounds(&rounds);

    let repository =
        SheetsRepository::new(&rounds, &data, GraphMetadata::default()).expect("repository");
    let mut out = Vec::new();
    let outcome =
        pipeline::convert(&repository, &WarningDisplay::Inline, &mut out).expect("convert run");
    assert_eq!(outcome, Outcome::Completed);
    assert!(data.join(CURATION_SUMMARY_FILE_NAME).is_file());
}
