//! Integration tests for the topicmap library API.

use std::collections::HashSet;
use topicmap::analysis::{
    ClusterBuilder, ClusterError, ClusterOptions, ClusterStrategy, PlacementStrategy,
    SimilarityGraph,
};
use topicmap::model::{Edge, Node, Point};
use topicmap::{AnalysisOptions, Config, PositionSnapshot, TopicmapError, analyze, analyze_json};

const GRAPH: &str = r#"{
    "nodes": [
        {"id": "home loan eligibility", "size": 320},
        {"id": "loan interest rate", "size": 410},
        {"id": "car loan emi calculator", "size": 150},
        {"id": "favourite holiday destination", "size": 90}
    ],
    "links": [
        {"source": "home loan eligibility", "target": "loan interest rate", "strength": 0.9},
        {"source": "loan interest rate", "target": "car loan emi calculator", "strength": 0.85},
        {"source": "car loan emi calculator", "target": "favourite holiday destination", "strength": 0.1}
    ]
}"#;

const SURVEY: &str = r#"{
    "loan interest rate": {
        "Topic": "Lending",
        "Survey Name": "Borrowing 2024",
        "Sample Size": 410,
        "Responses": [
            {"Option": "Fixed", "Percentage": "70%"},
            {"Option": "Floating", "Percentage": "30%"}
        ]
    }
}"#;

fn chain(ids: &[&str], edges: &[(&str, &str, f64)]) -> SimilarityGraph {
    SimilarityGraph::new(
        ids.iter().map(|id| Node::new(*id)).collect(),
        edges.iter().map(|(a, b, s)| Edge::new(*a, *b, *s)).collect(),
    )
    .unwrap()
}

#[test]
fn test_analyze_json_clusters_and_labels() {
    let analysis = analyze_json(GRAPH, Some(SURVEY), Config::default()).unwrap();
    let report = &analysis.report;

    assert_eq!(report.total_nodes, 4);
    assert_eq!(report.total_edges, 3);
    assert_eq!(report.partition.len(), 2);

    let loans = report.partition.cluster_of("loan interest rate").unwrap();
    assert_eq!(loans.size(), 3);
    assert_eq!(report.labels.label(&loans.id), Some("Loan"));

    let detail = &analysis.dataset.details["loan interest rate"];
    assert_eq!(detail.top_share(), Some(0.7));
}

#[test]
fn test_partition_covers_every_node_once() {
    let analysis = analyze_json(GRAPH, None, Config::default()).unwrap();
    let mut seen = HashSet::new();
    for cluster in analysis.report.partition.iter() {
        for member in &cluster.members {
            assert!(seen.insert(member.clone()), "{} appears twice", member);
        }
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn test_chain_example_thresholds() {
    let graph = chain(
        &["A", "B", "C", "D"],
        &[("A", "B", 0.9), ("B", "C", 0.85), ("C", "D", 0.1)],
    );

    let build = |threshold: f64| {
        ClusterBuilder::new(ClusterOptions {
            threshold,
            max_size: 10,
            ..Default::default()
        })
        .build(&graph)
        .unwrap()
    };

    let loose = build(0.8);
    let members: Vec<Vec<&str>> = loose
        .iter()
        .map(|c| c.members.iter().map(String::as_str).collect())
        .collect();
    assert_eq!(members, vec![vec!["A", "B", "C"], vec!["D"]]);

    let strict = build(0.95);
    assert_eq!(strict.len(), 4);
    assert_eq!(strict.singleton_count(), 4);
}

#[test]
fn test_every_strategy_respects_size_cap() {
    let ids: Vec<String> = (0..12).map(|i| format!("n{}", i)).collect();
    let mut edges = Vec::new();
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            edges.push(Edge::new(ids[i].clone(), ids[j].clone(), 0.95));
        }
    }
    let graph =
        SimilarityGraph::new(ids.iter().map(|id| Node::new(id.clone())).collect(), edges).unwrap();

    for strategy in [ClusterStrategy::Merge, ClusterStrategy::Sweep] {
        let partition = ClusterBuilder::new(ClusterOptions {
            strategy,
            threshold: 0.7,
            max_size: 5,
            coherence: true,
        })
        .build(&graph)
        .unwrap();
        assert!(partition.iter().all(|c| c.size() <= 5), "{:?}", strategy);
        assert_eq!(partition.iter().map(|c| c.size()).sum::<usize>(), 12);
    }
}

#[test]
fn test_invalid_options_are_rejected() {
    let mut config = Config::default();
    config.clustering.threshold = f64::NAN;
    let err = analyze_json(GRAPH, None, config).unwrap_err();
    assert!(matches!(
        err,
        TopicmapError::Cluster(ClusterError::InvalidThreshold(_))
    ));

    let mut config = Config::default();
    config.clustering.max_size = 0;
    let err = analyze_json(GRAPH, None, config).unwrap_err();
    assert!(matches!(
        err,
        TopicmapError::Cluster(ClusterError::InvalidCapacity(0))
    ));
}

#[test]
fn test_invalid_placement_sizes_are_rejected() {
    let mut config = Config::default();
    config.placement.base_font_size = 0.0;
    let err = analyze_json(GRAPH, None, config).unwrap_err();
    assert!(matches!(err, TopicmapError::Config(_)));
    assert!(err.to_string().contains("placement.base_font_size"));
}

#[test]
fn test_survey_questions_shape_labels() {
    let graph = r#"{
        "nodes": [{"id": "Retirement"}, {"id": "Later life"}, {"id": "Old age"}],
        "links": [
            {"source": "Retirement", "target": "Later life", "strength": 0.9},
            {"source": "Later life", "target": "Old age", "strength": 0.9},
            {"source": "Retirement", "target": "Old age", "strength": 0.9}
        ]
    }"#;
    let survey = r#"{
        "Retirement": {"Questions": {"Do you hold a pension?": [{"Option": "Yes", "Percentage": 40}]}},
        "Later life": {"Questions": {"Is a pension enough?": [{"Option": "No", "Percentage": 55}]}},
        "Old age": {"Questions": {"Pension age preference": [{"Option": "60", "Percentage": 30}]}}
    }"#;

    let analysis = analyze_json(graph, Some(survey), Config::default()).unwrap();
    let cluster = analysis.report.partition.cluster_of("Retirement").unwrap();
    assert_eq!(cluster.size(), 3);
    assert_eq!(analysis.report.labels.label(&cluster.id), Some("Pension"));
}

#[test]
fn test_bad_graph_is_reported() {
    let graph = r#"{"nodes": [{"id": "a"}, {"id": "a"}], "links": []}"#;
    let err = analyze_json(graph, None, Config::default()).unwrap_err();
    assert!(matches!(err, TopicmapError::Input(_)));
    assert!(err.to_string().contains("Duplicate node id: a"));
}

#[test]
fn test_missing_file_is_input_error() {
    let err = analyze(
        std::path::Path::new("/nonexistent/graph.json"),
        AnalysisOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TopicmapError::Input(_)));
}

#[test]
fn test_place_labels_for_snapshot() {
    let mut config = Config::default();
    config.placement.strategy = PlacementStrategy::Nudge;
    let analysis = analyze_json(GRAPH, None, config).unwrap();

    let mut positions = PositionSnapshot::new();
    positions.insert("home loan eligibility".to_string(), Point::new(0.0, 0.0));
    positions.insert("loan interest rate".to_string(), Point::new(20.0, 0.0));
    positions.insert("car loan emi calculator".to_string(), Point::new(40.0, 0.0));
    positions.insert("favourite holiday destination".to_string(), Point::new(400.0, 0.0));

    let placed = analysis.place(&positions, 1.0);
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].text, "Loan");
    assert_eq!((placed[0].x, placed[0].y), (20.0, 0.0));

    // Same snapshot, same answer
    assert_eq!(analysis.place(&positions, 1.0), placed);
    assert!(analysis.place(&positions, 0.1).is_empty());
}

#[test]
fn test_search_and_select_views() {
    let analysis = analyze_json(GRAPH, Some(SURVEY), Config::default()).unwrap();

    let view = analysis.search("floating");
    assert_eq!(view.highlighted, vec!["loan interest rate"]);
    assert!(view.is_link_dimmed(2));
    assert!(!view.is_link_dimmed(0));

    let view = analysis.select("car loan emi calculator");
    assert_eq!(view.highlighted.len(), 3);
    assert_eq!(view.selected.as_deref(), Some("car loan emi calculator"));
}

#[test]
fn test_reports_render() {
    let analysis = analyze_json(GRAPH, None, Config::default()).unwrap();

    let markdown = analysis.to_markdown("loans", 10).unwrap();
    assert!(markdown.contains("### Loan (3 topics)"));

    let json: serde_json::Value = serde_json::from_str(&analysis.to_json("loans").unwrap()).unwrap();
    assert_eq!(json["threshold"], 0.7);
    assert_eq!(json["clusters"].as_array().unwrap().len(), 2);
}

#[test]
fn test_graph_errors_convert() {
    fn build() -> Result<SimilarityGraph, TopicmapError> {
        Ok(SimilarityGraph::new(
            vec![Node::new("a")],
            vec![Edge::new("a", "a", 2.0)],
        )?)
    }
    assert!(matches!(build(), Err(TopicmapError::Graph(_))));
}
