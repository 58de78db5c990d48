//! Integration tests for multi-file trace loading

use std::io::Write;
use std::path::{Path, PathBuf};
use taskdag::{DagBuilder, DagError, DuplicatePolicy, TaskId};
use taskdag_grapher::{load_all, GrapherConfig, GrapherLoader, LoadError};
use tempfile::{NamedTempFile, TempDir};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn node_line(name: &str, class: &str, tp: i64, did: i64, tid: i64) -> String {
    format!(
        r##"{name} [shape="polygon",style=filled,fillcolor="#000000",fontcolor="black",label="<0/0> {class}(0)[0]<1>{{{tp}}}",tooltip="tpid={tp}:did={did}:tname={class}:tid={tid}"];"##
    )
}

fn edge_line(source: &str, target: &str) -> String {
    format!(r##"{source} -> {target} [label="f1=>f2",color="#000000",style="solid"];"##)
}

fn write_trace(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn two_node_trace() -> NamedTempFile {
    write_trace(&[
        "digraph G {".to_string(),
        node_line("A", "X", 0, 1, 7),
        node_line("B", "Y", 0, 1, 8),
        edge_line("A", "B"),
        "}".to_string(),
    ])
}

#[test]
fn test_two_node_scenario() {
    let trace = two_node_trace();
    let dag = load_all([trace.path()]).unwrap();

    assert_eq!(dag.node_count(), 2);
    assert_eq!(dag.edge_count(), 1);
    assert_eq!(dag.node_by_id(0, 1, 7).unwrap().name, "A");

    let successors: Vec<_> = dag.successors_by_id(0, 1, 7).unwrap().collect();
    assert_eq!(successors.len(), 1);
    let (edge, target) = successors[0];
    assert_eq!(target, "B");
    assert_eq!(edge.flow_source, "f1");
    assert_eq!(edge.flow_target, "f2");
    assert_eq!(edge.color, "000000");
    assert_eq!(edge.style, "solid");
}

#[test]
fn test_load_cholesky_fixtures_in_order() {
    let dag = load_all([fixture("cholesky.0.dot"), fixture("cholesky.1.dot")]).unwrap();

    assert_eq!(dag.node_count(), 5);
    assert_eq!(dag.edge_count(), 6);

    let potrf = dag.node_by_name("POTRF_0_1").unwrap();
    assert_eq!(potrf.class_label, "POTRF");
    assert_eq!(potrf.priority, 100);
    assert_eq!(potrf.fill_color, "4488AA");
    assert_eq!(potrf.id(), TaskId::new(1, 0, 0));

    let gemm = dag.node_by_id(1, 3, 4).unwrap();
    assert_eq!(gemm.name, "GEMM_2_1_0_5");
    assert_eq!(gemm.parameters, "2, 1, 0");
    assert_eq!(gemm.locals, "2, 1, 0");
    assert_eq!((gemm.thread_id, gemm.vp_id), (1, 1));

    // Edges declared in the second file hang off nodes from the first
    let targets: Vec<_> = dag
        .successors_by_name("TRSM_1_0_2")
        .map(|(_, target)| target)
        .collect();
    assert_eq!(targets, vec!["SYRK_1_0_4", "GEMM_2_1_0_5"]);

    let sources: Vec<_> = dag
        .predecessors_by_name("GEMM_2_1_0_5")
        .map(|(_, source)| source)
        .collect();
    assert_eq!(sources, vec!["TRSM_1_0_2", "TRSM_2_0_3"]);

    let order: Vec<_> = dag.nodes().map(|n| n.name.as_str()).collect();
    assert_eq!(
        order,
        vec!["POTRF_0_1", "TRSM_1_0_2", "TRSM_2_0_3", "SYRK_1_0_4", "GEMM_2_1_0_5"]
    );
}

#[test]
fn test_every_loaded_id_round_trips() {
    let dag = load_all([fixture("cholesky.0.dot"), fixture("cholesky.1.dot")]).unwrap();
    for node in dag.nodes() {
        assert_eq!(dag.name_of(node.id()), Some(node.name.as_str()));
    }
    assert!(dag.index().is_bijective());
}

#[test]
fn test_successors_match_edge_sources() {
    let dag = load_all([fixture("cholesky.0.dot"), fixture("cholesky.1.dot")]).unwrap();
    for node in dag.nodes() {
        let expected: Vec<_> = dag.edges().filter(|e| e.source == node.name).collect();
        let actual: Vec<_> = dag.successors_by_name(&node.name).map(|(e, _)| e).collect();
        assert_eq!(actual, expected, "successors of {}", node.name);
    }
}

#[test]
fn test_dangling_edge_loads() {
    let dag = load_all([fixture("cholesky.0.dot"), fixture("cholesky.1.dot")]).unwrap();

    let err = dag.node_by_name("POTRF_1_6").unwrap_err();
    assert!(err.is_not_found());

    let targets: Vec<_> = dag
        .successors_by_name("SYRK_1_0_4")
        .map(|(_, target)| target)
        .collect();
    assert_eq!(targets, vec!["POTRF_1_6"]);

    let report = dag.check_integrity();
    assert_eq!(report.dangling.len(), 1);
    assert_eq!(report.dangling[0].name, "POTRF_1_6");
}

#[test]
fn test_loading_same_file_twice_keeps_one_node_per_name() {
    let first = two_node_trace();
    let second = write_trace(&[
        "digraph G {".to_string(),
        node_line("A", "Z", 0, 1, 7),
        "}".to_string(),
    ]);

    let dag = load_all([first.path(), first.path(), second.path()]).unwrap();
    assert_eq!(dag.node_count(), 2);
    assert_eq!(dag.node_by_name("A").unwrap().class_label, "Z");
    assert_eq!(dag.node_by_id(0, 1, 7).unwrap().class_label, "Z");
}

#[test]
fn test_format_error_reports_file_and_line() {
    let path = fixture("malformed.dot");
    let err = load_all([&path]).unwrap_err();

    match &err {
        LoadError::Format { file, line, text } => {
            assert_eq!(file, &path);
            assert_eq!(*line, 3);
            assert_eq!(text, "not a valid line");
        }
        other => panic!("expected a format error, got {other:?}"),
    }
    assert_eq!(err.location(), Some((path.as_path(), 3)));
}

#[test]
fn test_line_numbers_restart_per_file() {
    let good = two_node_trace();
    let bad = write_trace(&["digraph G {".to_string(), "oops".to_string()]);

    let err = load_all([good.path(), bad.path()]).unwrap_err();
    assert_eq!(err.location(), Some((bad.path(), 2)));
}

#[test]
fn test_missing_file_is_file_access_error() {
    let err = load_all(["does not exist.dot"]).unwrap_err();
    assert!(matches!(err, LoadError::FileAccess(ref path, _) if path == Path::new("does not exist.dot")));
    assert_eq!(err.location(), None);
}

#[test]
fn test_failure_in_later_file_aborts_everything() {
    let good = two_node_trace();
    let mut loader = GrapherLoader::new();

    let result = loader.load_all([good.path(), Path::new("missing/trace.dot")]);
    assert!(matches!(result, Err(LoadError::FileAccess(..))));
    assert_eq!(loader.metrics().files_loaded, 1);
}

#[test]
fn test_directory_is_file_access_error() {
    let dir = TempDir::new().unwrap();
    let err = load_all([dir.path()]).unwrap_err();
    assert!(matches!(err, LoadError::FileAccess(..)));
}

#[test]
fn test_blank_line_is_a_format_error() {
    let trace = write_trace(&[
        "digraph G {".to_string(),
        String::new(),
        "}".to_string(),
    ]);
    let err = load_all([trace.path()]).unwrap_err();
    assert!(matches!(err, LoadError::Format { line: 2, .. }));
}

#[test]
fn test_integer_overflow_is_schema_error() {
    let trace = write_trace(&[
        "digraph G {".to_string(),
        node_line("A", "X", 0, 1, 7).replace("tid=7", "tid=123456789012345678901234"),
    ]);
    let err = load_all([trace.path()]).unwrap_err();
    match err {
        LoadError::Schema { line, message, .. } => {
            assert_eq!(line, 2);
            assert!(message.contains("task_id"), "message: {message}");
        }
        other => panic!("expected a schema error, got {other:?}"),
    }
}

#[test]
fn test_taskpool_mismatch_warns_by_default() {
    let source = node_line("A", "X", 0, 1, 7).replace("tpid=0", "tpid=3");
    let mut builder = DagBuilder::new();
    GrapherLoader::new()
        .load_source(&source, Path::new("inline.dot"), &mut builder)
        .unwrap();

    // The label's taskpool wins
    let dag = builder.finish();
    assert_eq!(dag.node_by_id(0, 1, 7).unwrap().name, "A");
}

#[test]
fn test_taskpool_mismatch_rejected_when_checked() {
    let source = node_line("A", "X", 0, 1, 7).replace("tpid=0", "tpid=3");
    let mut loader = GrapherLoader::with_config(GrapherConfig::default().with_taskpool_check(true));
    let mut builder = DagBuilder::new();

    let err = loader
        .load_source(&source, Path::new("inline.dot"), &mut builder)
        .unwrap_err();
    assert!(matches!(err, LoadError::Schema { line: 1, .. }));
    assert_eq!(builder.node_count(), 0);
}

#[test]
fn test_strict_config_rejects_reused_task_id() {
    let trace = write_trace(&[
        node_line("A", "X", 0, 1, 7),
        node_line("B", "X", 0, 1, 7),
    ]);
    let mut loader = GrapherLoader::with_config(GrapherConfig::strict());

    let err = loader.load_all([trace.path()]).unwrap_err();
    match err {
        LoadError::Conflict { line, source, .. } => {
            assert_eq!(line, 2);
            assert!(matches!(source, DagError::DuplicateTaskId { .. }));
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[test]
fn test_strict_config_rejects_second_load_of_same_file() {
    let trace = two_node_trace();
    let config = GrapherConfig::strict();
    assert_eq!(config.policy.duplicate_names, DuplicatePolicy::Reject);

    let err = GrapherLoader::with_config(config)
        .load_all([trace.path(), trace.path()])
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Conflict {
            line: 2,
            source: DagError::DuplicateName { .. },
            ..
        }
    ));
}

#[test]
fn test_metrics_accumulate() {
    let trace = two_node_trace();
    let mut loader = GrapherLoader::new();
    loader.load_all([trace.path(), trace.path()]).unwrap();

    let metrics = loader.metrics();
    assert_eq!(metrics.files_loaded, 2);
    assert_eq!(metrics.lines_read, 10);
    assert_eq!(metrics.nodes_declared, 4);
    assert_eq!(metrics.edges_declared, 2);
    assert_eq!(metrics.nodes_redeclared, 2);
    assert_eq!(metrics.task_ids_reassigned, 0);
    assert_eq!(metrics.delimiter_lines(), 4);

    loader.reset_metrics();
    assert_eq!(loader.metrics().files_loaded, 0);
}

#[test]
fn test_file_summary() {
    let mut loader = GrapherLoader::new();
    let mut builder = DagBuilder::new();
    let summary = loader
        .load_file(&fixture("cholesky.1.dot"), &mut builder)
        .unwrap();

    assert_eq!(summary.line_count, 8);
    assert_eq!(summary.node_count, 2);
    assert_eq!(summary.edge_count, 4);
    assert_eq!(summary.file_path, fixture("cholesky.1.dot"));
}
