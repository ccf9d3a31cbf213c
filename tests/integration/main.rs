//! Integration tests for Trellis
//!
//! These drive the built binary end to end: snapshots in, JSON partitions out.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn trellis(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trellis"))
        .args(args)
        .output()
        .expect("Failed to execute trellis")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "trellis failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn write(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn ids(partition: &Value) -> Vec<&str> {
    partition
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect()
}

fn snapshot_before() -> Value {
    json!({
        "nodes": [
            {"id": "A", "label": "a", "children": [{"id": "B"}, {"id": "C"}]},
            {"id": "D"}
        ],
        "edges": [
            {"id": "e1", "source": "B", "target": "C"},
            {"id": "e2", "source": "C", "target": "D"}
        ]
    })
}

fn snapshot_after() -> Value {
    json!({
        "nodes": [
            {"id": "A", "label": "a", "children": [{"id": "B"}]},
            {"id": "D"},
            {"id": "E"}
        ],
        "edges": [
            {"id": "e3", "source": "B", "target": "E"}
        ]
    })
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = trellis(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Hierarchical graph reconciliation"));

    let output = trellis(&["version"]);
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Trellis v"));
}

#[test]
fn test_diff_snapshots() {
    let dir = TempDir::new().unwrap();
    let before = write(dir.path(), "before.json", &snapshot_before());
    let after = write(dir.path(), "after.json", &snapshot_after());

    let pass = stdout_json(&trellis(&[
        "diff",
        before.to_str().unwrap(),
        after.to_str().unwrap(),
    ]));

    assert_eq!(pass["sequence"], 2);
    assert_eq!(ids(&pass["nodes"]["new"]), vec!["E"]);
    assert_eq!(ids(&pass["nodes"]["updated"]), vec!["A", "B", "D"]);
    assert_eq!(ids(&pass["nodes"]["removed"]), vec!["C"]);
    assert_eq!(ids(&pass["edges"]["new"]), vec!["e3"]);
    assert_eq!(ids(&pass["edges"]["removed"]), vec!["e1", "e2"]);
    assert_eq!(pass["nodes"]["updated"][1]["parent"], "A");
    assert_eq!(pass["nodes"]["updated"][1]["depth"], 1);
}

#[test]
fn test_render_sequential_passes() {
    let dir = TempDir::new().unwrap();
    let before = write(dir.path(), "before.json", &snapshot_before());
    let after = write(dir.path(), "after.json", &snapshot_after());

    let passes = stdout_json(&trellis(&[
        "render",
        before.to_str().unwrap(),
        after.to_str().unwrap(),
    ]));
    let passes = passes.as_array().unwrap();
    assert_eq!(passes.len(), 2);

    assert_eq!(ids(&passes[0]["nodes"]["new"]), vec!["A", "B", "C", "D"]);
    assert_eq!(ids(&passes[1]["nodes"]["removed"]), vec!["C"]);
    // stack layout gave every node a size
    for record in passes[1]["nodes"]["updated"].as_array().unwrap() {
        assert!(record["rect"]["width"].as_f64().unwrap() > 0.0);
    }
}

#[test]
fn test_render_passthrough_keeps_geometry() {
    let dir = TempDir::new().unwrap();
    let snapshot = json!({
        "nodes": [{"id": "A", "rect": {"x": 5.0, "y": 6.0, "width": 7.0, "height": 8.0}}]
    });
    let path = write(dir.path(), "snapshot.json", &snapshot);

    let passes = stdout_json(&trellis(&[
        "render",
        "--layout",
        "passthrough",
        path.to_str().unwrap(),
    ]));
    assert_eq!(
        passes[0]["nodes"]["new"][0]["rect"],
        json!({"x": 5.0, "y": 6.0, "width": 7.0, "height": 8.0})
    );
}

#[test]
fn test_route_open_plane() {
    let route = stdout_json(&trellis(&["route", "--from", "0,0", "--to", "100,0"]));

    assert_eq!(route["outcome"], "found");
    assert_eq!(
        route["points"],
        json!([{"x": 0.0, "y": 0.0}, {"x": 100.0, "y": 0.0}])
    );
}

#[test]
fn test_route_around_graph_nodes() {
    let dir = TempDir::new().unwrap();
    let graph = json!({
        "nodes": [{"id": "W", "rect": {"x": 40.0, "y": -50.0, "width": 20.0, "height": 100.0}}]
    });
    let path = write(dir.path(), "graph.json", &graph);

    let route = stdout_json(&trellis(&[
        "route",
        "--from=0,0",
        "--to=100,0",
        "--graph",
        path.to_str().unwrap(),
    ]));

    assert_eq!(route["outcome"], "found");
    let points = route["points"].as_array().unwrap();
    assert!(points.len() > 2);
    assert_eq!(points[0], json!({"x": 0.0, "y": 0.0}));
    assert_eq!(points[points.len() - 1], json!({"x": 100.0, "y": 0.0}));
}

#[test]
fn test_simplify_points_file() {
    let dir = TempDir::new().unwrap();
    let points = json!([
        {"x": 0.0, "y": 0.0},
        {"x": 50.0, "y": 1.0},
        {"x": 100.0, "y": 0.0},
        {"x": 100.0, "y": 100.0}
    ]);
    let path = write(dir.path(), "points.json", &points);

    let out = stdout_json(&trellis(&["simplify", path.to_str().unwrap()]));
    assert_eq!(
        out,
        json!([{"x": 0.0, "y": 0.0}, {"x": 100.0, "y": 0.0}, {"x": 100.0, "y": 100.0}])
    );

    let out = stdout_json(&trellis(&["simplify", "--tolerance", "0.5", path.to_str().unwrap()]));
    assert_eq!(out.as_array().unwrap().len(), 4);
}

#[test]
fn test_config_file_is_applied() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("trellis.toml");
    std::fs::write(&config, "[router]\ntolerance = 0.5\n").unwrap();
    let points = json!([
        {"x": 0.0, "y": 0.0},
        {"x": 50.0, "y": 1.0},
        {"x": 100.0, "y": 0.0}
    ]);
    let path = write(dir.path(), "points.json", &points);

    let out = stdout_json(&trellis(&[
        "--config",
        config.to_str().unwrap(),
        "simplify",
        path.to_str().unwrap(),
    ]));
    assert_eq!(out.as_array().unwrap().len(), 3);
}

#[test]
fn test_invalid_inputs_fail() {
    let dir = TempDir::new().unwrap();
    let dangling = write(
        dir.path(),
        "dangling.json",
        &json!({"nodes": [{"id": "A"}], "edges": [{"id": "e", "source": "A", "target": "Z"}]}),
    );
    let output = trellis(&["render", dangling.to_str().unwrap()]);
    assert!(!output.status.success());

    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[router]\ncell_width = 0.0\n").unwrap();
    let output = trellis(&["--config", config.to_str().unwrap(), "version"]);
    assert!(!output.status.success());

    let output = trellis(&["route", "--from", "nope", "--to", "1,1"]);
    assert!(!output.status.success());
}
