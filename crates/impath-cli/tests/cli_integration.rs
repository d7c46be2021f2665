//! Integration tests for the `impath` binary, driven through saved graphs so
//! no Go toolchain is needed.

use impath_core::graph::*;
use std::path::Path;
use std::process::{Command, Output};

fn make_graph() -> ImportGraph {
    let mut builder = ImportGraphBuilder::new();
    builder
        .package(
            PackageSpec::new("example.com/cmd/api")
                .module("example.com")
                .import("example.com/internal/db")
                .import("example.com/internal/log"),
        )
        .package(
            PackageSpec::new("example.com/internal/db")
                .module("example.com")
                .import("github.com/lib/pq")
                .import("example.com/internal/log"),
        )
        .package(PackageSpec::new("example.com/internal/log").module("example.com"))
        .package(PackageSpec::new("github.com/lib/pq").module("github.com/lib/pq"))
        .root("example.com/cmd/api");
    builder.build().unwrap()
}

fn write_snapshot(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("graph.json");
    impath_core::storage::save(&path, &make_graph()).unwrap();
    path
}

fn impath(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_impath"))
        .arg("-C")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("IMPATH_COLOR")
        .output()
        .unwrap()
}

#[test]
fn test_tree_output() {
    let tmp = tempfile::tempdir().unwrap();
    write_snapshot(tmp.path());

    let out = impath(
        tmp.path(),
        &["--graph", "graph.json", "--pattern", "lib/pq", "--color=never"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "example.com\n\
         └── example.com/cmd/api\n\
         \u{20}   └── example.com/internal/db\n\
         \u{20}       └── github.com/lib/pq\n"
    );
}

#[test]
fn test_log_package_reached_twice() {
    let tmp = tempfile::tempdir().unwrap();
    write_snapshot(tmp.path());

    let out = impath(
        tmp.path(),
        &["--graph", "graph.json", "-p", "internal/log$", "--color=never"],
    );
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert_eq!(text.matches("example.com/internal/log").count(), 2);
}

#[test]
fn test_json_output() {
    let tmp = tempfile::tempdir().unwrap();
    write_snapshot(tmp.path());

    let out = impath(
        tmp.path(),
        &["--graph", "graph.json", "-p", "lib/pq", "--format", "json"],
    );
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value[0]["kind"], "module");
    assert_eq!(value[0]["path"], "example.com");
    assert_eq!(value[0]["children"][0]["path"], "example.com/cmd/api");
}

#[test]
fn test_no_match_prints_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    write_snapshot(tmp.path());

    let out = impath(tmp.path(), &["--graph", "graph.json", "-p", "^nothing$"]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn test_no_match_json_is_empty_array() {
    let tmp = tempfile::tempdir().unwrap();
    write_snapshot(tmp.path());

    let out = impath(
        tmp.path(),
        &["--graph", "graph.json", "-p", "^nothing$", "--format", "json"],
    );
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn test_invalid_pattern_fails_fast() {
    let tmp = tempfile::tempdir().unwrap();

    // No snapshot exists; the pattern error must come first.
    let out = impath(tmp.path(), &["--graph", "graph.json", "-p", "(unclosed"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid --pattern"));
}

#[test]
fn test_missing_snapshot_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let out = impath(tmp.path(), &["--graph", "missing.json", "-p", "x"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to load import graph"));
}

#[test]
fn test_save_graph_writes_loadable_snapshot() {
    let tmp = tempfile::tempdir().unwrap();
    write_snapshot(tmp.path());
    let copy = tmp.path().join("out").join("copy.json");

    // Relative like --graph, so both resolve against -C.
    let out = impath(
        tmp.path(),
        &[
            "--graph",
            "graph.json",
            "--save-graph",
            "out/copy.json",
            "-p",
            "^$",
        ],
    );
    assert!(out.status.success());
    let loaded = impath_core::storage::load(&copy).unwrap();
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded.roots().len(), 1);
}

#[test]
fn test_config_enables_color() {
    let tmp = tempfile::tempdir().unwrap();
    write_snapshot(tmp.path());
    std::fs::write(
        tmp.path().join(".impath.toml"),
        "[render]\ncolor = \"always\"\n",
    )
    .unwrap();

    let out = impath(tmp.path(), &["--graph", "graph.json", "-p", "lib/pq"]);
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.contains("\u{1b}["));
    // Only the matched leaf is highlighted.
    assert_eq!(text.lines().filter(|l| l.contains("\u{1b}[")).count(), 1);
}

#[test]
fn test_graph_conflicts_with_packages() {
    let tmp = tempfile::tempdir().unwrap();
    let out = impath(tmp.path(), &["--graph", "graph.json", "./..."]);
    assert!(!out.status.success());
}
