use impath_core::graph::*;
use impath_core::storage;

fn make_graph() -> ImportGraph {
    let mut builder = ImportGraphBuilder::new();
    builder
        .package(
            PackageSpec::new("example.com/app")
                .module("example.com")
                .import("example.com/app/internal/db")
                .import("fmt"),
        )
        .package(
            PackageSpec::new("example.com/app [example.com/app.test]")
                .module("example.com")
                .import("example.com/app/internal/db")
                .import_as("testing", "testing"),
        )
        .package(
            PackageSpec::new("example.com/app/internal/db")
                .module("example.com")
                .import("database/sql"),
        )
        .package(PackageSpec::new("database/sql"))
        .package(PackageSpec::new("fmt"))
        .package(PackageSpec::new("testing").import("fmt"))
        .root("example.com/app")
        .root("example.com/app [example.com/app.test]");
    builder.build().unwrap()
}

#[test]
fn test_save_and_load_preserves_structure() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("graph.json");
    let graph = make_graph();

    storage::save(&path, &graph).unwrap();
    let loaded = storage::load(&path).unwrap();

    assert_eq!(loaded.len(), graph.len());
    assert_eq!(loaded.edge_count(), graph.edge_count());
    let roots: Vec<&str> = loaded
        .roots()
        .iter()
        .map(|&r| loaded[r].id.as_str())
        .collect();
    assert_eq!(
        roots,
        vec!["example.com/app", "example.com/app [example.com/app.test]"]
    );

    for (_, pkg) in graph.iter() {
        let id = loaded.lookup(&pkg.id).unwrap();
        let other = &loaded[id];
        assert_eq!(other.path, pkg.path);
        assert_eq!(other.module, pkg.module);
        let names: Vec<&String> = other.imports.keys().collect();
        let expected: Vec<&String> = pkg.imports.keys().collect();
        assert_eq!(names, expected);
    }
}

#[test]
fn test_test_variant_survives_roundtrip() {
    let graph = make_graph();
    let json = impath_core::schema::to_json(&graph).unwrap();
    let loaded = impath_core::schema::from_json(&json).unwrap();

    let plain = loaded.lookup("example.com/app").unwrap();
    let variant = loaded
        .lookup("example.com/app [example.com/app.test]")
        .unwrap();
    assert_ne!(plain, variant);
    assert_eq!(loaded[variant].path, "example.com/app");
}

#[test]
fn test_load_nonexistent_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let result = storage::load(&tmp.path().join("missing.json"));
    assert!(result.is_err(), "loading a missing snapshot should fail");
}

#[test]
fn test_load_garbage_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("graph.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(storage::load(&path).is_err());
}
