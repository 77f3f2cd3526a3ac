use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tileweave_tiles::{load_from_file, Direction, LoadError};

const RULES: &str = r#"(
    tiles: [
        (name: "road", weight: 2.0, edges: Explicit((
            up: ["road", "field"],
            right: ["road", "field"],
            down: ["road", "field"],
            left: ["road", "field"],
        ))),
        (name: "field", weight: 1.0, edges: Explicit((
            up: ["field", "road"],
            right: ["field", "road"],
            down: ["field", "road"],
            left: ["field", "road"],
        ))),
    ],
)"#;

#[test]
fn loads_rules_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.ron");
    fs::write(&path, RULES).unwrap();

    let set = load_from_file(&path).expect("file should load");
    assert_eq!(set.num_tiles(), 2);
    let road = set.id_of("road").unwrap();
    let field = set.id_of("field").unwrap();
    assert!(set.is_valid_neighbor(road, field, Direction::Left));
    assert_eq!(set.weight(road), Some(2.0));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = load_from_file(Path::new("/definitely/not/here.ron"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn duplicate_names_are_invalid_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.ron");
    fs::write(
        &path,
        r#"(
            tiles: [
                (name: "x", weight: 1.0, edges: Explicit(())),
                (name: "x", weight: 1.0, edges: Explicit(())),
            ],
        )"#,
    )
    .unwrap();

    let result = load_from_file(&path);
    assert!(matches!(result, Err(LoadError::InvalidData(_))));
}
