use std::fs;
use structlist_cli::commands::verify;
use structlist_cli::{script, ElementKind, FieldSpec};
use tempfile::tempdir;

const MIXED: &str = r#"{
    "initial": [4, 1, 3],
    "steps": [
        {"op": "call", "method": "append", "args": [null]},
        {"op": "call", "method": "extend", "args": [[5, "x", 6]]},
        {"op": "set_item", "key": {"start": 0, "stop": 2}, "value": [0, 0.5]},
        {"op": "set_item", "key": {"step": 2}, "value": [1]},
        {"op": "del_item", "key": {"step": 0}},
        {"op": "call", "method": "remove", "args": [3]},
        {"op": "call", "method": "pop", "args": [10]},
        {"op": "call", "method": "sort"},
        {"op": "imul", "value": 3},
        {"op": "call", "method": "reverse"}
    ]
}"#;

#[test]
fn test_verify_reports_clean_run() {
    let script = script::parse(MIXED).unwrap();

    for kind in [ElementKind::Int, ElementKind::Float, ElementKind::Object, ElementKind::Standalone] {
        let report = verify::check(&script, &FieldSpec::new(kind)).unwrap();
        assert_eq!(report.steps, 10);
        assert!(report.is_clean(), "{:?}: {:?}", kind, report.violations);
    }
}

#[test]
fn test_verify_counts_rejections() {
    let script = script::parse(MIXED).unwrap();
    let report = verify::check(&script, &FieldSpec::new(ElementKind::Int)).unwrap();

    // append(None), extend with "x", slice with 0.5, size mismatch, zero step, pop(10)
    assert_eq!(report.rejected, 6);
}

#[test]
fn test_verify_execute_on_file() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("mixed.json");
    fs::write(&input_path, MIXED).unwrap();

    verify::execute(input_path.to_str().unwrap(), &FieldSpec::new(ElementKind::Int)).unwrap();
}

#[test]
fn test_verify_rejects_malformed_script() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("broken.json");
    fs::write(&input_path, "{ not json").unwrap();

    assert!(verify::execute(input_path.to_str().unwrap(), &FieldSpec::new(ElementKind::Int)).is_err());
}
