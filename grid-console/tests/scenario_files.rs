use grid_console::config::{self, Step};
use std::io::Write;
use std::path::PathBuf;

#[test]
fn bundled_scenarios_parse() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    let demo = config::load(&dir.join("demo.json5")).unwrap();

    assert_eq!(demo.grid.name, "demo");
    assert_eq!(demo.grid.latency_ms, 2);
    assert_eq!(
        demo.steps.first(),
        Some(&Step::Set {
            counter: "hits".to_string(),
            value: 5
        })
    );
}

#[test]
fn unknown_operation_is_rejected() {
    let error = config::parse(r#"{ steps: [{ op: "explode", counter: "c" }] }"#).unwrap_err();
    assert!(format!("{error:#}").contains("explode"), "{error:#}");
}

#[test]
fn missing_operation_field_is_rejected() {
    assert!(config::parse(r#"{ steps: [{ counter: "c" }] }"#).is_err());
}

#[test]
fn unknown_top_level_field_is_rejected() {
    assert!(config::parse(r#"{ steps: [], extra: true }"#).is_err());
}

#[test]
fn optional_ttl_defaults_to_none() {
    let scenario = config::parse(
        r#"{ steps: [
            { op: "map_set", map: "m", key: "k", value: "v" },
            { op: "map_put", map: "m", key: "k", value: "v", ttl_ms: 0 },
        ] }"#,
    )
    .unwrap();

    assert_eq!(
        scenario.steps,
        vec![
            Step::MapSet {
                map: "m".to_string(),
                key: "k".to_string(),
                value: "v".to_string(),
                ttl_ms: None,
            },
            Step::MapPut {
                map: "m".to_string(),
                key: "k".to_string(),
                value: "v".to_string(),
                ttl_ms: Some(0),
            },
        ]
    );
}

#[test]
fn load_reads_json5_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "// comment\n{{ grid: {{ name: 'disk', default_ttl_ms: 100 }}, steps: [{{ op: 'sleep', ms: 1 }}] }}"
    )
    .unwrap();

    let scenario = config::load(file.path()).unwrap();
    assert_eq!(scenario.grid.name, "disk");
    assert_eq!(scenario.grid.default_ttl_ms, Some(100));
    assert_eq!(scenario.steps, vec![Step::Sleep { ms: 1 }]);
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json5");

    let error = config::load(&missing).unwrap_err();
    assert!(format!("{error:#}").contains("absent.json5"));
}
