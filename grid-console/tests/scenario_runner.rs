use grid_console::config::{self, GridSection};
use grid_console::scenario::{Outcome, ScenarioRunner, StepReport};
use integration_test_utils::init_logging;
use serde_json::json;

async fn run(source: &str) -> Vec<StepReport> {
    init_logging();
    let scenario = config::parse(source).unwrap();
    let runner = ScenarioRunner::start(&scenario.grid, None).unwrap();
    runner.run_all(&scenario.steps).await
}

fn outcomes(reports: &[StepReport]) -> Vec<Outcome> {
    reports.iter().map(|report| report.outcome.clone()).collect()
}

#[tokio::test]
async fn counter_steps_report_values_and_completions() {
    let reports = run(r#"{ steps: [
        { op: "set", counter: "c", value: 5 },
        { op: "add_and_get", counter: "c", delta: 3 },
        { op: "compare_and_set", counter: "c", expect: 8, update: 10 },
        { op: "compare_and_set", counter: "c", expect: 8, update: 20 },
        { op: "get_and_increment", counter: "c" },
        { op: "decrement_and_get", counter: "c" },
        { op: "get_and_add", counter: "c", delta: 2 },
        { op: "get_and_set", counter: "c", value: 1 },
        { op: "increment_and_get", counter: "c" },
        { op: "alter_add", counter: "c", delta: 8 },
        { op: "alter_and_get_add", counter: "c", delta: 1 },
        { op: "get_and_alter_add", counter: "c", delta: -10 },
        { op: "apply_multiply", counter: "c", factor: 4 },
        { op: "get", counter: "c" },
    ] }"#)
    .await;

    assert_eq!(
        outcomes(&reports),
        vec![
            Outcome::Completed(true),
            Outcome::Value(json!(8)),
            Outcome::Value(json!(true)),
            Outcome::Value(json!(false)),
            Outcome::Value(json!(10)),
            Outcome::Value(json!(10)),
            Outcome::Value(json!(10)),
            Outcome::Value(json!(12)),
            Outcome::Value(json!(2)),
            Outcome::Completed(true),
            Outcome::Value(json!(11)),
            Outcome::Value(json!(11)),
            Outcome::Value(json!(4)),
            Outcome::Value(json!(1)),
        ]
    );
    assert_eq!(reports[1].op, "add_and_get");
    assert_eq!(reports[13].step, 13);
}

#[tokio::test]
async fn map_steps_report_previous_values() {
    let reports = run(r#"{ steps: [
        { op: "map_get", map: "m", key: "k" },
        { op: "map_put", map: "m", key: "k", value: "v" },
        { op: "map_get", map: "m", key: "k" },
        { op: "map_append", map: "m", key: "k", suffix: "!" },
        { op: "map_remove", map: "m", key: "k" },
        { op: "map_set", map: "m", key: "t", value: "x", ttl_ms: 20 },
        { op: "sleep", ms: 80 },
        { op: "map_get", map: "m", key: "t" },
    ] }"#)
    .await;

    assert_eq!(
        outcomes(&reports),
        vec![
            Outcome::Value(json!(null)),
            Outcome::Value(json!(null)),
            Outcome::Value(json!("v")),
            Outcome::Value(json!("v!")),
            Outcome::Value(json!("v!")),
            Outcome::Completed(true),
            Outcome::Completed(true),
            Outcome::Value(json!(null)),
        ]
    );
}

#[tokio::test]
async fn reports_serialize_as_flat_json_lines() {
    let reports = run(r#"{ steps: [
        { op: "increment_and_get", counter: "c" },
        { op: "set", counter: "c", value: 0 },
    ] }"#)
    .await;

    assert_eq!(
        serde_json::to_value(&reports[0]).unwrap(),
        json!({ "step": 0, "op": "increment_and_get", "value": 1 })
    );
    assert_eq!(
        serde_json::to_value(&reports[1]).unwrap(),
        json!({ "step": 1, "op": "set", "completed": true })
    );
}

#[tokio::test]
async fn grid_errors_are_reported_and_the_run_continues() {
    init_logging();
    let runner = ScenarioRunner::start(&GridSection::default(), None).unwrap();
    runner
        .grid()
        .delegate()
        .inject_failure(rx_grid::GridError::fail_with_code(
            rx_grid::ErrorCode::Unavailable,
            "partition lost",
        ));
    let scenario = config::parse(
        r#"{ steps: [
            { op: "get", counter: "c" },
            { op: "get", counter: "c" },
        ] }"#,
    )
    .unwrap();

    let reports = runner.run_all(&scenario.steps).await;
    assert_eq!(
        serde_json::to_value(&reports[0]).unwrap(),
        json!({
            "step": 0,
            "op": "get",
            "error": { "code": "unavailable", "message": "partition lost" }
        })
    );
    assert_eq!(reports[1].outcome, Outcome::Value(json!(0)));
}
