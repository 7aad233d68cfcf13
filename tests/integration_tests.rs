//! Integration tests for the Drill compiler
//!
//! Tests the full pipeline from YAML plans and step lists to workout JSON, and
//! the import/schedule flows against the in-memory platform.

use drill::plan::PlanDocument;
use drill::platform::{import_workouts, schedule_workouts, Operation, RecordingClient};
use drill::{compile_steps, compile_yaml, DrillError, StepEntry};
use serde_json::Value;
use std::fs;

fn compile_value(name: &str, source: &str, sport: Option<&str>) -> Value {
    let json = compile_yaml(name, source, sport).expect("source should compile");
    serde_json::from_str(&json).expect("output should be valid JSON")
}

fn steps(value: &Value) -> &Vec<Value> {
    value["workoutSegments"][0]["workoutSteps"]
        .as_array()
        .expect("segment should have steps")
}

fn collect_orders(steps: &[Value], out: &mut Vec<u64>) {
    for step in steps {
        out.push(step["stepOrder"].as_u64().expect("stepOrder"));
        assert_eq!(step["stepId"], step["stepOrder"]);
        if let Some(children) = step["workoutSteps"].as_array() {
            collect_orders(children, out);
        }
    }
}

#[test]
fn test_compile_interval_run() {
    let source = r#"
- warmup: 15min @H(z2)
- repeat(3):
    - run: 1000m @P(5:30-6:00)
    - recovery: 2min
- cooldown: lap
"#;
    let doc = compile_value("intervals", source, None);
    assert_eq!(doc["workoutName"], "intervals");
    assert_eq!(doc["sportType"]["sportTypeKey"], "running");
    assert_eq!(doc["subSportType"], Value::Null);

    let steps = steps(&doc);
    assert_eq!(steps.len(), 3);

    assert_eq!(steps[0]["stepType"]["stepTypeKey"], "warmup");
    assert_eq!(steps[0]["endConditionValue"], 900);
    assert_eq!(steps[0]["zoneNumber"], 2);
    assert_eq!(steps[0]["childStepId"], Value::Null);

    let repeat = &steps[1];
    assert_eq!(repeat["type"], "RepeatGroupDTO");
    assert_eq!(repeat["numberOfIterations"], 3);
    let children = repeat["workoutSteps"].as_array().unwrap();
    assert_eq!(children[0]["endCondition"]["conditionTypeKey"], "distance");
    assert_eq!(children[0]["endConditionValue"], 1000);
    assert_eq!(children[0]["targetType"]["workoutTargetTypeKey"], "pace.zone");
    // `run` takes the warmup role outside HIIT, so only the recovery is marked.
    assert_eq!(children[0]["stepType"]["stepTypeKey"], "warmup");
    assert_eq!(children[0]["childStepId"], Value::Null);
    assert_eq!(children[1]["stepType"]["stepTypeKey"], "recovery");
    assert_eq!(children[1]["childStepId"], 1);

    assert_eq!(steps[2]["endCondition"]["conditionTypeKey"], "lap.button");
    assert_eq!(steps[2]["endConditionValue"].as_f64(), Some(30.0));
}

#[test]
fn test_orders_are_dense_across_nested_repeats() {
    let source = r#"
- warmup: 10min
- repeat(2):
    - run: 400m
    - repeat(3):
        - run: 100m
        - recovery: 30sec
    - recovery: 2min
- repeatUntilTime(20min):
    - run: 1k
- cooldown: 10min
"#;
    let doc = compile_value("ladder", source, None);
    let mut orders = Vec::new();
    collect_orders(steps(&doc), &mut orders);
    let expected: Vec<u64> = (1..=orders.len() as u64).collect();
    assert_eq!(orders, expected);
    assert_eq!(orders.len(), 10);
}

#[test]
fn test_repeat_until_time() {
    let doc = compile_value("timed", "- repeatUntilTime(35min):\n    - run: lap\n", None);
    let repeat = &steps(&doc)[0];
    assert_eq!(repeat["numberOfIterations"], Value::Null);
    assert_eq!(repeat["endCondition"]["conditionTypeKey"], "time");
    assert_eq!(repeat["endConditionValue"].as_f64(), Some(2100.0));
}

#[test]
fn test_cardio_and_rest_make_strength() {
    let steps = vec![StepEntry::leaf("cardio", "lap"), StepEntry::leaf("rest", "lap")];
    let model = compile_steps("circuit", &steps, None).unwrap();
    assert_eq!(model.sport_type.record().sport_type_key, "strength_training");
}

#[test]
fn test_pike_push_up() {
    let doc = compile_value("push", "- Pike Push-up: 8 reps\n", None);
    let step = &steps(&doc)[0];
    assert_eq!(doc["sportType"]["sportTypeKey"], "strength_training");
    assert_eq!(step["category"], "PUSH_UP");
    assert_eq!(step["exerciseName"], "PIKE_PUSH_UP");
    assert_eq!(step["endCondition"]["conditionTypeKey"], "reps");
    assert_eq!(step["endConditionValue"], 8);
}

#[test]
fn test_lat_pull_down_with_description() {
    let doc = compile_value(
        "pull",
        "- 30-degree Lat Pull-down: lap | Straight Arm Pull down x 10\n",
        Some("strength"),
    );
    let step = &steps(&doc)[0];
    assert_eq!(step["category"], "PULL_UP");
    assert_eq!(step["exerciseName"], "_30_DEGREE_LAT_PULLDOWN");
    assert_eq!(step["endCondition"]["conditionTypeKey"], "lap.button");
    assert_eq!(step["description"], "Straight Arm Pull down x 10");
}

#[test]
fn test_explicit_category_annotation() {
    let doc = compile_value("custom", "- \"Sled Push [category: SLED]\": lap\n", None);
    let step = &steps(&doc)[0];
    assert_eq!(step["category"], "SLED");
    assert_eq!(step["exerciseName"], "PUSH");
}

#[test]
fn test_unmapped_exercise_compiles_without_category() {
    let doc = compile_value("odd", "- Turkish Get Up: 5 reps\n", None);
    let step = &steps(&doc)[0];
    assert_eq!(step["category"], Value::Null);
    assert_eq!(step["exerciseName"], Value::Null);
    assert_eq!(step["endConditionValue"], 5);
}

#[test]
fn test_hiit_envelope() {
    let doc = compile_value("tabata", "- repeat(8):\n    - run: 20sec\n    - rest: 10sec\n", Some("hiit"));
    assert_eq!(doc["sportType"]["sportTypeId"], 9);
    assert_eq!(doc["sportType"]["displayOrder"], 7);
    assert_eq!(doc["subSportType"], "GENERIC");
    let run = &steps(&doc)[0]["workoutSteps"][0];
    assert_eq!(run["category"], "RUN_INDOOR");
    assert_eq!(run["exerciseName"], "");
}

#[test]
fn test_estimate_fields_are_null() {
    let doc = compile_value("w", "- run: 5k\n", None);
    for key in [
        "avgTrainingSpeed",
        "estimatedDistanceUnit",
        "estimatedDurationInSecs",
        "estimatedDistanceInMeters",
        "estimateType",
    ] {
        assert!(doc.get(key).is_some(), "{} must be present", key);
        assert_eq!(doc[key], Value::Null);
    }
}

#[test]
fn test_invalid_step_name_fails_compile() {
    let err = compile_yaml("bad", "- run: 5k\n- (3): lap\n", None).unwrap_err();
    match err {
        DrillError::StepName { key, .. } => assert_eq!(key, "(3)"),
        other => panic!("expected StepName error, got {:?}", other),
    }
}

#[test]
fn test_malformed_pace_fails_compile() {
    let err = compile_yaml("bad", "- run: 1k @P(5:30)\n", None).unwrap_err();
    assert!(matches!(err, DrillError::InvalidPace { .. }), "got {:?}", err);
}

#[test]
fn test_compile_is_byte_identical() {
    let source = "- warmup: 10min\n- repeat(4):\n    - Goblet Squat: 10 reps\n    - rest: 1min\n";
    let first = compile_yaml("legs", source, None).unwrap();
    let second = compile_yaml("legs", source, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_compiles_match() {
    let source = r#"
- warmup: 10min
- repeat(3):
    - run: 800m @P(4:30-5:00)
    - recovery: 90sec
    - repeat(2):
        - Goblet Squat: 10 reps
        - rest: 30sec
- cooldown: lap
"#;
    let (first, second) = std::thread::scope(|scope| {
        let a = scope.spawn(|| compile_yaml("mixed", source, None));
        let b = scope.spawn(|| compile_yaml("mixed", source, None));
        (a.join().unwrap().unwrap(), b.join().unwrap().unwrap())
    });
    assert_eq!(first, second);
    assert_eq!(first, compile_yaml("mixed", source, None).unwrap());

    let mut orders = Vec::new();
    let doc: Value = serde_json::from_str(&first).unwrap();
    collect_orders(steps(&doc), &mut orders);
    let expected: Vec<u64> = (1..=orders.len() as u64).collect();
    assert_eq!(orders, expected);
}

#[test]
fn test_plan_file_import_and_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.yaml");
    fs::write(
        &path,
        r#"
settings:
  deleteSameNameWorkout: true
definitions:
  easy: "@H(z2)"
workouts:
  easy_run:
    - warmup: 10min $easy
    - run: 5k $easy
  legs:
    sport: strength
    steps:
      - Goblet Squat: 10 reps
schedulePlan:
  start_from: 2024-06-03
  workouts: [easy_run, rest_day, legs]
"#,
    )
    .unwrap();

    let plan = PlanDocument::load(&path).unwrap();
    let mut client = RecordingClient::with_workouts(["easy_run"]);

    let acks = import_workouts(&plan.workouts, plan.settings.delete_same_name_workout, &mut client)
        .unwrap();
    assert_eq!(acks.len(), 2);
    assert!(client.operations().contains(&Operation::Delete {
        workout_id: 1,
        workout_name: "easy_run".to_string(),
    }));

    let warmup = &client.documents()[0].workout_segments[0].workout_steps[0];
    let warmup = serde_json::to_value(warmup).unwrap();
    assert_eq!(warmup["zoneNumber"], 2);

    let schedule = plan.schedule.as_ref().unwrap();
    let scheduled = schedule_workouts(&schedule.start_from, &schedule.workouts, &mut client).unwrap();
    let days: Vec<(String, String)> = scheduled
        .into_iter()
        .map(|(name, date)| (name, date.to_string()))
        .collect();
    assert_eq!(
        days,
        vec![
            ("easy_run".to_string(), "2024-06-03".to_string()),
            ("legs".to_string(), "2024-06-05".to_string()),
        ]
    );
}

#[test]
fn test_missing_plan_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = PlanDocument::load(dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, DrillError::Plan(_)));
}
