//! # Workout Document Generation
//!
//! This module converts a [`WorkoutModel`] into the JSON document the workout
//! platform imports.
//!
//! ## Schema Rules
//! - Every declared field is written, unset ones as `null`. Some consumers tell
//!   "missing" apart from "null", so nothing is skipped.
//! - Sport, step, condition and target types are written as their full
//!   attribute records, never as bare names.
//! - Each step carries a `type` discriminator: `ExecutableStepDTO` for leaves,
//!   `RepeatGroupDTO` for repeat groups.
//! - `stepId` and `stepOrder` are both the step's order.
//! - Leaf `endConditionValue` is an integer, except lap-button steps which use
//!   the float `30.0`. Time-based repeats carry their seconds as a float.
//!
//! ## Example Output
//! ```json
//! {
//!   "workoutName": "easy_run",
//!   "sportType": {"sportTypeId": 1, "sportTypeKey": "running", "displayOrder": 1},
//!   "subSportType": null,
//!   "workoutSegments": [{
//!     "segmentOrder": 1,
//!     "sportType": {"sportTypeId": 1, "sportTypeKey": "running", "displayOrder": 1},
//!     "workoutSteps": [{"stepId": 1, "stepOrder": 1, "type": "ExecutableStepDTO", ...}]
//!   }],
//!   "avgTrainingSpeed": null,
//!   ...
//! }
//! ```

use crate::constants::{ConditionType, DistanceUnit, SportType, StepType, TargetType, LAP_BUTTON_VALUE};
use crate::error::DrillError;
use crate::model::{EndCondition, RepeatEnd, RepeatStep, Step, Target, WorkoutModel, WorkoutSegment, WorkoutStep};
use serde::Serialize;

pub const EXECUTABLE_STEP_TYPE: &str = "ExecutableStepDTO";
pub const REPEAT_GROUP_TYPE: &str = "RepeatGroupDTO";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDocument {
    pub workout_name: String,
    pub sport_type: SportType,
    pub sub_sport_type: Option<String>,
    pub workout_segments: Vec<SegmentDocument>,
    pub avg_training_speed: Option<f64>,
    pub estimated_distance_unit: Option<DistanceUnit>,
    pub estimated_duration_in_secs: Option<u32>,
    pub estimated_distance_in_meters: Option<f64>,
    pub estimate_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDocument {
    pub segment_order: u32,
    pub sport_type: SportType,
    pub workout_steps: Vec<StepDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepDocument {
    Executable(ExecutableStepDocument),
    RepeatGroup(RepeatGroupDocument),
}

/// Whole numbers for counted conditions, floats for lap presses and timed repeats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Whole(u32),
    Fractional(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableStepDocument {
    pub step_id: u32,
    pub step_order: u32,
    pub step_type: StepType,
    pub end_condition: ConditionType,
    pub end_condition_value: ConditionValue,
    pub preferred_end_condition_unit: Option<DistanceUnit>,
    #[serde(rename = "type")]
    pub dto_type: &'static str,
    pub target_type: Option<TargetType>,
    pub target_value_one: Option<f64>,
    pub target_value_two: Option<f64>,
    pub zone_number: Option<u8>,
    pub target_value_unit: Option<String>,
    pub step_audio_note: Option<String>,
    pub child_step_id: Option<u32>,
    pub category: Option<String>,
    pub exercise_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatGroupDocument {
    pub step_id: u32,
    pub step_order: u32,
    pub workout_steps: Vec<StepDocument>,
    pub number_of_iterations: Option<u32>,
    pub step_type: StepType,
    pub smart_repeat: bool,
    pub child_step_id: u32,
    #[serde(rename = "type")]
    pub dto_type: &'static str,
    pub skip_last_rest_step: bool,
    pub end_condition: ConditionType,
    pub end_condition_value: Option<f64>,
}

/// Convert a workout model into its document form.
pub fn to_document(model: &WorkoutModel) -> WorkoutDocument {
    WorkoutDocument {
        workout_name: model.name.clone(),
        sport_type: model.sport_type,
        sub_sport_type: model.sub_sport_type.clone(),
        workout_segments: model.segments.iter().map(segment_document).collect(),
        avg_training_speed: model.estimates.avg_training_speed,
        estimated_distance_unit: model.estimates.estimated_distance_unit,
        estimated_duration_in_secs: model.estimates.estimated_duration_in_secs,
        estimated_distance_in_meters: model.estimates.estimated_distance_in_meters,
        estimate_type: model.estimates.estimate_type.clone(),
    }
}

/// Serialize a workout model to compact JSON.
///
/// # Errors
/// Returns [`DrillError::Serialize`] if the document cannot be written.
pub fn to_json(model: &WorkoutModel) -> Result<String, DrillError> {
    serde_json::to_string(&to_document(model)).map_err(|e| DrillError::Serialize(e.to_string()))
}

/// Serialize a workout model to indented JSON.
pub fn to_json_pretty(model: &WorkoutModel) -> Result<String, DrillError> {
    serde_json::to_string_pretty(&to_document(model))
        .map_err(|e| DrillError::Serialize(e.to_string()))
}

fn segment_document(segment: &WorkoutSegment) -> SegmentDocument {
    SegmentDocument {
        segment_order: segment.segment_order,
        sport_type: segment.sport_type,
        workout_steps: segment.steps.iter().map(step_document).collect(),
    }
}

fn step_document(step: &Step) -> StepDocument {
    match step {
        Step::Executable(step) => StepDocument::Executable(executable_document(step)),
        Step::Repeat(repeat) => StepDocument::RepeatGroup(repeat_document(repeat)),
    }
}

fn executable_document(step: &WorkoutStep) -> ExecutableStepDocument {
    let end_condition_value = match step.end_condition {
        EndCondition::Time(value) | EndCondition::Distance(value) | EndCondition::Reps(value) => {
            ConditionValue::Whole(value)
        }
        EndCondition::LapButton => ConditionValue::Fractional(LAP_BUTTON_VALUE),
    };

    let (target_value_one, target_value_two, zone_number) = match step.target {
        Some(Target::Pace { low, high }) => (Some(low), Some(high), None),
        Some(Target::HeartRateZone(zone)) => (None, None, Some(zone)),
        Some(Target::NoTarget) | None => (None, None, None),
    };

    ExecutableStepDocument {
        step_id: step.order,
        step_order: step.order,
        step_type: step.step_type,
        end_condition: step.end_condition.condition_type(),
        end_condition_value,
        preferred_end_condition_unit: None,
        dto_type: EXECUTABLE_STEP_TYPE,
        target_type: step.target.as_ref().map(Target::target_type),
        target_value_one,
        target_value_two,
        zone_number,
        target_value_unit: None,
        step_audio_note: None,
        child_step_id: step.child_step_id,
        category: step.category.as_ref().map(|c| c.as_str().to_string()),
        exercise_name: step.exercise_name.clone(),
        description: step.description.clone(),
    }
}

fn repeat_document(repeat: &RepeatStep) -> RepeatGroupDocument {
    let (end_condition, end_condition_value) = match repeat.end {
        RepeatEnd::Iterations(_) => (ConditionType::IterationEnds, None),
        RepeatEnd::Time(seconds) => (ConditionType::Time, Some(seconds)),
    };

    RepeatGroupDocument {
        step_id: repeat.order,
        step_order: repeat.order,
        workout_steps: repeat.steps.iter().map(step_document).collect(),
        number_of_iterations: repeat.iterations(),
        step_type: StepType::Repeat,
        smart_repeat: false,
        child_step_id: 1,
        dto_type: REPEAT_GROUP_TYPE,
        skip_last_rest_step: false,
        end_condition,
        end_condition_value,
    }
}
