//! # Workout Model
//!
//! Typed output of the compiler, one level above the JSON document the
//! platform receives.
//!
//! ## Type Hierarchy
//! ```text
//! WorkoutModel
//!   ├── name, sport_type, sub_sport_type
//!   ├── estimates (all unset by the compiler)
//!   └── Vec<WorkoutSegment>            (always exactly one)
//!         └── Vec<Step>
//!               ├── Executable(WorkoutStep)
//!               │     ├── order, step_type
//!               │     ├── end_condition: EndCondition
//!               │     ├── target: Option<Target>
//!               │     ├── category / exercise_name
//!               │     ├── description
//!               │     └── child_step_id (inside repeats)
//!               └── Repeat(RepeatStep)
//!                     ├── order
//!                     ├── end: RepeatEnd (Iterations | Time)
//!                     └── Vec<Step>
//! ```
//!
//! ## Ordering
//! `order` is both the step id and the step order. Across one compiled tree the
//! orders are exactly `1..=node_count`: a repeat takes its order before any of
//! its children.

use crate::constants::{ConditionType, DistanceUnit, SportType, StepType, TargetType};
use crate::exercise::ExerciseCategory;

/// How a leaf step ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndCondition {
    /// Duration in seconds.
    Time(u32),
    /// Distance in meters.
    Distance(u32),
    /// Manual lap press.
    LapButton,
    /// Repetition count.
    Reps(u32),
}

impl EndCondition {
    pub fn condition_type(&self) -> ConditionType {
        match self {
            EndCondition::Time(_) => ConditionType::Time,
            EndCondition::Distance(_) => ConditionType::Distance,
            EndCondition::LapButton => ConditionType::LapButton,
            EndCondition::Reps(_) => ConditionType::Reps,
        }
    }
}

/// Intensity target of a leaf step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    NoTarget,
    /// Speed bounds derived from a pace range, in the order the paces were written.
    Pace { low: f64, high: f64 },
    HeartRateZone(u8),
}

impl Target {
    pub fn target_type(&self) -> TargetType {
        match self {
            Target::NoTarget => TargetType::NoTarget,
            Target::Pace { .. } => TargetType::Pace,
            Target::HeartRateZone(_) => TargetType::HeartRateZone,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutStep {
    pub order: u32,
    pub step_type: StepType,
    pub end_condition: EndCondition,
    pub target: Option<Target>,
    pub category: Option<ExerciseCategory>,
    pub exercise_name: Option<String>,
    pub description: Option<String>,
    /// Set to 1 on steps nested in a repeat, except warmup and cooldown.
    pub child_step_id: Option<u32>,
}

/// How a repeat group terminates. The two modes never mix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepeatEnd {
    Iterations(u32),
    /// Repeat until this many seconds have elapsed.
    Time(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStep {
    pub order: u32,
    pub end: RepeatEnd,
    pub steps: Vec<Step>,
}

impl RepeatStep {
    pub fn iterations(&self) -> Option<u32> {
        match self.end {
            RepeatEnd::Iterations(n) => Some(n),
            RepeatEnd::Time(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Executable(WorkoutStep),
    Repeat(RepeatStep),
}

impl Step {
    pub fn order(&self) -> u32 {
        match self {
            Step::Executable(step) => step.order,
            Step::Repeat(repeat) => repeat.order,
        }
    }

    pub fn as_executable(&self) -> Option<&WorkoutStep> {
        match self {
            Step::Executable(step) => Some(step),
            Step::Repeat(_) => None,
        }
    }

    pub fn as_repeat(&self) -> Option<&RepeatStep> {
        match self {
            Step::Executable(_) => None,
            Step::Repeat(repeat) => Some(repeat),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSegment {
    pub segment_order: u32,
    pub sport_type: SportType,
    pub steps: Vec<Step>,
}

impl WorkoutSegment {
    /// Orders of every node in depth-first order, repeats before their children.
    pub fn step_orders(&self) -> Vec<u32> {
        fn walk(steps: &[Step], out: &mut Vec<u32>) {
            for step in steps {
                out.push(step.order());
                if let Step::Repeat(repeat) = step {
                    walk(&repeat.steps, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.steps, &mut out);
        out
    }
}

/// Estimate fields of the workout envelope. The compiler leaves them unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Estimates {
    pub avg_training_speed: Option<f64>,
    pub estimated_distance_unit: Option<DistanceUnit>,
    pub estimated_duration_in_secs: Option<u32>,
    pub estimated_distance_in_meters: Option<f64>,
    pub estimate_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutModel {
    pub name: String,
    pub sport_type: SportType,
    pub sub_sport_type: Option<String>,
    pub segments: Vec<WorkoutSegment>,
    pub estimates: Estimates,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(order: u32) -> Step {
        Step::Executable(WorkoutStep {
            order,
            step_type: StepType::Interval,
            end_condition: EndCondition::LapButton,
            target: None,
            category: None,
            exercise_name: None,
            description: None,
            child_step_id: None,
        })
    }

    #[test]
    fn test_step_orders_visit_repeat_before_children() {
        let segment = WorkoutSegment {
            segment_order: 1,
            sport_type: SportType::Running,
            steps: vec![
                leaf(1),
                Step::Repeat(RepeatStep {
                    order: 2,
                    end: RepeatEnd::Iterations(3),
                    steps: vec![leaf(3), leaf(4)],
                }),
                leaf(5),
            ],
        };
        assert_eq!(segment.step_orders(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_end_condition_types() {
        assert_eq!(EndCondition::Time(60).condition_type(), ConditionType::Time);
        assert_eq!(EndCondition::Distance(400).condition_type(), ConditionType::Distance);
        assert_eq!(EndCondition::LapButton.condition_type(), ConditionType::LapButton);
        assert_eq!(EndCondition::Reps(8).condition_type(), ConditionType::Reps);
    }

    #[test]
    fn test_time_repeat_has_no_iterations() {
        let repeat = RepeatStep { order: 1, end: RepeatEnd::Time(600.0), steps: vec![] };
        assert_eq!(repeat.iterations(), None);
        let counted = RepeatStep { order: 1, end: RepeatEnd::Iterations(4), steps: vec![] };
        assert_eq!(counted.iterations(), Some(4));
    }
}
