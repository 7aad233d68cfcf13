//! # Workout Schema Constants
//!
//! Closed sets of values the workout platform expects: sport types, step types,
//! end-condition types, target types and distance units.
//!
//! The platform never accepts a bare name for these. Each variant is sent as
//! its full attribute record (numeric id, string key, display order and, for
//! condition types, a displayable flag). Each `record()` is an exhaustive
//! match; serializing a variant writes its record.
//!
//! ```rust
//! use drill::constants::SportType;
//!
//! let json = serde_json::to_string(&SportType::Strength).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"sportTypeId":5,"sportTypeKey":"strength_training","displayOrder":5}"#
//! );
//! ```

use serde::{Serialize, Serializer};

/// Multiplier turning a pace in minutes per kilometer into the speed value the
/// platform stores for pace targets (`PACE_CONST / minutes`).
pub const PACE_CONST: f64 = 16.66666;

/// Value the platform uses as the end-condition value of lap-button steps.
pub const LAP_BUTTON_VALUE: f64 = 30.0;

/// Date format used by schedule plans.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sub-sport marker attached to HIIT workouts.
pub const HIIT_SUB_SPORT: &str = "GENERIC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SportType {
    Running,
    Strength,
    Hiit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SportTypeRecord {
    pub sport_type_id: u32,
    pub sport_type_key: &'static str,
    pub display_order: u32,
}

impl SportType {
    pub fn record(self) -> SportTypeRecord {
        let (sport_type_id, sport_type_key, display_order) = match self {
            SportType::Running => (1, "running", 1),
            SportType::Strength => (5, "strength_training", 5),
            SportType::Hiit => (9, "hiit", 7),
        };
        SportTypeRecord { sport_type_id, sport_type_key, display_order }
    }

    /// Normalize a user supplied sport name. Accepts `RUN`/`RUNNING`,
    /// `STRENGTH`/`STRENGTH_TRAINING` and `HIIT` in any case.
    pub fn from_synonym(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "RUN" | "RUNNING" => Some(SportType::Running),
            "STRENGTH" | "STRENGTH_TRAINING" => Some(SportType::Strength),
            "HIIT" => Some(SportType::Hiit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepType {
    Warmup,
    Cooldown,
    Interval,
    Recovery,
    Rest,
    Repeat,
    Exercise,
    Cardio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTypeRecord {
    pub step_type_id: u32,
    pub step_type_key: &'static str,
    pub display_order: u32,
}

impl StepType {
    pub fn record(self) -> StepTypeRecord {
        let (step_type_id, step_type_key) = match self {
            StepType::Warmup => (1, "warmup"),
            StepType::Cooldown => (2, "cooldown"),
            StepType::Interval => (3, "interval"),
            StepType::Recovery => (4, "recovery"),
            StepType::Rest => (5, "rest"),
            StepType::Repeat => (6, "repeat"),
            StepType::Exercise => (7, "exercise"),
            StepType::Cardio => (9, "cardio"),
        };
        StepTypeRecord { step_type_id, step_type_key, display_order: step_type_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionType {
    LapButton,
    Time,
    Distance,
    IterationEnds,
    Reps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionTypeRecord {
    pub condition_type_id: u32,
    pub condition_type_key: &'static str,
    pub display_order: u32,
    pub displayable: bool,
}

impl ConditionType {
    pub fn record(self) -> ConditionTypeRecord {
        let (condition_type_id, condition_type_key, displayable) = match self {
            ConditionType::LapButton => (1, "lap.button", true),
            ConditionType::Time => (2, "time", true),
            ConditionType::Distance => (3, "distance", true),
            ConditionType::IterationEnds => (7, "iterations", false),
            ConditionType::Reps => (10, "reps", true),
        };
        ConditionTypeRecord {
            condition_type_id,
            condition_type_key,
            display_order: condition_type_id,
            displayable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    NoTarget,
    Pace,
    HeartRateZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetTypeRecord {
    pub workout_target_type_id: u32,
    pub workout_target_type_key: &'static str,
    pub display_order: u32,
}

impl TargetType {
    pub fn record(self) -> TargetTypeRecord {
        let (workout_target_type_id, workout_target_type_key) = match self {
            TargetType::NoTarget => (1, "no.target"),
            TargetType::Pace => (6, "pace.zone"),
            TargetType::HeartRateZone => (4, "heart.rate.zone"),
        };
        TargetTypeRecord {
            workout_target_type_id,
            workout_target_type_key,
            display_order: workout_target_type_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceUnit {
    Kilometer,
    Mile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceUnitRecord {
    pub unit_key: &'static str,
}

impl DistanceUnit {
    pub fn record(self) -> DistanceUnitRecord {
        let unit_key = match self {
            DistanceUnit::Kilometer => "kilometer",
            DistanceUnit::Mile => "mile",
        };
        DistanceUnitRecord { unit_key }
    }
}

macro_rules! serialize_as_record {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    self.record().serialize(serializer)
                }
            }
        )*
    };
}

serialize_as_record!(SportType, StepType, ConditionType, TargetType, DistanceUnit);
