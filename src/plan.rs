//! # Plan Documents
//!
//! A plan file bundles settings, reusable definitions, any number of workouts
//! and an optional schedule:
//!
//! ```yaml
//! settings:
//!   deleteSameNameWorkout: true
//! definitions:
//!   z2: "@H(z2)"
//! workouts:
//!   easy_run:                      # step list form
//!     - warmup: 10min $z2
//!     - run: 5k $z2
//!   legs:                          # extended form with an explicit sport
//!     sport: strength
//!     steps:
//!       - Goblet Squat: 10 reps
//! schedulePlan:
//!   start_from: 2024-06-03
//!   workouts: [easy_run, legs]
//! ```
//!
//! ## Loading
//! 1. Read the YAML into a raw value
//! 2. Substitute `$name` placeholders from `definitions`
//! 3. Deserialize the typed plan; workouts keep document order
//!
//! ## Related Modules
//! - `definitions` - Placeholder substitution
//! - `api` - Compiles each [`WorkoutPlan`]
//! - `platform` - Imports and schedules a loaded plan

use crate::api::compile_steps;
use crate::ast::StepEntry;
use crate::definitions::substitute;
use crate::error::DrillError;
use crate::model::WorkoutModel;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Flags that change how a plan is imported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Delete remote workouts sharing a name with an imported one first.
    pub delete_same_name_workout: bool,
}

/// One named workout of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutPlan {
    pub name: String,
    pub sport: Option<String>,
    pub steps: Vec<StepEntry>,
}

impl WorkoutPlan {
    /// Compile this workout into its typed model.
    pub fn compile(&self) -> Result<WorkoutModel, DrillError> {
        compile_steps(&self.name, &self.steps, self.sport.as_deref())
    }
}

/// Workouts to put on consecutive days starting at `start_from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePlan {
    /// Start date as written, `YYYY-MM-DD`.
    pub start_from: String,
    pub workouts: Vec<String>,
}

/// A fully loaded plan file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanDocument {
    pub settings: Settings,
    pub workouts: Vec<WorkoutPlan>,
    pub schedule: Option<SchedulePlan>,
}

/// Raw plan for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawPlan {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    workouts: Mapping,
    schedule_plan: Option<RawSchedulePlan>,
}

#[derive(Deserialize, Debug, Default)]
struct RawSchedulePlan {
    start_from: Option<String>,
    #[serde(default)]
    workouts: Vec<String>,
}

/// Workout value in either of its two accepted shapes.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawWorkout {
    Steps(Vec<StepEntry>),
    Extended {
        sport: Option<String>,
        #[serde(default)]
        steps: Vec<StepEntry>,
    },
}

impl PlanDocument {
    /// Load a plan from a YAML file.
    ///
    /// # Errors
    /// Returns [`DrillError::Plan`] if the file cannot be read or is not a valid
    /// plan.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DrillError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| DrillError::Plan(format!("cannot read '{}': {}", path.display(), e)))?;
        Self::parse(&source)
    }

    /// Parse a plan from YAML text.
    ///
    /// # Example
    /// ```rust
    /// use drill::plan::PlanDocument;
    ///
    /// let plan = PlanDocument::parse("workouts:\n  easy:\n    - run: 5k\n")?;
    /// assert_eq!(plan.workouts[0].name, "easy");
    /// assert!(plan.schedule.is_none());
    /// # Ok::<(), drill::DrillError>(())
    /// ```
    pub fn parse(source: &str) -> Result<Self, DrillError> {
        let value: Value =
            serde_yaml::from_str(source).map_err(|e| DrillError::Plan(e.to_string()))?;
        let value = match value {
            Value::Mapping(_) => value,
            Value::Null => return Ok(Self::default()),
            _ => return Err(DrillError::Plan("plan must be a mapping".to_string())),
        };

        let definitions = match value.get("definitions") {
            Some(Value::Mapping(definitions)) => Some(definitions.clone()),
            Some(Value::Null) | None => None,
            Some(_) => {
                return Err(DrillError::Plan("definitions must be a mapping".to_string()))
            }
        };
        let value = match definitions {
            Some(definitions) => {
                debug!(count = definitions.len(), "substituting definitions");
                substitute(&value, &definitions)
            }
            None => value,
        };

        let raw: RawPlan =
            serde_yaml::from_value(value).map_err(|e| DrillError::Plan(e.to_string()))?;

        let workouts = raw
            .workouts
            .into_iter()
            .map(|(key, value)| workout_plan(key, value))
            .collect::<Result<Vec<_>, _>>()?;

        let schedule = raw.schedule_plan.and_then(|raw| match raw.start_from {
            Some(start_from) if !raw.workouts.is_empty() => Some(SchedulePlan {
                start_from,
                workouts: raw.workouts,
            }),
            _ => {
                warn!("schedulePlan is missing 'start_from' or 'workouts', ignoring it");
                None
            }
        });

        Ok(Self { settings: raw.settings, workouts, schedule })
    }

    /// Look up a workout by name.
    pub fn workout(&self, name: &str) -> Option<&WorkoutPlan> {
        self.workouts.iter().find(|w| w.name == name)
    }
}

fn workout_plan(key: Value, value: Value) -> Result<WorkoutPlan, DrillError> {
    let name = match key {
        Value::String(name) => name,
        other => {
            return Err(DrillError::Plan(format!(
                "workout names must be strings, found {:?}",
                other
            )))
        }
    };
    let raw: RawWorkout = serde_yaml::from_value(value).map_err(|e| {
        DrillError::Plan(format!(
            "workout '{}' must be a step list or a mapping with 'steps': {}",
            name, e
        ))
    })?;
    Ok(match raw {
        RawWorkout::Steps(steps) => WorkoutPlan { name, sport: None, steps },
        RawWorkout::Extended { sport, steps } => WorkoutPlan { name, sport, steps },
    })
}
