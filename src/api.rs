//! # Public API
//!
//! Main entry points of the Drill compiler library.
//!
//! ## Compilation Functions
//!
//! - [`compile_steps()`] - Steps to the typed [`WorkoutModel`]
//! - [`compile()`] - Steps to the JSON workout document
//! - [`compile_yaml()`] - YAML step list to the JSON workout document
//!
//! ## Pipeline
//! 1. Classify the sport (explicit synonym or read-only scan of the steps)
//! 2. Build the step tree with a fresh order cursor
//! 3. Wrap the tree in a single segment and the workout envelope
//! 4. Serialize (for [`compile()`] and [`compile_yaml()`])
//!
//! Every call owns its own cursor, so compiles on different threads never
//! interfere and the same input always yields the same bytes.
//!
//! ## Typical Usage
//!
//! ```rust
//! use drill::compile_yaml;
//!
//! let source = r#"
//! - warmup: 15min @H(z2)
//! - repeat(4):
//!     - run: 400m @P(4:00-4:15)
//!     - recovery: 90sec
//! - cooldown: lap
//! "#;
//!
//! let json = compile_yaml("track_intervals", source, None)?;
//! assert!(json.contains(r#""workoutName":"track_intervals""#));
//! # Ok::<(), drill::DrillError>(())
//! ```

use crate::ast::StepEntry;
use crate::builder::StepTreeBuilder;
use crate::constants::{SportType, HIIT_SUB_SPORT};
use crate::error::DrillError;
use crate::json;
use crate::model::{Estimates, WorkoutModel, WorkoutSegment};
use crate::sport::classify_sport;
use tracing::debug;

/// Compile a step list into a typed workout model.
///
/// `sport` is an optional sport name (`run`, `strength`, `hiit`, ...). Unknown
/// names are logged and the sport is detected from the steps instead.
///
/// # Example
/// ```rust
/// use drill::{compile_steps, StepEntry};
/// use drill::constants::SportType;
///
/// let steps = vec![StepEntry::leaf("cardio", "lap"), StepEntry::leaf("rest", "lap")];
/// let model = compile_steps("circuit", &steps, None)?;
/// assert_eq!(model.sport_type, SportType::Strength);
/// assert_eq!(model.segments.len(), 1);
/// # Ok::<(), drill::DrillError>(())
/// ```
///
/// # Errors
/// Returns [`DrillError`] when a step key does not parse, a pace target is
/// malformed, or a step has the wrong shape for its verb.
pub fn compile_steps(
    name: &str,
    steps: &[StepEntry],
    sport: Option<&str>,
) -> Result<WorkoutModel, DrillError> {
    let sport_type = classify_sport(name, sport, steps)?;
    debug!(workout = name, sport = ?sport_type, "compiling workout");

    let steps = StepTreeBuilder::new(sport_type).build(steps)?;
    let sub_sport_type = match sport_type {
        SportType::Hiit => Some(HIIT_SUB_SPORT.to_string()),
        SportType::Running | SportType::Strength => None,
    };

    Ok(WorkoutModel {
        name: name.to_string(),
        sport_type,
        sub_sport_type,
        segments: vec![WorkoutSegment {
            segment_order: 1,
            sport_type,
            steps,
        }],
        estimates: Estimates::default(),
    })
}

/// Compile a step list into the JSON workout document.
///
/// # Example
/// ```rust
/// use drill::{compile, StepEntry};
///
/// let steps = vec![StepEntry::leaf("run", "5k")];
/// let json = compile("easy_5k", &steps, Some("running"))?;
/// assert!(json.contains(r#""endConditionValue":5000"#));
/// # Ok::<(), drill::DrillError>(())
/// ```
pub fn compile(name: &str, steps: &[StepEntry], sport: Option<&str>) -> Result<String, DrillError> {
    let model = compile_steps(name, steps, sport)?;
    json::to_json(&model)
}

/// Compile a YAML step list into the JSON workout document.
///
/// # Errors
/// Returns [`DrillError::Plan`] if `source` is not a list of single-key step
/// mappings, plus every error of [`compile_steps()`].
pub fn compile_yaml(name: &str, source: &str, sport: Option<&str>) -> Result<String, DrillError> {
    let steps: Vec<StepEntry> =
        serde_yaml::from_str(source).map_err(|e| DrillError::Plan(e.to_string()))?;
    compile(name, &steps, sport)
}
