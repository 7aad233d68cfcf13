//! # Sport Type Classification
//!
//! Decides the sport of a workout.
//!
//! An explicit sport string is normalized through its synonyms. Without one, the
//! steps are scanned (descending into repeat groups) and the workout is
//! STRENGTH when any of them looks like gym work:
//! - an `exercise`, `rest` or `cardio` step, or
//! - a free-text exercise step whose detail mentions `reps`.
//!
//! Everything else is RUNNING. HIIT is never inferred.
//!
//! The scan only reads the steps. It runs before the tree is built so it never
//! interferes with step ordering.

use crate::ast::{StepBody, StepEntry};
use crate::constants::SportType;
use crate::error::DrillError;
use crate::parser::parse_step_name;
use tracing::warn;

/// Verbs with a fixed meaning; anything else is an exercise name.
pub const RESERVED_VERBS: [&str; 9] = [
    "run",
    "warmup",
    "cooldown",
    "recovery",
    "exercise",
    "rest",
    "cardio",
    "repeat",
    "repeatuntiltime",
];

const STRENGTH_VERBS: [&str; 3] = ["exercise", "rest", "cardio"];

pub fn is_reserved(verb: &str) -> bool {
    RESERVED_VERBS.contains(&verb)
}

/// Sport for a workout: the explicit one when it is a known synonym, otherwise
/// inferred from the steps.
///
/// # Errors
/// Returns [`DrillError::StepName`] when a step key cannot be parsed.
pub fn classify_sport(
    workout: &str,
    explicit: Option<&str>,
    steps: &[StepEntry],
) -> Result<SportType, DrillError> {
    if let Some(sport) = explicit {
        match SportType::from_synonym(sport) {
            Some(sport) => return Ok(sport),
            None => warn!(
                workout,
                sport, "unknown sport type, detecting it from the steps instead"
            ),
        }
    }
    detect_sport(steps)
}

/// Sport inferred from the steps alone.
pub fn detect_sport(steps: &[StepEntry]) -> Result<SportType, DrillError> {
    if has_strength_steps(steps)? {
        Ok(SportType::Strength)
    } else {
        Ok(SportType::Running)
    }
}

fn has_strength_steps(steps: &[StepEntry]) -> Result<bool, DrillError> {
    for step in steps {
        let name = parse_step_name(&step.key)?;
        let verb = name.verb.as_str();
        if STRENGTH_VERBS.contains(&verb) {
            return Ok(true);
        }
        match &step.body {
            StepBody::Children(children) if verb == "repeat" || verb == "repeatuntiltime" => {
                if has_strength_steps(children)? {
                    return Ok(true);
                }
            }
            StepBody::Detail(detail) if !is_reserved(verb) => {
                if detail.to_lowercase().contains("reps") {
                    return Ok(true);
                }
            }
            _ => {}
        }
    }
    Ok(false)
}
