//! # Step Tree Builder
//!
//! Turns the parsed step list into the typed step tree.
//!
//! ## Ordering
//! Every node gets an order from one [`OrderCursor`] owned by the builder. The
//! builder is created per compile and consumed by [`StepTreeBuilder::build`],
//! so two compiles never share a counter. A repeat claims its order before its
//! children are built; a leaf claims its order after its detail is parsed. For
//! any tree the orders are exactly `1..=node_count`.
//!
//! ## Step Roles
//! ```text
//! repeat(N)            RepeatStep, N iterations (default 1)
//! repeatUntilTime(S)   RepeatStep, TIME S seconds (default 600)
//! run                  WARMUP            (HIIT: INTERVAL, RUN_INDOOR)
//! warmup / cooldown    WARMUP / COOLDOWN (HIIT or nested cardio/run: CARDIO)
//! recovery             RECOVERY
//! exercise             INTERVAL
//! rest                 REST
//! cardio               INTERVAL, CARDIO  (HIIT: RUN_INDOOR)
//! anything else        INTERVAL, category from the exercise resolver
//! ```
//!
//! Steps nested inside a repeat carry `child_step_id = 1`, except warmups and
//! cooldowns.

use crate::ast::{StepBody, StepEntry};
use crate::constants::{SportType, StepType};
use crate::error::DrillError;
use crate::exercise::{resolve_exercise, ExerciseCategory};
use crate::model::{RepeatEnd, RepeatStep, Step, WorkoutStep};
use crate::parser::{parse_detail, parse_step_name, ParsedDetail, StepName};
use tracing::{debug, warn};

const DEFAULT_ITERATIONS: u32 = 1;
const DEFAULT_REPEAT_SECONDS: f64 = 600.0;
const CHILD_STEP_ID: u32 = 1;

/// Hands out step orders: 1, 2, 3, ...
#[derive(Debug, Default)]
pub struct OrderCursor {
    current: u32,
}

impl OrderCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next order.
    pub fn claim(&mut self) -> u32 {
        self.current += 1;
        self.current
    }

    /// Highest order claimed so far.
    pub fn current(&self) -> u32 {
        self.current
    }
}

/// Builds one workout's step tree.
pub struct StepTreeBuilder {
    sport: SportType,
    cursor: OrderCursor,
}

/// Role and exercise metadata decided from the step verb.
struct StepRole {
    step_type: StepType,
    category: Option<ExerciseCategory>,
    exercise_name: Option<String>,
}

impl StepRole {
    fn plain(step_type: StepType) -> Self {
        Self { step_type, category: None, exercise_name: None }
    }

    // Cardio-like categories are sent with an empty exercise code.
    fn with_empty_code(step_type: StepType, category: ExerciseCategory) -> Self {
        Self { step_type, category: Some(category), exercise_name: Some(String::new()) }
    }
}

impl StepTreeBuilder {
    pub fn new(sport: SportType) -> Self {
        Self { sport, cursor: OrderCursor::new() }
    }

    /// Build the top-level steps.
    ///
    /// # Errors
    /// Fails on the first step whose key cannot be parsed, whose pace target is
    /// malformed, or whose shape does not fit its verb.
    pub fn build(mut self, steps: &[StepEntry]) -> Result<Vec<Step>, DrillError> {
        let built = self.build_list(steps, false)?;
        debug!(nodes = self.cursor.current(), "built step tree");
        Ok(built)
    }

    fn build_list(&mut self, steps: &[StepEntry], in_repeat: bool) -> Result<Vec<Step>, DrillError> {
        steps
            .iter()
            .map(|entry| self.build_step(entry, in_repeat))
            .collect()
    }

    fn build_step(&mut self, entry: &StepEntry, in_repeat: bool) -> Result<Step, DrillError> {
        let name = parse_step_name(&entry.key)?;
        match name.verb.as_str() {
            "repeat" => {
                let iterations = name
                    .argument
                    .as_deref()
                    .and_then(|arg| arg.trim().parse().ok())
                    .filter(|&n: &u32| n > 0)
                    .unwrap_or(DEFAULT_ITERATIONS);
                self.build_repeat(entry, RepeatEnd::Iterations(iterations))
            }
            "repeatuntiltime" => {
                let seconds = name
                    .argument
                    .as_deref()
                    .and_then(|arg| arg.trim().parse().ok())
                    .unwrap_or(DEFAULT_REPEAT_SECONDS);
                self.build_repeat(entry, RepeatEnd::Time(seconds))
            }
            _ => self.build_leaf(entry, &name, in_repeat).map(Step::Executable),
        }
    }

    fn build_repeat(&mut self, entry: &StepEntry, end: RepeatEnd) -> Result<Step, DrillError> {
        let StepBody::Children(children) = &entry.body else {
            return Err(DrillError::InvalidStep(format!(
                "'{}' must contain a list of nested steps",
                entry.key
            )));
        };

        let order = self.cursor.claim();
        let steps = self.build_list(children, true)?;
        Ok(Step::Repeat(RepeatStep { order, end, steps }))
    }

    fn build_leaf(
        &mut self,
        entry: &StepEntry,
        name: &StepName,
        in_repeat: bool,
    ) -> Result<WorkoutStep, DrillError> {
        let role = self.role_for(entry, name)?;

        let detail = match &entry.body {
            StepBody::Detail(text) => parse_detail(text)?,
            StepBody::Children(_) => {
                if !matches!(role.step_type, StepType::Warmup | StepType::Cooldown) {
                    warn!(step = %entry.key, "nested steps only group warmups and cooldowns; ending on lap press");
                }
                ParsedDetail::lap_button()
            }
        };

        let child_step_id = (in_repeat
            && !matches!(role.step_type, StepType::Warmup | StepType::Cooldown))
        .then_some(CHILD_STEP_ID);

        let order = self.cursor.claim();
        debug!(
            order,
            step = %entry.key,
            step_type = role.step_type.record().step_type_key,
            "built step"
        );

        Ok(WorkoutStep {
            order,
            step_type: role.step_type,
            end_condition: detail.end_condition,
            target: detail.target,
            category: role.category,
            exercise_name: role.exercise_name,
            description: detail.description,
            child_step_id,
        })
    }

    fn role_for(&self, entry: &StepEntry, name: &StepName) -> Result<StepRole, DrillError> {
        let hiit = self.sport == SportType::Hiit;
        let role = match name.verb.as_str() {
            "run" if hiit => StepRole::with_empty_code(StepType::Interval, ExerciseCategory::RunIndoor),
            "run" => StepRole::plain(StepType::Warmup),
            verb @ ("warmup" | "cooldown") => {
                let step_type = if verb == "warmup" { StepType::Warmup } else { StepType::Cooldown };
                let cardio = has_cardio_child(entry)?;
                if hiit || cardio {
                    StepRole::with_empty_code(step_type, ExerciseCategory::Cardio)
                } else {
                    StepRole::plain(step_type)
                }
            }
            "recovery" => StepRole::plain(StepType::Recovery),
            "exercise" => StepRole::plain(StepType::Interval),
            "rest" => StepRole::plain(StepType::Rest),
            "cardio" if hiit => StepRole::with_empty_code(StepType::Interval, ExerciseCategory::RunIndoor),
            "cardio" => StepRole {
                step_type: StepType::Interval,
                category: Some(ExerciseCategory::Cardio),
                exercise_name: None,
            },
            exercise => {
                let resolved = resolve_exercise(exercise, name.category.as_deref());
                StepRole {
                    step_type: StepType::Interval,
                    category: resolved.category,
                    exercise_name: resolved.exercise_name,
                }
            }
        };
        Ok(role)
    }
}

/// Whether a warmup/cooldown wraps a `cardio` or `run` step.
///
/// Every nested key is parsed first, so a bad name anywhere under the
/// step fails the build even though the children are not emitted.
fn has_cardio_child(entry: &StepEntry) -> Result<bool, DrillError> {
    let Some(children) = entry.children() else {
        return Ok(false);
    };
    let mut cardio = false;
    for child in children {
        let verb = parse_step_name(&child.key)?.verb;
        cardio |= verb == "cardio" || verb == "run";
        has_cardio_child(child)?;
    }
    Ok(cardio)
}

/// Build a step tree with a fresh order cursor.
pub fn build_steps(steps: &[StepEntry], sport: SportType) -> Result<Vec<Step>, DrillError> {
    StepTreeBuilder::new(sport).build(steps)
}
