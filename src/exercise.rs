//! # Exercise Category Resolution
//!
//! Strength steps are written with free-text names (`Goblet Squat`,
//! `30-degree Lat Pull-down`). The platform only renders exercises it can place
//! in its own taxonomy: a category plus an exercise code.
//!
//! ## Resolution Order
//! 1. An explicit `[category: ...]` annotation wins. A few categories pin the
//!    code regardless of the name (sled push/drag, farmer's carry).
//! 2. Otherwise [`CATEGORY_RULES`] is scanned top to bottom and the first rule
//!    whose substrings match the lower-cased name decides. Some rules map a name
//!    to "unsupported" and stop the scan without a category.
//! 3. When a category was found and no code is pinned, the code is the name in
//!    upper snake case (`goblet squat` -> `GOBLET_SQUAT`).
//!
//! No match is a normal outcome: category and code stay unset.
//!
//! ## Rule Order Matters
//! Substrings overlap. `push press` must be seen before `press`, `farmer carry`
//! before `carry`, and `push up` before the catch-all `push`. Reordering the
//! table silently changes classifications.

use std::fmt;
use tracing::debug;

/// Exercise categories known to the platform, plus any explicit category a
/// user writes that is not in this list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExerciseCategory {
    BenchPress,
    Cardio,
    Carry,
    Core,
    Deadlift,
    HipSwing,
    LegCurl,
    Lunge,
    OlympicLift,
    Plank,
    Plyo,
    PullUp,
    PushUp,
    Row,
    RunIndoor,
    ShoulderPress,
    SitUp,
    Sled,
    Squat,
    TotalBody,
    Custom(String),
}

const NAMED_CATEGORIES: [(ExerciseCategory, &str); 20] = [
    (ExerciseCategory::BenchPress, "BENCH_PRESS"),
    (ExerciseCategory::Cardio, "CARDIO"),
    (ExerciseCategory::Carry, "CARRY"),
    (ExerciseCategory::Core, "CORE"),
    (ExerciseCategory::Deadlift, "DEADLIFT"),
    (ExerciseCategory::HipSwing, "HIP_SWING"),
    (ExerciseCategory::LegCurl, "LEG_CURL"),
    (ExerciseCategory::Lunge, "LUNGE"),
    (ExerciseCategory::OlympicLift, "OLYMPIC_LIFT"),
    (ExerciseCategory::Plank, "PLANK"),
    (ExerciseCategory::Plyo, "PLYO"),
    (ExerciseCategory::PullUp, "PULL_UP"),
    (ExerciseCategory::PushUp, "PUSH_UP"),
    (ExerciseCategory::Row, "ROW"),
    (ExerciseCategory::RunIndoor, "RUN_INDOOR"),
    (ExerciseCategory::ShoulderPress, "SHOULDER_PRESS"),
    (ExerciseCategory::SitUp, "SIT_UP"),
    (ExerciseCategory::Sled, "SLED"),
    (ExerciseCategory::Squat, "SQUAT"),
    (ExerciseCategory::TotalBody, "TOTAL_BODY"),
];

impl ExerciseCategory {
    /// Category for an explicit annotation; unknown names become `Custom`.
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().to_uppercase();
        NAMED_CATEGORIES
            .iter()
            .find(|(_, key)| *key == upper)
            .map(|(category, _)| category.clone())
            .unwrap_or(ExerciseCategory::Custom(upper))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExerciseCategory::Custom(name) => name,
            known => NAMED_CATEGORIES
                .iter()
                .find(|(category, _)| category == known)
                .map(|(_, key)| *key)
                .unwrap_or_default(),
        }
    }

    /// Categories the platform renders without an exercise code.
    pub fn is_codeless(&self) -> bool {
        matches!(self, ExerciseCategory::Sled | ExerciseCategory::Carry)
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substring test against a lower-cased exercise name.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Any(&'static [&'static str]),
    All(&'static [&'static str]),
}

impl Pattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Pattern::Any(needles) => needles.iter().any(|n| name.contains(n)),
            Pattern::All(needles) => needles.iter().all(|n| name.contains(n)),
        }
    }
}

/// How the exercise code is chosen once a rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRule {
    /// Upper snake case of the name.
    Derived,
    Fixed(&'static str),
    /// Derived, then `_`-prefixed with `PULL_DOWN` folded to `PULLDOWN` for
    /// lat pull-down variants.
    Pulldown,
}

#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub pattern: Pattern,
    /// `None` marks names the platform has no category for.
    pub category: Option<ExerciseCategory>,
    pub code: CodeRule,
}

const fn rule(pattern: Pattern, category: ExerciseCategory, code: CodeRule) -> CategoryRule {
    CategoryRule { pattern, category: Some(category), code }
}

const fn unsupported(pattern: Pattern) -> CategoryRule {
    CategoryRule { pattern, category: None, code: CodeRule::Derived }
}

use CodeRule::{Derived, Fixed, Pulldown};
use ExerciseCategory as C;
use Pattern::{All, Any};

/// Name heuristics, first match wins.
pub static CATEGORY_RULES: [CategoryRule; 28] = [
    rule(Any(&["bulgarian split squat"]), C::Lunge, Derived),
    rule(Any(&["good morning"]), C::LegCurl, Derived),
    rule(Any(&["clean and jerk"]), C::OlympicLift, Derived),
    rule(Any(&["wall ball", "wallball"]), C::Squat, Derived),
    rule(Any(&["medicine ball slam"]), C::Plyo, Derived),
    rule(Any(&["ski moguls"]), C::Cardio, Derived),
    rule(Any(&["pike push", "push-up"]), C::PushUp, Derived),
    rule(Any(&["plank"]), C::Plank, Derived),
    rule(Any(&["burpee"]), C::TotalBody, Derived),
    rule(Any(&["row"]), C::Row, Derived),
    rule(Any(&["squat"]), C::Squat, Derived),
    rule(Any(&["push press"]), C::ShoulderPress, Derived),
    rule(Any(&["press"]), C::BenchPress, Derived),
    rule(Any(&["deadlift"]), C::Deadlift, Derived),
    rule(Any(&["pull", "lat"]), C::PullUp, Pulldown),
    rule(All(&["kettlebell", "floor to shelf"]), C::Deadlift, Derived),
    rule(All(&["kettlebell", "swing"]), C::HipSwing, Derived),
    rule(Any(&["kettlebell"]), C::Squat, Derived),
    rule(Any(&["push up", "pushup"]), C::PushUp, Derived),
    rule(All(&["sled", "push"]), C::Sled, Fixed("PUSH")),
    rule(All(&["sled", "drag"]), C::Sled, Fixed("BACKWARD_DRAG")),
    unsupported(Any(&["sled", "drag"])),
    rule(All(&["farmer", "carry"]), C::Carry, Fixed("FARMERS_CARRY")),
    rule(All(&["bar", "hold"]), C::Deadlift, Derived),
    rule(Any(&["x abs", "x-abs"]), C::SitUp, Derived),
    rule(Any(&["back extension"]), C::Core, Derived),
    unsupported(Any(&["carry"])),
    unsupported(Any(&["push"])),
];

/// Category and code chosen for one exercise name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseResolution {
    pub category: Option<ExerciseCategory>,
    pub exercise_name: Option<String>,
}

/// First rule in [`CATEGORY_RULES`] matching the (lower-cased) name.
pub fn matching_rule(name: &str) -> Option<&'static CategoryRule> {
    let lowered = name.to_lowercase();
    CATEGORY_RULES.iter().find(|rule| rule.pattern.matches(&lowered))
}

/// Resolve an exercise name, honoring an explicit category annotation.
///
/// # Example
/// ```rust
/// use drill::exercise::{resolve_exercise, ExerciseCategory};
///
/// let resolved = resolve_exercise("30-degree lat pull-down", None);
/// assert_eq!(resolved.category, Some(ExerciseCategory::PullUp));
/// assert_eq!(resolved.exercise_name.as_deref(), Some("_30_DEGREE_LAT_PULLDOWN"));
/// ```
pub fn resolve_exercise(name: &str, explicit: Option<&str>) -> ExerciseResolution {
    let lowered = name.to_lowercase();
    let (category, code) = match explicit {
        Some(explicit) => explicit_category(&lowered, explicit),
        None => match matching_rule(&lowered) {
            Some(rule) => (rule.category.clone(), rule.code),
            None => (None, Derived),
        },
    };

    let exercise_name = category.as_ref().and_then(|category| match code {
        Fixed(code) => Some(code.to_string()),
        _ if category.is_codeless() => None,
        Derived => Some(derived_code(&lowered)),
        Pulldown => Some(pulldown_code(&lowered)),
    });

    debug!(
        exercise = name,
        category = category.as_ref().map(ExerciseCategory::as_str),
        code = exercise_name.as_deref(),
        "resolved exercise"
    );

    ExerciseResolution { category, exercise_name }
}

fn explicit_category(name: &str, explicit: &str) -> (Option<ExerciseCategory>, CodeRule) {
    let category = ExerciseCategory::from_name(explicit);
    let code = match category {
        C::Sled if name.contains("push") => Fixed("PUSH"),
        C::Sled if name.contains("drag") => Fixed("BACKWARD_DRAG"),
        C::Carry if name.contains("farmer") && name.contains("carry") => Fixed("FARMERS_CARRY"),
        C::Core if name.contains("x abs") || name.contains("x-abs") => {
            return (Some(C::SitUp), Derived);
        }
        _ => Derived,
    };
    (Some(category), code)
}

/// `30-degree lat pull-down` -> `30_DEGREE_LAT_PULL_DOWN`.
pub fn derived_code(name: &str) -> String {
    name.to_uppercase().replace([' ', '-'], "_")
}

fn pulldown_code(name: &str) -> String {
    let code = derived_code(name);
    if name.contains("lat") || name.contains("pull-down") {
        format!("_{}", code.replace("PULL_DOWN", "PULLDOWN"))
    } else {
        code
    }
}
