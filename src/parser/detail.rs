//! Step-detail tokens.
//!
//! Token rules, first match wins:
//!
//! | Token                      | Result                      |
//! |----------------------------|-----------------------------|
//! | `30sec`                    | TIME 30                     |
//! | `30s`                      | TIME 30                     |
//! | `15min`, `min15`           | TIME 900                    |
//! | `400m`                     | DISTANCE 400                |
//! | `5k`                       | DISTANCE 5000               |
//! | `lap`                      | LAP_BUTTON                  |
//! | `10 reps`                  | REPS 10 (looks back)        |
//! | `@P(5:30-6:00)`            | PACE target                 |
//! | `@H(z2)`                   | HEART_RATE_ZONE target      |
//!
//! A token that a rule claims but cannot convert is logged and skipped. The one
//! exception is a malformed pace range, which fails the step: the user asked
//! for a target and would otherwise silently lose it.

use super::{first_capture, parse_step_name};
use crate::constants::PACE_CONST;
use crate::error::DrillError;
use crate::model::{EndCondition, Target};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static FIRST_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\d+)").ok());
static SECONDS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\d+)s").ok());
static REPS_CONTEXT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*reps?").ok());
static METERS_CONTEXT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\d+)\s*m").ok());
static SECONDS_CONTEXT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*s\b").ok());

const DEFAULT_REPS: u32 = 10;
const DEFAULT_SECONDS: u32 = 60;

/// Typed fields read from a step detail.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDetail {
    pub end_condition: EndCondition,
    pub target: Option<Target>,
    pub description: Option<String>,
}

impl ParsedDetail {
    /// Detail used for steps written with nested children instead of text.
    pub fn lap_button() -> Self {
        Self {
            end_condition: EndCondition::LapButton,
            target: None,
            description: None,
        }
    }
}

enum TokenOutcome {
    Matched,
    Unmatched,
}

enum TokenError {
    Skip(String),
    Fatal(DrillError),
}

#[derive(Default)]
struct DetailState {
    end_condition: Option<EndCondition>,
    target: Option<Target>,
}

/// Parse the detail text of a leaf step.
///
/// # Example
/// ```rust
/// use drill::model::{EndCondition, Target};
/// use drill::parser::parse_detail;
///
/// let detail = parse_detail("15min @H(z2)").unwrap();
/// assert_eq!(detail.end_condition, EndCondition::Time(900));
/// assert_eq!(detail.target, Some(Target::HeartRateZone(2)));
/// ```
///
/// # Errors
/// Returns [`DrillError::InvalidPace`] when a `@P(...)` token is not two
/// `mm:ss` values separated by `-`.
pub fn parse_detail(text: &str) -> Result<ParsedDetail, DrillError> {
    let (head, description) = match text.split_once('|') {
        Some((head, description)) => (head.trim(), Some(description.trim().to_string())),
        None => (text, None),
    };

    let mut state = DetailState::default();
    let mut previous: Option<String> = None;
    for raw in head.split_whitespace() {
        let token = raw.to_lowercase();
        match apply_token(&token, previous.as_deref(), &mut state) {
            Ok(TokenOutcome::Matched) => {}
            Ok(TokenOutcome::Unmatched) => previous = Some(token),
            Err(TokenError::Skip(reason)) => {
                warn!(token = raw, detail = text, "skipping detail token: {}", reason);
            }
            Err(TokenError::Fatal(e)) => return Err(e),
        }
    }

    let end_condition = state
        .end_condition
        .unwrap_or_else(|| fallback_end_condition(text));
    let description = description.or_else(|| context_description(text));

    Ok(ParsedDetail {
        end_condition,
        target: state.target,
        description,
    })
}

fn apply_token(
    token: &str,
    previous: Option<&str>,
    state: &mut DetailState,
) -> Result<TokenOutcome, TokenError> {
    if token.contains("sec") {
        let seconds = parse_number(&token.replace("sec", ""), token)?;
        state.end_condition = Some(EndCondition::Time(seconds));
        return Ok(TokenOutcome::Matched);
    }

    if token.ends_with('s') && !token.ends_with("ms") && !token.contains("min") {
        if let Ok(seconds) = token.replace('s', "").parse() {
            state.end_condition = Some(EndCondition::Time(seconds));
            return Ok(TokenOutcome::Matched);
        }
    }

    if token.contains("min") && (token.ends_with("min") || token.starts_with("min")) {
        if let Ok(minutes) = token.replace("min", "").parse::<u32>() {
            let seconds = minutes
                .checked_mul(60)
                .ok_or_else(|| TokenError::Skip(format!("'{}' is too long", token)))?;
            state.end_condition = Some(EndCondition::Time(seconds));
            return Ok(TokenOutcome::Matched);
        }
    }

    if token.ends_with('m') && token.len() > 1 {
        if let Ok(meters) = token.replace('m', "").parse() {
            state.end_condition = Some(EndCondition::Distance(meters));
            return Ok(TokenOutcome::Matched);
        }
    }

    if token.contains('k') && !token.contains("km") {
        let kilometers = parse_number(&token.replace('k', ""), token)?;
        let meters = kilometers
            .checked_mul(1000)
            .ok_or_else(|| TokenError::Skip(format!("'{}' is too far", token)))?;
        state.end_condition = Some(EndCondition::Distance(meters));
        return Ok(TokenOutcome::Matched);
    }

    if token.contains("lap") {
        state.end_condition = Some(EndCondition::LapButton);
        return Ok(TokenOutcome::Matched);
    }

    if token.contains("reps") {
        if let Some(reps) = previous.and_then(|p| p.parse().ok()) {
            state.end_condition = Some(EndCondition::Reps(reps));
        }
        return Ok(TokenOutcome::Matched);
    }

    if token.contains('@') {
        return apply_target(token, state);
    }

    Ok(TokenOutcome::Unmatched)
}

fn apply_target(token: &str, state: &mut DetailState) -> Result<TokenOutcome, TokenError> {
    let name = parse_step_name(token).map_err(|e| TokenError::Skip(e.to_string()))?;
    let Some(value) = name.argument else {
        if name.verb == "@p" {
            return Err(TokenError::Fatal(DrillError::InvalidPace {
                token: token.to_string(),
                message: "expected a range in parentheses, like @P(5:30-6:00)".to_string(),
            }));
        }
        return Ok(TokenOutcome::Matched);
    };

    match name.verb.as_str() {
        "@p" => {
            let (low, high) = parse_pace_range(token, &value).map_err(TokenError::Fatal)?;
            state.target = Some(Target::Pace { low, high });
            Ok(TokenOutcome::Matched)
        }
        "@h" => {
            let zone = value
                .trim_matches('z')
                .parse()
                .map_err(|_| TokenError::Skip(format!("'{}' is not a heart rate zone", value)))?;
            state.target = Some(Target::HeartRateZone(zone));
            Ok(TokenOutcome::Matched)
        }
        _ => Ok(TokenOutcome::Unmatched),
    }
}

/// `floor-top` pace range in `mm:ss` per kilometer to the platform's speed bounds.
fn parse_pace_range(token: &str, range: &str) -> Result<(f64, f64), DrillError> {
    let invalid = |message: String| DrillError::InvalidPace {
        token: token.to_string(),
        message,
    };

    let bounds: Vec<&str> = range.split('-').collect();
    let [floor, top] = bounds.as_slice() else {
        return Err(invalid(format!(
            "expected two mm:ss bounds separated by '-', got '{}'",
            range
        )));
    };

    let floor_minutes = pace_minutes(floor).ok_or_else(|| invalid(format!("'{}' is not mm:ss", floor)))?;
    let top_minutes = pace_minutes(top).ok_or_else(|| invalid(format!("'{}' is not mm:ss", top)))?;

    Ok((PACE_CONST / floor_minutes, PACE_CONST / top_minutes))
}

fn pace_minutes(value: &str) -> Option<f64> {
    let (minutes, seconds) = value.trim().split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    let total = minutes as f64 + seconds as f64 / 60.0;
    (total > 0.0).then_some(total)
}

fn parse_number(digits: &str, token: &str) -> Result<u32, TokenError> {
    digits
        .parse()
        .map_err(|_| TokenError::Skip(format!("'{}' has no whole number before its unit", token)))
}

/// End condition for details in which no token set one.
fn fallback_end_condition(text: &str) -> EndCondition {
    let lowered = text.to_lowercase();
    if lowered.contains("reps") {
        let reps = first_capture(&FIRST_NUMBER, &lowered)
            .and_then(|n| n.parse().ok())
            .unwrap_or(DEFAULT_REPS);
        EndCondition::Reps(reps)
    } else if lowered.contains('s') {
        let seconds = first_capture(&SECONDS, &lowered)
            .and_then(|n| n.parse().ok())
            .unwrap_or(DEFAULT_SECONDS);
        EndCondition::Time(seconds)
    } else {
        EndCondition::Reps(DEFAULT_REPS)
    }
}

/// Short description built from the reps, meters or seconds in the detail.
fn context_description(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    if lowered.contains("reps") {
        first_capture(&REPS_CONTEXT, &lowered).map(str::to_string)
    } else if lowered.contains('m') && !lowered.contains("min") {
        first_capture(&METERS_CONTEXT, &lowered).map(|n| format!("{}m", n))
    } else if lowered.contains('s') && !lowered.contains("sec") {
        first_capture(&SECONDS_CONTEXT, &lowered).map(|n| format!("{}s", n))
    } else {
        None
    }
}
