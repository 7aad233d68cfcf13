//! Step-name grammar.
//!
//! Rules, in priority order:
//! 1. `[category: TEXT]` anywhere in the key is removed and kept as the
//!    explicit category (upper-cased, trimmed).
//! 2. `repeatUntilTime(N)` / `repeatUntilTime(Nmin)` becomes verb
//!    `repeatuntiltime` with the argument converted to whole seconds.
//! 3. Otherwise `verb[(argument)]`, where the verb is letters, digits, spaces,
//!    `-`, `'` and `@`. Anything after the optional parenthetical is ignored.
//!
//! Matching is case-insensitive; the verb and argument come back lower-cased.

use super::first_capture;
use crate::error::DrillError;
use regex::Regex;
use std::sync::LazyLock;

static CATEGORY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\[category:\s*([^\]]+)\]").ok());

static REPEAT_UNTIL_TIME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"repeatuntiltime\s*\(([^()]+)\)").ok());

static NAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([\w@ \-']+)(?:\(([^()]+)\))?").ok());

static DIGITS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\d+)").ok());

/// Parsed step key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepName {
    pub verb: String,
    pub argument: Option<String>,
    pub category: Option<String>,
}

/// Parse a step key such as `repeat(3)` or `Pike Push-up [category: PUSH_UP]`.
///
/// # Example
/// ```rust
/// use drill::parser::parse_step_name;
///
/// let name = parse_step_name("repeatUntilTime(35min)").unwrap();
/// assert_eq!(name.verb, "repeatuntiltime");
/// assert_eq!(name.argument.as_deref(), Some("2100"));
/// ```
///
/// # Errors
/// Returns [`DrillError::StepName`] when no verb can be read from the key.
pub fn parse_step_name(key: &str) -> Result<StepName, DrillError> {
    let category = first_capture(&CATEGORY_PATTERN, key).map(|c| c.trim().to_uppercase());
    let cleaned = match CATEGORY_PATTERN.as_ref() {
        Some(re) => re.replace_all(key, "").into_owned(),
        None => key.to_string(),
    };
    let lowered = cleaned.to_lowercase();

    if lowered.contains("repeatuntiltime") {
        if let Some(value) = first_capture(&REPEAT_UNTIL_TIME_PATTERN, &lowered) {
            let seconds = repeat_seconds(key, value.trim())?;
            return Ok(StepName {
                verb: "repeatuntiltime".to_string(),
                argument: Some(seconds.to_string()),
                category,
            });
        }
    }

    let captures = NAME_PATTERN
        .as_ref()
        .and_then(|re| re.captures(&lowered))
        .ok_or_else(|| DrillError::StepName {
            key: key.to_string(),
            message: "expected a step name made of letters, digits, spaces, '-', ''' or '@'"
                .to_string(),
        })?;

    let verb = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
    if verb.is_empty() {
        return Err(DrillError::StepName {
            key: key.to_string(),
            message: "step name is empty".to_string(),
        });
    }

    Ok(StepName {
        verb: verb.to_string(),
        argument: captures.get(2).map(|m| m.as_str().to_string()),
        category,
    })
}

fn repeat_seconds(key: &str, value: &str) -> Result<u32, DrillError> {
    let invalid = || DrillError::StepName {
        key: key.to_string(),
        message: format!("repeat time '{}' is not a number of seconds or Nmin", value),
    };

    if value.contains("min") {
        let minutes: u32 = first_capture(&DIGITS_PATTERN, value)
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(invalid)?;
        minutes.checked_mul(60).ok_or_else(invalid)
    } else {
        value.parse().map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_verb() {
        let name = parse_step_name("warmup").unwrap();
        assert_eq!(name.verb, "warmup");
        assert_eq!(name.argument, None);
        assert_eq!(name.category, None);
    }

    #[test]
    fn test_verb_with_argument() {
        let name = parse_step_name("repeat(3)").unwrap();
        assert_eq!(name.verb, "repeat");
        assert_eq!(name.argument.as_deref(), Some("3"));
    }

    #[test]
    fn test_case_is_folded() {
        let name = parse_step_name("Goblet Squat").unwrap();
        assert_eq!(name.verb, "goblet squat");
    }

    #[test]
    fn test_hyphen_apostrophe_and_digits() {
        let name = parse_step_name("30-degree Lat Pull-down").unwrap();
        assert_eq!(name.verb, "30-degree lat pull-down");
        let name = parse_step_name("World's Greatest Stretch").unwrap();
        assert_eq!(name.verb, "world's greatest stretch");
    }

    #[test]
    fn test_explicit_category() {
        let name = parse_step_name("Sled Push [category: sled ]").unwrap();
        assert_eq!(name.verb, "sled push");
        assert_eq!(name.category.as_deref(), Some("SLED"));
    }

    #[test]
    fn test_category_annotation_any_case() {
        let name = parse_step_name("X Abs [Category: Core]").unwrap();
        assert_eq!(name.verb, "x abs");
        assert_eq!(name.category.as_deref(), Some("CORE"));
    }

    #[test]
    fn test_repeat_until_time_seconds() {
        let name = parse_step_name("repeatUntilTime(2100)").unwrap();
        assert_eq!(name.verb, "repeatuntiltime");
        assert_eq!(name.argument.as_deref(), Some("2100"));
    }

    #[test]
    fn test_repeat_until_time_minutes() {
        let name = parse_step_name("repeatuntiltime( 35min )").unwrap();
        assert_eq!(name.argument.as_deref(), Some("2100"));
    }

    #[test]
    fn test_repeat_until_time_without_argument() {
        let name = parse_step_name("repeatUntilTime").unwrap();
        assert_eq!(name.verb, "repeatuntiltime");
        assert_eq!(name.argument, None);
    }

    #[test]
    fn test_repeat_until_time_bad_argument() {
        let err = parse_step_name("repeatUntilTime(soon)").unwrap_err();
        assert!(matches!(err, DrillError::StepName { .. }));
    }

    #[test]
    fn test_repeat_until_time_too_long() {
        let err = parse_step_name("repeatUntilTime(99999999min)").unwrap_err();
        match err {
            DrillError::StepName { key, .. } => assert_eq!(key, "repeatUntilTime(99999999min)"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_target_token() {
        let name = parse_step_name("@P(5:30-6:00)").unwrap();
        assert_eq!(name.verb, "@p");
        assert_eq!(name.argument.as_deref(), Some("5:30-6:00"));
    }

    #[test]
    fn test_unparseable_key() {
        let err = parse_step_name("(3)").unwrap_err();
        match err {
            DrillError::StepName { key, .. } => assert_eq!(key, "(3)"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(parse_step_name("   ").is_err());
        assert!(parse_step_name("").is_err());
    }
}
