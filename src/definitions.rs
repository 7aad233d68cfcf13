//! # Definitions
//!
//! Plan files may declare reusable values once and refer to them as `$name`:
//!
//! ```yaml
//! definitions:
//!   easy: "@H(z2)"
//!   tempo: "@P(4:30-4:45)"
//! workouts:
//!   tuesday:
//!     - warmup: 15min $easy
//!     - run: 20min $tempo
//! ```
//!
//! Substitution runs on the raw document before any step is parsed. Every
//! string in the document is rewritten, mapping keys included. A placeholder
//! with no matching definition is left untouched.

use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;
use tracing::warn;

static PLACEHOLDER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$(\w+)").ok());

/// Replace `$name` placeholders in every string of `value`.
///
/// # Example
/// ```rust
/// use drill::definitions::substitute;
/// use serde_yaml::{Mapping, Value};
///
/// let mut definitions = Mapping::new();
/// definitions.insert("easy".into(), "@H(z2)".into());
///
/// let value = Value::from("15min $easy");
/// assert_eq!(substitute(&value, &definitions), Value::from("15min @H(z2)"));
/// ```
pub fn substitute(value: &Value, definitions: &Mapping) -> Value {
    match value {
        Value::String(text) => Value::String(substitute_str(text, definitions)),
        Value::Sequence(items) => Value::Sequence(
            items.iter().map(|item| substitute(item, definitions)).collect(),
        ),
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .iter()
                .map(|(k, v)| (substitute(k, definitions), substitute(v, definitions)))
                .collect(),
        ),
        Value::Tagged(tagged) => {
            let mut tagged = tagged.as_ref().clone();
            tagged.value = substitute(&tagged.value, definitions);
            Value::Tagged(Box::new(tagged))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

/// Replace `$name` placeholders in one string.
pub fn substitute_str(text: &str, definitions: &Mapping) -> String {
    let Some(pattern) = PLACEHOLDER_PATTERN.as_ref() else {
        return text.to_string();
    };
    pattern
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            match definitions.get(name).map(render_scalar) {
                Some(Some(replacement)) => replacement,
                Some(None) => {
                    warn!(name, "definition is not a scalar, leaving placeholder");
                    caps[0].to_string()
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> Mapping {
        serde_yaml::from_str("easy: \"@H(z2)\"\nreps: 12\nlist: [1, 2]\n").unwrap()
    }

    #[test]
    fn test_replaces_known_placeholders() {
        assert_eq!(substitute_str("15min $easy", &definitions()), "15min @H(z2)");
        assert_eq!(substitute_str("$reps reps", &definitions()), "12 reps");
    }

    #[test]
    fn test_unknown_placeholder_is_kept() {
        assert_eq!(substitute_str("10min $hard", &definitions()), "10min $hard");
    }

    #[test]
    fn test_non_scalar_definition_is_kept() {
        assert_eq!(substitute_str("$list", &definitions()), "$list");
    }

    #[test]
    fn test_recurses_into_keys_and_sequences() {
        let doc: Value = serde_yaml::from_str(
            "workouts:\n  w:\n    - warmup: 15min $easy\n    - \"$reps_squat\": lap\n",
        )
        .unwrap();
        let mut defs = definitions();
        defs.insert("reps_squat".into(), "Goblet Squat".into());
        let out = substitute(&doc, &defs);
        let steps = &out["workouts"]["w"];
        assert_eq!(steps[0]["warmup"], Value::from("15min @H(z2)"));
        assert_eq!(steps[1]["Goblet Squat"], Value::from("lap"));
    }

    #[test]
    fn test_non_strings_untouched() {
        let value: Value = serde_yaml::from_str("[1, true, null]").unwrap();
        assert_eq!(substitute(&value, &definitions()), value);
    }
}
