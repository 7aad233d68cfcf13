//! # Parser Module
//!
//! This module parses the two text halves of a step entry.
//!
//! ## Step Names
//! The key of a step names what the step does, with an optional argument and an
//! optional explicit exercise category:
//!
//! ```text
//! repeat(3)                          verb "repeat", argument "3"
//! repeatUntilTime(35min)             verb "repeatuntiltime", argument "2100"
//! Goblet Squat [category: SQUAT]     verb "goblet squat", category "SQUAT"
//! @P(5:30-6:00)                      verb "@p", argument "5:30-6:00"
//! ```
//!
//! ## Step Details
//! The value of a leaf step is a whitespace separated list of tokens, optionally
//! followed by `|` and a free-text description:
//!
//! ```text
//! 15min @H(z2)                       TIME 900, heart rate zone 2
//! 1000m @P(5:30-6:00)                DISTANCE 1000, pace target
//! 10 reps                            REPS 10
//! lap | Straight Arm Pull down x 10  LAP_BUTTON, description
//! ```
//!
//! Each token is checked against a fixed list of rules and the first rule that
//! matches wins. Tokens no rule understands are ignored but remembered, so
//! `10 reps` can look back at the `10`.
//!
//! ## Related Modules
//! - `ast` - Provides the step entries whose keys and details are parsed here
//! - `builder` - Turns the parsed pieces into workout steps
//! - `error` - `StepName` and `InvalidPace` errors

mod detail;
mod name;

pub use detail::{parse_detail, ParsedDetail};
pub use name::{parse_step_name, StepName};

use regex::Regex;
use std::sync::LazyLock;

/// First capture group of `pattern` in `text`, if the pattern compiled and matched.
fn first_capture<'t>(pattern: &LazyLock<Option<Regex>>, text: &'t str) -> Option<&'t str> {
    pattern
        .as_ref()?
        .captures(text)?
        .get(1)
        .map(|m| m.as_str())
}
