//! # Error Types
//!
//! This module defines all error types for the Drill compiler.
//!
//! Every error carries the offending piece of input (a step key, a detail token,
//! a date string) so a user can find and fix the line in their plan file.
//!
//! ## Error Types
//! - `StepName` - A step key that does not match the step-name grammar
//! - `InvalidPace` - A `@P(...)` target that is not two `mm:ss` bounds
//! - `InvalidStep` - A step entry with the wrong shape (not a single-key mapping)
//! - `Plan` - An unreadable or malformed plan document
//! - `Schedule` - An invalid schedule start date
//! - `Serialize` - A workout document that could not be written as JSON
//! - `Platform` - A failure reported by the workout platform client
//!
//! ## Usage
//! ```rust
//! use drill::{compile_steps, DrillError, StepEntry};
//!
//! let steps = vec![StepEntry::leaf("(oops)", "10 reps")];
//! match compile_steps("broken", &steps, None) {
//!     Ok(_) => unreachable!(),
//!     Err(DrillError::StepName { key, .. }) => assert_eq!(key, "(oops)"),
//!     Err(e) => panic!("unexpected error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrillError {
    /// Step key that the step-name grammar rejects.
    ///
    /// Fatal for the whole compile: a step is never silently dropped.
    ///
    /// # Example
    /// ```
    /// # use drill::DrillError;
    /// let err = DrillError::StepName {
    ///     key: "(3)".to_string(),
    ///     message: "expected a step name before the argument".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid step name '(3)': expected a step name before the argument"
    /// );
    /// ```
    #[error("Invalid step name '{key}': {message}")]
    StepName { key: String, message: String },

    /// Pace target that is not exactly two `mm:ss` values separated by `-`.
    ///
    /// # Example
    /// ```
    /// # use drill::DrillError;
    /// let err = DrillError::InvalidPace {
    ///     token: "@P(5:30)".to_string(),
    ///     message: "expected two bounds separated by '-'".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid pace target '@P(5:30)': expected two bounds separated by '-'"
    /// );
    /// ```
    #[error("Invalid pace target '{token}': {message}")]
    InvalidPace { token: String, message: String },

    /// Step entry with an unexpected shape.
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    /// Plan document that cannot be read or has the wrong structure.
    #[error("Invalid plan: {0}")]
    Plan(String),

    /// Schedule plan with an unusable start date.
    #[error("Invalid schedule: {0}")]
    Schedule(String),

    /// Workout document that could not be written as JSON.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Error returned by a [`crate::platform::PlatformClient`].
    #[error("Platform error: {0}")]
    Platform(String),
}
