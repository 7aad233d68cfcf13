//! # Platform Boundary
//!
//! The workout platform is reached through the [`PlatformClient`] trait. This
//! module drives a client through the two plan operations:
//!
//! - [`import_workouts()`] - Compile and upload every workout of a plan,
//!   optionally deleting remote workouts that share a name first
//! - [`schedule_workouts()`] - Put named workouts on consecutive days
//!
//! [`RecordingClient`] keeps everything in memory and records each call. The
//! `plan` command uses it for dry runs.

use crate::constants::DATE_FORMAT;
use crate::error::DrillError;
use crate::json::{to_document, WorkoutDocument};
use crate::plan::WorkoutPlan;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Remote workout as listed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub workout_id: u64,
    pub workout_name: String,
}

/// Platform response to an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportAck {
    pub workout_id: u64,
    pub workout_name: String,
}

/// Operations the compiler needs from the workout platform.
pub trait PlatformClient {
    fn import_workout(&mut self, document: &WorkoutDocument) -> Result<ImportAck, DrillError>;

    fn get_all_workouts(&mut self) -> Result<Vec<WorkoutSummary>, DrillError>;

    /// Returns whether the platform reported the deletion as successful.
    fn delete_workout(&mut self, workout: &WorkoutSummary) -> Result<bool, DrillError>;

    /// Returns whether the platform reported the schedule as successful.
    fn schedule_workout(&mut self, workout_id: u64, date: NaiveDate) -> Result<bool, DrillError>;
}

/// Compile and import every workout, in order.
///
/// With `delete_same_name` set, the remote workout list is fetched once and
/// every remote workout named like the one being imported is deleted first.
///
/// # Errors
/// Stops at the first compile or client error.
pub fn import_workouts<C: PlatformClient + ?Sized>(
    workouts: &[WorkoutPlan],
    delete_same_name: bool,
    client: &mut C,
) -> Result<Vec<ImportAck>, DrillError> {
    let existing = if delete_same_name {
        client.get_all_workouts()?
    } else {
        Vec::new()
    };

    let mut acks = Vec::with_capacity(workouts.len());
    for workout in workouts {
        for stale in existing.iter().filter(|w| w.workout_name == workout.name) {
            let deleted = client.delete_workout(stale)?;
            if deleted {
                info!(workout = %stale.workout_name, id = stale.workout_id, "deleted workout");
            } else {
                warn!(workout = %stale.workout_name, id = stale.workout_id, "delete was not confirmed");
            }
        }

        let model = workout.compile()?;
        let ack = client.import_workout(&to_document(&model))?;
        info!(workout = %ack.workout_name, id = ack.workout_id, "imported workout");
        acks.push(ack);
    }
    Ok(acks)
}

/// Schedule `names` on consecutive days starting at `start_from`.
///
/// Each listed name takes the next day, even when it is skipped because no
/// remote workout has that name. With duplicate remote names the last listed
/// one wins. Returns the `(name, date)` pairs that were scheduled.
///
/// # Example
/// ```rust
/// use drill::platform::{schedule_workouts, RecordingClient};
///
/// let mut client = RecordingClient::with_workouts(["easy", "tempo"]);
/// let names = vec!["easy".to_string(), "missing".to_string(), "tempo".to_string()];
/// let scheduled = schedule_workouts("2024-06-03", &names, &mut client)?;
///
/// let days: Vec<String> = scheduled.iter().map(|(_, d)| d.to_string()).collect();
/// assert_eq!(days, vec!["2024-06-03", "2024-06-05"]);
/// # Ok::<(), drill::DrillError>(())
/// ```
///
/// # Errors
/// Returns [`DrillError::Schedule`] if `start_from` is not `YYYY-MM-DD`, and
/// any client error.
pub fn schedule_workouts<C: PlatformClient + ?Sized>(
    start_from: &str,
    names: &[String],
    client: &mut C,
) -> Result<Vec<(String, NaiveDate)>, DrillError> {
    let start = parse_date(start_from)?;

    let remote: HashMap<String, u64> = client
        .get_all_workouts()?
        .into_iter()
        .map(|w| (w.workout_name, w.workout_id))
        .collect();
    debug!(count = remote.len(), "fetched remote workouts");

    let mut scheduled = Vec::new();
    for (offset, name) in names.iter().enumerate() {
        let date = start
            .checked_add_days(Days::new(offset as u64))
            .ok_or_else(|| DrillError::Schedule(format!("date out of range after {}", start)))?;

        let Some(&workout_id) = remote.get(name) else {
            warn!(workout = %name, "workout not found on the platform, skipping");
            continue;
        };

        if client.schedule_workout(workout_id, date)? {
            info!(workout = %name, %date, "scheduled workout");
            scheduled.push((name.clone(), date));
        } else {
            warn!(workout = %name, %date, "schedule was not confirmed");
        }
    }
    Ok(scheduled)
}

/// Parse a schedule date in `YYYY-MM-DD` form.
pub fn parse_date(text: &str) -> Result<NaiveDate, DrillError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        DrillError::Schedule(format!("'{}' is not a YYYY-MM-DD date: {}", text, e))
    })
}

/// One call made against a [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Import { workout_id: u64, workout_name: String },
    List,
    Delete { workout_id: u64, workout_name: String },
    Schedule { workout_id: u64, date: NaiveDate },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Import { workout_id, workout_name } => {
                write!(f, "import  #{} {}", workout_id, workout_name)
            }
            Operation::List => write!(f, "list"),
            Operation::Delete { workout_id, workout_name } => {
                write!(f, "delete  #{} {}", workout_id, workout_name)
            }
            Operation::Schedule { workout_id, date } => {
                write!(f, "schedule #{} on {}", workout_id, date.format(DATE_FORMAT))
            }
        }
    }
}

/// In-memory platform. Imports get increasing ids; every call is logged.
#[derive(Debug, Default)]
pub struct RecordingClient {
    workouts: Vec<WorkoutSummary>,
    documents: Vec<WorkoutDocument>,
    operations: Vec<Operation>,
    next_id: u64,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self { next_id: 1, ..Self::default() }
    }

    /// Client that already holds workouts with these names.
    pub fn with_workouts<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut client = Self::new();
        for name in names {
            let workout_id = client.allocate_id();
            client.workouts.push(WorkoutSummary { workout_id, workout_name: name.into() });
        }
        client
    }

    pub fn workouts(&self) -> &[WorkoutSummary] {
        &self.workouts
    }

    /// Documents received by `import_workout`, in order.
    pub fn documents(&self) -> &[WorkoutDocument] {
        &self.documents
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }
}

impl PlatformClient for RecordingClient {
    fn import_workout(&mut self, document: &WorkoutDocument) -> Result<ImportAck, DrillError> {
        let workout_id = self.allocate_id();
        let workout_name = document.workout_name.clone();
        self.workouts.push(WorkoutSummary { workout_id, workout_name: workout_name.clone() });
        self.documents.push(document.clone());
        self.operations.push(Operation::Import { workout_id, workout_name: workout_name.clone() });
        Ok(ImportAck { workout_id, workout_name })
    }

    fn get_all_workouts(&mut self) -> Result<Vec<WorkoutSummary>, DrillError> {
        self.operations.push(Operation::List);
        Ok(self.workouts.clone())
    }

    fn delete_workout(&mut self, workout: &WorkoutSummary) -> Result<bool, DrillError> {
        let before = self.workouts.len();
        self.workouts.retain(|w| w.workout_id != workout.workout_id);
        self.operations.push(Operation::Delete {
            workout_id: workout.workout_id,
            workout_name: workout.workout_name.clone(),
        });
        Ok(self.workouts.len() < before)
    }

    fn schedule_workout(&mut self, workout_id: u64, date: NaiveDate) -> Result<bool, DrillError> {
        let known = self.workouts.iter().any(|w| w.workout_id == workout_id);
        self.operations.push(Operation::Schedule { workout_id, date });
        Ok(known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StepEntry;

    fn workout(name: &str) -> WorkoutPlan {
        WorkoutPlan {
            name: name.to_string(),
            sport: None,
            steps: vec![StepEntry::leaf("run", "5k")],
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_import_assigns_increasing_ids() {
        let mut client = RecordingClient::new();
        let acks = import_workouts(&[workout("a"), workout("b")], false, &mut client).unwrap();
        assert_eq!(acks[0].workout_id, 1);
        assert_eq!(acks[1].workout_id, 2);
        assert_eq!(client.documents().len(), 2);
        assert_eq!(client.documents()[1].workout_name, "b");
        assert!(!client.operations().contains(&Operation::List));
    }

    #[test]
    fn test_import_deletes_same_name_first() {
        let mut client = RecordingClient::with_workouts(["a", "other", "a"]);
        import_workouts(&[workout("a")], true, &mut client).unwrap();
        assert_eq!(
            client.operations(),
            &[
                Operation::List,
                Operation::Delete { workout_id: 1, workout_name: "a".to_string() },
                Operation::Delete { workout_id: 3, workout_name: "a".to_string() },
                Operation::Import { workout_id: 4, workout_name: "a".to_string() },
            ]
        );
        let remaining: Vec<_> = client.workouts().iter().map(|w| w.workout_id).collect();
        assert_eq!(remaining, vec![2, 4]);
    }

    #[test]
    fn test_import_without_delete_keeps_duplicates() {
        let mut client = RecordingClient::with_workouts(["a"]);
        import_workouts(&[workout("a")], false, &mut client).unwrap();
        assert_eq!(client.workouts().len(), 2);
    }

    #[test]
    fn test_import_stops_on_compile_error() {
        let mut bad = workout("bad");
        bad.steps = vec![StepEntry::leaf("(oops)", "lap")];
        let mut client = RecordingClient::new();
        let err = import_workouts(&[workout("a"), bad, workout("c")], false, &mut client)
            .unwrap_err();
        assert!(matches!(err, DrillError::StepName { .. }));
        assert_eq!(client.documents().len(), 1);
    }

    #[test]
    fn test_schedule_consecutive_days_with_gaps() {
        let mut client = RecordingClient::with_workouts(["a", "b"]);
        let scheduled =
            schedule_workouts("2024-02-28", &names(&["a", "x", "b"]), &mut client).unwrap();
        assert_eq!(
            scheduled,
            vec![
                ("a".to_string(), NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()),
                ("b".to_string(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            ]
        );
    }

    #[test]
    fn test_schedule_last_duplicate_name_wins() {
        let mut client = RecordingClient::with_workouts(["a", "a"]);
        schedule_workouts("2024-01-01", &names(&["a"]), &mut client).unwrap();
        assert!(client.operations().contains(&Operation::Schedule {
            workout_id: 2,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }));
    }

    #[test]
    fn test_schedule_rejects_bad_date() {
        let mut client = RecordingClient::new();
        let err = schedule_workouts("03/06/2024", &names(&["a"]), &mut client).unwrap_err();
        assert!(matches!(err, DrillError::Schedule(_)));
        assert!(client.operations().is_empty());
    }

    #[test]
    fn test_operation_display() {
        let op = Operation::Schedule {
            workout_id: 7,
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        };
        assert_eq!(op.to_string(), "schedule #7 on 2024-06-03");
    }
}
