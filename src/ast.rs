//! # Step Input Types
//!
//! This module defines the input side of the Drill workout language: the ordered
//! list of single-key step mappings a user writes in a plan file.
//!
//! ## Type Hierarchy
//! ```text
//! Vec<StepEntry>
//!   └── StepEntry
//!         ├── key: String            "repeat(3)", "warmup", "Goblet Squat [category: SQUAT]"
//!         └── body: StepBody
//!               ├── Detail(String)   "15min @H(z2)", "10 reps", "lap | Description"
//!               └── Children(Vec<StepEntry>)
//! ```
//!
//! ## Source Shape
//! Each step is a mapping with exactly one key. The value is either a detail
//! string or a nested list of steps of the same shape:
//!
//! ```yaml
//! - warmup: 15min @H(z2)
//! - repeat(3):
//!     - run: 1000m @P(5:30-6:00)
//!     - recovery: 2min
//! - cooldown: lap
//! ```
//!
//! The detail/children split is resolved once here, during deserialization, so
//! later stages never inspect a dynamically shaped value.
//!
//! ## Related Modules
//! - `parser` - Parses the key and the detail of a step
//! - `builder` - Walks these entries to build the typed step tree
//! - `sport` - Scans these entries to infer the sport type

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// One step of a workout: a key plus either detail text or nested steps.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEntry {
    pub key: String,
    pub body: StepBody,
}

/// Value side of a step entry.
#[derive(Debug, Clone, PartialEq)]
pub enum StepBody {
    Detail(String),
    Children(Vec<StepEntry>),
}

impl StepEntry {
    /// Build a step with a detail string, e.g. `StepEntry::leaf("run", "5k")`.
    pub fn leaf(key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body: StepBody::Detail(detail.into()),
        }
    }

    /// Build a step with nested children, e.g. a `repeat(3)` block.
    pub fn group(key: impl Into<String>, children: Vec<StepEntry>) -> Self {
        Self {
            key: key.into(),
            body: StepBody::Children(children),
        }
    }

    /// Detail text when the step is a leaf.
    pub fn detail(&self) -> Option<&str> {
        match &self.body {
            StepBody::Detail(detail) => Some(detail),
            StepBody::Children(_) => None,
        }
    }

    /// Nested steps when the step is a group.
    pub fn children(&self) -> Option<&[StepEntry]> {
        match &self.body {
            StepBody::Detail(_) => None,
            StepBody::Children(children) => Some(children),
        }
    }
}

impl<'de> Deserialize<'de> for StepEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StepEntryVisitor)
    }
}

struct StepEntryVisitor;

impl<'de> Visitor<'de> for StepEntryVisitor {
    type Value = StepEntry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping with exactly one step key")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<StepEntry, A::Error> {
        let (key, body) = map
            .next_entry::<String, StepBody>()?
            .ok_or_else(|| de::Error::custom("step mapping is empty"))?;

        if let Some(extra) = map.next_key::<String>()? {
            return Err(de::Error::custom(format!(
                "step '{}' has a second key '{}'; write each step as its own list item",
                key, extra
            )));
        }

        Ok(StepEntry { key, body })
    }
}

impl<'de> Deserialize<'de> for StepBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StepBodyVisitor)
    }
}

struct StepBodyVisitor;

impl<'de> Visitor<'de> for StepBodyVisitor {
    type Value = StepBody;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a step detail string or a list of nested steps")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<StepBody, E> {
        Ok(StepBody::Detail(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<StepBody, E> {
        Ok(StepBody::Detail(v))
    }

    // `rest: 60` is read the same as `rest: "60"`
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<StepBody, E> {
        Ok(StepBody::Detail(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<StepBody, E> {
        Ok(StepBody::Detail(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<StepBody, E> {
        Ok(StepBody::Detail(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<StepBody, E> {
        Ok(StepBody::Detail(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<StepBody, E> {
        Ok(StepBody::Detail(String::new()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<StepBody, A::Error> {
        let mut children = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(child) = seq.next_element::<StepEntry>()? {
            children.push(child);
        }
        Ok(StepBody::Children(children))
    }
}
