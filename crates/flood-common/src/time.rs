//! Synthetic time values for time-series layers.
//!
//! Simulation output is published with one raster per yield step, and the
//! server indexes them by a fake calendar year: step `n` lives at
//! `{n:04}-01-01T00:00:00.000Z`. This module converts between the two.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest step the four-digit year field can carry.
pub const MAX_TIME_STEP: u32 = 9999;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A time-step index in `1..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TimeStep(u32);

impl TimeStep {
    /// The first step; every mode change resets to it.
    pub const FIRST: TimeStep = TimeStep(1);

    pub fn new(step: u32) -> Result<Self, TimeCodecError> {
        if (1..=MAX_TIME_STEP).contains(&step) {
            Ok(Self(step))
        } else {
            Err(TimeCodecError::OutOfRange(step))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// WMS TIME value for this step.
    pub fn encode(&self) -> String {
        encode(*self)
    }
}

impl Default for TimeStep {
    fn default() -> Self {
        TimeStep::FIRST
    }
}

impl fmt::Display for TimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for TimeStep {
    type Error = TimeCodecError;

    fn try_from(step: u32) -> Result<Self, Self::Error> {
        TimeStep::new(step)
    }
}

impl From<TimeStep> for u32 {
    fn from(step: TimeStep) -> Self {
        step.0
    }
}

/// Format a step as the timestamp the server expects.
pub fn encode(step: TimeStep) -> String {
    format!("{:04}-01-01T00:00:00.000Z", step.0)
}

/// Parse a timestamp produced by [`encode`] back into its step.
///
/// Anything that is not exactly the canonical encoding of an in-range step
/// is rejected.
pub fn decode(s: &str) -> Result<TimeStep, TimeCodecError> {
    let parsed = NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|_| TimeCodecError::InvalidFormat(s.to_string()))?;

    let year = u32::try_from(parsed.year())
        .map_err(|_| TimeCodecError::InvalidFormat(s.to_string()))?;
    let step = TimeStep::new(year)?;

    if encode(step) != s {
        return Err(TimeCodecError::InvalidFormat(s.to_string()));
    }
    Ok(step)
}

#[derive(Debug, thiserror::Error)]
pub enum TimeCodecError {
    #[error("Time step {0} is outside 1..=9999")]
    OutOfRange(u32),

    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}
