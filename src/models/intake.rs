use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

// ---------------------------------------------------------------------------
// IntakeStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStatus {
    Taken,
    Missed,
    Skipped,
    Snoozed,
}

impl FromStr for IntakeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "taken" => Ok(Self::Taken),
            "missed" => Ok(Self::Missed),
            "skipped" => Ok(Self::Skipped),
            "snoozed" => Ok(Self::Snoozed),
            other => Err(Error::validation(
                "status",
                format!("unknown intake status: {other}"),
            )),
        }
    }
}

impl fmt::Display for IntakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Taken => write!(f, "taken"),
            Self::Missed => write!(f, "missed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Snoozed => write!(f, "snoozed"),
        }
    }
}

// ---------------------------------------------------------------------------
// IntakeLog
// ---------------------------------------------------------------------------

/// One adherence event against a dose time. Append-only; rows are never
/// mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeLog {
    pub id: String,
    pub dose_time_id: String,
    /// Epoch ms of the intake event.
    pub taken_ts: i64,
    pub status: IntakeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_dose_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_dose_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl IntakeLog {
    pub fn new(dose_time_id: impl Into<String>, status: IntakeStatus, taken_ts: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            dose_time_id: dose_time_id.into(),
            taken_ts,
            status,
            actual_dose_amount: None,
            actual_dose_unit: None,
            notes: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
