use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// DaySet
// ---------------------------------------------------------------------------

const DAY_CODES: [(&str, Weekday); 7] = [
    ("MON", Weekday::Mon),
    ("TUE", Weekday::Tue),
    ("WED", Weekday::Wed),
    ("THU", Weekday::Thu),
    ("FRI", Weekday::Fri),
    ("SAT", Weekday::Sat),
    ("SUN", Weekday::Sun),
];

/// A set of weekdays stored as the comma-separated three-letter form
/// (`MON,WED,FRI`). The empty set means "every day".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySet(u8);

impl DaySet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_days(days: &[Weekday]) -> Self {
        let mut set = Self::empty();
        for d in days {
            set.0 |= Self::bit(*d);
        }
        set
    }

    /// Parse the stored text form, ignoring tokens that are not weekday
    /// codes. Rows written through the store never contain such tokens,
    /// but externally written data may; those degrade to "every day".
    pub fn parse_lenient(raw: &str) -> Self {
        let mut set = Self::empty();
        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match Self::code_to_day(token) {
                Some(d) => set.0 |= Self::bit(d),
                None => {
                    tracing::warn!(token, "ignoring unrecognized day-of-week token");
                }
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Whether a dose may fire on `day`: an empty set allows every day.
    pub fn allows(&self, day: Weekday) -> bool {
        self.is_empty() || self.contains(day)
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    fn code_to_day(token: &str) -> Option<Weekday> {
        let upper = token.to_ascii_uppercase();
        DAY_CODES
            .iter()
            .find(|(code, _)| *code == upper)
            .map(|(_, d)| *d)
    }
}

impl FromStr for DaySet {
    type Err = Error;

    /// Strict parse used at the write boundary: every token must be a
    /// weekday code.
    fn from_str(s: &str) -> Result<Self> {
        let mut set = Self::empty();
        for token in s.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let day = Self::code_to_day(token).ok_or_else(|| {
                Error::validation(
                    "days_of_week",
                    format!("unknown day code '{token}', expected MON..SUN"),
                )
            })?;
            set.0 |= Self::bit(day);
        }
        Ok(set)
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = DAY_CODES
            .iter()
            .filter(|(_, d)| self.contains(*d))
            .map(|(code, _)| *code)
            .collect();
        write!(f, "{}", codes.join(","))
    }
}

impl Serialize for DaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&s))
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// A recurrence window bound to one medication. Owns the dose times that
/// actually produce reminders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub medication_id: String,
    /// Free-text label, e.g. "daily" or "every other morning".
    pub recurrence_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_per_day: Option<u32>,
    pub is_forever: bool,
    /// Epoch ms, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    /// Epoch ms, inclusive. Must be absent while `is_forever` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<i64>,
    pub days_of_week: DaySet,
    /// IANA zone id; `time_local` on the owned dose times is interpreted
    /// in this zone.
    pub timezone: String,
    pub reminder_enabled: bool,
}

impl Schedule {
    pub fn new(
        medication_id: impl Into<String>,
        recurrence_label: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            medication_id: medication_id.into(),
            recurrence_label: recurrence_label.into(),
            frequency_per_day: None,
            is_forever: true,
            start_date: None,
            end_date: None,
            days_of_week: DaySet::empty(),
            timezone: timezone.into(),
            reminder_enabled: true,
        }
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| Error::UnknownTimezone(self.timezone.clone()))
    }

    /// Invariant checks applied before any write reaches the store.
    pub fn validate(&self) -> Result<()> {
        if self.is_forever && self.end_date.is_some() {
            return Err(Error::validation(
                "end_date",
                "a forever schedule cannot carry an end date",
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && end < start
        {
            return Err(Error::validation("end_date", "end date precedes start date"));
        }
        self.tz()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
