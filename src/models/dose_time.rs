use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// DoseTime
// ---------------------------------------------------------------------------

/// A specific time-of-day + dosage under one schedule. Holds the cached
/// next-trigger instant, recomputed on every relevant write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseTime {
    pub id: String,
    pub schedule_id: String,
    /// "HH:MM", 24-hour, interpreted in the owning schedule's timezone.
    pub time_local: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// As-needed doses never produce a trigger.
    pub prn: bool,
    pub sort_order: i64,
    /// Cached epoch ms; `None` means no future occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_trigger_ts: Option<i64>,
}

impl DoseTime {
    pub fn new(schedule_id: impl Into<String>, time_local: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            schedule_id: schedule_id.into(),
            time_local: time_local.into(),
            dosage: None,
            dose_amount: None,
            dose_unit: None,
            instructions: None,
            prn: false,
            sort_order: 0,
            next_trigger_ts: None,
        }
    }
}

// ---------------------------------------------------------------------------
// parse_time_local
// ---------------------------------------------------------------------------

/// Parse "HH:MM" into (hour, minute), rejecting anything outside
/// 00-23:00-59.
pub fn parse_time_local(s: &str) -> Result<(u32, u32)> {
    let mut parts = s.trim().splitn(2, ':');
    let (Some(h), Some(m)) = (parts.next(), parts.next()) else {
        return Err(Error::InvalidTimeFormat(s.to_string()));
    };
    let hour: u32 = h
        .trim()
        .parse()
        .map_err(|_| Error::InvalidTimeFormat(s.to_string()))?;
    let minute: u32 = m
        .trim()
        .parse()
        .map_err(|_| Error::InvalidTimeFormat(s.to_string()))?;
    if hour > 23 || minute > 59 {
        return Err(Error::InvalidTimeFormat(s.to_string()));
    }
    Ok((hour, minute))
}

// ---------------------------------------------------------------------------
// ParsedDosage + parse_dosage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDosage {
    pub raw: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

/// Parse a free-text dosage into a structured amount + unit.
///
/// Handles decimal (`"400mg"`), fraction (`"1/2 tablet"`), unicode fraction
/// (`"\u{00bd} tablet"`), and space-separated (`"2 drops"`) forms. Bare text
/// (`"thin layer"`) and empty input keep the amount unset.
pub fn parse_dosage(input: Option<&str>) -> ParsedDosage {
    let raw = match input {
        Some(s) if !s.trim().is_empty() => s,
        _ => {
            return ParsedDosage {
                raw: String::new(),
                amount: None,
                unit: None,
            };
        }
    };

    let trimmed = raw.trim();

    if let Some(parsed) = try_unicode_fraction(trimmed) {
        return parsed;
    }
    if let Some(parsed) = try_fraction(trimmed) {
        return parsed;
    }
    if let Some(parsed) = try_decimal(trimmed) {
        return parsed;
    }

    ParsedDosage {
        raw: raw.to_string(),
        amount: None,
        unit: None,
    }
}

fn unit_of(rest: &str) -> Option<String> {
    let rest = rest.trim();
    if rest.is_empty() {
        Some("dose".to_string())
    } else {
        Some(rest.to_string())
    }
}

fn try_unicode_fraction(s: &str) -> Option<ParsedDosage> {
    let fractions: &[(char, f64)] = &[
        ('\u{00bd}', 0.5), // ½
        ('\u{2153}', 1.0 / 3.0),
        ('\u{2154}', 2.0 / 3.0),
        ('\u{00bc}', 0.25), // ¼
        ('\u{00be}', 0.75), // ¾
    ];

    let first = s.chars().next()?;
    for &(ch, val) in fractions {
        if first == ch {
            return Some(ParsedDosage {
                raw: s.to_string(),
                amount: Some(val),
                unit: unit_of(&s[ch.len_utf8()..]),
            });
        }
    }
    None
}

fn try_fraction(s: &str) -> Option<ParsedDosage> {
    let re = Regex::new(r"^(\d+)\s*/\s*(\d+)\s*(.*)$").ok()?;
    let caps = re.captures(s)?;
    let num: f64 = caps[1].parse().ok()?;
    let den: f64 = caps[2].parse().ok()?;
    if den == 0.0 || num == 0.0 {
        return None;
    }
    Some(ParsedDosage {
        raw: s.to_string(),
        amount: Some(num / den),
        unit: unit_of(&caps[3]),
    })
}

fn try_decimal(s: &str) -> Option<ParsedDosage> {
    // Must start with a digit or a dot followed by a digit
    let re = Regex::new(r"^(\d+\.?\d*|\.\d+)\s*(.*)$").ok()?;
    let caps = re.captures(s)?;
    let val: f64 = caps[1].parse().ok()?;
    if val <= 0.0 {
        return None;
    }
    Some(ParsedDosage {
        raw: s.to_string(),
        amount: Some(val),
        unit: unit_of(&caps[2]),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
