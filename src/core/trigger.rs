//! Pure next-trigger computation. No I/O; deterministic given schedule,
//! dose time and `now`.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::Result;
use crate::models::dose_time::{DoseTime, parse_time_local};
use crate::models::schedule::{DaySet, Schedule};

/// Compute the next absolute instant (epoch ms) this dose time should
/// fire, strictly after `now`, or `None` when no future occurrence exists
/// (PRN dose, expired window, or a day filter that never matches).
///
/// The stored IANA zone is authoritative: `now` is converted into the
/// schedule's zone, `time_local` is interpreted there, and the result is
/// converted back to an absolute timestamp. The cached value this feeds
/// is a snapshot; callers re-invoke on every relevant read/write cycle.
pub fn compute_next_trigger(
    schedule: &Schedule,
    dose: &DoseTime,
    now: DateTime<Utc>,
) -> Result<Option<i64>> {
    if dose.prn {
        return Ok(None);
    }

    let (hour, minute) = parse_time_local(&dose.time_local)?;
    let tz = schedule.tz()?;
    let days = &schedule.days_of_week;
    let now_ms = now.timestamp_millis();

    // Window start only matters while it is still ahead of `now`.
    let start_floor = schedule.start_date.filter(|&start| start > now_ms);

    // Anchor on today in the schedule's zone, or on the start date when
    // that is still in the future.
    let mut date = now.with_timezone(&tz).date_naive();
    if let Some(start) = start_floor
        && let Some(start_utc) = DateTime::from_timestamp_millis(start)
    {
        date = start_utc.with_timezone(&tz).date_naive();
    }

    let Some(first) = next_allowed_day(date, days) else {
        return Ok(None);
    };
    date = first;
    let mut candidate = local_instant(tz, date, hour, minute);

    // Advance past `now` (and past a still-future start date), one day at
    // a time so the day filter stays applied.
    while candidate.timestamp_millis() <= now_ms
        || start_floor.is_some_and(|start| candidate.timestamp_millis() < start)
    {
        let Some(next) = next_allowed_day(date + Duration::days(1), days) else {
            return Ok(None);
        };
        date = next;
        candidate = local_instant(tz, date, hour, minute);
    }

    if let Some(end) = schedule.end_date
        && candidate.timestamp_millis() > end
    {
        return Ok(None);
    }

    Ok(Some(candidate.timestamp_millis()))
}

/// First date on or after `from` whose weekday passes the filter. Capped
/// at 7 probes; a non-empty set that matches nothing resolves to `None`
/// (such a schedule is inert, not an error).
fn next_allowed_day(from: NaiveDate, days: &DaySet) -> Option<NaiveDate> {
    if days.is_empty() {
        return Some(from);
    }
    (0..7)
        .map(|i| from + Duration::days(i))
        .find(|d| days.contains(d.weekday()))
}

/// Resolve a wall-clock time in `tz` to an absolute instant. Ambiguous
/// times (fall-back) take the earlier offset; gapped times (spring-forward)
/// slide one hour later. Exactness across DST transitions is not promised;
/// the next recompute converges.
pub(crate) fn local_instant(tz: Tz, date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => match tz.from_local_datetime(&(naive + Duration::hours(1))).earliest()
        {
            Some(dt) => dt.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&naive),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
