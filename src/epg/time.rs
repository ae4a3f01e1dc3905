use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::EpgError;

/// Parse an XMLTV timestamp (`YYYYMMDDHHmmss[ ±HHMM]`) as UTC and project it
/// into `zone`.
///
/// Only the first whitespace-delimited token is read and it must be exactly
/// fourteen ASCII digits forming a valid civil time. The offset token is
/// ignored.
pub fn parse_source_time(raw: &str, zone: Tz) -> Result<DateTime<Tz>, EpgError> {
    let malformed = || EpgError::MalformedTimestamp(raw.to_string());

    let token = raw.split_whitespace().next().ok_or_else(malformed)?;
    if token.len() != 14 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    // All-digit ASCII, so every slice lands on a char boundary.
    let field = |range: std::ops::Range<usize>| token[range].parse::<u32>().map_err(|_| malformed());
    let year = i32::try_from(field(0..4)?).map_err(|_| malformed())?;

    let naive = NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)
        .and_then(|date| date.and_hms_opt(field(8..10).ok()?, field(10..12).ok()?, field(12..14).ok()?))
        .ok_or_else(malformed)?;

    Ok(Utc.from_utc_datetime(&naive).with_timezone(&zone))
}

/// Format the wall-clock time of `instant` as `hh:mm AM|PM`.
pub fn format_clock_12h<Z: TimeZone>(instant: &DateTime<Z>) -> String {
    let (hour, suffix) = match instant.hour() {
        0 => (12, "AM"),
        12 => (12, "PM"),
        h @ 13..=23 => (h - 12, "PM"),
        h => (h, "AM"),
    };
    format!("{hour:02}:{:02} {suffix}", instant.minute())
}

/// A calendar date as understood in one civil timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDay {
    date: NaiveDate,
    zone: Tz,
}

impl CivilDay {
    pub fn new(date: NaiveDate, zone: Tz) -> Self {
        Self { date, zone }
    }

    pub fn containing<Z: TimeZone>(instant: &DateTime<Z>, zone: Tz) -> Self {
        Self::new(instant.with_timezone(&zone).date_naive(), zone)
    }

    pub fn today(zone: Tz) -> Self {
        Self::containing(&Utc::now(), zone)
    }

    pub fn next(&self) -> Self {
        Self::new(self.date + Days::new(1), self.zone)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Local midnight, or the first valid local instant after it when a DST
    /// transition skips midnight.
    pub fn start(&self) -> DateTime<Tz> {
        let midnight = self.date.and_time(NaiveTime::MIN);
        first_valid_local(self.zone, midnight)
    }

    /// Exclusive end of the day window: start + 24h.
    pub fn end(&self) -> DateTime<Tz> {
        self.start() + TimeDelta::hours(24)
    }

    /// `YYYY-MM-DD`
    pub fn label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

fn first_valid_local(zone: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    (0..=4)
        .find_map(|step| {
            zone.from_local_datetime(&(local + TimeDelta::minutes(30 * step)))
                .earliest()
        })
        .unwrap_or_else(|| zone.from_utc_datetime(&local))
}
