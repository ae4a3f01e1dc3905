use std::collections::HashSet;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::epg::model::Programme;
use crate::epg::time::{CivilDay, format_clock_12h, parse_source_time};

#[derive(Debug, Clone)]
pub struct ScheduledProgramme<'a> {
    pub programme: &'a Programme,
    pub start: DateTime<Tz>,
    pub stop: DateTime<Tz>,
}

#[derive(Debug, Clone, Default)]
pub struct DaySchedule<'a> {
    pub entries: Vec<ScheduledProgramme<'a>>,
}

impl DaySchedule<'_> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Programmes overlapping `day`, unclipped, sorted by start.
///
/// Overlap is strict on both edges: start < window end and stop > window
/// start. Within the day a (clock start, title) pair is kept once, first
/// occurrence wins.
pub fn select_day<'a>(programmes: &'a [Programme], day: &CivilDay) -> DaySchedule<'a> {
    let zone = day.zone();
    let window_start = day.start();
    let window_end = day.end();

    let mut seen: HashSet<(String, &str)> = HashSet::new();
    let mut schedule = DaySchedule::default();

    for programme in programmes {
        let (Ok(start), Ok(stop)) = (
            parse_source_time(&programme.start_raw, zone),
            parse_source_time(&programme.stop_raw, zone),
        ) else {
            continue;
        };
        // Backwards and zero-length intervals are unusable.
        if stop <= start || start >= window_end || stop <= window_start {
            continue;
        }

        if !seen.insert((format_clock_12h(&start), programme.title.as_str())) {
            continue;
        }

        schedule.entries.push(ScheduledProgramme {
            programme,
            start,
            stop,
        });
    }

    schedule.entries.sort_by_key(|entry| entry.start);
    schedule
}
