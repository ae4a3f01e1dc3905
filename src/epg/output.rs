use serde::{Deserialize, Serialize};

use crate::epg::model::Channel;
use crate::epg::schedule::{DaySchedule, ScheduledProgramme};
use crate::epg::time::{CivilDay, format_clock_12h};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelOutput {
    pub channel_name: String,
    pub channel_logo: String,
    pub date: String,
    pub programs: Vec<ProgramOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramOutput {
    pub show_name: String,
    pub start_time: String,
    pub end_time: String,
    pub show_logo: String,
}

impl From<&ScheduledProgramme<'_>> for ProgramOutput {
    fn from(entry: &ScheduledProgramme<'_>) -> Self {
        Self {
            show_name: entry.programme.title.clone(),
            start_time: format_clock_12h(&entry.start),
            end_time: format_clock_12h(&entry.stop),
            show_logo: entry.programme.logo().to_string(),
        }
    }
}

/// Build the document for one channel and day. `None` when nothing airs.
pub fn assemble(channel: &Channel, day: &CivilDay, schedule: &DaySchedule<'_>) -> Option<ChannelOutput> {
    if schedule.is_empty() {
        return None;
    }

    Some(ChannelOutput {
        channel_name: channel.display_name.clone(),
        channel_logo: channel.logo().to_string(),
        date: day.label(),
        programs: schedule.entries.iter().map(ProgramOutput::from).collect(),
    })
}

/// Turn an output identity into a safe file name: path-hostile characters
/// become `-`, then lowercase, spaces to `-`, and a `.json` suffix.
pub fn output_file_name(identity: &str) -> String {
    let sanitized: String = identity
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '-',
            c => c,
        })
        .collect();
    let name = sanitized.trim().to_lowercase().replace(' ', "-");

    if name.ends_with(".json") {
        name
    } else {
        format!("{name}.json")
    }
}
