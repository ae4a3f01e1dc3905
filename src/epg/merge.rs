use std::collections::{BTreeMap, HashMap, HashSet};

use crate::epg::model::{Channel, FeedDocument, Programme, channel_key};
use crate::epg::time::parse_source_time;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub channels: usize,
    pub programmes: usize,
    /// Lower-priority programmes dropped for sharing a channel and raw start
    /// with a higher-priority one.
    pub superseded: usize,
    /// Programmes whose channel id is not declared by their own feed.
    pub unmapped: usize,
    /// Kept programmes with an unreadable timestamp or a stop that is not
    /// after the start. Each is counted once, however many days are built.
    pub unparseable: usize,
}

/// Channels and programmes of several feeds, keyed by normalized channel name.
///
/// Source ids are only meaningful inside their own feed, so every programme is
/// re-keyed through its feed's id -> name mapping before grouping. A channel
/// carried by two feeds under different ids still gets the programmes of both.
#[derive(Debug, Default)]
pub struct MergedGuide {
    channels: BTreeMap<String, Channel>,
    programmes: HashMap<String, Vec<Programme>>,
    stats: MergeStats,
}

impl MergedGuide {
    /// `documents` must be ordered by priority, highest first.
    pub fn merge(documents: &[FeedDocument]) -> Self {
        let mut channels = BTreeMap::new();
        // Lowest priority first so that higher-priority records overwrite
        // whole entries.
        for document in documents.iter().rev() {
            for channel in &document.channels {
                let key = channel_key(&channel.display_name);
                if !key.is_empty() {
                    channels.insert(key, channel.clone());
                }
            }
        }

        let mut programmes: HashMap<String, Vec<Programme>> = HashMap::new();
        let mut claimed: HashMap<String, HashSet<String>> = HashMap::new();
        let mut stats = MergeStats::default();

        for document in documents {
            let keys_by_id = document.channel_keys();
            let mut starts: Vec<(&str, &str)> = Vec::new();

            for programme in &document.programmes {
                let Some(key) = keys_by_id.get(programme.channel_id.as_str()) else {
                    stats.unmapped += 1;
                    continue;
                };

                let taken = claimed
                    .get(key)
                    .is_some_and(|seen| seen.contains(&programme.start_raw));
                if taken {
                    stats.superseded += 1;
                    continue;
                }

                if !has_usable_interval(programme) {
                    stats.unparseable += 1;
                }
                starts.push((key.as_str(), programme.start_raw.as_str()));
                programmes
                    .entry(key.clone())
                    .or_default()
                    .push(programme.clone());
            }

            tracing::debug!(source = %document.source_name, kept = starts.len(), "Merged feed");

            // Claims only apply to lower-priority feeds, never within a feed.
            for (key, start) in starts {
                claimed
                    .entry(key.to_string())
                    .or_default()
                    .insert(start.to_string());
            }
        }

        stats.channels = channels.len();
        stats.programmes = programmes.values().map(Vec::len).sum();

        tracing::debug!(
            channels = stats.channels,
            programmes = stats.programmes,
            superseded = stats.superseded,
            unmapped = stats.unmapped,
            unparseable = stats.unparseable,
            "Merged guide feeds"
        );

        Self {
            channels,
            programmes,
            stats,
        }
    }

    pub fn channels(&self) -> &BTreeMap<String, Channel> {
        &self.channels
    }

    pub fn programmes_for(&self, key: &str) -> &[Programme] {
        self.programmes.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn stats(&self) -> MergeStats {
        self.stats
    }
}

fn has_usable_interval(programme: &Programme) -> bool {
    let zone = chrono_tz::UTC;
    match (
        parse_source_time(&programme.start_raw, zone),
        parse_source_time(&programme.stop_raw, zone),
    ) {
        (Ok(start), Ok(stop)) => stop > start,
        _ => false,
    }
}
