use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    /// Source-assigned id. Only unique within the feed it came from.
    pub id: String,
    pub display_name: String,
    pub icon_url: Option<String>,
}

impl Channel {
    pub fn logo(&self) -> &str {
        self.icon_url.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Programme {
    pub channel_id: String,
    pub start_raw: String,
    pub stop_raw: String,
    pub title: String,
    /// Parsed from `<desc>` and `<category>` but not part of the emitted
    /// schedule.
    #[allow(dead_code)]
    pub description: Option<String>,
    #[allow(dead_code)]
    pub category: Option<String>,
    pub icon_url: Option<String>,
}

impl Programme {
    pub fn logo(&self) -> &str {
        self.icon_url.as_deref().unwrap_or_default()
    }
}

/// One decoded feed, as produced by a source.
#[derive(Debug, Clone, Default)]
pub struct FeedDocument {
    pub source_name: String,
    pub channels: Vec<Channel>,
    pub programmes: Vec<Programme>,
}

impl FeedDocument {
    /// Maps each channel id of this feed to the normalized key of its name.
    /// Channels whose name normalizes to nothing are left out.
    pub fn channel_keys(&self) -> HashMap<&str, String> {
        self.channels
            .iter()
            .filter_map(|channel| {
                let key = channel_key(&channel.display_name);
                (!key.is_empty()).then_some((channel.id.as_str(), key))
            })
            .collect()
    }
}

/// Case-fold `name` and keep only letters and digits.
pub fn channel_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}
