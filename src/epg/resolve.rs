use std::collections::BTreeMap;

use crate::epg::model::{Channel, channel_key};
use crate::error::EpgError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub key: &'a str,
    pub channel: &'a Channel,
    pub kind: MatchKind,
}

/// Normalize a requested channel name the same way directory keys are built,
/// dropping a trailing `.json` first.
pub fn request_key(requested: &str) -> String {
    let trimmed = requested.trim();
    channel_key(trimmed.strip_suffix(".json").unwrap_or(trimmed))
}

/// Find the channel a request refers to.
///
/// An exact key match wins. Otherwise any key that contains the request, or is
/// contained by it, qualifies; among several the shortest key wins and equal
/// lengths fall back to lexicographic order.
pub fn resolve<'a>(
    requested: &str,
    directory: &'a BTreeMap<String, Channel>,
) -> Result<Resolved<'a>, EpgError> {
    let wanted = request_key(requested);
    if wanted.is_empty() {
        return Err(EpgError::ChannelNotFound(requested.to_string()));
    }

    if let Some((key, channel)) = directory.get_key_value(&wanted) {
        return Ok(Resolved {
            key,
            channel,
            kind: MatchKind::Exact,
        });
    }

    directory
        .iter()
        .filter(|(key, _)| key.contains(&wanted) || wanted.contains(key.as_str()))
        .min_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .map(|(key, channel)| Resolved {
            key,
            channel,
            kind: MatchKind::Fuzzy,
        })
        .ok_or_else(|| EpgError::ChannelNotFound(requested.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(names: &[&str]) -> BTreeMap<String, Channel> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                (
                    channel_key(name),
                    Channel {
                        id: i.to_string(),
                        display_name: name.to_string(),
                        icon_url: None,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn exact_match_ignores_formatting() {
        let dir = directory(&["SONY-SAB ", "Sony SAB HD"]);
        let found = resolve("Sony SAB", &dir).unwrap();
        assert_eq!(found.kind, MatchKind::Exact);
        assert_eq!(found.channel.display_name, "SONY-SAB ");
        assert_eq!(found.key, "sonysab");
    }

    #[test]
    fn json_suffix_is_stripped_before_lookup() {
        assert_eq!(request_key("9x-jhakaas.json"), "9xjhakaas");
        let dir = directory(&["9X Jhakaas"]);
        let found = resolve("9x-jhakaas.json", &dir).unwrap();
        assert_eq!(found.kind, MatchKind::Exact);
        assert_eq!(found.channel.display_name, "9X Jhakaas");
    }

    #[test]
    fn fuzzy_match_when_key_contains_request() {
        let dir = directory(&["Star Plus HD", "Zee TV"]);
        let found = resolve("Star Plus", &dir).unwrap();
        assert_eq!(found.kind, MatchKind::Fuzzy);
        assert_eq!(found.channel.display_name, "Star Plus HD");
    }

    #[test]
    fn fuzzy_match_when_request_contains_key() {
        let dir = directory(&["Colors", "Zee TV"]);
        let found = resolve("Colors TV India", &dir).unwrap();
        assert_eq!(found.kind, MatchKind::Fuzzy);
        assert_eq!(found.channel.display_name, "Colors");
    }

    #[test]
    fn fuzzy_tie_break_prefers_shortest_then_lexicographic() {
        let dir = directory(&["Sony Max 2", "Sony Max HD", "Sony Max1"]);
        // "sonymax2" and "sonymax1" are both 8 chars; "sonymaxhd" is longer.
        let found = resolve("Sony Max", &dir).unwrap();
        assert_eq!(found.key, "sonymax1");
    }

    #[test]
    fn unknown_channel_is_not_found() {
        let dir = directory(&["Colors", "Zee TV"]);
        let err = resolve("Discovery", &dir).unwrap_err();
        assert!(matches!(err, EpgError::ChannelNotFound(ref name) if name == "Discovery"));
    }

    #[test]
    fn empty_request_never_matches() {
        let dir = directory(&["Colors"]);
        assert!(resolve(" -- ", &dir).is_err());
        assert!(resolve(".json", &dir).is_err());
    }

    #[test]
    fn empty_directory_is_not_found() {
        let dir = BTreeMap::new();
        assert!(resolve("Colors", &dir).is_err());
    }
}
