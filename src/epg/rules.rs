use std::path::Path;

use anyhow::{Context, Result};

/// One line of a filter file: which channel to look for and where its
/// schedule goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub requested_name: String,
    pub output_name: String,
}

pub fn load_rules(path: &Path) -> Result<Vec<FilterRule>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read filter file: {}", path.display()))?;
    Ok(parse_rules(&text))
}

/// Parse filter text, one rule per line.
///
/// `NAME` derives the output name from the cleaned-up channel name;
/// `NAME=OUTPUT` uses `OUTPUT` verbatim. Blank lines and `#` comments are
/// skipped. Order is preserved and duplicates are kept.
pub fn parse_rules(text: &str) -> Vec<FilterRule> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rules = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (left, output) = match line.split_once('=') {
            Some((left, right)) => (left, Some(right.trim()).filter(|r| !r.is_empty())),
            None => (line, None),
        };

        let requested_name = clean_channel_name(left);
        if requested_name.is_empty() {
            tracing::warn!(line = index + 1, content = %line, "Ignoring filter rule without a channel name");
            continue;
        }

        let output_name = match output {
            Some(output) => output.to_string(),
            None => derived_output_name(&requested_name),
        };

        rules.push(FilterRule {
            requested_name,
            output_name,
        });
    }

    rules
}

/// Strip `.json`, turn `-` and `_` into spaces and collapse whitespace.
fn clean_channel_name(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw.strip_suffix(".json").unwrap_or(raw);
    raw.replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn derived_output_name(requested_name: &str) -> String {
    format!("{}.json", requested_name.to_lowercase().replace(' ', "-"))
}
