use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_CONFIG_FILE: &str = "epg.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_timezone", deserialize_with = "deserialize_timezone")]
    pub timezone: Tz,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_guides")]
    pub guides: Vec<GuideConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuideConfig {
    pub name: String,
    #[serde(default = "default_filter")]
    pub filter: PathBuf,
    #[serde(default = "default_today_dir")]
    pub today_dir: PathBuf,
    #[serde(default = "default_tomorrow_dir")]
    pub tomorrow_dir: PathBuf,
    /// Highest priority first.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SourceConfig {
    Http {
        name: String,
        url: String,
        #[serde(default)]
        compression: Compression,
    },
    File {
        name: String,
        path: PathBuf,
        #[serde(default)]
        compression: Compression,
    },
}

impl SourceConfig {
    pub fn name(&self) -> &str {
        match self {
            SourceConfig::Http { name, .. } | SourceConfig::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compression {
    #[default]
    Auto,
    Gzip,
    None,
}

fn default_timezone() -> Tz {
    chrono_tz::Asia::Kolkata
}

fn deserialize_timezone<'de, D>(deserializer: D) -> Result<Tz, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse::<Tz>().map_err(Error::custom)
}

fn default_request_timeout() -> u64 {
    60
}

fn default_filter() -> PathBuf {
    PathBuf::from("filter.txt")
}

fn default_today_dir() -> PathBuf {
    PathBuf::from("output-today")
}

fn default_tomorrow_dir() -> PathBuf {
    PathBuf::from("output-tomorrow")
}

fn default_guides() -> Vec<GuideConfig> {
    vec![GuideConfig {
        name: "india".to_string(),
        filter: default_filter(),
        today_dir: default_today_dir(),
        tomorrow_dir: default_tomorrow_dir(),
        sources: vec![
            SourceConfig::Http {
                name: "jio".to_string(),
                url: "https://avkb.short.gy/jioepg.xml.gz".to_string(),
                compression: Compression::Gzip,
            },
            SourceConfig::Http {
                name: "tata-play".to_string(),
                url: "https://avkb.short.gy/tsepg.xml.gz".to_string(),
                compression: Compression::Gzip,
            },
        ],
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            request_timeout_secs: default_request_timeout(),
            guides: default_guides(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// An explicitly requested file must exist. Otherwise `epg.toml` is used
    /// when present and the built-in guide when not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    /// Every output directory is cleared before a guide writes into it, so
    /// no two slots, within a guide or across guides, may share one.
    pub fn validate(&self) -> Result<()> {
        if self.guides.is_empty() {
            bail!("at least one guide must be configured");
        }

        let mut owners: HashMap<&Path, &str> = HashMap::new();
        for guide in &self.guides {
            if guide.sources.is_empty() {
                bail!("guide '{}' has no sources", guide.name);
            }
            for dir in [&guide.today_dir, &guide.tomorrow_dir] {
                if let Some(owner) = owners.insert(dir.as_path(), &guide.name) {
                    if owner == guide.name {
                        bail!(
                            "guide '{}' uses the same directory for today and tomorrow",
                            guide.name
                        );
                    }
                    bail!(
                        "output directory {} is used by both guide '{}' and guide '{}'",
                        dir.display(),
                        owner,
                        guide.name
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Config {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_empty_config_uses_builtin_guide() {
        let config = parse("");
        assert_eq!(config.timezone, chrono_tz::Asia::Kolkata);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.guides.len(), 1);

        let guide = &config.guides[0];
        assert_eq!(guide.filter, PathBuf::from("filter.txt"));
        assert_eq!(guide.today_dir, PathBuf::from("output-today"));
        assert_eq!(guide.tomorrow_dir, PathBuf::from("output-tomorrow"));
        assert_eq!(guide.sources[0].name(), "jio");
        assert_eq!(guide.sources[1].name(), "tata-play");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = parse(r#"
            timezone = "Europe/London"
            request_timeout_secs = 15

            [[guides]]
            name = "uk"
            filter = "filter_uk.txt"
            today_dir = "uk_channels/today"
            tomorrow_dir = "uk_channels/tomorrow"

            [[guides.sources]]
            type = "http"
            name = "freeview"
            url = "https://example.com/epg.xml"
            compression = "none"

            [[guides.sources]]
            type = "file"
            name = "local"
            path = "/srv/epg/backup.xml.gz"
        "#);
        assert_eq!(config.timezone, chrono_tz::Europe::London);
        assert_eq!(config.request_timeout_secs, 15);

        let guide = &config.guides[0];
        assert_eq!(guide.name, "uk");
        assert_eq!(guide.filter, PathBuf::from("filter_uk.txt"));
        match &guide.sources[0] {
            SourceConfig::Http { url, compression, .. } => {
                assert_eq!(url, "https://example.com/epg.xml");
                assert_eq!(*compression, Compression::None);
            }
            other => panic!("unexpected source {other:?}"),
        }
        match &guide.sources[1] {
            SourceConfig::File { path, compression, .. } => {
                assert_eq!(path, &PathBuf::from("/srv/epg/backup.xml.gz"));
                assert_eq!(*compression, Compression::Auto);
            }
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn test_guide_paths_default() {
        let config = parse(r#"
            [[guides]]
            name = "india"
            [[guides.sources]]
            type = "http"
            name = "jio"
            url = "https://example.com/jio.xml.gz"
        "#);
        let guide = &config.guides[0];
        assert_eq!(guide.today_dir, PathBuf::from("output-today"));
        assert_eq!(guide.tomorrow_dir, PathBuf::from("output-tomorrow"));
    }

    #[test]
    fn test_invalid_timezone_fails() {
        let result: Result<Config, _> = toml::from_str(r#"timezone = "Mars/Olympus""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_source_type_fails() {
        let result: Result<Config, _> = toml::from_str(r#"
            [[guides]]
            name = "x"
            [[guides.sources]]
            type = "ftp"
            name = "x"
        "#);
        assert!(result.is_err());
    }

    #[test]
    fn test_guide_without_sources_is_invalid() {
        let config = parse(r#"
            [[guides]]
            name = "empty"
        "#);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("has no sources"));
    }

    #[test]
    fn test_shared_output_directory_is_invalid() {
        let config = parse(r#"
            [[guides]]
            name = "clash"
            today_dir = "out"
            tomorrow_dir = "out"
            [[guides.sources]]
            type = "file"
            name = "a"
            path = "a.xml"
        "#);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_guides_sharing_default_directories_are_invalid() {
        let config = parse(r#"
            [[guides]]
            name = "india"
            [[guides.sources]]
            type = "file"
            name = "jio"
            path = "jio.xml.gz"

            [[guides]]
            name = "uk"
            [[guides.sources]]
            type = "file"
            name = "freeview"
            path = "uk.xml"
        "#);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output-today"));
        assert!(err.to_string().contains("'india' and guide 'uk'"));
    }

    #[test]
    fn test_guides_with_separate_directories_are_valid() {
        let config = parse(r#"
            [[guides]]
            name = "india"
            today_dir = "indian_channels/today"
            tomorrow_dir = "indian_channels/tomorrow"
            [[guides.sources]]
            type = "file"
            name = "jio"
            path = "jio.xml.gz"

            [[guides]]
            name = "uk"
            today_dir = "uk_channels/today"
            tomorrow_dir = "uk_channels/tomorrow"
            [[guides.sources]]
            type = "file"
            name = "freeview"
            path = "uk.xml"
        "#);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("epg.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_load_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epg.toml");
        std::fs::write(&path, "timezone = \"UTC\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.timezone, chrono_tz::UTC);
        assert_eq!(config.guides.len(), 1);
    }
}
