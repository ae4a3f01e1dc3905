use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{DaySlot, ScheduleSink};
use crate::epg::output::ChannelOutput;
use crate::error::EpgError;

/// Writes one pretty-printed JSON file per channel into a today and a
/// tomorrow directory.
pub struct DirectorySink {
    today_dir: PathBuf,
    tomorrow_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(today_dir: PathBuf, tomorrow_dir: PathBuf) -> Self {
        Self {
            today_dir,
            tomorrow_dir,
        }
    }

    fn dir(&self, slot: DaySlot) -> &Path {
        match slot {
            DaySlot::Today => &self.today_dir,
            DaySlot::Tomorrow => &self.tomorrow_dir,
        }
    }
}

async fn reset_dir(dir: &Path) -> Result<(), EpgError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

#[async_trait]
impl ScheduleSink for DirectorySink {
    async fn prepare(&self) -> Result<(), EpgError> {
        reset_dir(&self.today_dir).await?;
        reset_dir(&self.tomorrow_dir).await?;
        tracing::debug!(
            today = %self.today_dir.display(),
            tomorrow = %self.tomorrow_dir.display(),
            "Cleared output directories"
        );
        Ok(())
    }

    async fn write(
        &self,
        slot: DaySlot,
        file_name: &str,
        output: &ChannelOutput,
    ) -> Result<(), EpgError> {
        let path = self.dir(slot).join(file_name);
        let mut content = serde_json::to_vec_pretty(output)?;
        content.push(b'\n');
        tokio::fs::write(&path, content).await?;
        tracing::debug!(path = %path.display(), programs = output.programs.len(), "Wrote schedule");
        Ok(())
    }
}
