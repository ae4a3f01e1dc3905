use async_trait::async_trait;

use super::{DaySlot, ScheduleSink};
use crate::epg::output::ChannelOutput;
use crate::error::EpgError;

/// Logs what would be written. Used for dry runs.
pub struct LogSink;

#[async_trait]
impl ScheduleSink for LogSink {
    async fn prepare(&self) -> Result<(), EpgError> {
        Ok(())
    }

    async fn write(
        &self,
        slot: DaySlot,
        file_name: &str,
        output: &ChannelOutput,
    ) -> Result<(), EpgError> {
        tracing::info!(
            slot = slot.as_str(),
            file = %file_name,
            channel = %output.channel_name,
            date = %output.date,
            programs = output.programs.len(),
            "Would write schedule"
        );
        Ok(())
    }
}
