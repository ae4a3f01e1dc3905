pub mod directory;
pub mod log;

use async_trait::async_trait;

use crate::epg::output::ChannelOutput;
use crate::error::EpgError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaySlot {
    Today,
    Tomorrow,
}

impl DaySlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            DaySlot::Today => "today",
            DaySlot::Tomorrow => "tomorrow",
        }
    }
}

#[async_trait]
pub trait ScheduleSink: Send + Sync {
    /// Called once per guide run before any write.
    async fn prepare(&self) -> Result<(), EpgError>;

    async fn write(
        &self,
        slot: DaySlot,
        file_name: &str,
        output: &ChannelOutput,
    ) -> Result<(), EpgError>;
}
