pub mod merge;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod rules;
pub mod schedule;
pub mod sinks;
pub mod sources;
pub mod time;
