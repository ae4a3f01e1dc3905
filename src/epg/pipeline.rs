use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::GuideConfig;
use crate::epg::merge::MergedGuide;
use crate::epg::model::Channel;
use crate::epg::output::{assemble, output_file_name};
use crate::epg::report::{DayOutcome, RuleOutcome, RuleReport, RunReport};
use crate::epg::resolve::resolve;
use crate::epg::rules::{FilterRule, load_rules};
use crate::epg::schedule::{DaySchedule, select_day};
use crate::epg::sinks::{DaySlot, ScheduleSink};
use crate::epg::sources;
use crate::epg::time::CivilDay;

/// Load rules, fetch and merge the feeds, then write today's and tomorrow's
/// schedules for every rule.
///
/// Unreadable rules, failed fetches and an unpreparable sink abort the run.
/// Everything past that point is counted in the report instead.
#[tracing::instrument(skip_all, fields(guide = %guide.name))]
pub async fn run_guide(
    guide: &GuideConfig,
    http_client: &reqwest::Client,
    timeout: Duration,
    today: CivilDay,
    sink: &dyn ScheduleSink,
) -> Result<RunReport> {
    let rules = load_rules(&guide.filter)?;
    if rules.is_empty() {
        tracing::info!(filter = %guide.filter.display(), "No filter rules, skipping guide");
        return Ok(RunReport::new(&guide.name));
    }
    tracing::info!(rules = rules.len(), "Loaded filter rules");

    let documents = sources::fetch_all(&guide.sources, http_client, timeout)
        .await
        .with_context(|| format!("failed to fetch sources for guide '{}'", guide.name))?;
    let merged = MergedGuide::merge(&documents);

    sink.prepare()
        .await
        .context("failed to prepare output directories")?;

    let mut report = build_schedules(&merged, &rules, today, sink).await;
    report.guide = guide.name.clone();
    Ok(report)
}

/// Resolve, filter and write each rule in order.
pub async fn build_schedules(
    guide: &MergedGuide,
    rules: &[FilterRule],
    today: CivilDay,
    sink: &dyn ScheduleSink,
) -> RunReport {
    let mut report = RunReport::new("");
    report.merge = guide.stats();
    let tomorrow = today.next();

    for rule in rules {
        let file_name = output_file_name(&rule.output_name);

        let outcome = match resolve(&rule.requested_name, guide.channels()) {
            Err(e) => {
                tracing::warn!(requested = %rule.requested_name, error = %e, "Skipping rule");
                RuleOutcome::NotFound
            }
            Ok(found) => {
                tracing::debug!(
                    requested = %rule.requested_name,
                    channel = %found.channel.display_name,
                    kind = ?found.kind,
                    "Resolved channel"
                );
                let programmes = guide.programmes_for(found.key);

                let schedule = select_day(programmes, &today);
                let today_outcome =
                    write_schedule(sink, DaySlot::Today, &file_name, found.channel, &today, &schedule).await;

                let schedule = select_day(programmes, &tomorrow);
                let tomorrow_outcome =
                    write_schedule(sink, DaySlot::Tomorrow, &file_name, found.channel, &tomorrow, &schedule)
                        .await;

                RuleOutcome::Resolved {
                    channel: found.channel.display_name.clone(),
                    kind: found.kind,
                    today: today_outcome,
                    tomorrow: tomorrow_outcome,
                }
            }
        };

        report.record(RuleReport {
            requested_name: rule.requested_name.clone(),
            file_name,
            outcome,
        });
    }

    report
}

async fn write_schedule(
    sink: &dyn ScheduleSink,
    slot: DaySlot,
    file_name: &str,
    channel: &Channel,
    day: &CivilDay,
    schedule: &DaySchedule<'_>,
) -> DayOutcome {
    let Some(output) = assemble(channel, day, schedule) else {
        return DayOutcome::Empty;
    };

    match sink.write(slot, file_name, &output).await {
        Ok(()) => DayOutcome::Written {
            programs: output.programs.len(),
        },
        Err(e) => {
            tracing::error!(file = %file_name, slot = slot.as_str(), error = %e, "Failed to write schedule");
            DayOutcome::Failed(e.to_string())
        }
    }
}
