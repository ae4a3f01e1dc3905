use crate::epg::merge::MergeStats;
use crate::epg::resolve::MatchKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    Written { programs: usize },
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    NotFound,
    Resolved {
        channel: String,
        kind: MatchKind,
        today: DayOutcome,
        tomorrow: DayOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub requested_name: String,
    pub file_name: String,
    pub outcome: RuleOutcome,
}

/// What one guide run did. Built up by the pipeline and handed back to the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub guide: String,
    pub merge: MergeStats,
    pub resolved_exact: usize,
    pub resolved_fuzzy: usize,
    pub not_found: usize,
    pub saved_today: usize,
    pub saved_tomorrow: usize,
    pub empty_days: usize,
    pub write_failures: usize,
    pub rules: Vec<RuleReport>,
}

impl RunReport {
    pub fn new(guide: &str) -> Self {
        Self {
            guide: guide.to_string(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, rule: RuleReport) {
        match &rule.outcome {
            RuleOutcome::NotFound => self.not_found += 1,
            RuleOutcome::Resolved {
                kind,
                today,
                tomorrow,
                ..
            } => {
                match kind {
                    MatchKind::Exact => self.resolved_exact += 1,
                    MatchKind::Fuzzy => self.resolved_fuzzy += 1,
                }
                self.count_day(today, true);
                self.count_day(tomorrow, false);
            }
        }
        self.rules.push(rule);
    }

    fn count_day(&mut self, outcome: &DayOutcome, today: bool) {
        match outcome {
            DayOutcome::Written { .. } if today => self.saved_today += 1,
            DayOutcome::Written { .. } => self.saved_tomorrow += 1,
            DayOutcome::Empty => self.empty_days += 1,
            DayOutcome::Failed(_) => self.write_failures += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.rules.len()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            guide = %self.guide,
            processed = self.processed(),
            exact = self.resolved_exact,
            fuzzy = self.resolved_fuzzy,
            not_found = self.not_found,
            saved_today = self.saved_today,
            saved_tomorrow = self.saved_tomorrow,
            empty_days = self.empty_days,
            write_failures = self.write_failures,
            unparseable = self.merge.unparseable,
            superseded = self.merge.superseded,
            "Guide run complete"
        );
    }
}
