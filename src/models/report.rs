use std::fmt;

/// Result of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StageOutcome {
    #[default]
    Skipped,
    Completed,
    Failed(String),
}

impl StageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed(_))
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Skipped => write!(f, "skipped"),
            StageOutcome::Completed => write!(f, "completed"),
            StageOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Counts from one indexing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexSummary {
    pub stored: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub fetch: StageOutcome,
    pub archive: StageOutcome,
    pub index: StageOutcome,
    pub index_summary: IndexSummary,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        !(self.fetch.is_failed() || self.archive.is_failed() || self.index.is_failed())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetch {}; archive {}; index {} ({} stored, {} skipped)",
            self.fetch, self.archive, self.index, self.index_summary.stored, self.index_summary.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_failed_stage_fails_the_run() {
        let mut report = RunReport {
            fetch: StageOutcome::Completed,
            archive: StageOutcome::Completed,
            index: StageOutcome::Completed,
            ..Default::default()
        };
        assert!(report.is_success());

        report.archive = StageOutcome::Failed("access denied".to_string());
        assert!(!report.is_success());
    }

    #[test]
    fn skipped_stages_are_not_failures() {
        let report = RunReport {
            fetch: StageOutcome::Completed,
            ..Default::default()
        };
        assert!(report.is_success());
        assert_eq!(report.to_string(), "fetch completed; archive skipped; index skipped (0 stored, 0 skipped)");
    }
}
