mod highlight;
mod report;

pub use highlight::{prepare_record, record_key, HighlightPayload, HighlightRecord};
pub use report::{IndexSummary, RunReport, StageOutcome};
