pub mod protocol;

pub use protocol::{AnalysisOutcome, ClauseRecord, RiskLevel};
