pub mod clause;
pub mod pipeline;
pub mod risk;

// Re-export commonly used types
pub use clause::{ClauseAnalysis, ClauseAnalyzer};
pub use pipeline::{split_lines, CandidateLine, ContractPipeline};
pub use risk::{Lexicon, RiskClassifier};
