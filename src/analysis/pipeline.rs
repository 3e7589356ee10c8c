use tracing::{debug, info, warn};

use crate::analysis::clause::ClauseAnalyzer;
use crate::analysis::risk::RiskClassifier;
use crate::config::AnalysisLimits;
use crate::models::{ClauseRecord, RiskLevel};

/// 待分析的风险行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLine {
    /// 在非空行中的序号，从 1 开始
    pub line_number: usize,
    pub text: String,
    pub risk: RiskLevel,
}

/// 将全文切分为去除首尾空白的非空行
pub fn split_lines(full_text: &str) -> Vec<&str> {
    full_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// 合同分析流水线
///
/// 按原文顺序逐行分级，中高风险且足够长的行依次交给条款分析器，
/// 接受的条款数达到上限后停止。
pub struct ContractPipeline {
    classifier: RiskClassifier,
    analyzer: ClauseAnalyzer,
    max_clauses: usize,
    min_clause_chars: usize,
}

impl ContractPipeline {
    pub fn new(classifier: RiskClassifier, analyzer: ClauseAnalyzer) -> Self {
        let limits = AnalysisLimits::default();
        Self {
            classifier,
            analyzer,
            max_clauses: limits.max_clauses,
            min_clause_chars: limits.min_clause_chars,
        }
    }

    pub fn with_limits(mut self, limits: &AnalysisLimits) -> Self {
        self.max_clauses = limits.max_clauses;
        self.min_clause_chars = limits.min_clause_chars;
        self
    }

    /// 找出所有需要分析的行，不调用模型
    pub fn candidates(&self, full_text: &str) -> Vec<CandidateLine> {
        split_lines(full_text)
            .into_iter()
            .enumerate()
            .filter_map(|(index, line)| {
                let risk = self.classifier.classify(line);
                if !risk.is_actionable() {
                    return None;
                }
                if line.chars().count() <= self.min_clause_chars {
                    debug!(line = index + 1, "risky line too short, skipped");
                    return None;
                }
                Some(CandidateLine {
                    line_number: index + 1,
                    text: line.to_string(),
                    risk,
                })
            })
            .collect()
    }

    /// 运行完整分析，返回按原文顺序排列的条款（可能为空）
    pub async fn run(&self, full_text: &str) -> Vec<ClauseRecord> {
        let mut records: Vec<ClauseRecord> = Vec::new();

        for candidate in self.candidates(full_text) {
            if records.len() >= self.max_clauses {
                info!(limit = self.max_clauses, "clause limit reached, remaining lines ignored");
                break;
            }

            let number = records.len() + 1;
            info!(
                clause = number,
                line = candidate.line_number,
                risk = %candidate.risk,
                "analyzing clause"
            );

            match self.analyzer.analyze(&candidate.text, number).await {
                Ok(analysis) => records.push(ClauseRecord {
                    number,
                    source_line: candidate.line_number,
                    original_text: candidate.text,
                    revision_text: analysis.revision,
                    comment_text: analysis.comment,
                    risk: candidate.risk,
                }),
                Err(err) => {
                    warn!(line = candidate.line_number, error = %err, "clause skipped");
                }
            }
        }

        records
    }
}
