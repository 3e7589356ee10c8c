use serde::{Deserialize, Serialize};
use std::fmt;

/// 条款风险等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// 报告中使用的俄语名称
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "нет",
            RiskLevel::Low => "низкий",
            RiskLevel::Medium => "средний",
            RiskLevel::High => "высокий",
        }
    }

    /// 只有中、高风险的条款会交给模型分析
    pub fn is_actionable(&self) -> bool {
        matches!(self, RiskLevel::Medium | RiskLevel::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已分析的合同条款
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseRecord {
    /// 在已接受条款中的序号，从 1 开始连续
    pub number: usize,
    /// 在合同文本中的行号，从 1 开始
    pub source_line: usize,
    pub original_text: String,
    pub revision_text: String,
    pub comment_text: String,
    pub risk: RiskLevel,
}

/// 单次分析的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Clauses(Vec<ClauseRecord>),
    NoRiskyClauses,
}

impl From<Vec<ClauseRecord>> for AnalysisOutcome {
    fn from(clauses: Vec<ClauseRecord>) -> Self {
        if clauses.is_empty() {
            AnalysisOutcome::NoRiskyClauses
        } else {
            AnalysisOutcome::Clauses(clauses)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_medium_and_high_are_actionable() {
        assert!(!RiskLevel::None.is_actionable());
        assert!(!RiskLevel::Low.is_actionable());
        assert!(RiskLevel::Medium.is_actionable());
        assert!(RiskLevel::High.is_actionable());
    }

    #[test]
    fn test_outcome_from_empty_vec() {
        assert_eq!(AnalysisOutcome::from(Vec::new()), AnalysisOutcome::NoRiskyClauses);
    }

    #[test]
    fn test_clause_record_serialization() {
        let record = ClauseRecord {
            number: 1,
            source_line: 4,
            original_text: "Поставщик уплачивает штраф".to_string(),
            revision_text: "Редакция Покупателя приемлема".to_string(),
            comment_text: "Риск невелик".to_string(),
            risk: RiskLevel::High,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"risk\":\"high\""));
        assert!(json.contains("\"source_line\":4"));
    }
}
