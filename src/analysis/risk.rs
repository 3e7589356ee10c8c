use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::RiskLevel;

/// 高风险触发词：罚金、单方行为、严格期限、费用转嫁给供应商
const HIGH_RISK_PATTERNS: &[&str] = &[
    r"штраф",
    r"пеня",
    r"неустойка",
    r"односторонн",
    r"без согласования",
    r"немедленно",
    r"не возмещается",
    r"за счет.*поставщик",
    r"полная ответственность",
];

/// 中风险触发词：模糊期限、预付款、单方裁量
const MEDIUM_RISK_PATTERNS: &[&str] = &[
    r"разумный срок",
    r"своевременно",
    r"в кратчайшие",
    r"предоплата",
    r"без уведомления",
    r"по своему усмотрению",
];

/// 风险词库
///
/// 每个等级是一组正则表达式，匹配时不区分大小写、不锚定整行。
/// 可以从 TOML 文件加载附加词条：
///
/// ```toml
/// high = ["безусловн"]
/// medium = ["по требованию покупателя"]
/// low = []
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
}

impl Lexicon {
    /// 内置词库
    pub fn builtin() -> Self {
        Self {
            high: HIGH_RISK_PATTERNS.iter().map(|p| p.to_string()).collect(),
            medium: MEDIUM_RISK_PATTERNS.iter().map(|p| p.to_string()).collect(),
            low: Vec::new(),
        }
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read lexicon {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }

    /// 追加词条，保持原有顺序在前
    pub fn extend(&mut self, other: Lexicon) {
        self.high.extend(other.high);
        self.medium.extend(other.medium);
        self.low.extend(other.low);
    }
}

/// 已编译的风险模式
#[derive(Debug, Clone)]
struct RiskPattern {
    source: String,
    regex: Regex,
}

impl RiskPattern {
    fn compile(source: &str) -> anyhow::Result<Self> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid risk pattern '{}': {}", source, e))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }
}

/// 基于词库的条款风险分类器
///
/// 先检查高风险模式，再检查中风险，最后检查低风险；首个命中即返回。
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    high: Vec<RiskPattern>,
    medium: Vec<RiskPattern>,
    low: Vec<RiskPattern>,
}

/// 内置词库只编译一次
static BUILTIN_CLASSIFIER: Lazy<RiskClassifier> = Lazy::new(|| {
    RiskClassifier::from_lexicon(&Lexicon::builtin()).expect("builtin lexicon must compile")
});

impl Default for RiskClassifier {
    fn default() -> Self {
        BUILTIN_CLASSIFIER.clone()
    }
}

impl RiskClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lexicon(lexicon: &Lexicon) -> anyhow::Result<Self> {
        let compile_all = |patterns: &[String]| -> anyhow::Result<Vec<RiskPattern>> {
            patterns.iter().map(|p| RiskPattern::compile(p)).collect()
        };

        Ok(Self {
            high: compile_all(&lexicon.high)?,
            medium: compile_all(&lexicon.medium)?,
            low: compile_all(&lexicon.low)?,
        })
    }

    /// 对一行合同文本分级
    pub fn classify(&self, line: &str) -> RiskLevel {
        self.matched_pattern(line)
            .map(|(level, _)| level)
            .unwrap_or(RiskLevel::None)
    }

    /// 返回命中的等级及触发的模式
    pub fn matched_pattern(&self, line: &str) -> Option<(RiskLevel, &str)> {
        [
            (RiskLevel::High, &self.high),
            (RiskLevel::Medium, &self.medium),
            (RiskLevel::Low, &self.low),
        ]
        .into_iter()
        .find_map(|(level, patterns)| {
            patterns
                .iter()
                .find(|p| p.regex.is_match(line))
                .map(|p| (level, p.source.as_str()))
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }
}
