use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::analysis::{CandidateLine, ClauseAnalyzer, ContractPipeline, Lexicon, RiskClassifier};
use crate::config::{AnalysisLimits, Config};
use crate::core::ai::{ChatGateway, GatewayFactory};
use crate::document::{assemble_text, check_upload, DocumentExtractor, TextExtractor};
use crate::infrastructure::ProtocolError;
use crate::models::{AnalysisOutcome, ClauseRecord};
use crate::report::{Protocol, ProtocolGenerator, ReportFormatter, TextFormatter};

/// 成功生成的协议产物
#[derive(Debug, Clone)]
pub struct ProtocolArtifacts {
    pub protocol: Protocol,
    /// 纯文本摘要
    pub report: String,
    pub document_path: PathBuf,
}

impl ProtocolArtifacts {
    pub fn clauses(&self) -> &[ClauseRecord] {
        &self.protocol.clauses
    }
}

/// 处理一份合同的结果；`ProtocolError` 是第三种终态
#[derive(Debug, Clone)]
pub enum ProtocolOutcome {
    Completed(ProtocolArtifacts),
    NoRiskyClauses,
}

/// 按配置构建风险分类器：内置词库加上可选的外部词库
pub fn build_classifier(config: &Config) -> anyhow::Result<RiskClassifier> {
    let mut lexicon = Lexicon::builtin();
    if let Some(path) = &config.lexicon_path {
        lexicon.extend(Lexicon::load(path)?);
        info!(path = %path.display(), "custom lexicon loaded");
    }
    let classifier = RiskClassifier::from_lexicon(&lexicon)?;
    debug!(patterns = classifier.pattern_count(), "risk classifier ready");
    Ok(classifier)
}

/// 合同处理服务：入口检查 → 文本提取 → 分析流水线 → 协议生成
pub struct ProtocolService {
    extractor: Box<dyn TextExtractor>,
    pipeline: ContractPipeline,
    generator: ProtocolGenerator,
    limits: AnalysisLimits,
    provider_name: String,
}

impl ProtocolService {
    /// 根据配置创建服务，网关由工厂生成
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let gateway: Arc<dyn ChatGateway> = Arc::from(GatewayFactory::create(config)?);
        Self::new(config, gateway)
    }

    pub fn new(config: &Config, gateway: Arc<dyn ChatGateway>) -> anyhow::Result<Self> {
        let provider_name = gateway.name().to_string();
        let pipeline = ContractPipeline::new(build_classifier(config)?, ClauseAnalyzer::new(gateway))
            .with_limits(&config.limits);

        Ok(Self {
            extractor: Box::new(DocumentExtractor::default()),
            pipeline,
            generator: ProtocolGenerator::new(&config.output_dir)?,
            limits: config.limits.clone(),
            provider_name,
        })
    }

    /// 替换文本提取器，允许的扩展名随之改变
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.limits.allowed_extensions = extractor.extensions().iter().map(|e| e.to_string()).collect();
        self.extractor = extractor;
        self
    }

    /// 检查上传文件并提取全文
    pub fn load_text(&self, path: &Path) -> Result<String, ProtocolError> {
        check_upload(path, &self.limits)?;
        let paragraphs = self.extractor.extract(path)?;
        let text = assemble_text(&paragraphs, &self.limits)?;
        info!(chars = text.chars().count(), "document loaded");
        Ok(text)
    }

    /// 只做分级和长度过滤，不调用模型
    pub fn scan_file(&self, path: &Path) -> Result<Vec<CandidateLine>, ProtocolError> {
        let text = self.load_text(path)?;
        Ok(self.pipeline.candidates(&text))
    }

    pub async fn process_file(&self, path: &Path) -> Result<ProtocolOutcome, ProtocolError> {
        let text = self.load_text(path)?;
        self.process_text(&text).await
    }

    /// 分析全文并生成协议
    pub async fn process_text(&self, text: &str) -> Result<ProtocolOutcome, ProtocolError> {
        let chars = text.chars().count();
        if chars < self.limits.min_text_chars {
            return Err(ProtocolError::TooShort {
                chars,
                min: self.limits.min_text_chars,
            });
        }

        info!(provider = %self.provider_name, "analyzing contract from the supplier's side");
        let clauses = match AnalysisOutcome::from(self.pipeline.run(text).await) {
            AnalysisOutcome::NoRiskyClauses => {
                info!("no risky clauses found");
                return Ok(ProtocolOutcome::NoRiskyClauses);
            }
            AnalysisOutcome::Clauses(clauses) => clauses,
        };
        info!(clauses = clauses.len(), "clauses analyzed, building protocol");

        let mut protocol = Protocol::new(clauses, &self.provider_name);
        let document_path = self.generator.save(&protocol).await.map_err(|e| {
            error!(error = %format!("{:#}", e), "failed to save protocol");
            ProtocolError::render(format!("{:#}", e))
        })?;
        protocol.document_path = Some(document_path.clone());

        let report = TextFormatter::new()
            .format(&protocol)
            .map_err(|e| ProtocolError::render(e.to_string()))?;

        Ok(ProtocolOutcome::Completed(ProtocolArtifacts {
            protocol,
            report,
            document_path,
        }))
    }
}
