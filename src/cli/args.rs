use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "ai-protocol",
    version,
    about = "AI-анализ договора поставки и протокол разногласий с позиции Поставщика",
    long_about = "ai-protocol находит рискованные для Поставщика пункты договора, запрашивает у языковой модели редакцию Поставщика и комментарии, и формирует протокол разногласий (Markdown) и текстовый отчет."
)]
pub struct Args {
    /// Contract file to analyze (.txt)
    #[arg(value_name = "FILE", required_unless_present = "check")]
    pub file: Option<PathBuf>,

    /// AI provider to use (gigachat or openai)
    #[arg(short = 'P', long, default_value = "")] // 空字符串表示未指定
    pub provider: String,

    /// Model to use (default: GigaChat)
    #[arg(short, long, default_value = "")] // 空字符串表示未指定
    pub model: String,

    /// 协议文件输出目录
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// 报告输出格式: text, json
    #[arg(short = 'f', long = "format", default_value = "text")]
    pub format: String,

    /// 附加风险词库（TOML）
    #[arg(long, value_name = "PATH")]
    pub lexicon: Option<PathBuf>,

    /// 最多分析的条款数
    #[arg(long = "max-clauses", value_name = "N")]
    pub max_clauses: Option<usize>,

    /// 只列出风险条款，不调用模型
    #[arg(long = "scan-only", default_value_t = false)]
    pub scan_only: bool,

    /// 测试与模型服务的连接
    #[arg(long, default_value_t = false)]
    pub check: bool,

    /// 输出调试日志
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_and_flags() {
        let args = Args::try_parse_from([
            "ai-protocol",
            "contract.txt",
            "-P",
            "openai",
            "-o",
            "out",
            "--format",
            "json",
            "--max-clauses",
            "3",
            "--scan-only",
        ])
        .unwrap();

        assert_eq!(args.file, Some(PathBuf::from("contract.txt")));
        assert_eq!(args.provider, "openai");
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.format, "json");
        assert_eq!(args.max_clauses, Some(3));
        assert!(args.scan_only);
        assert!(!args.check);
    }

    #[test]
    fn test_file_required_unless_check() {
        assert!(Args::try_parse_from(["ai-protocol"]).is_err());

        let args = Args::try_parse_from(["ai-protocol", "--check"]).unwrap();
        assert!(args.check);
        assert!(args.file.is_none());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ai-protocol", "c.txt"]).unwrap();
        assert_eq!(args.provider, "");
        assert_eq!(args.model, "");
        assert_eq!(args.format, "text");
        assert!(args.lexicon.is_none());
        assert!(!args.debug);
    }
}
