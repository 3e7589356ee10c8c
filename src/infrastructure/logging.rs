use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub include_file_location: bool,
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            include_file_location: false,
            filter: None,
        }
    }
}

impl LoggingConfig {
    pub fn for_debug(debug: bool) -> Self {
        if debug {
            Self {
                level: Level::DEBUG,
                include_file_location: true,
                filter: None,
            }
        } else {
            Self::default()
        }
    }

    /// 未设置 RUST_LOG 时使用的过滤指令
    pub fn default_directive(&self) -> String {
        format!("ai_protocol={}", self.level.as_str().to_lowercase())
    }
}

/// 设置日志系统，日志输出到 stderr，报告输出留给 stdout
pub fn setup_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = if let Some(filter) = &config.filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.default_directive()))?
    };

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .with_file(config.include_file_location)
        .with_line_number(config.include_file_location);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
