use std::env;
use std::path::PathBuf;

/// 分析流程的数量限制
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisLimits {
    /// 每次运行最多接受的条款数
    pub max_clauses: usize,
    /// 条款最少字符数（不含），短于此长度的行不做分析
    pub min_clause_chars: usize,
    /// 提取文本的最少字符数
    pub min_text_chars: usize,
    pub max_upload_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_clauses: 10,
            min_clause_chars: 50,
            min_text_chars: 50,
            max_upload_bytes: 16 * 1024 * 1024,
            allowed_extensions: vec!["docx".to_string(), "txt".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: String,
    pub model: String,
    pub gigachat_credentials: Option<String>,
    pub gigachat_client_id: Option<String>,
    pub gigachat_scope: String,
    pub gigachat_auth_url: String,
    pub gigachat_api_url: String,
    pub gigachat_verify_ssl: bool,
    pub openai_api_key: Option<String>,
    pub openai_url: String,
    pub timeout_secs: u64,
    pub output_dir: PathBuf,
    pub lexicon_path: Option<PathBuf>,
    pub limits: AnalysisLimits,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: "gigachat".to_string(),
            model: "GigaChat".to_string(),
            gigachat_credentials: None,
            gigachat_client_id: None,
            gigachat_scope: "GIGACHAT_API_PERS".to_string(),
            gigachat_auth_url: "https://ngw.devices.sberbank.ru:9443/api/v2/oauth".to_string(),
            gigachat_api_url: "https://gigachat.devices.sberbank.ru/api/v1".to_string(),
            gigachat_verify_ssl: false,
            openai_api_key: None,
            openai_url: "https://api.openai.com/v1/chat/completions".to_string(),
            timeout_secs: 60,
            output_dir: PathBuf::from("output"),
            lexicon_path: None,
            limits: AnalysisLimits::default(),
            debug: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config::default();

        // 加载配置文件
        #[cfg(not(test))]
        config.load_from_env_file();
        // 加载环境变量（覆盖配置文件）
        config.load_from_env();

        config
    }

    pub fn load_from_env_file(&mut self) {
        // 尝试从用户主目录加载
        if let Ok(home) = env::var("HOME") {
            let user_env_path = PathBuf::from(format!("{}/.ai-protocol/.env", home));
            if user_env_path.exists() {
                dotenvy::from_path(user_env_path).ok();
            }
        }

        // 尝试从当前目录加载
        dotenvy::dotenv().ok();
    }

    pub fn load_from_env(&mut self) {
        if let Ok(provider) = env::var("AI_PROTOCOL_PROVIDER") {
            self.provider = provider;
        }
        if let Ok(model) = env::var("AI_PROTOCOL_MODEL") {
            self.model = model;
        }
        if let Some(secret) = non_empty_var("GIGACHAT_CLIENT_SECRET") {
            self.gigachat_credentials = Some(secret);
        }
        if let Some(client_id) = non_empty_var("GIGACHAT_CLIENT_ID") {
            self.gigachat_client_id = Some(client_id);
        }
        if let Ok(scope) = env::var("GIGACHAT_SCOPE") {
            self.gigachat_scope = scope;
        }
        if let Ok(url) = env::var("GIGACHAT_AUTH_URL") {
            self.gigachat_auth_url = url;
        }
        if let Ok(url) = env::var("GIGACHAT_API_URL") {
            self.gigachat_api_url = url;
        }
        if let Ok(verify) = env::var("GIGACHAT_VERIFY_SSL") {
            self.gigachat_verify_ssl = parse_flag(&verify);
        }
        if let Some(api_key) = non_empty_var("AI_PROTOCOL_OPENAI_API_KEY") {
            self.openai_api_key = Some(api_key);
        }
        if let Ok(url) = env::var("AI_PROTOCOL_OPENAI_URL") {
            self.openai_url = url;
        }
        if let Some(timeout) = env::var("AI_PROTOCOL_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.timeout_secs = timeout;
        }
        if let Ok(dir) = env::var("AI_PROTOCOL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = non_empty_var("AI_PROTOCOL_LEXICON") {
            self.lexicon_path = Some(PathBuf::from(path));
        }
        if let Ok(debug) = env::var("AI_PROTOCOL_DEBUG") {
            self.debug = parse_flag(&debug);
        }
    }

    pub fn update_from_args(&mut self, args: &crate::cli::args::Args) {
        // 命令行参数优先级最高
        if !args.provider.is_empty() {
            self.provider = args.provider.clone();
        }
        if !args.model.is_empty() {
            self.model = args.model.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(path) = &args.lexicon {
            self.lexicon_path = Some(path.clone());
        }
        if let Some(max) = args.max_clauses {
            self.limits.max_clauses = max;
        }
        if args.debug {
            self.debug = true;
        }
    }

    /// GigaChat 授权密钥；同时提供 client id 时按 `id:secret` 做 base64 编码
    pub fn gigachat_authorization_key(&self) -> Option<String> {
        use base64::Engine;

        let secret = self.gigachat_credentials.as_ref()?;
        match &self.gigachat_client_id {
            Some(client_id) => Some(
                base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", client_id, secret)),
            ),
            None => Some(secret.clone()),
        }
    }

    /// 缺少凭据不视为配置错误，网关会在每次调用时直接返回未配置
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.provider.as_str() {
            "gigachat" | "openai" => {}
            _ => {
                anyhow::bail!("Unsupported provider: {}", self.provider);
            }
        }
        if self.limits.max_clauses == 0 {
            anyhow::bail!("max_clauses must be at least 1");
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
