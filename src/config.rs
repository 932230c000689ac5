use std::str::FromStr;
use std::time::Duration;

/// 本地开发环境的后端地址
pub const LOCAL_API_URL: &str = "http://localhost:8000";
/// 线上环境的后端地址
pub const PRODUCTION_API_URL: &str = "https://docentia-api.onrender.com";
/// 被识别为本地开发环境的主机名
pub const LOCAL_HOST: &str = "localhost";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端基础地址（启动时确定，之后不再变化）
    pub api_base_url: String,
    /// 当前页面所在主机名，仅用于推导 api_base_url
    pub app_host: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 提示消息自动消失时间（毫秒）
    pub alert_duration_ms: u64,
    /// 下载目录
    pub download_dir: String,
    /// 待提交表单（TOML）所在目录
    pub submissions_folder: String,
    /// 自定义分类表目录，不设置时使用内置分类表
    pub taxonomy_dir: Option<String>,
    /// 最多同时处理的表单数
    pub max_concurrent_submissions: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: LOCAL_API_URL.to_string(),
            app_host: LOCAL_HOST.to_string(),
            request_timeout_secs: 120,
            alert_duration_ms: 5000,
            download_dir: "downloads".to_string(),
            submissions_folder: "submissions".to_string(),
            taxonomy_dir: None,
            max_concurrent_submissions: 2,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let app_host = std::env::var("APP_HOST").unwrap_or(default.app_host);
        let api_base_url = std::env::var("API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| resolve_api_base_url(&app_host).to_string());

        Self {
            api_base_url,
            app_host,
            request_timeout_secs: positive(std::env::var("REQUEST_TIMEOUT_SECS").ok()).unwrap_or(default.request_timeout_secs),
            alert_duration_ms: std::env::var("ALERT_DURATION_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.alert_duration_ms),
            download_dir: std::env::var("DOWNLOAD_DIR").unwrap_or(default.download_dir),
            submissions_folder: std::env::var("SUBMISSIONS_FOLDER").unwrap_or(default.submissions_folder),
            taxonomy_dir: std::env::var("TAXONOMY_DIR").ok().or(default.taxonomy_dir),
            max_concurrent_submissions: positive(std::env::var("MAX_CONCURRENT_SUBMISSIONS").ok()).unwrap_or(default.max_concurrent_submissions),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn alert_duration(&self) -> Duration {
        Duration::from_millis(self.alert_duration_ms)
    }

    pub fn is_development(&self) -> bool {
        self.app_host == LOCAL_HOST
    }
}

/// 解析正整数环境变量，0 和无法解析的值都视为未设置
fn positive<T: FromStr + Default + PartialOrd>(value: Option<String>) -> Option<T> {
    value
        .and_then(|v| v.trim().parse().ok())
        .filter(|n| *n > T::default())
}

/// 根据主机名选择后端地址
pub fn resolve_api_base_url(host: &str) -> &'static str {
    if host == LOCAL_HOST {
        LOCAL_API_URL
    } else {
        PRODUCTION_API_URL
    }
}
