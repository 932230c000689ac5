//! 后端 API 客户端 - 业务能力层
//!
//! 只负责"发请求、分类错误"，不碰界面状态
//!
//! ## 错误分类
//! - 请求没有到达服务器 → `ApiError::Unreachable`
//! - 超时 → `ApiError::Timeout`
//! - 非 2xx → `ApiError::BadStatus`，尽量带上响应体中的 `detail`
//! - 2xx 但结构不对 → `ApiError::MalformedResponse`

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, ConfigError, ExportError};
use crate::models::request::{ExportRequest, GenerationRequest};
use crate::models::response::{ErrorBody, GeneratedDocument, GenerationResponse, HealthStatus};
use crate::models::variant::{EXPORT_WORD_PATH, HEALTH_PATH};

/// 生成后端的能力
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// 提交生成请求，返回生成的文档
    async fn generate(&self, request: &GenerationRequest) -> AppResult<GeneratedDocument>;

    /// 把内容导出为 Word，返回文件字节
    async fn export_word(&self, request: &ExportRequest) -> AppResult<Vec<u8>>;

    /// 健康检查
    async fn health(&self) -> AppResult<HealthStatus>;
}

/// 基于 reqwest 的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpApiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_base_url(&config.api_base_url, config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url).into());
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::ClientBuild(Box::new(e)))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, endpoint: &str, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Api(ApiError::Timeout {
                endpoint: endpoint.to_string(),
                after: self.timeout,
            })
        } else {
            AppError::unreachable(endpoint, err)
        }
    }
}

#[async_trait]
impl GenerationApi for HttpApiClient {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<GeneratedDocument> {
        let endpoint = request.endpoint();
        let url = self.url(endpoint);

        debug!("📤 发送到: {}", url);
        debug!("📦 数据: {}", request.body());

        let response = self
            .client
            .post(&url)
            .json(request.body())
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        if !status.is_success() {
            let detail = ErrorBody::parse_detail(&bytes);
            warn!("生成接口返回 {}: {:?}", status, detail);
            return Err(AppError::bad_status(endpoint, status.as_u16(), detail));
        }

        let parsed: GenerationResponse =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::MalformedResponse {
                endpoint: endpoint.to_string(),
                source: Box::new(e),
            })?;

        let document = parsed.data.ok_or_else(|| ApiError::MalformedResponse {
            endpoint: endpoint.to_string(),
            source: "响应中缺少 data.contenido".into(),
        })?;

        debug!("📥 收到响应: {}", document);
        Ok(document)
    }

    async fn export_word(&self, request: &ExportRequest) -> AppResult<Vec<u8>> {
        let url = self.url(EXPORT_WORD_PATH);
        debug!("📤 导出 Word: {} (标题: {})", url, request.titulo);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ExportError::Failed {
                status: None,
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("导出接口返回 {}", status);
            return Err(AppError::export_failed(Some(status.as_u16())));
        }

        let bytes = response.bytes().await.map_err(|e| ExportError::Failed {
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })?;

        Ok(bytes.to_vec())
    }

    async fn health(&self) -> AppResult<HealthStatus> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| self.transport_error(HEALTH_PATH, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::bad_status(HEALTH_PATH, status.as_u16(), None));
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| {
                AppError::Api(ApiError::MalformedResponse {
                    endpoint: HEALTH_PATH.to_string(),
                    source: Box::new(e),
                })
            })
    }
}
