use std::time::Duration;

use thiserror::Error;

/// 传输层失败时展示给用户的提示
pub const MSG_SERVER_UNREACHABLE: &str =
    "No se pudo conectar con el servidor. Verifica que el backend esté funcionando.";
/// 服务端没有返回 detail 时的通用提示
pub const MSG_GENERATION_FAILED: &str = "Error al generar el contenido";
pub const MSG_TIMEOUT: &str = "El servidor ha tardado demasiado en responder. Inténtalo de nuevo.";
pub const MSG_BUSY: &str = "Ya hay una generación en curso. Espera a que termine.";
pub const MSG_NO_DOCUMENT: &str = "❌ No hay documento para descargar";
pub const MSG_EXPORT_FAILED: &str = "❌ Error al descargar el documento";
pub const MSG_EXPORT_OK: &str = "✅ Documento descargado correctamente";
pub const MSG_SPECIFY_OTHER: &str = "❌ Por favor especifica la opción";
pub const MSG_REQUIRED_FIELDS: &str = "❌ Por favor completa todos los campos obligatorios";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 表单校验失败（不会发出任何请求）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 生成接口调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 分类表错误
    #[error("分类表错误: {0}")]
    Taxonomy(#[from] TaxonomyError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 已有请求在进行中
    #[error("已有生成请求正在进行")]
    Busy,
    /// 请求返回时页面已经重置，结果被丢弃
    #[error("请求已被放弃（页面已重置）")]
    Abandoned,
}

/// 表单校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 必填字段为空
    #[error("必填字段为空: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },
    /// 选择了"其他"但没有填写内容
    #[error("字段 {selector} 选择了其他选项，但 {input} 为空")]
    OtherNotSpecified { selector: String, input: String },
    /// 字段值无法解析
    #[error("字段 {field} 的值 '{value}' 无法解析为 {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

/// 生成接口调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 无法连接到服务器
    #[error("无法连接到服务器 ({endpoint}): {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: BoxError,
    },
    /// 请求超时
    #[error("请求超时 ({endpoint})，已等待 {after:?}")]
    Timeout { endpoint: String, after: Duration },
    /// 非 2xx 响应
    #[error("服务器返回错误状态 ({endpoint}): status={status}, detail={detail:?}")]
    BadStatus {
        endpoint: String,
        status: u16,
        detail: Option<String>,
    },
    /// 请求体序列化失败
    #[error("请求体序列化失败 ({endpoint}): {source}")]
    EncodeFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 响应体格式不符合约定
    #[error("响应格式错误 ({endpoint}): {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: BoxError,
    },
}

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 还没有成功生成过文档
    #[error("没有可导出的文档")]
    NoDocument,
    /// 导出请求失败
    #[error("导出请求失败: status={status:?}")]
    Failed {
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },
    /// 保存到本地失败
    #[error("保存文件失败: {0}")]
    SaveFailed(#[source] FileError),
}

/// 分类表校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("分类表 {name} 没有任何学段")]
    NoLevels { name: String },
    #[error("学段 {level} 没有任何年级")]
    NoGrades { level: String },
    #[error("{level} / {grade} 没有任何条目")]
    NoLabels { level: String, grade: String },
    #[error("学段重复: {level}")]
    DuplicateLevel { level: String },
    #[error("学段 {level} 中年级重复: {grade}")]
    DuplicateGrade { level: String, grade: String },
    #[error("{level} / {grade} 中条目重复: {label}")]
    DuplicateLabel {
        level: String,
        grade: String,
        label: String,
    },
    #[error("分类表中存在空白名称 ({context})")]
    BlankName { context: String },
    #[error("分类表解析失败: {0}")]
    Parse(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// API 地址不合法
    #[error("API 地址不合法: '{0}'")]
    InvalidBaseUrl(String),
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端构建失败: {0}")]
    ClientBuild(#[source] BoxError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// 创建无法连接错误
    pub fn unreachable(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::Unreachable {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建非 2xx 响应错误
    pub fn bad_status(endpoint: impl Into<String>, status: u16, detail: Option<String>) -> Self {
        AppError::Api(ApiError::BadStatus {
            endpoint: endpoint.into(),
            status,
            detail,
        })
    }

    /// 创建导出失败错误
    pub fn export_failed(status: Option<u16>) -> Self {
        AppError::Export(ExportError::Failed {
            status,
            source: None,
        })
    }

    /// 展示给用户的提示文本
    ///
    /// 服务端返回的 detail 原样展示，其余错误使用固定文案。
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(ValidationError::OtherNotSpecified { .. }) => {
                MSG_SPECIFY_OTHER.to_string()
            }
            AppError::Validation(_) => MSG_REQUIRED_FIELDS.to_string(),
            AppError::Api(ApiError::Unreachable { .. }) => MSG_SERVER_UNREACHABLE.to_string(),
            AppError::Api(ApiError::Timeout { .. }) => MSG_TIMEOUT.to_string(),
            AppError::Api(ApiError::BadStatus {
                detail: Some(detail),
                ..
            }) if !detail.trim().is_empty() => detail.clone(),
            AppError::Api(_) => MSG_GENERATION_FAILED.to_string(),
            AppError::Export(ExportError::NoDocument) => MSG_NO_DOCUMENT.to_string(),
            AppError::Export(_) => MSG_EXPORT_FAILED.to_string(),
            AppError::Busy => MSG_BUSY.to_string(),
            AppError::Abandoned => String::new(),
            other => other.to_string(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
