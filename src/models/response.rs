use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 生成接口的标准响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<GeneratedDocument>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// 生成的文档
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    /// 文档正文（markdown）
    pub contenido: String,
    #[serde(default)]
    pub proveedor: Option<String>,
    #[serde(default)]
    pub modelo: Option<String>,
    #[serde(default)]
    pub tiempo_generacion: Option<f64>,
    #[serde(default)]
    pub tokens_usados: Option<u64>,
}

/// 非 2xx 响应体
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "deserialize_detail")]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// 尝试从响应体中取出可读的错误信息，解析失败返回 None
    pub fn parse_detail(bytes: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(bytes)
            .ok()
            .and_then(|b| b.detail)
            .filter(|d| !d.trim().is_empty())
    }
}

// FastAPI 的校验错误 detail 是数组，只取字符串形式
fn deserialize_detail<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// 健康检查响应
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub ia_providers: Value,
}

impl std::fmt::Display for GeneratedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} 字符 [提供方: {} / 模型: {} / 耗时: {}]",
            self.contenido.chars().count(),
            self.proveedor.as_deref().unwrap_or("未知"),
            self.modelo.as_deref().unwrap_or("未知"),
            self.tiempo_generacion
                .map(|t| format!("{:.1}s", t))
                .unwrap_or_else(|| "未知".to_string())
        )
    }
}
