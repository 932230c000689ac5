//! 发往后端的请求体
//!
//! 字段名与后端接口保持一致（西班牙语）

use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, AppError, AppResult};
use crate::models::variant::FormVariant;

/// 应急课堂活动
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmergencyActivityRequest {
    pub nivel: String,
    pub curso: String,
    pub asignatura: String,
    pub situacion: String,
    pub duracion: String,
}

/// 数学应用题
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MathProblemsRequest {
    pub nivel: String,
    pub curso: String,
    pub tematica: String,
    pub dificultad: String,
    pub numero_problemas: u32,
    pub incluir_soluciones: bool,
    /// 为空时序列化为 null
    pub contexto: Option<String>,
}

/// 教学单元
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UnitPlanRequest {
    pub nivel: String,
    pub curso: String,
    pub asignatura: String,
    pub tema: String,
    pub caracteristicas_grupo: Option<String>,
}

/// 评分量表
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RubricRequest {
    pub nivel: String,
    pub curso: String,
    pub asignatura: String,
    pub tema: String,
    pub tipo_evaluacion: String,
}

/// 考试
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExamRequest {
    pub nivel: String,
    pub curso: String,
    pub asignatura: String,
    pub tema: String,
    pub tipo_examen: String,
    pub dificultad: String,
    pub duracion: String,
}

/// 学习情境
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LearningSituationRequest {
    pub nivel: String,
    pub curso: String,
    pub asignatura: String,
    pub contexto: String,
    pub metodologia: String,
    pub duracion_sesiones: u32,
    pub competencias_clave: Vec<String>,
}

/// 家长报告
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FamilyReportRequest {
    pub nivel: String,
    pub curso: String,
    pub asignatura: String,
    pub nombre_alumno: String,
    pub aspectos_positivos: String,
    pub aspectos_mejora: String,
    pub tono: String,
}

/// 教学点子
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IdeasRequest {
    pub nivel: String,
    pub curso: String,
    pub asignatura: String,
    pub tema: String,
    pub tipo_actividad: String,
}

/// 导出 Word 请求
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportRequest {
    pub contenido: String,
    pub titulo: String,
}

/// 一次生成请求
///
/// 提交时组装，请求结束即丢弃，不做持久化。
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    variant: FormVariant,
    body: Value,
}

impl GenerationRequest {
    pub fn new<T: Serialize>(variant: FormVariant, payload: &T) -> AppResult<Self> {
        let body = serde_json::to_value(payload).map_err(|source| {
            AppError::Api(ApiError::EncodeFailed {
                endpoint: variant.endpoint().to_string(),
                source,
            })
        })?;
        Ok(Self { variant, body })
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn endpoint(&self) -> &'static str {
        self.variant.endpoint()
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}
