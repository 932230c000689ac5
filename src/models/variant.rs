/// 导出 Word 的接口路径
pub const EXPORT_WORD_PATH: &str = "/api/exportar/word";
/// 健康检查接口路径
pub const HEALTH_PATH: &str = "/health";
/// 导出文档的扩展名
pub const DOCUMENT_EXTENSION: &str = "docx";

/// 页面类型，每种对应后端的一个生成接口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormVariant {
    /// 应急课堂活动
    Emergency,
    /// 数学应用题
    MathProblems,
    /// 教学单元
    UnitPlan,
    /// 评分量表
    Rubric,
    /// 考试
    Exam,
    /// 学习情境
    LearningSituation,
    /// 家长报告
    FamilyReport,
    /// 教学点子
    Ideas,
}

static VARIANTS_BY_SLUG: phf::Map<&'static str, FormVariant> = phf::phf_map! {
    "emergencia" => FormVariant::Emergency,
    "problemas-matematicas" => FormVariant::MathProblems,
    "unidad" => FormVariant::UnitPlan,
    "rubrica" => FormVariant::Rubric,
    "examen" => FormVariant::Exam,
    "situacion" => FormVariant::LearningSituation,
    "informe" => FormVariant::FamilyReport,
    "ideas" => FormVariant::Ideas,
};

impl FormVariant {
    pub const ALL: [FormVariant; 8] = [
        FormVariant::Emergency,
        FormVariant::MathProblems,
        FormVariant::UnitPlan,
        FormVariant::Rubric,
        FormVariant::Exam,
        FormVariant::LearningSituation,
        FormVariant::FamilyReport,
        FormVariant::Ideas,
    ];

    /// 短名称（用于配置文件）
    pub fn slug(self) -> &'static str {
        match self {
            FormVariant::Emergency => "emergencia",
            FormVariant::MathProblems => "problemas-matematicas",
            FormVariant::UnitPlan => "unidad",
            FormVariant::Rubric => "rubrica",
            FormVariant::Exam => "examen",
            FormVariant::LearningSituation => "situacion",
            FormVariant::FamilyReport => "informe",
            FormVariant::Ideas => "ideas",
        }
    }

    /// 生成接口路径
    pub fn endpoint(self) -> &'static str {
        match self {
            FormVariant::Emergency => "/api/emergencia",
            FormVariant::MathProblems => "/api/generar/problemas-matematicas",
            FormVariant::UnitPlan => "/api/generar/unidad",
            FormVariant::Rubric => "/api/generar/rubrica",
            FormVariant::Exam => "/api/generar/examen",
            FormVariant::LearningSituation => "/api/generar/situacion",
            FormVariant::FamilyReport => "/api/generar/informe",
            FormVariant::Ideas => "/api/generar/ideas",
        }
    }

    /// 下载文件标题前缀
    pub fn title_prefix(self) -> &'static str {
        match self {
            FormVariant::Emergency => "Actividad_Emergencia",
            FormVariant::MathProblems => "Problemas_Matematicas",
            FormVariant::UnitPlan => "Unidad_Didactica",
            FormVariant::Rubric => "Rubrica",
            FormVariant::Exam => "Examen",
            FormVariant::LearningSituation => "Situacion_Aprendizaje",
            FormVariant::FamilyReport => "Informe_Familia",
            FormVariant::Ideas => "Ideas_Didacticas",
        }
    }

    /// 从短名称解析
    pub fn from_slug(slug: &str) -> Option<Self> {
        VARIANTS_BY_SLUG.get(slug.trim()).copied()
    }
}

impl TryFrom<String> for FormVariant {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_slug(&value).ok_or_else(|| format!("未知的页面类型: {}", value))
    }
}

impl From<FormVariant> for String {
    fn from(variant: FormVariant) -> Self {
        variant.slug().to_string()
    }
}

impl std::fmt::Display for FormVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_lookup_matches_every_variant() {
        for variant in FormVariant::ALL {
            assert_eq!(FormVariant::from_slug(variant.slug()), Some(variant));
        }
        assert_eq!(FormVariant::from_slug(" examen "), Some(FormVariant::Exam));
        assert_eq!(FormVariant::from_slug("bachillerato"), None);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(FormVariant::Emergency.endpoint(), "/api/emergencia");
        assert_eq!(
            FormVariant::MathProblems.endpoint(),
            "/api/generar/problemas-matematicas"
        );
    }
}
