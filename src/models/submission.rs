use serde::{Deserialize, Serialize};

use crate::models::variant::FormVariant;

/// 一次无界面的表单填写
///
/// 字段按文件中的顺序依次填入，级联下拉框依赖这个顺序。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub variant: FormVariant,
    /// 自定义下载标题，不填时按页面规则生成
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// 生成成功后是否导出 Word
    #[serde(default = "default_export")]
    pub export: bool,
    #[serde(default)]
    pub fields: Vec<FieldValue>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

fn default_export() -> bool {
    true
}

/// 一个字段的值
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldValue {
    pub id: String,
    #[serde(deserialize_with = "deserialize_scalar")]
    pub value: String,
}

impl Submission {
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }

    /// 用于日志的名称
    pub fn display_name(&self) -> String {
        self.file_path
            .clone()
            .unwrap_or_else(|| self.variant.slug().to_string())
    }
}

// 字段值允许写成字符串、整数或布尔值
fn deserialize_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, integer or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submission_with_mixed_scalars() {
        let content = r#"
            variant = "problemas-matematicas"

            [[fields]]
            id = "curso"
            value = "3º de Primaria"

            [[fields]]
            id = "numeroProblemas"
            value = 5

            [[fields]]
            id = "incluirSoluciones"
            value = true
        "#;
        let submission: Submission = toml::from_str(content).unwrap();

        assert_eq!(submission.variant, FormVariant::MathProblems);
        assert!(submission.export);
        assert_eq!(submission.fields[1].value, "5");
        assert_eq!(submission.fields[2].value, "true");
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let result: Result<Submission, _> = toml::from_str("variant = \"bachillerato\"");
        assert!(result.is_err());
    }
}
