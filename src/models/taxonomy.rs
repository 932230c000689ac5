//! 学段 / 年级 / 科目分类表
//!
//! 两层结构：学段 → 年级列表，(学段, 年级) → 条目列表。
//! 加载时校验，之后只读。

use serde::Deserialize;
use std::collections::HashSet;

use crate::error::TaxonomyError;

const SUBJECTS_TOML: &str = include_str!("../../assets/taxonomy/subjects.toml");
const MATH_TOPICS_TOML: &str = include_str!("../../assets/taxonomy/math_topics.toml");

/// 分类表文件结构（未校验）
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyFile {
    pub name: String,
    #[serde(default)]
    pub levels: Vec<LevelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelEntry {
    pub name: String,
    #[serde(default)]
    pub grades: Vec<GradeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeEntry {
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// 已校验的分类表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    name: String,
    levels: Vec<Level>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub name: String,
    pub grades: Vec<Grade>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub name: String,
    pub labels: Vec<String>,
}

impl Taxonomy {
    /// 内置科目表（Primaria / ESO）
    pub fn subjects() -> Result<Self, TaxonomyError> {
        Self::from_toml_str(SUBJECTS_TOML)
    }

    /// 内置小学数学主题表（按年级）
    pub fn math_topics() -> Result<Self, TaxonomyError> {
        Self::from_toml_str(MATH_TOPICS_TOML)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, TaxonomyError> {
        let file: TaxonomyFile =
            toml::from_str(content).map_err(|e| TaxonomyError::Parse(e.to_string()))?;
        Self::from_file(file)
    }

    /// 校验并构建分类表
    ///
    /// 任何一层为空、名称空白或同层重复都会被拒绝。
    pub fn from_file(file: TaxonomyFile) -> Result<Self, TaxonomyError> {
        if file.levels.is_empty() {
            return Err(TaxonomyError::NoLevels { name: file.name });
        }

        let mut seen_levels = HashSet::new();
        let mut levels = Vec::with_capacity(file.levels.len());

        for level in file.levels {
            check_blank(&level.name, || format!("{} 的学段", file.name))?;
            if !seen_levels.insert(level.name.clone()) {
                return Err(TaxonomyError::DuplicateLevel { level: level.name });
            }
            if level.grades.is_empty() {
                return Err(TaxonomyError::NoGrades { level: level.name });
            }

            let mut seen_grades = HashSet::new();
            let mut grades = Vec::with_capacity(level.grades.len());

            for grade in level.grades {
                check_blank(&grade.name, || format!("{} 的年级", level.name))?;
                if !seen_grades.insert(grade.name.clone()) {
                    return Err(TaxonomyError::DuplicateGrade {
                        level: level.name,
                        grade: grade.name,
                    });
                }
                if grade.labels.is_empty() {
                    return Err(TaxonomyError::NoLabels {
                        level: level.name,
                        grade: grade.name,
                    });
                }

                let mut seen_labels = HashSet::new();
                for label in &grade.labels {
                    check_blank(label, || format!("{} / {}", level.name, grade.name))?;
                    if !seen_labels.insert(label.as_str()) {
                        return Err(TaxonomyError::DuplicateLabel {
                            level: level.name.clone(),
                            grade: grade.name.clone(),
                            label: label.clone(),
                        });
                    }
                }

                grades.push(Grade {
                    name: grade.name,
                    labels: grade.labels,
                });
            }

            levels.push(Level {
                name: level.name,
                grades,
            });
        }

        Ok(Self {
            name: file.name,
            levels,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.name == name)
    }

    /// 按键路径查找下一层的条目
    ///
    /// - `[]` → 学段
    /// - `[学段]` → 年级
    /// - `[学段, 年级]` → 科目 / 主题
    ///
    /// 路径中任何一段不存在（包括空字符串）都返回 `None`。
    pub fn children(&self, path: &[&str]) -> Option<Vec<&str>> {
        match path {
            [] => Some(self.levels.iter().map(|l| l.name.as_str()).collect()),
            [level] => self
                .level(level)
                .map(|l| l.grades.iter().map(|g| g.name.as_str()).collect()),
            [level, grade] => self
                .level(level)?
                .grades
                .iter()
                .find(|g| g.name == *grade)
                .map(|g| g.labels.iter().map(String::as_str).collect()),
            _ => None,
        }
    }
}

fn check_blank(name: &str, context: impl FnOnce() -> String) -> Result<(), TaxonomyError> {
    if name.trim().is_empty() {
        return Err(TaxonomyError::BlankName { context: context() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_subjects_load() {
        let taxonomy = Taxonomy::subjects().unwrap();
        assert_eq!(taxonomy.children(&[]).unwrap(), vec!["Primaria", "ESO"]);
        assert_eq!(taxonomy.children(&["Primaria"]).unwrap().len(), 6);
        assert_eq!(
            taxonomy.children(&["ESO"]).unwrap(),
            vec!["1º de ESO", "2º de ESO", "3º de ESO", "4º de ESO"]
        );
        assert_eq!(
            taxonomy.children(&["ESO", "4º de ESO"]).unwrap().len(),
            11
        );
    }

    #[test]
    fn test_builtin_math_topics_load() {
        let taxonomy = Taxonomy::math_topics().unwrap();
        assert_eq!(taxonomy.children(&[]).unwrap(), vec!["Primaria"]);
        let topics = taxonomy.children(&["Primaria", "5º de Primaria"]).unwrap();
        assert_eq!(topics.len(), 13);
        assert_eq!(topics.last(), Some(&"Otro (especificar)"));
    }

    #[test]
    fn test_unresolved_paths() {
        let taxonomy = Taxonomy::subjects().unwrap();
        assert!(taxonomy.children(&["Bachillerato"]).is_none());
        assert!(taxonomy.children(&[""]).is_none());
        assert!(taxonomy.children(&["Primaria", "1º de ESO"]).is_none());
        assert!(taxonomy.children(&["Primaria", ""]).is_none());
        assert!(taxonomy
            .children(&["Primaria", "1º de Primaria", "Matemáticas"])
            .is_none());
    }

    #[test]
    fn test_rejects_duplicate_grade() {
        let content = r#"
            name = "t"
            [[levels]]
            name = "Primaria"
            [[levels.grades]]
            name = "1º"
            labels = ["a"]
            [[levels.grades]]
            name = "1º"
            labels = ["b"]
        "#;
        assert_eq!(
            Taxonomy::from_toml_str(content).unwrap_err(),
            TaxonomyError::DuplicateGrade {
                level: "Primaria".into(),
                grade: "1º".into()
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_label_and_empty_lists() {
        let duplicate = r#"
            name = "t"
            [[levels]]
            name = "ESO"
            [[levels.grades]]
            name = "1º"
            labels = ["Música", "Música"]
        "#;
        assert!(matches!(
            Taxonomy::from_toml_str(duplicate),
            Err(TaxonomyError::DuplicateLabel { .. })
        ));

        let no_labels = r#"
            name = "t"
            [[levels]]
            name = "ESO"
            [[levels.grades]]
            name = "1º"
        "#;
        assert!(matches!(
            Taxonomy::from_toml_str(no_labels),
            Err(TaxonomyError::NoLabels { .. })
        ));

        assert!(matches!(
            Taxonomy::from_toml_str("name = \"vacía\""),
            Err(TaxonomyError::NoLevels { .. })
        ));
    }

    #[test]
    fn test_rejects_blank_names() {
        let content = r#"
            name = "t"
            [[levels]]
            name = "  "
            [[levels.grades]]
            name = "1º"
            labels = ["a"]
        "#;
        assert!(matches!(
            Taxonomy::from_toml_str(content),
            Err(TaxonomyError::BlankName { .. })
        ));
    }
}
