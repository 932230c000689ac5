//! 级联下拉框 - 业务能力层
//!
//! 学段 → 年级 → 科目（或 年级 → 主题）联动，只依赖分类表和表单界面

use std::sync::Arc;
use tracing::debug;

use crate::infrastructure::{FormSurface, SelectOption};
use crate::models::Taxonomy;

/// 链上的一个下拉框
#[derive(Debug, Clone)]
pub struct ChainField {
    pub id: String,
    /// 已解锁但还未选择时的占位文本
    pub placeholder: String,
    /// 上级未选择时的占位文本
    pub locked_placeholder: String,
}

impl ChainField {
    pub fn new(
        id: impl Into<String>,
        placeholder: impl Into<String>,
        locked_placeholder: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            placeholder: placeholder.into(),
            locked_placeholder: locked_placeholder.into(),
        }
    }
}

/// 级联下拉框控制器
///
/// 不变量：
/// - 第 i 个下拉框的选项永远等于分类表在 `前缀 + 前 i 个值` 下的条目
/// - 第 i 个值变化时，i 之后的所有下拉框先被清空并锁定，再尝试填充第 i+1 个
#[derive(Debug, Clone)]
pub struct CascadingSelector {
    chain: Vec<ChainField>,
    taxonomy: Arc<Taxonomy>,
    /// 固定的键前缀，例如数学页面固定学段为 Primaria
    prefix: Vec<String>,
}

impl CascadingSelector {
    pub fn configure(chain: Vec<ChainField>, taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            chain,
            taxonomy,
            prefix: Vec::new(),
        }
    }

    pub fn with_fixed_prefix(mut self, prefix: &[&str]) -> Self {
        self.prefix = prefix.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn chain(&self) -> &[ChainField] {
        &self.chain
    }

    pub fn position(&self, field_id: &str) -> Option<usize> {
        self.chain.iter().position(|f| f.id == field_id)
    }

    /// 页面加载时调用：第一个下拉框填入顶层条目，其余全部锁定
    pub fn mount(&self, form: &dyn FormSurface) {
        let Some(first) = self.chain.first() else {
            return;
        };

        let prefix: Vec<&str> = self.prefix.iter().map(String::as_str).collect();
        match self.taxonomy.children(&prefix) {
            Some(entries) if !entries.is_empty() => {
                form.set_options(&first.id, populated(&first.placeholder, &entries));
                form.set_enabled(&first.id, true);
            }
            _ => {
                form.set_options(&first.id, vec![SelectOption::locked(&first.locked_placeholder)]);
                form.set_enabled(&first.id, false);
            }
        }

        self.lock_from(form, 1);
    }

    /// 字段变化时调用，返回该字段是否属于本链
    pub fn on_change(&self, form: &dyn FormSurface, field_id: &str) -> bool {
        match self.position(field_id) {
            Some(index) => {
                self.cascade(form, index);
                true
            }
            None => false,
        }
    }

    fn cascade(&self, form: &dyn FormSurface, index: usize) {
        let values: Vec<String> = self.chain[..=index]
            .iter()
            .map(|f| form.value(&f.id))
            .collect();

        self.lock_from(form, index + 1);

        let Some(next) = self.chain.get(index + 1) else {
            return;
        };

        if values[index].is_empty() {
            debug!("{} 被清空，下级全部锁定", self.chain[index].id);
            return;
        }

        let key_path: Vec<&str> = self
            .prefix
            .iter()
            .map(String::as_str)
            .chain(values.iter().map(String::as_str))
            .collect();

        match self.taxonomy.children(&key_path) {
            Some(entries) if !entries.is_empty() => {
                debug!("{} 填入 {} 个选项", next.id, entries.len());
                form.set_options(&next.id, populated(&next.placeholder, &entries));
                form.set_enabled(&next.id, true);
            }
            _ => {
                debug!("分类表中没有 {:?}，{} 保持锁定", key_path, next.id);
            }
        }
    }

    /// 锁定 start 及之后的所有下拉框
    fn lock_from(&self, form: &dyn FormSurface, start: usize) {
        for field in self.chain.iter().skip(start) {
            form.set_options(&field.id, vec![SelectOption::locked(&field.locked_placeholder)]);
            form.set_enabled(&field.id, false);
        }
    }
}

fn populated(placeholder: &str, entries: &[&str]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder(placeholder))
        .chain(entries.iter().map(|e| SelectOption::entry(*e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{FieldSpec, MemoryForm};

    fn subjects_chain() -> (CascadingSelector, MemoryForm, Arc<Taxonomy>) {
        let taxonomy = Arc::new(Taxonomy::subjects().unwrap());
        let selector = CascadingSelector::configure(
            vec![
                ChainField::new("nivel", "Selecciona un nivel", "Selecciona un nivel"),
                ChainField::new("curso", "Selecciona un curso", "Selecciona primero un nivel"),
                ChainField::new(
                    "asignatura",
                    "Selecciona una asignatura",
                    "Selecciona primero un curso",
                ),
            ],
            taxonomy.clone(),
        );
        let form = MemoryForm::new([
            FieldSpec::select("nivel").required(),
            FieldSpec::select("curso").required(),
            FieldSpec::select("asignatura").required(),
        ]);
        selector.mount(&form);
        (selector, form, taxonomy)
    }

    fn choose(selector: &CascadingSelector, form: &MemoryForm, id: &str, value: &str) {
        form.set_value(id, value);
        selector.on_change(form, id);
    }

    #[test]
    fn test_mount_fills_levels_and_locks_descendants() {
        let (_, form, _) = subjects_chain();
        assert_eq!(form.option_values("nivel"), vec!["Primaria", "ESO"]);
        assert!(form.is_enabled("nivel"));
        assert!(!form.is_enabled("curso"));
        assert!(!form.is_enabled("asignatura"));
        assert_eq!(
            form.options("asignatura"),
            vec![SelectOption::locked("Selecciona primero un curso")]
        );
    }

    #[test]
    fn test_every_level_populates_its_grades_in_order() {
        let (selector, form, taxonomy) = subjects_chain();
        for level in taxonomy.levels() {
            choose(&selector, &form, "nivel", &level.name);

            let expected: Vec<String> = level.grades.iter().map(|g| g.name.clone()).collect();
            assert_eq!(form.option_values("curso"), expected);
            assert!(form.is_enabled("curso"));
            assert!(!form.is_enabled("asignatura"));
        }

        choose(&selector, &form, "nivel", "");
        assert!(form.option_values("curso").is_empty());
        assert!(!form.is_enabled("curso"));
    }

    #[test]
    fn test_every_pair_populates_its_subjects_in_order() {
        let (selector, form, taxonomy) = subjects_chain();
        for level in taxonomy.levels() {
            choose(&selector, &form, "nivel", &level.name);
            for grade in &level.grades {
                choose(&selector, &form, "curso", &grade.name);
                assert_eq!(form.option_values("asignatura"), grade.labels);
                assert!(form.is_enabled("asignatura"));
            }
        }
    }

    #[test]
    fn test_third_grade_primary_subjects() {
        let (selector, form, _) = subjects_chain();
        choose(&selector, &form, "nivel", "Primaria");
        choose(&selector, &form, "curso", "3º de Primaria");

        assert_eq!(
            form.option_values("asignatura"),
            vec![
                "Lengua Castellana y Literatura",
                "Matemáticas",
                "Conocimiento del Medio Natural, Social y Cultural",
                "Educación Artística",
                "Educación Física",
                "Lengua Extranjera (Inglés)",
            ]
        );
    }

    #[test]
    fn test_absent_pair_keeps_subject_locked() {
        let (selector, form, _) = subjects_chain();
        choose(&selector, &form, "nivel", "Primaria");
        // 绕过下拉框的取值限制，模拟不一致的状态
        form.set_options(
            "curso",
            vec![SelectOption::entry("1º de ESO")],
        );
        choose(&selector, &form, "curso", "1º de ESO");

        assert!(form.option_values("asignatura").is_empty());
        assert!(!form.is_enabled("asignatura"));
    }

    #[test]
    fn test_parent_change_clears_stale_options() {
        let (selector, form, _) = subjects_chain();
        choose(&selector, &form, "nivel", "ESO");
        choose(&selector, &form, "curso", "4º de ESO");
        choose(&selector, &form, "asignatura", "Latín");
        assert_eq!(form.value("asignatura"), "Latín");

        choose(&selector, &form, "nivel", "Primaria");

        assert_eq!(form.value("curso"), "");
        assert_eq!(form.value("asignatura"), "");
        assert!(!form.is_enabled("asignatura"));
        assert!(!form.option_values("curso").iter().any(|c| c.contains("ESO")));
        assert!(form.option_values("asignatura").is_empty());
    }

    #[test]
    fn test_reselecting_same_value_is_idempotent() {
        let (selector, form, _) = subjects_chain();
        choose(&selector, &form, "nivel", "ESO");
        choose(&selector, &form, "curso", "2º de ESO");
        let first = form.options("asignatura");

        choose(&selector, &form, "curso", "2º de ESO");

        assert_eq!(form.options("asignatura"), first);
        assert!(form.is_enabled("asignatura"));
    }

    #[test]
    fn test_fixed_prefix_chain_for_math_topics() {
        let taxonomy = Arc::new(Taxonomy::math_topics().unwrap());
        let selector = CascadingSelector::configure(
            vec![
                ChainField::new("curso", "Selecciona un curso", "Selecciona un curso"),
                ChainField::new("tematica", "Selecciona una temática", "Selecciona primero un curso"),
            ],
            taxonomy,
        )
        .with_fixed_prefix(&["Primaria"]);
        let form = MemoryForm::new([FieldSpec::select("curso"), FieldSpec::select("tematica")]);
        selector.mount(&form);

        assert_eq!(form.option_values("curso").len(), 6);
        choose(&selector, &form, "curso", "1º de Primaria");
        assert_eq!(form.option_values("tematica").len(), 11);
        assert!(!selector.on_change(&form, "dificultad"));
    }
}
