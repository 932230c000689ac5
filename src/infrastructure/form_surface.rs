//! 表单界面 - 基础设施层
//!
//! 只暴露"读写字段"的能力，不认识学段/年级，也不关心请求流程

use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// 页面上互斥显示的区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// 表单本身
    Form,
    /// 加载提示
    Loading,
    /// 结果展示
    Result,
}

/// 下拉框中的一个选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl SelectOption {
    /// 普通选项，值和显示文本相同
    pub fn entry(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
            disabled: false,
        }
    }

    /// 占位选项（值为空）
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: false,
        }
    }

    /// 锁定状态下唯一的、不可选的占位选项
    pub fn locked(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

/// 类 DOM 的表单界面
///
/// 所有方法都是 `&self`，实现者自行处理内部可变性。
/// 对不存在的字段，读取返回空值，写入被忽略。
pub trait FormSurface: Send + Sync {
    fn value(&self, id: &str) -> String;
    fn set_value(&self, id: &str, value: &str);

    fn options(&self, id: &str) -> Vec<SelectOption>;
    /// 替换选项列表；和 DOM 一样，当前值回到第一个选项
    fn set_options(&self, id: &str, options: Vec<SelectOption>);

    fn is_enabled(&self, id: &str) -> bool;
    fn set_enabled(&self, id: &str, enabled: bool);

    fn is_required(&self, id: &str) -> bool;
    fn set_required(&self, id: &str, required: bool);

    fn is_visible(&self, id: &str) -> bool;
    fn set_visible(&self, id: &str, visible: bool);

    fn is_invalid(&self, id: &str) -> bool;
    fn set_invalid(&self, id: &str, invalid: bool);

    /// 当前标记为必填的字段，按页面顺序
    fn required_fields(&self) -> Vec<String>;

    fn is_section_visible(&self, section: Section) -> bool;
    fn set_section_visible(&self, section: Section, visible: bool);

    fn result_text(&self) -> String;
    fn set_result_text(&self, text: &str);

    /// 所有字段回到初始值（相当于 form.reset()）
    fn reset_values(&self);
    fn scroll_to_top(&self);

    /// 复选框是否勾选
    fn is_checked(&self, id: &str) -> bool {
        self.value(id) == "true"
    }
}

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Select,
    Text,
    Checkbox,
    /// "其他"输入框外层的容器，只有可见性
    Container,
}

/// 字段定义，用于构建 `MemoryForm`
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub id: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default_value: String,
    pub options: Vec<SelectOption>,
}

impl FieldSpec {
    pub fn select(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Select)
    }

    pub fn text(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Text)
    }

    pub fn checkbox(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Checkbox).with_default("false")
    }

    pub fn container(id: impl Into<String>) -> Self {
        Self::new(id, FieldKind::Container)
    }

    fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            kind,
            required: false,
            default_value: String::new(),
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// 固定选项（例如难度），第一个为空值占位
    pub fn with_choices(mut self, placeholder: &str, choices: &[&str]) -> Self {
        self.options = std::iter::once(SelectOption::placeholder(placeholder))
            .chain(choices.iter().map(|c| SelectOption::entry(*c)))
            .collect();
        self
    }
}

#[derive(Debug, Clone)]
struct FieldState {
    id: String,
    kind: FieldKind,
    value: String,
    default_value: String,
    options: Vec<SelectOption>,
    enabled: bool,
    required: bool,
    visible: bool,
    invalid: bool,
}

#[derive(Debug, Default)]
struct FormState {
    fields: Vec<FieldState>,
    form_visible: bool,
    loading_visible: bool,
    result_visible: bool,
    result_text: String,
    scroll_count: usize,
}

impl FormState {
    fn field(&self, id: &str) -> Option<&FieldState> {
        self.fields.iter().find(|f| f.id == id)
    }

    fn field_mut(&mut self, id: &str) -> Option<&mut FieldState> {
        let found = self.fields.iter_mut().find(|f| f.id == id);
        if found.is_none() {
            warn!("表单中不存在字段: {}", id);
        }
        found
    }
}

/// 内存中的表单实现，供无界面运行和测试使用
#[derive(Debug)]
pub struct MemoryForm {
    state: Mutex<FormState>,
}

impl MemoryForm {
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        let fields = fields
            .into_iter()
            .map(|spec| FieldState {
                value: spec.default_value.clone(),
                id: spec.id,
                kind: spec.kind,
                default_value: spec.default_value,
                options: spec.options,
                enabled: true,
                required: spec.required,
                // "其他"容器默认隐藏
                visible: spec.kind != FieldKind::Container,
                invalid: false,
            })
            .collect();

        Self {
            state: Mutex::new(FormState {
                fields,
                form_visible: true,
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 选项中可选条目的值（不含占位）
    pub fn option_values(&self, id: &str) -> Vec<String> {
        self.options(id)
            .into_iter()
            .filter(|o| !o.is_placeholder())
            .map(|o| o.value)
            .collect()
    }

    /// 滚动到顶部的次数
    pub fn scroll_count(&self) -> usize {
        self.lock().scroll_count
    }

    pub fn has_field(&self, id: &str) -> bool {
        self.lock().field(id).is_some()
    }
}

impl FormSurface for MemoryForm {
    fn value(&self, id: &str) -> String {
        self.lock()
            .field(id)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&self, id: &str, value: &str) {
        let mut state = self.lock();
        if let Some(field) = state.field_mut(id) {
            // 和浏览器一致：下拉框不能选中列表之外的值
            let accepted = match field.kind {
                FieldKind::Select => {
                    value.is_empty()
                        || field
                            .options
                            .iter()
                            .any(|o| o.value == value && !o.disabled)
                }
                _ => true,
            };
            if accepted {
                field.value = value.to_string();
            } else {
                warn!("字段 {} 中没有选项 '{}'", id, value);
                field.value.clear();
            }
        }
    }

    fn options(&self, id: &str) -> Vec<SelectOption> {
        self.lock()
            .field(id)
            .map(|f| f.options.clone())
            .unwrap_or_default()
    }

    fn set_options(&self, id: &str, options: Vec<SelectOption>) {
        let mut state = self.lock();
        if let Some(field) = state.field_mut(id) {
            field.value = options.first().map(|o| o.value.clone()).unwrap_or_default();
            field.options = options;
        }
    }

    fn is_enabled(&self, id: &str) -> bool {
        self.lock().field(id).map(|f| f.enabled).unwrap_or(false)
    }

    fn set_enabled(&self, id: &str, enabled: bool) {
        if let Some(field) = self.lock().field_mut(id) {
            field.enabled = enabled;
        }
    }

    fn is_required(&self, id: &str) -> bool {
        self.lock().field(id).map(|f| f.required).unwrap_or(false)
    }

    fn set_required(&self, id: &str, required: bool) {
        if let Some(field) = self.lock().field_mut(id) {
            field.required = required;
        }
    }

    fn is_visible(&self, id: &str) -> bool {
        self.lock().field(id).map(|f| f.visible).unwrap_or(false)
    }

    fn set_visible(&self, id: &str, visible: bool) {
        if let Some(field) = self.lock().field_mut(id) {
            field.visible = visible;
        }
    }

    fn is_invalid(&self, id: &str) -> bool {
        self.lock().field(id).map(|f| f.invalid).unwrap_or(false)
    }

    fn set_invalid(&self, id: &str, invalid: bool) {
        if let Some(field) = self.lock().field_mut(id) {
            field.invalid = invalid;
        }
    }

    fn required_fields(&self) -> Vec<String> {
        self.lock()
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.id.clone())
            .collect()
    }

    fn is_section_visible(&self, section: Section) -> bool {
        let state = self.lock();
        match section {
            Section::Form => state.form_visible,
            Section::Loading => state.loading_visible,
            Section::Result => state.result_visible,
        }
    }

    fn set_section_visible(&self, section: Section, visible: bool) {
        let mut state = self.lock();
        match section {
            Section::Form => state.form_visible = visible,
            Section::Loading => state.loading_visible = visible,
            Section::Result => state.result_visible = visible,
        }
    }

    fn result_text(&self) -> String {
        self.lock().result_text.clone()
    }

    fn set_result_text(&self, text: &str) {
        self.lock().result_text = text.to_string();
    }

    fn reset_values(&self) {
        let mut state = self.lock();
        for field in state.fields.iter_mut() {
            field.value = field.default_value.clone();
            field.invalid = false;
        }
    }

    fn scroll_to_top(&self) {
        self.lock().scroll_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> MemoryForm {
        MemoryForm::new([
            FieldSpec::select("dificultad")
                .with_choices("Selecciona", &["Fácil", "Media", "Difícil"])
                .with_default("Media"),
            FieldSpec::text("contexto"),
            FieldSpec::checkbox("incluirSoluciones"),
            FieldSpec::container("otroContainer"),
        ])
    }

    #[test]
    fn test_select_rejects_unknown_value() {
        let form = sample_form();
        assert_eq!(form.value("dificultad"), "Media");

        form.set_value("dificultad", "Imposible");
        assert_eq!(form.value("dificultad"), "");

        form.set_value("dificultad", "Difícil");
        assert_eq!(form.value("dificultad"), "Difícil");
    }

    #[test]
    fn test_set_options_resets_value_to_first_option() {
        let form = sample_form();
        form.set_options(
            "dificultad",
            vec![SelectOption::placeholder("Elige"), SelectOption::entry("Media")],
        );
        assert_eq!(form.value("dificultad"), "");
        assert_eq!(form.option_values("dificultad"), vec!["Media".to_string()]);
    }

    #[test]
    fn test_reset_values_restores_defaults() {
        let form = sample_form();
        form.set_value("contexto", "Huerto escolar");
        form.set_value("incluirSoluciones", "true");
        form.set_invalid("contexto", true);
        assert!(form.is_checked("incluirSoluciones"));

        form.reset_values();

        assert_eq!(form.value("contexto"), "");
        assert!(!form.is_checked("incluirSoluciones"));
        assert!(!form.is_invalid("contexto"));
        assert_eq!(form.value("dificultad"), "Media");
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let form = sample_form();
        form.set_value("noExiste", "x");
        assert_eq!(form.value("noExiste"), "");
        assert!(!form.is_enabled("noExiste"));
    }

    #[test]
    fn test_container_hidden_by_default_and_sections() {
        let form = sample_form();
        assert!(!form.is_visible("otroContainer"));
        assert!(form.is_section_visible(Section::Form));
        assert!(!form.is_section_visible(Section::Loading));
        assert!(!form.is_section_visible(Section::Result));
    }
}
