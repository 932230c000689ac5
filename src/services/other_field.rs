//! "其他（请注明）"输入框 - 业务能力层

use crate::error::ValidationError;
use crate::infrastructure::FormSurface;

/// 默认的"其他"选项值
pub const OTHER_SENTINEL: &str = "Otro (especificar)";

/// 下拉框与"其他"输入框的绑定
#[derive(Debug, Clone)]
pub struct OtherField {
    pub selector_id: String,
    pub container_id: String,
    pub input_id: String,
    pub sentinel: String,
}

impl OtherField {
    pub fn configure(
        selector_id: impl Into<String>,
        container_id: impl Into<String>,
        input_id: impl Into<String>,
        sentinel: impl Into<String>,
    ) -> Self {
        Self {
            selector_id: selector_id.into(),
            container_id: container_id.into(),
            input_id: input_id.into(),
            sentinel: sentinel.into(),
        }
    }

    pub fn is_active(&self, form: &dyn FormSurface) -> bool {
        form.value(&self.selector_id) == self.sentinel
    }

    /// 下拉框变化后同步输入框状态
    ///
    /// 反复切换不会留下"隐藏但必填"的状态。
    pub fn sync(&self, form: &dyn FormSurface) {
        if self.is_active(form) {
            form.set_visible(&self.container_id, true);
            form.set_required(&self.input_id, true);
        } else {
            form.set_visible(&self.container_id, false);
            form.set_required(&self.input_id, false);
            form.set_value(&self.input_id, "");
            form.set_invalid(&self.input_id, false);
        }
    }

    /// 字段变化时调用，返回该字段是否是本绑定的下拉框
    pub fn on_change(&self, form: &dyn FormSurface, field_id: &str) -> bool {
        if field_id != self.selector_id {
            return false;
        }
        self.sync(form);
        true
    }

    /// 最终取值：选中"其他"时取输入框内容（去空白），否则取下拉框的值
    pub fn effective_value(&self, form: &dyn FormSurface) -> String {
        if self.is_active(form) {
            form.value(&self.input_id).trim().to_string()
        } else {
            form.value(&self.selector_id)
        }
    }

    /// 选中"其他"但输入框为空时返回错误
    pub fn validate(&self, form: &dyn FormSurface) -> Result<(), ValidationError> {
        if self.is_active(form) && form.value(&self.input_id).trim().is_empty() {
            form.set_invalid(&self.input_id, true);
            return Err(ValidationError::OtherNotSpecified {
                selector: self.selector_id.clone(),
                input: self.input_id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{FieldSpec, MemoryForm};

    fn setup() -> (OtherField, MemoryForm) {
        let form = MemoryForm::new([
            FieldSpec::select("tematica").with_choices(
                "Selecciona una temática",
                &["Perímetros de figuras", OTHER_SENTINEL],
            ),
            FieldSpec::container("otroContainer"),
            FieldSpec::text("otraTematica"),
        ]);
        let other = OtherField::configure("tematica", "otroContainer", "otraTematica", OTHER_SENTINEL);
        (other, form)
    }

    fn choose(other: &OtherField, form: &MemoryForm, value: &str) {
        form.set_value("tematica", value);
        other.on_change(form, "tematica");
    }

    #[test]
    fn test_sentinel_reveals_and_requires_input() {
        let (other, form) = setup();
        choose(&other, &form, OTHER_SENTINEL);

        assert!(form.is_visible("otroContainer"));
        assert!(form.is_required("otraTematica"));
    }

    #[test]
    fn test_other_value_hides_and_clears_input() {
        let (other, form) = setup();
        choose(&other, &form, OTHER_SENTINEL);
        form.set_value("otraTematica", "Repartos en el comedor");

        choose(&other, &form, "Perímetros de figuras");

        assert!(!form.is_visible("otroContainer"));
        assert!(!form.is_required("otraTematica"));
        assert_eq!(form.value("otraTematica"), "");
    }

    #[test]
    fn test_repeated_toggling_leaves_no_residue() {
        let (other, form) = setup();
        for _ in 0..5 {
            choose(&other, &form, OTHER_SENTINEL);
            form.set_value("otraTematica", "algo");
            choose(&other, &form, "");
        }
        assert!(!form.is_visible("otroContainer"));
        assert!(!form.is_required("otraTematica"));
        assert_eq!(form.value("otraTematica"), "");

        choose(&other, &form, OTHER_SENTINEL);
        choose(&other, &form, OTHER_SENTINEL);
        assert!(form.is_visible("otroContainer"));
        assert!(form.is_required("otraTematica"));
    }

    #[test]
    fn test_effective_value_and_validation() {
        let (other, form) = setup();
        choose(&other, &form, "Perímetros de figuras");
        assert_eq!(other.effective_value(&form), "Perímetros de figuras");
        assert!(other.validate(&form).is_ok());

        choose(&other, &form, OTHER_SENTINEL);
        form.set_value("otraTematica", "   ");
        assert!(matches!(
            other.validate(&form),
            Err(ValidationError::OtherNotSpecified { .. })
        ));
        assert!(form.is_invalid("otraTematica"));

        form.set_value("otraTematica", "  Recetas de cocina ");
        assert_eq!(other.effective_value(&form), "Recetas de cocina");
        assert!(other.validate(&form).is_ok());
    }

    #[test]
    fn test_unrelated_field_is_ignored() {
        let (other, form) = setup();
        assert!(!other.on_change(&form, "curso"));
    }
}
