//! 表单校验 - 业务能力层

use tracing::debug;

use crate::error::ValidationError;
use crate::infrastructure::FormSurface;
use crate::services::other_field::OtherField;

/// 校验所有必填字段
///
/// 空字段被标记为无效，非空字段清除无效标记。
pub fn validate_required(form: &dyn FormSurface) -> Result<(), ValidationError> {
    let mut missing = Vec::new();

    for id in form.required_fields() {
        let empty = form.value(&id).trim().is_empty();
        form.set_invalid(&id, empty);
        if empty {
            missing.push(id);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        debug!("必填字段为空: {:?}", missing);
        Err(ValidationError::MissingFields { fields: missing })
    }
}

/// 完整的提交前校验
///
/// 所有必填字段都会被标记；"其他"输入框未填写时优先报告它。
pub fn validate_form(
    form: &dyn FormSurface,
    other_fields: &[OtherField],
) -> Result<(), ValidationError> {
    let required = validate_required(form);
    for other in other_fields {
        other.validate(form)?;
    }
    required
}

/// 把字段解析为正整数，失败时标记字段无效
pub fn parse_positive(form: &dyn FormSurface, id: &str) -> Result<u32, ValidationError> {
    let raw = form.value(id);
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => {
            form.set_invalid(id, true);
            Err(ValidationError::InvalidValue {
                field: id.to_string(),
                value: raw,
                expected: "正整数".to_string(),
            })
        }
    }
}
