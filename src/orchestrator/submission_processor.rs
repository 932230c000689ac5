//! 单个表单处理器 - 编排层
//!
//! ## 职责
//!
//! 把一份提交文件（TOML）当作一次用户操作来回放：
//!
//! 1. **打开页面**：按页面类型创建内存表单并挂载
//! 2. **填写表单**：按文件中的顺序逐个修改字段，触发级联与"其他"联动
//! 3. **提交**：校验、发送生成请求
//! 4. **导出**：需要时下载 Word 文档

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::Submission;
use crate::utils::logging::{log_submission_start, truncate_text};
use crate::workflow::{AppCtx, PageController, PageLayout};

/// 单个表单的处理结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// 生成内容的字符数
    pub content_chars: usize,
    /// 导出的文件路径（未导出或导出失败时为 None）
    pub exported: Option<PathBuf>,
}

/// 处理单个表单
///
/// # 参数
/// - `ctx`: 页面运行上下文
/// - `submission`: 表单数据
/// - `index` / `total`: 序号（用于日志）
///
/// # 返回
/// 生成失败返回错误；导出失败只记录警告
pub async fn process_submission(
    ctx: &AppCtx,
    submission: Submission,
    index: usize,
    total: usize,
) -> Result<SubmissionOutcome> {
    let name = submission.display_name();
    log_submission_start(index, total, &name);

    let form = Arc::new(PageLayout::for_variant(submission.variant).memory_form());
    let page = PageController::new(ctx, submission.variant, form);
    page.mount();
    page.fill(&submission.fields);

    let content = page
        .submit()
        .await
        .with_context(|| format!("[表单 {}] 生成失败: {}", index, name))?;

    info!(
        "[表单 {}] ✓ 生成完成 ({} 字符): {}",
        index,
        content.chars().count(),
        truncate_text(content.trim(), 80)
    );

    let mut outcome = SubmissionOutcome {
        content_chars: content.chars().count(),
        exported: None,
    };

    if !submission.export {
        info!("[表单 {}] 跳过导出", index);
        return Ok(outcome);
    }

    match page.download(submission.title.as_deref()).await {
        Ok(path) => {
            info!("[表单 {}] 📄 已保存: {}", index, path.display());
            outcome.exported = Some(path);
        }
        Err(e) => {
            error!("[表单 {}] 导出失败: {}", index, e);
            warn!("[表单 {}] 生成内容仍然有效，只是没有保存为文档", index);
        }
    }

    Ok(outcome)
}
