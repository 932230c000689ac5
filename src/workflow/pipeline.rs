//! 生成请求流程 - 流程层
//!
//! 核心职责：管理"表单 → 加载中 → 结果"三个区域的切换
//!
//! 状态转换：
//! 1. FormVisible --submit--> Loading
//! 2. Loading --成功--> ResultVisible
//! 3. Loading --失败/超时--> FormVisible（弹出错误提示）
//! 4. 任意状态 --reset--> FormVisible
//!
//! 同一时间只允许一个生成请求。reset 会让正在进行的请求作废，
//! 它返回时结果被直接丢弃。

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::error::{
    ApiError, AppError, AppResult, ExportError, MSG_BUSY, MSG_EXPORT_OK, MSG_NO_DOCUMENT,
};
use crate::infrastructure::{FileSaver, FormSurface, Notifier, Section, Severity};
use crate::models::request::{ExportRequest, GenerationRequest};
use crate::models::variant::{DOCUMENT_EXTENSION, EXPORT_WORD_PATH};
use crate::services::{DocumentStore, GenerationApi};
use crate::utils::logging::truncate_text;
use crate::workflow::app_ctx::AppCtx;

/// 页面当前展示的区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    FormVisible,
    Loading,
    ResultVisible,
}

#[derive(Debug)]
struct PipelineState {
    view: ViewState,
    /// 每次提交或重置都会递增，用来识别过期的响应
    token: u64,
    generating: bool,
    exporting: bool,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            view: ViewState::FormVisible,
            token: 0,
            generating: false,
            exporting: false,
        }
    }
}

/// 生成请求流程
///
/// - 持有表单界面和最近一次生成的文档
/// - 不关心请求体怎么组装（由页面负责）
pub struct GenerationPipeline {
    api: Arc<dyn GenerationApi>,
    form: Arc<dyn FormSurface>,
    notifier: Arc<dyn Notifier>,
    saver: Arc<dyn FileSaver>,
    documents: DocumentStore,
    alert_duration: Duration,
    request_timeout: Duration,
    state: Mutex<PipelineState>,
}

impl GenerationPipeline {
    pub fn new(ctx: &AppCtx, form: Arc<dyn FormSurface>) -> Self {
        Self {
            api: ctx.api.clone(),
            form,
            notifier: ctx.notifier.clone(),
            saver: ctx.saver.clone(),
            documents: DocumentStore::new(),
            alert_duration: ctx.alert_duration,
            request_timeout: ctx.request_timeout,
            state: Mutex::new(PipelineState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> ViewState {
        self.lock().view
    }

    pub fn is_generating(&self) -> bool {
        self.lock().generating
    }

    pub fn form(&self) -> &Arc<dyn FormSurface> {
        &self.form
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn notify(&self, message: &str, severity: Severity) {
        self.notifier.notify(message, severity, self.alert_duration);
    }

    /// 提交生成请求
    ///
    /// 成功时返回生成的正文，并把它存为最近一次的文档。
    pub async fn submit(&self, request: GenerationRequest) -> AppResult<String> {
        let token = {
            let mut state = self.lock();
            if state.generating {
                warn!("⏳ 已有生成请求在进行中，忽略本次提交");
                drop(state);
                self.notify(MSG_BUSY, Severity::Info);
                return Err(AppError::Busy);
            }
            state.generating = true;
            state.token += 1;
            state.view = ViewState::Loading;
            state.token
        };
        let in_flight = InFlight {
            pipeline: self,
            token,
            armed: true,
        };
        self.show_loading();

        let endpoint = request.endpoint();
        info!("📤 [{}] 提交生成请求 → {}", request.variant(), endpoint);

        let result = self
            .bounded(endpoint, self.api.generate(&request))
            .await
            .map(|document| document.contenido);
        in_flight.disarm();

        {
            let mut state = self.lock();
            if state.token != token {
                debug!("响应返回时页面已重置，丢弃结果 (token {})", token);
                return Err(AppError::Abandoned);
            }
            state.generating = false;
            state.view = if result.is_ok() {
                ViewState::ResultVisible
            } else {
                ViewState::FormVisible
            };
        }

        match result {
            Ok(content) => {
                info!(
                    "✅ [{}] 生成成功: {}",
                    request.variant(),
                    truncate_text(&content, 60)
                );
                self.show_result(&content);
                self.documents.store(content.clone());
                Ok(content)
            }
            Err(e) => {
                error!("❌ [{}] 生成失败: {}", request.variant(), e);
                self.show_form();
                self.notify(&e.user_message(), Severity::Error);
                Err(e)
            }
        }
    }

    /// 把最近一次的文档导出为 Word 并保存
    pub async fn export(&self, title: &str) -> AppResult<PathBuf> {
        let Some(content) = self.documents.current() else {
            warn!("没有可导出的文档");
            self.notify(MSG_NO_DOCUMENT, Severity::Error);
            return Err(ExportError::NoDocument.into());
        };

        {
            let mut state = self.lock();
            if state.exporting {
                warn!("⏳ 已有导出在进行中，忽略本次导出");
                return Err(AppError::Busy);
            }
            state.exporting = true;
        }
        let exporting = Exporting(self);

        let result = self.export_content(content, title).await;
        drop(exporting);

        match result {
            Ok(path) => {
                info!("📄 已导出: {}", path.display());
                self.notify(MSG_EXPORT_OK, Severity::Success);
                Ok(path)
            }
            Err(e) => {
                error!("❌ 导出失败: {}", e);
                self.notify(&e.user_message(), Severity::Error);
                Err(e)
            }
        }
    }

    async fn export_content(&self, contenido: String, title: &str) -> AppResult<PathBuf> {
        let request = ExportRequest {
            contenido,
            titulo: title.to_string(),
        };

        let bytes = self
            .bounded(EXPORT_WORD_PATH, self.api.export_word(&request))
            .await
            .map_err(|e| {
                if matches!(e, AppError::Api(ApiError::Timeout { .. })) {
                    AppError::Export(ExportError::Failed {
                        status: None,
                        source: Some(Box::new(e)),
                    })
                } else {
                    e
                }
            })?;

        let filename = format!(
            "{}_{}.{}",
            title,
            Utc::now().timestamp_millis(),
            DOCUMENT_EXTENSION
        );
        let path = self
            .saver
            .save(&bytes, &filename)
            .await
            .map_err(ExportError::SaveFailed)?;
        Ok(path)
    }

    /// 回到空白表单
    ///
    /// 正在进行的生成请求被作废，返回后不再影响界面。
    pub fn reset(&self) {
        {
            let mut state = self.lock();
            state.token += 1;
            state.generating = false;
            state.view = ViewState::FormVisible;
        }
        debug!("🔄 表单已重置");

        self.form.reset_values();
        self.show_form();
        self.form.scroll_to_top();
    }

    /// 给后端调用加上超时
    async fn bounded<T>(
        &self,
        endpoint: &str,
        call: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout {
                endpoint: endpoint.to_string(),
                after: self.request_timeout,
            }
            .into()),
        }
    }

    fn show_loading(&self) {
        self.form.set_section_visible(Section::Form, false);
        self.form.set_section_visible(Section::Loading, true);
        self.form.set_section_visible(Section::Result, false);
    }

    fn show_result(&self, content: &str) {
        self.form.set_result_text(content);
        self.form.set_section_visible(Section::Loading, false);
        self.form.set_section_visible(Section::Result, true);
    }

    fn show_form(&self) {
        self.form.set_section_visible(Section::Loading, false);
        self.form.set_section_visible(Section::Result, false);
        self.form.set_section_visible(Section::Form, true);
    }
}

/// 一次生成请求的占用标记
///
/// 提交的 future 在等待后端时被丢弃，占用随之释放，页面回到表单。
/// 请求正常结束时先 `disarm`，由 `submit` 自己切换状态。
struct InFlight<'a> {
    pipeline: &'a GenerationPipeline,
    token: u64,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let still_current = {
            let mut state = self.pipeline.lock();
            if state.token == self.token {
                state.generating = false;
                state.view = ViewState::FormVisible;
                true
            } else {
                false
            }
        };
        if still_current {
            warn!("⚠️ 生成请求中途被放弃 (token {})", self.token);
            self.pipeline.show_form();
        }
    }
}

/// 导出占用标记，离开作用域时释放
struct Exporting<'a>(&'a GenerationPipeline);

impl Drop for Exporting<'_> {
    fn drop(&mut self) {
        self.0.lock().exporting = false;
    }
}
