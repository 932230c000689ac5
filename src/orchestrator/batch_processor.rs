//! 批量表单处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量表单的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：构建后端客户端、加载分类表、创建运行上下文
//! 2. **健康检查**：启动时探测后端，失败也继续运行
//! 3. **批量加载**：扫描并加载所有待提交的表单（`Vec<Submission>`）
//! 4. **并发控制**：使用 Semaphore 限制同时提交的数量
//! 5. **全局统计**：汇总所有表单的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个表单的细节
//! - **向下委托**：委托 submission_processor 处理单个表单

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{DiskFileSaver, TracingNotifier};
use crate::models::{load_all_submissions, load_taxonomy, Submission};
use crate::orchestrator::submission_processor;
use crate::services::HttpApiClient;
use crate::utils::logging::{log_startup, log_submissions_loaded, print_final_stats};
use crate::workflow::AppCtx;

/// 自定义分类表目录中的文件名
const SUBJECTS_FILE: &str = "subjects.toml";
const MATH_TOPICS_FILE: &str = "math_topics.toml";

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub exported: usize,
    pub failed: usize,
    pub total: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    ctx: AppCtx,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let api = HttpApiClient::new(&config).context("无法创建后端客户端")?;
        let saver = DiskFileSaver::new(&config.download_dir);
        let mut ctx = AppCtx::new(
            &config,
            Arc::new(api),
            Arc::new(TracingNotifier),
            Arc::new(saver),
        )
        .context("内置分类表无效")?;

        if let Some(dir) = &config.taxonomy_dir {
            info!("📚 使用自定义分类表: {}", dir);
            let dir = Path::new(dir);
            let subjects = load_taxonomy(&dir.join(SUBJECTS_FILE)).await?;
            let math_topics = load_taxonomy(&dir.join(MATH_TOPICS_FILE)).await?;
            ctx = ctx.with_taxonomies(subjects, math_topics);
        }

        Ok(Self::with_context(config, ctx))
    }

    /// 使用已经构建好的上下文（测试中注入假的后端）
    pub fn with_context(config: Config, ctx: AppCtx) -> Self {
        Self { config, ctx }
    }

    pub fn context(&self) -> &AppCtx {
        &self.ctx
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        self.probe_health().await;

        let submissions = self.load_submissions().await?;

        if submissions.is_empty() {
            warn!("⚠️ 没有找到待提交的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_submissions_loaded(submissions.len(), self.config.max_concurrent_submissions);

        let stats = self.process_all_submissions(submissions).await?;

        print_final_stats(stats.success, stats.exported, stats.failed, stats.total);

        Ok(stats)
    }

    /// 健康检查，失败只记录警告
    async fn probe_health(&self) {
        match self.ctx.api.health().await {
            Ok(health) => info!(
                "💚 后端状态: {} (时间: {})",
                health.status,
                health.timestamp.as_deref().unwrap_or("-")
            ),
            Err(e) => warn!("⚠️ 健康检查失败，继续运行: {}", e),
        }
    }

    /// 加载表单
    async fn load_submissions(&self) -> Result<Vec<Submission>> {
        info!("\n📁 正在扫描待提交的表单...");
        load_all_submissions(&self.config.submissions_folder).await
    }

    /// 处理所有表单
    async fn process_all_submissions(
        &self,
        submissions: Vec<Submission>,
    ) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_submissions));
        let total = submissions.len();
        let mut handles = Vec::with_capacity(total);

        for (idx, submission) in submissions.into_iter().enumerate() {
            let index = idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let ctx = self.ctx.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                submission_processor::process_submission(&ctx, submission, index, total).await
            });
            handles.push((index, handle));
        }

        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for (index, handle) in handles {
            match handle.await {
                Ok(Ok(outcome)) => {
                    stats.success += 1;
                    if outcome.exported.is_some() {
                        stats.exported += 1;
                    }
                }
                Ok(Err(e)) => {
                    error!("{:#}", e);
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("[表单 {}] 任务执行失败: {}", index, e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}
