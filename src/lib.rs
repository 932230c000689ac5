//! # Docentia Client
//!
//! 教学内容生成工具的客户端：级联选择学段/年级/科目，提交生成请求，导出 Word
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 界面与本地资源，只暴露能力
//! - `FormSurface` - 表单界面（`MemoryForm` 为内存实现）
//! - `Notifier` - 临时提示
//! - `FileSaver` - 保存导出的文档
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `CascadingSelector` - 学段 → 年级 → 科目/主题 联动
//! - `OtherField` - "其他（请注明）"输入框
//! - `validation` - 必填字段校验
//! - `HttpApiClient` - 后端生成、导出、健康检查
//! - `DocumentStore` - 最近一次生成的文档
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个页面"的完整交互
//! - `AppCtx` - 上下文封装（后端 + 提示 + 保存 + 分类表）
//! - `GenerationPipeline` - 表单 → 加载中 → 结果 状态切换
//! - `PageController` - 页面布局、请求组装、下载标题
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量回放提交文件，管理并发
//! - `orchestrator/submission_processor` - 回放单个提交文件
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{FormSurface, MemoryForm, MemoryNotifier};
pub use models::{FormVariant, Submission, Taxonomy};
pub use orchestrator::{process_submission, App, ProcessingStats};
pub use services::{CascadingSelector, GenerationApi, HttpApiClient, OtherField};
pub use workflow::{AppCtx, GenerationPipeline, PageController, ViewState};
