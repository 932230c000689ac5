//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层把磁盘上的提交文件逐个回放到页面上，是无界面运行时的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量表单处理器
//! - 管理应用生命周期（初始化、运行）
//! - 健康检查
//! - 批量加载表单（Vec<Submission>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `submission_processor` - 单个表单处理器
//! - 为表单创建页面（PageController + MemoryForm）
//! - 按顺序填写字段
//! - 提交并按需导出
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Submission>)
//!     ↓
//! submission_processor (处理单个 Submission)
//!     ↓
//! workflow::PageController / GenerationPipeline
//!     ↓
//! services (能力层：selector / other_field / validation / api_client)
//!     ↓
//! infrastructure (基础设施：FormSurface / Notifier / FileSaver)
//! ```

pub mod batch_processor;
pub mod submission_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use submission_processor::{process_submission, SubmissionOutcome};
