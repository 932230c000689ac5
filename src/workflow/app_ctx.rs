//! 页面运行上下文
//!
//! 封装"这个页面和谁说话"：后端、提示出口、文件保存、分类表

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{FileSaver, Notifier};
use crate::models::Taxonomy;
use crate::services::GenerationApi;

/// 页面运行上下文
///
/// 启动时构建一次，所有页面共享。页面自身的状态不放在这里。
#[derive(Clone)]
pub struct AppCtx {
    pub api: Arc<dyn GenerationApi>,
    pub notifier: Arc<dyn Notifier>,
    pub saver: Arc<dyn FileSaver>,

    /// 学段 → 年级 → 科目
    pub subjects: Arc<Taxonomy>,

    /// 学段 → 年级 → 数学主题
    pub math_topics: Arc<Taxonomy>,

    /// 提示显示时长
    pub alert_duration: Duration,

    /// 单次后端调用的上限
    pub request_timeout: Duration,
}

impl AppCtx {
    /// 使用内置分类表创建上下文
    pub fn new(
        config: &Config,
        api: Arc<dyn GenerationApi>,
        notifier: Arc<dyn Notifier>,
        saver: Arc<dyn FileSaver>,
    ) -> AppResult<Self> {
        Ok(Self {
            api,
            notifier,
            saver,
            subjects: Arc::new(Taxonomy::subjects()?),
            math_topics: Arc::new(Taxonomy::math_topics()?),
            alert_duration: config.alert_duration(),
            request_timeout: config.request_timeout(),
        })
    }

    /// 替换分类表（例如从 TAXONOMY_DIR 加载的版本）
    pub fn with_taxonomies(mut self, subjects: Taxonomy, math_topics: Taxonomy) -> Self {
        self.subjects = Arc::new(subjects);
        self.math_topics = Arc::new(math_topics);
        self
    }
}

impl fmt::Debug for AppCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCtx")
            .field("subjects", &self.subjects.name())
            .field("math_topics", &self.math_topics.name())
            .field("alert_duration", &self.alert_duration)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
