//! 提示消息 - 基础设施层
//!
//! 负责把一条临时提示交给界面，到时间后自动消失

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Success,
    Info,
}

/// 一条已经发出的提示
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn is_active_at(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) < self.duration
    }
}

/// 提示出口
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity, duration: Duration);
}

/// 只写日志的提示出口（无界面运行时使用）
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity, duration: Duration) {
        match severity {
            Severity::Error => error!("🔔 {} ({}ms)", message, duration.as_millis()),
            Severity::Success => info!("🔔 {} ({}ms)", message, duration.as_millis()),
            Severity::Info => info!("🔔 {}", message),
        }
    }
}

/// 保存所有提示的出口
///
/// 和页面上的提示条一样，同一时间只展示最新的一条，超时后不再可见。
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    history: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 全部历史提示
    pub fn history(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.lock().last().cloned()
    }

    /// 当前仍在显示的提示
    pub fn visible(&self) -> Option<Notification> {
        self.visible_at(Instant::now())
    }

    pub fn visible_at(&self, now: Instant) -> Option<Notification> {
        self.lock().last().filter(|n| n.is_active_at(now)).cloned()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str, severity: Severity, duration: Duration) {
        if severity == Severity::Error {
            warn!("提示: {}", message);
        }
        self.lock().push(Notification {
            message: message.to_string(),
            severity,
            shown_at: Instant::now(),
            duration,
        });
    }
}
