//! 最近一次生成的文档（单槽）

use std::sync::{Mutex, MutexGuard, PoisonError};

/// 只保存最近一次成功生成的内容，新的结果整体覆盖旧的
#[derive(Debug, Default)]
pub struct DocumentStore {
    slot: Mutex<Option<String>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self, content: impl Into<String>) {
        *self.lock() = Some(content.into());
    }

    pub fn current(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_slot_overwrite() {
        let store = DocumentStore::new();
        assert!(store.is_empty());

        store.store("primero");
        store.store("segundo");

        assert_eq!(store.current().as_deref(), Some("segundo"));
    }
}
