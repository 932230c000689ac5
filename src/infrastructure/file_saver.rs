//! 文件保存 - 基础设施层
//!
//! 只负责把导出的二进制内容落到本地，不关心内容格式

use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::FileError;

/// 本地保存能力
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// 保存二进制内容，返回最终路径
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, FileError>;
}

/// 保存到下载目录
///
/// 先写入 `.part` 临时文件，再重命名为最终文件名。
/// 临时文件在任何失败路径上都会被删除。
#[derive(Debug, Clone)]
pub struct DiskFileSaver {
    dir: PathBuf,
}

impl DiskFileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileSaver for DiskFileSaver {
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, FileError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: self.dir.display().to_string(),
                source,
            })?;

        let safe_name = sanitize_filename(filename);
        let target = self.dir.join(&safe_name);
        let part = PartFile::new(self.dir.join(format!(".{}.part", safe_name)));

        let staged = async {
            fs::write(part.path(), bytes)
                .await
                .map_err(|source| FileError::WriteFailed {
                    path: part.path().display().to_string(),
                    source,
                })?;
            fs::rename(part.path(), &target)
                .await
                .map_err(|source| FileError::WriteFailed {
                    path: target.display().to_string(),
                    source,
                })?;
            Ok::<(), FileError>(())
        }
        .await;

        if let Err(e) = staged {
            part.discard().await;
            return Err(e);
        }
        part.keep();

        debug!("已保存文件: {} ({} 字节)", target.display(), bytes.len());
        Ok(target)
    }
}

/// `.part` 临时文件
///
/// 失败路径上由 `discard` 异步删除。
/// `save` 的 future 中途被丢弃时无法再 await，只能在 drop 里同步删除。
struct PartFile {
    path: PathBuf,
    settled: bool,
}

impl PartFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            settled: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// 已重命名为最终文件
    fn keep(mut self) {
        self.settled = true;
    }

    async fn discard(mut self) {
        self.settled = true;
        log_cleanup(&self.path, fs::remove_file(&self.path).await);
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        log_cleanup(&self.path, std::fs::remove_file(&self.path));
    }
}

fn log_cleanup(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!("已清理临时文件: {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("清理临时文件失败 {}: {}", path.display(), e),
    }
}

/// 把文件名中不能出现在文件系统里的字符替换为 `-`
pub fn sanitize_filename(name: &str) -> String {
    let mut cleaned = name.trim().to_string();
    if let Ok(re) = Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#) {
        cleaned = re.replace_all(&cleaned, "-").to_string();
    }
    if cleaned.is_empty() {
        "documento".to_string()
    } else {
        cleaned
    }
}
