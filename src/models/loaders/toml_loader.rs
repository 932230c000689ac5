use crate::models::submission::Submission;
use crate::models::taxonomy::Taxonomy;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载一次表单填写
pub async fn load_submission(toml_file_path: &Path) -> Result<Submission> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let submission: Submission = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(submission.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 从文件夹中加载所有表单填写，按文件名排序
pub async fn load_all_submissions(folder_path: &str) -> Result<Vec<Submission>> {
    let mut submissions = Vec::new();

    for path in list_toml_files(folder_path).await? {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_submission(&path).await {
            Ok(submission) => {
                tracing::info!(
                    "成功加载 [{}]，共 {} 个字段",
                    submission.variant,
                    submission.fields.len()
                );
                submissions.push(submission);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(submissions)
}

/// 从 TOML 文件加载分类表（加载时校验）
pub async fn load_taxonomy(toml_file_path: &Path) -> Result<Taxonomy> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取分类表: {}", toml_file_path.display()))?;

    let taxonomy = Taxonomy::from_toml_str(&content)
        .with_context(|| format!("分类表校验失败: {}", toml_file_path.display()))?;

    tracing::info!(
        "已加载分类表 {} ({} 个学段)",
        taxonomy.name(),
        taxonomy.levels().len()
    );

    Ok(taxonomy)
}

async fn list_toml_files(folder_path: &str) -> Result<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }

    toml_files.sort();
    Ok(toml_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_all_submissions_skips_broken_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("01_emergencia.toml"),
            "variant = \"emergencia\"\n[[fields]]\nid = \"nivel\"\nvalue = \"ESO\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("02_roto.toml"), "variant = ").unwrap();
        std::fs::write(dir.path().join("notas.txt"), "ignorado").unwrap();

        let submissions = load_all_submissions(dir.path().to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(submissions.len(), 1);
        assert!(submissions[0]
            .file_path
            .as_deref()
            .unwrap()
            .ends_with("01_emergencia.toml"));
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        assert!(load_all_submissions("/no/existe/docentia").await.is_err());
    }

    #[tokio::test]
    async fn test_load_taxonomy_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fp.toml");
        std::fs::write(
            &path,
            "name = \"fp\"\n[[levels]]\nname = \"FP Básica\"\n[[levels.grades]]\nname = \"1º\"\nlabels = [\"Ciencias Aplicadas I\"]\n",
        )
        .unwrap();

        let taxonomy = load_taxonomy(&path).await.unwrap();
        assert_eq!(
            taxonomy.children(&["FP Básica", "1º"]).unwrap(),
            vec!["Ciencias Aplicadas I"]
        );
    }
}
