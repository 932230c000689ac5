/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时默认 `info`，开启详细日志时为 `debug`。
/// 重复调用不会报错（测试中会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 教学内容生成客户端");
    if config.is_development() {
        info!("🛠️ 开发环境 ({})，输出请求地址和请求体", config.app_host);
    } else {
        info!("☁️ 生产环境 ({})", config.app_host);
    }
    info!("🌐 后端地址: {}", config.api_base_url);
    info!(
        "⏱️ 请求超时: {}s / 提示时长: {}ms",
        config.request_timeout_secs, config.alert_duration_ms
    );
    info!("📁 表单目录: {}", config.submissions_folder);
    info!("💾 下载目录: {}", config.download_dir);
    info!("{}", "=".repeat(60));
}

/// 记录表单加载信息
pub fn log_submissions_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待提交的表单", total);
    info!("📋 最多同时提交 {} 个\n", max_concurrent);
}

/// 记录单个表单开始处理
pub fn log_submission_start(index: usize, total: usize, name: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📄 [{}/{}] {}", index, total, name);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(success: usize, exported: usize, failed: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 生成成功: {}/{}", success, total);
    info!("📄 已导出: {}", exported);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("Matemáticas", 4), "Mate...");
        assert_eq!(truncate_text("Hola", 4), "Hola");
        assert_eq!(truncate_text("", 10), "");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
