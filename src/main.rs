use anyhow::Result;
use docentia_client::utils::logging;
use docentia_client::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志（开发环境下输出请求地址和请求体）
    logging::init(config.verbose_logging || config.is_development());

    // 初始化并运行应用
    let stats = App::initialize(config).await?.run().await?;

    if stats.failed > 0 {
        anyhow::bail!("{} 个表单处理失败", stats.failed);
    }

    Ok(())
}
