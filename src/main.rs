use anyhow::Result;
use cv_agent_client::utils::logging;
use cv_agent_client::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（第一个参数可指定配置文件）
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cv_agent.toml".to_string());
    let config = Config::load(&config_path).await?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let stats = App::initialize(config).await?.run().await?;

    if stats.failed > 0 {
        tracing::warn!("⚠️ {} 个操作失败", stats.failed);
    }

    Ok(())
}
