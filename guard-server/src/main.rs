use guard_server::{Config, GuardState, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境与日志
    dotenv::dotenv().ok();
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        config.log_dir().to_str(),
    )?;

    tracing::info!("Guard server starting...");

    // 2. 初始化状态（数据库 + 共享组件）
    let state = GuardState::initialize(&config).await?;

    // 3. 启动 HTTP 服务器（含审批过期清理任务）
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
