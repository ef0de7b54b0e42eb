use petal_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 日志)
    dotenv::dotenv().ok();

    let config = Config::from_env();

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir).ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    if config.is_production() {
        init_logger_with_file(log_level.as_deref(), Some(&log_dir));
    } else {
        init_logger_with_file(log_level.as_deref(), None);
    }

    // 打印横幅
    print_banner();

    tracing::info!("🌸 Petal Server starting...");

    // 2. 初始化服务器状态
    let state = ServerState::initialize(&config).await;

    // 3. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
