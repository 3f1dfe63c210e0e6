use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use users_api::config::{self, Config, StorageBackend};
use users_api::infrastructure::{logger::Logger, memory::InMemoryUserStore};
use users_api::UserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load_config()?;

    // 文件日志的 guard 需要一直持有到进程退出
    let _log_guard = Logger::init(&config.logging)?;

    info!("启动 users API 服务器...");

    let store = build_store(&config).await?;
    let app = users_api::build_app(store, &config.http);

    let listener = TcpListener::bind(config.http.listen_addr()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 users API 服务器运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /users             - 获取所有用户");
    info!("   POST   /users             - 创建新用户");
    info!("   GET    /users/:id         - 获取特定用户");
    info!("   PUT    /users/:id         - 更新用户");
    info!("   DELETE /users/:id         - 删除用户");
    info!("   GET    /our-custom-route  - 自定义响应");
    info!("   GET    /random-user       - 随机用户");
    info!("   GET    /health            - 健康检查");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务器已停止");
    Ok(())
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn UserStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("使用内存存储");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
        StorageBackend::Postgres => connect_postgres(config).await,
    }
}

#[cfg(feature = "database")]
async fn connect_postgres(config: &Config) -> anyhow::Result<Arc<dyn UserStore>> {
    use users_api::infrastructure::database::PgUserStore;

    let url = config
        .storage
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("postgres 存储需要配置 database_url"))?;
    let store = PgUserStore::connect(url, &config.storage).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "database"))]
async fn connect_postgres(_config: &Config) -> anyhow::Result<Arc<dyn UserStore>> {
    anyhow::bail!("postgres 存储需要启用 `database` 特性重新编译")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("无法监听 Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("收到退出信号，正在关闭...");
}
