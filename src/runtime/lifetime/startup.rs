use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::SessionCache;
use crate::config::AppConfig;
use crate::models::users::requests::CreateUserRequest;
use crate::queue::{WorkerQueue, create_queue};
use crate::storage::Storage;
use crate::utils::archive::ensure_dir;
use crate::utils::password::hash_password;
use crate::utils::token::random_token;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: SessionCache,
    pub queue: Arc<dyn WorkerQueue>,
}

/// 初始化默认管理员账号
/// 如果数据库中没有任何用户，则创建一个默认的 admin 账号
async fn seed_admin(storage: &Arc<dyn Storage>) {
    // 检查是否已有用户
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = random_token(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    // 哈希密码
    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    // 创建管理员账号
    let admin_request = CreateUserRequest {
        username: "admin".to_string(),
        password: password_hash,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 确保归档与暂存目录存在
fn prepare_directories() {
    let config = AppConfig::get();
    for dir in [
        &config.submissions.submissions_dir,
        &config.submissions.holding_dir,
    ] {
        if let Err(e) = ensure_dir(dir) {
            warn!("Failed to create directory {}: {}", dir, e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、会话缓存和评测队列
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    seed_admin(&storage).await;

    prepare_directories();

    // 创建评测队列
    let queue = create_queue().expect("Failed to create worker queue");
    warn!(
        "Worker queue backend '{}' initialized",
        AppConfig::get().queue.backend
    );

    // 创建会话缓存
    let cache = SessionCache::new();
    warn!("Session cache initialized");

    StartupContext {
        storage,
        cache,
        queue,
    }
}
