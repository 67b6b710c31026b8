//! 统一的应用状态。

use anyhow::Context;
use sea_orm::DatabaseConnection;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::repository::UserRepository;

/// 统一的应用状态，包含所有请求共享的数据。
pub struct AppState {
    /// 数据库连接池。
    pub db: DatabaseConnection,
    /// 启动时加载的配置。
    pub config: ServerConfig,
    /// 首次安装密钥；第一个管理员创建后清空。
    setup_key: RwLock<Option<String>>,
}

impl AppState {
    /// 创建应用状态。数据库中没有任何用户时开放首次安装。
    pub async fn new(db: DatabaseConnection, config: ServerConfig) -> anyhow::Result<Self> {
        let users = UserRepository::new(&db)
            .count()
            .await
            .context("failed to count users")?;

        let setup_key = if users == 0 {
            let key = config
                .setup_key
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
            warn!(setup_key = %key, "no users exist, first-run setup is open");
            Some(key)
        } else {
            info!(users, "existing users found, first-run setup disabled");
            None
        };

        Ok(Self {
            db,
            config,
            setup_key: RwLock::new(setup_key),
        })
    }

    pub async fn setup_open(&self) -> bool {
        self.setup_key.read().await.is_some()
    }

    /// 独占首次安装密钥。持有期间其他安装请求会等待，
    /// 调用方在管理员创建成功后将其置为 `None`。
    pub async fn lock_setup(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.setup_key.write().await
    }
}
