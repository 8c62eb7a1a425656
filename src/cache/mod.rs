//! 会话缓存
//!
//! access token -> 用户 的内存缓存（moka），认证中间件用它省掉
//! 每个请求一次的用户查询。TTL 与容量来自配置。

use moka::future::Cache;
use tracing::debug;

use crate::config::AppConfig;
use crate::models::users::entities::User;

#[derive(Clone)]
pub struct SessionCache {
    inner: Cache<String, User>,
}

impl SessionCache {
    pub fn new() -> Self {
        let config = AppConfig::get();
        let inner = Cache::builder()
            .max_capacity(config.cache.max_capacity)
            .time_to_live(std::time::Duration::from_secs(config.cache.default_ttl))
            .build();

        debug!(
            "SessionCache initialized with max capacity: {}",
            config.cache.max_capacity
        );
        Self { inner }
    }

    pub async fn get(&self, token: &str) -> Option<User> {
        self.inner.get(token).await
    }

    pub async fn insert(&self, token: String, user: User) {
        self.inner.insert(token, user).await;
    }

    pub async fn remove(&self, token: &str) {
        self.inner.invalidate(token).await;
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            password_hash: String::new(),
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_remove_invalidates_session() {
        AppConfig::init(Some("config.example.yaml")).ok();
        let cache = SessionCache::new();

        cache.insert("token-a".to_string(), sample_user()).await;
        assert!(cache.get("token-a").await.is_some());

        // 登出后缓存条目必须立即失效
        cache.remove("token-a").await;
        assert!(cache.get("token-a").await.is_none());
    }
}
