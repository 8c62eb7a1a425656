//! 评测队列适配层
//!
//! 提交归档落盘后，通过这里把任务送到评测机：
//! - `local`: 文件拷贝 + JSON 任务单，给轮询式的本机评测进程
//! - `hosted`: 托管评测服务的瘦 HTTP 客户端
//!
//! 任务载荷固定为 `{submission_key, token}`，评测机凭它回调取码/交卷。

pub mod hosted;
pub mod local;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::AppConfig;
use crate::errors::{AutograderError, Result};

pub use hosted::HostedQueue;
pub use local::LocalQueue;

/// 发给评测机的任务载荷
#[derive(Debug, Serialize)]
pub struct TaskPayload<'a> {
    pub submission_key: &'a str,
    pub token: &'a str,
}

#[async_trait::async_trait]
pub trait WorkerQueue: Send + Sync {
    /// 注册评测机代码包，`project_key` 作为评测机侧的名字
    async fn register_worker(
        &self,
        bundle: &Path,
        project_key: &str,
        executable: &str,
        runtime: &str,
    ) -> Result<()>;

    /// 投递一次提交的评测任务
    async fn enqueue(&self, project_key: &str, submission_key: &str, token: &str) -> Result<()>;
}

/// 按配置选择队列后端
pub fn create_queue() -> Result<Arc<dyn WorkerQueue>> {
    let config = AppConfig::get();
    match config.queue.backend.as_str() {
        "local" => Ok(Arc::new(LocalQueue::new()?)),
        "hosted" => Ok(Arc::new(HostedQueue::new()?)),
        other => Err(AutograderError::queue_plugin_not_found(format!(
            "未知的队列后端: {other}. 支持: local, hosted"
        ))),
    }
}
