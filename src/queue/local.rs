use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{AutograderError, Result};
use crate::queue::WorkerQueue;

/// 本地文件队列
///
/// 注册 = 把代码包拷进 payload 目录；投递 = 在任务目录写一张
/// JSON 任务单，由本机的评测进程轮询消费。
pub struct LocalQueue {
    payload_dir: PathBuf,
    task_dir: PathBuf,
    task_timeout: u64,
}

/// 落盘的任务单
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TaskTicket {
    pub project_key: String,
    pub submission_key: String,
    pub token: String,
    pub timeout: u64,
}

impl LocalQueue {
    pub fn new() -> Result<Self> {
        let config = AppConfig::get();
        Self::with_dirs(
            &config.queue.local.payload_dir,
            &config.queue.local.task_dir,
            config.queue.task_timeout,
        )
    }

    pub fn with_dirs(payload_dir: &str, task_dir: &str, task_timeout: u64) -> Result<Self> {
        std::fs::create_dir_all(payload_dir)?;
        std::fs::create_dir_all(task_dir)?;
        Ok(Self {
            payload_dir: PathBuf::from(payload_dir),
            task_dir: PathBuf::from(task_dir),
            task_timeout,
        })
    }
}

#[async_trait]
impl WorkerQueue for LocalQueue {
    async fn register_worker(
        &self,
        bundle: &Path,
        project_key: &str,
        _executable: &str,
        _runtime: &str,
    ) -> Result<()> {
        let dest = self.payload_dir.join(format!("{project_key}.zip"));
        tokio::fs::copy(bundle, &dest).await.map_err(|e| {
            AutograderError::queue_delivery(format!(
                "拷贝代码包到 {} 失败: {e}",
                dest.display()
            ))
        })?;

        debug!("Registered local worker bundle: {}", dest.display());
        Ok(())
    }

    async fn enqueue(&self, project_key: &str, submission_key: &str, token: &str) -> Result<()> {
        let ticket = TaskTicket {
            project_key: project_key.to_string(),
            submission_key: submission_key.to_string(),
            token: token.to_string(),
            timeout: self.task_timeout,
        };

        let dest = self.task_dir.join(format!("{submission_key}.json"));
        let raw = serde_json::to_vec_pretty(&ticket)?;
        tokio::fs::write(&dest, raw).await.map_err(|e| {
            AutograderError::queue_delivery(format!("写入任务单 {} 失败: {e}", dest.display()))
        })?;

        debug!("Enqueued local task: {}", dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_worker_copies_bundle() {
        let src = tempfile::tempdir().unwrap();
        let bundle = src.path().join("bundle.zip");
        std::fs::write(&bundle, b"PK\x03\x04fake").unwrap();

        let dirs = tempfile::tempdir().unwrap();
        let payload_dir = dirs.path().join("payloads");
        let task_dir = dirs.path().join("tasks");
        let queue = LocalQueue::with_dirs(
            payload_dir.to_str().unwrap(),
            task_dir.to_str().unwrap(),
            60,
        )
        .unwrap();

        queue
            .register_worker(&bundle, "key-1", "run.sh", "python")
            .await
            .unwrap();

        let copied = payload_dir.join("key-1.zip");
        assert_eq!(std::fs::read(&copied).unwrap(), b"PK\x03\x04fake");
    }

    #[tokio::test]
    async fn test_enqueue_writes_ticket() {
        let dirs = tempfile::tempdir().unwrap();
        let payload_dir = dirs.path().join("payloads");
        let task_dir = dirs.path().join("tasks");
        let queue = LocalQueue::with_dirs(
            payload_dir.to_str().unwrap(),
            task_dir.to_str().unwrap(),
            60,
        )
        .unwrap();

        queue.enqueue("proj-key", "sub-key", "tok").await.unwrap();

        let raw = std::fs::read(task_dir.join("sub-key.json")).unwrap();
        let ticket: TaskTicket = serde_json::from_slice(&raw).unwrap();
        assert_eq!(ticket.project_key, "proj-key");
        assert_eq!(ticket.submission_key, "sub-key");
        assert_eq!(ticket.token, "tok");
        assert_eq!(ticket.timeout, 60);
    }
}
