use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::json;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{AutograderError, Result};
use crate::queue::{TaskPayload, WorkerQueue};

/// 托管评测服务客户端
///
/// 注册 = multipart 上传代码包；投递 = 按 code_name 下发任务。
/// 无重试，失败直接上抛。
pub struct HostedQueue {
    client: reqwest::Client,
    host: String,
    project_id: String,
    token: String,
    task_timeout: u64,
}

impl HostedQueue {
    pub fn new() -> Result<Self> {
        let config = AppConfig::get();
        if config.queue.hosted.host.is_empty() {
            return Err(AutograderError::queue_delivery(
                "托管队列未配置 host".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.queue.task_timeout))
            .build()?;

        Ok(Self {
            client,
            host: config.queue.hosted.host.trim_end_matches('/').to_string(),
            project_id: config.queue.hosted.project_id.clone(),
            token: config.queue.hosted.token.clone(),
            task_timeout: config.queue.task_timeout,
        })
    }

    fn codes_url(&self) -> String {
        format!("{}/2/projects/{}/codes", self.host, self.project_id)
    }

    fn tasks_url(&self) -> String {
        format!("{}/2/projects/{}/tasks", self.host, self.project_id)
    }
}

#[async_trait]
impl WorkerQueue for HostedQueue {
    async fn register_worker(
        &self,
        bundle: &Path,
        project_key: &str,
        executable: &str,
        runtime: &str,
    ) -> Result<()> {
        let bytes = tokio::fs::read(bundle).await?;

        let data = json!({
            "name": project_key,
            "runtime": runtime,
            "command": executable,
        });

        let form = multipart::Form::new()
            .text("data", data.to_string())
            .part(
                "file",
                multipart::Part::bytes(bytes)
                    .file_name(format!("{project_key}.zip"))
                    .mime_str("application/zip")
                    .map_err(|e| AutograderError::queue_delivery(format!("构造上传请求失败: {e}")))?,
            );

        let response = self
            .client
            .post(self.codes_url())
            .header("Authorization", format!("OAuth {}", self.token))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AutograderError::queue_delivery(format!(
                "注册评测机失败: HTTP {}",
                response.status()
            )));
        }

        debug!("Registered hosted worker: {}", project_key);
        Ok(())
    }

    async fn enqueue(&self, project_key: &str, submission_key: &str, token: &str) -> Result<()> {
        let payload = serde_json::to_string(&TaskPayload {
            submission_key,
            token,
        })?;

        let body = json!({
            "tasks": [{
                "code_name": project_key,
                "payload": payload,
                "timeout": self.task_timeout,
            }]
        });

        let response = self
            .client
            .post(self.tasks_url())
            .header("Authorization", format!("OAuth {}", self.token))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AutograderError::queue_delivery(format!(
                "投递评测任务失败: HTTP {}",
                response.status()
            )));
        }

        debug!("Enqueued hosted task for submission: {}", submission_key);
        Ok(())
    }
}
