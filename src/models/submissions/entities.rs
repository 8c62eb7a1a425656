use serde::{Deserialize, Serialize};

// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub submission_key: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub token_hash: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub results: Option<serde_json::Value>,
    pub results_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Submission {
    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }
}

// 新建提交 + 一次性评测令牌
//
// 明文令牌只在这里出现一次，随队列任务发给评测机，库里只存哈希。
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub submission: Submission,
    pub token: String,
}
