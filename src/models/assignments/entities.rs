use serde::{Deserialize, Serialize};

/// 无限制提交次数
pub const UNLIMITED_SUBMISSIONS: i32 = -1;

// 作业布置实体，把一个评测项目挂到一个单元上
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub unit_id: i64,
    pub project_id: i64,
    pub assigner_id: i64,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub max_submissions: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    pub fn allows_unlimited_submissions(&self) -> bool {
        self.max_submissions == UNLIMITED_SUBMISSIONS
    }
}
