use serde::{Deserialize, Serialize};

// 课程单元实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub description: String,
    pub creator_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
