use serde::{Deserialize, Serialize};

// 评测项目实体
//
// project_key 是评测机侧代码包的名字，对外不暴露项目名。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub runtime: String,
    pub project_key: String,
    pub creator_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
