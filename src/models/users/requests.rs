use serde::Deserialize;

// 用户创建请求
//
// password 字段在进入存储层之前必须已经完成哈希。
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}
