use serde::Deserialize;

// 评测机取回代码的查询参数
//
// 两个参数都是可选的，缺失时由处理器返回 400，而不是依赖框架的反序列化错误。
#[derive(Debug, Deserialize)]
pub struct WorkerCodeQuery {
    pub submission_key: Option<String>,
    pub token: Option<String>,
}

// 评测机回传结果的请求体
#[derive(Debug, Deserialize)]
pub struct WorkerResultsRequest {
    pub submission_key: String,
    pub token: String,
    pub results: serde_json::Value,
}
