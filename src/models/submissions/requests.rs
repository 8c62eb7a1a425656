use serde::Deserialize;

use crate::models::PaginationQuery;

// 提交列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionListQuery {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    // 只看某一次作业布置下的提交
    pub assignment_id: Option<i64>,
}
