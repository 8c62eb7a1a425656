use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{AutograderError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    submissions::{
        entities::{NewSubmission, Submission},
        requests::SubmissionListQuery,
    },
};
use crate::utils::password::hash_password;
use crate::utils::token::submission_token;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// 提交者必须注册在作业所属单元内；达到提交上限后拒绝。
    /// 返回提交记录和一次性明文令牌，明文不落库。
    pub async fn create_submission_impl(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<NewSubmission> {
        let assignment = self
            .get_assignment_by_id_impl(assignment_id)
            .await?
            .ok_or_else(|| {
                AutograderError::not_found(format!("作业布置 {assignment_id} 不存在"))
            })?;

        if self
            .get_registration_impl(assignment.unit_id, user_id)
            .await?
            .is_none()
        {
            return Err(AutograderError::authorization(format!(
                "用户 {user_id} 未注册在单元 {} 内，不能提交该作业",
                assignment.unit_id
            )));
        }

        if !assignment.allows_unlimited_submissions() {
            let used = Submissions::find()
                .filter(Column::AssignmentId.eq(assignment_id))
                .filter(Column::UserId.eq(user_id))
                .count(&self.db)
                .await
                .map_err(|e| {
                    AutograderError::database_operation(format!("统计提交次数失败: {e}"))
                })?;

            if used >= assignment.max_submissions as u64 {
                return Err(AutograderError::validation(format!(
                    "作业布置 {assignment_id} 的提交次数已达上限 {}",
                    assignment.max_submissions
                )));
            }
        }

        let submission_key = Uuid::new_v4().to_string();
        let token = submission_token();
        let token_hash = hash_password(&token)?;

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            user_id: Set(user_id),
            submission_key: Set(submission_key),
            token_hash: Set(token_hash),
            submitted_at: Set(chrono::Utc::now().timestamp()),
            results: Set(None),
            results_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(NewSubmission {
            submission: result.into_submission(),
            token,
        })
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 通过提交键获取提交
    pub async fn get_submission_by_key_impl(
        &self,
        submission_key: &str,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::SubmissionKey.eq(submission_key))
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出某用户的提交
    pub async fn list_submissions_for_user_impl(
        &self,
        user_id: i64,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<Submission>> {
        let page = query.pagination.page.max(1) as u64;
        let size = query.pagination.size.clamp(1, 100) as u64;

        let mut select = Submissions::find().filter(Column::UserId.eq(user_id));

        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }

        select = select.order_by_desc(Column::SubmittedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询提交总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询提交页数失败: {e}")))?;
        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: submissions
                .into_iter()
                .map(|m| m.into_submission())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 回写评测结果
    ///
    /// 结果以 JSON 文本原样保存，重复回写覆盖旧值。
    pub async fn post_results_impl(
        &self,
        submission_key: &str,
        results: serde_json::Value,
    ) -> Result<Submission> {
        let existing = Submissions::find()
            .filter(Column::SubmissionKey.eq(submission_key))
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| {
                AutograderError::not_found(format!("提交 {submission_key} 不存在"))
            })?;

        let raw = serde_json::to_string(&results)?;

        let mut model: ActiveModel = existing.into();
        model.results = Set(Some(raw));
        model.results_at = Set(Some(chrono::Utc::now().timestamp()));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("写入评测结果失败: {e}")))?;

        Ok(updated.into_submission())
    }
}
