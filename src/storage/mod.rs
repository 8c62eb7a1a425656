use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    PaginatedResponse, PaginationQuery,
    assignments::entities::Assignment,
    projects::entities::Project,
    registrations::entities::{Registration, RegistrationRole},
    submissions::{
        entities::{NewSubmission, Submission},
        requests::SubmissionListQuery,
    },
    units::entities::Unit,
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段必须已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 单元与注册管理方法
    // 创建单元，同一事务内把创建者注册为该单元的教师
    async fn create_unit(&self, description: &str, creator_id: i64) -> Result<Unit>;
    // 通过ID获取单元信息
    async fn get_unit_by_id(&self, id: i64) -> Result<Option<Unit>>;
    // 把用户注册进单元
    async fn register_user(
        &self,
        unit_id: i64,
        user_id: i64,
        role: RegistrationRole,
    ) -> Result<Registration>;
    // 获取用户在单元内的注册记录
    async fn get_registration(&self, unit_id: i64, user_id: i64) -> Result<Option<Registration>>;
    // 列出用户的全部注册记录
    async fn list_registrations_for_user(&self, user_id: i64) -> Result<Vec<Registration>>;

    /// 评测项目管理方法
    // 创建项目
    async fn create_project(
        &self,
        name: &str,
        runtime: &str,
        project_key: &str,
        creator_id: i64,
    ) -> Result<Project>;
    // 通过ID获取项目信息
    async fn get_project_by_id(&self, id: i64) -> Result<Option<Project>>;
    // 通过名称获取项目信息
    async fn get_project_by_name(&self, name: &str) -> Result<Option<Project>>;
    // 列出全部项目
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// 作业布置管理方法
    // 布置作业，布置者必须是该单元的教师
    async fn create_assignment(
        &self,
        unit_id: i64,
        project_id: i64,
        assigner_id: i64,
        due_date: Option<DateTime<Utc>>,
        max_submissions: i32,
    ) -> Result<Assignment>;
    // 通过ID获取作业布置
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 列出某项目的全部作业布置
    async fn list_assignments_for_project(&self, project_id: i64) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    // 创建提交，返回提交记录和一次性明文令牌
    async fn create_submission(&self, assignment_id: i64, user_id: i64) -> Result<NewSubmission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 通过提交键获取提交
    async fn get_submission_by_key(&self, submission_key: &str) -> Result<Option<Submission>>;
    // 列出某用户的提交
    async fn list_submissions_for_user(
        &self,
        user_id: i64,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<Submission>>;
    // 回写评测结果（重复回写以最后一次为准）
    async fn post_results(
        &self,
        submission_key: &str,
        results: serde_json::Value,
    ) -> Result<Submission>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
