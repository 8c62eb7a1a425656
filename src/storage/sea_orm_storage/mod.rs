//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 领域约束（教师布置、注册提交、提交上限）在这一层强制，
//! CLI 和 HTTP 共用同一套规则。

mod assignments;
mod projects;
mod registrations;
mod submissions;
mod units;
mod users;

use crate::config::AppConfig;
use crate::errors::{AutograderError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AutograderError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 基于已建好的连接构造（调用方自己负责迁移）
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 重建数据库（drop 全部表后重新迁移）
    pub async fn reset_database(&self) -> Result<()> {
        Migrator::fresh(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("数据库重建失败: {e}")))?;
        Ok(())
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AutograderError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AutograderError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AutograderError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AutograderError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn list_users_with_pagination(
        &self,
        query: PaginationQuery,
    ) -> Result<PaginatedResponse<User>> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 单元与注册模块
    async fn create_unit(&self, description: &str, creator_id: i64) -> Result<Unit> {
        self.create_unit_impl(description, creator_id).await
    }

    async fn get_unit_by_id(&self, id: i64) -> Result<Option<Unit>> {
        self.get_unit_by_id_impl(id).await
    }

    async fn register_user(
        &self,
        unit_id: i64,
        user_id: i64,
        role: RegistrationRole,
    ) -> Result<Registration> {
        self.register_user_impl(unit_id, user_id, role).await
    }

    async fn get_registration(&self, unit_id: i64, user_id: i64) -> Result<Option<Registration>> {
        self.get_registration_impl(unit_id, user_id).await
    }

    async fn list_registrations_for_user(&self, user_id: i64) -> Result<Vec<Registration>> {
        self.list_registrations_for_user_impl(user_id).await
    }

    // 项目模块
    async fn create_project(
        &self,
        name: &str,
        runtime: &str,
        project_key: &str,
        creator_id: i64,
    ) -> Result<Project> {
        self.create_project_impl(name, runtime, project_key, creator_id)
            .await
    }

    async fn get_project_by_id(&self, id: i64) -> Result<Option<Project>> {
        self.get_project_by_id_impl(id).await
    }

    async fn get_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        self.get_project_by_name_impl(name).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.list_projects_impl().await
    }

    // 作业布置模块
    async fn create_assignment(
        &self,
        unit_id: i64,
        project_id: i64,
        assigner_id: i64,
        due_date: Option<DateTime<Utc>>,
        max_submissions: i32,
    ) -> Result<Assignment> {
        self.create_assignment_impl(unit_id, project_id, assigner_id, due_date, max_submissions)
            .await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_for_project(&self, project_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_for_project_impl(project_id).await
    }

    // 提交模块
    async fn create_submission(&self, assignment_id: i64, user_id: i64) -> Result<NewSubmission> {
        self.create_submission_impl(assignment_id, user_id).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_key(&self, submission_key: &str) -> Result<Option<Submission>> {
        self.get_submission_by_key_impl(submission_key).await
    }

    async fn list_submissions_for_user(
        &self,
        user_id: i64,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<Submission>> {
        self.list_submissions_for_user_impl(user_id, query).await
    }

    async fn post_results(
        &self,
        submission_key: &str,
        results: serde_json::Value,
    ) -> Result<Submission> {
        self.post_results_impl(submission_key, results).await
    }
}
