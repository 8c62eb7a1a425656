use super::SeaOrmStorage;
use crate::entity::projects::{ActiveModel, Column, Entity as Projects};
use crate::errors::{AutograderError, Result};
use crate::models::projects::entities::Project;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建项目
    pub async fn create_project_impl(
        &self,
        name: &str,
        runtime: &str,
        project_key: &str,
        creator_id: i64,
    ) -> Result<Project> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            runtime: Set(runtime.to_string()),
            project_key: Set(project_key.to_string()),
            creator_id: Set(creator_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("创建项目失败: {e}")))?;

        Ok(result.into_project())
    }

    /// 通过 ID 获取项目
    pub async fn get_project_by_id_impl(&self, id: i64) -> Result<Option<Project>> {
        let result = Projects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询项目失败: {e}")))?;

        Ok(result.map(|m| m.into_project()))
    }

    /// 通过名称获取项目
    pub async fn get_project_by_name_impl(&self, name: &str) -> Result<Option<Project>> {
        let result = Projects::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询项目失败: {e}")))?;

        Ok(result.map(|m| m.into_project()))
    }

    /// 列出全部项目
    pub async fn list_projects_impl(&self) -> Result<Vec<Project>> {
        let result = Projects::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询项目列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_project()).collect())
    }
}
