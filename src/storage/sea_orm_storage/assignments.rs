use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::projects::Entity as Projects;
use crate::errors::{AutograderError, Result};
use crate::models::assignments::entities::Assignment;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 布置作业
    ///
    /// 布置者必须持有该单元的教师注册，否则拒绝。
    /// 未指定截止时间时默认一年后。
    pub async fn create_assignment_impl(
        &self,
        unit_id: i64,
        project_id: i64,
        assigner_id: i64,
        due_date: Option<DateTime<Utc>>,
        max_submissions: i32,
    ) -> Result<Assignment> {
        let registration = self.get_registration_impl(unit_id, assigner_id).await?;
        match registration {
            Some(reg) if reg.is_teacher() => {}
            _ => {
                return Err(AutograderError::authorization(format!(
                    "用户 {assigner_id} 不是单元 {unit_id} 的教师，不能布置作业"
                )));
            }
        }

        if Projects::find_by_id(project_id)
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询项目失败: {e}")))?
            .is_none()
        {
            return Err(AutograderError::not_found(format!(
                "项目 {project_id} 不存在"
            )));
        }

        let now = Utc::now();
        let due = due_date.unwrap_or(now + Duration::days(365));

        let model = ActiveModel {
            unit_id: Set(unit_id),
            project_id: Set(project_id),
            assigner_id: Set(assigner_id),
            due_date: Set(due.timestamp()),
            max_submissions: Set(max_submissions),
            created_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("布置作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业布置
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询作业布置失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出某项目的全部作业布置
    pub async fn list_assignments_for_project_impl(
        &self,
        project_id: i64,
    ) -> Result<Vec<Assignment>> {
        let result = Assignments::find()
            .filter(Column::ProjectId.eq(project_id))
            .all(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询作业布置失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }
}
