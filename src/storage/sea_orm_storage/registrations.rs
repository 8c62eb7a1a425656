use super::SeaOrmStorage;
use crate::entity::registrations::{ActiveModel, Column, Entity as Registrations};
use crate::entity::units::Entity as Units;
use crate::entity::users::Entity as Users;
use crate::errors::{AutograderError, Result};
use crate::models::registrations::entities::{Registration, RegistrationRole};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 把用户注册进单元
    pub async fn register_user_impl(
        &self,
        unit_id: i64,
        user_id: i64,
        role: RegistrationRole,
    ) -> Result<Registration> {
        // 先确认两端都存在，给出比外键错误友好的提示
        if Units::find_by_id(unit_id)
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询单元失败: {e}")))?
            .is_none()
        {
            return Err(AutograderError::not_found(format!("单元 {unit_id} 不存在")));
        }
        if Users::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询用户失败: {e}")))?
            .is_none()
        {
            return Err(AutograderError::not_found(format!("用户 {user_id} 不存在")));
        }

        let model = ActiveModel {
            unit_id: Set(unit_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            registered_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        // (unit_id, user_id) 唯一索引兜底重复注册
        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("创建注册记录失败: {e}")))?;

        Ok(result.into_registration())
    }

    /// 获取用户在单元内的注册记录
    pub async fn get_registration_impl(
        &self,
        unit_id: i64,
        user_id: i64,
    ) -> Result<Option<Registration>> {
        let result = Registrations::find()
            .filter(Column::UnitId.eq(unit_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询注册记录失败: {e}")))?;

        Ok(result.map(|m| m.into_registration()))
    }

    /// 列出用户的全部注册记录
    pub async fn list_registrations_for_user_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<Registration>> {
        let result = Registrations::find()
            .filter(Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询注册记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_registration()).collect())
    }
}
