use super::SeaOrmStorage;
use crate::entity::registrations::ActiveModel as RegistrationActiveModel;
use crate::entity::units::{ActiveModel, Entity as Units};
use crate::errors::{AutograderError, Result};
use crate::models::{registrations::entities::RegistrationRole, units::entities::Unit};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 创建单元
    ///
    /// 创建者在同一事务内被注册为该单元的教师。
    pub async fn create_unit_impl(&self, description: &str, creator_id: i64) -> Result<Unit> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AutograderError::database_operation(format!("开启事务失败: {e}")))?;

        let unit = ActiveModel {
            description: Set(description.to_string()),
            creator_id: Set(creator_id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AutograderError::database_operation(format!("创建单元失败: {e}")))?;

        RegistrationActiveModel {
            unit_id: Set(unit.id),
            user_id: Set(creator_id),
            role: Set(RegistrationRole::Teacher.to_string()),
            registered_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            AutograderError::database_operation(format!("注册单元创建者为教师失败: {e}"))
        })?;

        txn.commit()
            .await
            .map_err(|e| AutograderError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(unit.into_unit())
    }

    /// 通过 ID 获取单元
    pub async fn get_unit_by_id_impl(&self, id: i64) -> Result<Option<Unit>> {
        let result = Units::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AutograderError::database_operation(format!("查询单元失败: {e}")))?;

        Ok(result.map(|m| m.into_unit()))
    }
}
