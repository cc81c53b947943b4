//! CredentialStore implementation for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{account_to_active_model, model_to_account};
use super::retry;
use crate::errors::{AppError, Result};
use crate::storage::{CredentialStore, UserAccount};

use migration::entities::{short_link, user};

#[async_trait]
impl CredentialStore for SeaOrmStorage {
    async fn insert_user(&self, account: &UserAccount) -> Result<()> {
        let db = &self.db;
        let model = account_to_active_model(account);

        retry::with_retry("insert_user", self.retry_config, || async {
            user::Entity::insert(model.clone())
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| {
            if retry::is_unique_violation(&e) {
                AppError::duplicate_user(&account.username)
            } else {
                AppError::from(e)
            }
        })?;

        info!("User registered: {}", account.username);
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserAccount>> {
        let db = &self.db;

        let model = retry::with_retry("find_user", self.retry_config, || async {
            user::Entity::find_by_id(username.to_string()).one(db).await
        })
        .await?;

        Ok(model.map(model_to_account))
    }

    async fn delete_user(&self, username: &str) -> Result<()> {
        // 外键已声明 ON DELETE CASCADE，这里仍显式删除，
        // 未开启外键约束的连接也能得到同样结果
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::database_operation(format!("开始事务失败: {}", e)))?;

        let links = short_link::Entity::delete_many()
            .filter(short_link::Column::Owner.eq(username))
            .exec(&txn)
            .await?;

        user::Entity::delete_by_id(username.to_string())
            .exec(&txn)
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::database_operation(format!("提交事务失败: {}", e)))?;

        info!(
            "User {} deleted together with {} owned links",
            username, links.rows_affected
        );
        Ok(())
    }
}
