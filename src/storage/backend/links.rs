//! LinkStore implementation for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, sea_query::Expr};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{model_to_shortlink, shortlink_to_active_model};
use super::retry;
use crate::errors::{AppError, Result};
use crate::storage::{LinkStore, ShortLink};

use migration::entities::{short_link, user};

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn insert_link(&self, link: &ShortLink) -> Result<()> {
        let db = &self.db;
        let model = shortlink_to_active_model(link);

        // 主键冲突不重试，直接映射为 DuplicateCode
        retry::with_retry(
            &format!("insert_link({})", link.code),
            self.retry_config,
            || async {
                short_link::Entity::insert(model.clone())
                    .exec_without_returning(db)
                    .await
            },
        )
        .await
        .map_err(|e| {
            if retry::is_unique_violation(&e) {
                AppError::duplicate_code(&link.code)
            } else {
                AppError::from(e)
            }
        })?;

        debug!("Short link inserted: {}", link.code);
        Ok(())
    }

    async fn find_link(&self, code: &str) -> Result<Option<ShortLink>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("find_link({})", code), self.retry_config, || async {
            short_link::Entity::find_by_id(code.to_string()).one(db).await
        })
        .await?;

        Ok(model.map(model_to_shortlink))
    }

    async fn link_owner(&self, username: &str, code: &str) -> Result<()> {
        let db = &self.db;

        let user_exists = retry::with_retry("link_owner(user)", self.retry_config, || async {
            user::Entity::find_by_id(username.to_string()).one(db).await
        })
        .await?
        .is_some();
        if !user_exists {
            return Err(AppError::database_operation(format!(
                "cannot link {} to unknown user {}",
                code, username
            )));
        }

        // 只更新无主链接，保证所有权一旦建立不再改变
        let result = retry::with_retry(&format!("link_owner({})", code), self.retry_config, || async {
            short_link::Entity::update_many()
                .col_expr(short_link::Column::Owner, Expr::value(username))
                .filter(short_link::Column::ShortCode.eq(code))
                .filter(short_link::Column::Owner.is_null())
                .exec(db)
                .await
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(AppError::database_operation(format!(
                "short code {} is missing or already owned",
                code
            )));
        }
        Ok(())
    }

    async fn delete_link(&self, code: &str) -> Result<()> {
        let db = &self.db;

        let result = retry::with_retry(&format!("delete_link({})", code), self.retry_config, || async {
            short_link::Entity::delete_by_id(code.to_string()).exec(db).await
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(format!("Short code not found: {}", code)));
        }

        info!("Short link deleted: {}", code);
        Ok(())
    }

    async fn list_owned(&self, username: &str) -> Result<Vec<ShortLink>> {
        let db = &self.db;

        let models = retry::with_retry("list_owned", self.retry_config, || async {
            short_link::Entity::find()
                .filter(short_link::Column::Owner.eq(username))
                .order_by_desc(short_link::Column::CreatedAt)
                .order_by_asc(short_link::Column::ShortCode)
                .all(db)
                .await
        })
        .await?;

        Ok(models.into_iter().map(model_to_shortlink).collect())
    }

    async fn is_owner(&self, username: &str, code: &str) -> Result<bool> {
        let db = &self.db;

        let model = retry::with_retry(&format!("is_owner({})", code), self.retry_config, || async {
            short_link::Entity::find_by_id(code.to_string())
                .filter(short_link::Column::Owner.eq(username))
                .one(db)
                .await
        })
        .await?;

        Ok(model.is_some())
    }
}
