use crate::storage::{ShortLink, UserAccount};
use migration::entities::{short_link, user};

/// 将 Sea-ORM Model 转换为 ShortLink（丢弃 owner 列）
pub fn model_to_shortlink(model: short_link::Model) -> ShortLink {
    ShortLink {
        code: model.short_code,
        target: model.target_url,
        created_at: model.created_at,
    }
}

/// 将新建的 ShortLink 转换为 ActiveModel，owner 始终为空
pub fn shortlink_to_active_model(link: &ShortLink) -> short_link::ActiveModel {
    use sea_orm::ActiveValue::*;

    short_link::ActiveModel {
        short_code: Set(link.code.clone()),
        target_url: Set(link.target.clone()),
        created_at: Set(link.created_at),
        owner: Set(None),
    }
}

pub fn model_to_account(model: user::Model) -> UserAccount {
    UserAccount {
        username: model.username,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

pub fn account_to_active_model(account: &UserAccount) -> user::ActiveModel {
    use sea_orm::ActiveValue::*;

    user::ActiveModel {
        username: Set(account.username.clone()),
        password_hash: Set(account.password_hash.clone()),
        created_at: Set(account.created_at),
    }
}
