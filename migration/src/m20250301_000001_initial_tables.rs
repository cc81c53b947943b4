use sea_orm::DatabaseBackend;
use sea_orm::sea_query::{IntoIden, TableCreateStatement};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager.create_table(users_table(backend)).await?;

        // owner 外键随用户级联删除
        manager.create_table(short_links_table(backend)).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_links_owner")
                    .table(ShortLink::Table)
                    .col(ShortLink::Owner)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_links_created_at")
                    .table(ShortLink::Table)
                    .col(ShortLink::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_short_links_created_at")
                    .table(ShortLink::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_short_links_owner")
                    .table(ShortLink::Table)
                    .to_owned(),
            )
            .await?;

        // 先删子表再删父表
        manager
            .drop_table(Table::drop().table(ShortLink::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

/// 字符串键列；MySQL 默认排序规则不区分大小写，需显式使用二进制排序
fn key_column<T: IntoIden>(name: T, backend: DatabaseBackend) -> ColumnDef {
    let mut column = ColumnDef::new(name);
    column.string();
    if backend == DatabaseBackend::MySql {
        column.extra("COLLATE utf8mb4_bin");
    }
    column
}

fn users_table(backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(User::Table)
        .if_not_exists()
        .col(key_column(User::Username, backend).not_null().primary_key())
        .col(ColumnDef::new(User::PasswordHash).string().not_null())
        .col(
            ColumnDef::new(User::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

fn short_links_table(backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(ShortLink::Table)
        .if_not_exists()
        .col(key_column(ShortLink::ShortCode, backend).not_null().primary_key())
        .col(ColumnDef::new(ShortLink::TargetUrl).text().not_null())
        .col(
            ColumnDef::new(ShortLink::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        // 外键列的排序规则必须与 users.username 一致
        .col(key_column(ShortLink::Owner, backend).null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_short_links_owner")
                .from(ShortLink::Table, ShortLink::Owner)
                .to(User::Table, User::Username)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::NoAction),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum ShortLink {
    #[sea_orm(iden = "short_links")]
    Table,
    ShortCode,
    TargetUrl,
    CreatedAt,
    Owner,
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Username,
    PasswordHash,
    CreatedAt,
}
