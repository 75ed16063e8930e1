use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{IndexCreateStatement, TableCreateStatement};

const USERS_NAME_INDEX: &str = "idx_users_name_unique";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Gender,
    PasswordDigest,
    IsAdmin,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

fn users_table() -> TableCreateStatement {
    let mut id = ColumnDef::new(Users::Id);
    id.big_integer().not_null().auto_increment().primary_key();

    let mut created_at = ColumnDef::new(Users::CreatedAt);
    created_at.timestamp_with_time_zone().not_null();
    let mut updated_at = ColumnDef::new(Users::UpdatedAt);
    updated_at.timestamp_with_time_zone().not_null();

    Table::create()
        .table(Users::Table)
        .if_not_exists()
        .col(&mut id)
        .col(ColumnDef::new(Users::Name).string_len(64).not_null())
        .col(ColumnDef::new(Users::Gender).string_len(32).null())
        .col(ColumnDef::new(Users::PasswordDigest).text().not_null())
        .col(ColumnDef::new(Users::IsAdmin).boolean().not_null().default(false))
        .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
        .col(&mut created_at)
        .col(&mut updated_at)
        .to_owned()
}

// Login resolves identities by name.
fn users_name_index() -> IndexCreateStatement {
    Index::create()
        .name(USERS_NAME_INDEX)
        .table(Users::Table)
        .col(Users::Name)
        .unique()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(users_table()).await?;
        manager.create_index(users_name_index()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(USERS_NAME_INDEX)
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}
