//! Migration: Create the profiles table.
//!
//! One profile per user; removed together with its user via the
//! cascading foreign key.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::ProfileId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::UserId).uuid().not_null())
                    .col(ColumnDef::new(Profiles::Role).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Profiles::Environment)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::EducationLevel)
                            .string_len(64)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_user_id")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One profile per user
        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_user_id")
                    .table(Profiles::Table)
                    .col(Profiles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profiles {
    Table,
    ProfileId,
    UserId,
    Role,
    Environment,
    EducationLevel,
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
}
