//! Create login table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Login::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Login::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Login::UserId).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Login::LoggedInAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_login_user")
                            .from(Login::Table, Login::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: logged_in_at (daily-activity range scans)
        manager
            .create_index(
                Index::create()
                    .name("idx_login_logged_in_at")
                    .table(Login::Table)
                    .col(Login::LoggedInAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Login::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Login {
    Table,
    Id,
    UserId,
    LoggedInAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
