//! Migration to create the activity table.
//!
//! Activities are the extracurricular offerings students can sign up for.
//! The name doubles as the public identifier, so it carries a unique index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activity::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activity::Name).text().not_null())
                    .col(ColumnDef::new(Activity::Description).text().not_null())
                    .col(ColumnDef::new(Activity::Schedule).text().not_null())
                    .col(
                        ColumnDef::new(Activity::MaxParticipants)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_name")
                    .table(Activity::Table)
                    .col(Activity::Name)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_activity_name").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Activity {
    Table,
    Id,
    Name,
    Description,
    Schedule,
    MaxParticipants,
}
