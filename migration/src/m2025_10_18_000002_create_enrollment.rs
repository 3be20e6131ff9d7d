//! Migration to create the enrollment table.
//!
//! Each row links one student email to one activity. A student may appear
//! on a roster at most once, which the composite unique index enforces.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollment::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollment::ActivityId).integer().not_null())
                    .col(ColumnDef::new(Enrollment::Email).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_activity_id")
                            .from(Enrollment::Table, Enrollment::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One roster entry per (activity, email)
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_activity_email")
                    .table(Enrollment::Table)
                    .col(Enrollment::ActivityId)
                    .col(Enrollment::Email)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_email")
                    .table(Enrollment::Table)
                    .col(Enrollment::Email)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrollment_activity_email")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_enrollment_email").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Enrollment {
    Table,
    Id,
    ActivityId,
    Email,
}

#[derive(DeriveIden)]
enum Activity {
    Table,
    Id,
}
