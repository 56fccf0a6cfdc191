//! Migration: Create id_requests table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IdRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IdRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IdRequests::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(IdRequests::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(IdRequests::RequestType).string().null())
                    .col(ColumnDef::new(IdRequests::PhotoUrl).string().null())
                    .col(ColumnDef::new(IdRequests::Reason).text().null())
                    .col(ColumnDef::new(IdRequests::Comments).text().null())
                    .col(
                        ColumnDef::new(IdRequests::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(IdRequests::RequestDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IdRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Users owning requests cannot be removed
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_id_requests_user_id")
                            .from(IdRequests::Table, IdRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_id_requests_user_id_request_date")
                    .table(IdRequests::Table)
                    .col(IdRequests::UserId)
                    .col(IdRequests::RequestDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_id_requests_status")
                    .table(IdRequests::Table)
                    .col(IdRequests::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_id_requests_status")
                    .table(IdRequests::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_id_requests_user_id_request_date")
                    .table(IdRequests::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(IdRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum IdRequests {
    Table,
    Id,
    UserId,
    Status,
    RequestType,
    PhotoUrl,
    Reason,
    Comments,
    Paid,
    RequestDate,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
