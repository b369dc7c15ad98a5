use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create plan_tasks table
        manager
            .create_table(
                Table::create()
                    .table(PlanTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanTasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlanTasks::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create plan_requests table
        manager
            .create_table(
                Table::create()
                    .table(PlanRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlanRequests::ResourceId).integer().not_null())
                    .col(ColumnDef::new(PlanRequests::TaskId).integer().not_null())
                    .col(
                        ColumnDef::new(PlanRequests::Status)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_requests-task_id")
                            .from(PlanRequests::Table, PlanRequests::TaskId)
                            .to(PlanTasks::Table, PlanTasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create plan_groups table
        manager
            .create_table(
                Table::create()
                    .table(PlanGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanGroups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlanGroups::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create plan_group_members junction table (group -> user)
        manager
            .create_table(
                Table::create()
                    .table(PlanGroupMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanGroupMembers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlanGroupMembers::PlanGroupId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PlanGroupMembers::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_group_members-plan_group_id")
                            .from(PlanGroupMembers::Table, PlanGroupMembers::PlanGroupId)
                            .to(PlanGroups::Table, PlanGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create plan_details table, one row per request and week
        manager
            .create_table(
                Table::create()
                    .table(PlanDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanDetails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlanDetails::RequestId).integer().not_null())
                    .col(ColumnDef::new(PlanDetails::Week).integer().not_null())
                    .col(
                        ColumnDef::new(PlanDetails::Percentage)
                            .integer()
                            .not_null()
                            .default(80),
                    )
                    .col(ColumnDef::new(PlanDetails::OkMon).boolean().not_null().default(true))
                    .col(ColumnDef::new(PlanDetails::OkTue).boolean().not_null().default(true))
                    .col(ColumnDef::new(PlanDetails::OkWed).boolean().not_null().default(true))
                    .col(ColumnDef::new(PlanDetails::OkThu).boolean().not_null().default(true))
                    .col(ColumnDef::new(PlanDetails::OkFri).boolean().not_null().default(true))
                    .col(ColumnDef::new(PlanDetails::OkSat).boolean().not_null().default(false))
                    .col(ColumnDef::new(PlanDetails::OkSun).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_details-request_id")
                            .from(PlanDetails::Table, PlanDetails::RequestId)
                            .to(PlanRequests::Table, PlanRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A request has at most one detail per week
        manager
            .create_index(
                Index::create()
                    .name("idx_plan_details_week_request_id")
                    .table(PlanDetails::Table)
                    .col(PlanDetails::Week)
                    .col(PlanDetails::RequestId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(PlanDetails::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PlanGroupMembers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PlanGroups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PlanRequests::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PlanTasks::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum PlanTasks {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum PlanRequests {
    Table,
    Id,
    ResourceId,
    TaskId,
    Status,
}

#[derive(Iden)]
enum PlanGroups {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum PlanGroupMembers {
    Table,
    Id,
    PlanGroupId,
    UserId,
}

#[derive(Iden)]
enum PlanDetails {
    Table,
    Id,
    RequestId,
    Week,
    Percentage,
    OkMon,
    OkTue,
    OkWed,
    OkThu,
    OkFri,
    OkSat,
    OkSun,
}
