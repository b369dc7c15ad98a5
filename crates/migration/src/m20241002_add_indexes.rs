use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Per-user and per-task listings filter requests by owner and status
        manager
            .create_index(
                Index::create()
                    .name("idx_plan_requests_resource_id_status")
                    .table(PlanRequests::Table)
                    .col(PlanRequests::ResourceId)
                    .col(PlanRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plan_requests_task_id")
                    .table(PlanRequests::Table)
                    .col(PlanRequests::TaskId)
                    .to_owned(),
            )
            .await?;

        // Index on plan_details.request_id for faster joins
        manager
            .create_index(
                Index::create()
                    .name("idx_plan_details_request_id")
                    .table(PlanDetails::Table)
                    .col(PlanDetails::RequestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plan_group_members_plan_group_id")
                    .table(PlanGroupMembers::Table)
                    .col(PlanGroupMembers::PlanGroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_plan_group_members_plan_group_id")
                    .table(PlanGroupMembers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_plan_details_request_id")
                    .table(PlanDetails::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_plan_requests_task_id")
                    .table(PlanRequests::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_plan_requests_resource_id_status")
                    .table(PlanRequests::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum PlanRequests {
    Table,
    ResourceId,
    TaskId,
    Status,
}

#[derive(Iden)]
enum PlanDetails {
    Table,
    RequestId,
}

#[derive(Iden)]
enum PlanGroupMembers {
    Table,
    PlanGroupId,
}
