use models::request_status::RequestStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A request for a resource's time on a task, owning its weekly plan details
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub resource_id: i32, // User being planned
    pub task_id: i32,
    pub status: RequestStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan_tasks::Entity",
        from = "Column::TaskId",
        to = "super::plan_tasks::Column::Id"
    )]
    PlanTask,
    #[sea_orm(has_many = "super::plan_details::Entity")]
    PlanDetails,
}

impl Related<super::plan_tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanTask.def()
    }
}

impl Related<super::plan_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanDetails.def()
    }
}

impl Model {
    /// Whether the request's plan may still be changed
    pub fn can_edit(&self) -> bool {
        self.status.is_open()
    }
}

impl ActiveModelBehavior for ActiveModel {}
