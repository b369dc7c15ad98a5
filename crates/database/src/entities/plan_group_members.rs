use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Junction table placing users into planning groups
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_group_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub plan_group_id: i32,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan_groups::Entity",
        from = "Column::PlanGroupId",
        to = "super::plan_groups::Column::Id"
    )]
    PlanGroup,
}

impl Related<super::plan_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
