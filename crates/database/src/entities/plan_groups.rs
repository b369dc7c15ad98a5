use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plan_group_members::Entity")]
    PlanGroupMembers,
}

impl Related<super::plan_group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanGroupMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
