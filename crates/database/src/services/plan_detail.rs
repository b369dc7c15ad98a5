use crate::entities::{plan_details, plan_group_members, plan_requests, plan_tasks};
use log::debug;
use models::{request_status::RequestStatus, week::PlanWeek};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait,
    Select,
    prelude::Expr,
    sea_query::{Query, SimpleExpr},
};
use serde::Serialize;
use std::collections::HashMap;

/// A detail together with its request and the request's task
pub type DetailRow = (
    plan_details::Model,
    plan_requests::Model,
    Option<plan_tasks::Model>,
);

/// Summed allocation of one resource in one week
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct ResourceWeekLoad {
    pub resource_id: i32,
    pub week: i32,
    pub percentage: i64,
}

/// Summed allocation in one week
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct WeekLoad {
    pub week: i32,
    pub percentage: i64,
}

pub struct PlanDetailService;

impl PlanDetailService {
    /// Restrict a detail query to weeks in `[start, end]`
    pub fn in_week_range(
        query: Select<plan_details::Entity>,
        start: impl Into<PlanWeek>,
        end: impl Into<PlanWeek>,
    ) -> Select<plan_details::Entity> {
        let (start, end) = (start.into(), end.into());
        query.filter(plan_details::Column::Week.between(start.value(), end.value()))
    }

    /// Join each detail to its request and keep those whose request is in one of `states`
    pub fn with_request_states(
        query: Select<plan_details::Entity>,
        states: &[RequestStatus],
    ) -> Select<plan_details::Entity> {
        query
            .join(JoinType::InnerJoin, plan_details::Relation::PlanRequest.def())
            .filter(plan_requests::Column::Status.is_in(states.iter().copied()))
    }

    /// Details whose week lies in `[start, end]`, ordered by week
    pub async fn week_range(
        db: &DatabaseConnection,
        start: impl Into<PlanWeek>,
        end: impl Into<PlanWeek>,
    ) -> Result<Vec<plan_details::Model>, DbErr> {
        Self::in_week_range(plan_details::Entity::find(), start, end)
            .order_by_asc(plan_details::Column::Week)
            .all(db)
            .await
    }

    /// Details whose request is in one of `states`, ordered by week
    pub async fn request_states(
        db: &DatabaseConnection,
        states: &[RequestStatus],
    ) -> Result<Vec<plan_details::Model>, DbErr> {
        Self::with_request_states(plan_details::Entity::find(), states)
            .order_by_asc(plan_details::Column::Week)
            .all(db)
            .await
    }

    /// Timeline of one user: every detail of their requests in the given
    /// states and weeks, ordered by request
    pub async fn user_details(
        db: &DatabaseConnection,
        user_id: i32,
        states: &[RequestStatus],
        start: impl Into<PlanWeek>,
        end: impl Into<PlanWeek>,
    ) -> Result<Vec<DetailRow>, DbErr> {
        let query = Self::with_request_states(plan_details::Entity::find(), states)
            .filter(plan_requests::Column::ResourceId.eq(user_id));

        Self::load_detail_rows(db, Self::in_week_range(query, start, end)).await
    }

    /// Roster of one task: every detail of requests against it in the given
    /// states and weeks, ordered by request
    pub async fn task_details(
        db: &DatabaseConnection,
        task_id: i32,
        states: &[RequestStatus],
        start: impl Into<PlanWeek>,
        end: impl Into<PlanWeek>,
    ) -> Result<Vec<DetailRow>, DbErr> {
        let query = Self::with_request_states(plan_details::Entity::find(), states)
            .filter(plan_requests::Column::TaskId.eq(task_id));

        Self::load_detail_rows(db, Self::in_week_range(query, start, end)).await
    }

    /// Heat-map of a group: total allocation per member and week
    pub async fn group_overview(
        db: &DatabaseConnection,
        group_id: i32,
        states: &[RequestStatus],
        start: impl Into<PlanWeek>,
        end: impl Into<PlanWeek>,
    ) -> Result<Vec<ResourceWeekLoad>, DbErr> {
        let members = Query::select()
            .column(plan_group_members::Column::UserId)
            .from(plan_group_members::Entity)
            .and_where(plan_group_members::Column::PlanGroupId.eq(group_id))
            .to_owned();

        let query = Self::with_request_states(plan_details::Entity::find(), states)
            .select_only()
            .column(plan_requests::Column::ResourceId)
            .column(plan_details::Column::Week)
            .column_as(Self::percentage_sum(), "percentage")
            .filter(plan_requests::Column::ResourceId.in_subquery(members))
            .group_by(plan_requests::Column::ResourceId)
            .group_by(plan_details::Column::Week)
            .order_by_asc(plan_requests::Column::ResourceId)
            .order_by_asc(plan_details::Column::Week);

        Self::in_week_range(query, start, end)
            .into_model::<ResourceWeekLoad>()
            .all(db)
            .await
    }

    /// Total allocation of the request's resource in each week the request
    /// covers, counting requests in `states` plus the request itself
    pub async fn user_req_workload(
        db: &DatabaseConnection,
        request: &plan_requests::Model,
        states: &[RequestStatus],
    ) -> Result<Vec<WeekLoad>, DbErr> {
        let own_weeks = Query::select()
            .column(plan_details::Column::Week)
            .from(plan_details::Entity)
            .and_where(plan_details::Column::RequestId.eq(request.id))
            .to_owned();

        let counted_requests = Condition::any()
            .add(plan_requests::Column::Status.is_in(states.iter().copied()))
            .add(plan_requests::Column::Id.eq(request.id));

        plan_details::Entity::find()
            .select_only()
            .column(plan_details::Column::Week)
            .column_as(Self::percentage_sum(), "percentage")
            .join(JoinType::InnerJoin, plan_details::Relation::PlanRequest.def())
            .filter(plan_requests::Column::ResourceId.eq(request.resource_id))
            .filter(counted_requests)
            .filter(plan_details::Column::Week.in_subquery(own_weeks))
            .group_by(plan_details::Column::Week)
            .order_by_asc(plan_details::Column::Week)
            .into_model::<WeekLoad>()
            .all(db)
            .await
    }

    fn percentage_sum() -> SimpleExpr {
        Expr::col((plan_details::Entity, plan_details::Column::Percentage)).sum()
    }

    /// Run a detail query already joined to its request, then attach tasks
    async fn load_detail_rows(
        db: &DatabaseConnection,
        query: Select<plan_details::Entity>,
    ) -> Result<Vec<DetailRow>, DbErr> {
        let query = query
            .select_also(plan_requests::Entity)
            .order_by_asc(plan_requests::Column::Id)
            .order_by_asc(plan_details::Column::Week);

        debug!(
            "Generated SQL: {}",
            query.build(db.get_database_backend())
        );

        let details: Vec<(plan_details::Model, plan_requests::Model)> = query
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(detail, request)| request.map(|r| (detail, r)))
            .collect();

        if details.is_empty() {
            return Ok(vec![]);
        }

        // Batch fetch the tasks of all requests
        let mut task_ids: Vec<i32> = details.iter().map(|(_, r)| r.task_id).collect();
        task_ids.sort_unstable();
        task_ids.dedup();

        let tasks_by_id: HashMap<i32, plan_tasks::Model> = plan_tasks::Entity::find()
            .filter(plan_tasks::Column::Id.is_in(task_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|task| (task.id, task))
            .collect();

        let rows = details
            .into_iter()
            .map(|(detail, request)| {
                let task = tasks_by_id.get(&request.task_id).cloned();
                (detail, request, task)
            })
            .collect();

        Ok(rows)
    }
}
