use crate::{
    entities::{plan_details, plan_requests},
    error::PlanDetailError,
};
use chrono::NaiveDate;
use log::{debug, info, warn};
use models::week::{PlanWeek, parse_date};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait,
    ActiveValue::{self, Set},
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter, Value,
};
use serde::{Deserialize, Serialize};

/// Attributes submitted for one or more weeks of a request's plan
///
/// Only `percentage` and the day flags are ever written to a detail. The
/// remaining fields locate the first week of a bulk update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailParams {
    pub percentage: Option<i32>,
    pub ok_mon: Option<bool>,
    pub ok_tue: Option<bool>,
    pub ok_wed: Option<bool>,
    pub ok_thu: Option<bool>,
    pub ok_fri: Option<bool>,
    pub ok_sat: Option<bool>,
    pub ok_sun: Option<bool>,
    pub year: Option<i32>,
    pub week: Option<u32>,
    pub week_start_date: Option<String>,
}

impl DetailParams {
    /// First day of the update: `week_start_date` if given, otherwise the
    /// Monday of ISO week `week` in `year`
    pub fn start_date(&self) -> Result<NaiveDate, PlanDetailError> {
        if let Some(date) = &self.week_start_date {
            return Ok(parse_date(date)?);
        }

        let invalid = || PlanDetailError::InvalidStartWeek {
            year: self.year,
            week: self.week,
        };

        match (self.year, self.week) {
            (Some(year), Some(week)) => PlanWeek::from_iso(year, week)
                .and_then(PlanWeek::start_date)
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }

    /// Copy the mass-assignable attributes onto a detail
    pub fn apply(&self, detail: &mut plan_details::ActiveModel) {
        if let Some(percentage) = self.percentage {
            assign(&mut detail.percentage, percentage);
        }

        let flags = [
            (&mut detail.ok_mon, self.ok_mon),
            (&mut detail.ok_tue, self.ok_tue),
            (&mut detail.ok_wed, self.ok_wed),
            (&mut detail.ok_thu, self.ok_thu),
            (&mut detail.ok_fri, self.ok_fri),
            (&mut detail.ok_sat, self.ok_sat),
            (&mut detail.ok_sun, self.ok_sun),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                assign(field, value);
            }
        }
    }
}

/// Set a field only when the value differs from what is stored
fn assign<V>(field: &mut ActiveValue<V>, value: V)
where
    V: Into<Value> + PartialEq,
{
    match field {
        ActiveValue::Unchanged(current) if *current == value => {}
        _ => *field = Set(value),
    }
}

pub struct SavePlanDetailService;

impl SavePlanDetailService {
    /// Most weeks a single bulk update may cover, ten years of plan
    pub const MAX_BULK_WEEKS: u32 = 530;

    /// Write `params` to `num` consecutive weeks of the request's plan,
    /// creating missing details, and return them in week order
    ///
    /// Weeks are written one at a time without a transaction, so an error
    /// leaves the weeks before it saved.
    pub async fn bulk_update(
        db: &DatabaseConnection,
        request: &plan_requests::Model,
        params: &DetailParams,
        num: u32,
    ) -> Result<Vec<plan_details::Model>, PlanDetailError> {
        if num > Self::MAX_BULK_WEEKS {
            return Err(PlanDetailError::TooManyWeeks {
                requested: num,
                max: Self::MAX_BULK_WEEKS,
            });
        }

        let start_date = params.start_date()?;
        let mut details = Vec::with_capacity(num as usize);

        for date in start_date.iter_weeks().take(num as usize) {
            let detail = Self::save_week(db, request.id, PlanWeek::from(date), params).await?;
            details.push(detail);
        }

        info!(
            "Updated {} plan weeks of request {} starting {}",
            details.len(),
            request.id,
            PlanWeek::from(start_date)
        );

        Ok(details)
    }

    /// Apply `params` to a single existing detail
    pub async fn update_detail(
        db: &DatabaseConnection,
        detail_id: i32,
        params: &DetailParams,
    ) -> Result<plan_details::Model, PlanDetailError> {
        let detail = plan_details::Entity::find_by_id(detail_id)
            .one(db)
            .await?
            .ok_or(PlanDetailError::DetailNotFound(detail_id))?;

        let mut active = detail.clone().into_active_model();
        params.apply(&mut active);

        if !active.is_changed() {
            return Ok(detail);
        }

        Ok(active.update(db).await?)
    }

    /// Whether the detail may be edited, as decided by its request
    pub async fn can_edit(
        db: &DatabaseConnection,
        detail: &plan_details::Model,
    ) -> Result<bool, PlanDetailError> {
        let Some(request) = detail.find_related(plan_requests::Entity).one(db).await? else {
            warn!(
                "Plan detail {} refers to missing request {}",
                detail.id, detail.request_id
            );
            return Err(PlanDetailError::RequestNotFound(detail.request_id));
        };

        Ok(request.can_edit())
    }

    /// Find or initialise the detail of `request_id` for `week`, then save `params` to it
    async fn save_week(
        db: &DatabaseConnection,
        request_id: i32,
        week: PlanWeek,
        params: &DetailParams,
    ) -> Result<plan_details::Model, PlanDetailError> {
        let existing = plan_details::Entity::find()
            .filter(plan_details::Column::RequestId.eq(request_id))
            .filter(plan_details::Column::Week.eq(week.value()))
            .one(db)
            .await?;

        let Some(detail) = existing else {
            let mut active = plan_details::ActiveModel {
                request_id: Set(request_id),
                week: Set(week.value()),
                ..plan_details::ActiveModel::new()
            };
            params.apply(&mut active);

            let detail = active.insert(db).await?;
            debug!(
                "Created week {week} of request {request_id} on days {}",
                detail.available_days()
            );
            return Ok(detail);
        };

        let mut active = detail.clone().into_active_model();
        params.apply(&mut active);

        if !active.is_changed() {
            return Ok(detail);
        }

        debug!("Updating week {week} of request {request_id}");
        Ok(active.update(db).await?)
    }
}
