use chrono::NaiveDate;
use models::{
    days::DaySet,
    week::{ParseWeekError, PlanWeek, parse_date},
};
use sea_orm::{
    ActiveValue::{self, Set},
    entity::prelude::*,
};
use serde::{Deserialize, Serialize};

/// Share of the week allocated to a new detail
pub const DEFAULT_PERCENTAGE: i32 = 80;

/// One resource's allocation against one request for one ISO week
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub request_id: i32,
    pub week: i32, // YYYYWW, see `PlanWeek`
    pub percentage: i32,
    pub ok_mon: bool,
    pub ok_tue: bool,
    pub ok_wed: bool,
    pub ok_thu: bool,
    pub ok_fri: bool,
    pub ok_sat: bool,
    pub ok_sun: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan_requests::Entity",
        from = "Column::RequestId",
        to = "super::plan_requests::Column::Id"
    )]
    PlanRequest,
}

impl Related<super::plan_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanRequest.def()
    }
}

impl Model {
    pub fn plan_week(&self) -> PlanWeek {
        PlanWeek::from(self.week)
    }

    pub fn cwyear(&self) -> i32 {
        self.plan_week().cwyear()
    }

    pub fn cweek(&self) -> u32 {
        self.plan_week().cweek()
    }

    /// Monday of the detail's week
    pub fn week_start_date(&self) -> Option<NaiveDate> {
        self.plan_week().start_date()
    }

    pub fn available_days(&self) -> DaySet {
        DaySet::from_flags([
            self.ok_mon,
            self.ok_tue,
            self.ok_wed,
            self.ok_thu,
            self.ok_fri,
            self.ok_sat,
            self.ok_sun,
        ])
    }
}

impl ActiveModel {
    /// Monday of the week, if one has been assigned
    pub fn week_start_date(&self) -> Option<NaiveDate> {
        match &self.week {
            ActiveValue::Set(week) | ActiveValue::Unchanged(week) => {
                PlanWeek::from(*week).start_date()
            }
            ActiveValue::NotSet => None,
        }
    }

    /// Moves the detail to the week containing the given date
    pub fn set_week_start_date(&mut self, date: &str) -> Result<(), ParseWeekError> {
        let date = parse_date(date)?;
        self.week = Set(PlanWeek::from(date).value());
        Ok(())
    }

    pub fn set_available_days(&mut self, days: DaySet) {
        let [mon, tue, wed, thu, fri, sat, sun] = days.to_flags();
        self.ok_mon = Set(mon);
        self.ok_tue = Set(tue);
        self.ok_wed = Set(wed);
        self.ok_thu = Set(thu);
        self.ok_fri = Set(fri);
        self.ok_sat = Set(sat);
        self.ok_sun = Set(sun);
    }
}

impl ActiveModelBehavior for ActiveModel {
    // Same defaults as the table columns
    fn new() -> Self {
        let mut detail = Self {
            percentage: Set(DEFAULT_PERCENTAGE),
            ..<Self as ActiveModelTrait>::default()
        };
        detail.set_available_days(DaySet::default());
        detail
    }
}
