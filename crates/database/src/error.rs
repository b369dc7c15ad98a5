use models::week::ParseWeekError;
use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised by plan detail operations that take user input
#[derive(Debug, Error)]
pub enum PlanDetailError {
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error(transparent)]
    InvalidDate(#[from] ParseWeekError),
    #[error("No ISO week {week:?} in year {year:?}")]
    InvalidStartWeek {
        year: Option<i32>,
        week: Option<u32>,
    },
    #[error("Cannot plan {requested} weeks at once, the limit is {max}")]
    TooManyWeeks { requested: u32, max: u32 },
    #[error("Plan request {0} not found")]
    RequestNotFound(i32),
    #[error("Plan detail {0} not found")]
    DetailNotFound(i32),
}
