pub mod plan_detail;
pub mod save_plan_detail;
