pub mod plan_details;
pub mod plan_group_members;
pub mod plan_groups;
pub mod plan_requests;
pub mod plan_tasks;
