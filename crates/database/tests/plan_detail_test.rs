use chrono::NaiveDate;
use database::{
    entities::{plan_details, plan_group_members, plan_groups, plan_requests, plan_tasks},
    error::PlanDetailError,
    services::{
        plan_detail::{PlanDetailService, ResourceWeekLoad, WeekLoad},
        save_plan_detail::{DetailParams, SavePlanDetailService},
    },
};
use migration::{Migrator, MigratorTrait};
use models::request_status::RequestStatus;
use sea_orm::{
    ActiveModelTrait, Database, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, Set,
};

/// Create an in-memory SQLite database for testing
async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let _ = env_logger::builder().is_test(true).try_init();

    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

async fn create_task(db: &DatabaseConnection, name: &str) -> plan_tasks::Model {
    plan_tasks::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

async fn create_request(
    db: &DatabaseConnection,
    resource_id: i32,
    task: &plan_tasks::Model,
    status: RequestStatus,
) -> plan_requests::Model {
    plan_requests::ActiveModel {
        resource_id: Set(resource_id),
        task_id: Set(task.id),
        status: Set(status),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

async fn create_group(db: &DatabaseConnection, name: &str, members: &[i32]) -> plan_groups::Model {
    let group = plan_groups::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    for &user_id in members {
        plan_group_members::ActiveModel {
            plan_group_id: Set(group.id),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    group
}

/// Plan `num` weeks of a request starting at ISO `year`/`week`
async fn plan_weeks(
    db: &DatabaseConnection,
    request: &plan_requests::Model,
    year: i32,
    week: u32,
    percentage: i32,
    num: u32,
) -> Vec<plan_details::Model> {
    let params = DetailParams {
        year: Some(year),
        week: Some(week),
        percentage: Some(percentage),
        ..Default::default()
    };

    SavePlanDetailService::bulk_update(db, request, &params, num)
        .await
        .unwrap()
}

fn weeks(details: &[plan_details::Model]) -> Vec<i32> {
    details.iter().map(|d| d.week).collect()
}

/// Two users, two tasks and requests in several states:
///
/// - user 10: accepted on A (w10-w12, 50%), pending on B (w10-w11, 30%),
///   rejected on A (w10, 100%)
/// - user 20: accepted on A (w11-w13, 60%)
struct Fixture {
    task_a: plan_tasks::Model,
    task_b: plan_tasks::Model,
    accepted: plan_requests::Model,
    pending: plan_requests::Model,
    other_user: plan_requests::Model,
}

async fn seed(db: &DatabaseConnection) -> Fixture {
    let task_a = create_task(db, "Task A").await;
    let task_b = create_task(db, "Task B").await;

    let accepted = create_request(db, 10, &task_a, RequestStatus::Accepted).await;
    let pending = create_request(db, 10, &task_b, RequestStatus::Pending).await;
    let rejected = create_request(db, 10, &task_a, RequestStatus::Rejected).await;
    let other_user = create_request(db, 20, &task_a, RequestStatus::Accepted).await;

    plan_weeks(db, &accepted, 2024, 10, 50, 3).await;
    plan_weeks(db, &pending, 2024, 10, 30, 2).await;
    plan_weeks(db, &rejected, 2024, 10, 100, 1).await;
    plan_weeks(db, &other_user, 2024, 11, 60, 3).await;

    Fixture {
        task_a,
        task_b,
        accepted,
        pending,
        other_user,
    }
}

#[tokio::test]
async fn test_bulk_update_creates_consecutive_weeks() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Migration").await;
    let request = create_request(&db, 1, &task, RequestStatus::Pending).await;

    let details = plan_weeks(&db, &request, 2024, 10, 50, 3).await;

    assert_eq!(weeks(&details), vec![202410, 202411, 202412]);
    assert!(details.iter().all(|d| d.percentage == 50));
    assert!(details.iter().all(|d| d.request_id == request.id));
    // Untouched flags keep their defaults
    assert!(details.iter().all(|d| d.ok_mon && !d.ok_sun));
    assert_eq!(plan_details::Entity::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn test_bulk_update_is_idempotent_per_week() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Migration").await;
    let request = create_request(&db, 1, &task, RequestStatus::Pending).await;

    let first = plan_weeks(&db, &request, 2024, 10, 50, 3).await;
    let second = plan_weeks(&db, &request, 2024, 10, 50, 3).await;
    assert_eq!(first, second);

    let params = DetailParams {
        year: Some(2024),
        week: Some(11),
        percentage: Some(20),
        ok_fri: Some(false),
        ..Default::default()
    };
    let updated = SavePlanDetailService::bulk_update(&db, &request, &params, 3)
        .await
        .unwrap();

    assert_eq!(weeks(&updated), vec![202411, 202412, 202413]);
    assert_eq!(updated[0].id, first[1].id);
    assert!(updated.iter().all(|d| d.percentage == 20 && !d.ok_fri));
    assert_eq!(plan_details::Entity::find().count(&db).await.unwrap(), 4);

    let untouched = plan_details::Entity::find_by_id(first[0].id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.percentage, 50);
}

#[tokio::test]
async fn test_bulk_update_from_start_date_crosses_year() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Year end").await;
    let request = create_request(&db, 1, &task, RequestStatus::Pending).await;

    let params = DetailParams {
        week_start_date: Some("2024-12-26".to_string()),
        ok_sat: Some(true),
        ..Default::default()
    };
    let details = SavePlanDetailService::bulk_update(&db, &request, &params, 3)
        .await
        .unwrap();

    assert_eq!(weeks(&details), vec![202452, 202501, 202502]);
    assert!(details.iter().all(|d| d.percentage == 80 && d.ok_sat));
    assert_eq!(
        details[1].week_start_date(),
        NaiveDate::from_ymd_opt(2024, 12, 30)
    );
}

#[tokio::test]
async fn test_bulk_update_rejects_missing_start() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Nowhere").await;
    let request = create_request(&db, 1, &task, RequestStatus::Pending).await;

    let params = DetailParams {
        percentage: Some(10),
        week: Some(3),
        ..Default::default()
    };
    let result = SavePlanDetailService::bulk_update(&db, &request, &params, 2).await;
    assert!(matches!(
        result,
        Err(PlanDetailError::InvalidStartWeek { year: None, week: Some(3) })
    ));

    let params = DetailParams {
        week_start_date: Some("2024-13-01".to_string()),
        ..Default::default()
    };
    let result = SavePlanDetailService::bulk_update(&db, &request, &params, 2).await;
    assert!(matches!(result, Err(PlanDetailError::InvalidDate(_))));

    assert_eq!(plan_details::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_bulk_update_refuses_oversized_batches() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Forever").await;
    let request = create_request(&db, 1, &task, RequestStatus::Pending).await;

    let params = DetailParams {
        year: Some(2024),
        week: Some(1),
        ..Default::default()
    };
    let result = SavePlanDetailService::bulk_update(&db, &request, &params, u32::MAX).await;
    assert!(matches!(
        result,
        Err(PlanDetailError::TooManyWeeks { requested, max })
            if requested == u32::MAX && max == SavePlanDetailService::MAX_BULK_WEEKS
    ));

    let too_many = SavePlanDetailService::MAX_BULK_WEEKS + 1;
    let result = SavePlanDetailService::bulk_update(&db, &request, &params, too_many).await;
    assert!(matches!(result, Err(PlanDetailError::TooManyWeeks { .. })));

    assert_eq!(plan_details::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_bulk_update_accepts_timestamp_start() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Timestamped").await;
    let request = create_request(&db, 1, &task, RequestStatus::Pending).await;

    let params = DetailParams {
        week_start_date: Some("2024-03-04T09:00:00".to_string()),
        percentage: Some(40),
        ..Default::default()
    };
    let details = SavePlanDetailService::bulk_update(&db, &request, &params, 2)
        .await
        .unwrap();

    assert_eq!(weeks(&details), vec![202410, 202411]);
}

#[tokio::test]
async fn test_duplicate_week_is_rejected_by_storage() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Unique").await;
    let request = create_request(&db, 1, &task, RequestStatus::Pending).await;
    plan_weeks(&db, &request, 2024, 10, 50, 1).await;

    let duplicate = plan_details::ActiveModel {
        request_id: Set(request.id),
        week: Set(202410),
        ..Default::default()
    }
    .insert(&db)
    .await;

    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_details_are_deleted_with_their_request() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Short lived").await;
    let request = create_request(&db, 1, &task, RequestStatus::Pending).await;
    plan_weeks(&db, &request, 2024, 10, 50, 4).await;

    request.delete(&db).await.unwrap();

    assert_eq!(plan_details::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_week_range_is_inclusive() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Range").await;
    let request = create_request(&db, 1, &task, RequestStatus::Pending).await;
    plan_weeks(&db, &request, 2023, 52, 50, 7).await;

    let details = PlanDetailService::week_range(&db, 202401, 202404).await.unwrap();
    assert_eq!(weeks(&details), vec![202401, 202402, 202403, 202404]);

    // Dates select the weeks they fall in
    let start = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 28).unwrap();
    let by_date = PlanDetailService::week_range(&db, start, end).await.unwrap();
    assert_eq!(by_date, details);
}

#[tokio::test]
async fn test_request_states_filters_by_request_status() {
    let db = setup_test_db().await.unwrap();
    let fixture = seed(&db).await;

    let accepted = PlanDetailService::request_states(&db, &[RequestStatus::Accepted])
        .await
        .unwrap();

    assert_eq!(accepted.len(), 6);
    assert!(accepted.iter().all(|d| {
        d.request_id == fixture.accepted.id || d.request_id == fixture.other_user.id
    }));
    assert!(accepted.windows(2).all(|w| w[0].week <= w[1].week));

    let none = PlanDetailService::request_states(&db, &[]).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_user_details_orders_by_request_and_loads_tasks() {
    let db = setup_test_db().await.unwrap();
    let fixture = seed(&db).await;

    let rows = PlanDetailService::user_details(
        &db,
        10,
        &[RequestStatus::Accepted, RequestStatus::Pending],
        202410,
        202411,
    )
    .await
    .unwrap();

    let summary: Vec<(i32, i32, String)> = rows
        .iter()
        .map(|(detail, request, task)| {
            (
                request.id,
                detail.week,
                task.as_ref().map(|t| t.name.clone()).unwrap_or_default(),
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            (fixture.accepted.id, 202410, fixture.task_a.name.clone()),
            (fixture.accepted.id, 202411, fixture.task_a.name.clone()),
            (fixture.pending.id, 202410, fixture.task_b.name.clone()),
            (fixture.pending.id, 202411, fixture.task_b.name.clone()),
        ]
    );
    assert!(rows.iter().all(|(detail, request, _)| detail.request_id == request.id));
}

#[tokio::test]
async fn test_task_details_spans_users() {
    let db = setup_test_db().await.unwrap();
    let fixture = seed(&db).await;

    let rows = PlanDetailService::task_details(
        &db,
        fixture.task_a.id,
        &[RequestStatus::Accepted],
        202410,
        202413,
    )
    .await
    .unwrap();

    let summary: Vec<(i32, i32)> = rows
        .iter()
        .map(|(detail, request, _)| (request.resource_id, detail.week))
        .collect();

    assert_eq!(
        summary,
        vec![
            (10, 202410),
            (10, 202411),
            (10, 202412),
            (20, 202411),
            (20, 202412),
            (20, 202413),
        ]
    );
    assert!(rows.iter().all(|(_, _, task)| task.as_ref() == Some(&fixture.task_a)));
}

#[tokio::test]
async fn test_group_overview_sums_members_only() {
    let db = setup_test_db().await.unwrap();
    seed(&db).await;
    let group = create_group(&db, "Backend", &[10, 30]).await;

    let overview = PlanDetailService::group_overview(
        &db,
        group.id,
        &[RequestStatus::Accepted, RequestStatus::Pending],
        202410,
        202412,
    )
    .await
    .unwrap();

    assert_eq!(
        overview,
        vec![
            ResourceWeekLoad {
                resource_id: 10,
                week: 202410,
                percentage: 80,
            },
            ResourceWeekLoad {
                resource_id: 10,
                week: 202411,
                percentage: 80,
            },
            ResourceWeekLoad {
                resource_id: 10,
                week: 202412,
                percentage: 50,
            },
        ]
    );
}

#[tokio::test]
async fn test_user_req_workload_counts_own_request() {
    let db = setup_test_db().await.unwrap();
    let fixture = seed(&db).await;

    // The pending request is counted even though only accepted ones are asked for
    let workload =
        PlanDetailService::user_req_workload(&db, &fixture.pending, &[RequestStatus::Accepted])
            .await
            .unwrap();

    assert_eq!(
        workload,
        vec![
            WeekLoad {
                week: 202410,
                percentage: 80,
            },
            WeekLoad {
                week: 202411,
                percentage: 80,
            },
        ]
    );

    let alone = PlanDetailService::user_req_workload(&db, &fixture.pending, &[])
        .await
        .unwrap();
    assert!(alone.iter().all(|load| load.percentage == 30));
    assert_eq!(alone.len(), 2);
}

#[tokio::test]
async fn test_can_edit_follows_request() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Permissions").await;
    let open = create_request(&db, 1, &task, RequestStatus::Pending).await;
    let closed = create_request(&db, 1, &task, RequestStatus::Rejected).await;

    let open_detail = plan_weeks(&db, &open, 2024, 1, 50, 1).await.remove(0);
    let closed_detail = plan_weeks(&db, &closed, 2024, 1, 50, 1).await.remove(0);

    assert!(SavePlanDetailService::can_edit(&db, &open_detail).await.unwrap());
    assert!(!SavePlanDetailService::can_edit(&db, &closed_detail).await.unwrap());
}

#[tokio::test]
async fn test_update_detail() {
    let db = setup_test_db().await.unwrap();
    let task = create_task(&db, "Edit").await;
    let request = create_request(&db, 1, &task, RequestStatus::Accepted).await;
    let detail = plan_weeks(&db, &request, 2024, 20, 50, 1).await.remove(0);

    let params = DetailParams {
        percentage: Some(25),
        ok_wed: Some(false),
        // Never moves the detail to another week
        week_start_date: Some("2024-01-01".to_string()),
        ..Default::default()
    };
    let updated = SavePlanDetailService::update_detail(&db, detail.id, &params)
        .await
        .unwrap();

    assert_eq!(updated.percentage, 25);
    assert!(!updated.ok_wed);
    assert_eq!(updated.week, 202420);

    let missing = SavePlanDetailService::update_detail(&db, detail.id + 100, &params).await;
    assert!(matches!(missing, Err(PlanDetailError::DetailNotFound(_))));
}
