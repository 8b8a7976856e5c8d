use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Task, TaskStatus},
};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

const TASK_COLUMNS: &str =
    "id, title, description, label, due_date, status, important, assigned_to, created_by, created_at";

/// Tag selecting one of the predefined task views or bulk deletes.
/// An unrecognized tag fails JSON extraction and answers 400.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    First3,
    Last3,
    Slice5,
    Pending,
    HighPriority,
    ImportantLabel,
    ThisWeek,
    All,
    DeleteCompleted,
    DeletePastDue,
    GroupByStatus,
    TasksDueToday,
    SortedGrouped,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub filter_type: FilterType,
}

/// Dispatches on the filter tag and returns a view of the caller's tasks,
/// or a confirmation for the two bulk deletes.
///
/// Every branch is scoped to the authenticated user. The grouping tags
/// fetch the user's tasks once and bucket them in memory; the rest are
/// single queries.
#[post("/filter")]
pub async fn filter_tasks(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
    body: web::Json<FilterRequest>,
) -> Result<impl Responder, AppError> {
    let uid = user.0;
    let now = Utc::now();

    let tasks = match body.filter_type {
        FilterType::First3 => owned_tasks(pool.get_ref(), uid, "ORDER BY due_date ASC LIMIT 3").await?,
        FilterType::Last3 => owned_tasks(pool.get_ref(), uid, "ORDER BY due_date DESC LIMIT 3").await?,
        FilterType::Slice5 => owned_tasks(pool.get_ref(), uid, "ORDER BY created_at ASC LIMIT 5").await?,
        FilterType::Pending => {
            owned_tasks(pool.get_ref(), uid, "AND status IN ('DO', 'DOING') ORDER BY created_at ASC").await?
        }
        FilterType::HighPriority => {
            owned_tasks(pool.get_ref(), uid, "AND important ORDER BY created_at ASC").await?
        }
        FilterType::ImportantLabel => {
            owned_tasks(
                pool.get_ref(),
                uid,
                "AND important AND status = 'DOING' ORDER BY created_at ASC",
            )
            .await?
        }
        FilterType::ThisWeek => {
            let next_week = now
                .checked_add_signed(Duration::days(7))
                .expect("valid timestamp");
            let sql = format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE created_by = $1 AND due_date >= $2 AND due_date <= $3
                 ORDER BY created_at ASC"
            );
            sqlx::query_as::<_, Task>(&sql)
                .bind(uid)
                .bind(now)
                .bind(next_week)
                .fetch_all(&**pool)
                .await?
        }
        FilterType::All => owned_tasks(pool.get_ref(), uid, "ORDER BY due_date ASC").await?,
        FilterType::DeleteCompleted => {
            sqlx::query("DELETE FROM tasks WHERE created_by = $1 AND status = 'DONE'")
                .bind(uid)
                .execute(&**pool)
                .await?;
            return Ok(HttpResponse::Ok().json(json!({
                "message": "Completed tasks deleted"
            })));
        }
        FilterType::DeletePastDue => {
            sqlx::query("DELETE FROM tasks WHERE created_by = $1 AND due_date < $2")
                .bind(uid)
                .bind(now)
                .execute(&**pool)
                .await?;
            return Ok(HttpResponse::Ok().json(json!({
                "message": "Past due tasks deleted"
            })));
        }
        FilterType::GroupByStatus => {
            let all = owned_tasks(pool.get_ref(), uid, "ORDER BY created_at ASC").await?;
            group_by_status(all, [TaskStatus::Do, TaskStatus::Doing, TaskStatus::Done])
        }
        FilterType::TasksDueToday => {
            let day_start = now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .expect("valid time")
                .and_utc();
            let day_end = day_start + Duration::days(1);
            let sql = format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE created_by = $1 AND due_date >= $2 AND due_date < $3
                 ORDER BY created_at ASC"
            );
            sqlx::query_as::<_, Task>(&sql)
                .bind(uid)
                .bind(day_start)
                .bind(day_end)
                .fetch_all(&**pool)
                .await?
        }
        FilterType::SortedGrouped => {
            let all = owned_tasks(pool.get_ref(), uid, "ORDER BY created_at ASC").await?;
            group_by_status(all, [TaskStatus::Done, TaskStatus::Doing, TaskStatus::Do])
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": "Tasks retrieved successfully",
        "tasks": tasks
    })))
}

/// Fetches the caller's tasks with an extra SQL tail (conditions must be
/// prefixed with `AND`, ordering with `ORDER BY`).
async fn owned_tasks(pool: &PgPool, uid: i32, tail: &str) -> Result<Vec<Task>, AppError> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE created_by = $1 {tail}");
    Ok(sqlx::query_as::<_, Task>(&sql)
        .bind(uid)
        .fetch_all(pool)
        .await?)
}

/// Concatenates tasks bucketed by status in the given group order,
/// preserving fetch order within each bucket.
fn group_by_status(tasks: Vec<Task>, order: [TaskStatus; 3]) -> Vec<Task> {
    let mut buckets: [Vec<Task>; 3] = Default::default();
    for task in tasks {
        if let Some(slot) = order.iter().position(|status| *status == task.status) {
            buckets[slot].push(task);
        }
    }
    buckets.into_iter().flatten().collect()
}
