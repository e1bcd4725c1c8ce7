use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Task, TaskInput, TaskUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str = "id, user_id, title, description, status, priority, created_at";

async fn fetch_owned_task(
    pool: &SqlitePool,
    task_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Task>, AppError> {
    // Ownership is part of the lookup: a task owned by someone else is
    // indistinguishable from a task that does not exist.
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND user_id = ?"
    ))
    .bind(task_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(task)
}

/// Retrieves all tasks owned by the authenticated user, in creation order.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<SqlitePool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? ORDER BY created_at ASC"
    ))
    .bind(user_id.0)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// The owner is always the identity proven by the token, never anything
/// client-supplied. Status starts as `todo`.
#[post("")]
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    user_id: AuthenticatedUserId,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    // Validate input
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user_id.0);

    sqlx::query(
        "INSERT INTO tasks (id, user_id, title, description, status, priority, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(task.id)
    .bind(task.user_id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.created_at)
    .execute(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Updates a task owned by the authenticated user.
///
/// Only the provided fields are applied. A task owned by another user yields
/// 404, same as a task that does not exist.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let mut task = fetch_owned_task(&pool, task_id.into_inner(), user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    task.apply(task_data.into_inner());

    sqlx::query(
        "UPDATE tasks SET title = ?, description = ?, status = ?, priority = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.id)
    .bind(task.user_id)
    .execute(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task owned by the authenticated user.
///
/// Deleting an already-deleted task fails with 404, not silently.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    user_id: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
        .bind(task_id.into_inner())
        .bind(user_id.0)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
