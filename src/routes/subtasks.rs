use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{Subtask, SubtaskInput, SubtaskUpdateInput, SubtaskWithTask, TaskRef},
    routes::tasks::find_owned,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Resolves a subtask through its parent task, scoped to the requester.
/// A subtask under someone else's task is a 404, same as a missing one.
async fn find_scoped(pool: &PgPool, subtask_id: i32, user_id: i32) -> Result<Subtask, AppError> {
    let subtask: Option<Subtask> = sqlx::query_as(
        "SELECT s.id, s.task_id, s.title, s.completed, s.position, s.created_at, s.updated_at \
         FROM subtasks s \
         JOIN tasks t ON t.id = s.task_id \
         WHERE s.id = $1 AND t.user_id = $2",
    )
    .bind(subtask_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    subtask.ok_or_else(|| AppError::NotFound("Subtask not found.".into()))
}

/// Creates a subtask under one of the user's tasks. `completed` defaults to
/// false and `position` to 0.
#[post("/tasks/{task_id}/subtasks")]
pub async fn create_subtask(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    payload: web::Json<SubtaskInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let task = find_owned(&pool, task_id.into_inner(), user_id.0).await?;

    let subtask: Subtask = sqlx::query_as(
        "INSERT INTO subtasks (task_id, title, completed, position) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, task_id, title, completed, position, created_at, updated_at",
    )
    .bind(task.id)
    .bind(&payload.title)
    .bind(payload.completed.unwrap_or(false))
    .bind(payload.position.unwrap_or(0))
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(subtask))
}

/// Lists a task's subtasks ordered by position, then creation order.
#[get("/tasks/{task_id}/subtasks")]
pub async fn list_subtasks(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task = find_owned(&pool, task_id.into_inner(), user_id.0).await?;

    let subtasks: Vec<Subtask> = sqlx::query_as(
        "SELECT id, task_id, title, completed, position, created_at, updated_at \
         FROM subtasks WHERE task_id = $1 \
         ORDER BY position ASC, created_at ASC, id ASC",
    )
    .bind(task.id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(subtasks))
}

/// Fetches a single subtask with its parent task's `{id, title}`.
#[get("/subtasks/{id}")]
pub async fn get_subtask(
    pool: web::Data<PgPool>,
    subtask_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let subtask = find_scoped(&pool, subtask_id.into_inner(), user_id.0).await?;

    let task: TaskRef = sqlx::query_as("SELECT id, title FROM tasks WHERE id = $1")
        .bind(subtask.task_id)
        .fetch_one(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(SubtaskWithTask { subtask, task }))
}

/// Applies a partial update to a subtask.
#[put("/subtasks/{id}")]
pub async fn update_subtask(
    pool: web::Data<PgPool>,
    subtask_id: web::Path<i32>,
    payload: web::Json<SubtaskUpdateInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let subtask = find_scoped(&pool, subtask_id.into_inner(), user_id.0).await?;

    let updated: Subtask = sqlx::query_as(
        "UPDATE subtasks SET \
             title = COALESCE($1, title), \
             completed = COALESCE($2, completed), \
             position = COALESCE($3, position), \
             updated_at = now() \
         WHERE id = $4 \
         RETURNING id, task_id, title, completed, position, created_at, updated_at",
    )
    .bind(&payload.title)
    .bind(payload.completed)
    .bind(payload.position)
    .bind(subtask.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a subtask.
#[delete("/subtasks/{id}")]
pub async fn delete_subtask(
    pool: web::Data<PgPool>,
    subtask_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let subtask = find_scoped(&pool, subtask_id.into_inner(), user_id.0).await?;

    sqlx::query("DELETE FROM subtasks WHERE id = $1")
        .bind(subtask.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Flips the subtask's `completed` flag and returns the updated record.
#[patch("/subtasks/{id}/toggle")]
pub async fn toggle_subtask(
    pool: web::Data<PgPool>,
    subtask_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let subtask = find_scoped(&pool, subtask_id.into_inner(), user_id.0).await?;

    let updated: Subtask = sqlx::query_as(
        "UPDATE subtasks SET completed = NOT completed, updated_at = now() \
         WHERE id = $1 \
         RETURNING id, task_id, title, completed, position, created_at, updated_at",
    )
    .bind(subtask.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}
