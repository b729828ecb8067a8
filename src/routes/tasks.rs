use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{
        SubtaskSummary, TagSummary, Task, TaskInput, TaskQuery, TaskStatus, TaskUpdateInput,
        TaskWithRelations,
    },
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Resolves a task scoped to its owner. A task owned by someone else and a
/// nonexistent task are indistinguishable to the caller.
pub(crate) async fn find_owned(
    pool: &PgPool,
    task_id: i32,
    user_id: i32,
) -> Result<Task, AppError> {
    let task: Option<Task> = sqlx::query_as(
        "SELECT id, title, description, status, user_id, created_at, updated_at \
         FROM tasks WHERE id = $1 AND user_id = $2",
    )
    .bind(task_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    task.ok_or_else(|| AppError::NotFound("Task not found.".into()))
}

/// Attaches the task's tags and subtasks for the list/detail views.
async fn with_relations(pool: &PgPool, task: Task) -> Result<TaskWithRelations, AppError> {
    let tags: Vec<TagSummary> = sqlx::query_as(
        "SELECT t.id, t.name, t.color FROM tags t \
         JOIN task_tags tt ON tt.tag_id = t.id \
         WHERE tt.task_id = $1 ORDER BY t.name ASC",
    )
    .bind(task.id)
    .fetch_all(pool)
    .await?;

    let subtasks: Vec<SubtaskSummary> = sqlx::query_as(
        "SELECT id, title, completed, position FROM subtasks \
         WHERE task_id = $1 ORDER BY position ASC, created_at ASC, id ASC",
    )
    .bind(task.id)
    .fetch_all(pool)
    .await?;

    Ok(TaskWithRelations {
        task,
        tags,
        subtasks,
    })
}

fn parse_status(raw: &str, message: &str) -> Result<TaskStatus, AppError> {
    raw.parse::<TaskStatus>()
        .map_err(|_| AppError::BadRequest(message.into()))
}

/// Lists the authenticated user's tasks, newest first, each with its tags
/// and subtasks. An optional `?status=` filter is normalized upper-case and
/// must be a valid status.
#[get("/tasks")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    query: web::Query<TaskQuery>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let status_filter = match &query.status {
        Some(raw) => Some(parse_status(raw, "Invalid status filter.")?),
        None => None,
    };

    let tasks: Vec<Task> = match status_filter {
        Some(status) => {
            sqlx::query_as(
                "SELECT id, title, description, status, user_id, created_at, updated_at \
                 FROM tasks WHERE user_id = $1 AND status = $2 ORDER BY created_at DESC",
            )
            .bind(user_id.0)
            .bind(status)
            .fetch_all(&**pool)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT id, title, description, status, user_id, created_at, updated_at \
                 FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
            )
            .bind(user_id.0)
            .fetch_all(&**pool)
            .await?
        }
    };

    let mut result = Vec::with_capacity(tasks.len());
    for task in tasks {
        result.push(with_relations(&pool, task).await?);
    }

    Ok(HttpResponse::Ok().json(result))
}

/// Creates a task owned by the authenticated user. `status` defaults to
/// PENDING when omitted.
#[post("/tasks")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    payload: web::Json<TaskInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let status = match &payload.status {
        Some(raw) => parse_status(raw, "Invalid status.")?,
        None => TaskStatus::Pending,
    };

    let task: Task = sqlx::query_as(
        "INSERT INTO tasks (title, description, status, user_id) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, title, description, status, user_id, created_at, updated_at",
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(status)
    .bind(user_id.0)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Fetches one of the user's tasks with its tags and subtasks.
#[get("/tasks/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task = find_owned(&pool, task_id.into_inner(), user_id.0).await?;
    let task = with_relations(&pool, task).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Applies a partial update to one of the user's tasks. Only supplied
/// fields change; a supplied status is normalized and validated.
#[put("/tasks/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    payload: web::Json<TaskUpdateInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let status = match &payload.status {
        Some(raw) => Some(parse_status(raw, "Invalid status.")?),
        None => None,
    };

    let task_id = task_id.into_inner();
    find_owned(&pool, task_id, user_id.0).await?;

    let task: Task = sqlx::query_as(
        "UPDATE tasks SET \
             title = COALESCE($1, title), \
             description = COALESCE($2, description), \
             status = COALESCE($3, status), \
             updated_at = now() \
         WHERE id = $4 AND user_id = $5 \
         RETURNING id, title, description, status, user_id, created_at, updated_at",
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(status)
    .bind(task_id)
    .bind(user_id.0)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the user's tasks. Subtasks and tag associations go with
/// it through the schema's cascade rules.
#[delete("/tasks/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id.into_inner())
        .bind(user_id.0)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found.".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
