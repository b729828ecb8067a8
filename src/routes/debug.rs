use crate::{
    auth::hash_password,
    config::Config,
    db,
    error::AppError,
    models::{SubtaskSummary, User},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::{FromRow, PgPool};

fn ensure_enabled(config: &Config) -> Result<(), AppError> {
    if config.is_production() {
        return Err(AppError::Forbidden("Debug endpoints are disabled.".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize, FromRow)]
struct DebugUser {
    id: i32,
    name: String,
    email: String,
}

#[derive(Debug, Serialize, FromRow)]
struct DebugTask {
    id: i32,
    title: String,
    description: String,
    status: crate::models::TaskStatus,
    user_id: i32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct DebugTaskView {
    #[serde(flatten)]
    task: DebugTask,
    subtasks: Vec<SubtaskSummary>,
}

/// Dumps all users and tasks (with subtasks). Development only.
#[get("/debug/data")]
pub async fn data(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    ensure_enabled(&config)?;

    let users: Vec<DebugUser> =
        sqlx::query_as("SELECT id, name, email FROM users ORDER BY id ASC")
            .fetch_all(&**pool)
            .await?;

    let tasks: Vec<DebugTask> = sqlx::query_as(
        "SELECT id, title, description, status, user_id, created_at FROM tasks ORDER BY id ASC",
    )
    .fetch_all(&**pool)
    .await?;

    let mut task_views = Vec::with_capacity(tasks.len());
    for task in tasks {
        let subtasks: Vec<SubtaskSummary> = sqlx::query_as(
            "SELECT id, title, completed, position FROM subtasks \
             WHERE task_id = $1 ORDER BY position ASC, id ASC",
        )
        .bind(task.id)
        .fetch_all(&**pool)
        .await?;
        task_views.push(DebugTaskView { task, subtasks });
    }

    Ok(HttpResponse::Ok().json(json!({
        "users": users,
        "tasks": task_views
    })))
}

/// Drops and recreates the schema, then seeds a default user. Development
/// only.
#[post("/debug/reset")]
pub async fn reset(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    ensure_enabled(&config)?;

    db::reset_schema(&pool).await?;

    let password_hash = hash_password("123456")?;
    let user: User = sqlx::query_as(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
         RETURNING id, name, email, created_at",
    )
    .bind("Admin")
    .bind("admin@local.test")
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Database reset done. Default user created.",
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email
        }
    })))
}
