use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{tag::DEFAULT_COLOR, Tag, TagInput, TagUpdateInput, TagWithTasks, TaskRef},
    routes::tasks::find_owned,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

async fn find_tag(pool: &PgPool, tag_id: i32) -> Result<Tag, AppError> {
    let tag: Option<Tag> =
        sqlx::query_as("SELECT id, name, color, created_at, updated_at FROM tags WHERE id = $1")
            .bind(tag_id)
            .fetch_optional(pool)
            .await?;

    tag.ok_or_else(|| AppError::NotFound("Tag not found.".into()))
}

async fn tasks_for_tag(pool: &PgPool, tag_id: i32) -> Result<Vec<TaskRef>, AppError> {
    let tasks: Vec<TaskRef> = sqlx::query_as(
        "SELECT t.id, t.title FROM tasks t \
         JOIN task_tags tt ON tt.task_id = t.id \
         WHERE tt.tag_id = $1 ORDER BY t.id ASC",
    )
    .bind(tag_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Creates a tag. The namespace is global: tags are shared by all users
/// and the name is unique system-wide. The color defaults to #3B82F6.
#[post("/tags")]
pub async fn create_tag(
    pool: web::Data<PgPool>,
    payload: web::Json<TagInput>,
    _user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM tags WHERE name = $1")
        .bind(&payload.name)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Tag with this name already exists.".into()));
    }

    let color = payload.color.as_deref().unwrap_or(DEFAULT_COLOR);

    let tag: Tag = sqlx::query_as(
        "INSERT INTO tags (name, color) VALUES ($1, $2) \
         RETURNING id, name, color, created_at, updated_at",
    )
    .bind(&payload.name)
    .bind(color)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(tag))
}

/// Lists all tags ordered by name, each with the tasks it is attached to.
#[get("/tags")]
pub async fn list_tags(
    pool: web::Data<PgPool>,
    _user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tags: Vec<Tag> = sqlx::query_as(
        "SELECT id, name, color, created_at, updated_at FROM tags ORDER BY name ASC",
    )
    .fetch_all(&**pool)
    .await?;

    let mut result = Vec::with_capacity(tags.len());
    for tag in tags {
        let tasks = tasks_for_tag(&pool, tag.id).await?;
        result.push(TagWithTasks { tag, tasks });
    }

    Ok(HttpResponse::Ok().json(result))
}

/// Fetches a single tag with its attached tasks.
#[get("/tags/{id}")]
pub async fn get_tag(
    pool: web::Data<PgPool>,
    tag_id: web::Path<i32>,
    _user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tag = find_tag(&pool, tag_id.into_inner()).await?;
    let tasks = tasks_for_tag(&pool, tag.id).await?;

    Ok(HttpResponse::Ok().json(TagWithTasks { tag, tasks }))
}

/// Applies a partial update to a tag. Renaming onto a name already used by
/// a different tag is a conflict.
#[put("/tags/{id}")]
pub async fn update_tag(
    pool: web::Data<PgPool>,
    tag_id: web::Path<i32>,
    payload: web::Json<TagUpdateInput>,
    _user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let tag = find_tag(&pool, tag_id.into_inner()).await?;

    if let Some(name) = &payload.name {
        if name != &tag.name {
            let taken: Option<(i32,)> =
                sqlx::query_as("SELECT id FROM tags WHERE name = $1 AND id <> $2")
                    .bind(name)
                    .bind(tag.id)
                    .fetch_optional(&**pool)
                    .await?;
            if taken.is_some() {
                return Err(AppError::Conflict(
                    "Tag with this name already exists.".into(),
                ));
            }
        }
    }

    let updated: Tag = sqlx::query_as(
        "UPDATE tags SET \
             name = COALESCE($1, name), \
             color = COALESCE($2, color), \
             updated_at = now() \
         WHERE id = $3 \
         RETURNING id, name, color, created_at, updated_at",
    )
    .bind(&payload.name)
    .bind(&payload.color)
    .bind(tag.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a tag. Junction rows referencing it cascade away; tasks are
/// unaffected.
#[delete("/tags/{id}")]
pub async fn delete_tag(
    pool: web::Data<PgPool>,
    tag_id: web::Path<i32>,
    _user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(tag_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Tag not found.".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Attaches a tag to one of the user's tasks. Idempotent: re-attaching an
/// existing pair changes nothing and still succeeds.
#[post("/tasks/{task_id}/tags/{tag_id}")]
pub async fn attach_tag(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let (task_id, tag_id) = path.into_inner();

    let task = find_owned(&pool, task_id, user_id.0).await?;
    let tag = find_tag(&pool, tag_id).await?;

    sqlx::query("INSERT INTO task_tags (task_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(task.id)
        .bind(tag.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Tag attached to task." })))
}

/// Detaches a tag from one of the user's tasks. Detaching a pair that was
/// never attached is a no-op success.
#[delete("/tasks/{task_id}/tags/{tag_id}")]
pub async fn detach_tag(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let (task_id, tag_id) = path.into_inner();

    let task = find_owned(&pool, task_id, user_id.0).await?;
    let tag = find_tag(&pool, tag_id).await?;

    sqlx::query("DELETE FROM task_tags WHERE task_id = $1 AND tag_id = $2")
        .bind(task.id)
        .bind(tag.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Tag detached from task." })))
}
