use crate::{
    auth::{hash_password, AuthenticatedUserId},
    error::AppError,
    models::{RegisterRequest, User},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Registers a new user account. Public.
///
/// The email address is unique across the system; a duplicate registration
/// is refused with 409 and leaves the existing record untouched. The
/// password is stored only as a bcrypt hash.
#[post("/users")]
pub async fn register(
    pool: web::Data<PgPool>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Email already in use.".into()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user: User = sqlx::query_as(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
         RETURNING id, name, email, created_at",
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(user))
}

/// Returns the authenticated user's own record.
#[get("/me")]
pub async fn me(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let user: Option<User> =
        sqlx::query_as("SELECT id, name, email, created_at FROM users WHERE id = $1")
            .bind(user_id.0)
            .fetch_optional(&**pool)
            .await?;

    match user {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(AppError::NotFound("User not found.".into())),
    }
}
