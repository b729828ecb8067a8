use crate::{
    auth::{verify_password, LoginRequest, SessionResponse, SessionUser, TokenManager},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: i32,
    name: String,
    email: String,
    password_hash: String,
}

/// Authenticates a user and issues a bearer token. Public.
///
/// Unknown email and wrong password answer identically, so the response
/// does not reveal which of the two was wrong.
#[post("/sessions")]
pub async fn login(
    pool: web::Data<PgPool>,
    manager: web::Data<TokenManager>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let user: Option<CredentialRow> =
        sqlx::query_as("SELECT id, name, email, password_hash FROM users WHERE email = $1")
            .bind(&payload.email)
            .fetch_optional(&**pool)
            .await?;

    let user = match user {
        Some(user) => user,
        None => return Err(AppError::Unauthorized("Invalid credentials.".into())),
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials.".into()));
    }

    let token = manager.issue(user.id)?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        user: SessionUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
        token,
    }))
}
