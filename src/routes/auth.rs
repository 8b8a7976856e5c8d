use crate::{
    auth::{hash_password, issue_token, verify_password, SigninRequest, SignupRequest, TokenResponse},
    error::AppError,
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new account.
///
/// Validates the payload, rejects duplicate emails, stores the bcrypt
/// hash, and answers with a freshly issued token.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<PgPool>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&signup_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(&signup_data.password)?;

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&signup_data.username)
    .bind(&signup_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    let token = issue_token(user_id)?;

    Ok(HttpResponse::Created().json(TokenResponse { token }))
}

/// Sign an existing user in.
///
/// An unknown email and a wrong password both answer 403, with distinct
/// messages.
#[post("/signin")]
pub async fn signin(
    pool: web::Data<PgPool>,
    signin_data: web::Json<SigninRequest>,
) -> Result<impl Responder, AppError> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(&signin_data.email)
    .fetch_optional(&**pool)
    .await?;

    let user = match user {
        Some(user) => user,
        None => return Err(AppError::Forbidden("User not found".into())),
    };

    if verify_password(&signin_data.password, &user.password_hash)? {
        let token = issue_token(user.id)?;
        Ok(HttpResponse::Ok().json(TokenResponse { token }))
    } else {
        Err(AppError::Forbidden("Incorrect Credentials".into()))
    }
}
