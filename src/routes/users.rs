use crate::{auth::AuthenticatedUserId, db, error::AppError, models::UserSummary};
use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct EmailCheckQuery {
    pub email: Option<String>,
}

/// Look up a registered user by email
///
/// Used by clients to resolve an email into a user id before adding someone
/// to a board.
///
/// ## Responses:
/// - `200 OK`: `{id, email, fullname}`.
/// - `400 Bad Request`: `email` missing or malformed.
/// - `404 Not Found`: no user with that email.
#[get("/email-check/")]
pub async fn email_check(
    pool: web::Data<PgPool>,
    query: web::Query<EmailCheckQuery>,
    _user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::BadRequest("The email parameter is missing".into()))?;

    if !validator::validate_email(email) {
        return Err(AppError::BadRequest("Invalid email format".into()));
    }

    let user = db::users::find_by_email(&pool, email)
        .await?
        .ok_or_else(|| AppError::NotFound("Email not found".into()))?;

    Ok(HttpResponse::Ok().json(UserSummary::from(&user)))
}
