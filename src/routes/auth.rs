use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, LoginRequest,
        RegistrationRequest,
    },
    config::Config,
    db,
    error::AppError,
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

fn auth_response(user: &User, config: &Config) -> Result<AuthResponse, AppError> {
    Ok(AuthResponse {
        token: generate_token(user.id, config)?,
        fullname: user.fullname(),
        email: user.email.clone(),
        user_id: user.id,
    })
}

/// Register a new user
///
/// Creates the account and returns a token so the client is logged in right away.
///
/// ## Responses:
/// - `201 Created`: `AuthResponse`.
/// - `400 Bad Request`: invalid fields, mismatched passwords or an email that is taken.
#[post("/registration/")]
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    register_data: web::Json<RegistrationRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    if register_data.password != register_data.repeated_password {
        return Err(AppError::BadRequest(
            "repeated_password: Passwords do not match".into(),
        ));
    }

    if db::users::find_by_email(&pool, &register_data.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("email: Email already exists".into()));
    }

    let password_hash = hash_password(&register_data.password)?;
    let (first_name, last_name) = register_data.name_parts();

    let user = db::users::create(
        &pool,
        register_data.email.trim(),
        &password_hash,
        &first_name,
        &last_name,
    )
    .await?;
    log::info!("registered user {}", user.id);

    Ok(HttpResponse::Created().json(auth_response(&user, &config)?))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `AuthResponse`.
/// - `400 Bad Request`: email or password missing.
/// - `401 Unauthorized`: unknown email or wrong password.
#[post("/login/")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    if login_data.email.trim().is_empty() || login_data.password.is_empty() {
        return Err(AppError::BadRequest("Email or password is incorrect".into()));
    }

    let user = db::users::find_by_email(&pool, login_data.email.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    if !verify_password(&login_data.password, &user.password_hash)? {
        log::warn!("failed login for user {}", user.id);
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    Ok(HttpResponse::Ok().json(auth_response(&user, &config)?))
}
