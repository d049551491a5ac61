use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{User, UserSummary};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, created_at";

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {} FROM users WHERE LOWER(email) = LOWER($1)", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Inserts a new user. A duplicate email, including one that slipped past the
/// handler's pre-check, is reported as `BadRequest`.
pub async fn create(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User, AppError> {
    let sql = format!(
        "INSERT INTO users (email, password_hash, first_name, last_name) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::BadRequest("Email already exists".into())
            }
            _ => e.into(),
        })
}

/// Fails with `BadRequest` naming the first id in `ids` that has no user.
pub async fn ensure_exist(pool: &PgPool, ids: &[i32]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    match ids.iter().find(|id| !found.iter().any(|(f,)| f == *id)) {
        Some(missing) => Err(AppError::BadRequest(format!(
            "Invalid pk \"{}\" - user does not exist",
            missing
        ))),
        None => Ok(()),
    }
}

/// Members of a board, ordered by id.
pub async fn board_members(pool: &PgPool, board_id: i32) -> Result<Vec<UserSummary>, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT u.id, u.email, u.password_hash, u.first_name, u.last_name, u.created_at \
         FROM users u JOIN board_members m ON m.user_id = u.id \
         WHERE m.board_id = $1 ORDER BY u.id",
    )
    .bind(board_id)
    .fetch_all(pool)
    .await?;
    Ok(users.iter().map(UserSummary::from).collect())
}
