use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{Comment, CommentResponse, CommentRow};

const ROW_SELECT: &str = "SELECT c.id, c.created_at, c.content, \
     u.email AS author_email, u.first_name AS author_first_name, u.last_name AS author_last_name \
     FROM comments c JOIN users u ON u.id = c.author_id";

pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Comment>, AppError> {
    let comment = sqlx::query_as::<_, Comment>(
        "SELECT id, task_id, author_id, content, created_at FROM comments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(comment)
}

/// Comments on a task, oldest first.
pub async fn for_task(pool: &PgPool, task_id: i32) -> Result<Vec<CommentResponse>, AppError> {
    let sql = format!("{} WHERE c.task_id = $1 ORDER BY c.created_at, c.id", ROW_SELECT);
    let rows = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(task_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(CommentResponse::from).collect())
}

pub async fn create(
    pool: &PgPool,
    task_id: i32,
    author_id: i32,
    content: &str,
) -> Result<CommentResponse, AppError> {
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO comments (task_id, author_id, content) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(task_id)
    .bind(author_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    let sql = format!("{} WHERE c.id = $1", ROW_SELECT);
    let row = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row.into())
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Comment not found".into()));
    }
    Ok(())
}
