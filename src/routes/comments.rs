use crate::{
    auth::AuthenticatedUserId, db, error::AppError, models::CommentInput, permissions,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Lists the comments on a task, oldest first. Board members only.
#[get("/tasks/{task_id}/comments/")]
pub async fn list_comments(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let (task, _board) = permissions::task_for_member(&pool, task_id.into_inner(), user.0).await?;
    let comments = db::comments::for_task(&pool, task.id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Adds a comment authored by the caller. Board members only.
///
/// ## Responses:
/// - `201 Created`: `{id, created_at, author, content}`.
/// - `400 Bad Request`: empty content.
/// - `403 Forbidden`: the caller does not belong to the task's board.
/// - `404 Not Found`: no such task.
#[post("/tasks/{task_id}/comments/")]
pub async fn create_comment(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    comment_data: web::Json<CommentInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let (task, _board) = permissions::task_for_member(&pool, task_id.into_inner(), user.0).await?;
    comment_data.validate()?;

    let comment = db::comments::create(&pool, task.id, user.0, &comment_data.content).await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Deletes a comment. Only its author may do this.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `403 Forbidden`: the caller did not write the comment.
/// - `404 Not Found`: no such comment on this task.
#[delete("/tasks/{task_id}/comments/{comment_id}/")]
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let (task_id, comment_id) = path.into_inner();

    let comment = db::comments::find(&pool, comment_id)
        .await?
        .filter(|comment| comment.task_id == task_id)
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    permissions::require_comment_author(&comment, user.0)?;
    db::comments::delete(&pool, comment.id).await?;
    log::info!("user {} deleted comment {} on task {}", user.0, comment.id, task_id);

    Ok(HttpResponse::NoContent().finish())
}
