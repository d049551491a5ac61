use crate::{
    auth::AuthenticatedUserId,
    db,
    error::AppError,
    models::{TaskInput, TaskUpdate},
    permissions,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Creates a task on a board the caller belongs to.
///
/// The caller is recorded as the task's creator. `status` defaults to
/// `to-do` and `priority` to `medium`.
///
/// ## Request Body:
/// - `board`: id of the board.
/// - `title`: 1 to 200 characters.
/// - `description`, `status`, `priority`, `assignee_id`, `reviewer_id`,
///   `due_date` (`YYYY-MM-DD`): optional.
///
/// ## Responses:
/// - `201 Created`: the task.
/// - `400 Bad Request`: invalid fields, or an assignee/reviewer outside the board.
/// - `403 Forbidden`: the caller does not belong to the board.
/// - `404 Not Found`: no such board.
#[post("/tasks/")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let board = permissions::board_for_member(&pool, task_data.board, user.0).await?;
    permissions::ensure_assignable(
        &pool,
        &board,
        &[
            ("assignee_id", task_data.assignee_id),
            ("reviewer_id", task_data.reviewer_id),
        ],
    )
    .await?;

    let task_id = db::tasks::create(&pool, &task_data, user.0).await?;
    log::info!("user {} created task {} on board {}", user.0, task_id, board.id);

    let task = db::tasks::response(&pool, task_id).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Tasks assigned to the caller, across all boards.
#[get("/tasks/assigned-to-me/")]
pub async fn assigned_to_me(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = db::tasks::assigned_to(&pool, user.0).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Tasks the caller reviews, across all boards.
#[get("/tasks/reviewing/")]
pub async fn reviewing(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = db::tasks::reviewed_by(&pool, user.0).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Returns a single task. Board members only.
#[get("/tasks/{id}/")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let (task, _board) = permissions::task_for_member(&pool, task_id.into_inner(), user.0).await?;
    let task = db::tasks::response(&pool, task.id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task. Board members only.
///
/// Fields left out of the body keep their value; `null` clears `description`,
/// `assignee_id`, `reviewer_id` and `due_date`. The board cannot be changed.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: invalid fields, or an assignee/reviewer outside the board.
/// - `403 Forbidden`: the caller does not belong to the task's board.
/// - `404 Not Found`: no such task.
#[patch("/tasks/{id}/")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskUpdate>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let (task, board) = permissions::task_for_member(&pool, task_id.into_inner(), user.0).await?;

    task_data.validate()?;
    permissions::ensure_assignable(
        &pool,
        &board,
        &[
            ("assignee_id", task_data.assignee_id.flatten()),
            ("reviewer_id", task_data.reviewer_id.flatten()),
        ],
    )
    .await?;

    db::tasks::update(&pool, &task, &task_data).await?;

    let task = db::tasks::response(&pool, task.id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task. Only its creator or the board owner may do this.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `403 Forbidden`: the caller is neither creator nor board owner.
/// - `404 Not Found`: no such task.
#[delete("/tasks/{id}/")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task = db::tasks::find(&pool, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    let board = db::boards::find(&pool, task.board_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Board not found".into()))?;

    permissions::require_task_deleter(&task, &board, user.0)?;
    db::tasks::delete(&pool, task.id).await?;
    log::info!("user {} deleted task {}", user.0, task.id);

    Ok(HttpResponse::NoContent().finish())
}
