use crate::{
    auth::AuthenticatedUserId,
    db,
    error::AppError,
    models::{BoardInput, BoardUpdate},
    permissions,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Lists the boards the caller owns or is a member of.
///
/// ## Responses:
/// - `200 OK`: JSON array of board summaries, newest first.
#[get("/boards/")]
pub async fn list_boards(
    pool: web::Data<PgPool>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let boards = db::boards::list_for_user(&pool, user.0).await?;
    Ok(HttpResponse::Ok().json(boards))
}

/// Creates a board owned by the caller.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters.
/// - `members` (optional): user ids to add. The caller is always added.
///
/// ## Responses:
/// - `201 Created`: the board summary.
/// - `400 Bad Request`: invalid title or unknown member id.
#[post("/boards/")]
pub async fn create_board(
    pool: web::Data<PgPool>,
    board_data: web::Json<BoardInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    board_data.validate()?;
    db::users::ensure_exist(&pool, &board_data.members).await?;

    let board = db::boards::create(&pool, user.0, &board_data.title, &board_data.members).await?;
    log::info!("user {} created board {}", user.0, board.id);

    let summary = db::boards::summary(&pool, board.id).await?;
    Ok(HttpResponse::Created().json(summary))
}

/// Returns a board with its owner, members and tasks.
///
/// ## Responses:
/// - `200 OK`: board detail.
/// - `403 Forbidden`: the caller does not belong to the board.
/// - `404 Not Found`: no such board.
#[get("/boards/{id}/")]
pub async fn get_board(
    pool: web::Data<PgPool>,
    board_id: web::Path<i32>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let board = permissions::board_for_member(&pool, board_id.into_inner(), user.0).await?;
    let detail = db::boards::detail(&pool, &board).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Updates the title and/or replaces the member list.
///
/// Users dropped from the member list lose their assignee/reviewer roles on
/// this board's tasks. The owner keeps access regardless of the list.
///
/// ## Responses:
/// - `200 OK`: the updated board detail.
/// - `400 Bad Request`: invalid title or unknown member id.
/// - `403 Forbidden`: the caller does not belong to the board.
/// - `404 Not Found`: no such board.
#[patch("/boards/{id}/")]
pub async fn update_board(
    pool: web::Data<PgPool>,
    board_id: web::Path<i32>,
    board_data: web::Json<BoardUpdate>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let board = permissions::board_for_member(&pool, board_id.into_inner(), user.0).await?;

    board_data.validate()?;
    if let Some(members) = &board_data.members {
        db::users::ensure_exist(&pool, members).await?;
    }

    db::boards::update(&pool, &board, &board_data).await?;

    let board = db::boards::find(&pool, board.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Board not found".into()))?;
    let detail = db::boards::detail(&pool, &board).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Deletes a board together with its tasks and comments. Owner only.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `403 Forbidden`: the caller is not the owner.
/// - `404 Not Found`: no such board.
#[delete("/boards/{id}/")]
pub async fn delete_board(
    pool: web::Data<PgPool>,
    board_id: web::Path<i32>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let board = db::boards::find(&pool, board_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Board not found".into()))?;

    permissions::require_board_owner(&board, user.0)?;
    db::boards::delete(&pool, board.id).await?;
    log::info!("user {} deleted board {}", user.0, board.id);

    Ok(HttpResponse::NoContent().finish())
}
