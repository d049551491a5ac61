//! Access rules shared by the board, task and comment handlers.
//!
//! A user *belongs* to a board when they own it or are listed as a member.
//! Lookups return 404 for a missing row before any 403 for a denied caller.

use sqlx::PgPool;

use crate::db;
use crate::error::AppError;
use crate::models::{Board, Comment, Task};

/// Loads a board the caller belongs to.
pub async fn board_for_member(pool: &PgPool, board_id: i32, user_id: i32) -> Result<Board, AppError> {
    let board = db::boards::find(pool, board_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Board not found".into()))?;

    if !db::boards::has_member(pool, &board, user_id).await? {
        log::warn!("user {} denied access to board {}", user_id, board_id);
        return Err(AppError::Forbidden("You are not a member of this board".into()));
    }
    Ok(board)
}

/// Loads a task together with its board; the caller must belong to the board.
pub async fn task_for_member(
    pool: &PgPool,
    task_id: i32,
    user_id: i32,
) -> Result<(Task, Board), AppError> {
    let task = db::tasks::find(pool, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    let board = board_for_member(pool, task.board_id, user_id).await?;
    Ok((task, board))
}

pub fn require_board_owner(board: &Board, user_id: i32) -> Result<(), AppError> {
    if board.owner_id != user_id {
        return Err(AppError::Forbidden("Only the board owner may do this".into()));
    }
    Ok(())
}

/// A task may be deleted by its creator or by the owner of its board.
pub fn require_task_deleter(task: &Task, board: &Board, user_id: i32) -> Result<(), AppError> {
    if task.created_by == Some(user_id) || board.owner_id == user_id {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Only the task creator or the board owner may delete this task".into(),
    ))
}

pub fn require_comment_author(comment: &Comment, user_id: i32) -> Result<(), AppError> {
    if comment.author_id != user_id {
        return Err(AppError::Forbidden("Only the author may delete this comment".into()));
    }
    Ok(())
}

/// Checks that every assigned user (`assignee_id`, `reviewer_id`, ...) exists
/// and belongs to `board`. Unset roles are skipped.
pub async fn ensure_assignable(
    pool: &PgPool,
    board: &Board,
    roles: &[(&str, Option<i32>)],
) -> Result<(), AppError> {
    for (field, user_id) in roles {
        let Some(user_id) = *user_id else { continue };

        if db::users::find_by_id(pool, user_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "{}: user {} does not exist",
                field, user_id
            )));
        }
        if !db::boards::has_member(pool, board, user_id).await? {
            return Err(AppError::BadRequest(format!(
                "{}: user {} must be a member of the board",
                field, user_id
            )));
        }
    }
    Ok(())
}
