use sqlx::{PgPool, Postgres, Transaction};

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskResponse, TaskRow, TaskUpdate};

const TASK_COLUMNS: &str = "id, board_id, created_by, title, description, status, priority, \
     assignee_id, reviewer_id, due_date, created_at, updated_at";

const ROW_SELECT: &str = "SELECT t.id, t.board_id, t.title, t.description, t.status, t.priority, \
     t.due_date, \
     a.id AS assignee_id, a.email AS assignee_email, \
     a.first_name AS assignee_first_name, a.last_name AS assignee_last_name, \
     r.id AS reviewer_id, r.email AS reviewer_email, \
     r.first_name AS reviewer_first_name, r.last_name AS reviewer_last_name, \
     (SELECT COUNT(*) FROM comments c WHERE c.task_id = t.id) AS comments_count \
     FROM tasks t \
     LEFT JOIN users a ON a.id = t.assignee_id \
     LEFT JOIN users r ON r.id = t.reviewer_id";

pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Task>, AppError> {
    let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
    let task = sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(task)
}

/// The API representation of one task.
pub async fn response(pool: &PgPool, id: i32) -> Result<TaskResponse, AppError> {
    let sql = format!("{} WHERE t.id = $1", ROW_SELECT);
    let row = sqlx::query_as::<_, TaskRow>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row.into())
}

async fn responses_where(
    pool: &PgPool,
    condition: &str,
    value: i32,
) -> Result<Vec<TaskResponse>, AppError> {
    let sql = format!("{} WHERE {} = $1 ORDER BY t.id DESC", ROW_SELECT, condition);
    let rows = sqlx::query_as::<_, TaskRow>(&sql)
        .bind(value)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(TaskResponse::from).collect())
}

pub async fn for_board(pool: &PgPool, board_id: i32) -> Result<Vec<TaskResponse>, AppError> {
    responses_where(pool, "t.board_id", board_id).await
}

pub async fn assigned_to(pool: &PgPool, user_id: i32) -> Result<Vec<TaskResponse>, AppError> {
    responses_where(pool, "t.assignee_id", user_id).await
}

pub async fn reviewed_by(pool: &PgPool, user_id: i32) -> Result<Vec<TaskResponse>, AppError> {
    responses_where(pool, "t.reviewer_id", user_id).await
}

/// Share-locks the board row until `tx` ends. `boards::update` takes the
/// same row `FOR UPDATE` before replacing members, so an assignment and a
/// member change on one board never interleave.
async fn lock_board(tx: &mut Transaction<'_, Postgres>, board_id: i32) -> Result<(), AppError> {
    sqlx::query("SELECT id FROM boards WHERE id = $1 FOR SHARE")
        .bind(board_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Board not found".into()))?;
    Ok(())
}

/// Checks, under the board lock, that each set role belongs to the board.
async fn ensure_roles_on_board(
    tx: &mut Transaction<'_, Postgres>,
    board_id: i32,
    roles: &[(&str, Option<i32>)],
) -> Result<(), AppError> {
    for (field, user_id) in roles {
        let Some(user_id) = *user_id else { continue };

        let (belongs,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM boards WHERE id = $1 AND owner_id = $2) \
             OR EXISTS (SELECT 1 FROM board_members WHERE board_id = $1 AND user_id = $2)",
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
        if !belongs {
            return Err(AppError::BadRequest(format!(
                "{}: user {} must be a member of the board",
                field, user_id
            )));
        }
    }
    Ok(())
}

/// Inserts a task created by `created_by` and returns its id.
pub async fn create(pool: &PgPool, input: &TaskInput, created_by: i32) -> Result<i32, AppError> {
    let mut tx = pool.begin().await?;
    lock_board(&mut tx, input.board).await?;
    ensure_roles_on_board(
        &mut tx,
        input.board,
        &[("assignee_id", input.assignee_id), ("reviewer_id", input.reviewer_id)],
    )
    .await?;

    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO tasks \
         (board_id, created_by, title, description, status, priority, assignee_id, reviewer_id, due_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
    )
    .bind(input.board)
    .bind(created_by)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.status)
    .bind(input.priority)
    .bind(input.assignee_id)
    .bind(input.reviewer_id)
    .bind(input.due_date)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

/// Writes `update` over the stored task. Fields absent from the update keep
/// the value the row holds at write time, not the one in `task`.
pub async fn update(pool: &PgPool, task: &Task, update: &TaskUpdate) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    lock_board(&mut tx, task.board_id).await?;

    let sql = format!("SELECT {} FROM tasks WHERE id = $1 FOR UPDATE", TASK_COLUMNS);
    let task = sqlx::query_as::<_, Task>(&sql)
        .bind(task.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    ensure_roles_on_board(
        &mut tx,
        task.board_id,
        &[
            ("assignee_id", update.assignee_id.flatten()),
            ("reviewer_id", update.reviewer_id.flatten()),
        ],
    )
    .await?;

    let title = update.title.as_ref().unwrap_or(&task.title);
    let description = update.description.as_ref().unwrap_or(&task.description);
    let status = update.status.unwrap_or(task.status);
    let priority = update.priority.unwrap_or(task.priority);
    let assignee_id = update.assignee_id.unwrap_or(task.assignee_id);
    let reviewer_id = update.reviewer_id.unwrap_or(task.reviewer_id);
    let due_date = update.due_date.unwrap_or(task.due_date);

    sqlx::query(
        "UPDATE tasks SET title = $1, description = $2, status = $3, priority = $4, \
         assignee_id = $5, reviewer_id = $6, due_date = $7, updated_at = NOW() \
         WHERE id = $8",
    )
    .bind(title)
    .bind(description)
    .bind(status)
    .bind(priority)
    .bind(assignee_id)
    .bind(reviewer_id)
    .bind(due_date)
    .bind(task.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(())
}
