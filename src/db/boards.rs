use sqlx::{PgPool, Postgres, Transaction};

use crate::error::AppError;
use crate::models::{Board, BoardDetail, BoardSummary, BoardUpdate};

use super::{tasks, users};

const SUMMARY_SELECT: &str = "SELECT b.id, b.title, b.owner_id, \
     (SELECT COUNT(*) FROM board_members m WHERE m.board_id = b.id) AS member_count, \
     (SELECT COUNT(*) FROM tasks t WHERE t.board_id = b.id) AS ticket_count, \
     (SELECT COUNT(*) FROM tasks t WHERE t.board_id = b.id AND t.status = 'to-do') AS tasks_to_do_count, \
     (SELECT COUNT(*) FROM tasks t WHERE t.board_id = b.id AND t.priority = 'high') AS tasks_high_prio_count \
     FROM boards b";

pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Board>, AppError> {
    let board = sqlx::query_as::<_, Board>(
        "SELECT id, title, owner_id, created_at FROM boards WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(board)
}

/// Boards `user_id` owns or is a member of, newest first.
pub async fn list_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<BoardSummary>, AppError> {
    let sql = format!(
        "{} WHERE b.owner_id = $1 \
         OR EXISTS (SELECT 1 FROM board_members m WHERE m.board_id = b.id AND m.user_id = $1) \
         ORDER BY b.id DESC",
        SUMMARY_SELECT
    );
    let boards = sqlx::query_as::<_, BoardSummary>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(boards)
}

pub async fn summary(pool: &PgPool, id: i32) -> Result<BoardSummary, AppError> {
    let sql = format!("{} WHERE b.id = $1", SUMMARY_SELECT);
    let board = sqlx::query_as::<_, BoardSummary>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(board)
}

pub async fn detail(pool: &PgPool, board: &Board) -> Result<BoardDetail, AppError> {
    let owner = users::find_by_id(pool, board.owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Board owner not found".into()))?;

    Ok(BoardDetail {
        id: board.id,
        title: board.title.clone(),
        owner_data: (&owner).into(),
        members_data: users::board_members(pool, board.id).await?,
        tasks: tasks::for_board(pool, board.id).await?,
    })
}

async fn insert_members(
    tx: &mut Transaction<'_, Postgres>,
    board_id: i32,
    members: &[i32],
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO board_members (board_id, user_id) \
         SELECT $1, UNNEST($2::int4[]) ON CONFLICT DO NOTHING",
    )
    .bind(board_id)
    .bind(members)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Creates a board owned by `owner_id`. The owner is added to the member list
/// alongside `members`.
pub async fn create(
    pool: &PgPool,
    owner_id: i32,
    title: &str,
    members: &[i32],
) -> Result<Board, AppError> {
    let mut tx = pool.begin().await?;

    let board = sqlx::query_as::<_, Board>(
        "INSERT INTO boards (title, owner_id) VALUES ($1, $2) \
         RETURNING id, title, owner_id, created_at",
    )
    .bind(title)
    .bind(owner_id)
    .fetch_one(&mut *tx)
    .await?;

    let mut all_members = members.to_vec();
    all_members.push(owner_id);
    insert_members(&mut tx, board.id, &all_members).await?;

    tx.commit().await?;
    Ok(board)
}

/// Applies a partial update. Replacing the member list also clears the
/// assignee and reviewer of every task on the board whose user no longer
/// belongs to it.
pub async fn update(pool: &PgPool, board: &Board, update: &BoardUpdate) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    if let Some(title) = &update.title {
        sqlx::query("UPDATE boards SET title = $1 WHERE id = $2")
            .bind(title)
            .bind(board.id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(members) = &update.members {
        sqlx::query("SELECT id FROM boards WHERE id = $1 FOR UPDATE")
            .bind(board.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM board_members WHERE board_id = $1")
            .bind(board.id)
            .execute(&mut *tx)
            .await?;
        insert_members(&mut tx, board.id, members).await?;

        for column in ["assignee_id", "reviewer_id"] {
            let sql = format!(
                "UPDATE tasks SET {col} = NULL, updated_at = NOW() \
                 WHERE board_id = $1 AND {col} IS NOT NULL AND {col} <> $2 \
                 AND {col} NOT IN (SELECT user_id FROM board_members WHERE board_id = $1)",
                col = column
            );
            let cleared = sqlx::query(&sql)
                .bind(board.id)
                .bind(board.owner_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            if cleared > 0 {
                log::info!("board {}: cleared {} on {} task(s)", board.id, column, cleared);
            }
        }
    }

    tx.commit().await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM boards WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Board not found".into()));
    }
    Ok(())
}

/// True when `user_id` owns the board or is listed as a member.
pub async fn has_member(pool: &PgPool, board: &Board, user_id: i32) -> Result<bool, AppError> {
    if board.owner_id == user_id {
        return Ok(true);
    }
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM board_members WHERE board_id = $1 AND user_id = $2)",
    )
    .bind(board.id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}
