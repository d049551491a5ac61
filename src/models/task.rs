use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::fields::{non_null, non_null_trimmed, present, trimmed};
use super::user::{display_name, UserSummary};

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Represents the column a task sits in.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    ToDo,
    /// Being worked on.
    InProgress,
    /// Waiting for the reviewer.
    Review,
    /// Finished.
    Done,
}

/// A row of the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: i32,
    pub board_id: i32,
    /// `None` once the creating user has been deleted.
    pub created_by: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<i32>,
    pub reviewer_id: Option<i32>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload of `POST /api/tasks/`.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    /// Id of the board the task is created on.
    pub board: i32,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub priority: TaskPriority,

    pub assignee_id: Option<i32>,

    pub reviewer_id: Option<i32>,

    /// Calendar date, `YYYY-MM-DD`.
    pub due_date: Option<NaiveDate>,
}

/// Payload of `PATCH /api/tasks/{id}/`.
///
/// The outer `Option` tells whether a field was sent at all; for nullable
/// columns the inner `Option` carries an explicit `null`. `title`, `status`
/// and `priority` may be omitted but not set to `null`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[serde(default, deserialize_with = "non_null_trimmed")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "non_null")]
    pub status: Option<TaskStatus>,

    #[serde(default, deserialize_with = "non_null")]
    pub priority: Option<TaskPriority>,

    #[serde(default, deserialize_with = "present")]
    pub assignee_id: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present")]
    pub reviewer_id: Option<Option<i32>>,

    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// A task joined with its assignee, reviewer and comment count.
/// Produced by the queries in `db::tasks`.
#[derive(Debug, FromRow)]
pub struct TaskRow {
    pub id: i32,
    pub board_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub assignee_id: Option<i32>,
    pub assignee_email: Option<String>,
    pub assignee_first_name: Option<String>,
    pub assignee_last_name: Option<String>,
    pub reviewer_id: Option<i32>,
    pub reviewer_email: Option<String>,
    pub reviewer_first_name: Option<String>,
    pub reviewer_last_name: Option<String>,
    pub comments_count: i64,
}

/// The task representation returned by every task endpoint and embedded in
/// board details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: i32,
    pub board: i32,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: Option<UserSummary>,
    pub reviewer: Option<UserSummary>,
    pub due_date: Option<NaiveDate>,
    pub comments_count: i64,
}

fn joined_user(
    id: Option<i32>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Option<UserSummary> {
    let id = id?;
    let email = email.unwrap_or_default();
    let fullname = display_name(
        first_name.as_deref().unwrap_or_default(),
        last_name.as_deref().unwrap_or_default(),
        &email,
    );
    Some(UserSummary {
        id,
        email,
        fullname,
    })
}

impl From<TaskRow> for TaskResponse {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            board: row.board_id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            status: row.status,
            priority: row.priority,
            assignee: joined_user(
                row.assignee_id,
                row.assignee_email,
                row.assignee_first_name,
                row.assignee_last_name,
            ),
            reviewer: joined_user(
                row.reviewer_id,
                row.reviewer_email,
                row.reviewer_first_name,
                row.reviewer_last_name,
            ),
            due_date: row.due_date,
            comments_count: row.comments_count,
        }
    }
}
