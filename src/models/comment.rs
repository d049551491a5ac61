use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use super::user::display_name;

/// A row of the `comments` table.
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i32,
    pub task_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Payload of `POST /api/tasks/{task_id}/comments/`.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(custom = "not_blank")]
    pub content: String,
}

fn not_blank(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// A comment joined with its author's names.
#[derive(Debug, FromRow)]
pub struct CommentRow {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub author_email: String,
    pub author_first_name: String,
    pub author_last_name: String,
}

/// The comment representation; `author` is the author's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub author: String,
    pub content: String,
}

impl From<CommentRow> for CommentResponse {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            author: display_name(&row.author_first_name, &row.author_last_name, &row.author_email),
            content: row.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_comments_rejected() {
        let input = CommentInput {
            content: "  \n".into(),
        };
        assert!(input.validate().is_err());

        let input = CommentInput {
            content: "Looks good to me".into(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_author_falls_back_to_email() {
        let row = CommentRow {
            id: 1,
            created_at: Utc::now(),
            content: "ping".into(),
            author_email: "quiet@example.com".into(),
            author_first_name: String::new(),
            author_last_name: String::new(),
        };
        assert_eq!(CommentResponse::from(row).author, "quiet@example.com");
    }
}
