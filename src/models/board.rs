use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::fields::{non_null, non_null_trimmed, trimmed};
use super::task::TaskResponse;
use super::user::UserSummary;

/// A row of the `boards` table.
#[derive(Debug, Clone, FromRow)]
pub struct Board {
    pub id: i32,
    pub title: String,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload of `POST /api/boards/`.
#[derive(Debug, Deserialize, Validate)]
pub struct BoardInput {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Ids of users to add as members. The creator is always added.
    #[serde(default)]
    pub members: Vec<i32>,
}

/// Payload of `PATCH /api/boards/{id}/`. Absent fields are left unchanged;
/// `members` replaces the whole member list.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BoardUpdate {
    #[serde(default, deserialize_with = "non_null_trimmed")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub members: Option<Vec<i32>>,
}

/// A board as shown in the board list, with its counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BoardSummary {
    pub id: i32,
    pub title: String,
    pub member_count: i64,
    pub ticket_count: i64,
    pub tasks_to_do_count: i64,
    pub tasks_high_prio_count: i64,
    pub owner_id: i32,
}

/// A board with its owner, members and tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardDetail {
    pub id: i32,
    pub title: String,
    pub owner_data: UserSummary,
    pub members_data: Vec<UserSummary>,
    pub tasks: Vec<TaskResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_input_validation() {
        let input: BoardInput = serde_json::from_str(r#"{"title": "Sprint 12"}"#).unwrap();
        assert!(input.validate().is_ok());
        assert!(input.members.is_empty());

        let input = BoardInput {
            title: String::new(),
            members: vec![],
        };
        assert!(input.validate().is_err());

        let input = BoardInput {
            title: "x".repeat(201),
            members: vec![],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_board_update_is_partial() {
        let update: BoardUpdate = serde_json::from_str(r#"{"members": [1, 2]}"#).unwrap();
        assert!(update.title.is_none());
        assert_eq!(update.members, Some(vec![1, 2]));
        assert!(update.validate().is_ok());

        let update: BoardUpdate = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(update.validate().is_err());

        assert!(serde_json::from_str::<BoardUpdate>(r#"{"title": null}"#).is_err());
        assert!(serde_json::from_str::<BoardUpdate>(r#"{"members": null}"#).is_err());
    }

    #[test]
    fn test_board_titles_are_trimmed() {
        let input: BoardInput = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert!(input.validate().is_err());

        let input: BoardInput = serde_json::from_str(r#"{"title": " Sprint 12 "}"#).unwrap();
        assert_eq!(input.title, "Sprint 12");

        let update: BoardUpdate = serde_json::from_str(r#"{"title": "\t"}"#).unwrap();
        assert!(update.validate().is_err());
    }
}
