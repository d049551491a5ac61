pub mod board;
pub mod comment;
mod fields;
pub mod task;
pub mod user;

pub use board::{Board, BoardDetail, BoardInput, BoardSummary, BoardUpdate};
pub use comment::{Comment, CommentInput, CommentResponse, CommentRow};
pub use task::{Task, TaskInput, TaskPriority, TaskResponse, TaskRow, TaskStatus, TaskUpdate};
pub use user::{User, UserSummary};
