pub mod auth;
pub mod boards;
pub mod comments;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::error::{json_error_handler, query_error_handler};

/// Registers every `/api` route. Mount inside `web::scope("/api")` wrapped by
/// `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(auth::register)
        .service(auth::login)
        .service(users::email_check)
        .service(boards::list_boards)
        .service(boards::create_board)
        .service(boards::get_board)
        .service(boards::update_board)
        .service(boards::delete_board)
        // Literal task paths must be registered before `/tasks/{id}/`.
        .service(tasks::assigned_to_me)
        .service(tasks::reviewing)
        .service(tasks::create_task)
        .service(tasks::get_task)
        .service(tasks::update_task)
        .service(tasks::delete_task)
        .service(comments::list_comments)
        .service(comments::create_comment)
        .service(comments::delete_comment);
}
