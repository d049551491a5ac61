#![doc = "The `boardforge` library crate."]
#![doc = ""]
#![doc = "Kanban backend: users register and log in, create boards, share them with"]
#![doc = "other users, and track tasks and comments on those boards. The binary in"]
#![doc = "`main.rs` wires these modules into an actix-web server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod permissions;
pub mod routes;

use actix_web::web;

pub use crate::config::Config;
pub use crate::error::AppError;

/// Registers the full route table: `/health` in the open and everything else
/// under `/api` behind `AuthMiddleware`.
///
/// The caller provides `web::Data<PgPool>` and `web::Data<Config>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::health::health).service(
        web::scope("/api")
            .wrap(auth::AuthMiddleware)
            .configure(routes::config),
    );
}
