//! HTTP inbound adapter exposing the REST endpoints.
//!
//! [`configure`] registers every `/api` route together with the extractor
//! configuration, so the server and the tests wire the same surface.

pub mod auth;
pub mod cookies;
pub mod error;
pub mod gadgets;
pub mod health;
pub mod state;
pub mod users;

use actix_web::web;

pub use error::{ApiResult, json_config, path_config};

/// Mount the `/api` scope. Callers provide `web::Data<HttpState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(path_config()).service(
        web::scope("/api")
            .service(users::login)
            .service(users::refresh)
            .service(users::current_user)
            .service(users::logout)
            .service(gadgets::list_gadgets)
            .service(gadgets::create_gadget)
            // Registered before the `{id}` routes so the literal segment wins.
            .service(gadgets::bulk_delete_gadgets)
            .service(gadgets::get_gadget)
            .service(gadgets::replace_gadget)
            .service(gadgets::update_gadget)
            .service(gadgets::delete_gadget),
    );
}
