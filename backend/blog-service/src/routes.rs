//! Route configuration
//!
//! Shared by the binary and the integration tests so both serve the same table.

use crate::error::AppError;
use crate::handlers;
use crate::middleware::JwtAuthMiddleware;
use actix_web::{guard, web};

/// Configure all routes for the application
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .route("/health", web::get().to(handlers::health_check))
        .route("/register", web::post().to(handlers::register))
        .route("/login", web::post().to(handlers::login))
        // Mutations require a verified token
        .service(
            web::scope("/blog")
                .guard(guard::Any(guard::Post()).or(guard::Put()).or(guard::Delete()))
                .wrap(JwtAuthMiddleware)
                .route("", web::post().to(handlers::create_post))
                .route("/{id}", web::put().to(handlers::update_post))
                .route("/{id}", web::delete().to(handlers::delete_post)),
        )
        // Reads are public
        .service(
            web::scope("/blog")
                .route("", web::get().to(handlers::list_posts))
                .route("/{id}", web::get().to(handlers::get_post)),
        );
}

/// Malformed JSON bodies answer with the standard error shape
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("Rejected request body: {}", err);
        AppError::InvalidInput(format!("Invalid request body: {}", err)).into()
    })
}

/// Non-numeric ids answer with the standard error shape
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::InvalidInput(format!("Invalid path parameter: {}", err)).into()
    })
}
