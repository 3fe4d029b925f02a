//! Blog service library
//!
//! User registration and login with bearer tokens, and post CRUD where only
//! the author or an administrator may modify a post.

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod services;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
