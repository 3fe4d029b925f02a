/// HTTP handlers for blog-service
pub mod auth;
pub mod health;
pub mod posts;

pub use auth::{login, register};
pub use health::health_check;
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
