/// Business logic layer for blog-service
///
/// - `credentials`: registration and login checks
/// - `authorization`: who may modify a post
/// - `posts`: post lifecycle over the `PostRepository`
pub mod authorization;
pub mod credentials;
pub mod posts;

pub use authorization::{can_modify, ensure_can_modify, Decision};
pub use credentials::CredentialService;
pub use posts::PostService;
