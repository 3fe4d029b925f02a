/// Authorization policy for post mutations
///
/// A caller may modify a post when they wrote it or hold the admin flag.
/// Reads are public and creation only needs a verified token, so neither
/// goes through this module.
use crate::error::{AppError, Result};
use crate::models::Post;
use crypto_core::Claims;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `claims` may update or delete `post`
pub fn can_modify(claims: &Claims, post: &Post) -> Decision {
    if claims.id == post.author.id || claims.is_admin {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// `Forbidden` unless `can_modify` allows; `action` names the verb in the message
pub fn ensure_can_modify(claims: &Claims, post: &Post, action: &str) -> Result<()> {
    if can_modify(claims, post).is_allowed() {
        return Ok(());
    }

    tracing::info!(
        user_id = claims.id,
        post_id = post.id,
        author_id = post.author.id,
        action,
        "Post modification denied"
    );
    Err(AppError::Forbidden(format!(
        "Not authorized to {} this post",
        action
    )))
}
