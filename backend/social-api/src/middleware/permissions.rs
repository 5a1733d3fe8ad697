/// Ownership-based permission checks.
///
/// Pure gates: they never mutate state, only decide whether the acting
/// user may modify the resource.
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Post;

/// Only the author may edit or delete a post.
pub fn check_post_ownership(user_id: Uuid, post: &Post) -> Result<()> {
    if post.author_id == user_id {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "You don't have permission to modify this post".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_by(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id,
            content: "hello".to_string(),
            image_key: None,
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn author_passes_ownership_check() {
        let author = Uuid::new_v4();
        assert!(check_post_ownership(author, &post_by(author)).is_ok());
    }

    #[test]
    fn non_author_is_forbidden() {
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let result = check_post_ownership(stranger, &post_by(author));
        assert!(matches!(result, Err(AppError::Authorization(_))));
    }
}
