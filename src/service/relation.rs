//! Relation service
//!
//! Follow/unfollow and bookmark/unbookmark against the relation store,
//! resolving usernames and slugs into relation keys and producing the
//! refreshed view the API responds with.
//!
//! The two remove operations are deliberately asymmetric: unfollowing a
//! relation that does not exist is a 404, while removing an absent bookmark
//! silently succeeds. Tests pin both behaviors.

use std::sync::Arc;

use crate::data::{ArticleData, Database, ProfileData, RelationKind};
use crate::error::AppError;

/// Orchestrates the two keyed relations: follows and bookmarks
pub struct RelationService {
    db: Arc<Database>,
}

impl RelationService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Follow a user by username.
    ///
    /// Idempotent: re-following an already-followed user changes nothing
    /// and is not an error. Self-follow is permitted.
    pub async fn follow(
        &self,
        follower_id: &str,
        target_username: &str,
    ) -> Result<ProfileData, AppError> {
        let target = self
            .db
            .find_user_by_username(target_username)
            .await?
            .ok_or(AppError::NotFound)?;

        self.db
            .insert_relation(RelationKind::Follow, follower_id, &target.id)
            .await?;
        tracing::info!(follower = %follower_id, followee = %target.id, "follow");

        self.profile_of(target_username, follower_id).await
    }

    /// Unfollow a user by username.
    ///
    /// Unfollowing without an existing relation is a not-found error.
    pub async fn unfollow(
        &self,
        follower_id: &str,
        target_username: &str,
    ) -> Result<ProfileData, AppError> {
        let target = self
            .db
            .find_user_by_username(target_username)
            .await?
            .ok_or(AppError::NotFound)?;

        let removed = self
            .db
            .delete_relation(RelationKind::Follow, follower_id, &target.id)
            .await?;
        if !removed {
            return Err(AppError::NotFound);
        }
        tracing::info!(follower = %follower_id, followee = %target.id, "unfollow");

        self.profile_of(target_username, follower_id).await
    }

    /// Bookmark an article by slug.
    ///
    /// Idempotent: repeated calls leave exactly one record.
    pub async fn bookmark(&self, user_id: &str, slug: &str) -> Result<ArticleData, AppError> {
        let article = self
            .db
            .find_article_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound)?;

        self.db
            .insert_relation(RelationKind::Bookmark, &article.id, user_id)
            .await?;
        tracing::info!(article = %article.id, user = %user_id, "bookmark");

        self.article_of(slug, user_id).await
    }

    /// Remove an article bookmark by slug.
    ///
    /// Removing an absent bookmark is a silent no-op; the refreshed view is
    /// returned either way.
    pub async fn unbookmark(&self, user_id: &str, slug: &str) -> Result<ArticleData, AppError> {
        let article = self
            .db
            .find_article_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound)?;

        self.db
            .delete_relation(RelationKind::Bookmark, &article.id, user_id)
            .await?;
        tracing::info!(article = %article.id, user = %user_id, "unbookmark");

        self.article_of(slug, user_id).await
    }

    async fn profile_of(&self, username: &str, viewer_id: &str) -> Result<ProfileData, AppError> {
        self.db
            .profile_view(username, Some(viewer_id))
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn article_of(&self, slug: &str, viewer_id: &str) -> Result<ArticleData, AppError> {
        self.db
            .article_view(slug, Some(viewer_id))
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::data::{Article, EntityId, User};

    struct Fixture {
        service: RelationService,
        db: Arc<Database>,
        john: User,
        jane: User,
        _dir: TempDir,
    }

    async fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(
            Database::connect(&temp_dir.path().join("test.db"))
                .await
                .unwrap(),
        );

        let john = test_user("john", "john@example.com");
        let jane = test_user("jane", "jane@example.com");
        db.insert_user(&john).await.unwrap();
        db.insert_user(&jane).await.unwrap();

        Fixture {
            service: RelationService::new(db.clone()),
            db,
            john,
            jane,
            _dir: temp_dir,
        }
    }

    fn test_user(username: &str, email: &str) -> User {
        User {
            id: EntityId::new().0,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            password_salt: "salt".to_string(),
            bio: String::new(),
            image: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_article(slug: &str, author_id: &str) -> Article {
        Article {
            id: EntityId::new().0,
            slug: slug.to_string(),
            title: slug.replace('-', " "),
            description: "a description".to_string(),
            body: "a body".to_string(),
            author_id: author_id.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn follow_is_idempotent() {
        let f = fixture().await;

        let profile = f.service.follow(&f.john.id, "jane").await.unwrap();
        assert!(profile.following);

        // Second follow of the same pair is absorbed.
        let profile = f.service.follow(&f.john.id, "jane").await.unwrap();
        assert!(profile.following);

        assert!(f
            .db
            .find_follow(&f.john.id, &f.jane.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn follow_unknown_target_is_not_found() {
        let f = fixture().await;
        let error = f.service.follow(&f.john.id, "nobody").await.unwrap_err();
        assert!(matches!(error, AppError::NotFound));
    }

    #[tokio::test]
    async fn unfollow_removes_the_relation() {
        let f = fixture().await;
        f.service.follow(&f.john.id, "jane").await.unwrap();

        let profile = f.service.unfollow(&f.john.id, "jane").await.unwrap();
        assert!(!profile.following);
        assert!(f
            .db
            .find_follow(&f.john.id, &f.jane.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unfollow_without_relation_is_not_found() {
        let f = fixture().await;
        let error = f.service.unfollow(&f.john.id, "jane").await.unwrap_err();
        assert!(matches!(error, AppError::NotFound));
    }

    #[tokio::test]
    async fn bookmark_is_idempotent_and_counts_once() {
        let f = fixture().await;
        let article = test_article("how-to-train-your-dragon", &f.jane.id);
        f.db.insert_article(&article).await.unwrap();

        let view = f
            .service
            .bookmark(&f.john.id, "how-to-train-your-dragon")
            .await
            .unwrap();
        assert!(view.bookmarked);
        assert_eq!(view.bookmarks_count, 1);

        let view = f
            .service
            .bookmark(&f.john.id, "how-to-train-your-dragon")
            .await
            .unwrap();
        assert!(view.bookmarked);
        assert_eq!(view.bookmarks_count, 1);

        assert!(f
            .db
            .find_bookmark(&article.id, &f.john.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn unbookmark_missing_bookmark_is_a_no_op() {
        let f = fixture().await;
        let article = test_article("ice-and-fire", &f.jane.id);
        f.db.insert_article(&article).await.unwrap();

        let view = f
            .service
            .unbookmark(&f.john.id, "ice-and-fire")
            .await
            .unwrap();
        assert!(!view.bookmarked);
        assert_eq!(view.bookmarks_count, 0);
    }

    #[tokio::test]
    async fn bookmark_unknown_article_is_not_found() {
        let f = fixture().await;
        let error = f.service.bookmark(&f.john.id, "nope").await.unwrap_err();
        assert!(matches!(error, AppError::NotFound));
    }

    #[tokio::test]
    async fn concurrent_follows_leave_one_relation() {
        let f = fixture().await;

        let (a, b) = tokio::join!(
            f.service.follow(&f.john.id, "jane"),
            f.service.follow(&f.john.id, "jane"),
        );
        a.unwrap();
        b.unwrap();

        assert!(f
            .db
            .find_follow(&f.john.id, &f.jane.id)
            .await
            .unwrap()
            .is_some());
    }
}
