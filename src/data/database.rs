//! SQLite database operations
//!
//! All database access goes through this module. Uniqueness of usernames,
//! emails and relation pairs is enforced by the schema; callers rely on
//! `INSERT OR IGNORE` for idempotent relation inserts and on
//! [`unique_violation_field`] to translate constraint hits on user rows.

use std::path::Path;

use chrono::Utc;
use sqlx::{Pool, Sqlite, SqlitePool};

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper
pub struct Database {
    pool: Pool<Sqlite>,
}

/// Identify which user column a unique-constraint violation hit.
///
/// SQLite reports violations as "UNIQUE constraint failed: users.email".
/// Returns the API field name, or `None` for any other error.
pub fn unique_violation_field(error: &sqlx::Error) -> Option<&'static str> {
    let db_err = match error {
        sqlx::Error::Database(db_err) => db_err,
        _ => return None,
    };
    if !db_err.is_unique_violation() {
        return None;
    }
    let message = db_err.message();
    if message.contains("users.email") {
        Some("email")
    } else if message.contains("users.username") {
        Some("username")
    } else {
        None
    }
}

impl Database {
    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist and runs pending
    /// migrations automatically.
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
        })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user row
    ///
    /// A unique-constraint violation on username or email propagates as
    /// `AppError::Database`; use [`unique_violation_field`] to classify it.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, password_salt, bio, image, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.password_salt)
        .bind(&user.bio)
        .bind(&user.image)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist all mutable fields of an existing user
    ///
    /// `updated_at` is written as given; callers stamp it so the record they
    /// hold matches the stored row.
    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users
             SET username = ?, email = ?, password_hash = ?, password_salt = ?, bio = ?, image = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.password_salt)
        .bind(&user.bio)
        .bind(&user.image)
        .bind(user.updated_at)
        .bind(&user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // =========================================================================
    // Relations (follows and bookmarks share one keyed-pair store)
    // =========================================================================

    /// Idempotent relation insert
    ///
    /// `INSERT OR IGNORE` against the composite primary key makes
    /// check-then-insert a single atomic round trip; a concurrent duplicate
    /// insert is absorbed, not surfaced.
    pub async fn insert_relation(
        &self,
        kind: RelationKind,
        key_a: &str,
        key_b: &str,
    ) -> Result<(), AppError> {
        let (col_a, col_b) = kind.columns();
        let sql = format!(
            "INSERT OR IGNORE INTO {} ({}, {}, created_at) VALUES (?, ?, ?)",
            kind.table(),
            col_a,
            col_b
        );
        sqlx::query(&sql)
            .bind(key_a)
            .bind(key_b)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Whether a relation row exists for the ordered pair
    pub async fn relation_exists(
        &self,
        kind: RelationKind,
        key_a: &str,
        key_b: &str,
    ) -> Result<bool, AppError> {
        let (col_a, col_b) = kind.columns();
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ? AND {} = ?",
            kind.table(),
            col_a,
            col_b
        );
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(key_a)
            .bind(key_b)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Delete a relation row
    ///
    /// Returns whether a row was actually removed; deleting an absent pair
    /// is not an error here, callers decide what absence means.
    pub async fn delete_relation(
        &self,
        kind: RelationKind,
        key_a: &str,
        key_b: &str,
    ) -> Result<bool, AppError> {
        let (col_a, col_b) = kind.columns();
        let sql = format!(
            "DELETE FROM {} WHERE {} = ? AND {} = ?",
            kind.table(),
            col_a,
            col_b
        );
        let result = sqlx::query(&sql)
            .bind(key_a)
            .bind(key_b)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_follow(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<Option<FollowRelation>, AppError> {
        let relation = sqlx::query_as::<_, FollowRelation>(
            "SELECT * FROM follows WHERE follower_id = ? AND followee_id = ?",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(relation)
    }

    pub async fn find_bookmark(
        &self,
        article_id: &str,
        user_id: &str,
    ) -> Result<Option<ArticleBookmark>, AppError> {
        let bookmark = sqlx::query_as::<_, ArticleBookmark>(
            "SELECT * FROM article_bookmarks WHERE article_id = ? AND user_id = ?",
        )
        .bind(article_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bookmark)
    }

    /// Number of users who bookmarked an article
    pub async fn article_bookmark_count(&self, article_id: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM article_bookmarks WHERE article_id = ?",
        )
        .bind(article_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // =========================================================================
    // Articles (lookup surface only)
    // =========================================================================

    pub async fn insert_article(&self, article: &Article) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO articles (id, slug, title, description, body, author_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&article.id)
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.body)
        .bind(&article.author_id)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_article_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError> {
        let article = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(article)
    }

    // =========================================================================
    // Read-side views
    // =========================================================================

    /// Profile view for a username, scoped to an optional viewer
    ///
    /// `following` is false for anonymous viewers.
    pub async fn profile_view(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> Result<Option<ProfileData>, AppError> {
        let Some(user) = self.find_user_by_username(username).await? else {
            return Ok(None);
        };

        let following = match viewer_id {
            Some(viewer_id) => {
                self.relation_exists(RelationKind::Follow, viewer_id, &user.id)
                    .await?
            }
            None => false,
        };

        Ok(Some(ProfileData {
            id: user.id,
            username: user.username,
            bio: user.bio,
            image: user.image,
            following,
        }))
    }

    /// Article view for a slug, scoped to an optional viewer
    ///
    /// Carries the viewer's bookmark flag, the total bookmark count and the
    /// author profile.
    pub async fn article_view(
        &self,
        slug: &str,
        viewer_id: Option<&str>,
    ) -> Result<Option<ArticleData>, AppError> {
        let Some(article) = self.find_article_by_slug(slug).await? else {
            return Ok(None);
        };

        let author = self
            .find_user_by_id(&article.author_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "article {} references missing author {}",
                    article.id,
                    article.author_id
                ))
            })?;

        let bookmarked = match viewer_id {
            Some(viewer_id) => {
                self.relation_exists(RelationKind::Bookmark, &article.id, viewer_id)
                    .await?
            }
            None => false,
        };
        let bookmarks_count = self.article_bookmark_count(&article.id).await?;

        let following = match viewer_id {
            Some(viewer_id) => {
                self.relation_exists(RelationKind::Follow, viewer_id, &author.id)
                    .await?
            }
            None => false,
        };

        Ok(Some(ArticleData {
            id: article.id,
            slug: article.slug,
            title: article.title,
            description: article.description,
            body: article.body,
            bookmarked,
            bookmarks_count,
            created_at: article.created_at,
            updated_at: article.updated_at,
            author: ProfileData {
                id: author.id,
                username: author.username,
                bio: author.bio,
                image: author.image,
                following,
            },
        }))
    }
}
