//! Data models
//!
//! Rust structs representing database entities and read-side views.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account
///
/// `username` and `email` are unique across all users; the indexes in the
/// schema are the final authority, read-side validation only gives friendly
/// errors. The password is stored as a salted hash, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    /// Free-text bio, empty by default
    pub bio: String,
    /// Avatar URL, platform default when not set
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Articles (external collaborator, minimal surface)
// =============================================================================

/// An article, addressed by slug
///
/// Article authoring lives outside this service; only the lookup needed to
/// key bookmarks and build the response view is modelled here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Relations
// =============================================================================

/// Directed follow relation between two users
///
/// Equality is structural; at most one row exists per ordered pair.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FollowRelation {
    pub follower_id: String,
    pub followee_id: String,
    pub created_at: DateTime<Utc>,
}

/// Bookmark relation between an article and a user
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ArticleBookmark {
    pub article_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// The two relation kinds share one keyed-pair store implementation.
///
/// Each kind maps to its table and column pair; `key_a` is the owning side
/// of the directed pair (follower / article), `key_b` the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// (follower_id, followee_id) in `follows`
    Follow,
    /// (article_id, user_id) in `article_bookmarks`
    Bookmark,
}

impl RelationKind {
    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Follow => "follows",
            Self::Bookmark => "article_bookmarks",
        }
    }

    pub(crate) fn columns(self) -> (&'static str, &'static str) {
        match self {
            Self::Follow => ("follower_id", "followee_id"),
            Self::Bookmark => ("article_id", "user_id"),
        }
    }
}

// =============================================================================
// Read-side views
// =============================================================================

/// Profile as seen by a (possibly anonymous) viewer
#[derive(Debug, Clone, Serialize)]
pub struct ProfileData {
    #[serde(skip)]
    pub id: String,
    pub username: String,
    pub bio: String,
    pub image: String,
    pub following: bool,
}

/// Article view scoped to a viewer, with bookmark state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleData {
    #[serde(skip)]
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub bookmarked: bool,
    pub bookmarks_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: ProfileData,
}
