use crate::domain::follow::{Follow, User};
use crate::error::Result;

/// Trait defining the interface for follow graph operations.
/// Handlers only see this trait; the Neo4j repository implements it.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FollowRepositoryTrait: Send + Sync {
    /// Create a user node. Duplicate ids are not rejected.
    async fn add_user(&self, user: &User) -> Result<()>;

    /// Create a follow relationship if it does not exist yet
    async fn follow_user(&self, follower_id: i64, followed_id: i64) -> Result<Follow>;

    /// Delete a follow relationship; missing edges are not an error
    async fn unfollow_user(&self, follow: Follow) -> Result<()>;

    /// Check if follower is following followed (direction matters)
    async fn check_follow(&self, follower_id: i64, followed_id: i64) -> Result<bool>;

    /// Outgoing edges of a user
    async fn get_user_following(&self, user_id: i64) -> Result<Vec<Follow>>;

    /// Ids of the users a user follows
    async fn get_user_following_ids(&self, user_id: i64) -> Result<Vec<i64>>;

    /// Incoming edges of a user
    async fn get_user_followers(&self, user_id: i64) -> Result<Vec<Follow>>;

    /// Users worth following: friends-of-friends, backfilled with other users
    async fn get_follow_recommendations(&self, user_id: i64) -> Result<Vec<i64>>;

    /// Health check (optional)
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
