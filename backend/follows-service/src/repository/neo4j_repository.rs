use super::FollowRepositoryTrait;
use crate::domain::follow::{Follow, User};
use crate::error::{GraphError, Result};
use crate::metrics;
use crate::recommendation::{
    backfill_shortfall, merge_candidates, needs_backfill, BACKFILL_CANDIDATES_CYPHER,
    TWO_HOP_CANDIDATES_CYPHER,
};
use neo4rs::{query, Graph, Query, Txn};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Repository for the follow graph using Neo4j
#[derive(Clone)]
pub struct Neo4jFollowRepository {
    graph: Arc<Graph>,
    query_timeout: Duration,
}

impl Neo4jFollowRepository {
    /// Create the driver. The connection pool is lazy; call `health_check` to
    /// verify connectivity.
    pub fn new(uri: &str, user: &str, password: &str, query_timeout: Duration) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .map_err(|e| GraphError::Store(format!("Failed to connect to Neo4j: {}", e)))?;

        Ok(Self::from_graph(Arc::new(graph), query_timeout))
    }

    pub fn from_graph(graph: Arc<Graph>, query_timeout: Duration) -> Self {
        Self {
            graph,
            query_timeout,
        }
    }

    /// Bound an operation by the configured deadline. Dropping the inner future
    /// drops its transaction, which rolls back on the server.
    async fn with_deadline<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.query_timeout, fut).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok(value)) => {
                metrics::record_operation(operation, "ok", elapsed);
                Ok(value)
            }
            Ok(Err(e)) => {
                metrics::record_operation(operation, e.kind(), elapsed);
                match &e {
                    GraphError::Store(_) => error!(operation, error = %e, "Neo4j operation failed"),
                    _ => debug!(operation, error = %e, "Neo4j operation rejected"),
                }
                Err(e)
            }
            Err(_) => {
                metrics::record_operation(operation, "timeout", elapsed);
                warn!(
                    operation,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "Neo4j operation exceeded deadline"
                );
                Err(GraphError::Timeout(self.query_timeout))
            }
        }
    }

    /// Health check - verify Neo4j connection
    pub async fn health_check(&self) -> Result<bool> {
        self.with_deadline("health_check", async {
            let mut result = self.graph.execute(query("RETURN 1 AS health")).await?;

            if let Some(row) = result.next().await? {
                let health: i64 = row.get("health").unwrap_or(0);
                Ok(health == 1)
            } else {
                Ok(false)
            }
        })
        .await
    }

    /// Create User node. No MERGE: the same id twice yields two nodes.
    pub async fn add_user(&self, user: &User) -> Result<()> {
        self.with_deadline("add_user", async {
            let cypher = r#"
                CREATE (u:User {id: $id, username: $username})
                RETURN u.id AS id
            "#;

            let mut result = self
                .graph
                .execute(
                    query(cypher)
                        .param("id", user.id)
                        .param("username", user.username.clone()),
                )
                .await?;

            while result.next().await?.is_some() {}

            debug!("Created User node: {} ({})", user.id, user.username);
            Ok(())
        })
        .await
    }

    /// Create FOLLOWS edge if absent.
    ///
    /// The existence check and the insert are one MERGE on two bound nodes in
    /// a single write transaction, so concurrent calls for the same pair
    /// cannot both create an edge. A per-call marker set only ON CREATE tells
    /// the two outcomes apart and is removed before commit.
    pub async fn follow_user(&self, follower_id: i64, followed_id: i64) -> Result<Follow> {
        if follower_id == followed_id {
            return Err(GraphError::InvalidInput("Cannot follow self".to_string()));
        }

        self.with_deadline("follow_user", async {
            let cypher = r#"
                MATCH (follower:User {id: $follower_id})
                WITH follower LIMIT 1
                MATCH (followed:User {id: $followed_id})
                WITH follower, followed LIMIT 1
                MERGE (follower)-[r:FOLLOWS]->(followed)
                ON CREATE SET r.pending_marker = $marker
                WITH r, coalesce(r.pending_marker = $marker, false) AS created
                REMOVE r.pending_marker
                RETURN created
            "#;

            let marker = Uuid::new_v4().to_string();
            let mut txn = self.graph.start_txn().await?;
            let mut result = txn
                .execute(
                    query(cypher)
                        .param("follower_id", follower_id)
                        .param("followed_id", followed_id)
                        .param("marker", marker),
                )
                .await?;

            let created = match result.next(txn.handle()).await? {
                Some(row) => Some(row.get::<bool>("created")?),
                None => None,
            };

            match created {
                Some(true) => {
                    txn.commit().await?;
                    debug!("Created FOLLOWS: {} -> {}", follower_id, followed_id);
                    Ok(Follow::new(follower_id, followed_id))
                }
                Some(false) => {
                    txn.rollback().await?;
                    Err(GraphError::DuplicateRelationship {
                        follower_id,
                        followed_id,
                    })
                }
                None => {
                    txn.rollback().await?;
                    Err(GraphError::UserNotFound(format!(
                        "follower {} or followed {} does not exist",
                        follower_id, followed_id
                    )))
                }
            }
        })
        .await
    }

    /// Delete FOLLOWS edge; zero matched edges is a no-op
    pub async fn unfollow_user(&self, follow: Follow) -> Result<()> {
        self.with_deadline("unfollow_user", async {
            let cypher = r#"
                MATCH (a:User {id: $follower_id})-[r:FOLLOWS]->(b:User {id: $followed_id})
                DELETE r
            "#;

            self.graph
                .run(
                    query(cypher)
                        .param("follower_id", follow.follower_id)
                        .param("followed_id", follow.followed_id),
                )
                .await?;

            debug!(
                "Deleted FOLLOWS: {} -> {}",
                follow.follower_id, follow.followed_id
            );
            Ok(())
        })
        .await
    }

    /// Check if user A follows user B
    pub async fn check_follow(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        self.with_deadline("check_follow", async {
            let cypher = r#"
                MATCH (a:User {id: $follower_id})-[r:FOLLOWS]->(b:User {id: $followed_id})
                RETURN count(r) > 0 AS is_following
            "#;

            let mut result = self
                .graph
                .execute(
                    query(cypher)
                        .param("follower_id", follower_id)
                        .param("followed_id", followed_id),
                )
                .await?;

            if let Some(row) = result.next().await? {
                Ok(row.get("is_following")?)
            } else {
                Ok(false)
            }
        })
        .await
    }

    /// Get following list of a user (who this user follows)
    pub async fn get_user_following(&self, user_id: i64) -> Result<Vec<Follow>> {
        self.with_deadline("get_user_following", async {
            let cypher = r#"
                MATCH (u:User {id: $user_id})-[:FOLLOWS]->(f:User)
                RETURN u.id AS follower_id, f.id AS followed_id
            "#;

            let follows = self
                .fetch_follows(query(cypher).param("user_id", user_id))
                .await?;

            debug!("Got {} following for user {}", follows.len(), user_id);
            Ok(follows)
        })
        .await
    }

    pub async fn get_user_following_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.with_deadline("get_user_following_ids", async {
            let cypher = r#"
                MATCH (u:User {id: $user_id})-[:FOLLOWS]->(f:User)
                RETURN f.id AS followed_id
            "#;

            let mut result = self
                .graph
                .execute(query(cypher).param("user_id", user_id))
                .await?;

            let mut ids = Vec::new();
            while let Some(row) = result.next().await? {
                ids.push(row.get::<i64>("followed_id")?);
            }

            debug!("Got {} following ids for user {}", ids.len(), user_id);
            Ok(ids)
        })
        .await
    }

    /// Get followers of a user (who follows this user)
    pub async fn get_user_followers(&self, user_id: i64) -> Result<Vec<Follow>> {
        self.with_deadline("get_user_followers", async {
            let cypher = r#"
                MATCH (u:User {id: $user_id})<-[:FOLLOWS]-(f:User)
                RETURN f.id AS follower_id, u.id AS followed_id
            "#;

            let follows = self
                .fetch_follows(query(cypher).param("user_id", user_id))
                .await?;

            debug!("Got {} followers for user {}", follows.len(), user_id);
            Ok(follows)
        })
        .await
    }

    /// Friends-of-friends first, then any unfollowed user when that pass is
    /// short. Both passes share one transaction.
    pub async fn get_follow_recommendations(&self, user_id: i64) -> Result<Vec<i64>> {
        self.with_deadline("get_follow_recommendations", async {
            let mut txn = self.graph.start_txn().await?;

            let primary = Self::collect_candidate_ids(
                &mut txn,
                query(TWO_HOP_CANDIDATES_CYPHER).param("user_id", user_id),
            )
            .await?;

            let backfill = if needs_backfill(primary.len()) {
                debug!(
                    user_id,
                    primary = primary.len(),
                    shortfall = backfill_shortfall(primary.len()),
                    "Two-hop recommendations short, backfilling"
                );
                Self::collect_candidate_ids(
                    &mut txn,
                    query(BACKFILL_CANDIDATES_CYPHER).param("user_id", user_id),
                )
                .await?
            } else {
                Vec::new()
            };

            txn.commit().await?;

            let recommendations = merge_candidates(primary, backfill);
            debug!(
                "Got {} recommendations for user {}",
                recommendations.len(),
                user_id
            );
            Ok(recommendations)
        })
        .await
    }

    async fn collect_candidate_ids(txn: &mut Txn, q: Query) -> Result<Vec<i64>> {
        let mut result = txn.execute(q).await?;

        let mut ids = Vec::new();
        while let Some(row) = result.next(txn.handle()).await? {
            ids.push(row.get::<i64>("candidate_id")?);
        }
        Ok(ids)
    }

    async fn fetch_follows(&self, q: Query) -> Result<Vec<Follow>> {
        let mut result = self.graph.execute(q).await?;

        let mut follows = Vec::new();
        while let Some(row) = result.next().await? {
            follows.push(Follow::new(
                row.get::<i64>("follower_id")?,
                row.get::<i64>("followed_id")?,
            ));
        }
        Ok(follows)
    }
}

#[async_trait::async_trait]
impl FollowRepositoryTrait for Neo4jFollowRepository {
    async fn add_user(&self, user: &User) -> Result<()> {
        Self::add_user(self, user).await
    }

    async fn follow_user(&self, follower_id: i64, followed_id: i64) -> Result<Follow> {
        Self::follow_user(self, follower_id, followed_id).await
    }

    async fn unfollow_user(&self, follow: Follow) -> Result<()> {
        Self::unfollow_user(self, follow).await
    }

    async fn check_follow(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        Self::check_follow(self, follower_id, followed_id).await
    }

    async fn get_user_following(&self, user_id: i64) -> Result<Vec<Follow>> {
        Self::get_user_following(self, user_id).await
    }

    async fn get_user_following_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        Self::get_user_following_ids(self, user_id).await
    }

    async fn get_user_followers(&self, user_id: i64) -> Result<Vec<Follow>> {
        Self::get_user_followers(self, user_id).await
    }

    async fn get_follow_recommendations(&self, user_id: i64) -> Result<Vec<i64>> {
        Self::get_follow_recommendations(self, user_id).await
    }

    async fn health_check(&self) -> Result<()> {
        let is_healthy = Self::health_check(self).await?;
        if !is_healthy {
            return Err(GraphError::Store("Neo4j health check failed".to_string()));
        }
        Ok(())
    }
}
