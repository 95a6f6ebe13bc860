pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod recommendation;
pub mod repository;

pub use domain::follow::{Follow, User};
pub use error::{GraphError, Result};
pub use repository::{FollowRepositoryTrait, Neo4jFollowRepository};
