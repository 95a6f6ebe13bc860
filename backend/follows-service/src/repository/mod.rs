mod neo4j_repository;
mod r#trait;

pub use neo4j_repository::Neo4jFollowRepository;
pub use r#trait::FollowRepositoryTrait;

#[cfg(test)]
pub use r#trait::MockFollowRepositoryTrait;
