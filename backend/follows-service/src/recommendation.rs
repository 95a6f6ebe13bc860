//! Follow recommendations
//!
//! Candidates come from two passes over the follow graph: friends-of-friends
//! the user does not follow yet, then (only when that pass is short) every
//! other user the user does not follow. This module holds the Cypher for both
//! passes plus the target size and merge policy; the Neo4j repository runs them.

/// Minimum number of candidates the primary pass must produce before the
/// backfill pass is skipped.
pub const RECOMMENDATION_TARGET: usize = 10;

/// Users `u` reaches in exactly two FOLLOWS hops, excluding `u` and anyone `u`
/// already follows.
pub(crate) const TWO_HOP_CANDIDATES_CYPHER: &str = r#"
    MATCH (u:User {id: $user_id})-[:FOLLOWS]->(:User)-[:FOLLOWS]->(candidate:User)
    WHERE NOT (u)-[:FOLLOWS]->(candidate) AND u <> candidate AND candidate.id <> $user_id
    RETURN DISTINCT candidate.id AS candidate_id
"#;

/// Every other user `u` does not follow. Not limited: the remaining count is
/// only used for logging.
pub(crate) const BACKFILL_CANDIDATES_CYPHER: &str = r#"
    MATCH (u:User {id: $user_id})
    WITH u LIMIT 1
    MATCH (candidate:User)
    WHERE candidate.id <> $user_id AND NOT (u)-[:FOLLOWS]->(candidate)
    RETURN DISTINCT candidate.id AS candidate_id
"#;

/// Whether the primary pass came up short and backfill should run.
pub fn needs_backfill(primary_count: usize) -> bool {
    primary_count < RECOMMENDATION_TARGET
}

/// How many candidates backfill would need to reach the target.
pub fn backfill_shortfall(primary_count: usize) -> usize {
    RECOMMENDATION_TARGET.saturating_sub(primary_count)
}

/// Append backfill candidates that are not already recommended.
///
/// Primary candidates keep their order and come first. The result may be
/// longer than [`RECOMMENDATION_TARGET`] (a large primary pass is never cut)
/// or shorter (the graph has too few eligible users).
pub fn merge_candidates(primary: Vec<i64>, backfill: Vec<i64>) -> Vec<i64> {
    let mut merged = primary;
    for candidate in backfill {
        if !merged.contains(&candidate) {
            merged.push(candidate);
        }
    }
    merged
}
