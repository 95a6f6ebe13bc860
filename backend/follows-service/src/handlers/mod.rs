pub mod follows;
pub mod health;
pub mod users;

use crate::error::GraphError;
use crate::metrics::metrics_handler;
use crate::repository::FollowRepositoryTrait;
use actix_web::web;
use std::sync::Arc;

pub use follows::{
    check_follow, follow_user, get_follow_recommendations, get_user_followers,
    get_user_following, get_user_following_ids, unfollow_user,
};
pub use health::{health, ready};
pub use users::add_user;

/// Repository handle shared by all workers
pub type SharedRepository = Arc<dyn FollowRepositoryTrait>;

/// Register routes and extractor error handling. The repository itself is
/// attached by the caller with `app_data(web::Data::new(repo))`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        GraphError::InvalidInput(format!("Invalid path parameter: {}", err)).into()
    }))
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
        GraphError::InvalidInput(format!("Unable to decode json: {}", err)).into()
    }))
    .route("/health", web::get().to(health))
    .route("/ready", web::get().to(ready))
    .route("/metrics", web::get().to(metrics_handler))
    .route("/user", web::post().to(add_user))
    .route("/follows", web::post().to(follow_user))
    .route("/check-following", web::get().to(check_follow))
    .route(
        "/unfollow/{followed_id}/{follower_id}",
        web::delete().to(unfollow_user),
    )
    .route(
        "/user/following/{user_id}",
        web::get().to(get_user_following),
    )
    .route(
        "/user/followers/{user_id}",
        web::get().to(get_user_followers),
    )
    .route(
        "/user/following-ids/{user_id}",
        web::get().to(get_user_following_ids),
    )
    .route("/user/{user_id}", web::get().to(get_user_following))
    .route(
        "/recommendation/{user_id}",
        web::get().to(get_follow_recommendations),
    );
}
