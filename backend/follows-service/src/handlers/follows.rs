use super::SharedRepository;
use crate::domain::follow::Follow;
use crate::error::{ErrorResponse, GraphError};
use actix_web::{web, HttpResponse};
use tracing::{debug, error, info};

/// Follow and unfollow failures are reported as client errors, whatever the cause.
fn bad_request(err: &GraphError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: err.to_string(),
        code: 400,
    })
}

pub async fn follow_user(
    repo: web::Data<SharedRepository>,
    body: web::Json<Follow>,
) -> HttpResponse {
    let req = body.into_inner();

    match repo.follow_user(req.follower_id, req.followed_id).await {
        Ok(follow) => {
            info!(
                "Created follow: {} -> {}",
                follow.follower_id, follow.followed_id
            );
            HttpResponse::Created().json(follow)
        }
        Err(e) => {
            error!("Failed to create follow: {}", e);
            bad_request(&e)
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct UnfollowPath {
    followed_id: i64,
    follower_id: i64,
}

pub async fn unfollow_user(
    repo: web::Data<SharedRepository>,
    path: web::Path<UnfollowPath>,
) -> HttpResponse {
    let follow = Follow::new(path.follower_id, path.followed_id);

    match repo.unfollow_user(follow).await {
        Ok(()) => {
            info!(
                "Deleted follow: {} -> {}",
                follow.follower_id, follow.followed_id
            );
            HttpResponse::Ok().finish()
        }
        Err(e) => {
            error!("Failed to delete follow: {}", e);
            bad_request(&e)
        }
    }
}

pub async fn check_follow(
    repo: web::Data<SharedRepository>,
    body: web::Json<Follow>,
) -> Result<HttpResponse, GraphError> {
    let req = body.into_inner();

    if repo.check_follow(req.follower_id, req.followed_id).await? {
        Ok(HttpResponse::Ok().body("User is following"))
    } else {
        debug!(
            "No follow edge: {} -> {}",
            req.follower_id, req.followed_id
        );
        Err(GraphError::NotFound("User is not following".to_string()))
    }
}

pub async fn get_user_following(
    repo: web::Data<SharedRepository>,
    user_id: web::Path<i64>,
) -> Result<HttpResponse, GraphError> {
    let following = repo.get_user_following(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(following))
}

pub async fn get_user_following_ids(
    repo: web::Data<SharedRepository>,
    user_id: web::Path<i64>,
) -> Result<HttpResponse, GraphError> {
    let ids = repo.get_user_following_ids(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ids))
}

pub async fn get_user_followers(
    repo: web::Data<SharedRepository>,
    user_id: web::Path<i64>,
) -> Result<HttpResponse, GraphError> {
    let followers = repo.get_user_followers(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(followers))
}

pub async fn get_follow_recommendations(
    repo: web::Data<SharedRepository>,
    user_id: web::Path<i64>,
) -> Result<HttpResponse, GraphError> {
    let user_id = user_id.into_inner();
    let recommendations = repo.get_follow_recommendations(user_id).await.map_err(|e| {
        error!(user_id, "Failed to get recommendations: {}", e);
        e
    })?;
    Ok(HttpResponse::Ok().json(recommendations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::configure;
    use crate::repository::MockFollowRepositoryTrait;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::sync::Arc;

    macro_rules! init_app {
        ($repo:expr) => {{
            let repo: SharedRepository = Arc::new($repo);
            test::init_service(
                App::new()
                    .app_data(web::Data::new(repo))
                    .configure(configure),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn follow_returns_201_with_edge() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_follow_user()
            .withf(|follower, followed| *follower == 1 && *followed == 2)
            .times(1)
            .returning(|follower, followed| Ok(Follow::new(follower, followed)));
        let app = init_app!(repo);

        let req = test::TestRequest::post()
            .uri("/follows")
            .set_json(serde_json::json!({"followerID": 1, "followedID": 2}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({"followerID": 1, "followedID": 2}));
    }

    #[actix_web::test]
    async fn duplicate_follow_returns_400() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_follow_user().returning(|follower, followed| {
            Err(GraphError::DuplicateRelationship {
                follower_id: follower,
                followed_id: followed,
            })
        });
        let app = init_app!(repo);

        let req = test::TestRequest::post()
            .uri("/follows")
            .set_json(serde_json::json!({"followerID": 1, "followedID": 2}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn follow_unknown_user_returns_400() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_follow_user()
            .returning(|_, _| Err(GraphError::UserNotFound("2".into())));
        let app = init_app!(repo);

        let req = test::TestRequest::post()
            .uri("/follows")
            .set_json(serde_json::json!({"followerID": 1, "followedID": 2}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unfollow_maps_path_segments() {
        let mut repo = MockFollowRepositoryTrait::new();
        // /unfollow/{followed}/{follower}
        repo.expect_unfollow_user()
            .withf(|follow: &Follow| follow.follower_id == 3 && follow.followed_id == 7)
            .times(1)
            .returning(|_| Ok(()));
        let app = init_app!(repo);

        let req = test::TestRequest::delete()
            .uri("/unfollow/7/3")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unfollow_store_error_returns_400() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_unfollow_user()
            .returning(|_| Err(GraphError::Store("connection reset".into())));
        let app = init_app!(repo);

        let req = test::TestRequest::delete()
            .uri("/unfollow/7/3")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn check_following_200_and_404() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_check_follow()
            .returning(|follower, followed| Ok(follower == 1 && followed == 2));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/check-following")
            .set_json(serde_json::json!({"followerID": 1, "followedID": 2}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "User is following");

        // reverse direction is a different edge
        let req = test::TestRequest::get()
            .uri("/check-following")
            .set_json(serde_json::json!({"followerID": 2, "followedID": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::read_body(resp).await, "User is not following");
    }

    #[actix_web::test]
    async fn check_following_store_error_returns_500() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_check_follow()
            .returning(|_, _| Err(GraphError::Store("unavailable".into())));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/check-following")
            .set_json(serde_json::json!({"followerID": 1, "followedID": 2}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn following_lists_edges_and_ids() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_get_user_following()
            .withf(|user_id| *user_id == 1)
            .times(2)
            .returning(|user_id| Ok(vec![Follow::new(user_id, 2), Follow::new(user_id, 3)]));
        repo.expect_get_user_following_ids()
            .withf(|user_id| *user_id == 1)
            .returning(|_| Ok(vec![2, 3]));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/user/following/1")
            .to_request();
        let edges: Vec<Follow> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(edges, vec![Follow::new(1, 2), Follow::new(1, 3)]);

        // legacy alias
        let req = test::TestRequest::get().uri("/user/1").to_request();
        let alias: Vec<Follow> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(alias, edges);

        let req = test::TestRequest::get()
            .uri("/user/following-ids/1")
            .to_request();
        let ids: Vec<i64> = test::call_and_read_body_json(&app, req).await;
        let edge_ids: Vec<i64> = edges.iter().map(|f| f.followed_id).collect();
        assert_eq!(ids, edge_ids);
    }

    #[actix_web::test]
    async fn empty_lists_serialize_as_empty_arrays() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_get_user_followers().returning(|_| Ok(Vec::new()));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/user/followers/42")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "[]");
    }

    #[actix_web::test]
    async fn list_store_error_returns_500() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_get_user_followers()
            .returning(|_| Err(GraphError::Timeout(std::time::Duration::from_secs(10))));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/user/followers/42")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn non_integer_user_id_returns_400() {
        let app = init_app!(MockFollowRepositoryTrait::new());

        let req = test::TestRequest::get()
            .uri("/recommendation/abc")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn recommendations_return_id_list() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_get_follow_recommendations()
            .withf(|user_id| *user_id == 1)
            .returning(|_| Ok(vec![3, 4]));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/recommendation/1")
            .to_request();
        let ids: Vec<i64> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(ids, vec![3, 4]);
    }

    #[actix_web::test]
    async fn recommendations_store_error_returns_500() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_get_follow_recommendations()
            .returning(|_| Err(GraphError::Store("query failed".into())));
        let app = init_app!(repo);

        let req = test::TestRequest::get()
            .uri("/recommendation/1")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn ready_reflects_store_health() {
        let mut repo = MockFollowRepositoryTrait::new();
        repo.expect_health_check()
            .returning(|| Err(GraphError::Store("Neo4j health check failed".into())));
        let app = init_app!(repo);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/ready").to_request()).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
