use super::SharedRepository;
use crate::domain::follow::User;
use crate::error::GraphError;
use actix_web::{web, HttpResponse};
use tracing::{error, info};

pub async fn add_user(
    repo: web::Data<SharedRepository>,
    body: web::Json<User>,
) -> Result<HttpResponse, GraphError> {
    let user = body.into_inner();

    repo.add_user(&user).await.map_err(|e| {
        error!(user_id = user.id, "Failed to create user: {}", e);
        e
    })?;

    info!("Created user: {} ({})", user.id, user.username);
    Ok(HttpResponse::Created().finish())
}
