use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{anyhow, Context, Result};
use follows_service::config::Config;
use follows_service::handlers::{self, SharedRepository};
use follows_service::Neo4jFollowRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "follows_service=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting follows-service");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        "Configuration loaded: HTTP port = {}, Neo4j URI = {}, query timeout = {:?}",
        config.server.http_port, config.neo4j.uri, config.neo4j.query_timeout
    );

    let neo4j_repo = Neo4jFollowRepository::new(
        &config.neo4j.uri,
        &config.neo4j.user,
        &config.neo4j.password,
        config.neo4j.query_timeout,
    )
    .context("Failed to initialize Neo4j repository")?;

    // Connectivity must be proven before serving; no retry
    match neo4j_repo.health_check().await {
        Ok(true) => info!("Neo4j health check passed: {}", config.neo4j.uri),
        Ok(false) => {
            error!("Neo4j health check returned an unexpected result");
            return Err(anyhow!("Neo4j is not healthy"));
        }
        Err(e) => {
            error!("Neo4j health check failed: {}", e);
            return Err(anyhow!(e).context("Neo4j is not reachable"));
        }
    }

    let repo: SharedRepository = Arc::new(neo4j_repo);
    let repo_data = web::Data::new(repo);

    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    info!("Starting HTTP server on {}", http_addr);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .wrap(TracingLogger::default())
            .app_data(repo_data.clone())
            .configure(handlers::configure)
    })
    .keep_alive(Duration::from_secs(120))
    .client_request_timeout(Duration::from_secs(5))
    .shutdown_timeout(30)
    .disable_signals()
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run();

    let handle = server.handle();
    let mut server_task = actix_web::rt::spawn(server);

    let outcome = tokio::select! {
        outcome = &mut server_task => outcome,
        _ = shutdown_signal() => {
            info!("Shutdown signal received, draining connections");
            handle.stop(true).await;
            server_task.await
        }
    };

    match outcome {
        Ok(Ok(())) => info!("HTTP server stopped"),
        Ok(Err(e)) => return Err(anyhow!("HTTP server error: {}", e)),
        Err(e) => return Err(anyhow!("HTTP server task panicked: {}", e)),
    }

    // The server and its app factories are dropped by now, closing the Neo4j pool
    info!("Neo4j driver released, follows-service shut down");
    Ok(())
}
