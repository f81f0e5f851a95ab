mod accounts;
mod applications;
mod blob;
mod board;
mod config;
mod dashboard;
mod db;
mod errors;
mod identity;
mod listings;
mod models;
mod routes;
mod session;
mod state;
mod store;
mod uploads;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::blob::{BlobStore, InMemoryBlobStore, S3BlobStore};
use crate::config::{Config, S3Config};
use crate::db::create_pool;
use crate::identity::HttpIdentityProvider;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::seed::sample_listings;
use crate::store::{DocumentStore, InMemoryDocumentStore, PgDocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Board API v{}", env!("CARGO_PKG_VERSION"));

    // Document store: PostgreSQL when configured, otherwise seeded memory
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(PgDocumentStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set, using the in-memory store with sample listings");
            Arc::new(InMemoryDocumentStore::with_listings(sample_listings()))
        }
    };

    // Blob store: S3 / MinIO when configured
    let blobs: Arc<dyn BlobStore> = match &config.s3 {
        Some(s3) => {
            let client = build_s3_client(s3).await;
            info!("S3 client initialized (bucket: {})", s3.bucket);
            Arc::new(S3BlobStore::new(client, s3.bucket.clone(), &s3.endpoint))
        }
        None => {
            warn!("S3_BUCKET not set, uploads are kept in memory");
            Arc::new(InMemoryBlobStore::new())
        }
    };

    let identity = Arc::new(HttpIdentityProvider::new(
        &config.identity_api_url,
        config.identity_api_key.clone(),
    )?);
    info!("Identity provider client initialized ({})", config.identity_api_url);

    let state = AppState {
        store,
        blobs,
        identity,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the front-end host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &S3Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "jobboard-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.endpoint)
        .load()
        .await;

    // MinIO only serves path-style addressing
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
