use anyhow::{Context, Result};
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{io::ErrorKind, path::Path, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod store;

use services::{
    browse_service::{BrowseService, ServePolicy},
    path_codec::PathCodec,
    render::ListingRenderer,
};
use store::catalog_store::CatalogStore;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting bucket-browser with config: {:?}", cfg);

    if !Path::new(&cfg.storage_dir).is_dir() {
        tracing::warn!(
            "Storage directory {} does not exist; object downloads will fail",
            cfg.storage_dir
        );
    }

    // --- Open the catalog read-only ---
    let db_options = SqliteConnectOptions::from_str(&cfg.database_url)
        .with_context(|| format!("parsing database url `{}`", cfg.database_url))?
        .read_only(true);
    let db = Arc::new(
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(db_options)
            .await
            .with_context(|| format!("opening catalog {}", cfg.database_url))?,
    );

    // --- Initialize core service ---
    let store = CatalogStore::connect(db, cfg.storage_dir.clone(), &cfg.bucket)
        .await
        .with_context(|| format!("resolving bucket `{}`", cfg.bucket))?;
    let policy = ServePolicy {
        link_prefix: cfg.link_prefix.clone(),
        max_list_keys: cfg.max_list_keys,
        listing_max_age: cfg.listing_max_age,
        object_max_age: cfg.object_max_age,
    };
    let service = BrowseService::new(
        Arc::new(store),
        PathCodec::new(cfg.key_prefix.clone()),
        ListingRenderer::new().context("compiling listing template")?,
        policy,
    );

    // --- Build router ---
    let app: Router = routes::routes::routes(&cfg.link_prefix).with_state(service);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
