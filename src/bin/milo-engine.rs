// ABOUTME: Server binary: loads configuration, migrates storage, serves the engine API
// ABOUTME: Sits behind the product gateway, which authenticates and installs x-user-id
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Milo Training Engine Server

use anyhow::Result;
use clap::Parser;
use milo_training_engine::{
    config::EngineConfig, engine::TrainingEngine, logging, routes,
    storage::sqlite::SqliteDatabase,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

#[derive(Parser)]
#[command(name = "milo-engine")]
#[command(about = "Milo Training Engine - adaptive workout programs and training analytics")]
struct Args {
    /// Override the HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = EngineConfig::from_env()?;
    if let Some(port) = args.http_port {
        config.server.http_port = port;
    }
    if let Some(url) = args.database_url {
        config.server.database_url = url;
    }

    logging::init_from_env()?;
    info!("starting Milo Training Engine");

    let database = SqliteDatabase::new(&config.server.database_url).await?;
    database.migrate().await?;
    info!(url = %config.server.database_url, "database ready");

    let database = Arc::new(database);
    let engine = TrainingEngine::new(
        database.clone(),
        database.clone(),
        database,
        config.clone(),
    );

    let app = routes::router(engine)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(("0.0.0.0", config.server.http_port)).await?;
    info!(port = config.server.http_port, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
