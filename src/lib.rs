pub mod config;
pub mod db;
pub mod domain;
pub mod dto;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod service;
pub mod startup;

use std::sync::Arc;

use repositories::{SqliteCategoryRepository, SqlitePhotoRepository};
use service::PhotoService;
use sqlx::SqlitePool;

/// AppState holds shared resources for the web server.
#[derive(Clone)]
pub struct AppState {
    pub service: PhotoService,
}

impl AppState {
    /// Wires the SQLite-backed stores into the service.
    pub fn new(pool: SqlitePool) -> Self {
        let service = PhotoService::new(
            Arc::new(SqliteCategoryRepository::new(pool.clone())),
            Arc::new(SqlitePhotoRepository::new(pool)),
        );
        Self { service }
    }
}
