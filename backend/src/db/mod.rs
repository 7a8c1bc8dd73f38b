//! Database module for post storage.
//!
//! This module provides abstractions for database operations via the Repository
//! pattern, allowing storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                             │
//! │  - Schema validation before any store access             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - PostRepository         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │ LocalRepository (in-memory)   │
//!     │ PostgresRepository (Diesel)   │
//!     └──────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//! ```ignore
//! use posts_api::db::{self, services};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let repo = db::init_repository().await?;
//!     let posts = services::list_posts(repo.as_ref(), &Default::default()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod postgres_config;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


pub use factory::{RepositoryFactory, RepositoryType};
pub use postgres_config::PostgresConfig;
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{ErrorContext, PostRepository, RepositoryError, RepositoryResult};

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Create the repository selected by the runtime configuration.
///
/// A `repository.toml` in one of the standard locations wins; otherwise the
/// backend is chosen from `REPOSITORY_TYPE` / `DATABASE_URL`.
pub async fn init_repository() -> Result<Arc<dyn PostRepository>> {
    init_repository_in(Path::new(".")).await
}

/// Like [`init_repository`], searching for `repository.toml` relative to `base`.
///
/// A config file that exists but cannot be read or parsed is an error; only
/// a missing file falls back to the environment.
pub async fn init_repository_in(base: &Path) -> Result<Arc<dyn PostRepository>> {
    let config = RepositoryConfig::locate(base).context("Failed to load repository.toml")?;

    let repo = match config {
        Some(config) => {
            log::info!(
                "Using repository.toml (type={})",
                config.repository.repo_type
            );
            RepositoryFactory::from_repository_config(&config).await
        }
        None => {
            log::info!("No repository.toml found, using environment");
            RepositoryFactory::from_env().await
        }
    };

    repo.context("Failed to initialize post repository")
}
