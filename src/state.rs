use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::users::{MemoryDirectory, PgDirectory, UserDirectory};

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self {
            directory: Arc::new(PgDirectory::new(pool)),
            config,
        })
    }

    pub fn from_parts(directory: Arc<dyn UserDirectory>, config: Arc<AppConfig>) -> Self {
        Self { directory, config }
    }

    /// State backed by an empty in-memory directory, for tests.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: "postgres://unused".into(),
            tokens: crate::config::TokenConfig {
                access_secret: "test-access-secret".into(),
                refresh_secret: "test-refresh-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                access_ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            protected_routes: vec!["/me".into()],
        });
        Self {
            directory: Arc::new(MemoryDirectory::new()),
            config,
        }
    }
}
