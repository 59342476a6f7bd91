use std::sync::Arc;

use mongodb::Database;

use crate::{
    db::mongo::{connect, ensure_indexes},
    repositories::{
        contact::ContactRepository,
        memory_repo::{InMemoryContactRepo, InMemoryProjectRepo},
        mongo_repo::{MongoContactRepo, MongoProjectRepo},
        project::ProjectRepository,
    },
    settings::{AppConfig, DatabaseBackend},
};

#[derive(Clone)]
pub struct SharedRepositories {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
}

impl SharedRepositories {
    pub fn mongo(database: &Database) -> Self {
        SharedRepositories {
            project_repo: Arc::new(MongoProjectRepo::new(database)),
            contact_repo: Arc::new(MongoContactRepo::new(database)),
        }
    }

    pub fn in_memory() -> Self {
        SharedRepositories {
            project_repo: Arc::new(InMemoryProjectRepo::new()),
            contact_repo: Arc::new(InMemoryContactRepo::new()),
        }
    }

    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.database_backend {
            DatabaseBackend::Memory => {
                tracing::warn!("Using the in-memory backend; data is lost on restart");
                Ok(Self::in_memory())
            }
            DatabaseBackend::Mongo => {
                let database = connect(&config.database_url, &config.database_name).await?;
                ensure_indexes(&database).await?;
                Ok(Self::mongo(&database))
            }
        }
    }
}
