use std::time::Duration;

use anyhow::Context;
use bson::{doc, Document};
use mongodb::{
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};
use tracing::info;

use crate::constants::{CONTACTS_COLLECTION, PROJECTS_COLLECTION};

pub async fn connect(database_url: &str, database_name: &str) -> anyhow::Result<Database> {
    let max_retries = 5;
    let mut retry_count = 0;
    let mut wait_seconds = 2;

    let mut options = ClientOptions::parse(database_url)
        .await
        .context("Invalid database URL")?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.server_selection_timeout = Some(Duration::from_secs(5));

    let client = Client::with_options(options)?;
    let database = client.database(database_name);

    // The driver connects lazily; a ping proves the server is reachable.
    loop {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => {
                info!(database = database_name, "Database connection established.");
                return Ok(database);
            }
            Err(e) if retry_count < max_retries => {
                retry_count += 1;
                info!(
                    "Failed to connect to database (attempt {}/{}): {}. Retrying in {}s...",
                    retry_count, max_retries, e, wait_seconds);

                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;

                wait_seconds *= 2;
            }
            Err(e) => return Err(e).context("Database unreachable"),
        }
    }
}

/// Both collections are listed newest first.
pub async fn ensure_indexes(database: &Database) -> anyhow::Result<()> {
    for collection in [PROJECTS_COLLECTION, CONTACTS_COLLECTION] {
        let index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(IndexOptions::builder().name("createdAt_desc".to_string()).build())
            .build();

        database
            .collection::<Document>(collection)
            .create_index(index)
            .await
            .with_context(|| format!("Failed to create index on {}", collection))?;
    }

    Ok(())
}
