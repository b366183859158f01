// Database module - provides the storage boundary for schema, settings,
// responses, and sessions.

use std::sync::Arc;

use color_eyre::{eyre::OptionExt, Result};

pub mod models;
pub use models::*;

mod admin;
mod helpers;
mod question;
mod response;
mod schema;
mod session;
mod settings;

// Main database handle
#[derive(Clone)]
pub struct Db {
    db: Arc<libsql::Database>,
}

impl Db {
    pub async fn new(url: String, auth_token: String) -> Result<Self> {
        let db = if let Some(path) = url.strip_prefix("file:") {
            // Local SQLite file
            libsql::Builder::new_local(path).build().await?
        } else {
            // Remote Turso database
            libsql::Builder::new_remote(url, auth_token).build().await?
        };

        let conn = db.connect()?;

        // Verify connection
        let one = conn
            .query("SELECT 1", ())
            .await?
            .next()
            .await?
            .ok_or_eyre("connection check failed")?
            .get::<i32>(0)?;
        assert_eq!(one, 1);

        // Initialize schema
        schema::create_schema(&conn).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { db: Arc::new(db) })
    }

    pub(crate) fn connect(&self) -> Result<libsql::Connection> {
        Ok(self.db.connect()?)
    }
}
