use color_eyre::Result;
use libsql::params;
use ulid::Ulid;

use super::Db;

impl Db {
    pub async fn create_admin_session(&self) -> Result<String> {
        let session = Ulid::new().to_string();

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO admin_sessions (id) VALUES (?)",
            params![session.clone()],
        )
        .await?;

        tracing::info!("new admin session created");
        Ok(session)
    }

    pub async fn admin_session_exists(&self, session: &str) -> Result<bool> {
        let conn = self.connect()?;
        let exists = conn
            .query(
                "SELECT EXISTS(SELECT 1 FROM admin_sessions WHERE id = ?)",
                params![session],
            )
            .await?
            .next()
            .await?
            .map(|row| row.get::<i64>(0))
            .transpose()?
            .unwrap_or(0);

        Ok(exists != 0)
    }

    pub async fn delete_admin_session(&self, session: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "DELETE FROM admin_sessions WHERE id = ?",
            params![session],
        )
        .await?;

        Ok(())
    }
}
