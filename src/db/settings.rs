use color_eyre::Result;
use libsql::params;

use super::helpers::query_optional;
use super::models::SettingsRow;
use super::Db;
use crate::models::AppSettings;
use crate::seed;

impl Db {
    /// The settings record, or the built-in defaults before the first save.
    pub async fn settings(&self) -> Result<AppSettings> {
        let conn = self.connect()?;
        let row: Option<SettingsRow> = query_optional(
            &conn,
            "SELECT restaurant_name, admin_password, logo_url, background_url
             FROM settings WHERE id = 1",
            (),
        )
        .await?;

        Ok(row.map(AppSettings::from).unwrap_or_else(seed::default_settings))
    }

    /// Wholesale overwrite; there is exactly one settings record.
    pub async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO settings (id, restaurant_name, admin_password, logo_url, background_url)
             VALUES (1, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 restaurant_name = excluded.restaurant_name,
                 admin_password = excluded.admin_password,
                 logo_url = excluded.logo_url,
                 background_url = excluded.background_url",
            params![
                settings.restaurant_name.clone(),
                settings.admin_password.clone(),
                settings.logo_url.clone(),
                settings.background_url.clone()
            ],
        )
        .await?;

        tracing::info!("settings saved");
        Ok(())
    }
}
