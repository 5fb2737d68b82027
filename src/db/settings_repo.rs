use chrono::{DateTime, Utc};
use sqlx::{types::Json, Executor, FromRow, Postgres};

use crate::{
    common::error::AppError,
    models::settings::{InvoiceSettings, SiteSettings, SETTINGS_ID},
};

#[derive(FromRow)]
struct SettingsRow {
    site_name: Option<String>,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    invoice: Option<Json<InvoiceSettings>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<SettingsRow> for SiteSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            site_name: row.site_name,
            contact_phone: row.contact_phone,
            contact_email: row.contact_email,
            invoice: row.invoice.map(|Json(inv)| inv),
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone, Default)]
pub struct SettingsRepository;

impl SettingsRepository {
    pub fn new() -> Self {
        Self
    }

    /// Documento inexistente vira configuração padrão (sem bloco de fatura).
    pub async fn get_settings<'e, E>(&self, executor: E) -> Result<SiteSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            SELECT site_name, contact_phone, contact_email, invoice, updated_at
            FROM site_settings
            WHERE id = $1
            "#,
        )
        .bind(SETTINGS_ID)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(SiteSettings::from).unwrap_or_default())
    }

    /// UPSERT do documento inteiro; o merge parcial acontece antes, no service.
    pub async fn save_settings<'e, E>(
        &self,
        executor: E,
        settings: &SiteSettings,
    ) -> Result<SiteSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            INSERT INTO site_settings (id, site_name, contact_phone, contact_email, invoice, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (id)
            DO UPDATE SET
                site_name = EXCLUDED.site_name,
                contact_phone = EXCLUDED.contact_phone,
                contact_email = EXCLUDED.contact_email,
                invoice = EXCLUDED.invoice,
                updated_at = NOW()
            RETURNING site_name, contact_phone, contact_email, invoice, updated_at
            "#,
        )
        .bind(SETTINGS_ID)
        .bind(&settings.site_name)
        .bind(&settings.contact_phone)
        .bind(&settings.contact_email)
        .bind(settings.invoice.as_ref().map(Json))
        .fetch_one(executor)
        .await?;

        Ok(row.into())
    }
}
