// src/services/settings_service.rs

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::SettingsRepository,
    models::settings::{SiteSettings, UpdateSettingsRequest},
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository) -> Self {
        Self { repo }
    }

    pub async fn get_settings<'e, E>(&self, executor: E) -> Result<SiteSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.get_settings(executor).await
    }

    /// Lê, aplica o merge parcial e grava, tudo na mesma transação.
    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        patch: UpdateSettingsRequest,
    ) -> Result<SiteSettings, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut settings = self.repo.get_settings(&mut *tx).await?;
        settings.merge(patch);
        let saved = self.repo.save_settings(&mut *tx, &settings).await?;

        tx.commit().await?;

        tracing::info!("⚙️ Configurações da loja atualizadas");
        Ok(saved)
    }
}
