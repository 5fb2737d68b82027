// src/services/delivery_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::DeliveryZoneRepository,
    models::delivery::{Commune, DeliveryZone, DeliveryZoneTable},
    services::pricing,
};

#[derive(Clone)]
pub struct DeliveryService {
    repo: DeliveryZoneRepository,
}

impl DeliveryService {
    pub fn new(repo: DeliveryZoneRepository) -> Self {
        Self { repo }
    }

    pub async fn load_table<'e, E>(&self, executor: E) -> Result<DeliveryZoneTable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let zones = self.repo.list_zones(executor).await?;
        Ok(DeliveryZoneTable::new(zones))
    }

    pub async fn get_zone<'e, E>(&self, executor: E, code: &str) -> Result<DeliveryZone, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = self.load_table(executor).await?;
        table.lookup(code).cloned()
    }

    /// Comunas da wilaya, em ordem alfabética. Wilaya inexistente é 404.
    pub async fn list_communes<'e, E>(&self, executor: E, code: &str) -> Result<Vec<Commune>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        self.repo
            .find_by_code(&mut *conn, code)
            .await?
            .ok_or_else(|| AppError::ZoneNotFound(code.to_string()))?;

        self.repo.list_communes(&mut *conn, code).await
    }

    /// Edição do admin. Pedidos já gravados não são afetados (snapshot).
    pub async fn update_zone<'e, E>(
        &self,
        executor: E,
        code: &str,
        home_price: Decimal,
        counter_price: Decimal,
        lead_days: i32,
    ) -> Result<DeliveryZone, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        for price in [home_price, counter_price] {
            pricing::check_amount(price)?;
        }

        let zone = self
            .repo
            .update_pricing(executor, code, home_price, counter_price, lead_days)
            .await?
            .ok_or_else(|| AppError::ZoneNotFound(code.to_string()))?;

        tracing::info!(
            "🚚 Zona {} atualizada: balcão {} / domicílio {} ({} dias)",
            zone.code,
            zone.counter_price,
            zone.home_price,
            zone.lead_days
        );

        Ok(zone)
    }
}
