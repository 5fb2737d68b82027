// src/db/zone_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::delivery::{Commune, DeliveryZone},
};

// Sem estado: cada chamada recebe o executor (pool, conexão ou transação).
#[derive(Clone, Default)]
pub struct DeliveryZoneRepository;

impl DeliveryZoneRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_zones<'e, E>(&self, executor: E) -> Result<Vec<DeliveryZone>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let zones = sqlx::query_as::<_, DeliveryZone>(
            r#"
            SELECT code, name, zone_class, home_price, counter_price, lead_days, updated_at
            FROM delivery_zones
            ORDER BY code ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(zones)
    }

    pub async fn find_by_code<'e, E>(
        &self,
        executor: E,
        code: &str,
    ) -> Result<Option<DeliveryZone>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let zone = sqlx::query_as::<_, DeliveryZone>(
            r#"
            SELECT code, name, zone_class, home_price, counter_price, lead_days, updated_at
            FROM delivery_zones
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(executor)
        .await?;

        Ok(zone)
    }

    /// Só preços e prazo são editáveis; código e nome são fixos.
    pub async fn update_pricing<'e, E>(
        &self,
        executor: E,
        code: &str,
        home_price: Decimal,
        counter_price: Decimal,
        lead_days: i32,
    ) -> Result<Option<DeliveryZone>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let zone = sqlx::query_as::<_, DeliveryZone>(
            r#"
            UPDATE delivery_zones
            SET home_price = $2, counter_price = $3, lead_days = $4, updated_at = NOW()
            WHERE code = $1
            RETURNING code, name, zone_class, home_price, counter_price, lead_days, updated_at
            "#,
        )
        .bind(code)
        .bind(home_price)
        .bind(counter_price)
        .bind(lead_days)
        .fetch_optional(executor)
        .await?;

        Ok(zone)
    }

    pub async fn list_communes<'e, E>(
        &self,
        executor: E,
        zone_code: &str,
    ) -> Result<Vec<Commune>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let communes = sqlx::query_as::<_, Commune>(
            r#"
            SELECT wilaya_code, name
            FROM communes
            WHERE wilaya_code = $1
            ORDER BY name ASC
            "#,
        )
        .bind(zone_code)
        .fetch_all(executor)
        .await?;

        Ok(communes)
    }
}
