// src/services/order_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DeliveryZoneRepository, OrdersRepository},
    models::{
        delivery::{resolve_commune, Commune, DeliveryType, DeliveryZone},
        orders::{Customer, Order, OrderLineItem, OrderStatus, TransitionPolicy},
    },
    services::pricing::{self, PriceQuote},
};

/// Dados vindos do formulário de compra, já validados no handler.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub zone_code: String,
    pub commune_name: String,
    pub delivery_type: String,
    pub line_item: OrderLineItem,
    pub notes: Option<String>,
}

/// Monta o pedido (sem I/O). Tipo de entrega inválido, zona ausente ou
/// comuna de outra wilaya interrompem aqui: nenhum pedido é produzido.
pub fn prepare_order(
    request: OrderRequest,
    zone: Option<&DeliveryZone>,
    communes: &[Commune],
    now: DateTime<Utc>,
) -> Result<Order, AppError> {
    let delivery_type: DeliveryType = request.delivery_type.parse()?;
    let zone = zone.ok_or_else(|| AppError::ZoneNotFound(request.zone_code.clone()))?;
    let commune_name = resolve_commune(&zone.code, &request.commune_name, communes)?;

    let quote = pricing::quote(
        zone,
        delivery_type,
        request.line_item.unit_price,
        request.line_item.quantity,
    )?;

    let customer = Customer {
        full_name: request.full_name,
        phone: request.phone,
        address: request.address,
        zone_code: zone.code.clone(),
        zone_name: zone.name.clone(),
        commune_name: Some(commune_name),
    };

    Ok(Order::place(
        customer,
        request.line_item,
        delivery_type,
        quote.delivery_fee,
        quote.total,
        request.notes,
        now,
    ))
}

#[derive(Clone)]
pub struct OrderService {
    orders_repo: OrdersRepository,
    zone_repo: DeliveryZoneRepository,
    policy: Arc<dyn TransitionPolicy>,
}

impl OrderService {
    pub fn new(
        orders_repo: OrdersRepository,
        zone_repo: DeliveryZoneRepository,
        policy: Arc<dyn TransitionPolicy>,
    ) -> Self {
        Self { orders_repo, zone_repo, policy }
    }

    pub async fn quote<'e, E>(
        &self,
        executor: E,
        zone_code: &str,
        delivery_type: &str,
        unit_price: Decimal,
        quantity: i32,
    ) -> Result<PriceQuote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let delivery_type: DeliveryType = delivery_type.parse()?;
        let zone = self
            .zone_repo
            .find_by_code(executor, zone_code)
            .await?
            .ok_or_else(|| AppError::ZoneNotFound(zone_code.to_string()))?;

        pricing::quote(&zone, delivery_type, unit_price, quantity)
    }

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        request: OrderRequest,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let zone = self.zone_repo.find_by_code(&mut *tx, &request.zone_code).await?;
        let communes = self.zone_repo.list_communes(&mut *tx, &request.zone_code).await?;
        let order = prepare_order(request, zone.as_ref(), &communes, Utc::now())?;
        let saved = self.orders_repo.insert_order(&mut *tx, &order).await?;

        tx.commit().await?;

        tracing::info!(
            "🛍️ Pedido {} criado: {} x{} + entrega {} = {}",
            saved.reference(),
            saved.line_item.product_id,
            saved.line_item.quantity,
            saved.delivery_price,
            saved.total_price
        );

        Ok(saved)
    }

    pub async fn get_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.orders_repo
            .find_by_id(executor, order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))
    }

    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        status: Option<OrderStatus>,
        limit: i64,
    ) -> Result<Vec<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.orders_repo.list_orders(executor, status, limit).await
    }

    /// Anexa um status ao histórico (via política de transição) e persiste.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        new_status: OrderStatus,
        actor: &str,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut order = self
            .orders_repo
            .find_by_id(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))?;

        let previous = order.status;
        let now = Utc::now();
        let event = order.append_status(new_status, actor, now, self.policy.as_ref())?;

        let saved = self
            .orders_repo
            .append_status(&mut *tx, order_id, &event, now)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))?;

        tx.commit().await?;

        tracing::info!(
            "📦 Pedido {}: {} -> {} por {} ({} eventos)",
            saved.reference(),
            previous,
            new_status,
            actor,
            saved.status_history.events().len()
        );

        Ok(saved)
    }
}
