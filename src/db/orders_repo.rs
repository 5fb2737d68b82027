// src/db/orders_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{types::Json, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{Order, OrderStatus, StatusEvent},
};

const ORDER_COLUMNS: &str = r#"
    id,
    full_name, phone, address, zone_code, zone_name, commune_name,
    product_id, title_fr, title_ar, unit_price, color_name, image_url, quantity,
    delivery_type, delivery_price, total_price, notes,
    status, status_history, created_at, last_updated
"#;

#[derive(Clone, Default)]
pub struct OrdersRepository;

impl OrdersRepository {
    pub fn new() -> Self {
        Self
    }

    /// Grava o snapshot completo do pedido num único INSERT.
    pub async fn insert_order<'e, E>(&self, executor: E, order: &Order) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO orders (
                id,
                full_name, phone, address, zone_code, zone_name, commune_name,
                product_id, title_fr, title_ar, unit_price, color_name, image_url, quantity,
                delivery_type, delivery_price, total_price, notes,
                status, status_history, created_at
            )
            VALUES (
                $1,
                $2, $3, $4, $5, $6, $7,
                $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18,
                $19, $20, $21
            )
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );

        let c = &order.customer;
        let item = &order.line_item;

        let saved = sqlx::query_as::<_, Order>(&sql)
            .bind(order.id)
            .bind(&c.full_name)
            .bind(&c.phone)
            .bind(&c.address)
            .bind(&c.zone_code)
            .bind(&c.zone_name)
            .bind(&c.commune_name)
            .bind(&item.product_id)
            .bind(&item.title_fr)
            .bind(&item.title_ar)
            .bind(item.unit_price)
            .bind(&item.color_name)
            .bind(&item.image_url)
            .bind(item.quantity)
            .bind(order.delivery_type)
            .bind(order.delivery_price)
            .bind(order.total_price)
            .bind(&order.notes)
            .bind(order.status)
            .bind(Json(&order.status_history))
            .bind(order.created_at)
            .fetch_one(executor)
            .await?;

        Ok(saved)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order_id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    /// Pedidos mais recentes primeiro, com filtro opcional de status.
    pub async fn list_orders<'e, E>(
        &self,
        executor: E,
        status: Option<OrderStatus>,
        limit: i64,
    ) -> Result<Vec<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {} FROM orders
            WHERE ($1::order_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            ORDER_COLUMNS
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(status)
            .bind(limit)
            .fetch_all(executor)
            .await?;

        Ok(orders)
    }

    /// Anexa o evento no próprio UPDATE (`||`), então duas chamadas
    /// concorrentes nunca apagam o evento uma da outra.
    /// Só `status`, `status_history` e `last_updated` são tocados.
    pub async fn append_status<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        event: &StatusEvent,
        last_updated: DateTime<Utc>,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE orders
            SET status = $2,
                status_history = status_history || $3::jsonb,
                last_updated = $4
            WHERE id = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order_id)
            .bind(event.status)
            .bind(Json([event]))
            .bind(last_updated)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }
}
