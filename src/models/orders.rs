// src/models/orders.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{common::error::AppError, models::delivery::DeliveryType};

/// Ator gravado no primeiro evento de todo pedido.
pub const CUSTOMER_ACTOR: &str = "customer";

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Shipping,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Shipping,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn label_key(&self) -> String {
        format!("status.{}", self.as_str())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Ledger ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    // "updatedBy" é o nome usado pelos documentos antigos
    #[serde(alias = "updatedBy")]
    #[schema(example = "admin@sanaa.dz")]
    pub actor: String,
}

/// Histórico de status de um pedido. Só cresce: não há remoção nem reordenação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct StatusLedger(Vec<StatusEvent>);

impl StatusLedger {
    /// Abre o histórico com o evento inicial `{pending, created_at, "customer"}`.
    pub fn open(created_at: DateTime<Utc>) -> Self {
        Self(vec![StatusEvent {
            status: OrderStatus::Pending,
            timestamp: created_at,
            actor: CUSTOMER_ACTOR.to_string(),
        }])
    }

    pub fn events(&self) -> &[StatusEvent] {
        &self.0
    }

    pub fn last(&self) -> Option<&StatusEvent> {
        self.0.last()
    }

    fn push(&mut self, event: StatusEvent) {
        self.0.push(event);
    }
}

/// Gancho de validação de transições.
/// O ledger chama `check` antes de anexar; a política padrão aceita tudo.
pub trait TransitionPolicy: Send + Sync {
    fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveTransitions;

impl TransitionPolicy for PermissiveTransitions {
    fn check(&self, _from: OrderStatus, _to: OrderStatus) -> Result<(), AppError> {
        Ok(())
    }
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[schema(example = "Amina Benali")]
    pub full_name: String,
    #[schema(example = "0555 12 34 56")]
    pub phone: String,
    #[schema(example = "Cité 200 logements, Bt 4")]
    pub address: String,
    #[schema(example = "16")]
    pub zone_code: String,
    #[schema(example = "Alger")]
    pub zone_name: String,
    #[schema(example = "Bab Ezzouar")]
    pub commune_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    #[schema(example = "hijab-1")]
    pub product_id: String,
    #[schema(example = "Hijab Soie Premium")]
    pub title_fr: String,
    #[schema(example = "حجاب حرير فاخر")]
    pub title_ar: String,
    #[schema(example = "1500")]
    pub unit_price: Decimal,
    #[schema(example = "Beige")]
    pub color_name: Option<String>,
    pub image_url: Option<String>,
    #[schema(example = 2)]
    pub quantity: i32,
}

impl OrderLineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,

    #[sqlx(flatten)]
    pub customer: Customer,

    #[sqlx(flatten)]
    pub line_item: OrderLineItem,

    pub delivery_type: DeliveryType,

    /// Congelado na criação; nunca recalculado a partir da tabela de zonas.
    #[schema(example = "590")]
    pub delivery_price: Decimal,

    #[schema(example = "3590")]
    pub total_price: Decimal,

    pub notes: Option<String>,

    pub status: OrderStatus,

    #[sqlx(json)]
    pub status_history: StatusLedger,

    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Order {
    /// Monta o snapshot de um pedido novo. Os valores já chegam calculados.
    pub fn place(
        customer: Customer,
        line_item: OrderLineItem,
        delivery_type: DeliveryType,
        delivery_price: Decimal,
        total_price: Decimal,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer,
            line_item,
            delivery_type,
            delivery_price,
            total_price,
            notes: notes.filter(|n| !n.trim().is_empty()),
            status: OrderStatus::Pending,
            status_history: StatusLedger::open(now),
            created_at: now,
            last_updated: None,
        }
    }

    /// Referência curta: "#" + 8 primeiros caracteres do id, em maiúsculas.
    pub fn reference(&self) -> String {
        format!("#{}", self.short_id())
    }

    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(8).collect::<String>().to_uppercase()
    }

    /// Anexa um evento ao histórico e atualiza `status`.
    /// Retorna o evento anexado para o repositório persistir.
    pub fn append_status(
        &mut self,
        new_status: OrderStatus,
        actor: &str,
        now: DateTime<Utc>,
        policy: &dyn TransitionPolicy,
    ) -> Result<StatusEvent, AppError> {
        let current = self.status_history.last().map_or(self.status, |e| e.status);
        policy.check(current, new_status)?;

        let event = StatusEvent {
            status: new_status,
            timestamp: now,
            actor: actor.to_string(),
        };
        self.status_history.push(event.clone());
        self.status = new_status;
        self.last_updated = Some(now);

        Ok(event)
    }
}

#[cfg(test)]
pub(crate) fn sample_order() -> Order {
    use chrono::TimeZone;

    let created = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();
    Order::place(
        Customer {
            full_name: "Amina Benali".to_string(),
            phone: "0555123456".to_string(),
            address: "Cité 200 logements, Bt 4".to_string(),
            zone_code: "16".to_string(),
            zone_name: "Alger".to_string(),
            commune_name: Some("Bab Ezzouar".to_string()),
        },
        OrderLineItem {
            product_id: "hijab-1".to_string(),
            title_fr: "Hijab Soie Premium".to_string(),
            title_ar: "حجاب حرير فاخر".to_string(),
            unit_price: Decimal::from(1500),
            color_name: Some("Beige".to_string()),
            image_url: None,
            quantity: 2,
        },
        DeliveryType::Home,
        Decimal::from(590),
        Decimal::from(3590),
        None,
        created,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    struct NoReopening;

    impl TransitionPolicy for NoReopening {
        fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<(), AppError> {
            if from == OrderStatus::Completed && to == OrderStatus::Pending {
                return Err(AppError::TransitionRejected { from, to });
            }
            Ok(())
        }
    }

    #[test]
    fn test_new_order_starts_pending_by_customer() {
        let order = sample_order();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.status_history.events().len(), 1);
        let first = &order.status_history.events()[0];
        assert_eq!(first.status, OrderStatus::Pending);
        assert_eq!(first.timestamp, order.created_at);
        assert_eq!(first.actor, CUSTOMER_ACTOR);
        assert!(order.last_updated.is_none());
    }

    #[test]
    fn test_pending_shipping_delivered_scenario() {
        let mut order = sample_order();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 6, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 3, 8, 15, 0, 0).unwrap();

        order.append_status(OrderStatus::Shipping, "admin@x", t1, &PermissiveTransitions).unwrap();
        order.append_status(OrderStatus::Delivered, "admin@x", t2, &PermissiveTransitions).unwrap();

        let statuses: Vec<OrderStatus> =
            order.status_history.events().iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![OrderStatus::Pending, OrderStatus::Shipping, OrderStatus::Delivered]
        );
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.last_updated, Some(t2));
        assert_eq!(order.status_history.events()[1].actor, "admin@x");
    }

    #[test]
    fn test_append_only_over_many_transitions() {
        let mut order = sample_order();
        let before = order.status_history.events().to_vec();
        let start = order.created_at;

        for (i, status) in OrderStatus::ALL.iter().cycle().take(20).enumerate() {
            let now = start + Duration::minutes(i as i64 + 1);
            order.append_status(*status, "admin", now, &PermissiveTransitions).unwrap();

            assert_eq!(order.status_history.events().len(), i + 2);
            assert_eq!(order.status_history.last().unwrap().status, order.status);
        }

        // Os eventos antigos continuam intactos no início
        assert_eq!(&order.status_history.events()[..before.len()], before.as_slice());
    }

    #[test]
    fn test_permissive_policy_allows_any_transition() {
        let mut order = sample_order();
        let now = order.created_at;

        order.append_status(OrderStatus::Completed, "admin", now, &PermissiveTransitions).unwrap();
        order.append_status(OrderStatus::Pending, "admin", now, &PermissiveTransitions).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.status_history.events().len(), 3);
    }

    #[test]
    fn test_rejected_transition_leaves_history_untouched() {
        let mut order = sample_order();
        let now = order.created_at;
        order.append_status(OrderStatus::Completed, "admin", now, &NoReopening).unwrap();

        let err = order
            .append_status(OrderStatus::Pending, "admin", now, &NoReopening)
            .unwrap_err();

        assert!(matches!(err, AppError::TransitionRejected { .. }));
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.status_history.events().len(), 2);
    }

    #[test]
    fn test_reference_is_uppercased_prefix() {
        let mut order = sample_order();
        order.id = Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap();

        assert_eq!(order.short_id(), "A1B2C3D4");
        assert_eq!(order.reference(), "#A1B2C3D4");
    }

    #[test]
    fn test_blank_notes_are_dropped_on_place() {
        let order = sample_order();
        let again = Order::place(
            order.customer.clone(),
            order.line_item.clone(),
            order.delivery_type,
            order.delivery_price,
            order.total_price,
            Some("   ".to_string()),
            order.created_at,
        );
        assert!(again.notes.is_none());
    }

    #[test]
    fn test_legacy_history_deserializes() {
        let raw = r#"[{"status":"pending","timestamp":"2024-03-05T10:30:00Z","updatedBy":"customer"}]"#;
        let ledger: StatusLedger = serde_json::from_str(raw).unwrap();
        assert_eq!(ledger.events().len(), 1);
        assert_eq!(ledger.events()[0].actor, "customer");
    }
}
