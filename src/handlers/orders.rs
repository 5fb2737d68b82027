// src/handlers/orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedAdmin, i18n::Locale},
    models::orders::{Order, OrderLineItem, OrderStatus},
    services::{order_service::OrderRequest, pricing::PriceQuote},
};

const DEFAULT_LIST_LIMIT: i64 = 100;

// =============================================================================
//  1. LOJA (PÚBLICO)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "16")]
    pub zone_code: String,

    #[schema(example = "home")]
    pub delivery_type: String,

    #[schema(example = "1500")]
    pub unit_price: Decimal,

    #[validate(range(min = 1, max = 99, message = "invalid_quantity"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

// POST /api/orders/quote
#[utoipa::path(
    post,
    path = "/api/orders/quote",
    tag = "Orders",
    request_body = QuotePayload,
    responses(
        (status = 200, description = "Resumo de preço (nada é gravado)", body = PriceQuote),
        (status = 404, description = "Zona inexistente")
    )
)]
pub async fn quote(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<QuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .order_service
        .quote(
            &app_state.db_pool,
            &payload.zone_code,
            &payload.delivery_type,
            payload.unit_price,
            payload.quantity,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quote)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Amina Benali")]
    pub full_name: String,

    #[validate(length(min = 9, max = 20, message = "invalid_phone"))]
    #[schema(example = "0555123456")]
    pub phone: String,

    #[validate(length(min = 1, max = 300, message = "required"))]
    #[schema(example = "Cité 200 logements, Bt 4")]
    pub address: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "16")]
    pub zone_code: String,

    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Bab Ezzouar")]
    pub commune_name: String,

    /// "counter" ou "home" (aceita também "bureau" / "domicile")
    #[schema(example = "home")]
    pub delivery_type: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "hijab-1")]
    pub product_id: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Hijab Soie Premium")]
    pub title_fr: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "حجاب حرير فاخر")]
    pub title_ar: String,

    #[schema(example = "1500")]
    pub unit_price: Decimal,

    #[schema(example = "Beige")]
    pub color_name: Option<String>,

    pub image_url: Option<String>,

    #[validate(range(min = 1, max = 99, message = "invalid_quantity"))]
    #[schema(example = 2)]
    pub quantity: i32,

    #[validate(length(max = 2000, message = "too_long"))]
    pub notes: Option<String>,
}

impl From<CreateOrderPayload> for OrderRequest {
    fn from(payload: CreateOrderPayload) -> Self {
        OrderRequest {
            full_name: payload.full_name.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            address: payload.address.trim().to_string(),
            zone_code: payload.zone_code,
            commune_name: payload.commune_name.trim().to_string(),
            delivery_type: payload.delivery_type,
            line_item: OrderLineItem {
                product_id: payload.product_id,
                title_fr: payload.title_fr,
                title_ar: payload.title_ar,
                unit_price: payload.unit_price,
                color_name: payload.color_name,
                image_url: payload.image_url,
                quantity: payload.quantity,
            },
            notes: payload.notes,
        }
    }
}

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado (status pending)", body = Order),
        (status = 400, description = "Dados inválidos, valor fora da faixa, tipo de entrega desconhecido ou comuna de outra wilaya"),
        (status = 404, description = "Zona inexistente")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .order_service
        .create_order(&app_state.db_pool, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// =============================================================================
//  2. ADMIN
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersQuery {
    /// Filtra por status atual
    pub status: Option<OrderStatus>,
    /// Máximo de pedidos (padrão 100)
    pub limit: Option<i64>,
}

// GET /api/admin/orders
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    tag = "Orders",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Pedidos, mais recentes primeiro", body = Vec<Order>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AuthenticatedAdmin,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 500);

    let orders = app_state
        .order_service
        .list_orders(&app_state.db_pool, query.status, limit)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/admin/orders/{id}
#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido", body = Order),
        (status = 404, description = "Pedido inexistente")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AuthenticatedAdmin,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .get_order(&app_state.db_pool, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    #[schema(example = "shipping")]
    pub status: OrderStatus,
}

// PUT /api/admin/orders/{id}/status
#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    tag = "Orders",
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status anexado ao histórico", body = Order),
        (status = 404, description = "Pedido inexistente"),
        (status = 409, description = "Transição recusada pela política")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: AuthenticatedAdmin,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .update_status(&app_state.db_pool, order_id, payload.status, admin.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}
