// src/handlers/delivery.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedAdmin, i18n::Locale},
    models::delivery::{Commune, DeliveryZone},
};

// GET /api/delivery-zones
#[utoipa::path(
    get,
    path = "/api/delivery-zones",
    tag = "Delivery",
    responses(
        (status = 200, description = "Todas as wilayas, ordenadas por código", body = Vec<DeliveryZone>)
    )
)]
pub async fn list_zones(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let table = app_state
        .delivery_service
        .load_table(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(table.list().to_vec())))
}

// GET /api/delivery-zones/{code}
#[utoipa::path(
    get,
    path = "/api/delivery-zones/{code}",
    tag = "Delivery",
    responses(
        (status = 200, description = "Zona encontrada", body = DeliveryZone),
        (status = 404, description = "Zona inexistente")
    ),
    params(
        ("code" = String, Path, description = "Código da wilaya (ex: 16)")
    )
)]
pub async fn get_zone(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let zone = app_state
        .delivery_service
        .get_zone(&app_state.db_pool, &code)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(zone)))
}

// GET /api/delivery-zones/{code}/communes
#[utoipa::path(
    get,
    path = "/api/delivery-zones/{code}/communes",
    tag = "Delivery",
    responses(
        (status = 200, description = "Comunas da wilaya, em ordem alfabética", body = Vec<Commune>),
        (status = 404, description = "Zona inexistente")
    ),
    params(
        ("code" = String, Path, description = "Código da wilaya")
    )
)]
pub async fn list_communes(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let communes = app_state
        .delivery_service
        .list_communes(&app_state.db_pool, &code)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(communes)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateZonePayload {
    #[schema(example = "700")]
    pub home_price: Decimal,

    #[schema(example = "450")]
    pub counter_price: Decimal,

    #[validate(range(min = 1, max = 30, message = "invalid_lead_days"))]
    #[schema(example = 2)]
    pub lead_days: i32,
}

// PUT /api/admin/delivery-zones/{code}
#[utoipa::path(
    put,
    path = "/api/admin/delivery-zones/{code}",
    tag = "Delivery",
    request_body = UpdateZonePayload,
    responses(
        (status = 200, description = "Tarifas atualizadas", body = DeliveryZone),
        (status = 400, description = "Preço negativo, com mais de 2 casas ou acima de 9 999 999 999.99"),
        (status = 404, description = "Zona inexistente")
    ),
    params(
        ("code" = String, Path, description = "Código da wilaya")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_zone(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AuthenticatedAdmin,
    Path(code): Path<String>,
    Json(payload): Json<UpdateZonePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let zone = app_state
        .delivery_service
        .update_zone(
            &app_state.db_pool,
            &code,
            payload.home_price,
            payload.counter_price,
            payload.lead_days,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(zone)))
}
