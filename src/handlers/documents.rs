// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedAdmin, i18n::Locale},
};

// GET /api/admin/orders/{id}/invoice
#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}/invoice",
    tag = "Documents",
    responses(
        (status = 200, description = "Fatura em PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Pedido inexistente")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do pedido"),
        ("Accept-Language" = Option<String>, Header, description = "fr (padrão) ou ar")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: AuthenticatedAdmin,
    Path(order_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let invoice = app_state
        .document_service
        .generate_invoice_pdf(&app_state.db_pool, order_id, locale.as_str(), &app_state.i18n_store)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    // Configura os Headers para o navegador baixar o PDF
    let disposition = format!("attachment; filename=\"{}\"", invoice.file_name);
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    Ok((headers, invoice.bytes).into_response())
}
