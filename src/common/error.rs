use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::orders::OrderStatus,
};

#[derive(Debug, Error)]
pub enum AppError {
    // --- Validação (400) ---
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Tipo de entrega inválido: {0}")]
    InvalidDeliveryType(String),

    #[error("Quantidade inválida: {0}")]
    InvalidQuantity(i32),

    #[error("Valor inválido: {0}")]
    InvalidAmount(Decimal),

    #[error("Campo obrigatório ausente no pedido: {0}")]
    MissingOrderField(&'static str),

    #[error("Nenhuma wilaya selecionada")]
    ZoneRequired,

    #[error("Comuna '{commune}' não pertence à wilaya {zone}")]
    CommuneNotInZone { commune: String, zone: String },

    #[error("Transição de status recusada: {from} -> {to}")]
    TransitionRejected { from: OrderStatus, to: OrderStatus },

    // --- Referências desconhecidas (404) ---
    #[error("Zona de entrega não encontrada: {0}")]
    ZoneNotFound(String),

    #[error("Pedido não encontrado: {0}")]
    OrderNotFound(Uuid),

    // --- Autenticação (401) ---
    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // --- Infra (500) ---
    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidDeliveryType(_)
            | AppError::InvalidQuantity(_)
            | AppError::InvalidAmount(_)
            | AppError::MissingOrderField(_)
            | AppError::ZoneRequired
            | AppError::CommuneNotInZone { .. } => StatusCode::BAD_REQUEST,
            AppError::TransitionRejected { .. } => StatusCode::CONFLICT,
            AppError::ZoneNotFound(_) | AppError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidToken | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.as_str();
        let status = self.status_code();

        let (message, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                (i18n.translate(lang, "error.validation"), Some(details))
            }
            AppError::InvalidDeliveryType(value) => (
                i18n.translate_with(lang, "error.invalid_delivery_type", &[("value", value)]),
                None,
            ),
            AppError::InvalidQuantity(_) => (i18n.translate(lang, "error.invalid_quantity"), None),
            AppError::InvalidAmount(value) => (
                i18n.translate_with(lang, "error.invalid_amount", &[("value", &value.to_string())]),
                None,
            ),
            AppError::MissingOrderField(field) => (
                i18n.translate_with(lang, "error.missing_order_field", &[("field", field)]),
                None,
            ),
            AppError::ZoneRequired => (i18n.translate(lang, "error.zone_required"), None),
            AppError::CommuneNotInZone { commune, zone } => (
                i18n.translate_with(
                    lang,
                    "error.commune_not_in_zone",
                    &[("commune", commune), ("zone", zone)],
                ),
                None,
            ),
            AppError::TransitionRejected { from, to } => (
                i18n.translate_with(
                    lang,
                    "error.transition_rejected",
                    &[("from", from.as_str()), ("to", to.as_str())],
                ),
                None,
            ),
            AppError::ZoneNotFound(code) => (
                i18n.translate_with(lang, "error.zone_not_found", &[("code", code)]),
                None,
            ),
            AppError::OrderNotFound(_) => (i18n.translate(lang, "error.order_not_found"), None),
            AppError::InvalidToken | AppError::JwtError(_) => {
                (i18n.translate(lang, "error.invalid_token"), None)
            }
            AppError::FontNotFound(_) => {
                tracing::error!("Erro Interno do Servidor: {}", self);
                (i18n.translate(lang, "error.font_not_found"), None)
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (i18n.translate(lang, "error.internal"), None)
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (i18n.translate(lang, "error.internal"), None)
            }
        };

        ApiError { status, message, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "required"))]
        name: String,
    }

    fn store() -> I18nStore {
        I18nStore::load().unwrap()
    }

    #[test]
    fn test_validation_and_not_found_are_distinct() {
        let store = store();
        let fr = Locale::default();

        let bad_type = AppError::InvalidDeliveryType("express".into()).to_api_error(&fr, &store);
        let bad_qty = AppError::InvalidQuantity(0).to_api_error(&fr, &store);
        let no_zone = AppError::ZoneNotFound("99".into()).to_api_error(&fr, &store);
        let no_order = AppError::OrderNotFound(Uuid::nil()).to_api_error(&fr, &store);

        assert_eq!(bad_type.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad_qty.status, StatusCode::BAD_REQUEST);
        assert_eq!(no_zone.status, StatusCode::NOT_FOUND);
        assert_eq!(no_order.status, StatusCode::NOT_FOUND);
        assert_eq!(no_zone.message, "Wilaya introuvable: 99");
    }

    #[test]
    fn test_messages_follow_locale() {
        let store = store();
        let ar = Locale("ar".to_string());

        let err = AppError::OrderNotFound(Uuid::nil()).to_api_error(&ar, &store);
        assert_eq!(err.message, "الطلب غير موجود.");
    }

    #[test]
    fn test_validation_details_per_field() {
        let store = store();
        let errors = Payload { name: String::new() }.validate().unwrap_err();

        let api = AppError::from(errors).to_api_error(&Locale::default(), &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["name"], vec!["required".to_string()]);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let store = store();
        let err = AppError::InternalServerError(anyhow::anyhow!("pool exhausted"))
            .to_api_error(&Locale::default(), &store);

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("pool"));
    }

    #[test]
    fn test_missing_zone_and_foreign_commune_are_bad_requests() {
        let store = store();
        let fr = Locale::default();

        let no_zone = AppError::ZoneRequired.to_api_error(&fr, &store);
        assert_eq!(no_zone.status, StatusCode::BAD_REQUEST);
        assert_eq!(no_zone.message, "Veuillez sélectionner une wilaya.");

        let foreign = AppError::CommuneNotInZone {
            commune: "Es Senia".to_string(),
            zone: "16".to_string(),
        }
        .to_api_error(&fr, &store);
        assert_eq!(foreign.status, StatusCode::BAD_REQUEST);
        assert_eq!(foreign.message, "La commune Es Senia n'appartient pas à la wilaya 16.");
    }
}
