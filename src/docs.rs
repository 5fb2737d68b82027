// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Delivery ---
        handlers::delivery::list_zones,
        handlers::delivery::get_zone,
        handlers::delivery::list_communes,
        handlers::delivery::update_zone,

        // --- Orders ---
        handlers::orders::quote,
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::update_status,

        // --- Documents ---
        handlers::documents::download_invoice,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,
    ),
    components(
        schemas(
            // --- Delivery ---
            models::delivery::DeliveryType,
            models::delivery::DeliveryZone,
            models::delivery::Commune,
            handlers::delivery::UpdateZonePayload,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::StatusEvent,
            models::orders::StatusLedger,
            models::orders::Customer,
            models::orders::OrderLineItem,
            models::orders::Order,
            services::pricing::PriceQuote,
            handlers::orders::QuotePayload,
            handlers::orders::CreateOrderPayload,
            handlers::orders::UpdateStatusPayload,

            // --- Settings ---
            models::settings::InvoiceSettings,
            models::settings::SiteSettings,
            models::settings::UpdateSettingsRequest,
        )
    ),
    tags(
        (name = "Delivery", description = "Tarifas de entrega por wilaya"),
        (name = "Orders", description = "Pedidos da loja e histórico de status"),
        (name = "Documents", description = "Faturas em PDF"),
        (name = "Settings", description = "Configurações da loja e dados fiscais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
