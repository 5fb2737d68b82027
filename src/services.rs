pub mod auth;
pub mod pricing;
pub mod invoice;
pub mod delivery_service;
pub use delivery_service::DeliveryService;
pub mod order_service;
pub use order_service::OrderService;
pub mod settings_service;
pub use settings_service::SettingsService;
pub mod document_service;
pub use document_service::DocumentService;
