pub mod zone_repo;
pub use zone_repo::DeliveryZoneRepository;
pub mod orders_repo;
pub use orders_repo::OrdersRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
