pub mod auth;
pub mod delivery;
pub mod orders;
pub mod settings;
