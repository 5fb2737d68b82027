pub mod delivery;
pub mod documents;
pub mod orders;
pub mod settings;
