// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::{DeliveryZoneRepository, OrdersRepository, SettingsRepository},
    models::orders::PermissiveTransitions,
    services::{auth::AuthService, DeliveryService, DocumentService, OrderService, SettingsService},
};

/// Variáveis de ambiente lidas na inicialização.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub font_dir: String,
    pub font_family: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {raw}"))?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections,
            font_dir: env::var("FONT_DIR").unwrap_or_else(|_| "./fonts".to_string()),
            font_family: env::var("FONT_FAMILY").unwrap_or_else(|_| "Roboto".to_string()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub delivery_service: DeliveryService,
    pub order_service: OrderService,
    pub settings_service: SettingsService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let i18n_store = Arc::new(I18nStore::load()?);

        // --- Monta o gráfico de dependências ---
        let zone_repo = DeliveryZoneRepository::new();
        let orders_repo = OrdersRepository::new();
        let settings_repo = SettingsRepository::new();

        let auth_service = AuthService::new(config.jwt_secret.clone());
        let delivery_service = DeliveryService::new(zone_repo.clone());
        let order_service = OrderService::new(
            orders_repo.clone(),
            zone_repo,
            Arc::new(PermissiveTransitions),
        );
        let settings_service = SettingsService::new(settings_repo.clone());
        let document_service = DocumentService::new(
            orders_repo,
            settings_repo,
            config.font_dir.clone(),
            config.font_family.clone(),
        );

        Ok(Self {
            db_pool,
            i18n_store,
            auth_service,
            delivery_service,
            order_service,
            settings_service,
            document_service,
        })
    }
}
