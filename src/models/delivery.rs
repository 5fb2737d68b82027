// src/models/delivery.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::error::AppError;

// --- Enums ---

/// Modo de entrega escolhido pela cliente.
/// `bureau`/`domicile` são as grafias antigas gravadas pela loja anterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "delivery_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    #[serde(alias = "bureau")]
    Counter,
    #[serde(alias = "domicile")]
    Home,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::Counter => "counter",
            DeliveryType::Home => "home",
        }
    }

    /// Chave no dicionário de traduções (ex: "delivery.counter")
    pub fn label_key(&self) -> &'static str {
        match self {
            DeliveryType::Counter => "delivery.counter",
            DeliveryType::Home => "delivery.home",
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "counter" | "bureau" => Ok(DeliveryType::Counter),
            "home" | "domicile" => Ok(DeliveryType::Home),
            other => Err(AppError::InvalidDeliveryType(other.to_string())),
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZone {
    #[schema(example = "16")]
    pub code: String,

    #[schema(example = "Alger")]
    pub name: String,

    /// Faixa de distância (0..5), apenas exibição
    #[schema(example = 0)]
    pub zone_class: i16,

    #[schema(example = "590")]
    pub home_price: Decimal,

    #[schema(example = "450")]
    pub counter_price: Decimal,

    #[schema(example = 1)]
    pub lead_days: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Comuna (baladiya) de uma wilaya.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Commune {
    #[schema(example = "16")]
    pub wilaya_code: String,

    #[schema(example = "Bab Ezzouar")]
    pub name: String,
}

/// Confere a comuna escolhida contra as comunas cadastradas da wilaya e
/// devolve o nome canônico. Wilaya sem comunas cadastradas aceita qualquer nome.
pub fn resolve_commune(
    zone_code: &str,
    requested: &str,
    communes: &[Commune],
) -> Result<String, AppError> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Err(AppError::MissingOrderField("customer.communeName"));
    }
    if communes.is_empty() {
        return Ok(requested.to_string());
    }

    communes
        .iter()
        .filter(|c| c.wilaya_code == zone_code)
        .find(|c| c.name.to_lowercase() == requested.to_lowercase())
        .map(|c| c.name.clone())
        .ok_or_else(|| AppError::CommuneNotInZone {
            commune: requested.to_string(),
            zone: zone_code.to_string(),
        })
}

/// Tabela de zonas já carregada em memória.
/// A ordem é sempre ascendente por código, independente da ordem de entrada.
#[derive(Debug, Clone, Default)]
pub struct DeliveryZoneTable {
    zones: Vec<DeliveryZone>,
}

impl DeliveryZoneTable {
    pub fn new(mut zones: Vec<DeliveryZone>) -> Self {
        zones.sort_by(|a, b| a.code.cmp(&b.code));
        Self { zones }
    }

    /// Busca exata pelo código administrativo. Nada de prefixo ou case-insensitive.
    pub fn lookup(&self, code: &str) -> Result<&DeliveryZone, AppError> {
        self.zones
            .binary_search_by(|z| z.code.as_str().cmp(code))
            .map(|idx| &self.zones[idx])
            .map_err(|_| AppError::ZoneNotFound(code.to_string()))
    }

    pub fn list(&self) -> &[DeliveryZone] {
        &self.zones
    }
}

#[cfg(test)]
pub(crate) fn zone(code: &str, counter: i64, home: i64) -> DeliveryZone {
    DeliveryZone {
        code: code.to_string(),
        name: format!("Wilaya {}", code),
        zone_class: 1,
        home_price: Decimal::from(home),
        counter_price: Decimal::from(counter),
        lead_days: 2,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_exact_match() {
        let table = DeliveryZoneTable::new(vec![zone("16", 450, 590), zone("31", 500, 700)]);

        let found = table.lookup("16").unwrap();
        assert_eq!(found.counter_price, Decimal::from(450));
        assert_eq!(found.home_price, Decimal::from(590));
    }

    #[test]
    fn test_lookup_unknown_code_is_not_found() {
        let table = DeliveryZoneTable::new(vec![zone("16", 450, 590)]);

        let err = table.lookup("99").unwrap_err();
        assert!(matches!(err, AppError::ZoneNotFound(ref c) if c == "99"));
    }

    #[test]
    fn test_lookup_does_not_match_partially() {
        let table = DeliveryZoneTable::new(vec![zone("16", 450, 590)]);

        assert!(table.lookup("1").is_err());
        assert!(table.lookup("016").is_err());
        assert!(table.lookup(" 16").is_err());
    }

    #[test]
    fn test_list_sorted_by_code() {
        let table = DeliveryZoneTable::new(vec![
            zone("31", 500, 700),
            zone("01", 800, 1100),
            zone("16", 450, 590),
        ]);

        let codes: Vec<&str> = table.list().iter().map(|z| z.code.as_str()).collect();
        assert_eq!(codes, vec!["01", "16", "31"]);
    }

    #[test]
    fn test_delivery_type_parsing() {
        assert_eq!("counter".parse::<DeliveryType>().unwrap(), DeliveryType::Counter);
        assert_eq!("home".parse::<DeliveryType>().unwrap(), DeliveryType::Home);
        assert_eq!("bureau".parse::<DeliveryType>().unwrap(), DeliveryType::Counter);
        assert_eq!("domicile".parse::<DeliveryType>().unwrap(), DeliveryType::Home);

        let err = "express".parse::<DeliveryType>().unwrap_err();
        assert!(matches!(err, AppError::InvalidDeliveryType(ref v) if v == "express"));
        assert!("".parse::<DeliveryType>().is_err());
    }

    #[test]
    fn test_delivery_type_serde_aliases() {
        let t: DeliveryType = serde_json::from_str("\"domicile\"").unwrap();
        assert_eq!(t, DeliveryType::Home);
        assert_eq!(serde_json::to_string(&DeliveryType::Counter).unwrap(), "\"counter\"");
    }

    fn communes() -> Vec<Commune> {
        ["Alger", "Bab Ezzouar", "Kouba"]
            .into_iter()
            .map(|name| Commune { wilaya_code: "16".to_string(), name: name.to_string() })
            .collect()
    }

    #[test]
    fn test_commune_must_belong_to_the_zone() {
        let communes = communes();

        assert_eq!(resolve_commune("16", " bab ezzouar ", &communes).unwrap(), "Bab Ezzouar");
        assert!(matches!(
            resolve_commune("16", "Es Senia", &communes),
            Err(AppError::CommuneNotInZone { ref commune, ref zone }) if commune == "Es Senia" && zone == "16"
        ));
    }

    #[test]
    fn test_commune_is_required() {
        assert!(matches!(
            resolve_commune("16", "   ", &communes()),
            Err(AppError::MissingOrderField("customer.communeName"))
        ));
        assert!(matches!(
            resolve_commune("40", "", &[]),
            Err(AppError::MissingOrderField(_))
        ));
    }

    #[test]
    fn test_zone_without_registered_communes_accepts_any_name() {
        assert_eq!(resolve_commune("40", "Khenchela", &[]).unwrap(), "Khenchela");
    }
}
