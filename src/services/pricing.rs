// src/services/pricing.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    models::delivery::{DeliveryType, DeliveryZone},
};

/// Valores calculados para um pedido (ainda não persistido).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    #[schema(example = "3000")]
    pub subtotal: Decimal,
    #[schema(example = "590")]
    pub delivery_fee: Decimal,
    #[schema(example = "3590")]
    pub total: Decimal,
    #[schema(example = 1)]
    pub lead_days: i32,
}

/// Casas decimais das colunas NUMERIC(12, 2).
pub const MONEY_SCALE: u32 = 2;

/// Maior valor que cabe em NUMERIC(12, 2): 9 999 999 999.99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Valor monetário aceito: não negativo, no máximo 2 casas e dentro da coluna.
/// Assim o que é calculado aqui é exatamente o que o banco grava.
pub fn check_amount(amount: Decimal) -> Result<Decimal, AppError> {
    if amount.is_sign_negative() || amount.normalize().scale() > MONEY_SCALE || amount > MAX_AMOUNT {
        return Err(AppError::InvalidAmount(amount));
    }
    Ok(amount)
}

/// Preço de entrega da zona para o modo escolhido.
/// Zona ausente é erro: nunca cai para frete zero.
pub fn compute_delivery(
    zone: Option<&DeliveryZone>,
    delivery_type: DeliveryType,
) -> Result<Decimal, AppError> {
    let zone = zone.ok_or(AppError::ZoneRequired)?;

    Ok(match delivery_type {
        DeliveryType::Counter => zone.counter_price,
        DeliveryType::Home => zone.home_price,
    })
}

pub fn compute_subtotal(unit_price: Decimal, quantity: i32) -> Result<Decimal, AppError> {
    if quantity <= 0 {
        return Err(AppError::InvalidQuantity(quantity));
    }
    let unit_price = check_amount(unit_price)?;

    let subtotal = unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(AppError::InvalidAmount(unit_price))?;
    check_amount(subtotal)
}

/// `unit_price * quantity + delivery_fee`, em decimal exato (sem arredondamento).
pub fn compute_total(
    unit_price: Decimal,
    quantity: i32,
    delivery_fee: Decimal,
) -> Result<Decimal, AppError> {
    let delivery_fee = check_amount(delivery_fee)?;
    let subtotal = compute_subtotal(unit_price, quantity)?;

    let total = subtotal
        .checked_add(delivery_fee)
        .ok_or(AppError::InvalidAmount(subtotal))?;
    check_amount(total)
}

pub fn quote(
    zone: &DeliveryZone,
    delivery_type: DeliveryType,
    unit_price: Decimal,
    quantity: i32,
) -> Result<PriceQuote, AppError> {
    let delivery_fee = compute_delivery(Some(zone), delivery_type)?;
    let subtotal = compute_subtotal(unit_price, quantity)?;
    let total = compute_total(unit_price, quantity, delivery_fee)?;

    Ok(PriceQuote {
        subtotal,
        delivery_fee,
        total,
        lead_days: zone.lead_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::delivery::{zone, DeliveryZoneTable};

    #[test]
    fn test_delivery_price_per_type() {
        for (counter, home) in [(0, 0), (450, 590), (800, 1100), (1200, 400)] {
            let z = zone("16", counter, home);
            assert_eq!(
                compute_delivery(Some(&z), DeliveryType::Counter).unwrap(),
                Decimal::from(counter)
            );
            assert_eq!(
                compute_delivery(Some(&z), DeliveryType::Home).unwrap(),
                Decimal::from(home)
            );
        }
    }

    #[test]
    fn test_missing_zone_is_an_error() {
        let err = compute_delivery(None, DeliveryType::Home).unwrap_err();
        assert!(matches!(err, AppError::ZoneRequired));
    }

    #[test]
    fn test_algiers_home_delivery_scenario() {
        let z = zone("16", 450, 590);
        let q = quote(&z, DeliveryType::Home, Decimal::from(1500), 2).unwrap();

        assert_eq!(q.delivery_fee, Decimal::from(590));
        assert_eq!(q.subtotal, Decimal::from(3000));
        assert_eq!(q.total, Decimal::from(3590));
    }

    #[test]
    fn test_unknown_zone_blocks_quote() {
        let table = DeliveryZoneTable::new(vec![zone("16", 450, 590)]);
        let result = table
            .lookup("99")
            .and_then(|z| quote(z, DeliveryType::Counter, Decimal::from(1500), 1));

        assert!(matches!(result, Err(AppError::ZoneNotFound(ref c)) if c == "99"));
    }

    #[test]
    fn test_total_formula_without_rounding() {
        // 0.1 * 3 + 0.2 == 0.5 exatamente em decimal
        let unit = Decimal::new(1, 1);
        let fee = Decimal::new(2, 1);
        assert_eq!(compute_total(unit, 3, fee).unwrap(), Decimal::new(5, 1));

        let unit = Decimal::new(129_999, 2); // 1299.99
        let fee = Decimal::new(45_050, 2); // 450.50
        let total = compute_total(unit, 7, fee).unwrap();
        assert_eq!(total, unit * Decimal::from(7) + fee);
        assert_eq!(total, fee + Decimal::from(7) * unit);
        assert_eq!(total.to_string(), "9550.43");
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert!(matches!(
            compute_total(Decimal::from(1500), 0, Decimal::ZERO),
            Err(AppError::InvalidQuantity(0))
        ));
        assert!(matches!(
            compute_total(Decimal::from(1500), -3, Decimal::ZERO),
            Err(AppError::InvalidQuantity(-3))
        ));
    }

    #[test]
    fn test_negative_amounts_rejected() {
        assert!(matches!(
            compute_total(Decimal::from(-1), 1, Decimal::ZERO),
            Err(AppError::InvalidAmount(_))
        ));
        assert!(matches!(
            compute_total(Decimal::from(100), 1, Decimal::from(-5)),
            Err(AppError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_zero_priced_items_allowed() {
        assert_eq!(
            compute_total(Decimal::ZERO, 4, Decimal::from(300)).unwrap(),
            Decimal::from(300)
        );
    }

    #[test]
    fn test_max_amount_matches_the_column() {
        assert_eq!(MAX_AMOUNT.to_string(), "9999999999.99");
        assert!(check_amount(MAX_AMOUNT).is_ok());
        assert!(check_amount(MAX_AMOUNT + Decimal::new(1, 2)).is_err());
    }

    #[test]
    fn test_huge_amounts_are_rejected_without_panicking() {
        let huge = Decimal::from_str_exact("7000000000000000000000000000").unwrap();

        assert!(matches!(compute_subtotal(huge, 99), Err(AppError::InvalidAmount(_))));
        assert!(matches!(
            compute_total(Decimal::MAX, 99, Decimal::MAX),
            Err(AppError::InvalidAmount(_))
        ));

        // Cada parcela cabe, mas o produto não
        let unit = Decimal::from(5_000_000_000i64);
        assert!(matches!(compute_subtotal(unit, 3), Err(AppError::InvalidAmount(_))));

        let z = zone("16", 450, 590);
        assert!(quote(&z, DeliveryType::Home, huge, 99).is_err());
    }

    #[test]
    fn test_sub_centime_prices_are_rejected() {
        // 1500.125 viraria 1500.13 no banco e o total não bateria com a fatura
        let unit = Decimal::new(1_500_125, 3);
        assert!(matches!(
            compute_total(unit, 2, Decimal::from(590)),
            Err(AppError::InvalidAmount(_))
        ));

        // Zeros à direita não contam como casas extras
        let unit = Decimal::new(1_500_100, 3);
        assert_eq!(
            compute_total(unit, 2, Decimal::from(590)).unwrap(),
            Decimal::new(359_020, 2)
        );
    }
}
