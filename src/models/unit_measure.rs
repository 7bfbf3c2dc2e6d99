use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitMeasure {
    #[default]
    Unit,
    Kg,
    L,
    Pack,
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum NormalizeError {
    #[error("Invalid quantity: {quantity} (must be greater than zero)")]
    InvalidQuantity { quantity: f64 },
}

impl UnitMeasure {
    /// Selector options in display order. The first one is the default.
    pub const ALL: [UnitMeasure; 4] = [
        UnitMeasure::Unit,
        UnitMeasure::Kg,
        UnitMeasure::L,
        UnitMeasure::Pack,
    ];

    /// How many base sub-units one of this unit holds.
    pub fn base_multiplier(self) -> f64 {
        match self {
            UnitMeasure::Kg | UnitMeasure::L => 1000.0,
            UnitMeasure::Unit | UnitMeasure::Pack => 1.0,
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            UnitMeasure::Unit => "unit",
            UnitMeasure::Kg => "kg",
            UnitMeasure::L => "l",
            UnitMeasure::Pack => "pack",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitMeasure::Unit => "Unit",
            UnitMeasure::Kg => "Kilogram",
            UnitMeasure::L => "Liter",
            UnitMeasure::Pack => "Pack",
        }
    }

    /// Name of the sub-unit a normalized price is quoted in.
    pub fn base_unit_label(self) -> &'static str {
        match self {
            UnitMeasure::Kg => "g",
            UnitMeasure::L => "ml",
            UnitMeasure::Unit | UnitMeasure::Pack => "unit",
        }
    }

    pub fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|unit| *unit == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for UnitMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Quantity expressed in base sub-units (grams, milliliters or count).
pub fn normalized_quantity(unit_measure: UnitMeasure, quantity: f64) -> Result<f64, NormalizeError> {
    // NaN fails this comparison too
    if !(quantity > 0.0) || !quantity.is_finite() {
        return Err(NormalizeError::InvalidQuantity { quantity });
    }

    let converted = quantity * unit_measure.base_multiplier();
    if !converted.is_finite() {
        return Err(NormalizeError::InvalidQuantity { quantity });
    }
    Ok(converted)
}

/// Price of one base sub-unit.
pub fn normalized_price(
    unit_measure: UnitMeasure,
    quantity: f64,
    price: f64,
) -> Result<f64, NormalizeError> {
    let converted = normalized_quantity(unit_measure, quantity)?;

    // a finite price over a vanishingly small quantity can still overflow
    let unit_price = price / converted;
    if !unit_price.is_finite() {
        return Err(NormalizeError::InvalidQuantity { quantity });
    }
    Ok(unit_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_and_volume_scale_to_thousandths() {
        for unit in [UnitMeasure::Kg, UnitMeasure::L] {
            for quantity in [0.25, 1.0, 1.5, 12.0] {
                assert_eq!(normalized_quantity(unit, quantity).unwrap(), quantity * 1000.0);
            }
        }
    }

    #[test]
    fn test_count_units_are_unchanged() {
        for unit in [UnitMeasure::Unit, UnitMeasure::Pack] {
            for quantity in [0.5, 1.0, 6.0, 12.0] {
                assert_eq!(normalized_quantity(unit, quantity).unwrap(), quantity);
            }
        }
    }

    #[test]
    fn test_price_divides_by_normalized_quantity() {
        for unit in UnitMeasure::ALL {
            let quantity = 3.0;
            let price = 45.0;
            let expected = price / normalized_quantity(unit, quantity).unwrap();
            assert_eq!(normalized_price(unit, quantity, price).unwrap(), expected);
        }

        assert!((normalized_price(UnitMeasure::L, 1.0, 20.0).unwrap() - 0.02).abs() < 1e-12);
        assert!((normalized_price(UnitMeasure::Unit, 12.0, 50.0).unwrap() - 4.1667).abs() < 1e-4);
    }

    #[test]
    fn test_non_positive_quantity_is_rejected() {
        for quantity in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = normalized_price(UnitMeasure::Kg, quantity, 10.0);
            assert!(matches!(result, Err(NormalizeError::InvalidQuantity { .. })));
        }
    }

    #[test]
    fn test_overflowing_results_are_rejected() {
        assert!(matches!(
            normalized_quantity(UnitMeasure::Kg, 1e306),
            Err(NormalizeError::InvalidQuantity { .. })
        ));
        // the same amount in a count unit does not overflow
        assert_eq!(normalized_quantity(UnitMeasure::Unit, 1e306).unwrap(), 1e306);

        assert!(matches!(
            normalized_price(UnitMeasure::Unit, 1e-310, 1e300),
            Err(NormalizeError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_options_order() {
        assert_eq!(UnitMeasure::default(), UnitMeasure::ALL[0]);
        assert_eq!(UnitMeasure::L.position(), 2);
        let values: Vec<&str> = UnitMeasure::ALL.iter().map(|u| u.value()).collect();
        assert_eq!(values, vec!["unit", "kg", "l", "pack"]);
    }
}
