//! Index-to-instrument level conversion.

use crate::domain::{Instrument, InstrumentLevels, PriceLevels};
use crate::engine::EngineParams;

/// Maps an index entry/stop/target triple onto each tradeable vehicle.
///
/// SPY and XSP are scalar multiples of the index; ES gets an additive
/// cost-of-carry fair-value offset; SPX passes through unchanged. Pure
/// mapping, recomputed on every call.
#[derive(Debug, Clone, Copy)]
pub struct LevelConverter {
    rate: f64,
    dividend_yield: f64,
    carry_days: f64,
}

impl LevelConverter {
    pub fn new(params: &EngineParams) -> Self {
        Self {
            rate: params.risk_free_rate,
            dividend_yield: params.dividend_yield,
            carry_days: params.futures_carry_days,
        }
    }

    /// Theoretical futures basis at an index level: the premium implied
    /// by financing the index at r minus the dividends q collected over
    /// the assumed carry horizon.
    pub fn es_fair_value(&self, index_price: f64) -> f64 {
        let t = self.carry_days / 365.0;
        let multiplier = ((self.rate - self.dividend_yield) * t).exp();
        index_price * multiplier - index_price
    }

    /// Convert an index triple to all instruments, in display order.
    pub fn convert(&self, levels: &PriceLevels) -> Vec<InstrumentLevels> {
        Instrument::ALL
            .iter()
            .map(|&instrument| self.convert_one(levels, instrument))
            .collect()
    }

    fn convert_one(&self, levels: &PriceLevels, instrument: Instrument) -> InstrumentLevels {
        if instrument.carries_basis() {
            let fair_value = self.es_fair_value(levels.entry);
            InstrumentLevels {
                instrument,
                entry: levels.entry + fair_value,
                stop: levels.stop + fair_value,
                target: levels.target + fair_value,
                conversion_factor: instrument.conversion_factor(),
                contract_multiplier: instrument.contract_multiplier(),
                fair_value: Some(fair_value),
            }
        } else {
            let factor = instrument.conversion_factor();
            InstrumentLevels {
                instrument,
                entry: levels.entry * factor,
                stop: levels.stop * factor,
                target: levels.target * factor,
                conversion_factor: factor,
                contract_multiplier: instrument.contract_multiplier(),
                fair_value: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeDirection;

    fn converter() -> LevelConverter {
        LevelConverter::new(&EngineParams::default())
    }

    fn index_levels() -> PriceLevels {
        PriceLevels::new(5800.0, 5780.0, 5840.0, TradeDirection::Long).unwrap()
    }

    #[test]
    fn test_spy_conversion_is_exact_tenth() {
        let conversions = converter().convert(&index_levels());
        let spy = conversions
            .iter()
            .find(|c| c.instrument == Instrument::Spy)
            .unwrap();
        assert_eq!(spy.entry, 580.0);
        assert_eq!(spy.stop, 578.0);
        assert_eq!(spy.target, 584.0);
        assert!(spy.fair_value.is_none());
    }

    #[test]
    fn test_xsp_matches_spy_scale() {
        let conversions = converter().convert(&index_levels());
        let xsp = conversions
            .iter()
            .find(|c| c.instrument == Instrument::Xsp)
            .unwrap();
        assert_eq!(xsp.entry, 580.0);
        assert_eq!(xsp.contract_multiplier, 100.0);
    }

    #[test]
    fn test_spx_is_identity() {
        let conversions = converter().convert(&index_levels());
        let spx = conversions
            .iter()
            .find(|c| c.instrument == Instrument::Spx)
            .unwrap();
        assert_eq!(spx.entry, 5800.0);
        assert_eq!(spx.stop, 5780.0);
        assert_eq!(spx.target, 5840.0);
    }

    #[test]
    fn test_es_carries_positive_basis_while_rate_exceeds_yield() {
        let converter = converter();
        let fair_value = converter.es_fair_value(5800.0);
        assert!(fair_value > 0.0, "r > q implies a futures premium");
        // exp((0.0525 - 0.0142) * 30/365) - 1 ~= 0.315% of the index.
        assert!((fair_value - 18.28).abs() < 0.1, "basis off: {}", fair_value);

        let conversions = converter.convert(&index_levels());
        let es = conversions
            .iter()
            .find(|c| c.instrument == Instrument::Es)
            .unwrap();
        assert_eq!(es.fair_value, Some(fair_value));
        assert!((es.entry - (5800.0 + fair_value)).abs() < 1e-9);
        assert!((es.stop - (5780.0 + fair_value)).abs() < 1e-9);
        // The offset is additive, so the range width is preserved.
        assert!((es.range() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_conversion_is_pure() {
        let converter = converter();
        let first = converter.convert(&index_levels());
        let second = converter.convert(&index_levels());
        assert_eq!(first, second);
    }
}
