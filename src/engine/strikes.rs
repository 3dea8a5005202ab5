//! Standard-strike rounding and candidate generation, shared by the
//! single-option selector and the spread constructors.

use crate::domain::OptionType;

/// Exchange-listed strike granularity for a price level:
/// 0.5 below 10, 1 below 100, 5 below 500, 10 above.
pub fn standard_increment(price: f64) -> f64 {
    if price < 10.0 {
        0.5
    } else if price < 100.0 {
        1.0
    } else if price < 500.0 {
        5.0
    } else {
        10.0
    }
}

/// Snap a raw price to the nearest exchange-listed strike.
pub fn round_to_standard(price: f64) -> f64 {
    let increment = standard_increment(price);
    (price / increment).round() * increment
}

/// Scan step used while sweeping the candidate range; coarser than the
/// listing granularity at high price levels to keep the scan bounded.
fn scan_step(current_price: f64) -> f64 {
    if current_price < 100.0 {
        1.0
    } else if current_price < 1000.0 {
        5.0
    } else {
        10.0
    }
}

/// Ordered, deduplicated strike candidates between a 5%-in-the-money
/// bound at the current price and the target level.
///
/// For calls the range runs from 5% below current up to the target; for
/// puts from the target up to 5% above current. Each raw step is snapped
/// to a standard strike before deduplication. An inverted range (target
/// on the wrong side of the money) yields an empty list.
pub fn candidate_strikes(current_price: f64, target: f64, option_type: OptionType) -> Vec<f64> {
    let (start, end) = match option_type {
        OptionType::Call => (current_price * 0.95, target),
        OptionType::Put => (target, current_price * 1.05),
    };
    let step = scan_step(current_price);

    let mut strikes = Vec::new();
    let mut raw = start;
    while raw <= end + 1e-9 {
        let strike = round_to_standard(raw);
        if strike > 0.0 && strikes.last() != Some(&strike) {
            strikes.push(strike);
        }
        raw += step;
    }
    strikes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_tiers() {
        assert_eq!(standard_increment(8.0), 0.5);
        assert_eq!(standard_increment(10.0), 1.0);
        assert_eq!(standard_increment(99.0), 1.0);
        assert_eq!(standard_increment(100.0), 5.0);
        assert_eq!(standard_increment(499.0), 5.0);
        assert_eq!(standard_increment(500.0), 10.0);
        assert_eq!(standard_increment(5800.0), 10.0);
    }

    #[test]
    fn test_rounding_snaps_to_grid() {
        assert_eq!(round_to_standard(7.3), 7.5);
        assert_eq!(round_to_standard(57.4), 57.0);
        assert_eq!(round_to_standard(432.0), 430.0);
        assert_eq!(round_to_standard(583.0), 580.0);
        assert_eq!(round_to_standard(5843.0), 5840.0);
    }

    #[test]
    fn test_call_candidates_cover_itm_to_target() {
        let strikes = candidate_strikes(580.0, 584.0, OptionType::Call);
        assert!(!strikes.is_empty());
        // 5% ITM bound: 551 -> 550; target bound 584 -> 580.
        assert_eq!(*strikes.first().unwrap(), 550.0);
        assert_eq!(*strikes.last().unwrap(), 580.0);
        // Ordered and deduplicated.
        for pair in strikes.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_put_candidates_cover_target_to_itm() {
        let strikes = candidate_strikes(580.0, 576.0, OptionType::Put);
        assert_eq!(*strikes.first().unwrap(), 580.0);
        assert_eq!(*strikes.last().unwrap(), 610.0);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        // Call target far below the ITM bound.
        let strikes = candidate_strikes(580.0, 500.0, OptionType::Call);
        assert!(strikes.is_empty());
    }
}
