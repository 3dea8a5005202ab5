//! Domain primitives: OptionType, TradeDirection, Instrument.

use serde::{Deserialize, Serialize};

/// European option flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Intrinsic value of the option at a given underlying price.
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Direction of the underlying trade thesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    /// The option type used to express this direction with long premium.
    pub fn option_type(&self) -> OptionType {
        match self {
            TradeDirection::Long => OptionType::Call,
            TradeDirection::Short => OptionType::Put,
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, TradeDirection::Long)
    }
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "long"),
            TradeDirection::Short => write!(f, "short"),
        }
    }
}

/// The fixed set of S&P 500 vehicles the converter targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Instrument {
    /// SPDR S&P 500 ETF, 1/10 of the index.
    Spy,
    /// Mini-SPX cash-settled index, 1/10 of the index.
    Xsp,
    /// E-mini S&P 500 futures, index level plus carry basis.
    Es,
    /// The index itself.
    Spx,
}

impl Instrument {
    /// All instruments in display order.
    pub const ALL: [Instrument; 4] = [
        Instrument::Spy,
        Instrument::Xsp,
        Instrument::Es,
        Instrument::Spx,
    ];

    /// Price conversion factor relative to the index level.
    pub fn conversion_factor(&self) -> f64 {
        match self {
            Instrument::Spy | Instrument::Xsp => 0.1,
            Instrument::Es | Instrument::Spx => 1.0,
        }
    }

    /// Dollar value of one contract point.
    pub fn contract_multiplier(&self) -> f64 {
        match self {
            Instrument::Spy | Instrument::Xsp | Instrument::Spx => 100.0,
            Instrument::Es => 50.0,
        }
    }

    /// Whether futures fair-value basis applies.
    pub fn carries_basis(&self) -> bool {
        matches!(self, Instrument::Es)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Instrument::Spy => "SPY",
            Instrument::Xsp => "XSP",
            Instrument::Es => "ES",
            Instrument::Spx => "SPX",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SPY" => Ok(Instrument::Spy),
            "XSP" => Ok(Instrument::Xsp),
            "ES" => Ok(Instrument::Es),
            "SPX" => Ok(Instrument::Spx),
            other => Err(format!("unknown instrument: {}", other)),
        }
    }
}
