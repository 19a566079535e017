use std::collections::HashMap;
use std::fmt;

use crate::error::{CalcError, CalcResult};

/// Identifiers for the bank rate offers a calculation can reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateKey {
    #[cfg_attr(feature = "serde", serde(rename = "citi_3m"))]
    Citi3m,
    #[cfg_attr(feature = "serde", serde(rename = "citi_call"))]
    CitiCall,
    #[cfg_attr(feature = "serde", serde(rename = "scbt_1w"))]
    Scbt1w,
    #[cfg_attr(feature = "serde", serde(rename = "scbt_2w"))]
    Scbt2w,
    #[cfg_attr(feature = "serde", serde(rename = "cimb"))]
    Cimb,
    #[cfg_attr(feature = "serde", serde(rename = "permata"))]
    Permata,
    #[cfg_attr(feature = "serde", serde(rename = "general_cross_month"))]
    GeneralCrossMonth,
}

impl RateKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateKey::Citi3m => "citi_3m",
            RateKey::CitiCall => "citi_call",
            RateKey::Scbt1w => "scbt_1w",
            RateKey::Scbt2w => "scbt_2w",
            RateKey::Cimb => "cimb",
            RateKey::Permata => "permata",
            RateKey::GeneralCrossMonth => "general_cross_month",
        }
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Annual percentage rates on offer, keyed by [`RateKey`]. Read-only for
/// the duration of a calculation.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BankRates {
    rates: HashMap<RateKey, f64>,
}

impl BankRates {
    /// An empty table. Every rate an enabled strategy needs must be added
    /// with [`BankRates::with_rate`] before calculating.
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, key: RateKey, annual_pct: f64) -> Self {
        self.rates.insert(key, annual_pct);
        self
    }

    pub fn without_rate(mut self, key: RateKey) -> Self {
        self.rates.remove(&key);
        self
    }

    pub fn get(&self, key: RateKey) -> Option<f64> {
        self.rates.get(&key).copied()
    }

    /// Looks up a rate that an enabled strategy references. A missing entry
    /// is a hard failure for the whole calculation, never a silent skip.
    pub fn require(&self, key: RateKey) -> CalcResult<f64> {
        self.get(key).ok_or(CalcError::MissingRate { key })
    }
}

impl Default for BankRates {
    // The documented offer table (annual percentages).
    fn default() -> Self {
        Self::empty()
            .with_rate(RateKey::Citi3m, 8.69)
            .with_rate(RateKey::CitiCall, 7.75)
            .with_rate(RateKey::Scbt1w, 6.20)
            .with_rate(RateKey::Scbt2w, 6.60)
            .with_rate(RateKey::Cimb, 7.00)
            .with_rate(RateKey::Permata, 7.00)
            .with_rate(RateKey::GeneralCrossMonth, 9.20)
    }
}

/// Toggles for the optional one-month lenders.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IncludeBanks {
    pub cimb: bool,
    pub permata: bool,
}

impl Default for IncludeBanks {
    fn default() -> Self {
        Self {
            cimb: true,
            permata: false,
        }
    }
}
