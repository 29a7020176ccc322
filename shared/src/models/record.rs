//! Canonical trade transaction record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-transaction size relative to the global median price at load time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RecordScale {
    Big,
    #[default]
    Small,
}

impl RecordScale {
    /// Strictly above the median is `Big`
    pub fn classify(total_price: f64, median_price: f64) -> Self {
        if total_price > median_price {
            RecordScale::Big
        } else {
            RecordScale::Small
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordScale::Big => "Big",
            RecordScale::Small => "Small",
        }
    }
}

impl std::fmt::Display for RecordScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One normalized trade transaction. Immutable once built by the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRecord {
    /// Absent when the source date is missing or unparseable
    pub trade_date: Option<NaiveDate>,
    pub hs_code: String,
    pub hs_description: String,
    /// Coarse grouping: Yarn, Fabric, Fiber, Garment or Other
    pub category: String,
    /// Raw product label from the source
    pub product: String,
    /// Keyword-standardized product label (e.g. "Cotton Yarn")
    pub standard_product: String,
    pub total_price: f64,
    pub total_amount: f64,
    pub avg_unit_price: f64,
    pub supplier: String,
    pub buyer: String,
    pub supplier_location: String,
    pub buyer_location: String,
    pub scale: RecordScale,
}
