//! Common types used across the platform

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::TradeRecord;

/// Month labels for the 12-bucket time series
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Which side of a trade a company name is matched against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[serde(alias = "supplier", alias = "Seller", alias = "seller")]
    Supplier,
    #[default]
    #[serde(alias = "buyer")]
    Buyer,
}

impl Role {
    /// The record field holding the company name for this role
    pub fn field(&self) -> RecordField {
        match self {
            Role::Supplier => RecordField::Supplier,
            Role::Buyer => RecordField::Buyer,
        }
    }

    /// The opposite side of the trade
    pub fn counterpart(&self) -> Role {
        match self {
            Role::Supplier => Role::Buyer,
            Role::Buyer => Role::Supplier,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Supplier => "Supplier",
            Role::Buyer => "Buyer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supplier" | "seller" => Ok(Role::Supplier),
            "buyer" => Ok(Role::Buyer),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

/// String-valued fields of a [`TradeRecord`] usable for grouping and filtering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    #[serde(alias = "HS_Code")]
    HsCode,
    #[serde(alias = "HS_Description")]
    HsDescription,
    #[serde(alias = "Category")]
    Category,
    #[serde(alias = "Product")]
    Product,
    #[serde(alias = "Standard_Product")]
    StandardProduct,
    #[serde(alias = "Supplier")]
    Supplier,
    #[serde(alias = "Buyer")]
    Buyer,
    #[serde(alias = "Supplier_Location")]
    SupplierLocation,
    #[serde(alias = "Buyer_Location")]
    BuyerLocation,
    #[serde(alias = "Scale")]
    Scale,
}

impl RecordField {
    /// Read this field from a record
    pub fn value<'a>(&self, record: &'a TradeRecord) -> &'a str {
        match self {
            RecordField::HsCode => &record.hs_code,
            RecordField::HsDescription => &record.hs_description,
            RecordField::Category => &record.category,
            RecordField::Product => &record.product,
            RecordField::StandardProduct => &record.standard_product,
            RecordField::Supplier => &record.supplier,
            RecordField::Buyer => &record.buyer,
            RecordField::SupplierLocation => &record.supplier_location,
            RecordField::BuyerLocation => &record.buyer_location,
            RecordField::Scale => record.scale.as_str(),
        }
    }
}

impl FromStr for RecordField {
    type Err = CoreError;

    /// Accepts snake_case, PascalCase and the dashboard's `HS_Code` style keys
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != ' ' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "hscode" => Ok(RecordField::HsCode),
            "hsdescription" => Ok(RecordField::HsDescription),
            "category" => Ok(RecordField::Category),
            "product" => Ok(RecordField::Product),
            "standardproduct" => Ok(RecordField::StandardProduct),
            "supplier" | "seller" => Ok(RecordField::Supplier),
            "buyer" => Ok(RecordField::Buyer),
            "supplierlocation" => Ok(RecordField::SupplierLocation),
            "buyerlocation" => Ok(RecordField::BuyerLocation),
            "scale" => Ok(RecordField::Scale),
            _ => Err(CoreError::UnknownField(s.to_string())),
        }
    }
}

/// Sort key for top-N rankings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Revenue,
    Volume,
}

/// Active cascading filters. An empty list leaves that dimension unfiltered.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RecordFilters {
    pub hs_codes: Vec<String>,
    pub categories: Vec<String>,
    pub products: Vec<String>,
}

impl RecordFilters {
    pub fn is_empty(&self) -> bool {
        self.hs_codes.is_empty() && self.categories.is_empty() && self.products.is_empty()
    }

    /// Check a record against every non-empty dimension
    pub fn matches(&self, record: &TradeRecord) -> bool {
        let allows = |values: &[String], value: &str| {
            values.is_empty() || values.iter().any(|v| v == value)
        };

        allows(&self.hs_codes, &record.hs_code)
            && allows(&self.categories, &record.category)
            && allows(&self.products, &record.product)
    }
}

/// Option lists for the cascading filter panel
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub hs_codes: Vec<String>,
    pub categories: Vec<String>,
    pub products: Vec<String>,
}

/// Label/value pairs for a single-series chart
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// One entry of a top-N ranking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedEntry {
    pub name: String,
    pub revenue: f64,
    pub volume: f64,
}

/// Parallel revenue/volume arrays for a ranked bar chart
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RankedSeries {
    pub labels: Vec<String>,
    pub revenue: Vec<f64>,
    pub volume: Vec<f64>,
}

impl From<Vec<RankedEntry>> for RankedSeries {
    fn from(entries: Vec<RankedEntry>) -> Self {
        let mut series = RankedSeries {
            labels: Vec::with_capacity(entries.len()),
            revenue: Vec::with_capacity(entries.len()),
            volume: Vec::with_capacity(entries.len()),
        };
        for entry in entries {
            series.labels.push(entry.name);
            series.revenue.push(entry.revenue);
            series.volume.push(entry.volume);
        }
        series
    }
}

/// Month-of-year series; always 12 aligned entries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub revenue: Vec<f64>,
    pub transactions: Vec<u64>,
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self {
            labels: MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
            revenue: vec![0.0; 12],
            transactions: vec![0; 12],
        }
    }
}

/// Year-aware monthly bucket for the overview charts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: f64,
    pub amount: f64,
    pub transactions: u64,
    /// Weighted average unit price (revenue / amount)
    pub avg_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("Buyer".parse::<Role>().unwrap(), Role::Buyer);
        assert_eq!("supplier".parse::<Role>().unwrap(), Role::Supplier);
        assert_eq!("Seller".parse::<Role>().unwrap(), Role::Supplier);
        assert!("Broker".parse::<Role>().is_err());
    }

    #[test]
    fn test_record_field_from_str() {
        assert_eq!("HS_Code".parse::<RecordField>().unwrap(), RecordField::HsCode);
        assert_eq!(
            "HS_Description".parse::<RecordField>().unwrap(),
            RecordField::HsDescription
        );
        assert_eq!("Category".parse::<RecordField>().unwrap(), RecordField::Category);
        assert_eq!(
            "buyer_location".parse::<RecordField>().unwrap(),
            RecordField::BuyerLocation
        );
        assert!("Total_Price".parse::<RecordField>().is_err());
    }

    #[test]
    fn test_role_serde_aliases() {
        let role: Role = serde_json::from_str("\"supplier\"").unwrap();
        assert_eq!(role, Role::Supplier);
        assert_eq!(serde_json::to_string(&Role::Buyer).unwrap(), "\"Buyer\"");
    }

    #[test]
    fn test_ranked_series_from_entries() {
        let series = RankedSeries::from(vec![
            RankedEntry { name: "A".into(), revenue: 10.0, volume: 1.0 },
            RankedEntry { name: "B".into(), revenue: 5.0, volume: 2.0 },
        ]);
        assert_eq!(series.labels, vec!["A", "B"]);
        assert_eq!(series.revenue, vec![10.0, 5.0]);
        assert_eq!(series.volume, vec![1.0, 2.0]);
    }

    #[test]
    fn test_default_time_series_is_zero_filled() {
        let series = TimeSeries::default();
        assert_eq!(series.labels.len(), 12);
        assert_eq!(series.labels[0], "Jan");
        assert_eq!(series.labels[11], "Dec");
        assert!(series.revenue.iter().all(|v| *v == 0.0));
        assert!(series.transactions.iter().all(|v| *v == 0));
    }
}
