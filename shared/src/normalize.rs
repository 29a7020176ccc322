//! Record normalization: raw source rows to canonical [`TradeRecord`]s
//!
//! Numeric cells in the source are dirty (thousands separators, currency
//! suffixes, blanks). They are coerced silently to `0` when unreadable; the
//! number of such coercions is counted in [`NormalizeStats`] and logged once
//! per load.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{RawRow, RawValue, RecordScale, TradeRecord};

/// Column names of the source table
pub mod columns {
    pub const DATE: &str = "date";
    pub const HS_CODE: &str = "hs_code";
    pub const PRODUCT: &str = "product_label";
    pub const VALUE_USD: &str = "value_usd";
    pub const QUANTITY: &str = "quantity";
    pub const UNIT_PRICE: &str = "uusd";
    pub const SELLER: &str = "seller";
    pub const BUYER: &str = "buyer";
    pub const SELLER_COUNTRY: &str = "seller_country";
    pub const BUYER_COUNTRY: &str = "buyer_country";
}

/// HS code prefixes and their descriptions, first match wins
pub const HS_RULES: &[(&str, &str)] = &[
    ("530110", "Flax; raw or retted, but not spun"),
    ("530121", "Flax; broken or scutched, but not spun"),
    ("530129", "Flax; hackled or otherwise processed, but not spun"),
    ("530130", "Flax; tow and waste, including yarn waste and garnetted stock"),
];

/// Broad categories in derivation priority order
pub const CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("Yarn", &["yarn"]),
    ("Fabric", &["fabric"]),
    ("Fiber", &["fiber", "fibre", "tow"]),
    ("Garment", &["garment", "clothing", "shirt", "pants"]),
];

pub const OTHER_CATEGORY: &str = "Other";
pub const UNKNOWN_PRODUCT: &str = "Unknown";

// ============================================================================
// Numeric helpers
// ============================================================================

/// Parse the leading float of a cleaned string, the way a lenient
/// spreadsheet reader does (`"12.5.1"` reads as `12.5`).
fn leading_float(cleaned: &str) -> Option<f64> {
    let bytes = cleaned.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    cleaned[..end].parse::<f64>().ok()
}

/// Strip everything but digits, `.` and `-`, then parse. `None` when nothing
/// numeric remains.
pub fn try_parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_float(&cleaned).filter(|n| !n.is_nan())
}

/// Lenient number parsing: unreadable input is `0`
pub fn parse_number(value: &str) -> f64 {
    try_parse_number(value).unwrap_or(0.0)
}

/// Coerce an optional raw cell to a number.
///
/// Returns the value and whether a non-empty cell had to be coerced to `0`.
pub fn coerce_number(value: Option<&RawValue>) -> (f64, bool) {
    let Some(value) = value else {
        return (0.0, false);
    };
    if value.is_falsy() {
        return (0.0, false);
    }
    match value {
        RawValue::Number(n) if n.is_finite() => (*n, false),
        _ => match value.as_text().as_deref().and_then(try_parse_number) {
            Some(n) => (n, false),
            None => (0.0, true),
        },
    }
}

/// Median of a set of values; `0` for an empty set
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

// ============================================================================
// Classification helpers
// ============================================================================

/// Broad category of a standardized product name. Total: anything that
/// matches no keyword is `Other`.
pub fn derive_category(product: &str) -> &'static str {
    let lower = product.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER_CATEGORY)
}

static CODE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9.\-#&]+").expect("valid regex"));
static SPEC_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(width|gsm|color|dye|white|black|raw|material|style|pattern)\b.*")
        .expect("valid regex")
});

/// Map a free-text product description to a clean standard name
pub fn standardize_product(raw: &str) -> String {
    let desc = raw.to_lowercase();
    let has = |word: &str| desc.contains(word);

    if has("yarn") {
        let name = if has("cotton") && has("poly") {
            "Poly/Cotton Yarn"
        } else if has("cotton") {
            "Cotton Yarn"
        } else if has("poly") {
            "Polyester Yarn"
        } else if has("linen") || has("flax") {
            "Linen/Flax Yarn"
        } else if has("filament") {
            "Filament Yarn"
        } else {
            "Yarn (Other)"
        };
        return name.to_string();
    }

    if has("fabric") {
        let name = if has("knitted") || has("knit") {
            "Knitted Fabric"
        } else if has("woven") {
            "Woven Fabric"
        } else if has("cotton") {
            "Cotton Fabric"
        } else if has("poly") {
            "Polyester Fabric"
        } else if has("linen") || has("flax") {
            "Linen Fabric"
        } else {
            "Fabric (General)"
        };
        return name.to_string();
    }

    if has("fiber") || has("fibre") {
        let name = if has("staple") {
            "Staple Fiber"
        } else if has("short") && has("flax") {
            "Short Flax Fiber"
        } else if has("long") && has("flax") {
            "Long Flax Fiber"
        } else if has("tow") {
            "Flax Tow"
        } else {
            "Fiber (Raw)"
        };
        return name.to_string();
    }

    if has("waste") {
        return "Cotton/Fiber Waste".to_string();
    }
    if has("garment") || has("clothing") || has("shirt") || has("pants") {
        return "Ready-made Garments".to_string();
    }

    // Fallback: drop the first code run and trailing size and finish words, keep three words
    let without_code = CODE_RUN.replacen(&desc, 1, " ");
    let cleaned = SPEC_TAIL.replace_all(&without_code, "");
    let words: Vec<String> = cleaned
        .split_whitespace()
        .take(3)
        .map(capitalize)
        .collect();

    if words.is_empty() {
        OTHER_CATEGORY.to_string()
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Human label for an HS code by prefix rule, or a synthetic `HS <code>`
pub fn classify_hs_code(code: &str) -> String {
    HS_RULES
        .iter()
        .find(|(prefix, _)| code.starts_with(prefix))
        .map(|(_, description)| description.to_string())
        .unwrap_or_else(|| format!("HS {}", code))
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Largest day number a spreadsheet serial date can hold (9999-12-31)
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Read a trade date from a text or spreadsheet-serial cell. Text cells that
/// match no date format are retried as serial day numbers (`"45296"`).
pub fn parse_trade_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Number(serial) => serial_date(*serial),
        RawValue::Text(text) => {
            let text = text.trim();
            parse_date_text(text).or_else(|| text.parse::<f64>().ok().and_then(serial_date))
        }
        _ => None,
    }
}

fn serial_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_SERIAL_DAY).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }
    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(datetime.date());
    }
    DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
}

// ============================================================================
// Normalizer
// ============================================================================

/// Snapshot and counters collected while normalizing a dataset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct NormalizeStats {
    pub records: usize,
    pub median_revenue: f64,
    pub median_volume: f64,
    /// Non-empty numeric cells that could not be read and became `0`
    pub coerced_numbers: usize,
    /// Rows without a usable trade date
    pub undated_records: usize,
}

/// Maps raw rows to [`TradeRecord`]s against a fixed median snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RecordNormalizer {
    pub median_revenue: f64,
    pub median_volume: f64,
}

impl RecordNormalizer {
    pub fn new(median_revenue: f64, median_volume: f64) -> Self {
        Self {
            median_revenue,
            median_volume,
        }
    }

    /// Take the median snapshot of a full dataset load
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let revenues: Vec<f64> = rows
            .iter()
            .map(|row| coerce_number(row.get(columns::VALUE_USD)).0)
            .collect();
        let volumes: Vec<f64> = rows
            .iter()
            .map(|row| coerce_number(row.get(columns::QUANTITY)).0)
            .collect();

        Self::new(median(&revenues), median(&volumes))
    }

    /// Normalize one row
    pub fn normalize(&self, row: &RawRow) -> TradeRecord {
        self.normalize_counted(row, &mut NormalizeStats::default())
    }

    /// Normalize one row, recording coercions in `stats`
    pub fn normalize_counted(&self, row: &RawRow, stats: &mut NormalizeStats) -> TradeRecord {
        let mut number = |column: &'static str| {
            let (value, coerced) = coerce_number(row.get(column));
            if coerced {
                stats.coerced_numbers += 1;
                tracing::trace!(column, "unreadable number coerced to 0");
            }
            value
        };

        let total_price = number(columns::VALUE_USD);
        let total_amount = number(columns::QUANTITY);
        let mut avg_unit_price = number(columns::UNIT_PRICE);
        if avg_unit_price == 0.0 && total_amount != 0.0 {
            avg_unit_price = total_price / total_amount;
        }

        let trade_date = row.get(columns::DATE).and_then(parse_trade_date);
        if trade_date.is_none() {
            stats.undated_records += 1;
        }

        let hs_code = row.text(columns::HS_CODE).unwrap_or_default();
        let product = row
            .text(columns::PRODUCT)
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
        let standard_product = standardize_product(&product);

        TradeRecord {
            trade_date,
            hs_description: classify_hs_code(&hs_code),
            hs_code,
            category: derive_category(&standard_product).to_string(),
            standard_product,
            product,
            total_price,
            total_amount,
            avg_unit_price,
            supplier: row.text(columns::SELLER).unwrap_or_default(),
            buyer: row.text(columns::BUYER).unwrap_or_default(),
            supplier_location: row.text(columns::SELLER_COUNTRY).unwrap_or_default(),
            buyer_location: row.text(columns::BUYER_COUNTRY).unwrap_or_default(),
            scale: RecordScale::classify(total_price, self.median_revenue),
        }
    }
}

/// Normalize a full dataset load: one median snapshot, then every row
pub fn normalize_rows(rows: &[RawRow]) -> (Vec<TradeRecord>, NormalizeStats) {
    let normalizer = RecordNormalizer::from_rows(rows);
    let mut stats = NormalizeStats {
        records: rows.len(),
        median_revenue: normalizer.median_revenue,
        median_volume: normalizer.median_volume,
        ..Default::default()
    };
    let records = rows
        .iter()
        .map(|row| normalizer.normalize_counted(row, &mut stats))
        .collect();

    tracing::debug!(
        rows = stats.records,
        median_revenue = stats.median_revenue,
        median_volume = stats.median_volume,
        coerced_numbers = stats.coerced_numbers,
        undated_records = stats.undated_records,
        "normalized dataset"
    );

    (records, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RawRow {
        RawRow::new()
            .with(columns::DATE, "2024-01-05")
            .with(columns::HS_CODE, "53011000")
            .with(columns::PRODUCT, "100% Cotton Yarn Ne 30/1")
            .with(columns::VALUE_USD, "1,234.50")
            .with(columns::QUANTITY, "100")
            .with(columns::SELLER, "Linen Mills SA")
            .with(columns::BUYER, "Saigon Textiles")
            .with(columns::SELLER_COUNTRY, "France")
            .with(columns::BUYER_COUNTRY, "Vietnam")
    }

    // ========================================================================
    // Numeric Helper Tests
    // ========================================================================

    #[test]
    fn test_parse_number_strips_separators_and_units() {
        assert_eq!(parse_number("1,234.50 USD"), 1234.5);
        assert_eq!(parse_number("$ 99"), 99.0);
        assert_eq!(parse_number("-12.5"), -12.5);
    }

    #[test]
    fn test_parse_number_invalid_is_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("n/a"), 0.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number("."), 0.0);
    }

    #[test]
    fn test_parse_number_reads_leading_float() {
        assert_eq!(parse_number("12.5.1"), 12.5);
        assert_eq!(parse_number("12-3"), 12.0);
    }

    #[test]
    fn test_coerce_number_absent_and_falsy() {
        assert_eq!(coerce_number(None), (0.0, false));
        assert_eq!(coerce_number(Some(&RawValue::Null)), (0.0, false));
        assert_eq!(coerce_number(Some(&RawValue::Text(String::new()))), (0.0, false));
        assert_eq!(coerce_number(Some(&RawValue::Number(42.0))), (42.0, false));
    }

    #[test]
    fn test_coerce_number_flags_unreadable_text() {
        assert_eq!(coerce_number(Some(&RawValue::from("N/A"))), (0.0, true));
        assert_eq!(coerce_number(Some(&RawValue::from("7 kg"))), (7.0, false));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[7.0]), 7.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[50.0, 150.0]), 100.0);
    }

    // ========================================================================
    // Classification Tests
    // ========================================================================

    #[test]
    fn test_derive_category_priority() {
        assert_eq!(derive_category("Cotton Yarn"), "Yarn");
        assert_eq!(derive_category("Yarn dyed fabric"), "Yarn");
        assert_eq!(derive_category("Knitted Fabric"), "Fabric");
        assert_eq!(derive_category("Flax Tow"), "Fiber");
        assert_eq!(derive_category("Staple FIBRE"), "Fiber");
        assert_eq!(derive_category("Ready-made Garments"), "Garment");
        assert_eq!(derive_category("Polo shirt"), "Garment");
        assert_eq!(derive_category("Machinery"), "Other");
        assert_eq!(derive_category(""), "Other");
    }

    #[test]
    fn test_standardize_product_keywords() {
        assert_eq!(standardize_product("POLY COTTON YARN 30S"), "Poly/Cotton Yarn");
        assert_eq!(standardize_product("100% cotton yarn"), "Cotton Yarn");
        assert_eq!(standardize_product("flax yarn wet spun"), "Linen/Flax Yarn");
        assert_eq!(standardize_product("woven fabric 150cm"), "Woven Fabric");
        assert_eq!(standardize_product("knit fabric"), "Knitted Fabric");
        assert_eq!(standardize_product("short flax fiber"), "Short Flax Fiber");
        assert_eq!(standardize_product("flax fibre tow"), "Flax Tow");
        assert_eq!(standardize_product("cotton waste"), "Cotton/Fiber Waste");
        assert_eq!(standardize_product("men's shirt"), "Ready-made Garments");
    }

    #[test]
    fn test_standardize_product_fallback() {
        assert_eq!(standardize_product("Scutched flax 5301 bales"), "Scutched Flax Bales");
        assert_eq!(standardize_product("linen canvas width 150"), "Linen Canvas");
        assert_eq!(
            standardize_product("hackled flax line grade a"),
            "Hackled Flax Line"
        );
        assert_eq!(standardize_product("12345"), "Other");
        assert_eq!(standardize_product(""), "Other");
    }

    #[test]
    fn test_classify_hs_code() {
        assert_eq!(classify_hs_code("530110"), "Flax; raw or retted, but not spun");
        assert_eq!(
            classify_hs_code("53012100"),
            "Flax; broken or scutched, but not spun"
        );
        assert_eq!(classify_hs_code("520512"), "HS 520512");
        assert_eq!(classify_hs_code(""), "HS ");
    }

    #[test]
    fn test_parse_trade_date_formats() {
        let jan5 = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_trade_date(&RawValue::from("2024-01-05")), jan5);
        assert_eq!(parse_trade_date(&RawValue::from("2024/01/05")), jan5);
        assert_eq!(parse_trade_date(&RawValue::from("01/05/2024")), jan5);
        assert_eq!(parse_trade_date(&RawValue::from("2024-01-05T10:30:00")), jan5);
        assert_eq!(parse_trade_date(&RawValue::from("2024-01-05T10:30:00+07:00")), jan5);
        assert_eq!(parse_trade_date(&RawValue::Number(45296.0)), jan5);
    }

    #[test]
    fn test_parse_trade_date_serial_text() {
        let jan5 = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_trade_date(&RawValue::from("45296")), jan5);
        assert_eq!(parse_trade_date(&RawValue::from(" 45296.75 ")), jan5);
    }

    #[test]
    fn test_parse_trade_date_rejects_garbage() {
        assert_eq!(parse_trade_date(&RawValue::from("")), None);
        assert_eq!(parse_trade_date(&RawValue::from("soon")), None);
        assert_eq!(parse_trade_date(&RawValue::Null), None);
        assert_eq!(parse_trade_date(&RawValue::Number(-3.0)), None);
        assert_eq!(parse_trade_date(&RawValue::from("-3")), None);
        assert_eq!(parse_trade_date(&RawValue::from("NaN")), None);
        assert_eq!(parse_trade_date(&RawValue::from("99999999")), None);
    }

    // ========================================================================
    // Normalizer Tests
    // ========================================================================

    #[test]
    fn test_normalize_maps_all_fields() {
        let record = RecordNormalizer::new(1000.0, 50.0).normalize(&row());

        assert_eq!(record.trade_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(record.hs_code, "53011000");
        assert_eq!(record.hs_description, "Flax; raw or retted, but not spun");
        assert_eq!(record.product, "100% Cotton Yarn Ne 30/1");
        assert_eq!(record.standard_product, "Cotton Yarn");
        assert_eq!(record.category, "Yarn");
        assert_eq!(record.total_price, 1234.5);
        assert_eq!(record.total_amount, 100.0);
        assert_eq!(record.avg_unit_price, 12.345);
        assert_eq!(record.supplier, "Linen Mills SA");
        assert_eq!(record.buyer, "Saigon Textiles");
        assert_eq!(record.supplier_location, "France");
        assert_eq!(record.buyer_location, "Vietnam");
        assert_eq!(record.scale, RecordScale::Big);
    }

    #[test]
    fn test_normalize_keeps_provided_unit_price() {
        let record = RecordNormalizer::default().normalize(&row().with(columns::UNIT_PRICE, "9.5"));
        assert_eq!(record.avg_unit_price, 9.5);
    }

    #[test]
    fn test_normalize_zero_amount_keeps_zero_unit_price() {
        let record = RecordNormalizer::default().normalize(&row().with(columns::QUANTITY, ""));
        assert_eq!(record.total_amount, 0.0);
        assert_eq!(record.avg_unit_price, 0.0);
    }

    #[test]
    fn test_normalize_scale_is_strictly_greater() {
        let at_median = RecordNormalizer::new(1234.5, 0.0).normalize(&row());
        assert_eq!(at_median.scale, RecordScale::Small);
    }

    #[test]
    fn test_normalize_missing_fields_defaults() {
        let mut stats = NormalizeStats::default();
        let record = RecordNormalizer::default()
            .normalize_counted(&RawRow::new().with(columns::VALUE_USD, "N/A"), &mut stats);

        assert_eq!(record.trade_date, None);
        assert_eq!(record.product, "Unknown");
        assert_eq!(record.category, "Other");
        assert_eq!(record.hs_description, "HS ");
        assert_eq!(record.supplier, "");
        assert_eq!(record.total_price, 0.0);
        assert_eq!(stats.coerced_numbers, 1);
        assert_eq!(stats.undated_records, 1);
    }

    #[test]
    fn test_normalize_rows_uses_global_median() {
        let rows = vec![
            row().with(columns::VALUE_USD, "100"),
            row().with(columns::VALUE_USD, "200"),
            row().with(columns::VALUE_USD, "300"),
        ];
        let (records, stats) = normalize_rows(&rows);

        assert_eq!(stats.records, 3);
        assert_eq!(stats.median_revenue, 200.0);
        assert_eq!(stats.median_volume, 100.0);
        let scales: Vec<_> = records.iter().map(|r| r.scale).collect();
        assert_eq!(
            scales,
            vec![RecordScale::Small, RecordScale::Small, RecordScale::Big]
        );
        assert_eq!(stats.coerced_numbers, 0);
        assert_eq!(stats.undated_records, 0);
    }
}
