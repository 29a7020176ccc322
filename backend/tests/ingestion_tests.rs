//! CSV ingestion property-based tests
//!
//! Comprehensive tests for:
//! - Every CSV row becomes exactly one normalized record
//! - Thousands separators and currency suffixes never lose revenue
//! - Per-company summaries partition the dataset revenue
//! - Derived categories stay inside the known vocabulary

use proptest::prelude::*;
use shared::{RawRow, RawValue, Role, TradeRepository};

// ============================================================================
// Property Test Strategies
// ============================================================================

const HEADER: &str =
    "Date,HS_Code,Product_Label,Value_USD,Quantity,UUSD,Seller,Buyer,Seller_Country,Buyer_Country";

#[derive(Debug, Clone)]
struct Trade {
    seller: &'static str,
    buyer: &'static str,
    product: &'static str,
    value: u32,
    quantity: u16,
    month: u32,
}

fn trade_strategy() -> impl Strategy<Value = Trade> {
    (
        prop::sample::select(vec!["Linen Mills", "Flax Corp", "Baltic Fibre"]),
        prop::sample::select(vec!["Saigon Tex", "Hanoi Weave"]),
        prop::sample::select(vec![
            "flax yarn wet spun",
            "woven fabric 150cm",
            "short flax fiber",
            "men's shirt",
            "scutched flax bales",
        ]),
        0..5_000_000u32,
        1..1000u16,
        1..=12u32,
    )
        .prop_map(|(seller, buyer, product, value, quantity, month)| Trade {
            seller,
            buyer,
            product,
            value,
            quantity,
            month,
        })
}

/// Render an amount the way exported spreadsheets do: `1,234,567 USD`
fn with_separators(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{} USD", out)
}

fn to_csv(trades: &[Trade]) -> String {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HEADER.split(',')).unwrap();
    for trade in trades {
        wtr.write_record([
            format!("2024-{:02}-15", trade.month),
            "530110".to_string(),
            trade.product.to_string(),
            with_separators(trade.value),
            trade.quantity.to_string(),
            String::new(),
            trade.seller.to_string(),
            trade.buyer.to_string(),
            "France".to_string(),
            "Vietnam".to_string(),
        ])
        .unwrap();
    }
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

/// Read CSV text into rows keyed by lower-cased header names
fn parse(data: &str) -> Vec<RawRow> {
    let mut rdr = csv::Reader::from_reader(data.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .unwrap()
        .iter()
        .map(|h| h.to_lowercase())
        .collect();

    rdr.records()
        .map(|record| {
            let record = record.unwrap();
            headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| {
                    let value = if cell.is_empty() {
                        RawValue::Null
                    } else {
                        RawValue::Text(cell.to_string())
                    };
                    (header.clone(), value)
                })
                .collect()
        })
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_every_row_becomes_a_record(trades in prop::collection::vec(trade_strategy(), 0..40)) {
        let repo = TradeRepository::from_rows(&parse(&to_csv(&trades)));
        prop_assert_eq!(repo.len(), trades.len());
        prop_assert_eq!(repo.stats().records, trades.len());
        prop_assert_eq!(repo.stats().undated_records, 0);
    }

    #[test]
    fn prop_formatted_amounts_keep_revenue(trades in prop::collection::vec(trade_strategy(), 1..40)) {
        let repo = TradeRepository::from_rows(&parse(&to_csv(&trades)));

        let expected: f64 = trades.iter().map(|t| t.value as f64).sum();
        let actual: f64 = repo.records().iter().map(|r| r.total_price).sum();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(repo.stats().coerced_numbers, 0);
    }

    #[test]
    fn prop_supplier_summaries_partition_revenue(trades in prop::collection::vec(trade_strategy(), 1..40)) {
        let repo = TradeRepository::from_rows(&parse(&to_csv(&trades)));

        let mut revenue = 0.0;
        let mut share = 0.0;
        for supplier in repo.company_list(Role::Supplier) {
            let summary = repo.company_summary(Some(&supplier), Role::Supplier).unwrap();
            revenue += summary.total_revenue;
            share += summary.market_share_percent;
        }

        let total: f64 = trades.iter().map(|t| t.value as f64).sum();
        prop_assert!((revenue - total).abs() < 1e-6);
        if total > 0.0 {
            prop_assert!((share - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_categories_stay_in_vocabulary(trades in prop::collection::vec(trade_strategy(), 1..40)) {
        let repo = TradeRepository::from_rows(&parse(&to_csv(&trades)));
        for record in repo.records() {
            prop_assert!(
                ["Yarn", "Fabric", "Fiber", "Garment", "Other"].contains(&record.category.as_str()),
                "unexpected category {}",
                record.category
            );
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_with_separators() {
    assert_eq!(with_separators(0), "0 USD");
    assert_eq!(with_separators(999), "999 USD");
    assert_eq!(with_separators(1000), "1,000 USD");
    assert_eq!(with_separators(1234567), "1,234,567 USD");
}

#[test]
fn test_monthly_overview_covers_months() {
    let trades: Vec<Trade> = (1..=12)
        .map(|month| Trade {
            seller: "Linen Mills",
            buyer: "Saigon Tex",
            product: "woven fabric 150cm",
            value: 1000,
            quantity: 10,
            month,
        })
        .collect();

    let repo = TradeRepository::from_rows(&parse(&to_csv(&trades)));
    let overview = repo.overview(&Default::default(), Role::Buyer);
    assert_eq!(overview.monthly.len(), 12);
    assert_eq!(overview.top_entities[0].name, "Saigon Tex");
    assert_eq!(overview.top_entities[0].revenue, 12000.0);
}
