//! End-to-end scenarios over raw rows
//!
//! Each test starts from spreadsheet-shaped rows and goes through
//! normalization, the repository and the engines the way the dashboard does.

use shared::{
    columns, CriteriaScale, MatchCriteria, MatchEngine, ProfileScale, RawRow, RecordField, Role,
    TradeRepository,
};

fn row(seller: &str, buyer: &str, product: &str, value: &str, date: &str) -> RawRow {
    RawRow::new()
        .with(columns::DATE, date)
        .with(columns::HS_CODE, "530110")
        .with(columns::PRODUCT, product)
        .with(columns::VALUE_USD, value)
        .with(columns::QUANTITY, "10")
        .with(columns::SELLER, seller)
        .with(columns::BUYER, buyer)
        .with(columns::SELLER_COUNTRY, "France")
        .with(columns::BUYER_COUNTRY, "Vietnam")
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_buyer_category_distribution() {
    let repo = TradeRepository::from_rows(&[
        row("S", "A", "cotton yarn", "100", "2024-01-05"),
        row("S", "A", "woven fabric", "300", "2024-06-05"),
    ]);

    let series = repo
        .category_distribution(Some("A"), RecordField::Category, Role::Buyer)
        .unwrap();
    assert_eq!(series.labels, vec!["Fabric", "Yarn"]);
    assert_eq!(series.values, vec![300.0, 100.0]);
}

#[test]
fn test_years_share_month_buckets() {
    let repo = TradeRepository::from_rows(&[
        row("S", "A", "cotton yarn", "100", "2022-01-15"),
        row("S", "A", "cotton yarn", "250", "2023-01-20"),
    ]);

    let series = repo.time_series(Some("A"), Role::Buyer).unwrap();
    assert_eq!(series.labels.len(), 12);
    assert_eq!(series.revenue[0], 350.0);
    assert_eq!(series.transactions[0], 2);
    assert!(series.revenue[1..].iter().all(|v| *v == 0.0));
}

#[test]
fn test_formatted_amounts_reach_summary() {
    let repo = TradeRepository::from_rows(&[
        row("S", "A", "cotton yarn", "1,234.50 USD", "2024-03-01"),
        row("S", "A", "cotton yarn", "", "2024-03-02"),
    ]);

    let summary = repo.company_summary(Some("A"), Role::Buyer).unwrap();
    assert_eq!(summary.total_revenue, 1234.5);
    assert_eq!(summary.total_transactions, 2);
    assert_eq!(summary.market_share_percent, 100.0);
}

// ============================================================================
// Profiles and matching
// ============================================================================

#[test]
fn test_profile_scale_against_median() {
    let repo = TradeRepository::from_rows(&[
        row("X", "A", "cotton yarn", "50", "2024-01-05"),
        row("Y", "A", "cotton yarn", "150", "2024-01-05"),
    ]);

    let profiles = repo.profiles(Role::Supplier);
    let scale_of = |name: &str| {
        profiles
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.scale)
            .unwrap()
    };
    assert_eq!(scale_of("X"), ProfileScale::Small);
    assert_eq!(scale_of("Y"), ProfileScale::Large);
}

#[test]
fn test_partial_activity_overlap() {
    let repo = TradeRepository::from_rows(&[row("S", "A", "cotton yarn", "100", "2024-01-05")]);

    let criteria = MatchCriteria {
        location: "France".to_string(),
        scale: CriteriaScale::Small,
        strongest_category: "Yarn".to_string(),
        activities: vec!["Yarn".to_string(), "Fabric".to_string()],
        target_revenue: 100.0,
        target_volume: 10.0,
    };

    let outcome = repo.find_matches(&MatchEngine::new(), &criteria).unwrap();
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].breakdown.activities, 0.5);
    assert_eq!(outcome.best.as_ref().map(|m| m.profile.name.as_str()), Some("S"));
}

#[test]
fn test_placeholder_suppliers_never_match() {
    let repo = TradeRepository::from_rows(&[
        row("Unknown", "A", "cotton yarn", "900", "2024-01-05"),
        row("S", "A", "cotton yarn", "100", "2024-01-05"),
    ]);

    let criteria = MatchCriteria {
        location: String::new(),
        strongest_category: "Yarn".to_string(),
        target_revenue: 900.0,
        target_volume: 10.0,
        ..Default::default()
    };

    let outcome = repo.find_matches(&MatchEngine::new(), &criteria).unwrap();
    assert!(outcome.matches.iter().all(|m| m.profile.name != "Unknown"));
}
