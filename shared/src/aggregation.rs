//! Aggregation queries over normalized trade records
//!
//! Every query is a full pass over the records it is given. A missing
//! company selection yields `None`; a selection with no trades yields an
//! empty or zero-filled result. Nothing here returns an error.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::Datelike;

use crate::models::{BusinessType, CompanyDirectoryEntry, CompanySummary, TradeRecord};
use crate::types::{
    ChartSeries, FilterOptions, Metric, MonthlyPoint, RankedEntry, RankedSeries, RecordField,
    RecordFilters, Role, TimeSeries,
};
use crate::validation::is_legitimate_entity;

/// Cap for every ranked chart
pub const TOP_N: usize = 10;
/// Cap for the suppliers offered as a buyer's mimicry exemplars
pub const MIMICRY_TOP_N: usize = 3;
/// Group key used when the grouping field is empty
pub const UNKNOWN_KEY: &str = "Unknown";
/// Filter value meaning "no filter" for top buyer/supplier queries
pub const ALL_FILTER: &str = "All";
/// Category value meaning "no filter" for mimicry suppliers
pub const GENERAL_FILTER: &str = "General";

// ============================================================================
// Selection helpers
// ============================================================================

fn selected(company: Option<&str>) -> Option<&str> {
    company.filter(|name| !name.is_empty())
}

fn trades_of<'a>(records: &'a [TradeRecord], company: &str, role: Role) -> Vec<&'a TradeRecord> {
    let field = role.field();
    records
        .iter()
        .filter(|record| field.value(record) == company)
        .collect()
}

fn group_key(record: &TradeRecord, field: RecordField) -> &str {
    let value = field.value(record);
    if value.is_empty() {
        UNKNOWN_KEY
    } else {
        value
    }
}

/// Revenue/volume sums keyed by group, in order of first occurrence
#[derive(Default)]
struct GroupTotals {
    entries: Vec<RankedEntry>,
    index: HashMap<String, usize>,
}

impl GroupTotals {
    fn add(&mut self, key: &str, revenue: f64, volume: f64) {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                self.entries.push(RankedEntry {
                    name: key.to_string(),
                    revenue: 0.0,
                    volume: 0.0,
                });
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[slot];
        entry.revenue += revenue;
        entry.volume += volume;
    }

    /// Stable descending sort, so ties keep first-occurrence order
    fn into_ranked(mut self, metric: Metric, n: usize) -> Vec<RankedEntry> {
        let key = |entry: &RankedEntry| match metric {
            Metric::Revenue => entry.revenue,
            Metric::Volume => entry.volume,
        };
        self.entries
            .sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
        self.entries.truncate(n);
        self.entries
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Distinct non-empty values of a field, sorted ascending
pub fn unique_values<'a, I>(records: I, field: RecordField) -> Vec<String>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    records
        .into_iter()
        .map(|record| field.value(record))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Records passing every non-empty filter dimension
pub fn filter_records<'a>(
    records: &'a [TradeRecord],
    filters: &RecordFilters,
) -> Vec<&'a TradeRecord> {
    records.iter().filter(|record| filters.matches(record)).collect()
}

/// Option lists for the filter panel. Each level only offers values that
/// survive the filters chosen above it.
pub fn cascading_options(records: &[TradeRecord], filters: &RecordFilters) -> FilterOptions {
    let hs_codes = unique_values(records, RecordField::HsCode);

    let hs_scope = RecordFilters {
        hs_codes: filters.hs_codes.clone(),
        ..Default::default()
    };
    let by_hs = filter_records(records, &hs_scope);
    let categories = unique_values(by_hs.iter().copied(), RecordField::Category);

    let category_scope = RecordFilters {
        categories: filters.categories.clone(),
        ..Default::default()
    };
    let products = unique_values(
        by_hs
            .iter()
            .copied()
            .filter(|record| category_scope.matches(record)),
        RecordField::Product,
    );

    FilterOptions {
        hs_codes,
        categories,
        products,
    }
}

// ============================================================================
// Company charts
// ============================================================================

/// Revenue and transaction count per calendar month for one company.
///
/// Years collapse into the same twelve buckets; undated trades are skipped.
pub fn time_series(
    records: &[TradeRecord],
    company: Option<&str>,
    role: Role,
) -> Option<TimeSeries> {
    let company = selected(company)?;
    let mut trades = trades_of(records, company, role);
    trades.sort_by_key(|record| record.trade_date);

    let mut series = TimeSeries::default();
    for record in trades {
        let Some(date) = record.trade_date else {
            continue;
        };
        let month = date.month0() as usize;
        series.revenue[month] += record.total_price;
        series.transactions[month] += 1;
    }
    Some(series)
}

/// Revenue per value of `field` for one company, largest ten groups only
pub fn category_distribution(
    records: &[TradeRecord],
    company: Option<&str>,
    field: RecordField,
    role: Role,
) -> Option<ChartSeries> {
    let company = selected(company)?;

    let mut groups = GroupTotals::default();
    for record in trades_of(records, company, role) {
        groups.add(group_key(record, field), record.total_price, 0.0);
    }

    let mut series = ChartSeries::default();
    for entry in groups.into_ranked(Metric::Revenue, TOP_N) {
        series.labels.push(entry.name);
        series.values.push(entry.revenue);
    }
    Some(series)
}

// ============================================================================
// Rankings
// ============================================================================

/// Group records by `group_by`, sum revenue and volume, and keep the top `n`
/// by `metric`. Ties keep first-occurrence order.
pub fn top_n<'a, I>(records: I, group_by: RecordField, metric: Metric, n: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut groups = GroupTotals::default();
    for record in records {
        groups.add(
            group_key(record, group_by),
            record.total_price,
            record.total_amount,
        );
    }
    groups.into_ranked(metric, n)
}

/// Top suppliers or buyers of an already-filtered overview set
pub fn top_entities<'a, I>(records: I, role: Role) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    top_n(records, role.field(), Metric::Revenue, TOP_N)
}

/// A buyer's top products within a category or HS description
pub fn top_products_by_category(
    records: &[TradeRecord],
    buyer: Option<&str>,
    category: &str,
) -> Option<RankedSeries> {
    let buyer = selected(buyer)?;
    let trades = trades_of(records, buyer, Role::Buyer)
        .into_iter()
        .filter(|record| record.category == category || record.hs_description == category);

    Some(top_n(trades, RecordField::Product, Metric::Revenue, TOP_N).into())
}

fn top_counterparts(
    records: &[TradeRecord],
    company: Option<&str>,
    role: Role,
    filter_field: RecordField,
    filter_value: &str,
    n: usize,
    unfiltered: &str,
) -> Option<RankedSeries> {
    let company = selected(company)?;
    let apply_filter = !filter_value.is_empty() && filter_value != unfiltered;
    let trades = trades_of(records, company, role)
        .into_iter()
        .filter(|record| !apply_filter || filter_field.value(record) == filter_value);

    Some(top_n(trades, role.counterpart().field(), Metric::Revenue, n).into())
}

/// A supplier's top buyers, optionally restricted to one value of
/// `filter_field` (`"All"` means unrestricted)
pub fn top_buyers(
    records: &[TradeRecord],
    supplier: Option<&str>,
    filter_field: RecordField,
    filter_value: &str,
) -> Option<RankedSeries> {
    top_counterparts(
        records,
        supplier,
        Role::Supplier,
        filter_field,
        filter_value,
        TOP_N,
        ALL_FILTER,
    )
}

/// A buyer's top suppliers, optionally restricted to one value of
/// `filter_field` (`"All"` means unrestricted)
pub fn top_suppliers(
    records: &[TradeRecord],
    buyer: Option<&str>,
    filter_field: RecordField,
    filter_value: &str,
) -> Option<RankedSeries> {
    top_counterparts(
        records,
        buyer,
        Role::Buyer,
        filter_field,
        filter_value,
        TOP_N,
        ALL_FILTER,
    )
}

/// The three suppliers a buyer spends most with, optionally within one
/// category (`"General"` means every category)
pub fn top_suppliers_for_mimicry(
    records: &[TradeRecord],
    buyer: Option<&str>,
    category: &str,
) -> Option<RankedSeries> {
    top_counterparts(
        records,
        buyer,
        Role::Buyer,
        RecordField::Category,
        category,
        MIMICRY_TOP_N,
        GENERAL_FILTER,
    )
}

// ============================================================================
// Overview
// ============================================================================

/// Year-aware `YYYY-MM` buckets, oldest first
pub fn monthly_overview<'a, I>(records: I) -> Vec<MonthlyPoint>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut months: BTreeMap<String, (f64, f64, u64)> = BTreeMap::new();
    for record in records {
        let Some(date) = record.trade_date else {
            continue;
        };
        let bucket = months
            .entry(date.format("%Y-%m").to_string())
            .or_default();
        bucket.0 += record.total_price;
        bucket.1 += record.total_amount;
        bucket.2 += 1;
    }

    months
        .into_iter()
        .map(|(month, (revenue, amount, transactions))| MonthlyPoint {
            month,
            revenue,
            amount,
            transactions,
            avg_price: if amount != 0.0 { revenue / amount } else { 0.0 },
        })
        .collect()
}

// ============================================================================
// Companies
// ============================================================================

/// Sorted distinct legitimate company names for a role
pub fn company_list(records: &[TradeRecord], role: Role) -> Vec<String> {
    let field = role.field();
    records
        .iter()
        .map(|record| field.value(record))
        .filter(|name| is_legitimate_entity(name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Headline numbers for one company; `None` when unset or without trades
pub fn company_summary(
    records: &[TradeRecord],
    company: Option<&str>,
    role: Role,
) -> Option<CompanySummary> {
    let company = selected(company)?;
    let trades = trades_of(records, company, role);
    let first = trades.first()?;

    let total_revenue: f64 = trades.iter().map(|record| record.total_price).sum();
    let total_quantity: f64 = trades.iter().map(|record| record.total_amount).sum();
    let unique_products = trades
        .iter()
        .map(|record| record.product.as_str())
        .collect::<HashSet<_>>()
        .len();

    let dataset_revenue: f64 = records.iter().map(|record| record.total_price).sum();
    let market_share_percent = if dataset_revenue != 0.0 {
        total_revenue / dataset_revenue * 100.0
    } else {
        0.0
    };

    let location = match role {
        Role::Supplier => &first.supplier_location,
        Role::Buyer => &first.buyer_location,
    };

    Some(CompanySummary {
        name: company.to_string(),
        role,
        location: if location.is_empty() {
            UNKNOWN_KEY.to_string()
        } else {
            location.clone()
        },
        total_revenue,
        total_transactions: trades.len() as u64,
        total_quantity,
        avg_transaction: total_revenue / trades.len() as f64,
        unique_products,
        market_share_percent,
        business_type: BusinessType::from(role),
    })
}

/// Distinct name/location pairs over both sides of every trade
pub fn company_directory(records: &[TradeRecord]) -> Vec<CompanyDirectoryEntry> {
    let mut entries = BTreeSet::new();
    for record in records {
        for (name, location) in [
            (&record.buyer, &record.buyer_location),
            (&record.supplier, &record.supplier_location),
        ] {
            if is_legitimate_entity(name) {
                entries.insert(CompanyDirectoryEntry {
                    name: name.clone(),
                    location: location.clone(),
                });
            }
        }
    }
    entries.into_iter().collect()
}
