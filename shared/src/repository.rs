//! In-memory trade repository
//!
//! Owns the normalized records of one dataset load together with the load's
//! median snapshot. Callers construct it explicitly and pass it to whoever
//! needs to query; there is no process-wide instance.

use serde::{Deserialize, Serialize};

use crate::aggregation;
use crate::error::CoreResult;
use crate::matching::{pick_best_for_mimicry, MatchEngine};
use crate::models::{
    CompanyDirectoryEntry, CompanyProfile, CompanySummary, MatchCriteria, MatchResult, RawRow,
    TradeRecord,
};
use crate::normalize::{normalize_rows, NormalizeStats};
use crate::profile::build_profiles_for;
use crate::types::{
    ChartSeries, FilterOptions, MonthlyPoint, RankedEntry, RankedSeries, RecordField,
    RecordFilters, Role, TimeSeries,
};

/// Ranked matches together with the exemplar chosen for mimicry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchOutcome {
    pub matches: Vec<MatchResult>,
    pub best: Option<MatchResult>,
}

/// Filtered overview: monthly buckets plus the top entities of one role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Overview {
    pub monthly: Vec<MonthlyPoint>,
    pub top_entities: Vec<RankedEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct TradeRepository {
    records: Vec<TradeRecord>,
    stats: NormalizeStats,
}

impl TradeRepository {
    /// Normalize a full set of raw rows against one median snapshot
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let (records, stats) = normalize_rows(rows);
        Self { records, stats }
    }

    /// Wrap records that are already normalized
    pub fn from_records(records: Vec<TradeRecord>) -> Self {
        let stats = NormalizeStats {
            records: records.len(),
            ..Default::default()
        };
        Self { records, stats }
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn stats(&self) -> &NormalizeStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Filters

    pub fn unique_values(&self, field: RecordField) -> Vec<String> {
        aggregation::unique_values(&self.records, field)
    }

    pub fn filter(&self, filters: &RecordFilters) -> Vec<&TradeRecord> {
        aggregation::filter_records(&self.records, filters)
    }

    pub fn cascading_options(&self, filters: &RecordFilters) -> FilterOptions {
        aggregation::cascading_options(&self.records, filters)
    }

    pub fn overview(&self, filters: &RecordFilters, role: Role) -> Overview {
        let filtered = self.filter(filters);
        Overview {
            monthly: aggregation::monthly_overview(filtered.iter().copied()),
            top_entities: aggregation::top_entities(filtered.iter().copied(), role),
        }
    }

    // Company views

    pub fn company_list(&self, role: Role) -> Vec<String> {
        aggregation::company_list(&self.records, role)
    }

    pub fn company_directory(&self) -> Vec<CompanyDirectoryEntry> {
        aggregation::company_directory(&self.records)
    }

    pub fn company_summary(&self, company: Option<&str>, role: Role) -> Option<CompanySummary> {
        aggregation::company_summary(&self.records, company, role)
    }

    pub fn time_series(&self, company: Option<&str>, role: Role) -> Option<TimeSeries> {
        aggregation::time_series(&self.records, company, role)
    }

    pub fn category_distribution(
        &self,
        company: Option<&str>,
        field: RecordField,
        role: Role,
    ) -> Option<ChartSeries> {
        aggregation::category_distribution(&self.records, company, field, role)
    }

    pub fn top_products_by_category(
        &self,
        buyer: Option<&str>,
        category: &str,
    ) -> Option<RankedSeries> {
        aggregation::top_products_by_category(&self.records, buyer, category)
    }

    pub fn top_buyers(
        &self,
        supplier: Option<&str>,
        filter_field: RecordField,
        filter_value: &str,
    ) -> Option<RankedSeries> {
        aggregation::top_buyers(&self.records, supplier, filter_field, filter_value)
    }

    pub fn top_suppliers(
        &self,
        buyer: Option<&str>,
        filter_field: RecordField,
        filter_value: &str,
    ) -> Option<RankedSeries> {
        aggregation::top_suppliers(&self.records, buyer, filter_field, filter_value)
    }

    pub fn top_suppliers_for_mimicry(
        &self,
        buyer: Option<&str>,
        category: &str,
    ) -> Option<RankedSeries> {
        aggregation::top_suppliers_for_mimicry(&self.records, buyer, category)
    }

    // Profiles and matching

    /// Profiles are rebuilt on every call
    pub fn profiles(&self, role: Role) -> Vec<CompanyProfile> {
        build_profiles_for(&self.records, role)
    }

    /// Rank supplier profiles and pick the mimicry exemplar
    pub fn find_matches(
        &self,
        engine: &MatchEngine,
        criteria: &MatchCriteria,
    ) -> CoreResult<MatchOutcome> {
        let profiles = self.profiles(Role::Supplier);
        let matches = engine.match_profiles(criteria, &profiles)?;
        let best = pick_best_for_mimicry(&matches).cloned();
        Ok(MatchOutcome { matches, best })
    }
}
