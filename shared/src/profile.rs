//! Company profile builder
//!
//! Folds the record collection into one [`CompanyProfile`] per company in a
//! single pass, then classifies each profile against the median revenue of
//! the profile population.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{CategoryRevenue, CompanyProfile, ProfileScale, TradeRecord};
use crate::normalize::median;
use crate::types::Role;
use crate::validation::is_profile_candidate;

const UNKNOWN: &str = "Unknown";

struct ProfileAccumulator {
    name: String,
    location: String,
    total_revenue: f64,
    total_volume: f64,
    category_revenue: Vec<CategoryRevenue>,
}

impl ProfileAccumulator {
    fn add(&mut self, record: &TradeRecord) {
        self.total_revenue += record.total_price;
        self.total_volume += record.total_amount;

        let category = if record.category.is_empty() {
            UNKNOWN
        } else {
            record.category.as_str()
        };
        match self.category_revenue.iter_mut().find(|c| c.category == category) {
            Some(entry) => entry.revenue += record.total_price,
            None => self.category_revenue.push(CategoryRevenue {
                category: category.to_string(),
                revenue: record.total_price,
            }),
        }
    }

    fn finish(self, median_revenue: f64) -> CompanyProfile {
        // first category to reach a new maximum wins ties
        let mut best: Option<&CategoryRevenue> = None;
        for entry in &self.category_revenue {
            if best.map_or(true, |b| entry.revenue > b.revenue) {
                best = Some(entry);
            }
        }
        let best_category = best
            .map(|entry| entry.category.clone())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let mut ranked: Vec<&CategoryRevenue> = self.category_revenue.iter().collect();
        ranked.sort_by(|a, b| b.revenue.partial_cmp(&a.revenue).unwrap_or(Ordering::Equal));
        let top_categories = ranked.iter().map(|entry| entry.category.clone()).collect();

        CompanyProfile {
            scale: ProfileScale::classify(self.total_revenue, median_revenue),
            name: self.name,
            location: self.location,
            total_revenue: self.total_revenue,
            total_volume: self.total_volume,
            category_revenue: self.category_revenue,
            best_category,
            top_categories,
        }
    }
}

/// Supplier profiles, the population the matcher ranks
pub fn build_profiles(records: &[TradeRecord]) -> Vec<CompanyProfile> {
    build_profiles_for(records, Role::Supplier)
}

/// Profiles keyed by the company on `role`'s side of each trade, in order of
/// first appearance
pub fn build_profiles_for(records: &[TradeRecord], role: Role) -> Vec<CompanyProfile> {
    let field = role.field();
    let mut accumulators: Vec<ProfileAccumulator> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let name = field.value(record);
        if !is_profile_candidate(name) {
            continue;
        }

        let slot = *index.entry(name).or_insert_with(|| {
            let location = match role {
                Role::Supplier => &record.supplier_location,
                Role::Buyer => &record.buyer_location,
            };
            accumulators.push(ProfileAccumulator {
                name: name.to_string(),
                location: if location.is_empty() {
                    UNKNOWN.to_string()
                } else {
                    location.clone()
                },
                total_revenue: 0.0,
                total_volume: 0.0,
                category_revenue: Vec::new(),
            });
            accumulators.len() - 1
        });
        accumulators[slot].add(record);
    }

    let revenues: Vec<f64> = accumulators.iter().map(|a| a.total_revenue).collect();
    let median_revenue = median(&revenues);

    tracing::debug!(
        role = %role,
        profiles = accumulators.len(),
        median_revenue,
        "built company profiles"
    );

    accumulators
        .into_iter()
        .map(|accumulator| accumulator.finish(median_revenue))
        .collect()
}
