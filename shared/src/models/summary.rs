//! Company summary and directory models

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Headline numbers for a selected company
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanySummary {
    pub name: String,
    pub role: Role,
    pub location: String,
    pub total_revenue: f64,
    pub total_transactions: u64,
    pub total_quantity: f64,
    pub avg_transaction: f64,
    pub unique_products: usize,
    /// Share of total dataset revenue, in percent
    pub market_share_percent: f64,
    pub business_type: BusinessType,
}

/// Trade direction of a company as seen from the dataset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BusinessType {
    Importer,
    Exporter,
}

impl From<Role> for BusinessType {
    fn from(role: Role) -> Self {
        match role {
            Role::Buyer => BusinessType::Importer,
            Role::Supplier => BusinessType::Exporter,
        }
    }
}

/// A distinct company name/location pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompanyDirectoryEntry {
    pub name: String,
    pub location: String,
}
