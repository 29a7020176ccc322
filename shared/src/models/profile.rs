//! Per-company aggregate profiles used by the matcher

use serde::{Deserialize, Serialize};

/// Company size relative to the median revenue across all profiles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ProfileScale {
    Large,
    #[default]
    Small,
}

impl ProfileScale {
    /// Strictly above the profile-population median is `Large`
    pub fn classify(total_revenue: f64, median_revenue: f64) -> Self {
        if total_revenue > median_revenue {
            ProfileScale::Large
        } else {
            ProfileScale::Small
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileScale::Large => "Large",
            ProfileScale::Small => "Small",
        }
    }
}

impl std::fmt::Display for ProfileScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Revenue accumulated for one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
}

/// Aggregate view of one company across every record where it is the keyed party
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyProfile {
    pub name: String,
    pub location: String,
    pub total_revenue: f64,
    pub total_volume: f64,
    /// Per-category revenue in order of first occurrence
    pub category_revenue: Vec<CategoryRevenue>,
    pub best_category: String,
    /// Every category, sorted by revenue descending
    pub top_categories: Vec<String>,
    pub scale: ProfileScale,
}

impl CompanyProfile {
    /// Revenue recorded for a category, if the company traded it
    pub fn revenue_for(&self, category: &str) -> Option<f64> {
        self.category_revenue
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.revenue)
    }

    /// Categories the company is active in, strongest first
    pub fn activities(&self) -> &[String] {
        &self.top_categories
    }

    /// First `n` categories joined for display ("Yarn, Fabric, Fiber")
    pub fn top_categories_label(&self, n: usize) -> String {
        self.top_categories
            .iter()
            .take(n)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
