//! Match criteria and scored results

use serde::{Deserialize, Serialize};

use super::profile::{CompanyProfile, ProfileScale};

/// Target size picked by the user. Note the vocabulary differs from
/// [`ProfileScale`] (`Big` vs `Large`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum CriteriaScale {
    #[default]
    Big,
    Small,
}

impl CriteriaScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriteriaScale::Big => "Big",
            CriteriaScale::Small => "Small",
        }
    }

    /// Same size class, reading `Big` as `Large`
    pub fn is_equivalent(&self, scale: ProfileScale) -> bool {
        matches!(
            (self, scale),
            (CriteriaScale::Big, ProfileScale::Large) | (CriteriaScale::Small, ProfileScale::Small)
        )
    }
}

impl std::fmt::Display for CriteriaScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The user's target profile for similarity matching
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MatchCriteria {
    pub location: String,
    pub scale: CriteriaScale,
    pub strongest_category: String,
    #[serde(default)]
    pub activities: Vec<String>,
    pub target_revenue: f64,
    pub target_volume: f64,
}

/// Per-factor scores, each in `0.0..=1.0`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub location: f64,
    pub scale: f64,
    pub strongest_category: f64,
    pub activities: f64,
    pub revenue: f64,
    pub volume: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.location
            + self.scale
            + self.strongest_category
            + self.activities
            + self.revenue
            + self.volume
    }
}

/// A profile scored against the criteria
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub profile: CompanyProfile,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl MatchResult {
    /// Highest achievable score (six factors, one point each)
    pub const MAX_SCORE: f64 = 6.0;

    /// Score as a rounded percentage of [`Self::MAX_SCORE`]
    pub fn score_percent(&self) -> u32 {
        ((self.score / Self::MAX_SCORE) * 100.0).round().max(0.0) as u32
    }
}
