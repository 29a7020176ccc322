//! Similarity matching of company profiles against user criteria
//!
//! Six factors, each worth up to one point:
//! location, scale, strongest category, activity overlap, revenue band and
//! volume band. Ranking is a stable sort on the total, so equal scores keep
//! profile order.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::{CompanyProfile, MatchCriteria, MatchResult, ScoreBreakdown};
use crate::validation::validate_criteria;

/// Tunables for a [`MatchEngine`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Fractional band around the revenue target, inclusive on both ends
    pub revenue_tolerance: f64,
    /// Fractional band around the volume target, inclusive on both ends
    pub volume_tolerance: f64,
    /// Number of ranked results kept
    pub top_k: usize,
    /// Compare criteria and profile scale names literally, so `Big` never
    /// matches `Large`. When false, `Big` is read as `Large`.
    pub literal_scale_vocabulary: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            revenue_tolerance: 0.2,
            volume_tolerance: 0.2,
            top_k: 3,
            literal_scale_vocabulary: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchEngine {
    config: MatchConfig,
}

fn binary(hit: bool) -> f64 {
    if hit {
        1.0
    } else {
        0.0
    }
}

fn within_band(value: f64, target: f64, tolerance: f64) -> bool {
    value >= target * (1.0 - tolerance) && value <= target * (1.0 + tolerance)
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Score a single profile
    pub fn score(&self, criteria: &MatchCriteria, profile: &CompanyProfile) -> ScoreBreakdown {
        let wanted = criteria.location.to_lowercase();
        let actual = profile.location.to_lowercase();
        let location = binary(actual.contains(&wanted) || wanted.contains(&actual));

        let scale = if self.config.literal_scale_vocabulary {
            binary(criteria.scale.as_str() == profile.scale.as_str())
        } else {
            binary(criteria.scale.is_equivalent(profile.scale))
        };

        let strongest_category = binary(criteria.strongest_category == profile.best_category);

        let wanted_activities: HashSet<&str> =
            criteria.activities.iter().map(String::as_str).collect();
        let activities = if wanted_activities.is_empty() {
            0.0
        } else {
            let shared = wanted_activities
                .iter()
                .filter(|activity| profile.activities().iter().any(|a| a == *activity))
                .count();
            shared as f64 / wanted_activities.len() as f64
        };

        ScoreBreakdown {
            location,
            scale,
            strongest_category,
            activities,
            revenue: binary(within_band(
                profile.total_revenue,
                criteria.target_revenue,
                self.config.revenue_tolerance,
            )),
            volume: binary(within_band(
                profile.total_volume,
                criteria.target_volume,
                self.config.volume_tolerance,
            )),
        }
    }

    /// Rank profiles against the criteria, keeping the best `top_k`
    pub fn match_profiles(
        &self,
        criteria: &MatchCriteria,
        profiles: &[CompanyProfile],
    ) -> CoreResult<Vec<MatchResult>> {
        validate_criteria(criteria).map_err(CoreError::InvalidCriteria)?;

        let mut results: Vec<MatchResult> = profiles
            .iter()
            .map(|profile| {
                let breakdown = self.score(criteria, profile);
                MatchResult {
                    profile: profile.clone(),
                    score: breakdown.total(),
                    breakdown,
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(self.config.top_k);

        tracing::debug!(
            candidates = profiles.len(),
            returned = results.len(),
            best_score = ?results.first().map(|r| r.score),
            "ranked match candidates"
        );

        Ok(results)
    }
}

/// Choose the single exemplar among ranked matches: highest score, then
/// revenue, then volume. The first result wins a full tie.
pub fn pick_best_for_mimicry(results: &[MatchResult]) -> Option<&MatchResult> {
    let key = |r: &MatchResult| (r.score, r.profile.total_revenue, r.profile.total_volume);

    let mut best: Option<&MatchResult> = None;
    for result in results {
        let better = match best {
            None => true,
            Some(current) => key(result).partial_cmp(&key(current)) == Some(Ordering::Greater),
        };
        if better {
            best = Some(result);
        }
    }
    best
}
