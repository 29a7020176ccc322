//! Reporting service for data export
//! Flattens company profiles into CSV-friendly rows

use serde::Serialize;
use shared::CompanyProfile;

use crate::error::{AppError, AppResult};

/// Number of categories shown in the exported "top categories" column
pub const EXPORT_TOP_CATEGORIES: usize = 3;

/// Reporting service
#[derive(Clone, Copy, Default)]
pub struct ReportingService;

/// One exported profile row
#[derive(Debug, Serialize)]
pub struct ProfileExportRow {
    pub name: String,
    pub location: String,
    pub total_revenue: f64,
    pub total_volume: f64,
    pub best_category: String,
    pub top_categories: String,
    pub scale: String,
}

impl From<&CompanyProfile> for ProfileExportRow {
    fn from(profile: &CompanyProfile) -> Self {
        Self {
            name: profile.name.clone(),
            location: profile.location.clone(),
            total_revenue: profile.total_revenue,
            total_volume: profile.total_volume,
            best_category: profile.best_category.clone(),
            top_categories: profile.top_categories_label(EXPORT_TOP_CATEGORIES),
            scale: profile.scale.to_string(),
        }
    }
}

impl ReportingService {
    pub fn profile_rows(profiles: &[CompanyProfile]) -> Vec<ProfileExportRow> {
        profiles.iter().map(ProfileExportRow::from).collect()
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
