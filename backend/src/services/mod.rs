//! Dataset and export services for the Trade Analytics dataset server

pub mod dataset;
pub mod reporting;

pub use dataset::DatasetService;
pub use reporting::ReportingService;
