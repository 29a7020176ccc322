//! WebAssembly module for the Trade Analytics Dashboard
//!
//! Exposes the analytics core to the browser dashboard:
//! - A `Dashboard` handle owning one normalized dataset
//! - Chart queries (time series, distributions, rankings, overview)
//! - Company profiles and similarity matching
//!
//! Every query takes and returns JSON strings. A missing selection comes back
//! as `null`, never as an error.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{
    CoreError, CoreResult, MatchConfig, MatchCriteria, MatchEngine, RawRow, RecordField,
    RecordFilters, Role, TradeRepository,
};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    web_sys::console::log_1(&"trade analytics core loaded".into());
}

fn to_json<T: Serialize>(value: &T) -> CoreResult<String> {
    Ok(serde_json::to_string(value)?)
}

fn to_js(err: CoreError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// A loaded dataset plus the match engine settings used against it
#[wasm_bindgen]
pub struct Dashboard {
    repo: TradeRepository,
    engine: MatchEngine,
}

// JSON-level operations, callable without a JS runtime
impl Dashboard {
    pub fn from_rows_json(rows_json: &str) -> CoreResult<Self> {
        let rows: Vec<RawRow> = serde_json::from_str(rows_json)?;
        let repo = TradeRepository::from_rows(&rows);
        tracing::info!(records = repo.len(), "dataset loaded into dashboard");

        Ok(Self {
            repo,
            engine: MatchEngine::new(),
        })
    }

    pub fn repository(&self) -> &TradeRepository {
        &self.repo
    }

    pub fn stats_json(&self) -> CoreResult<String> {
        to_json(self.repo.stats())
    }

    pub fn unique_values_json(&self, field: &str) -> CoreResult<String> {
        to_json(&self.repo.unique_values(field.parse()?))
    }

    pub fn cascading_options_json(&self, filters_json: &str) -> CoreResult<String> {
        let filters: RecordFilters = serde_json::from_str(filters_json)?;
        to_json(&self.repo.cascading_options(&filters))
    }

    pub fn overview_json(&self, filters_json: &str, role: &str) -> CoreResult<String> {
        let filters: RecordFilters = serde_json::from_str(filters_json)?;
        to_json(&self.repo.overview(&filters, role.parse()?))
    }

    pub fn company_list_json(&self, role: &str) -> CoreResult<String> {
        to_json(&self.repo.company_list(role.parse()?))
    }

    pub fn company_directory_json(&self) -> CoreResult<String> {
        to_json(&self.repo.company_directory())
    }

    pub fn company_summary_json(&self, company: Option<&str>, role: &str) -> CoreResult<String> {
        to_json(&self.repo.company_summary(company, role.parse()?))
    }

    pub fn time_series_json(&self, company: Option<&str>, role: &str) -> CoreResult<String> {
        to_json(&self.repo.time_series(company, role.parse()?))
    }

    pub fn category_distribution_json(
        &self,
        company: Option<&str>,
        field: &str,
        role: &str,
    ) -> CoreResult<String> {
        let field: RecordField = field.parse()?;
        to_json(&self.repo.category_distribution(company, field, role.parse()?))
    }

    pub fn top_products_json(&self, buyer: Option<&str>, category: &str) -> CoreResult<String> {
        to_json(&self.repo.top_products_by_category(buyer, category))
    }

    pub fn top_buyers_json(
        &self,
        supplier: Option<&str>,
        filter_field: &str,
        filter_value: &str,
    ) -> CoreResult<String> {
        to_json(&self.repo.top_buyers(supplier, filter_field.parse()?, filter_value))
    }

    pub fn top_suppliers_json(
        &self,
        buyer: Option<&str>,
        filter_field: &str,
        filter_value: &str,
    ) -> CoreResult<String> {
        to_json(&self.repo.top_suppliers(buyer, filter_field.parse()?, filter_value))
    }

    pub fn mimicry_suppliers_json(&self, buyer: Option<&str>, category: &str) -> CoreResult<String> {
        to_json(&self.repo.top_suppliers_for_mimicry(buyer, category))
    }

    pub fn profiles_json(&self, role: &str) -> CoreResult<String> {
        to_json(&self.repo.profiles(role.parse()?))
    }

    pub fn find_matches_json(&self, criteria_json: &str) -> CoreResult<String> {
        let criteria: MatchCriteria = serde_json::from_str(criteria_json)?;
        to_json(&self.repo.find_matches(&self.engine, &criteria)?)
    }

    pub fn set_match_config_json(&mut self, config_json: &str) -> CoreResult<()> {
        let config: MatchConfig = serde_json::from_str(config_json)?;
        self.engine = MatchEngine::with_config(config);
        Ok(())
    }
}

#[wasm_bindgen]
impl Dashboard {
    /// Normalize a JSON array of raw rows into a new dashboard
    #[wasm_bindgen(constructor)]
    pub fn new(rows_json: &str) -> Result<Dashboard, JsValue> {
        Self::from_rows_json(rows_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = recordCount)]
    pub fn record_count(&self) -> usize {
        self.repo.len()
    }

    pub fn stats(&self) -> Result<String, JsValue> {
        self.stats_json().map_err(to_js)
    }

    #[wasm_bindgen(js_name = uniqueValues)]
    pub fn unique_values(&self, field: &str) -> Result<String, JsValue> {
        self.unique_values_json(field).map_err(to_js)
    }

    #[wasm_bindgen(js_name = cascadingOptions)]
    pub fn cascading_options(&self, filters_json: &str) -> Result<String, JsValue> {
        self.cascading_options_json(filters_json).map_err(to_js)
    }

    pub fn overview(&self, filters_json: &str, role: &str) -> Result<String, JsValue> {
        self.overview_json(filters_json, role).map_err(to_js)
    }

    #[wasm_bindgen(js_name = companyList)]
    pub fn company_list(&self, role: &str) -> Result<String, JsValue> {
        self.company_list_json(role).map_err(to_js)
    }

    #[wasm_bindgen(js_name = companyDirectory)]
    pub fn company_directory(&self) -> Result<String, JsValue> {
        self.company_directory_json().map_err(to_js)
    }

    #[wasm_bindgen(js_name = companySummary)]
    pub fn company_summary(&self, company: Option<String>, role: &str) -> Result<String, JsValue> {
        self.company_summary_json(company.as_deref(), role)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = timeSeries)]
    pub fn time_series(&self, company: Option<String>, role: &str) -> Result<String, JsValue> {
        self.time_series_json(company.as_deref(), role).map_err(to_js)
    }

    #[wasm_bindgen(js_name = categoryDistribution)]
    pub fn category_distribution(
        &self,
        company: Option<String>,
        field: &str,
        role: &str,
    ) -> Result<String, JsValue> {
        self.category_distribution_json(company.as_deref(), field, role)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = topProductsByCategory)]
    pub fn top_products_by_category(
        &self,
        buyer: Option<String>,
        category: &str,
    ) -> Result<String, JsValue> {
        self.top_products_json(buyer.as_deref(), category)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = topBuyers)]
    pub fn top_buyers(
        &self,
        supplier: Option<String>,
        filter_field: &str,
        filter_value: &str,
    ) -> Result<String, JsValue> {
        self.top_buyers_json(supplier.as_deref(), filter_field, filter_value)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = topSuppliers)]
    pub fn top_suppliers(
        &self,
        buyer: Option<String>,
        filter_field: &str,
        filter_value: &str,
    ) -> Result<String, JsValue> {
        self.top_suppliers_json(buyer.as_deref(), filter_field, filter_value)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = topSuppliersForMimicry)]
    pub fn top_suppliers_for_mimicry(
        &self,
        buyer: Option<String>,
        category: &str,
    ) -> Result<String, JsValue> {
        self.mimicry_suppliers_json(buyer.as_deref(), category)
            .map_err(to_js)
    }

    pub fn profiles(&self, role: &str) -> Result<String, JsValue> {
        self.profiles_json(role).map_err(to_js)
    }

    #[wasm_bindgen(js_name = findMatches)]
    pub fn find_matches(&self, criteria_json: &str) -> Result<String, JsValue> {
        self.find_matches_json(criteria_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setMatchConfig)]
    pub fn set_match_config(&mut self, config_json: &str) -> Result<(), JsValue> {
        self.set_match_config_json(config_json).map_err(to_js)
    }
}

/// Lenient number parsing used for dirty spreadsheet cells
#[wasm_bindgen(js_name = parseNumber)]
pub fn parse_number(value: &str) -> f64 {
    shared::parse_number(value)
}

/// Median of a list of values (0 for an empty list)
#[wasm_bindgen]
pub fn median(values: &[f64]) -> f64 {
    shared::median(values)
}

/// Broad category for a standardized product name
#[wasm_bindgen(js_name = deriveCategory)]
pub fn derive_category(product: &str) -> String {
    shared::derive_category(product).to_string()
}

/// Clean standard name for a free-text product description
#[wasm_bindgen(js_name = standardizeProduct)]
pub fn standardize_product(raw: &str) -> String {
    shared::standardize_product(raw)
}

/// Human label for an HS code
#[wasm_bindgen(js_name = classifyHsCode)]
pub fn classify_hs_code(code: &str) -> String {
    shared::classify_hs_code(code)
}

/// Validate a role name coming from the UI
#[wasm_bindgen(js_name = isValidRole)]
pub fn is_valid_role(role: &str) -> bool {
    role.parse::<Role>().is_ok()
}
