//! Raw input rows as handed over by the external tabular loader

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single primitive cell value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// String form of the value, `None` for null.
    ///
    /// Integral numbers render without a fractional part so that numeric
    /// HS codes (`530110`) read the same as their text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            RawValue::Null => None,
            RawValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            RawValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            RawValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }

    /// True for null, empty text, `false` and zero
    pub fn is_falsy(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Bool(b) => !b,
            RawValue::Number(n) => *n == 0.0 || n.is_nan(),
            RawValue::Text(s) => s.is_empty(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One row of the source table: column name to cell value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct RawRow(HashMap<String, RawValue>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    /// Trimmed text of a column; `None` when absent, null or blank
    pub fn text(&self, key: &str) -> Option<String> {
        let value = self.get(key)?.as_text()?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (String, RawValue)>>(iter: T) -> Self {
        RawRow(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_numbers_render_without_fraction() {
        assert_eq!(RawValue::Number(530110.0).as_text().unwrap(), "530110");
        assert_eq!(RawValue::Number(12.5).as_text().unwrap(), "12.5");
        assert!(RawValue::Null.as_text().is_none());
    }

    #[test]
    fn test_row_text_trims_and_drops_blank() {
        let row = RawRow::new().with("buyer", "  ACME  ").with("seller", "   ");
        assert_eq!(row.text("buyer").as_deref(), Some("ACME"));
        assert_eq!(row.text("seller"), None);
        assert_eq!(row.text("missing"), None);
    }

    #[test]
    fn test_row_deserializes_from_json_object() {
        let row: RawRow =
            serde_json::from_str(r#"{"hs_code": 530110, "buyer": "A", "uusd": null}"#).unwrap();
        assert_eq!(row.get("hs_code"), Some(&RawValue::Number(530110.0)));
        assert_eq!(row.get("buyer"), Some(&RawValue::Text("A".into())));
        assert_eq!(row.get("uusd"), Some(&RawValue::Null));
    }
}
