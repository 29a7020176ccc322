//! Dataset service: reads the trade CSV and builds the in-memory repository

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use shared::{RawRow, RawValue, TradeRepository};

use crate::config::DatasetConfig;
use crate::error::{AppError, AppResult};

/// Loads the configured CSV source into a [`TradeRepository`]
#[derive(Clone)]
pub struct DatasetService {
    config: DatasetConfig,
}

impl DatasetService {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &str {
        &self.config.path
    }

    /// Parse CSV into raw rows. Header names are trimmed and lower-cased;
    /// empty cells become nulls. Bytes that are not valid UTF-8 (Latin-1
    /// exports) are replaced rather than failing the whole load.
    pub fn parse_csv<R: Read>(reader: R, delimiter: u8) -> AppResult<Vec<RawRow>> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim().to_lowercase())
            .collect();

        let mut rows = Vec::new();
        let mut lossy_cells = 0usize;
        for record in rdr.byte_records() {
            let record = record?;
            let row: RawRow = headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| {
                    let value = if cell.is_empty() {
                        RawValue::Null
                    } else {
                        let text = String::from_utf8_lossy(cell);
                        if let Cow::Owned(_) = text {
                            lossy_cells += 1;
                        }
                        RawValue::Text(text.into_owned())
                    };
                    (header.clone(), value)
                })
                .collect();
            rows.push(row);
        }

        if lossy_cells > 0 {
            tracing::warn!(lossy_cells, "Replaced invalid UTF-8 in dataset cells");
        }

        Ok(rows)
    }

    /// Read and normalize the configured file
    pub async fn load(&self) -> AppResult<TradeRepository> {
        let path = self.config.path.clone();
        if !Path::new(&path).exists() {
            return Err(AppError::DatasetUnavailable(format!("{} does not exist", path)));
        }

        let bytes = tokio::fs::read(&path).await?;
        let delimiter = self.config.delimiter_byte();

        let repo = tokio::task::spawn_blocking(move || -> AppResult<TradeRepository> {
            let rows = Self::parse_csv(bytes.as_slice(), delimiter)?;
            Ok(TradeRepository::from_rows(&rows))
        })
        .await
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))??;

        let stats = repo.stats();
        tracing::info!(
            path = %path,
            records = stats.records,
            coerced_numbers = stats.coerced_numbers,
            undated_records = stats.undated_records,
            "Dataset loaded"
        );

        Ok(repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Date,HS_Code,Product_Label,Value_USD,Quantity,UUSD,Seller,Buyer,Seller_Country,Buyer_Country
2024-01-05,530110,flax yarn,\"1,000\",10,,Linen Mills,Saigon Tex,France,Vietnam
2024-06-05,530121,woven fabric,3000,20,150,Linen Mills,Saigon Tex,France,Vietnam
,530110,flax yarn,n/a,5,,Flax Corp,Hanoi Weave,Belgium,Vietnam
";

    #[test]
    fn test_parse_csv_rows() {
        let rows = DatasetService::parse_csv(CSV.as_bytes(), b',').unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text("value_usd").as_deref(), Some("1,000"));
        assert_eq!(rows[0].get("uusd"), Some(&RawValue::Null));
        assert_eq!(rows[2].get("date"), Some(&RawValue::Null));
        assert_eq!(rows[1].text("seller_country").as_deref(), Some("France"));
    }

    #[test]
    fn test_parse_csv_tolerates_latin1_bytes() {
        let mut data = b"date,value_usd,seller,buyer\n".to_vec();
        data.extend_from_slice(b"2024-01-05,100,Linen Mills,B\n");
        data.extend_from_slice(b"2024-01-06,200,Soci");
        data.extend_from_slice(&[0xE9, b't', 0xE9]);
        data.extend_from_slice(b",B\n");

        let rows = DatasetService::parse_csv(data.as_slice(), b',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("seller").as_deref(), Some("Linen Mills"));
        assert_eq!(rows[1].text("seller").as_deref(), Some("Soci\u{FFFD}t\u{FFFD}"));

        let repo = TradeRepository::from_rows(&rows);
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.records()[1].total_price, 200.0);
    }

    #[test]
    fn test_serial_date_column() {
        let data = "date,value_usd,seller,buyer\n45296,100,S,B\n";
        let rows = DatasetService::parse_csv(data.as_bytes(), b',').unwrap();
        let repo = TradeRepository::from_rows(&rows);

        let date = repo.records()[0].trade_date.map(|d| d.to_string());
        assert_eq!(date.as_deref(), Some("2024-01-05"));
        assert_eq!(repo.stats().undated_records, 0);
    }

    #[test]
    fn test_parse_csv_custom_delimiter() {
        let data = "seller;buyer\nA;B\n";
        let rows = DatasetService::parse_csv(data.as_bytes(), b';').unwrap();
        assert_eq!(rows[0].text("buyer").as_deref(), Some("B"));
    }

    #[test]
    fn test_parsed_rows_normalize() {
        let rows = DatasetService::parse_csv(CSV.as_bytes(), b',').unwrap();
        let repo = TradeRepository::from_rows(&rows);
        assert_eq!(repo.records()[0].total_price, 1000.0);
        assert_eq!(repo.records()[0].avg_unit_price, 100.0);
        assert_eq!(repo.records()[1].avg_unit_price, 150.0);
        assert_eq!(repo.stats().coerced_numbers, 1);
        assert_eq!(repo.stats().undated_records, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let service = DatasetService::new(DatasetConfig {
            path: "does/not/exist.csv".to_string(),
            delimiter: ",".to_string(),
        });
        let result = tokio_test::block_on(service.load());
        assert!(matches!(result, Err(AppError::DatasetUnavailable(_))));
    }
}
