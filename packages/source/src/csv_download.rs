//! CSV file downloader and parser.
//!
//! Downloads a CSV from a URL, parses it, and returns every row as a
//! [`serde_json::Value`] object keyed by the column headers in the first
//! row. The whole file is downloaded at once; the incident dataset is a
//! single flat file with no pagination.

use crate::{SourceError, fetch_bytes};

/// Downloads and parses a CSV file into header-keyed records.
///
/// Header names and field values are trimmed. Rows shorter than the header
/// row get empty strings for the missing columns, matching how the upstream
/// export pads ragged rows.
///
/// # Errors
///
/// Returns [`SourceError`] if the download fails, the file contains no
/// header row, or a record cannot be parsed.
pub async fn download_csv(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<serde_json::Value>, SourceError> {
    let bytes = fetch_bytes(client, url).await?;
    parse_csv(&bytes, url)
}

/// Parses CSV bytes into header-keyed records.
fn parse_csv(bytes: &[u8], url: &str) -> Result<Vec<serde_json::Value>, SourceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_owned()).collect();

    if headers.is_empty() {
        return Err(SourceError::Parse("CSV file contains no header row".to_owned()));
    }

    let mut records: Vec<serde_json::Value> = Vec::new();

    for result in reader.records() {
        let record = result?;

        let mut map = serde_json::Map::new();
        for (i, header) in headers.iter().enumerate() {
            let value = record.get(i).unwrap_or("").trim().to_owned();
            map.insert(header.clone(), serde_json::Value::String(value));
        }
        records.push(serde_json::Value::Object(map));
    }

    log::info!("Parsed {} records from CSV at {url}", records.len());

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_keyed_records() {
        let csv = b"Latitude,Longitude,Incident_Ward\n43.7,-79.4,7\n43.6,-79.3,13\n";
        let records = parse_csv(csv, "test").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Latitude"], "43.7");
        assert_eq!(records[1]["Incident_Ward"], "13");
    }

    #[test]
    fn trims_headers_and_values() {
        let csv = b" Latitude , Incident_Ward \n 43.7 , 7 \n";
        let records = parse_csv(csv, "test").unwrap();
        assert_eq!(records[0]["Latitude"], "43.7");
        assert_eq!(records[0]["Incident_Ward"], "7");
    }

    #[test]
    fn pads_short_rows_with_empty_strings() {
        let csv = b"Latitude,Longitude,Incident_Ward\n43.7\n";
        let records = parse_csv(csv, "test").unwrap();
        assert_eq!(records[0]["Longitude"], "");
        assert_eq!(records[0]["Incident_Ward"], "");
    }

    #[test]
    fn errors_on_missing_header_row() {
        assert!(parse_csv(b"", "test").is_err());
    }
}
