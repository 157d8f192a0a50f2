//! Reading raw records from files and URLs.
//!
//! Supported layouts:
//! - **JSON**: an array of objects, as written by the `convert` command.
//! - **CSV** (has headers): the state export (`Serial Number,List Year,...`)
//!   or the same columns in snake_case.
//!
//! Either may be gzip-compressed (`.json.gz`, `.csv.gz`). The format is chosen
//! from the file name; unknown extensions are read as JSON.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::info;

use crate::error::SourceError;
use crate::record::RawRecord;

/// Where the dashboard data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, everything else a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

/// Pick the format and compression from a file name or URL.
pub fn detect_format(name: &str) -> (SourceFormat, bool) {
    let name = name.split(['?', '#']).next().unwrap_or(name).to_ascii_lowercase();
    let (stem, gzip) = match name.strip_suffix(".gz") {
        Some(stem) => (stem, true),
        None => (name.as_str(), false),
    };
    let format = if stem.ends_with(".csv") {
        SourceFormat::Csv
    } else {
        SourceFormat::Json
    };
    (format, gzip)
}

/// Read every raw record from a local file.
pub fn read_path(path: &Path) -> Result<Vec<RawRecord>, SourceError> {
    let origin = path.display().to_string();
    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        origin: origin.clone(),
        source,
    })?;
    parse_bytes(&bytes, &origin)
}

/// Fetch and parse a remote source.
#[cfg(feature = "api")]
pub async fn fetch_url(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<RawRecord>, SourceError> {
    let fetch_error = |e: reqwest::Error| SourceError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    };
    let response = client
        .get(url)
        .send()
        .await
        .map_err(fetch_error)?
        .error_for_status()
        .map_err(fetch_error)?;
    let bytes = response.bytes().await.map_err(fetch_error)?;
    parse_bytes(&bytes, url)
}

/// Decode a source body whose layout is implied by `origin`.
pub fn parse_bytes(bytes: &[u8], origin: &str) -> Result<Vec<RawRecord>, SourceError> {
    let (format, gzip) = detect_format(origin);
    let body: Cow<'_, [u8]> = if gzip {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut decoded)
            .map_err(|source| SourceError::Io {
                origin: origin.to_string(),
                source,
            })?;
        Cow::Owned(decoded)
    } else {
        Cow::Borrowed(bytes)
    };

    let records = match format {
        SourceFormat::Json => parse_json(&body, origin)?,
        SourceFormat::Csv => parse_csv(&body, origin)?,
    };
    info!("Read {} raw records from {}", records.len(), origin);
    Ok(records)
}

/// Parse a JSON array of records. `null`, `[]` and blank input are all empty.
pub fn parse_json(bytes: &[u8], origin: &str) -> Result<Vec<RawRecord>, SourceError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(empty(origin));
    }
    let parsed: Option<Vec<RawRecord>> =
        serde_json::from_slice(bytes).map_err(|e| SourceError::Malformed {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
    match parsed {
        Some(records) if !records.is_empty() => Ok(records),
        _ => Err(empty(origin)),
    }
}

/// Parse CSV with a header row.
pub fn parse_csv(bytes: &[u8], origin: &str) -> Result<Vec<RawRecord>, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut records = Vec::new();
    for result in rdr.deserialize::<RawRecord>() {
        let record = result.map_err(|e| SourceError::Malformed {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    if records.is_empty() {
        return Err(empty(origin));
    }
    Ok(records)
}

fn empty(origin: &str) -> SourceError {
    SourceError::Empty {
        origin: origin.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RawField, SerialNumber};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const EXPORT_CSV: &str = "\
Serial Number,List Year,Date Recorded,Town,Address,Assessed Value,Sale Amount,Sales Ratio,Property Type
200500,2020,04/14/2021,Avon,12 OAK LN,100000,120000,0.83,Residential
200501,2020,04/15/2021,Avon,14 OAK LN,,280000,,Residential
";

    #[test]
    fn detects_format_from_name() {
        assert_eq!(detect_format("sales.json"), (SourceFormat::Json, false));
        assert_eq!(detect_format("sales.CSV"), (SourceFormat::Csv, false));
        assert_eq!(detect_format("sales.csv.gz"), (SourceFormat::Csv, true));
        assert_eq!(
            detect_format("https://host/data.json.gz?v=2"),
            (SourceFormat::Json, true)
        );
        assert_eq!(detect_format("test2"), (SourceFormat::Json, false));
    }

    #[test]
    fn data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.org/a.json"),
            DataSource::Url("https://example.org/a.json".to_string())
        );
        assert_eq!(
            DataSource::parse("data/a.json"),
            DataSource::File(PathBuf::from("data/a.json"))
        );
    }

    #[test]
    fn json_array_parses() {
        let body = br#"[{"serial_number": 1, "assessed_value": 5, "sale_amount": "6"}]"#;
        let records = parse_json(body, "a.json").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sale_amount, Some(RawField::Text("6".to_string())));
    }

    #[test]
    fn empty_json_sources_are_empty_errors() {
        for body in [&b""[..], b"  \n", b"null", b"[]"] {
            let err = parse_json(body, "a.json").unwrap_err();
            assert!(matches!(err, SourceError::Empty { .. }), "{:?}", err);
        }
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = parse_json(b"{\"not\": \"an array\"}", "a.json").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }

    #[test]
    fn export_csv_parses_with_state_headers() {
        let records = parse_csv(EXPORT_CSV.as_bytes(), "a.csv").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].serial_number, Some(SerialNumber::Number(200500)));
        assert_eq!(records[0].town.as_deref(), Some("Avon"));
        assert_eq!(records[0].property_type.as_deref(), Some("Residential"));
        assert_eq!(records[0].assessed_value, Some(RawField::Number(100000.0)));
        assert_eq!(records[1].assessed_value, None);
    }

    #[test]
    fn header_only_csv_is_empty() {
        let err = parse_csv(b"Serial Number,Town\n", "a.csv").unwrap_err();
        assert!(matches!(err, SourceError::Empty { .. }));
    }

    #[test]
    fn gzip_bodies_are_decoded() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(EXPORT_CSV.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        let records = parse_bytes(&compressed, "sales.csv.gz").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
