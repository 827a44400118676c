//! CSV payload parsing.

use csv::{ReaderBuilder, StringRecord};

use crate::error_handling::IngestError;
use crate::ip::to_dotted;
use crate::storage::models::IpRangeRecord;

/// Number of columns in a published IpToCountry row.
const SOURCE_COLUMNS: usize = 7;

/// Parses a decompressed IpToCountry payload into range records.
///
/// The payload is ISO-8859-1 text with seven comma-separated, double-quoted
/// columns: `ip_from, ip_to, registry, assigned, ctry, cntry, country`. Lines
/// starting with `#` are comments. Records receive zero-based sequential ids
/// and dotted-quad labels for both bounds.
///
/// Any malformed row fails the whole payload; no partial result is returned.
pub fn parse_dataset(payload: &[u8]) -> Result<Vec<IpRangeRecord>, IngestError> {
    let text = decode_latin1(payload);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    loop {
        let line_hint = reader.position().line();
        match reader.read_record(&mut row) {
            Ok(true) => {}
            Ok(false) => break,
            Err(source) => {
                return Err(IngestError::Csv {
                    line: line_hint,
                    source,
                })
            }
        }

        let line = row.position().map(|p| p.line()).unwrap_or(line_hint);
        let id = records.len() as i64;
        records.push(convert_row(&row, line, id)?);
    }

    log::debug!("Parsed {} range records from dataset", records.len());
    Ok(records)
}

fn convert_row(row: &StringRecord, line: u64, id: i64) -> Result<IpRangeRecord, IngestError> {
    if row.len() != SOURCE_COLUMNS {
        return Err(IngestError::ColumnCount {
            line,
            found: row.len(),
        });
    }

    let ip_from = parse_bound(row, 0, "ip_from", line)?;
    let ip_to = parse_bound(row, 1, "ip_to", line)?;
    if ip_from > ip_to {
        return Err(IngestError::InvertedRange {
            line,
            from: ip_from,
            to: ip_to,
        });
    }

    let field = |index: usize| row.get(index).unwrap_or_default().to_string();
    Ok(IpRangeRecord {
        id,
        ip_from,
        ip_from_str: to_dotted(ip_from),
        ip_to,
        ip_to_str: to_dotted(ip_to),
        registry: field(2),
        assigned: field(3),
        country_code_2: field(4),
        country_code_3: field(5),
        country_name: field(6),
    })
}

fn parse_bound(
    row: &StringRecord,
    index: usize,
    field: &'static str,
    line: u64,
) -> Result<u32, IngestError> {
    let raw = row.get(index).unwrap_or_default();
    raw.trim()
        .parse::<u32>()
        .map_err(|_| IngestError::InvalidNumber {
            line,
            field,
            value: raw.to_string(),
        })
}

/// ISO-8859-1 maps every byte to the Unicode code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
