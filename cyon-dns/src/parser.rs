//! Response parser
//!
//! The panel's list endpoints answer with a JSON object whose first property
//! holds an array of positional rows. Cells are plain strings or HTML fragments
//! produced for the panel's own table widget:
//!
//! | index | content                                  |
//! |-------|------------------------------------------|
//! | 0     | record name                              |
//! | 1     | localized TTL label (`"1 Stunde"`)       |
//! | 2     | `<span ...>TYPE ...</span>`              |
//! | 3     | record value                             |
//! | 4     | action markup containing `.../hash/<h>"` |
//!
//! Everything else in the crate only sees [`DnsRecord`]; swapping the parsing
//! strategy means implementing [`RecordParser`].

use serde_json::Value;

use crate::error::{PanelError, Result};
use crate::http_client::HttpUtils;
use crate::types::{DnsRecord, DnsRecordType, RecordTtl};

const COL_NAME: usize = 0;
const COL_TTL: usize = 1;
const COL_TYPE: usize = 2;
const COL_VALUE: usize = 3;
const COL_ACTIONS: usize = 4;

const HASH_MARKER: &str = "hash/";

/// Turns a record-listing response body into typed records.
pub trait RecordParser: Send + Sync {
    /// Parses the body of `GET /domain/dnseditor/list-async`.
    fn parse_records(&self, body: &str) -> Result<Vec<DnsRecord>>;
}

/// What to do with a TTL label outside the known vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtlPolicy {
    /// Fail the listing with `ParseFailed` on the `ttl` field.
    #[default]
    Strict,
    /// Log a warning and use [`RecordTtl::default()`].
    Lenient,
}

/// Parser for the panel's current listing format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingParser {
    ttl_policy: TtlPolicy,
}

impl ListingParser {
    pub fn new(ttl_policy: TtlPolicy) -> Self {
        Self { ttl_policy }
    }

    fn parse_row(&self, index: usize, row: &Value) -> Result<DnsRecord> {
        let cells = row
            .as_array()
            .ok_or_else(|| PanelError::parse(Some(index), "row", "row is not an array"))?;
        if cells.len() <= COL_ACTIONS {
            return Err(PanelError::parse(
                Some(index),
                "row",
                format!("expected at least 5 cells, got {}", cells.len()),
            ));
        }

        let name = text_cell(cells, index, COL_NAME, "name")?;
        let ttl_label = text_cell(cells, index, COL_TTL, "ttl")?;
        let type_markup = text_cell(cells, index, COL_TYPE, "type")?;
        let value = text_cell(cells, index, COL_VALUE, "value")?;
        let actions = text_cell(cells, index, COL_ACTIONS, "hash")?;

        let ttl = match RecordTtl::from_label(&ttl_label) {
            Some(ttl) => ttl,
            None => match self.ttl_policy {
                TtlPolicy::Strict => {
                    return Err(PanelError::parse(
                        Some(index),
                        "ttl",
                        format!("unknown TTL label '{ttl_label}'"),
                    ));
                }
                TtlPolicy::Lenient => {
                    log::warn!(
                        "[cyon] Row {index}: unknown TTL label '{ttl_label}', using {}s",
                        RecordTtl::default().as_secs()
                    );
                    RecordTtl::default()
                }
            },
        };

        let record_type = parse_type_label(&type_markup)
            .map_err(|detail| PanelError::parse(Some(index), "type", detail))?;
        let hash = extract_hash(&actions)
            .map_err(|detail| PanelError::parse(Some(index), "hash", detail))?;

        Ok(DnsRecord {
            name,
            ttl,
            record_type,
            value,
            hash: Some(hash),
        })
    }
}

impl RecordParser for ListingParser {
    fn parse_records(&self, body: &str) -> Result<Vec<DnsRecord>> {
        let rows = envelope_rows(body)?;
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.parse_row(i, row))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("[cyon] Parsed {} record(s)", records.len());
        Ok(records)
    }
}

/// Parses the body of `GET /domain/manage/list-async` into domain names.
///
/// The first cell carries the name, optionally followed by a space and status
/// markup that is cut off.
pub fn parse_domain_names(body: &str) -> Result<Vec<String>> {
    envelope_rows(body)?
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = row
                .as_array()
                .ok_or_else(|| PanelError::parse(Some(i), "row", "row is not an array"))?;
            let raw = text_cell(cells, i, COL_NAME, "name")?;
            let name = raw.split(' ').next().unwrap_or_default().to_string();
            if name.is_empty() {
                return Err(PanelError::parse(Some(i), "name", "empty domain name"));
            }
            Ok(name)
        })
        .collect()
}

/// Rows of the envelope's first property. A missing or `null` property is an
/// empty listing; anything other than an array is not.
fn envelope_rows(body: &str) -> Result<Vec<Value>> {
    let envelope: Value = HttpUtils::parse_json(body, "envelope")?;
    let object = envelope
        .as_object()
        .ok_or_else(|| PanelError::parse(None, "envelope", "top level is not a JSON object"))?;

    match object.values().next() {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => Ok(rows.clone()),
        Some(other) => Err(PanelError::parse(
            None,
            "envelope",
            format!("first property is not an array: {other}"),
        )),
    }
}

fn text_cell(cells: &[Value], row: usize, column: usize, field: &str) -> Result<String> {
    match cells.get(column) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(PanelError::parse(
            Some(row),
            field,
            format!("expected a string, got {other}"),
        )),
        None => Err(PanelError::parse(Some(row), field, "cell is missing")),
    }
}

/// Text between the first `>` and the following `</`, cut at the first space,
/// matched case-sensitively.
fn parse_type_label(markup: &str) -> std::result::Result<DnsRecordType, String> {
    let start = markup
        .find('>')
        .map(|i| i + 1)
        .ok_or_else(|| format!("no '>' in type markup '{markup}'"))?;
    let len = markup[start..]
        .find("</")
        .ok_or_else(|| format!("no closing tag in type markup '{markup}'"))?;
    let text = &markup[start..start + len];
    let label = text.split(' ').next().unwrap_or_default();

    DnsRecordType::from_label(label).ok_or_else(|| format!("unrecognized record type '{label}'"))
}

/// Value following the literal `hash/` up to the next `"`.
fn extract_hash(markup: &str) -> std::result::Result<String, String> {
    let start = markup
        .find(HASH_MARKER)
        .map(|i| i + HASH_MARKER.len())
        .ok_or_else(|| format!("no '{HASH_MARKER}' in action markup"))?;
    let rest = &markup[start..];
    let end = rest
        .find('"')
        .ok_or_else(|| "record hash is not terminated by '\"'".to_string())?;
    let hash = &rest[..end];
    if hash.is_empty() {
        return Err("record hash is empty".to_string());
    }
    Ok(hash.to_string())
}
