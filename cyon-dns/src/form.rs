//! Mutation request builder
//!
//! Form payloads for `add-record-async`, `edit-record-async` and
//! `delete-record-async`. The panel's quirks are reproduced exactly:
//!
//! - CNAME records are sent as `zonePrefix` + `zone`, everything else as a
//!   single fully-qualified `zone` with a trailing dot.
//! - AAAA values are percent-encoded once before form encoding; other values
//!   are not.
//! - The delete form's composite key is spelled `identitfier`, with each pipe
//!   separator percent-encoded on its own.

use crate::error::{PanelError, Result};
use crate::types::{DnsRecord, DnsRecordType, NewRecord, RecordTtl};

/// Ordered `(key, value)` pairs, url-encoded by the HTTP client.
pub(crate) type FormFields = Vec<(&'static str, String)>;

/// Pipe separator of the delete identifier, encoded on its own.
const ENCODED_PIPE: &str = "%7C";

/// Fields shared by create and update.
fn record_fields(
    domain_name: &str,
    record_type: DnsRecordType,
    name: &str,
    value: &str,
    ttl: RecordTtl,
) -> FormFields {
    let mut fields = FormFields::with_capacity(6);

    if record_type == DnsRecordType::Cname {
        fields.push(("zonePrefix", cname_prefix(name, domain_name).to_string()));
        fields.push(("zone", domain_name.to_string()));
    } else {
        fields.push(("zone", with_trailing_dot(name)));
    }

    fields.push(("ttl", ttl.as_secs().to_string()));
    fields.push(("type", record_type.as_str().to_string()));

    let value = if record_type == DnsRecordType::Aaaa {
        urlencoding::encode(value).into_owned()
    } else {
        value.to_string()
    };
    fields.push(("value", value));

    fields
}

/// Part of `name` before the domain name when `name` ends with it; `name`
/// itself otherwise.
pub(crate) fn cname_prefix<'a>(name: &'a str, domain_name: &str) -> &'a str {
    name.strip_suffix(domain_name).unwrap_or(name)
}

/// `name` with exactly the trailing dot it needs.
pub(crate) fn with_trailing_dot(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

pub(crate) fn create_form(domain_name: &str, record: &NewRecord) -> FormFields {
    record_fields(
        domain_name,
        record.record_type,
        &record.name,
        &record.value,
        record.ttl,
    )
}

/// Create fields plus the record's `hash`.
pub(crate) fn update_form(domain_name: &str, record: &DnsRecord) -> Result<FormFields> {
    let hash = require_hash(record)?;
    let mut fields = record_fields(
        domain_name,
        record.record_type,
        &record.name,
        &record.value,
        record.ttl,
    );
    fields.push(("hash", hash.to_string()));
    Ok(fields)
}

/// `hash` plus `identitfier = Type%7CName%7CValue`.
pub(crate) fn delete_form(record: &DnsRecord) -> Result<FormFields> {
    let hash = require_hash(record)?;
    let identifier = [record.record_type.as_str(), &record.name, &record.value].join(ENCODED_PIPE);

    Ok(vec![
        ("hash", urlencoding::encode(hash).into_owned()),
        ("identitfier", identifier),
    ])
}

fn require_hash(record: &DnsRecord) -> Result<&str> {
    record.revision().ok_or_else(|| {
        PanelError::validation(
            "hash",
            format!(
                "record '{}' has no record hash; list the domain's records to obtain one",
                record.name
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(fields: &'a FormFields, key: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    fn listed(record_type: DnsRecordType, name: &str, value: &str) -> DnsRecord {
        DnsRecord {
            name: name.to_string(),
            ttl: RecordTtl::OneHour,
            record_type,
            value: value.to_string(),
            hash: Some("abc123".to_string()),
        }
    }

    #[test]
    fn cname_splits_prefix_and_zone() {
        let record = NewRecord::new(
            DnsRecordType::Cname,
            "www.example.com",
            "target.example.net.",
            RecordTtl::OneHour,
        );
        let fields = create_form("example.com", &record);
        assert_eq!(field(&fields, "zonePrefix"), Some("www."));
        assert_eq!(field(&fields, "zone"), Some("example.com"));
        assert_eq!(field(&fields, "value"), Some("target.example.net."));
    }

    #[test]
    fn cname_foreign_name_used_as_prefix() {
        assert_eq!(cname_prefix("alias", "example.com"), "alias");
        assert_eq!(cname_prefix("www.example.org", "example.com"), "www.example.org");
    }

    #[test]
    fn trailing_dot_added_once() {
        assert_eq!(with_trailing_dot("example.com"), "example.com.");
        assert_eq!(with_trailing_dot("example.com."), "example.com.");

        let record = NewRecord::new(
            DnsRecordType::A,
            "example.com",
            "192.0.2.1",
            RecordTtl::QuarterHour,
        );
        let fields = create_form("example.com", &record);
        assert_eq!(field(&fields, "zone"), Some("example.com."));
        assert_eq!(field(&fields, "zonePrefix"), None);
    }

    #[test]
    fn ttl_and_type_fields() {
        let record = NewRecord::new(DnsRecordType::Txt, "_acme.example.com", "tok", RecordTtl::OneDay);
        let fields = create_form("example.com", &record);
        assert_eq!(field(&fields, "ttl"), Some("86400"));
        assert_eq!(field(&fields, "type"), Some("TXT"));
    }

    #[test]
    fn only_aaaa_values_are_encoded() {
        let v6 = NewRecord::new(DnsRecordType::Aaaa, "v6.example.com", "2001:db8::1", RecordTtl::OneHour);
        assert_eq!(
            field(&create_form("example.com", &v6), "value"),
            Some("2001%3Adb8%3A%3A1")
        );

        let txt = NewRecord::new(DnsRecordType::Txt, "t.example.com", "a b:c", RecordTtl::OneHour);
        assert_eq!(field(&create_form("example.com", &txt), "value"), Some("a b:c"));
    }

    #[test]
    fn update_appends_hash() {
        let res = update_form("example.com", &listed(DnsRecordType::A, "www.example.com.", "192.0.2.9"));
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(fields) = res else {
            return;
        };
        assert_eq!(field(&fields, "hash"), Some("abc123"));
        assert_eq!(field(&fields, "zone"), Some("www.example.com."));
    }

    #[test]
    fn update_without_hash_is_validation_error() {
        let mut record = listed(DnsRecordType::A, "www.example.com.", "192.0.2.9");
        record.hash = None;
        let res = update_form("example.com", &record);
        assert!(
            matches!(&res, Err(PanelError::ValidationFailed { field, .. }) if field == "hash"),
            "unexpected result: {res:?}"
        );

        record.hash = Some(String::new());
        assert!(update_form("example.com", &record).is_err());
    }

    #[test]
    fn delete_identifier_encodes_each_pipe() {
        let res = delete_form(&listed(DnsRecordType::Txt, "example.com.", "v=spf1 -all"));
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(fields) = res else {
            return;
        };
        assert_eq!(field(&fields, "hash"), Some("abc123"));
        assert_eq!(
            field(&fields, "identitfier"),
            Some("TXT%7Cexample.com.%7Cv=spf1 -all")
        );
        assert_eq!(field(&fields, "identifier"), None);
    }

    #[test]
    fn delete_without_hash_is_validation_error() {
        let mut record = listed(DnsRecordType::A, "www.example.com.", "192.0.2.9");
        record.hash = None;
        assert!(matches!(
            delete_form(&record),
            Err(PanelError::ValidationFailed { .. })
        ));
    }
}
