//! Log sanitization utilities
//!
//! Panel responses embed whole HTML fragments and login forms carry the account
//! password; neither may reach the debug log unabridged.

/// Maximum number of bytes of a response body kept in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Form keys whose values never appear in logs.
const SECRET_KEYS: &[&str] = &["password"];

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Strings within the limit are returned unchanged; longer ones are cut at a
/// char boundary and suffixed with the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Render form fields as `key=value&...` with secrets masked.
pub fn describe_form<K: AsRef<str>, V: AsRef<str>>(fields: &[(K, V)]) -> String {
    let rendered = fields
        .iter()
        .map(|(k, v)| {
            let key = k.as_ref();
            if SECRET_KEYS.contains(&key) {
                format!("{key}=***")
            } else {
                format!("{key}={}", v.as_ref())
            }
        })
        .collect::<Vec<_>>()
        .join("&");
    truncate_for_log(&rendered)
}
