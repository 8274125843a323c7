use serde::{Deserialize, Serialize};

// ============ DNS Record Types ============

/// DNS record types the panel's DNS editor can hold.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.), which is
/// also the spelling the panel uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Service locator record.
    Srv,
}

impl DnsRecordType {
    /// Uppercase wire name (`"AAAA"`, `"CNAME"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Srv => "SRV",
        }
    }

    /// Case-sensitive lookup of a panel type label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "A" => Some(Self::A),
            "AAAA" => Some(Self::Aaaa),
            "CNAME" => Some(Self::Cname),
            "MX" => Some(Self::Mx),
            "TXT" => Some(Self::Txt),
            "SRV" => Some(Self::Srv),
            _ => None,
        }
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ TTL ============

/// The fixed set of TTLs offered by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum RecordTtl {
    /// 900 seconds ("15 Minuten").
    QuarterHour,
    /// 3600 seconds ("1 Stunde").
    #[default]
    OneHour,
    /// 14400 seconds ("4 Stunden").
    FourHours,
    /// 86400 seconds ("24 Stunden").
    OneDay,
}

impl RecordTtl {
    /// TTL in seconds, as sent in the `ttl` form field.
    pub fn as_secs(self) -> u32 {
        match self {
            Self::QuarterHour => 900,
            Self::OneHour => 3600,
            Self::FourHours => 14_400,
            Self::OneDay => 86_400,
        }
    }

    /// Maps the panel's German TTL label to a TTL.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "15 Minuten" => Some(Self::QuarterHour),
            "1 Stunde" => Some(Self::OneHour),
            "4 Stunden" => Some(Self::FourHours),
            "24 Stunden" => Some(Self::OneDay),
            _ => None,
        }
    }
}

impl From<RecordTtl> for u32 {
    fn from(ttl: RecordTtl) -> Self {
        ttl.as_secs()
    }
}

impl TryFrom<u32> for RecordTtl {
    type Error = String;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        match secs {
            900 => Ok(Self::QuarterHour),
            3600 => Ok(Self::OneHour),
            14_400 => Ok(Self::FourHours),
            86_400 => Ok(Self::OneDay),
            other => Err(format!(
                "unsupported TTL {other}s (expected 900, 3600, 14400 or 86400)"
            )),
        }
    }
}

// ============ Records ============

/// A DNS record as listed by the panel.
///
/// `hash` identifies one specific remote revision of the record. It is only
/// obtainable by listing, and the panel refuses updates and deletes carrying a
/// hash that no longer matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Fully qualified record name as shown in the editor.
    pub name: String,
    /// Time to live.
    pub ttl: RecordTtl,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Record value.
    pub value: String,
    /// Provider-issued revision token. `None` for records built locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl DnsRecord {
    /// Returns the record hash, or `None` when it is missing or empty.
    pub fn revision(&self) -> Option<&str> {
        self.hash.as_deref().filter(|h| !h.is_empty())
    }
}

/// A record to be created. It has no hash yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    /// Record name.
    pub name: String,
    /// Time to live.
    pub ttl: RecordTtl,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Record value.
    pub value: String,
}

impl NewRecord {
    /// Convenience constructor.
    pub fn new(
        record_type: DnsRecordType,
        name: impl Into<String>,
        value: impl Into<String>,
        ttl: RecordTtl,
    ) -> Self {
        Self {
            name: name.into(),
            ttl,
            record_type,
            value: value.into(),
        }
    }
}

// ============ Mutations ============

/// The three record mutations the DNS editor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    /// `add-record-async`
    Create,
    /// `edit-record-async`
    Update,
    /// `delete-record-async`
    Delete,
}

impl MutationKind {
    /// Generic failure message used when the panel gives no reason.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Create => "Could not create new DNS Record.",
            Self::Update => "Could not update DNS Record.",
            Self::Delete => "Could not delete DNS Record.",
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}
