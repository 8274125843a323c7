//! # cyon-dns
//!
//! DNS record management for domains hosted at [cyon.ch](https://www.cyon.ch/),
//! driven through the customer control panel (`my.cyon.ch`).
//!
//! The panel has no public API. This crate logs in like a browser, keeps the
//! session cookie, and talks to the same asynchronous endpoints the panel's DNS
//! editor uses. Responses are JSON envelopes wrapping HTML fragments and
//! positional arrays; all of that is turned into [`DnsRecord`] values.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation and static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cyon_dns::{CyonClient, RecordTtl, ZoneEditor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CyonClient::new("my-account", "user@example.com", "secret")?;
//!
//!     // 1. List domains (logs in on first use)
//!     let domains = client.list_domains().await?;
//!     let domain = &domains[0];
//!
//!     // 2. List records
//!     for record in domain.list_records().await? {
//!         println!("{} {} {} -> {}", record.name, record.ttl.as_secs(), record.record_type, record.value);
//!     }
//!
//!     // 3. Create, then update through the listed record
//!     let name = "_acme-challenge.example.com";
//!     domain.create_txt_record(name, "token", RecordTtl::QuarterHour).await?;
//!     if let Some(mut record) = domain.find_record(name).await? {
//!         record.value = "other-token".to_string();
//!         domain.update_record(&record).await?;
//!     }
//!
//!     // 4. Delete; the update changed the record's hash, so look it up again
//!     if let Some(record) = domain.find_record(name).await? {
//!         domain.delete_record(&record).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Sessions and Scope
//!
//! The panel remembers which domain the DNS editor currently works on. Every
//! domain operation switches that scope first when needed, and holds the
//! session for the duration of the switch plus the dependent request. A
//! [`CyonClient`] can be shared between tasks; its operations are serialized.
//!
//! Update and delete address a record by the `hash` the panel assigns to it,
//! which is only known from a listing. Listings are cached per domain and
//! dropped whenever a mutation may have changed the zone: after every accepted
//! mutation, and after one whose outcome is unknown (timeout, transport error).
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, PanelError>`](PanelError):
//!
//! - [`PanelError::AuthenticationFailed`] — login or session validation rejected
//! - [`PanelError::ScopeSwitchFailed`] — the panel refused to switch domains
//! - [`PanelError::ParseFailed`] — a response did not have the expected shape
//! - [`PanelError::ValidationFailed`] — rejected locally, nothing was sent
//! - [`PanelError::RemoteRejected`] — the panel refused a mutation
//!
//! Nothing is retried. Wrap calls in [`with_deadline`] to bound their total
//! duration.

mod client;
mod config;
mod domain;
mod error;
mod form;
mod http_client;
mod outcome;
mod parser;
mod scope;
mod session;
mod traits;
mod types;
mod utils;

pub use client::{CyonClient, CyonClientBuilder};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_CONNECT_TIMEOUT, ENV_REQUEST_TIMEOUT,
};
pub use domain::Domain;
pub use error::{AuthStage, PanelError, Result};
pub use parser::{ListingParser, RecordParser, TtlPolicy, parse_domain_names};
pub use session::with_deadline;
pub use traits::ZoneEditor;
pub use types::{DnsRecord, DnsRecordType, MutationKind, NewRecord, RecordTtl};
