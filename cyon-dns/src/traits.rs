use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DnsRecord, DnsRecordType, NewRecord, RecordTtl};

/// Record operations on one domain's DNS zone.
///
/// Implemented by [`Domain`](crate::Domain). Each operation scopes the panel
/// session to the zone first, so callers never deal with scope switching.
#[async_trait]
pub trait ZoneEditor: Send + Sync {
    /// Domain name this editor acts on.
    fn zone(&self) -> &str;

    /// Lists records, from cache when already loaded.
    async fn list_records(&self) -> Result<Vec<DnsRecord>>;

    /// Creates a record.
    ///
    /// Fails with `ValidationFailed` when a record with the same name exists;
    /// the panel itself does not enforce that.
    async fn create_record(&self, record: &NewRecord) -> Result<()>;

    /// Updates a listed record in place. `record.hash` must come from a listing.
    async fn update_record(&self, record: &DnsRecord) -> Result<()>;

    /// Deletes a listed record. `record.hash` must come from a listing.
    async fn delete_record(&self, record: &DnsRecord) -> Result<()>;

    async fn create_a_record(&self, name: &str, value: &str, ttl: RecordTtl) -> Result<()> {
        self.create_record(&NewRecord::new(DnsRecordType::A, name, value, ttl))
            .await
    }

    async fn create_aaaa_record(&self, name: &str, value: &str, ttl: RecordTtl) -> Result<()> {
        self.create_record(&NewRecord::new(DnsRecordType::Aaaa, name, value, ttl))
            .await
    }

    async fn create_cname_record(&self, name: &str, value: &str, ttl: RecordTtl) -> Result<()> {
        self.create_record(&NewRecord::new(DnsRecordType::Cname, name, value, ttl))
            .await
    }

    async fn create_txt_record(&self, name: &str, value: &str, ttl: RecordTtl) -> Result<()> {
        self.create_record(&NewRecord::new(DnsRecordType::Txt, name, value, ttl))
            .await
    }
}
