//! Domain handle and its record repository

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{PanelError, Result};
use crate::form::{FormFields, create_form, delete_form, update_form};
use crate::outcome::evaluate;
use crate::parser::RecordParser;
use crate::session::{
    RECORD_CREATE_PATH, RECORD_DELETE_PATH, RECORD_LIST_PATH, RECORD_UPDATE_PATH, Session,
};
use crate::traits::ZoneEditor;
use crate::types::{DnsRecord, MutationKind, NewRecord};

/// A domain of the account, with a lazily loaded record cache.
///
/// Obtained from [`CyonClient::list_domains`](crate::CyonClient::list_domains)
/// or [`CyonClient::domain`](crate::CyonClient::domain); the client hands out
/// one shared instance per name. The handle does not keep the session alive:
/// once the client is dropped, operations fail with `SessionClosed`.
///
/// Lock order is cache first, then session.
pub struct Domain {
    name: String,
    session: Weak<Session>,
    parser: Arc<dyn RecordParser>,
    /// `None` = not loaded.
    records: Mutex<Option<Vec<DnsRecord>>>,
}

impl std::fmt::Debug for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Domain").field("name", &self.name).finish_non_exhaustive()
    }
}

impl Domain {
    pub(crate) fn new(name: String, session: Weak<Session>, parser: Arc<dyn RecordParser>) -> Self {
        Self {
            name,
            session,
            parser,
            records: Mutex::new(None),
        }
    }

    /// Domain name, e.g. `"example.com"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drops the cached records; the next read fetches them again.
    pub async fn invalidate(&self) {
        *self.records.lock().await = None;
    }

    /// Whether records are currently cached.
    pub async fn is_loaded(&self) -> bool {
        self.records.lock().await.is_some()
    }

    /// First record named `name`, loading the listing if necessary.
    pub async fn find_record(&self, name: &str) -> Result<Option<DnsRecord>> {
        let mut cache = self.records.lock().await;
        let records = self.loaded(&mut cache).await?;
        Ok(records.iter().find(|r| r.name == name).cloned())
    }

    /// All records named `name`, in listing order.
    pub async fn records_named(&self, name: &str) -> Result<Vec<DnsRecord>> {
        let mut cache = self.records.lock().await;
        let records = self.loaded(&mut cache).await?;
        Ok(records.iter().filter(|r| r.name == name).cloned().collect())
    }

    fn session(&self) -> Result<Arc<Session>> {
        self.session.upgrade().ok_or_else(|| PanelError::SessionClosed {
            domain: self.name.clone(),
        })
    }

    /// Cached records, fetched under the caller's cache lock when absent.
    async fn loaded<'c>(&self, cache: &'c mut Option<Vec<DnsRecord>>) -> Result<&'c [DnsRecord]> {
        if cache.is_none() {
            *cache = Some(self.fetch().await?);
        }
        Ok(cache.as_deref().unwrap_or_default())
    }

    async fn fetch(&self) -> Result<Vec<DnsRecord>> {
        let session = self.session()?;
        let body = {
            let guard = session.scoped(&self.name).await?;
            guard.get(RECORD_LIST_PATH).await?
        };
        let records = self.parser.parse_records(&body)?;
        log::info!("[cyon] Loaded {} record(s) for {}", records.len(), self.name);
        Ok(records)
    }

    /// Scoped POST + outcome evaluation.
    ///
    /// The cache is dropped before the POST goes out and put back only when the
    /// panel definitely refused the change. A transport failure, an undecodable
    /// answer or a cancelled future leaves it unloaded, since the change may
    /// have landed.
    async fn mutate(
        &self,
        cache: &mut Option<Vec<DnsRecord>>,
        kind: MutationKind,
        path: &str,
        fields: &FormFields,
    ) -> Result<()> {
        let session = self.session()?;
        let previous = cache.take();

        let (status, body) = {
            let guard = match session.scoped(&self.name).await {
                Ok(guard) => guard,
                Err(e @ PanelError::ScopeSwitchFailed { .. }) => {
                    *cache = previous;
                    return Err(e);
                }
                Err(e) => return Err(e),
            };
            guard.post_form(path, fields).await?
        };

        match evaluate(kind, path, status, &body) {
            Ok(()) => {
                log::info!("[cyon] {kind} on {} accepted, record cache invalidated", self.name);
                Ok(())
            }
            Err(e @ PanelError::RemoteRejected { .. }) => {
                *cache = previous;
                Err(e)
            }
            Err(e) => {
                log::warn!("[cyon] {kind} on {} has an unknown outcome, record cache invalidated", self.name);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ZoneEditor for Domain {
    fn zone(&self) -> &str {
        &self.name
    }

    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        let mut cache = self.records.lock().await;
        Ok(self.loaded(&mut cache).await?.to_vec())
    }

    async fn create_record(&self, record: &NewRecord) -> Result<()> {
        let mut cache = self.records.lock().await;
        if self.loaded(&mut cache).await?.iter().any(|r| r.name == record.name) {
            return Err(PanelError::validation(
                "name",
                format!(
                    "a record named '{}' already exists in {}",
                    record.name, self.name
                ),
            ));
        }

        let fields = create_form(&self.name, record);
        self.mutate(&mut cache, MutationKind::Create, RECORD_CREATE_PATH, &fields)
            .await
    }

    async fn update_record(&self, record: &DnsRecord) -> Result<()> {
        let fields = update_form(&self.name, record)?;
        let mut cache = self.records.lock().await;
        self.mutate(&mut cache, MutationKind::Update, RECORD_UPDATE_PATH, &fields)
            .await
    }

    async fn delete_record(&self, record: &DnsRecord) -> Result<()> {
        let fields = delete_form(record)?;
        let mut cache = self.records.lock().await;
        self.mutate(&mut cache, MutationKind::Delete, RECORD_DELETE_PATH, &fields)
            .await
    }
}
