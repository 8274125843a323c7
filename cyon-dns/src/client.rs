//! Panel client: the entry point owning the session and the domain registry

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::domain::Domain;
use crate::error::{PanelError, Result};
use crate::parser::{ListingParser, RecordParser, TtlPolicy, parse_domain_names};
use crate::session::{Credentials, DOMAIN_LIST_PATH, Session};

/// Client for one cyon.ch account.
///
/// Nothing touches the network until the first operation: the session logs in
/// lazily and keeps its cookie for the client's lifetime. All operations of a
/// client (and of the [`Domain`]s it hands out) run one at a time against the
/// panel.
pub struct CyonClient {
    session: Arc<Session>,
    parser: Arc<dyn RecordParser>,
    domains: Mutex<HashMap<String, Arc<Domain>>>,
}

impl std::fmt::Debug for CyonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CyonClient")
            .field("account", &self.session.account())
            .field("base_url", &self.session.config.base_url)
            .finish_non_exhaustive()
    }
}

impl CyonClient {
    /// Client against the production panel with default settings.
    pub fn new(
        account: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(account, username, password).build()
    }

    pub fn builder(
        account: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> CyonClientBuilder {
        CyonClientBuilder {
            credentials: Credentials {
                account: account.into(),
                username: username.into(),
                password: password.into(),
            },
            config: ClientConfig::default(),
            parser: None,
        }
    }

    pub fn account_name(&self) -> &str {
        self.session.account()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.session.config
    }

    /// Logs in now instead of on first use. A no-op once authenticated.
    pub async fn authenticate(&self) -> Result<()> {
        self.session.authenticated().await.map(drop)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.snapshot().await.0
    }

    /// Domain the remote session is currently scoped to, if known.
    pub async fn active_domain(&self) -> Option<String> {
        self.session.snapshot().await.1
    }

    /// All domains of the account, in panel order.
    ///
    /// Every call fetches the list again; handles for names seen before are
    /// reused, so their record caches survive.
    pub async fn list_domains(&self) -> Result<Vec<Arc<Domain>>> {
        let body = {
            let guard = self.session.authenticated().await?;
            guard.get(DOMAIN_LIST_PATH).await?
        };
        let names = parse_domain_names(&body)?;
        log::info!(
            "[cyon] Account '{}' has {} domain(s)",
            self.account_name(),
            names.len()
        );

        let mut registry = self.domains.lock().await;
        Ok(names
            .into_iter()
            .map(|name| self.register(&mut registry, name))
            .collect())
    }

    /// Handle for `name` without listing the account's domains.
    ///
    /// The panel is not asked whether the domain exists; an unknown name
    /// surfaces as a failed scope switch on first use.
    pub async fn domain(&self, name: &str) -> Result<Arc<Domain>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PanelError::validation("domain", "domain name is empty"));
        }
        let mut registry = self.domains.lock().await;
        Ok(self.register(&mut registry, name.to_string()))
    }

    fn register(&self, registry: &mut HashMap<String, Arc<Domain>>, name: String) -> Arc<Domain> {
        Arc::clone(registry.entry(name).or_insert_with_key(|name| {
            Arc::new(Domain::new(
                name.clone(),
                Arc::downgrade(&self.session),
                Arc::clone(&self.parser),
            ))
        }))
    }
}

/// Builder for [`CyonClient`].
#[must_use]
pub struct CyonClientBuilder {
    credentials: Credentials,
    config: ClientConfig,
    parser: Option<Arc<dyn RecordParser>>,
}

impl std::fmt::Debug for CyonClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CyonClientBuilder")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .field("custom_parser", &self.parser.is_some())
            .finish()
    }
}

impl CyonClientBuilder {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Panel root, e.g. a mock server in tests.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Uses the built-in listing parser with `policy` for unknown TTL labels.
    pub fn ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.parser = Some(Arc::new(ListingParser::new(policy)));
        self
    }

    /// Swaps in a custom record parser.
    pub fn parser(mut self, parser: Arc<dyn RecordParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn build(self) -> Result<CyonClient> {
        let Credentials {
            account,
            username,
            password,
        } = &self.credentials;
        for (field, value) in [
            ("account", account),
            ("username", username),
            ("password", password),
        ] {
            if value.trim().is_empty() {
                return Err(PanelError::validation(field, "must not be empty"));
            }
        }

        let config = self.config.validated()?;
        let session = Session::new(config, self.credentials)?;
        let parser = self
            .parser
            .unwrap_or_else(|| Arc::new(ListingParser::default()));

        Ok(CyonClient {
            session: Arc::new(session),
            parser,
            domains: Mutex::new(HashMap::new()),
        })
    }
}
