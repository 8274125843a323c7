//! Session manager
//!
//! Owns the cookie-bearing HTTP client, the credentials and the mutable session
//! state (authenticated flag + active-domain marker). The state sits behind an
//! async mutex; every panel request is issued through a [`SessionGuard`], so a
//! scope switch and the call that depends on it can never interleave with
//! another task's requests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::cookie::{CookieStore, Jar};
use tokio::sync::{Mutex, MutexGuard};

use crate::config::ClientConfig;
use crate::error::{AuthStage, PanelError, Result};
use crate::http_client::{HttpUtils, is_success};
use crate::utils::log_sanitizer::{describe_form, truncate_for_log};

pub(crate) const LOGIN_PATH: &str = "/auth/index/dologin-async";
pub(crate) const VALIDATE_PATH: &str = "/";
pub(crate) const DOMAIN_LIST_PATH: &str = "/domain/manage/list-async";
pub(crate) const DNS_EDITOR_PATH: &str = "/domain/dnseditor";
pub(crate) const RECORD_LIST_PATH: &str = "/domain/dnseditor/list-async";
pub(crate) const RECORD_CREATE_PATH: &str = "/domain/dnseditor/add-record-async";
pub(crate) const RECORD_UPDATE_PATH: &str = "/domain/dnseditor/edit-record-async";
pub(crate) const RECORD_DELETE_PATH: &str = "/domain/dnseditor/delete-record-async";

/// Account name plus panel login.
#[derive(Clone)]
pub(crate) struct Credentials {
    pub account: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Session-wide mutable state. Only reachable through the session mutex.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub authenticated: bool,
    /// Domain the remote session is currently scoped to.
    pub active_domain: Option<String>,
}

pub(crate) struct Session {
    pub(crate) config: ClientConfig,
    pub(crate) client: Client,
    jar: Arc<Jar>,
    credentials: Credentials,
    state: Mutex<SessionState>,
}

impl Session {
    pub(crate) fn new(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        let mut builder = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout());
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        let client = builder.build().map_err(|e| PanelError::NetworkError {
            detail: format!("Failed to create HTTP client: {e}"),
        })?;

        Ok(Self {
            config,
            client,
            jar,
            credentials,
            state: Mutex::new(SessionState::default()),
        })
    }

    pub(crate) fn account(&self) -> &str {
        &self.credentials.account
    }

    pub(crate) async fn snapshot(&self) -> (bool, Option<String>) {
        let state = self.state.lock().await;
        (state.authenticated, state.active_domain.clone())
    }

    /// Locks the session and logs in if that has not happened yet.
    pub(crate) async fn authenticated(&self) -> Result<SessionGuard<'_>> {
        let mut state = self.state.lock().await;
        self.ensure_authenticated(&mut state).await?;
        Ok(SessionGuard {
            session: self,
            _state: state,
        })
    }

    /// Locks the session, logs in if needed and scopes it to `domain`.
    ///
    /// The returned guard keeps the scope pinned until it is dropped.
    pub(crate) async fn scoped(&self, domain: &str) -> Result<SessionGuard<'_>> {
        let mut state = self.state.lock().await;
        self.ensure_authenticated(&mut state).await?;
        self.ensure_scoped(&mut state, domain).await?;
        Ok(SessionGuard {
            session: self,
            _state: state,
        })
    }

    /// Two-step login: the auth subsystem first, then the root app, both with
    /// the same form. Runs at most once per session; failures are not retried.
    async fn ensure_authenticated(&self, state: &mut SessionState) -> Result<()> {
        if state.authenticated {
            return Ok(());
        }

        let form = [
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("pathname", "/"),
        ];
        log::info!(
            "[cyon] Logging in as '{}' (account '{}')",
            self.credentials.username,
            self.credentials.account
        );
        log::debug!("[cyon] Login form: {}", describe_form(&form));

        for (stage, path) in [
            (AuthStage::Login, LOGIN_PATH),
            (AuthStage::Validate, VALIDATE_PATH),
        ] {
            let request = self.client.post(self.config.url(path)).form(&form[..]);
            let (status, body) = HttpUtils::execute_request(request, "POST", path).await?;
            if !is_success(status) {
                log::error!("[cyon] {stage} rejected with HTTP {status}");
                return Err(PanelError::AuthenticationFailed {
                    stage,
                    status,
                    detail: truncate_for_log(&body),
                });
            }
        }

        let has_cookie = self
            .config
            .url(VALIDATE_PATH)
            .parse::<reqwest::Url>()
            .ok()
            .and_then(|url| self.jar.cookies(&url))
            .is_some();
        log::info!("[cyon] Session established (cookie present: {has_cookie})");

        state.authenticated = true;
        Ok(())
    }
}

/// Exclusive access to the session for the duration of one operation.
pub(crate) struct SessionGuard<'a> {
    session: &'a Session,
    _state: MutexGuard<'a, SessionState>,
}

impl SessionGuard<'_> {
    /// GET a panel path and return the body of a 2xx response.
    pub(crate) async fn get(&self, path: &str) -> Result<String> {
        let request = self.session.client.get(self.session.config.url(path));
        let (status, body) = HttpUtils::execute_request(request, "GET", path).await?;
        HttpUtils::ensure_success(status, &body, path)?;
        Ok(body)
    }

    /// POST a url-encoded form; the status is handed back for the caller to judge.
    pub(crate) async fn post_form(
        &self,
        path: &str,
        fields: &[(&'static str, String)],
    ) -> Result<(u16, String)> {
        log::debug!("[cyon] Form: {}", describe_form(fields));
        let request = self
            .session
            .client
            .post(self.session.config.url(path))
            .form(fields);
        HttpUtils::execute_request(request, "POST", path).await
    }
}

/// Runs `operation` under a caller-supplied deadline.
///
/// On expiry the operation is dropped mid-flight and `Timeout` is returned. A
/// scope switch interrupted this way leaves the active-domain marker cleared, so
/// the next operation switches again instead of trusting an unknown scope.
pub async fn with_deadline<T, F>(deadline: Duration, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if let Ok(result) = tokio::time::timeout(deadline, operation).await {
        result
    } else {
        log::warn!(
            "[cyon] Operation exceeded deadline of {:.1}s",
            deadline.as_secs_f32()
        );
        Err(PanelError::Timeout {
            detail: format!(
                "operation exceeded deadline of {:.1}s",
                deadline.as_secs_f32()
            ),
        })
    }
}
