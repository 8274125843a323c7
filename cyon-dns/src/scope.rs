//! Domain context switcher
//!
//! The panel session is scoped to one domain at a time on the server side. The
//! DNS editor endpoints act on whichever domain was selected last, so every
//! listing and mutation is preceded by [`Session::ensure_scoped`].

use crate::error::{PanelError, Result};
use crate::http_client::{HttpUtils, is_success};
use crate::session::{DNS_EDITOR_PATH, Session, SessionState};
use crate::utils::log_sanitizer::truncate_for_log;

/// `/user/environment/setdomain/d/{domain}/gik/account%3A{account}`
pub(crate) fn scope_switch_path(domain: &str, account: &str) -> String {
    format!(
        "/user/environment/setdomain/d/{}/gik/account%3A{}",
        urlencoding::encode(domain),
        urlencoding::encode(account)
    )
}

impl Session {
    /// Makes the remote session point at `domain`.
    ///
    /// No request is sent when the marker already names `domain`. The marker is
    /// written only after a 2xx answer. A non-success status restores the previous
    /// marker and fails with `ScopeSwitchFailed`; a transport failure (or a dropped
    /// future) leaves it cleared, since the switch may or may not have landed.
    pub(crate) async fn ensure_scoped(&self, state: &mut SessionState, domain: &str) -> Result<()> {
        if state.active_domain.as_deref() == Some(domain) {
            return Ok(());
        }

        let path = scope_switch_path(domain, self.account());
        let request = self
            .client
            .get(self.config.url(&path))
            .header(reqwest::header::REFERER, self.config.url(DNS_EDITOR_PATH));

        let previous = state.active_domain.take();
        log::info!(
            "[cyon] Switching panel scope {} -> {domain}",
            previous.as_deref().unwrap_or("<none>")
        );

        let (status, body) = HttpUtils::execute_request(request, "GET", &path).await?;
        if !is_success(status) {
            log::error!("[cyon] Scope switch to {domain} failed with HTTP {status}");
            state.active_domain = previous;
            return Err(PanelError::ScopeSwitchFailed {
                domain: domain.to_string(),
                status,
                detail: truncate_for_log(&body),
            });
        }

        state.active_domain = Some(domain.to_string());
        Ok(())
    }
}
