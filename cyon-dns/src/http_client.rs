//! Generic HTTP client tools
//!
//! Shared request execution for every panel call: sending, logging, reading the
//! body and classifying transport failures. Callers decide what a non-success
//! status means for their step (authentication, scope switch, plain request).
//!
//! Nothing here retries.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::PanelError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the status code and response text.
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, headers, form body)
    /// * `method_name` - request method name, for logs
    /// * `endpoint` - panel path, for logs
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` whatever the status
    /// * `Err(PanelError::Timeout)` / `Err(PanelError::NetworkError)` when no response arrived
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        endpoint: &str,
    ) -> Result<(u16, String), PanelError> {
        log::debug!("[cyon] {method_name} {endpoint}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                PanelError::Timeout {
                    detail: format!("{method_name} {endpoint}: {e}"),
                }
            } else {
                PanelError::NetworkError {
                    detail: format!("{method_name} {endpoint}: {e}"),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[cyon] Response Status: {status_code}");

        let response_text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                PanelError::Timeout {
                    detail: format!("reading body of {endpoint}: {e}"),
                }
            } else {
                PanelError::NetworkError {
                    detail: format!("Failed to read response body of {endpoint}: {e}"),
                }
            }
        })?;

        log::debug!("[cyon] Response Body: {}", truncate_for_log(&response_text));

        Ok((status_code, response_text))
    }

    /// Returns `HttpStatus` for anything outside 2xx.
    pub fn ensure_success(status: u16, body: &str, endpoint: &str) -> Result<(), PanelError> {
        if is_success(status) {
            Ok(())
        } else {
            log::error!("[cyon] {endpoint} answered HTTP {status}");
            Err(PanelError::HttpStatus {
                endpoint: endpoint.to_string(),
                status,
                body: truncate_for_log(body),
            })
        }
    }

    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(PanelError::ParseFailed)` - parsing failed, reported against `field`
    pub fn parse_json<T>(response_text: &str, field: &str) -> Result<T, PanelError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[cyon] JSON parse failed: {e}");
            log::error!("[cyon] Raw response: {}", truncate_for_log(response_text));
            PanelError::parse(None, field, e.to_string())
        })
    }
}

/// 2xx check shared by every step of the protocol.
pub(crate) fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
