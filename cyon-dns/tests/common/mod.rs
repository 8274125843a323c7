//! Shared test tools and helpers

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use cyon_dns::{CyonClient, Domain, ZoneEditor};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCOUNT: &str = "acc1";
pub const DOMAIN: &str = "example.com";
pub const OTHER_DOMAIN: &str = "example.org";

/// Skips a test when an environment variable is missing
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Asserts that an `Option` is `Some` and unwraps it (otherwise fails the test).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Asserts that a `Result` is `Ok` and unwraps it (otherwise fails the test).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

// ============ Panel fixtures ============

/// One listing row the way the DNS editor renders it.
pub fn record_row(name: &str, ttl: &str, record_type: &str, value: &str, hash: &str) -> Value {
    json!([
        name,
        ttl,
        format!(r#"<span class="badge badge-type">{record_type}</span>"#),
        value,
        format!(
            r##"<a class="btn" data-url="/domain/dnseditor/edit-record/hash/{hash}" href="#">Bearbeiten</a>"##
        ),
    ])
}

/// Listing envelope around `rows`.
pub fn listing(rows: Vec<Value>) -> Value {
    let total = rows.len();
    json!({ "data": rows, "recordsTotal": total })
}

/// Domain listing envelope; the panel appends status markup after the name.
pub fn domain_listing(names: &[&str]) -> Value {
    let rows: Vec<Value> = names
        .iter()
        .map(|name| json!([format!(r#"{name} <span class="label">aktiv</span>"#), "cyon"]))
        .collect();
    json!({ "data": rows })
}

pub fn accepted() -> Value {
    json!({ "status": true })
}

// ============ Mock mounting ============

/// Mounts both login steps, answering 200.
pub async fn mount_login(server: &MockServer) {
    mount_login_with(server, 200, 200).await;
}

pub async fn mount_login_with(server: &MockServer, login_status: u16, validate_status: u16) {
    Mock::given(method("POST"))
        .and(path("/auth/index/dologin-async"))
        .respond_with(
            ResponseTemplate::new(login_status)
                .insert_header("set-cookie", "PHPSESSID=test-session; Path=/")
                .set_body_json(json!({ "status": login_status == 200 })),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(validate_status).set_body_string("<html></html>"))
        .mount(server)
        .await;
}

/// Mounts the scope switch for `domain`, expecting exactly `times` calls.
pub async fn mount_scope_switch(server: &MockServer, domain: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path_regex(scope_switch_pattern(domain)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(times)
        .named(format!("scope switch to {domain}"))
        .mount(server)
        .await;
}

pub fn scope_switch_pattern(domain: &str) -> String {
    format!(
        "^/user/environment/setdomain/d/{}/gik/account",
        domain.replace('.', r"\.")
    )
}

/// Mounts the record listing, expecting exactly `times` fetches.
pub async fn mount_listing(server: &MockServer, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/domain/dnseditor/list-async"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .named("record listing")
        .mount(server)
        .await;
}

/// Mounts a mutation endpoint (`add`, `edit` or `delete`), expecting `times` calls.
pub async fn mount_mutation(server: &MockServer, action: &str, body: Value, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/domain/dnseditor/{action}-record-async")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .named(format!("{action} record"))
        .mount(server)
        .await;
}

// ============ Clients ============

pub fn mock_client(server: &MockServer) -> CyonClient {
    match CyonClient::builder(ACCOUNT, "alice", "hunter2")
        .base_url(server.uri())
        .request_timeout_secs(5)
        .build()
    {
        Ok(client) => client,
        Err(e) => panic!("failed to build client: {e}"),
    }
}

/// Requests the server received for `path`, in arrival order.
pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == request_path)
        .collect()
}

pub fn body_text(request: &wiremock::Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}

// ============ Live panel ============

/// Generates a unique test record name under `domain`
pub fn generate_test_record_name(domain: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}.{domain}", &uuid.to_string()[..8])
}

/// Test context - a live client and its test domain
pub struct TestContext {
    pub client: CyonClient,
    pub domain: Arc<Domain>,
}

impl TestContext {
    /// Builds the context from `CYON_*` and `TEST_DOMAIN`
    pub async fn live() -> Option<Self> {
        let account = env::var("CYON_ACCOUNT").ok()?;
        let username = env::var("CYON_USERNAME").ok()?;
        let password = env::var("CYON_PASSWORD").ok()?;
        let domain_name = env::var("TEST_DOMAIN").ok()?;

        let client = CyonClient::new(account, username, password).ok()?;
        let domain = client.domain(&domain_name).await.ok()?;
        Some(Self { client, domain })
    }

    /// Removes every record whose name starts with `_test-`
    pub async fn cleanup_all_test_records(&self) {
        let zone = self.domain.zone();
        self.domain.invalidate().await;
        match self.domain.list_records().await {
            Ok(records) => {
                for record in records.iter().filter(|r| r.name.starts_with("_test-")) {
                    if let Err(e) = self.domain.delete_record(record).await {
                        eprintln!("Cleanup: could not delete {} in {zone}: {e}", record.name);
                    }
                }
            }
            Err(e) => eprintln!("Cleanup: skipped, listing {zone} failed: {e}"),
        }
    }
}
