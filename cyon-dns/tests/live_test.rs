//! Live tests against the real cyon.ch panel
//!
//! Run with:
//! ```bash
//! CYON_ACCOUNT=xxx CYON_USERNAME=xxx CYON_PASSWORD=xxx TEST_DOMAIN=example.com \
//!     cargo test -p cyon-dns --test live_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::{TestContext, generate_test_record_name};
use cyon_dns::{RecordTtl, ZoneEditor};

// ============ Basic tests ============

#[tokio::test]
#[ignore]
async fn test_cyon_authenticate() {
    skip_if_no_credentials!("CYON_ACCOUNT", "CYON_USERNAME", "CYON_PASSWORD", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::live().await, "failed to build test context");
    require_ok!(ctx.client.authenticate().await, "authenticate failed");
    assert!(ctx.client.is_authenticated().await);

    println!("✓ authenticate passed");
}

#[tokio::test]
#[ignore]
async fn test_cyon_list_domains() {
    skip_if_no_credentials!("CYON_ACCOUNT", "CYON_USERNAME", "CYON_PASSWORD", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::live().await, "failed to build test context");
    let domains = require_ok!(ctx.client.list_domains().await, "list_domains failed");
    assert!(
        domains.iter().any(|d| d.name() == ctx.domain.name()),
        "test domain missing from account"
    );

    println!("✓ list_domains passed, {} domain(s)", domains.len());
}

#[tokio::test]
#[ignore]
async fn test_cyon_list_records() {
    skip_if_no_credentials!("CYON_ACCOUNT", "CYON_USERNAME", "CYON_PASSWORD", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::live().await, "failed to build test context");
    let records = require_ok!(ctx.domain.list_records().await, "list_records failed");
    assert!(records.iter().all(|r| r.revision().is_some()));
    assert_eq!(
        ctx.client.active_domain().await.as_deref(),
        Some(ctx.domain.name())
    );

    println!("✓ list_records passed, {} record(s)", records.len());
}

// ============ CRUD ============

#[tokio::test]
#[ignore]
async fn test_cyon_txt_record_crud() {
    skip_if_no_credentials!("CYON_ACCOUNT", "CYON_USERNAME", "CYON_PASSWORD", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::live().await, "failed to build test context");
    let name = generate_test_record_name(ctx.domain.name());

    require_ok!(
        ctx.domain
            .create_txt_record(&name, "integration-test", RecordTtl::QuarterHour)
            .await,
        "create failed"
    );

    // The panel may list the name fully qualified
    let mut created = require_ok!(ctx.domain.find_record(&name).await, "list failed");
    if created.is_none() {
        created = require_ok!(ctx.domain.find_record(&format!("{name}.")).await, "list failed");
    }
    let created = require_some!(created, "created record not listed");
    assert_eq!(created.value, "integration-test");

    let mut updated = created.clone();
    updated.value = "integration-test-2".to_string();
    require_ok!(ctx.domain.update_record(&updated).await, "update failed");

    let current = require_some!(
        ctx.domain
            .find_record(&created.name)
            .await
            .ok()
            .flatten(),
        "updated record not listed"
    );
    assert_eq!(current.value, "integration-test-2");

    require_ok!(ctx.domain.delete_record(&current).await, "delete failed");
    assert!(
        ctx.domain
            .find_record(&created.name)
            .await
            .ok()
            .flatten()
            .is_none(),
        "record still listed after delete"
    );

    ctx.cleanup_all_test_records().await;
    println!("✓ TXT CRUD passed: {name}");
}
