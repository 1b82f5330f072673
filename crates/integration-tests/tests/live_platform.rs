//! Read-only calls against a real platform.
//!
//! These tests require `THREEYD_BASE_URL` and `THREEYD_ACCESS_TOKEN` for a
//! user with organization panel access.
//!
//! Run with: cargo test -p threeyd-integration-tests -- --ignored

use threeyd::api::UserQuery;
use threeyd_integration_tests::live_client;

#[tokio::test]
#[ignore = "Requires a 3YOURMIND platform and THREEYD_* credentials"]
async fn test_live_preferences() {
    let client = live_client().expect("THREEYD_BASE_URL and THREEYD_ACCESS_TOKEN must be set");

    let preferences = client
        .my_profile()
        .get_preferences()
        .await
        .expect("Failed to get preferences");

    if let Some(unit) = preferences.unit {
        assert!(unit == "mm" || unit == "inch", "unexpected unit {unit}");
    }
}

#[tokio::test]
#[ignore = "Requires a 3YOURMIND platform and THREEYD_* credentials"]
async fn test_live_common_lists() {
    let client = live_client().expect("THREEYD_BASE_URL and THREEYD_ACCESS_TOKEN must be set");

    let currencies = client
        .common()
        .get_currencies()
        .await
        .expect("Failed to get currencies");
    assert!(!currencies.is_empty());

    client
        .common()
        .get_countries()
        .await
        .expect("Failed to get countries");
}

#[tokio::test]
#[ignore = "Requires a 3YOURMIND platform and THREEYD_* credentials"]
async fn test_live_user_page() {
    let client = live_client().expect("THREEYD_BASE_URL and THREEYD_ACCESS_TOKEN must be set");

    let page = client
        .organization_panel()
        .get_users(UserQuery::paged(1, 25))
        .await
        .expect("Failed to list users");

    assert!(page.results.len() <= 25);
    assert!(u64::try_from(page.results.len()).unwrap_or(u64::MAX) <= page.count);
}

#[tokio::test]
#[ignore = "Requires a 3YOURMIND platform and THREEYD_* credentials"]
async fn test_live_scratch_basket_roundtrip() {
    let client = live_client().expect("THREEYD_BASE_URL and THREEYD_ACCESS_TOKEN must be set");
    let panel = client.user_panel();

    let basket = panel.create_basket().await.expect("Failed to create basket");
    let fetched = panel.get_basket(basket.id).await.expect("Failed to get basket");
    assert_eq!(fetched.id, basket.id);

    panel
        .delete_basket(basket.id)
        .await
        .expect("Failed to delete basket");
}
