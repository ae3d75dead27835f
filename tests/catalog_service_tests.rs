//! Catalog operations exercised directly on `AppState`, below the HTTP layer.

mod common;

use asset_catalog_server::asset::models::RegisterAssetRequest;
use asset_catalog_server::CatalogError;
use common::{failing_state, memory_state};

fn request(arweave_id: &str, creator: Option<&str>) -> RegisterAssetRequest {
    RegisterAssetRequest {
        original_name: Some("f.mp4".to_string()),
        mime_type: Some("video/mp4".to_string()),
        arweave_id: Some(arweave_id.to_string()),
        creator: creator.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_register_then_get() {
    let (_store, state) = memory_state();

    let asset = state.register_asset(request("ar1", Some("alice"))).await.unwrap();
    let fetched = state.get_asset(&asset.id.to_string()).await.unwrap();

    assert_eq!(fetched, asset);
    assert_eq!(fetched.title, "f.mp4");
    assert!(fetched.purchased_by.is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let (store, state) = memory_state();

    state.register_asset(request("ar1", Some("alice"))).await.unwrap();
    let err = state
        .register_asset(request("ar1", Some("bob")))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Conflict(_)));
    assert_eq!(store.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_store_one_record() {
    let (store, state) = memory_state();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let state = state.clone();
            let creator = format!("creator-{}", i);
            tokio::spawn(async move { state.register_asset(request("ar1", Some(&creator))).await })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(CatalogError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_missing_filters_are_bad_requests() {
    let (_store, state) = memory_state();

    assert!(matches!(
        state.list_by_creator(None).await,
        Err(CatalogError::BadRequest(_))
    ));
    assert!(matches!(
        state.list_purchased_by(None).await,
        Err(CatalogError::BadRequest(_))
    ));
    assert!(state.list_by_creator(Some("alice")).await.unwrap().is_empty());
    assert!(state.list_purchased_by(Some("bob")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_absent_creator_defaults_to_empty_text() {
    let (_store, state) = memory_state();

    let asset = state.register_asset(request("ar1", None)).await.unwrap();
    assert_eq!(asset.creator, "");

    let listed = state.list_by_creator(Some("")).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, asset.id);
}

#[tokio::test]
async fn test_purchase_flow() {
    let (_store, state) = memory_state();
    let asset = state.register_asset(request("ar1", Some("alice"))).await.unwrap();
    let id = asset.id.to_string();

    let updated = state.purchase_asset(&id, Some("buyerX")).await.unwrap();
    assert_eq!(updated.purchased_by, vec!["buyerX"]);

    let err = state.purchase_asset(&id, Some("buyerX")).await.unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(ref m) if m == "Already purchased"));

    let second = state.purchase_asset(&id, Some("buyerY")).await.unwrap();
    assert_eq!(second.purchased_by, vec!["buyerX", "buyerY"]);

    let purchased = state.list_purchased_by(Some("buyerY")).await.unwrap();
    assert_eq!(purchased.len(), 1);
    assert_eq!(purchased[0].id, asset.id);
}

#[tokio::test]
async fn test_purchase_validates_buyer_before_lookup() {
    let (_store, state) = memory_state();

    assert!(matches!(
        state.purchase_asset("not-an-id", None).await,
        Err(CatalogError::BadRequest(_))
    ));
    assert!(matches!(
        state.purchase_asset("not-an-id", Some("")).await,
        Err(CatalogError::BadRequest(_))
    ));
    assert!(matches!(
        state.purchase_asset("not-an-id", Some("bob")).await,
        Err(CatalogError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_get_unknown_or_malformed_id_is_not_found() {
    let (_store, state) = memory_state();

    assert!(matches!(
        state.get_asset("12345").await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(
        state.get_asset(&uuid::Uuid::new_v4().to_string()).await,
        Err(CatalogError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_store_failures_surface_as_store_errors() {
    let state = failing_state();

    assert!(matches!(
        state.list_all_assets().await,
        Err(CatalogError::Store(_))
    ));
    assert!(matches!(
        state.get_asset(&uuid::Uuid::new_v4().to_string()).await,
        Err(CatalogError::Store(_))
    ));
}
