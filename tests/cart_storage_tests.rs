use std::sync::Arc;
use tempfile::TempDir;

use price_compare_cli::models::product::{Product, ProductForm};
use price_compare_cli::models::store::Store;
use price_compare_cli::models::unit_measure::UnitMeasure;
use price_compare_cli::storage::local_storage::{KeyValueStore, LocalStorage, DEFAULT_QUOTA_BYTES};
use price_compare_cli::storage::repositories::{
    CartRepository, CartRepositoryError, LocalStorageCartRepository, CART_STORAGE_KEY,
};

async fn setup_storage(quota: usize) -> (TempDir, Arc<LocalStorage>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = LocalStorage::open(temp_dir.path(), quota)
        .await
        .expect("Failed to open local storage");
    (temp_dir, Arc::new(storage))
}

fn milk() -> Product {
    Product::new(ProductForm::new("Milk", 20.0, 1.0, UnitMeasure::L).with_store(Store::Soriana)).unwrap()
}

fn eggs() -> Product {
    Product::new(ProductForm::new("Eggs", 50.0, 12.0, UnitMeasure::Unit)).unwrap()
}

#[tokio::test]
async fn test_load_without_saved_cart() {
    let (_dir, storage) = setup_storage(DEFAULT_QUOTA_BYTES).await;
    let repo = LocalStorageCartRepository::new(storage);

    assert!(repo.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_then_load_keeps_order() {
    let (_dir, storage) = setup_storage(DEFAULT_QUOTA_BYTES).await;
    let repo = LocalStorageCartRepository::new(storage.clone());

    let products = vec![eggs(), milk()];
    repo.save(&products).await.unwrap();

    let loaded = repo.load().await.unwrap().unwrap();
    assert_eq!(loaded, products);
}

#[tokio::test]
async fn test_stored_value_is_a_json_array_under_fixed_key() {
    let (_dir, storage) = setup_storage(DEFAULT_QUOTA_BYTES).await;
    let repo = LocalStorageCartRepository::new(storage.clone());

    repo.save(&[milk()]).await.unwrap();

    let raw = storage.get_item(CART_STORAGE_KEY).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value.as_array().unwrap()[0];

    assert_eq!(first["productName"], "Milk");
    assert_eq!(first["storeName"], "soriana");
    assert_eq!(first["unitMeasure"], "l");
    assert_eq!(first["quantityConverted"], 1000.0);
    assert_eq!(first["priceUnitMeasure"], 0.02);
}

#[tokio::test]
async fn test_storage_file_is_an_object_of_strings() {
    let (_dir, storage) = setup_storage(DEFAULT_QUOTA_BYTES).await;
    let repo = LocalStorageCartRepository::new(storage.clone());
    repo.save(&[eggs()]).await.unwrap();

    let file = std::fs::read_to_string(storage.file_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&file).unwrap();

    assert!(value[CART_STORAGE_KEY].is_string());
}

#[tokio::test]
async fn test_hand_edited_cart_is_decoded() {
    let (_dir, storage) = setup_storage(DEFAULT_QUOTA_BYTES).await;
    storage
        .set_item(
            CART_STORAGE_KEY,
            r#"[{"productName":"Rice","storeName":"costco","productUrl":"","price":64,"quantity":2,"unitMeasure":"kg","quantityConverted":2000,"priceUnitMeasure":0.032}]"#,
        )
        .await
        .unwrap();

    let repo = LocalStorageCartRepository::new(storage);
    let loaded = repo.load().await.unwrap().unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].product_name(), "Rice");
    assert_eq!(loaded[0].store_name(), Store::Costco);
    assert!((loaded[0].price_unit_measure() - 0.032).abs() < 1e-12);
}

#[tokio::test]
async fn test_garbage_under_cart_key_is_a_decode_error() {
    let (_dir, storage) = setup_storage(DEFAULT_QUOTA_BYTES).await;
    storage.set_item(CART_STORAGE_KEY, "not a list").await.unwrap();

    let repo = LocalStorageCartRepository::new(storage);
    assert!(matches!(
        repo.load().await,
        Err(CartRepositoryError::DecodeError(_))
    ));
}

#[tokio::test]
async fn test_quota_exceeded_is_a_storage_error() {
    let (_dir, storage) = setup_storage(64).await;
    let repo = LocalStorageCartRepository::new(storage);

    assert!(matches!(
        repo.save(&[milk(), eggs()]).await,
        Err(CartRepositoryError::StorageError(_))
    ));
    assert!(repo.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_damaged_storage_file_does_not_block_saves() {
    let (_dir, storage) = setup_storage(DEFAULT_QUOTA_BYTES).await;
    std::fs::write(storage.file_path(), "{truncated").unwrap();
    let repo = LocalStorageCartRepository::new(storage.clone());

    assert!(matches!(
        repo.load().await,
        Err(CartRepositoryError::StorageError(_))
    ));

    repo.save(&[milk()]).await.unwrap();
    repo.save(&[eggs(), milk()]).await.unwrap();

    assert_eq!(repo.load().await.unwrap().unwrap(), vec![eggs(), milk()]);
}
