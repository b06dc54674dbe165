use super::*;
use shared::domain::{Office, OfficeId};

fn offices() -> Vec<Office> {
    vec![
        Office {
            id: OfficeId(5),
            name: "Harbor".into(),
            is_active: true,
        },
        Office {
            id: OfficeId(6),
            name: "Uptown".into(),
            is_active: false,
        },
    ]
}

#[tokio::test]
async fn saved_fixture_loads_back_as_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FixtureStore::new(dir.path());

    store
        .save(Resource::Offices, &offices())
        .await
        .expect("save offices");

    let batch = store.load(Resource::Offices).await.expect("load offices");
    assert_eq!(batch, EntityBatch::Offices(offices()));
}

#[tokio::test]
async fn missing_fixture_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FixtureStore::open(dir.path()).expect("open");

    let err = store
        .load(Resource::Invoices)
        .await
        .expect_err("no invoices.json");
    assert!(matches!(err, StorageError::NotFound(path) if path.ends_with("invoices.json")));
}

#[tokio::test]
async fn malformed_fixture_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("properties.json"), b"{ not json").expect("write");
    let store = FixtureStore::open(dir.path()).expect("open");

    let err = store
        .load(Resource::Properties)
        .await
        .expect_err("malformed");
    assert!(matches!(err, StorageError::Malformed { .. }));
}

#[test]
fn open_rejects_missing_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");

    let err = FixtureStore::open(&missing).expect_err("missing root");
    assert!(matches!(err, StorageError::MissingRoot(path) if path == missing));
}
