use serde_json::json;
use shelfwise_core::Product;
use shelfwise_store::{Collection, JsonFileRepository, Repository, ShelfService, StoreError};

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");

    let shelf_id = {
        let mut svc = ShelfService::new(JsonFileRepository::open(dir.path()).expect("open"));
        let shelf = svc.create_shelf("Front", 5, 5).expect("shelf");
        svc.save_product(Product {
            name: "Soap".to_string(),
            ..Product::with_id("p1")
        })
        .expect("product");
        svc.place_product(&shelf.id, "p1", "C3").expect("place");
        shelf.id
    };

    assert!(dir.path().join("shelves.json").exists());
    assert!(dir.path().join("products.json").exists());

    let svc = ShelfService::new(JsonFileRepository::open(dir.path()).expect("reopen"));
    let shelf = svc.shelf(&shelf_id).expect("load").expect("present");
    assert_eq!(shelf.products.len(), 1);
    assert_eq!(shelf.products[0].position, "C3");
    assert_eq!(svc.products().expect("products").len(), 1);
}

#[test]
fn test_delete_is_persisted() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut repo = JsonFileRepository::open(dir.path().join("nested")).expect("open");
    repo.put(Collection::Users, "a@x.com", json!({"id": "a@x.com"}))
        .expect("put");
    assert!(repo.delete(Collection::Users, "a@x.com").expect("delete"));

    let reopened = JsonFileRepository::open(dir.path().join("nested")).expect("reopen");
    assert!(reopened.list(Collection::Users).expect("list").is_empty());
}

#[test]
fn test_corrupt_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("products.json"), "{not json").expect("write");

    let err = JsonFileRepository::open(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
}

#[test]
fn test_failed_write_leaves_cache_unchanged() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path().join("store");
    let mut repo = JsonFileRepository::open(&root).expect("open");
    repo.put(Collection::Products, "p1", json!({"id": "p1"}))
        .expect("put");

    // Nowhere left to write the replacement file.
    std::fs::remove_dir_all(&root).expect("remove");

    let err = repo
        .put(Collection::Products, "p2", json!({"id": "p2"}))
        .unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
    assert_eq!(repo.get(Collection::Products, "p2").expect("get"), None);
    assert_eq!(repo.list(Collection::Products).expect("list").len(), 1);

    assert!(repo.delete(Collection::Products, "p1").is_err());
    assert!(repo.get(Collection::Products, "p1").expect("get").is_some());
}

#[test]
fn test_writes_leave_only_collection_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut repo = JsonFileRepository::open(dir.path()).expect("open");
    for n in 0..5 {
        let id = format!("p{n}");
        repo.put(Collection::Products, &id, json!({ "id": id.clone() }))
            .expect("put");
    }
    assert!(repo.delete(Collection::Products, "p0").expect("delete"));
    assert!(!repo.delete(Collection::Shelves, "missing").expect("delete"));

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["products.json"]);

    let reopened = JsonFileRepository::open(dir.path()).expect("reopen");
    assert_eq!(reopened.list(Collection::Products).expect("list").len(), 4);
}
