use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_replaces_values() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set("educationState", r#"{"currentSlide":1}"#).await.unwrap();
    repo.set("educationState", r#"{"currentSlide":2}"#).await.unwrap();

    let value = repo.get("educationState").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"{"currentSlide":2}"#));
    assert_eq!(repo.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_remove_prefix_treats_underscore_literally() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_prefix?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set("quizTaken_1", "true").await.unwrap();
    repo.set("quizTaken_22", "true").await.unwrap();
    repo.set("quizTakenX1", "true").await.unwrap();
    repo.set("theme", "light").await.unwrap();

    let removed = repo.remove_prefix("quizTaken_").await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(
        repo.keys().await.unwrap(),
        vec!["quizTakenX1".to_string(), "theme".to_string()]
    );

    repo.remove("theme").await.unwrap();
    repo.remove("theme").await.unwrap();
    assert_eq!(repo.keys().await.unwrap(), vec!["quizTakenX1".to_string()]);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let url = "sqlite:file:memdb_migrate?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
    repo.set("lastSection", "leaderboard").await.unwrap();

    let storage = Storage::sqlite(url).await.expect("storage");
    assert_eq!(
        storage.local.get("lastSection").await.unwrap().as_deref(),
        Some("leaderboard")
    );
}

#[tokio::test]
async fn connect_creates_missing_database_file() {
    let path = std::env::temp_dir().join(format!("aware-kv-{}.sqlite3", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let storage = Storage::sqlite(&format!("sqlite://{}", path.display()))
        .await
        .expect("storage");
    storage.local.set("theme", "dark").await.unwrap();

    assert!(path.exists());
    assert_eq!(
        storage.local.get("theme").await.unwrap().as_deref(),
        Some("dark")
    );
    drop(storage);
    let _ = std::fs::remove_file(&path);
}
