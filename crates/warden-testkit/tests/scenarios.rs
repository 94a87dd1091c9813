//! End-to-end account lifecycle through the directory.

use serde_json::json;
use warden::{ActorDirectory, IdentityName, WardenConfig};
use warden_store::SqliteStore;
use warden_testkit::{fast_config, TestFixture};

#[tokio::test]
async fn signup_then_duplicate_signup() {
    let fixture = TestFixture::new();
    let alice = fixture.actor("alice").await;

    let response = alice.signup("alice", "secret1").await;
    assert_eq!(response.code(), 200);
    assert_eq!(response.to_json(), json!({"id": "alice", "username": "alice"}));

    let response = alice.signup("alice", "other").await;
    assert_eq!(response.code(), 405);
    assert_eq!(response.to_json(), serde_json::Value::Null);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let fixture = TestFixture::new();
    let alice = fixture.actor("alice").await;
    alice.signup("alice", "secret1").await;

    let before = fixture.stored_record("alice").await.unwrap();
    let response = alice.login("alice", "wrong").await;
    assert_eq!(response.code(), 401);
    assert_eq!(response.to_json(), serde_json::Value::Null);
    assert_eq!(fixture.stored_record("alice").await.unwrap(), before);
}

#[tokio::test]
async fn login_with_correct_password() {
    let fixture = TestFixture::new();
    let alice = fixture.actor("alice").await;
    alice.signup("alice", "secret1").await;

    let response = alice.login("alice", "secret1").await;
    assert_eq!(response.code(), 200);
    assert_eq!(response.to_json(), json!({"id": "alice", "username": "alice"}));
}

#[tokio::test]
async fn delete_then_status_is_not_found() {
    let fixture = TestFixture::new();
    let alice = fixture.actor("alice").await;
    alice.signup("alice", "secret1").await;

    let response = alice.delete().await;
    assert_eq!(response.code(), 404);
    assert_eq!(response.to_json(), serde_json::Value::Null);

    let response = alice.status().await;
    assert_eq!(response.code(), 404);
    assert_eq!(response.to_json(), serde_json::Value::Null);
    assert!(fixture.stored_record("alice").await.is_none());
}

#[tokio::test]
async fn login_without_account_is_method_not_allowed() {
    let fixture = TestFixture::new();
    let bob = fixture.actor("bob").await;

    let response = bob.login("bob", "x").await;
    assert_eq!(response.code(), 405);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let fixture = TestFixture::new();
    let carol = fixture.actor("carol").await;

    assert_eq!(carol.delete().await.code(), 404);
    assert_eq!(carol.delete().await.code(), 404);

    carol.signup("carol", "pw").await;
    assert_eq!(carol.delete().await.code(), 404);
    assert_eq!(carol.delete().await.code(), 404);

    // The identity can sign up again afterwards.
    assert_eq!(carol.signup("carol", "pw2").await.code(), 200);
}

#[tokio::test]
async fn signup_survives_restart() {
    let fixture = TestFixture::new();
    let alice = fixture.actor("alice").await;
    assert_eq!(alice.signup("alice", "secret1").await.code(), 200);

    let restarted = fixture.restart();
    let alice = restarted.resolve_name("alice").await.unwrap();
    let response = alice.status().await;
    assert_eq!(response.code(), 200);
    assert_eq!(response.body.unwrap().username, "alice");
    assert_eq!(alice.login("alice", "secret1").await.code(), 200);
}

#[tokio::test]
async fn username_field_is_stored_as_given() {
    let fixture = TestFixture::new();
    let actor = fixture.actor("user-42").await;

    let response = actor.signup("Display Name", "pw").await;
    assert_eq!(response.to_json(), json!({"id": "user-42", "username": "Display Name"}));

    let record = fixture.stored_record("user-42").await.unwrap();
    assert_eq!(record.id, "user-42");
    assert_eq!(record.username, "Display Name");
    assert_eq!(record.hashed_password.decode().unwrap().iterations, 1_000);
}

#[tokio::test]
async fn fetch_routes_json_bodies() {
    let fixture = TestFixture::new();
    let alice = fixture.actor("alice").await;
    let body = br#"{"username":"alice","password":"secret1"}"#;

    assert_eq!(alice.fetch("/", None).await.code(), 404);
    assert_eq!(alice.fetch("/signup", Some(body)).await.code(), 200);
    assert_eq!(alice.fetch("/login", Some(body)).await.code(), 200);
    assert_eq!(
        alice
            .fetch("/login", Some(br#"{"username":"alice","password":"nope"}"#))
            .await
            .code(),
        401
    );
    assert_eq!(alice.fetch("/", None).await.code(), 200);
    assert_eq!(alice.fetch("/reset-password", Some(body)).await.code(), 404);
    assert_eq!(alice.fetch("/delete", None).await.code(), 404);
    assert_eq!(alice.fetch("/", None).await.code(), 404);
}

#[tokio::test]
async fn missing_fields_are_bad_requests() {
    let fixture = TestFixture::new();
    let alice = fixture.actor("alice").await;

    assert_eq!(alice.fetch("/signup", None).await.code(), 400);
    assert_eq!(alice.fetch("/signup", Some(b"{}")).await.code(), 400);
    assert_eq!(alice.signup("", "pw").await.code(), 400);
    assert_eq!(alice.signup("alice", "").await.code(), 400);
    assert!(fixture.stored_record("alice").await.is_none());

    alice.signup("alice", "pw").await;
    assert_eq!(alice.fetch("/login", Some(br#"{"username":"alice"}"#)).await.code(), 400);
    assert_eq!(alice.login("alice", "").await.code(), 400);
}

#[tokio::test]
async fn password_stored_only_as_composite_key() {
    let fixture = TestFixture::new();
    let alice = fixture.actor("alice").await;
    alice.signup("alice", "plaintext-secret").await;

    let id = IdentityName::new("alice").unwrap().actor_id();
    let raw = warden_store::Store::get(&*fixture.store, &id, warden::USER_KEY)
        .await
        .unwrap()
        .unwrap();
    let text = String::from_utf8(raw).unwrap();
    assert!(!text.contains("plaintext-secret"));

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let key = json["hashedPassword"].as_str().unwrap();
    assert!(warden::core::kdf::verify(&warden::CompositeKey::from_encoded(key), "plaintext-secret").unwrap());
}

#[tokio::test]
async fn sqlite_backed_lifecycle_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warden.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        let directory = ActorDirectory::new(store, fast_config()).unwrap();
        let alice = directory.resolve_name("alice").await.unwrap();
        assert_eq!(alice.signup("alice", "secret1").await.code(), 200);
        directory.shutdown().await;
    }

    let store = SqliteStore::open(&path).unwrap();
    let directory = ActorDirectory::new(store, WardenConfig::default()).unwrap();
    let alice = directory.resolve_name("alice").await.unwrap();
    assert_eq!(alice.status().await.code(), 200);
    assert_eq!(alice.login("alice", "secret1").await.code(), 200);
    assert_eq!(alice.login("alice", "secret2").await.code(), 401);
}
