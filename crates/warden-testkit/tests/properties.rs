//! Property tests over the key-derivation protocol and the actor surface.

use proptest::prelude::*;
use warden::core::key::{KeyParts, COMPOSITE_LEN};
use warden::core::kdf;
use warden_testkit::generators::{credentials, distinct_passwords, identity_name, invalid_body, password};
use warden_testkit::TestFixture;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn verify_accepts_own_password(password in password()) {
        let key = kdf::hash_with_iterations(&password, 32).unwrap();
        prop_assert!(kdf::verify(&key, &password).unwrap());
    }

    #[test]
    fn verify_rejects_other_password((p1, p2) in distinct_passwords()) {
        let key = kdf::hash_with_iterations(&p1, 32).unwrap();
        prop_assert!(!kdf::verify(&key, &p2).unwrap());
    }

    #[test]
    fn hash_output_has_fixed_layout(password in password()) {
        use base64::Engine as _;

        let key = kdf::hash_with_iterations(&password, 32).unwrap();
        let raw = base64::engine::general_purpose::STANDARD.decode(key.as_str()).unwrap();
        prop_assert_eq!(raw.len(), COMPOSITE_LEN);
        prop_assert_eq!(&raw[..3], b"v01");
        prop_assert_eq!(KeyParts::decode(key.as_str()).unwrap().iterations, 32);
    }

    #[test]
    fn invalid_bodies_never_create_accounts(name in identity_name(), body in invalid_body()) {
        let (code, stored) = runtime().block_on(async {
            let fixture = TestFixture::new();
            let actor = fixture.actor(name.as_str()).await;
            let code = actor.fetch("/signup", Some(&body)).await.code();
            (code, fixture.stored_record(name.as_str()).await)
        });
        prop_assert_eq!(code, 400);
        prop_assert!(stored.is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn signup_then_login_round_trip(name in identity_name(), creds in credentials()) {
        let (signup, login, view) = runtime().block_on(async {
            let fixture = TestFixture::new();
            let actor = fixture.actor(name.as_str()).await;
            let signup = actor.signup(&creds.username, &creds.password).await;
            let login = actor.login(&creds.username, &creds.password).await;
            (signup.code(), login.code(), login.body)
        });
        prop_assert_eq!(signup, 200);
        prop_assert_eq!(login, 200);
        let view = view.unwrap();
        prop_assert_eq!(view.id, name.as_str());
        prop_assert_eq!(view.username, creds.username);
    }
}
