//! Proptest generators for property-based testing.

use proptest::prelude::*;

use warden::{Credentials, IdentityName};

/// Generate a valid identity name.
pub fn identity_name() -> impl Strategy<Value = IdentityName> {
    "[a-z][a-z0-9_.-]{0,15}".prop_map(|s| IdentityName::new(s).expect("pattern is non-empty"))
}

/// Generate a non-empty password, including non-ASCII characters.
pub fn password() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{1,32}",
        "\\PC{1,16}",
    ]
}

/// Generate a pair of distinct passwords.
pub fn distinct_passwords() -> impl Strategy<Value = (String, String)> {
    (password(), password()).prop_filter("passwords must differ", |(a, b)| a != b)
}

/// Generate valid credentials.
pub fn credentials() -> impl Strategy<Value = Credentials> {
    ("[a-z]{1,12}", password())
        .prop_map(|(username, password)| {
            Credentials::new(username, password).expect("fields are non-empty")
        })
}

/// Generate a JSON body that fails credential validation.
pub fn invalid_body() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(b"".to_vec()),
        Just(b"null".to_vec()),
        Just(b"{}".to_vec()),
        Just(br#"{"username":""}"#.to_vec()),
        Just(br#"{"username":"a","password":""}"#.to_vec()),
        Just(br#"{"username":1,"password":"x"}"#.to_vec()),
        "[a-z]{1,16}".prop_map(|s| format!(r#"{{"username":"{s}"}}"#).into_bytes()),
        "[a-z]{1,16}".prop_map(|s| format!(r#"{{"password":"{s}"}}"#).into_bytes()),
    ]
}
