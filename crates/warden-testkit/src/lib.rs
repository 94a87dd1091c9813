//! # Warden Testkit
//!
//! Testing utilities for Warden.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a directory over a shared in-memory store, with cheap
//!   key derivation and a way to simulate actor restarts
//! - **Faults**: a store and a hasher that fail or stall on demand
//! - **Generators**: Proptest strategies for names and passwords
//!
//! ## Test Fixtures
//!
//! ```rust
//! use warden_testkit::TestFixture;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let fixture = TestFixture::new();
//! let alice = fixture.actor("alice").await;
//! assert_eq!(alice.signup("alice", "secret1").await.code(), 200);
//!
//! // A second directory over the same store behaves like a restarted host.
//! let restarted = fixture.restart();
//! let alice = restarted.resolve_name("alice").await.unwrap();
//! assert_eq!(alice.status().await.code(), 200);
//! # }
//! ```
//!
//! ## Fault Injection
//!
//! ```rust
//! use warden_testkit::faults::FailingStore;
//!
//! let store = FailingStore::new();
//! store.fail_writes(true);
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;

pub use faults::{FailingHasher, FailingStore};
pub use fixtures::{fast_config, TestFixture, FAST_ITERATIONS};
