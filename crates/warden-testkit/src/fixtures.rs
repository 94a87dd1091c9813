//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use warden::{ActorDirectory, ActorHandle, CredentialRecord, IdentityName, WardenConfig, USER_KEY};
use warden_store::{MemoryStore, Store};

/// Iteration count used by fixtures. Low enough to keep tests fast.
pub const FAST_ITERATIONS: u32 = 1_000;

/// Default configuration with cheap key derivation.
pub fn fast_config() -> WardenConfig {
    WardenConfig::default().iterations(FAST_ITERATIONS)
}

/// A directory over a shared in-memory store.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub directory: ActorDirectory,
}

impl TestFixture {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let directory = ActorDirectory::new(Arc::clone(&store), fast_config())
            .expect("fast config is valid");
        Self { store, directory }
    }

    /// Resolve an actor by name.
    pub async fn actor(&self, name: &str) -> ActorHandle {
        self.directory
            .resolve_name(name)
            .await
            .expect("fixture names are non-empty")
    }

    /// A second directory over the same store, as after a host restart.
    pub fn restart(&self) -> ActorDirectory {
        ActorDirectory::new(Arc::clone(&self.store), fast_config())
            .expect("fast config is valid")
    }

    /// Read the durable record for `name` directly from the store.
    pub async fn stored_record(&self, name: &str) -> Option<CredentialRecord> {
        let id = IdentityName::new(name).ok()?.actor_id();
        let bytes = self.store.get(&id, USER_KEY).await.ok()??;
        CredentialRecord::from_json(&bytes).ok()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
