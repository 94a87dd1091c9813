//! Fault injection: a store and a hasher that misbehave on demand.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use warden_core::{ActorId, CompositeKey, CredentialHasher, KeyError, Pbkdf2Hasher};
use warden_store::{MemoryStore, Result, Store, StoreError};

use crate::fixtures::FAST_ITERATIONS;

/// A [`MemoryStore`] wrapper with switchable failures and read latency.
///
/// Clones share the same underlying data and switches.
#[derive(Clone, Default)]
pub struct FailingStore {
    inner: Arc<MemoryStore>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    read_delay_ms: Arc<AtomicU64>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `get` and `keys` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `put` and `delete` fail without touching data.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stall every `get` for `delay`.
    pub fn read_delay(&self, delay: Duration) {
        self.read_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of `get` calls that reached the store.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of successful `put` and `delete` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The wrapped store, bypassing all faults.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn get(&self, actor: &ActorId, key: &str) -> Result<Option<Vec<u8>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let delay = self.read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        self.inner.get(actor, key).await
    }

    async fn put(&self, actor: &ActorId, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        self.inner.put(actor, key, value).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, actor: &ActorId, key: &str) -> Result<bool> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        let removed = self.inner.delete(actor, key).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(removed)
    }

    async fn keys(&self, actor: &ActorId) -> Result<Vec<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        self.inner.keys(actor).await
    }
}

/// A hasher whose `hash` can be switched to fail. Verification always
/// delegates to PBKDF2.
#[derive(Clone)]
pub struct FailingHasher {
    real: Pbkdf2Hasher,
    failing: Arc<AtomicBool>,
}

impl FailingHasher {
    /// A hasher that fails from the start.
    pub fn new() -> Self {
        Self {
            real: Pbkdf2Hasher::new(FAST_ITERATIONS),
            failing: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for FailingHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for FailingHasher {
    fn hash(&self, password: &str) -> std::result::Result<CompositeKey, KeyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(KeyError::Derivation("injected hashing failure".into()));
        }
        self.real.hash(password)
    }

    fn verify(&self, stored: &CompositeKey, password: &str) -> std::result::Result<bool, KeyError> {
        self.real.verify(stored, password)
    }
}
