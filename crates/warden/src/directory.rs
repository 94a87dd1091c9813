//! Actor directory: one logical actor per identity name.
//!
//! Names are addressed through their [`ActorId`], so every caller that
//! resolves the same name reaches the same mailbox. That routing is the only
//! thing serializing concurrent operations on one identity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use warden_core::{ActorId, CredentialHasher, IdentityName, Pbkdf2Hasher};
use warden_store::{ActorStorage, Store};

use crate::actor::{ActorHandle, CredentialActor};
use crate::config::WardenConfig;
use crate::error::Result;

type ActorMap = Arc<Mutex<HashMap<ActorId, Slot>>>;

enum Slot {
    Running(Entry),
    /// The actor is finishing its queued operations. Resolves for the same
    /// identity wait until the sender is dropped.
    Draining(watch::Receiver<()>),
}

struct Entry {
    handle: ActorHandle,
    generation: u64,
    task: JoinHandle<()>,
}

/// Maps identity names to running credential actors.
///
/// Actors are started lazily on first resolve. They live until evicted, until
/// the directory is shut down, or, with [`WardenConfig::idle_timeout`] set,
/// until they go idle. Without an idle timeout the directory keeps one actor
/// per identity it has ever resolved.
///
/// The directory lock only guards the map. Stopping an actor happens outside
/// it, so one identity draining never holds up resolves for another.
pub struct ActorDirectory {
    store: Arc<dyn Store>,
    hasher: Arc<dyn CredentialHasher>,
    config: WardenConfig,
    actors: ActorMap,
    next_generation: AtomicU64,
}

impl ActorDirectory {
    /// Create a directory hashing with PBKDF2 at the configured iteration count.
    pub fn new(store: impl Store + 'static, config: WardenConfig) -> Result<Self> {
        let hasher = Pbkdf2Hasher::new(config.iterations);
        Self::with_hasher(store, config, hasher)
    }

    /// Create a directory with a custom password hasher.
    pub fn with_hasher(
        store: impl Store + 'static,
        config: WardenConfig,
        hasher: impl CredentialHasher,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: Arc::new(store),
            hasher: Arc::new(hasher),
            config,
            actors: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &WardenConfig {
        &self.config
    }

    /// Get the actor for `name`, starting it if needed.
    ///
    /// If the identity's previous actor is still draining, this waits for it
    /// to stop first.
    pub async fn resolve(&self, name: &IdentityName) -> ActorHandle {
        let id = name.actor_id();
        loop {
            let mut actors = self.actors.lock().await;

            let draining = match actors.get(&id) {
                Some(Slot::Running(entry)) if !entry.handle.is_closed() => {
                    return entry.handle.clone();
                }
                Some(Slot::Running(_)) => {
                    debug!(identity = %name, "actor task ended, restarting");
                    None
                }
                Some(Slot::Draining(done)) => Some(done.clone()),
                None => None,
            };

            if let Some(mut done) = draining {
                drop(actors);
                // Never sent on; returns once the draining side drops it.
                let _ = done.changed().await;
                continue;
            }

            return self.start(name, id, &mut actors);
        }
    }

    fn start(
        &self,
        name: &IdentityName,
        id: ActorId,
        actors: &mut HashMap<ActorId, Slot>,
    ) -> ActorHandle {
        let storage = ActorStorage::new(Arc::clone(&self.store), id);
        let actor = CredentialActor::new(name.clone(), storage, Arc::clone(&self.hasher));
        let (handle, actor_task) = actor.spawn(&self.config);
        let generation = self
            .next_generation
            .fetch_add(1, Ordering::Relaxed);
        debug!(identity = %name, actor = ?id, generation, "actor started");

        // Once the actor exits on its own, drop its entry unless a newer
        // actor or a drain has taken the slot.
        let map = Arc::clone(&self.actors);
        let task = tokio::spawn(async move {
            if let Err(e) = actor_task.await {
                warn!(actor = ?id, error = %e, "actor task failed");
            }
            let mut actors = map.lock().await;
            if matches!(actors.get(&id), Some(Slot::Running(entry)) if entry.generation == generation)
            {
                actors.remove(&id);
                debug!(actor = ?id, "retired actor removed");
            }
        });

        actors.insert(
            id,
            Slot::Running(Entry {
                handle: handle.clone(),
                generation,
                task,
            }),
        );
        handle
    }

    /// Resolve from a raw name, rejecting the empty name.
    pub async fn resolve_name(&self, name: &str) -> Result<ActorHandle> {
        let name = IdentityName::new(name)?;
        Ok(self.resolve(&name).await)
    }

    /// Stop the actor for `name` after it finishes its queued operations.
    ///
    /// The next resolve starts a fresh actor that reloads from storage.
    /// Returns whether this call stopped a running actor. If another evict
    /// is already draining the identity, waits for it and returns `false`.
    pub async fn evict(&self, name: &IdentityName) -> bool {
        let id = name.actor_id();
        let mut actors = self.actors.lock().await;

        let waiting = match actors.get(&id) {
            Some(Slot::Running(_)) => None,
            Some(Slot::Draining(done)) => Some(done.clone()),
            None => return false,
        };
        if let Some(mut done) = waiting {
            drop(actors);
            let _ = done.changed().await;
            return false;
        }

        let Some(drain) = Self::begin_drain(&self.actors, &mut actors, id) else {
            return false;
        };
        drop(actors);

        if let Err(e) = drain.await {
            warn!(identity = %name, error = %e, "drain task failed during eviction");
        }
        debug!(identity = %name, "actor evicted");
        true
    }

    /// Swap a running entry for a draining marker and stop the actor in the
    /// background. The drain outlives a cancelled caller.
    fn begin_drain(
        map: &ActorMap,
        actors: &mut HashMap<ActorId, Slot>,
        id: ActorId,
    ) -> Option<JoinHandle<()>> {
        let entry = match actors.remove(&id) {
            Some(Slot::Running(entry)) => entry,
            Some(draining) => {
                actors.insert(id, draining);
                return None;
            }
            None => return None,
        };
        let (done_tx, done_rx) = watch::channel(());
        actors.insert(id, Slot::Draining(done_rx));

        let map = Arc::clone(map);
        Some(tokio::spawn(async move {
            entry.handle.stop().await;
            if let Err(e) = entry.task.await {
                warn!(actor = ?id, error = %e, "actor task failed while draining");
            }
            map.lock().await.remove(&id);
            drop(done_tx);
        }))
    }

    /// Number of running actors.
    pub async fn len(&self) -> usize {
        self.actors
            .lock()
            .await
            .values()
            .filter(|slot| matches!(slot, Slot::Running(_)))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stop every actor after its queued operations complete.
    pub async fn shutdown(&self) {
        let drains: Vec<_> = {
            let mut actors = self.actors.lock().await;
            let running: Vec<ActorId> = actors
                .iter()
                .filter(|(_, slot)| matches!(slot, Slot::Running(_)))
                .map(|(id, _)| *id)
                .collect();
            running
                .into_iter()
                .filter_map(|id| Self::begin_drain(&self.actors, &mut actors, id))
                .collect()
        };

        for drain in drains {
            if let Err(e) = drain.await {
                warn!(error = %e, "drain task failed during shutdown");
            }
        }
    }
}
