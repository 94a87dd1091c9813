//! The credential actor: sole owner of one identity's account record.
//!
//! Each actor is a tokio task draining a bounded mailbox, so operations for
//! one identity run strictly one at a time and in arrival order. The record
//! is loaded from storage before the first operation is served; operations
//! that arrive meanwhile wait in the mailbox.
//!
//! Every mutating operation follows the same order:
//! validate, compute, persist, update memory, respond. A failure at any step
//! before the write leaves both storage and memory untouched.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn, Instrument};
use warden_core::{
    ActorId, ActorState, CompositeKey, CredentialHasher, CredentialRecord, IdentityName,
};
use warden_store::ActorStorage;

use crate::config::WardenConfig;
use crate::error::ActorError;
use crate::request::{Operation, Request};
use crate::response::Response;

/// Storage slot holding the JSON-encoded [`CredentialRecord`].
pub const USER_KEY: &str = "user";

pub(crate) enum Envelope {
    Call {
        request: Request,
        reply: oneshot::Sender<Response>,
    },
    /// Finish what is queued ahead of this message, then stop.
    Stop,
}

/// The stateful unit serving one identity.
pub struct CredentialActor {
    name: IdentityName,
    storage: ActorStorage,
    hasher: Arc<dyn CredentialHasher>,
    state: ActorState,
}

impl CredentialActor {
    pub fn new(name: IdentityName, storage: ActorStorage, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            name,
            storage,
            hasher,
            state: ActorState::new(),
        }
    }

    /// Start the actor on the current runtime.
    pub fn spawn(self, config: &WardenConfig) -> (ActorHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(config.mailbox_capacity);
        let handle = ActorHandle {
            name: self.name.clone(),
            id: *self.storage.actor_id(),
            mailbox: tx,
        };
        let span = tracing::debug_span!("credential_actor", identity = %self.name);
        let task = tokio::spawn(self.run(rx, config.idle_timeout).instrument(span));
        (handle, task)
    }

    /// Current in-memory state.
    pub fn state(&self) -> &ActorState {
        &self.state
    }

    async fn run(mut self, mut mailbox: mpsc::Receiver<Envelope>, idle: Option<Duration>) {
        loop {
            let next = match idle {
                Some(idle) => match tokio::time::timeout(idle, mailbox.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        debug!(idle_ms = idle.as_millis() as u64, "actor idle, retiring");
                        mailbox.close();
                        // Calls sent before the close are still answered.
                        while let Some(late) = mailbox.recv().await {
                            if let Envelope::Call { request, reply } = late {
                                self.reply(request, reply).await;
                            }
                        }
                        break;
                    }
                },
                None => mailbox.recv().await,
            };

            match next {
                Some(Envelope::Call { request, reply }) => self.reply(request, reply).await,
                Some(Envelope::Stop) => {
                    mailbox.close();
                    while let Some(late) = mailbox.recv().await {
                        if let Envelope::Call { reply, .. } = late {
                            let _ = reply.send(Response::from_error(&stopped()));
                        }
                    }
                    break;
                }
                None => break,
            }
        }
        debug!("actor stopped");
    }

    async fn reply(&mut self, request: Request, reply: oneshot::Sender<Response>) {
        let response = self.handle(request).await;
        // The caller may have stopped waiting.
        let _ = reply.send(response);
    }

    /// Serve one request. Never fails: errors become error responses.
    pub async fn handle(&mut self, request: Request) -> Response {
        let result = match self.ensure_loaded().await {
            Ok(()) => self.dispatch(request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                if e.is_fault() {
                    error!(error = %e, "operation failed");
                } else {
                    debug!(error = %e, "operation refused");
                }
                Response::from_error(&e)
            }
        }
    }

    /// Load the record on first use.
    ///
    /// A failed load leaves the actor unloaded so the next operation retries.
    async fn ensure_loaded(&mut self) -> Result<(), ActorError> {
        if self.state.loaded {
            return Ok(());
        }

        debug!("loading record");
        let record = match self.storage.get(USER_KEY).await {
            Ok(Some(bytes)) => Some(CredentialRecord::from_json(&bytes)?),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "record load failed");
                return Err(e.into());
            }
        };

        debug!(present = record.is_some(), "record loaded");
        self.state = ActorState::loaded(record);
        Ok(())
    }

    async fn dispatch(&mut self, request: Request) -> Result<Response, ActorError> {
        match request.operation {
            Operation::Signup => {
                if self.state.is_present() {
                    return Err(ActorError::Conflict);
                }
                let credentials = request.body.credentials()?;

                let hashed = self.hash_password(credentials.password).await?;
                let record = CredentialRecord::new(self.name.as_str(), credentials.username, hashed);

                self.persist(&record).await?;
                let view = record.public_view();
                self.state.record = Some(record);

                info!(username = %view.username, "account created");
                Ok(Response::ok(view))
            }
            Operation::Login => {
                let Some(record) = self.state.record.clone() else {
                    return Err(ActorError::AccountAbsent);
                };
                let credentials = request.body.credentials()?;

                let matched = self
                    .verify_password(record.hashed_password.clone(), credentials.password)
                    .await?;
                if !matched {
                    return Err(ActorError::AuthFailed);
                }

                self.persist(&record).await?;
                Ok(Response::ok(record.public_view()))
            }
            Operation::Delete => {
                let existed = self.storage.delete(USER_KEY).await.map_err(|e| {
                    warn!(error = %e, "record delete failed");
                    ActorError::from(e)
                })?;
                self.state.record = None;

                if existed {
                    info!("account deleted");
                }
                Ok(Response::not_found())
            }
            Operation::Status => Ok(match self.state.public_view() {
                Some(view) => Response::ok(view),
                None => Response::not_found(),
            }),
            Operation::Unknown(path) => Err(ActorError::UnknownRoute(path)),
        }
    }

    async fn persist(&self, record: &CredentialRecord) -> Result<(), ActorError> {
        let bytes = record.to_json()?;
        self.storage.put(USER_KEY, &bytes).await.map_err(|e| {
            warn!(error = %e, "record write failed");
            ActorError::from(e)
        })?;
        debug!("record persisted");
        Ok(())
    }

    async fn hash_password(&self, password: String) -> Result<CompositeKey, ActorError> {
        let hasher = Arc::clone(&self.hasher);
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ActorError::Internal(format!("hashing task failed: {e}")))??;
        Ok(hashed)
    }

    async fn verify_password(&self, stored: CompositeKey, password: String) -> Result<bool, ActorError> {
        let hasher = Arc::clone(&self.hasher);
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&stored, &password))
            .await
            .map_err(|e| ActorError::Internal(format!("verification task failed: {e}")))??;
        Ok(matched)
    }
}

fn stopped() -> ActorError {
    ActorError::Internal("actor stopped".into())
}

/// Cloneable address of a running actor.
#[derive(Clone)]
pub struct ActorHandle {
    name: IdentityName,
    id: ActorId,
    mailbox: mpsc::Sender<Envelope>,
}

impl ActorHandle {
    pub fn name(&self) -> &IdentityName {
        &self.name
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Whether the actor task has stopped.
    pub fn is_closed(&self) -> bool {
        self.mailbox.is_closed()
    }

    /// Send a request and wait for its response.
    pub async fn call(&self, request: Request) -> Response {
        let (reply, rx) = oneshot::channel();
        if self
            .mailbox
            .send(Envelope::Call { request, reply })
            .await
            .is_err()
        {
            return Response::from_error(&stopped());
        }
        rx.await
            .unwrap_or_else(|_| Response::from_error(&stopped()))
    }

    /// Untyped entry point: a path and an optional raw JSON body.
    pub async fn fetch(&self, path: &str, body: Option<&[u8]>) -> Response {
        self.call(Request::from_parts(path, body)).await
    }

    pub async fn signup(&self, username: &str, password: &str) -> Response {
        self.call(Request::signup(username, password)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.call(Request::login(username, password)).await
    }

    pub async fn delete(&self) -> Response {
        self.call(Request::delete()).await
    }

    pub async fn status(&self) -> Response {
        self.call(Request::status()).await
    }

    pub(crate) async fn stop(&self) {
        let _ = self.mailbox.send(Envelope::Stop).await;
    }
}

impl std::fmt::Debug for ActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorHandle")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}
