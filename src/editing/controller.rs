// Controller - drives the edit session against an edit service

use super::codec;
use super::error::{EditorError, Result};
use super::service::{EditService, ServiceError};
use super::session::EditSession;
use super::types::{EditOutcome, EncodedImage, SessionSnapshot};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// Owns the edit session and talks to the edit service.
///
/// Cloning is cheap and every clone drives the same session, so an edit
/// can run in a spawned task while other clones keep handling input. The
/// session lock is never held across the service call.
#[derive(Clone)]
pub struct EditController {
    session: Arc<Mutex<EditSession>>,
    service: Arc<dyn EditService>,
    updates: Arc<watch::Sender<SessionSnapshot>>,
}

impl EditController {
    pub fn new(service: Arc<dyn EditService>) -> Self {
        let (updates, _) = watch::channel(SessionSnapshot::default());
        Self {
            session: Arc::new(Mutex::new(EditSession::new())),
            service,
            updates: Arc::new(updates),
        }
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn upload(&self, image: EncodedImage) {
        self.apply(|s| s.upload(image)).await;
    }

    /// Encode and upload a file. A non-image leaves the history untouched.
    pub async fn open(&self, path: impl AsRef<Path>) -> Result<()> {
        match codec::encode_file(path).await {
            Ok(image) => {
                self.upload(image).await;
                Ok(())
            }
            Err(e) => {
                if let Some(kind) = e.kind() {
                    self.apply(|s| s.report(kind)).await;
                }
                Err(e)
            }
        }
    }

    pub async fn clear(&self) {
        self.apply(|s| s.clear()).await;
    }

    /// Run one edit against the image at the cursor.
    ///
    /// Rejected with `InvalidState` when no image is loaded or another edit
    /// is running. Resolves to `Discarded` if the session moved on while
    /// the service was working.
    ///
    /// The service call and its bookkeeping run in a spawned task, so
    /// dropping the returned future does not leave the session stuck in
    /// the generating state: the result is still applied when it arrives.
    pub async fn request_edit(&self, instruction: &str) -> Result<EditOutcome> {
        let ticket = self.transact(|s| s.begin_edit(instruction)).await?;

        tracing::info!(
            "Sending \"{}\" to {} ({})",
            ticket.instruction,
            self.service.name(),
            ticket.source.name
        );

        let controller = self.clone();
        let task_ticket = ticket.clone();
        let handle = tokio::spawn(async move {
            let result = controller
                .service
                .edit(&task_ticket.source, &task_ticket.instruction)
                .await
                .map(|edited| EncodedImage::from_edit(&task_ticket.source, edited));
            controller
                .transact(|s| Ok(s.finish_edit(&task_ticket, result)))
                .await
        });

        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Edit task ended abnormally: {}", e);
                let result = Err(ServiceError::Interrupted(e.to_string()));
                self.transact(|s| Ok(s.finish_edit(&ticket, result))).await
            }
        }
    }

    pub async fn accept_pending(&self) -> Result<()> {
        self.transact(|s| s.accept_pending()).await
    }

    pub async fn undo(&self) -> Result<()> {
        self.transact(|s| s.undo()).await
    }

    pub async fn redo(&self) -> Result<()> {
        self.transact(|s| s.redo()).await
    }

    pub async fn can_undo(&self) -> bool {
        self.session.lock().await.history().can_undo()
    }

    pub async fn can_redo(&self) -> bool {
        self.session.lock().await.history().can_redo()
    }

    pub async fn displayed_image(&self) -> Option<EncodedImage> {
        self.session.lock().await.history().displayed().cloned()
    }

    pub async fn pending(&self) -> Option<EncodedImage> {
        self.session.lock().await.history().pending().cloned()
    }

    pub async fn entries(&self) -> Vec<EncodedImage> {
        self.session.lock().await.history().entries().to_vec()
    }

    pub async fn cursor(&self) -> usize {
        self.session.lock().await.history().cursor()
    }

    /// Write the displayed image to disk
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let image = self
            .displayed_image()
            .await
            .ok_or(EditorError::InvalidState("no image loaded"))?;
        let bytes = codec::decode(&image)?;
        tokio::fs::write(path.as_ref(), bytes).await?;
        tracing::info!("Saved {}", path.as_ref().display());
        Ok(())
    }

    // One transaction: mutate under the lock, then publish the new snapshot.
    async fn transact<T>(&self, f: impl FnOnce(&mut EditSession) -> Result<T>) -> Result<T> {
        let mut session = self.session.lock().await;
        let result = f(&mut *session);
        self.updates.send_replace(session.snapshot());
        result
    }

    async fn apply(&self, f: impl FnOnce(&mut EditSession)) {
        let mut session = self.session.lock().await;
        f(&mut *session);
        self.updates.send_replace(session.snapshot());
    }
}
