// Edit session - history plus request bookkeeping

use super::error::{EditorError, ErrorKind, Result};
use super::history::EditHistory;
use super::types::{EditOutcome, EditTicket, EncodedImage, SessionSnapshot};
use super::service::ServiceError;
use tracing::{debug, info, warn};

/// Synchronous state machine behind the controller.
///
/// Every method is one transaction. Edit requests are split into
/// `begin_edit`, which hands out a ticket stamped with a request id and
/// the current generation, and `finish_edit`, which applies the result
/// only if the generation has not moved since. Anything that changes the
/// image at the cursor bumps the generation.
///
/// The service call itself cannot be cancelled, so a request stays
/// outstanding until its `finish_edit` runs, stale or not. No second
/// request can begin before then.
#[derive(Debug, Default)]
pub struct EditSession {
    history: EditHistory,
    in_flight: Option<u64>,
    next_request: u64,
    last_error: Option<ErrorKind>,
    generation: u64,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn upload(&mut self, image: EncodedImage) {
        info!("New baseline: {} ({})", image.name, image.media_type);
        self.history.reset(image);
        self.last_error = None;
        self.invalidate();
    }

    pub fn clear(&mut self) {
        info!("Session cleared");
        self.history.clear();
        self.last_error = None;
        self.invalidate();
    }

    /// Record an error raised outside the session, e.g. by the codec
    pub fn report(&mut self, kind: ErrorKind) {
        self.last_error = Some(kind);
    }

    pub fn begin_edit(&mut self, instruction: &str) -> Result<EditTicket> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(EditorError::InvalidState("empty instruction"));
        }
        if self.in_flight.is_some() {
            return Err(EditorError::InvalidState("an edit is already in progress"));
        }
        let source = self
            .history
            .current()
            .cloned()
            .ok_or(EditorError::InvalidState("no image loaded"))?;

        let request_id = self.next_request;
        self.next_request += 1;
        self.in_flight = Some(request_id);
        self.last_error = None;
        self.history.discard_pending();

        debug!("Edit {} requested at generation {}", request_id, self.generation);
        Ok(EditTicket {
            request_id,
            generation: self.generation,
            source,
            instruction: instruction.to_string(),
        })
    }

    pub fn finish_edit(
        &mut self,
        ticket: &EditTicket,
        result: std::result::Result<EncodedImage, ServiceError>,
    ) -> EditOutcome {
        if self.in_flight != Some(ticket.request_id) {
            debug!("Ignoring result of edit {}, not in flight", ticket.request_id);
            return EditOutcome::Discarded;
        }
        self.in_flight = None;

        if ticket.generation != self.generation {
            debug!(
                "Dropping stale edit result (generation {} != {})",
                ticket.generation, self.generation
            );
            return EditOutcome::Discarded;
        }

        match result {
            Ok(image) => {
                info!("Edit ready: \"{}\"", ticket.instruction);
                self.history.propose(image);
                EditOutcome::Proposed
            }
            Err(e) => {
                warn!("Edit \"{}\" failed: {}", ticket.instruction, e);
                self.last_error = Some(ErrorKind::EditFailed);
                EditOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn accept_pending(&mut self) -> Result<()> {
        self.history.accept_pending()?;
        info!("Edit accepted ({} entries)", self.history.len());
        self.invalidate();
        Ok(())
    }

    pub fn undo(&mut self) -> Result<()> {
        self.history.undo()?;
        self.invalidate();
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        self.history.redo()?;
        self.invalidate();
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            displayed: self.history.displayed().cloned(),
            position: self.history.cursor(),
            len: self.history.len(),
            has_pending: self.history.pending().is_some(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            is_generating: self.in_flight.is_some(),
            last_error: self.last_error,
        }
    }

    // The image at the cursor changed: outstanding results are stale.
    fn invalidate(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(tag: &str) -> EncodedImage {
        EncodedImage::new(format!("{}.png", tag), tag, "image/png")
    }

    #[test]
    fn test_edit_without_image() {
        let mut session = EditSession::new();
        let err = session.begin_edit("sepia").unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::InvalidState));
        assert!(!session.is_generating());
    }

    #[test]
    fn test_empty_instruction_rejected() {
        let mut session = EditSession::new();
        session.upload(image("x"));
        assert!(session.begin_edit("   ").is_err());
        assert!(!session.is_generating());
    }

    #[test]
    fn test_second_request_rejected_while_generating() {
        let mut session = EditSession::new();
        session.upload(image("x"));
        session.begin_edit("sepia").unwrap();
        assert!(matches!(
            session.begin_edit("vibrant"),
            Err(EditorError::InvalidState(_))
        ));
        assert!(session.is_generating());
    }

    #[test]
    fn test_begin_clears_pending_and_error() {
        let mut session = EditSession::new();
        session.upload(image("x"));
        let ticket = session.begin_edit("sepia").unwrap();
        session.finish_edit(&ticket, Err(ServiceError::NoImage));
        assert_eq!(session.last_error(), Some(ErrorKind::EditFailed));

        let ticket = session.begin_edit("sepia").unwrap();
        assert_eq!(session.last_error(), None);
        session.finish_edit(&ticket, Ok(image("y")));
        assert!(session.history().pending().is_some());

        session.begin_edit("vibrant").unwrap();
        assert!(session.history().pending().is_none());
    }

    #[test]
    fn test_failed_edit_leaves_history() {
        let mut session = EditSession::new();
        session.upload(image("x"));
        let ticket = session.begin_edit("sepia").unwrap();
        let outcome = session.finish_edit(&ticket, Err(ServiceError::NoImage));

        assert!(matches!(outcome, EditOutcome::Failed(_)));
        assert!(!session.is_generating());
        assert!(session.history().pending().is_none());
        assert_eq!(session.history().entries(), &[image("x")]);
    }

    #[test]
    fn test_upload_makes_request_stale() {
        let mut session = EditSession::new();
        session.upload(image("x"));
        let ticket = session.begin_edit("sepia").unwrap();
        session.upload(image("z"));
        assert!(session.is_generating());

        let outcome = session.finish_edit(&ticket, Ok(image("y")));
        assert_eq!(outcome, EditOutcome::Discarded);
        assert!(!session.is_generating());
        assert_eq!(session.history().entries(), &[image("z")]);
        assert!(session.history().pending().is_none());
    }

    #[test]
    fn test_stale_request_blocks_new_one_until_finished() {
        let mut session = EditSession::new();
        session.upload(image("x"));
        let stale = session.begin_edit("sepia").unwrap();
        session.upload(image("z"));

        assert!(matches!(
            session.begin_edit("vibrant"),
            Err(EditorError::InvalidState(_))
        ));

        session.finish_edit(&stale, Ok(image("y")));
        let fresh = session.begin_edit("vibrant").unwrap();
        assert_ne!(fresh.request_id, stale.request_id);
        assert_eq!(session.finish_edit(&fresh, Ok(image("v"))), EditOutcome::Proposed);
        assert_eq!(session.history().pending(), Some(&image("v")));
    }

    #[test]
    fn test_finishing_twice_does_not_release_newer_request() {
        let mut session = EditSession::new();
        session.upload(image("x"));
        let first = session.begin_edit("sepia").unwrap();
        session.finish_edit(&first, Err(ServiceError::NoImage));
        let _second = session.begin_edit("vibrant").unwrap();

        let outcome = session.finish_edit(&first, Err(ServiceError::NoImage));
        assert_eq!(outcome, EditOutcome::Discarded);
        assert!(session.is_generating());
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_stale_failure_does_not_set_error() {
        let mut session = EditSession::new();
        session.upload(image("x"));
        let ticket = session.begin_edit("sepia").unwrap();
        session.clear();
        let outcome = session.finish_edit(&ticket, Err(ServiceError::NoImage));
        assert_eq!(outcome, EditOutcome::Discarded);
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_navigation_makes_request_stale() {
        let mut session = EditSession::new();
        session.upload(image("a"));
        let ticket = session.begin_edit("b").unwrap();
        session.finish_edit(&ticket, Ok(image("b")));
        session.accept_pending().unwrap();

        let ticket = session.begin_edit("c").unwrap();
        session.undo().unwrap();
        let outcome = session.finish_edit(&ticket, Ok(image("c")));
        assert_eq!(outcome, EditOutcome::Discarded);
        assert_eq!(session.history().displayed(), Some(&image("a")));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = EditSession::new();
        assert_eq!(session.snapshot(), SessionSnapshot::default());

        session.upload(image("x"));
        let ticket = session.begin_edit("sepia").unwrap();
        assert!(session.snapshot().is_generating);
        session.finish_edit(&ticket, Ok(image("y")));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.displayed, Some(image("y")));
        assert!(snapshot.has_pending);
        assert_eq!(snapshot.len, 1);
        assert!(!snapshot.can_undo);
    }
}
