//! Submit flow: validate, confirm, persist.
//!
//! A submit request never reaches the store directly. It first has to pass
//! [`ChoiceList::validate`], then the user confirms in an overlay, and the list
//! is validated once more right before the store is called, since the list
//! may have changed while the confirmation was up.
//!
//! Problems are reported through a [`Notice`] the view shows inline. Nothing
//! here returns an `Err` for a user mistake.

use crate::choices::ChoiceList;
use crate::error::{BuilderError, ValidationError};
use crate::model::Application;
use crate::overlay::{History, OverlayController};
use crate::store::ApplicationStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Invalid(ValidationError),
    /// The store's error, verbatim.
    PersistenceFailed(String),
}

/// An inline message under the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    /// Whether the button should play its shake animation.
    pub shake: bool,
}

impl Notice {
    pub fn message(&self) -> String {
        match &self.kind {
            NoticeKind::Invalid(err) => err.to_string(),
            NoticeKind::PersistenceFailed(msg) => msg.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    AwaitingConfirmation,
    Rejected(ValidationError),
}

#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    Submitted(Application),
    Rejected(ValidationError),
    Failed(String),
    /// Confirm arrived while no confirmation was showing.
    NotConfirming,
}

#[derive(Debug, Clone)]
pub struct SubmissionGate {
    overlay: OverlayController,
    notice: Option<Notice>,
}

impl SubmissionGate {
    pub fn mount(overlay: OverlayController) -> Self {
        Self {
            overlay,
            notice: None,
        }
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayController {
        &mut self.overlay
    }

    pub fn is_confirming(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Stops the shake once the animation has played.
    pub fn clear_shake(&mut self) {
        if let Some(notice) = self.notice.as_mut() {
            notice.shake = false;
        }
    }

    /// The user pressed submit.
    pub fn request_submit<H: History + ?Sized>(
        &mut self,
        list: &ChoiceList,
        history: &mut H,
    ) -> SubmitOutcome {
        if let Err(err) = list.validate() {
            tracing::debug!(%err, "submit rejected");
            self.reject(err);
            return SubmitOutcome::Rejected(err);
        }

        self.notice = None;
        self.overlay.open(history);
        SubmitOutcome::AwaitingConfirmation
    }

    /// The user confirmed in the overlay.
    pub fn confirm<H, S>(&mut self, list: &ChoiceList, history: &mut H, store: &mut S) -> ConfirmOutcome
    where
        H: History + ?Sized,
        S: ApplicationStore + ?Sized,
    {
        if !self.overlay.is_open() {
            return ConfirmOutcome::NotConfirming;
        }

        if let Err(err) = list.validate() {
            tracing::debug!(%err, "list changed under confirmation");
            self.overlay.close(history);
            self.reject(err);
            return ConfirmOutcome::Rejected(err);
        }

        match store.submit(&list.submission(), list.choices()) {
            Ok(application) => {
                tracing::info!(
                    application = %application.id,
                    revision = application.revision,
                    choices = application.choices.len(),
                    "application submitted"
                );
                self.notice = None;
                self.overlay.close(history);
                ConfirmOutcome::Submitted(application)
            }
            Err(err) => {
                // The collaborator's own words, without our error prefix
                let message = match err {
                    BuilderError::Store(message) => message,
                    other => other.to_string(),
                };
                tracing::warn!(error = %message, "application submit failed");
                // Confirmation stays up so the user can try again.
                self.notice = Some(Notice {
                    kind: NoticeKind::PersistenceFailed(message.clone()),
                    shake: false,
                });
                ConfirmOutcome::Failed(message)
            }
        }
    }

    /// The user backed out of the confirmation.
    pub fn cancel<H: History + ?Sized>(&mut self, history: &mut H) -> bool {
        self.overlay.close(history)
    }

    fn reject(&mut self, err: ValidationError) {
        self.notice = Some(Notice {
            kind: NoticeKind::Invalid(err),
            shake: true,
        });
    }
}
