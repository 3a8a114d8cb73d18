//! # Builder API
//!
//! [`BuilderApi`] is the application edit page without the pixels. It owns the
//! choice list, the navigation history, the search dialog and the submit gate,
//! and is the single entry point a UI client talks to.
//!
//! ## Role and Responsibilities
//!
//! The API:
//! - **Dispatches** user intents to the component that handles them
//! - **Normalizes inputs** (names and ranks → university ids)
//! - **Keeps overlays in step** with the history through [`BuilderApi::settle`]
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **List logic**: that lives in [`crate::choices`]
//! - **Overlay transitions**: that lives in [`crate::overlay`]
//! - **I/O and presentation**: no stdout, no formatting
//!
//! ## The Event Loop
//!
//! Back and forward are asynchronous in a browser. Here they stay queued in
//! the [`MemoryHistory`] until the client calls [`BuilderApi::settle`], which
//! commits them and lets every overlay reconcile with the resulting location.
//! A client calls `settle` once per turn of its loop.
//!
//! ## Generic Over ApplicationStore
//!
//! - Production: `BuilderApi<FileStore>`
//! - Testing: `BuilderApi<InMemoryStore>`

use crate::catalog::Catalog;
use crate::choices::{ChoiceList, ToggleOutcome};
use crate::config::BuilderConfig;
use crate::error::{BuilderError, Result};
use crate::model::{Application, Choice, MAX_CHOICES};
use crate::overlay::{History, Location, MemoryHistory, OverlayController, OverlayState};
use crate::search::{SearchView, SelectionSearchSurface};
use crate::store::ApplicationStore;
use crate::submission::{ConfirmOutcome, Notice, SubmissionGate, SubmitOutcome};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub choices: Vec<Choice>,
    pub application: Option<Application>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_application(mut self, application: Application) -> Self {
        self.application = Some(application);
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }
}

/// Which page the builder backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderMode {
    /// First submission, starts empty.
    New,
    /// Re-selection, starts from the latest submitted application.
    Edit,
}

/// The overlays the edit page knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Search,
    Confirm,
}

pub struct BuilderApi<S: ApplicationStore> {
    store: S,
    catalog: Catalog,
    history: MemoryHistory,
    list: ChoiceList,
    search: SelectionSearchSurface,
    gate: SubmissionGate,
    persisted: Option<Application>,
}

impl<S: ApplicationStore> BuilderApi<S> {
    /// Mounts the edit page at `config.base_path`.
    pub fn mount(store: S, catalog: Catalog, config: &BuilderConfig, mode: BuilderMode) -> Result<Self> {
        let location = Location::new(config.base_path.clone());
        Self::mount_at(store, catalog, config, mode, location)
    }

    /// Mounts the edit page at an explicit location, e.g. a deep link that
    /// already carries an overlay key.
    pub fn mount_at(
        store: S,
        catalog: Catalog,
        config: &BuilderConfig,
        mode: BuilderMode,
        location: Location,
    ) -> Result<Self> {
        let persisted = store.latest()?;
        let list = match mode {
            BuilderMode::New => ChoiceList::new(),
            BuilderMode::Edit => {
                let previous = persisted.as_ref().ok_or_else(|| {
                    BuilderError::Api("No submitted application to edit".to_string())
                })?;
                ChoiceList::hydrate(previous.choices.clone())
            }
        };

        let search = SelectionSearchSurface::mount(
            catalog.universities().to_vec(),
            OverlayController::mount(&config.search_key, &config.modal_param, &location),
        );
        let gate = SubmissionGate::mount(OverlayController::mount(
            &config.confirm_key,
            &config.modal_param,
            &location,
        ));
        tracing::debug!(?mode, %location, choices = list.len(), "builder mounted");

        Ok(Self {
            store,
            catalog,
            history: MemoryHistory::new(location),
            list,
            search,
            gate,
            persisted,
        })
    }

    pub fn choices(&self) -> &[Choice] {
        self.list.choices()
    }

    pub fn list(&self) -> &ChoiceList {
        &self.list
    }

    pub fn location(&self) -> &Location {
        self.history.location()
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn persisted(&self) -> Option<&Application> {
        self.persisted.as_ref()
    }

    pub fn overlay(&self, kind: OverlayKind) -> OverlayState {
        match kind {
            OverlayKind::Search => self.search.overlay().state(),
            OverlayKind::Confirm => self.gate.overlay().state(),
        }
    }

    pub fn search_view(&self) -> SearchView<'_> {
        self.search.view(&self.list)
    }

    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.gate.notice()
    }

    // --- overlays ---

    pub fn open_search(&mut self) -> Result<CmdResult> {
        let mut result = self.listing();
        if !self.search.open(&mut self.history) {
            result.add_message(CmdMessage::info("Search is already open"));
        }
        Ok(result)
    }

    pub fn close_search(&mut self) -> Result<CmdResult> {
        let mut result = self.listing();
        if !self.search.close(&mut self.history) {
            result.add_message(CmdMessage::info("Search is not open"));
        }
        Ok(result)
    }

    pub fn set_query(&mut self, query: &str) -> Result<CmdResult> {
        if !self.search.is_open() {
            self.search.open(&mut self.history);
        }
        self.search.set_query(query);
        Ok(self.listing())
    }

    /// Commits queued back/forward traversals and reconciles every overlay
    /// with the resulting location.
    pub fn settle(&mut self) {
        for event in self.history.commit() {
            tracing::trace!(location = %event.location, "navigation committed");
            self.search.overlay_mut().navigated(&event);
            self.gate.overlay_mut().navigated(&event);
        }
        // Pushes and replaces by one overlay are news to the other.
        self.search.overlay_mut().settle(&self.history);
        self.gate.overlay_mut().settle(&self.history);
    }

    /// The browser's back button.
    pub fn back(&mut self) {
        self.history.back();
    }

    /// The browser's forward button.
    pub fn forward(&mut self) {
        self.history.forward();
    }

    // --- list mutations ---

    /// Toggles a university by id.
    pub fn toggle(&mut self, id: &Uuid) -> Result<CmdResult> {
        let name = self.name_of(id);
        let outcome = self.search.click(&mut self.list, id)?;
        let mut result = self.listing();
        result.add_message(toggle_message(outcome, name.as_deref().unwrap_or("University")));
        Ok(result)
    }

    /// Toggles a university by id or name fragment.
    pub fn toggle_by_term(&mut self, term: &str) -> Result<CmdResult> {
        let id = self.resolve(term)?;
        self.toggle(&id)
    }

    pub fn remove_at(&mut self, rank: usize) -> Result<CmdResult> {
        let removed = self.list.remove_at(rank);
        let mut result = self.listing();
        match removed {
            Some(choice) => result.add_message(CmdMessage::info(format!(
                "Removed {} (was choice {})",
                choice.university.name, rank
            ))),
            None => result.add_message(CmdMessage::warning(format!("No choice at rank {}", rank))),
        }
        Ok(result)
    }

    /// Applies a full permutation of the current choices.
    pub fn reorder(&mut self, sequence: &[Uuid]) -> Result<CmdResult> {
        let applied = self.list.reorder(sequence);
        let mut result = self.listing();
        if !applied {
            result.add_message(CmdMessage::error(
                "New order must list every current choice exactly once",
            ));
        }
        Ok(result)
    }

    /// Same as [`BuilderApi::reorder`], naming choices by their current rank.
    pub fn reorder_by_ranks(&mut self, ranks: &[usize]) -> Result<CmdResult> {
        let sequence: Option<Vec<Uuid>> = ranks
            .iter()
            .map(|r| self.list.at_rank(*r).map(|c| c.university.id))
            .collect();
        match sequence {
            Some(seq) => self.reorder(&seq),
            None => Ok(self.listing().with_message(CmdMessage::error(format!(
                "Ranks must be between 1 and {}",
                self.list.len()
            )))),
        }
    }

    pub fn move_by(&mut self, rank: usize, offset: isize) -> Result<CmdResult> {
        let moved = self.list.move_by(rank, offset);
        let mut result = self.listing();
        if !moved {
            result.add_message(CmdMessage::info("Nothing to move"));
        }
        Ok(result)
    }

    /// Drops unsubmitted edits and returns to the last persisted list.
    pub fn discard(&mut self) -> Result<CmdResult> {
        self.list = match &self.persisted {
            Some(app) => ChoiceList::hydrate(app.choices.clone()),
            None => ChoiceList::new(),
        };
        Ok(self
            .listing()
            .with_message(CmdMessage::info("Unsaved changes discarded")))
    }

    // --- submission ---

    pub fn submit(&mut self) -> Result<CmdResult> {
        let outcome = self.gate.request_submit(&self.list, &mut self.history);
        let mut result = self.listing();
        match outcome {
            SubmitOutcome::AwaitingConfirmation => result.add_message(CmdMessage::info(format!(
                "Submit {} of {} choices? Confirm or cancel.",
                self.list.len(),
                MAX_CHOICES
            ))),
            SubmitOutcome::Rejected(err) => result.add_message(CmdMessage::error(err.to_string())),
        }
        Ok(result)
    }

    pub fn confirm(&mut self) -> Result<CmdResult> {
        let outcome = self
            .gate
            .confirm(&self.list, &mut self.history, &mut self.store);
        let mut result = CmdResult::default();
        match outcome {
            ConfirmOutcome::Submitted(app) => {
                self.list = ChoiceList::hydrate(app.choices.clone());
                self.persisted = Some(app.clone());
                result.add_message(CmdMessage::success(format!(
                    "Application submitted (revision {})",
                    app.revision
                )));
                result = result.with_application(app);
            }
            ConfirmOutcome::Rejected(err) => result.add_message(CmdMessage::error(err.to_string())),
            ConfirmOutcome::Failed(msg) => result.add_message(CmdMessage::error(msg)),
            ConfirmOutcome::NotConfirming => {
                result.add_message(CmdMessage::warning("Nothing to confirm, submit first"))
            }
        }
        result.choices = self.list.choices().to_vec();
        Ok(result)
    }

    pub fn cancel(&mut self) -> Result<CmdResult> {
        let mut result = self.listing();
        if !self.gate.cancel(&mut self.history) {
            result.add_message(CmdMessage::info("Nothing to cancel"));
        }
        Ok(result)
    }

    pub fn dismiss_notice(&mut self) {
        self.gate.dismiss_notice();
    }

    pub fn clear_shake(&mut self) {
        self.gate.clear_shake();
    }

    /// Tears the page down. Overlay flags are reset; history is left alone.
    pub fn unmount(mut self) -> S {
        self.search.overlay_mut().unmount();
        self.gate.overlay_mut().unmount();
        self.store
    }

    fn listing(&self) -> CmdResult {
        CmdResult::default().with_choices(self.list.choices().to_vec())
    }

    fn name_of(&self, id: &Uuid) -> Option<String> {
        self.search
            .candidates()
            .iter()
            .map(|u| (u.id, &u.name))
            .chain(self.list.choices().iter().map(|c| (c.university.id, &c.university.name)))
            .find(|(uid, _)| uid == id)
            .map(|(_, name)| name.clone())
    }

    fn resolve(&self, term: &str) -> Result<Uuid> {
        if let Ok(id) = Uuid::parse_str(term.trim()) {
            return Ok(id);
        }
        // Selected entries first, so hydrated choices outside the catalog resolve too
        let needle = term.trim().to_lowercase();
        if let Some(choice) = self
            .list
            .choices()
            .iter()
            .find(|c| c.university.name.to_lowercase() == needle)
        {
            return Ok(choice.university.id);
        }
        Ok(self.catalog.resolve(term)?.id)
    }
}

fn toggle_message(outcome: ToggleOutcome, name: &str) -> CmdMessage {
    match outcome {
        ToggleOutcome::Added(rank) => {
            CmdMessage::success(format!("Added {} as choice {}", name, rank))
        }
        ToggleOutcome::Removed(rank) => {
            CmdMessage::info(format!("Removed {} (was choice {})", name, rank))
        }
        ToggleOutcome::Full => CmdMessage::warning(format!(
            "You can rank at most {} universities, remove one first",
            MAX_CHOICES
        )),
    }
}
