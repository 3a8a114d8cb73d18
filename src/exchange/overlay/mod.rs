//! # History-Synchronized Overlays
//!
//! An overlay (search dialog, submit confirmation) is open exactly when the
//! current location carries `?<param>=<key>`. The [`OverlayController`] keeps
//! one overlay's open flag in step with that slot while keeping the history
//! stack as short as it can.
//!
//! ## States
//!
//! ```text
//!              open()  (push ?modal=key)
//!   Closed ───────────────────────────────▶ OpenPushed
//!     ▲  ▲                                      │
//!     │  └──────── close()  (request back) ─────┘
//!     │
//!     │        slot becomes key on an entry it did not push
//!     ├───────────────────────────────────▶ OpenExternal
//!     └──────── close()  (replace, drop param) ─┘
//! ```
//!
//! Any navigation that removes or changes the slot drops an open controller
//! back to `Closed`, whichever way it was opened.
//!
//! ## Optimistic close
//!
//! Closing an overlay we pushed asks the history to go back one step. That
//! traversal lands later, so the flag flips to closed right away and the
//! eventual navigation event finds nothing left to do.
//!
//! ## Stale locations
//!
//! Between an optimistic close and the commit of its back, the location still
//! carries the key. The controller counts the backs it has requested and
//! ignores plain re-syncs while any is outstanding. Committed navigations are
//! always applied: the location they land on is authoritative.
//!
//! ## Pushed vs. external
//!
//! A controller remembers the entries it pushed. Landing on one of them (back
//! after a reopen, forward after a close) counts as `OpenPushed`, so closing
//! it again steps back instead of rewriting the entry. Any other entry that
//! carries the key is `OpenExternal`.
//!
//! ## Sharing a slot
//!
//! Several controllers may use the same parameter with different keys. The
//! last writer wins: a controller whose key gets overwritten sees the change
//! on its next `sync` and closes. Call sites never open two overlays at once.

pub mod history;

pub use history::{EntryId, History, Location, MemoryHistory, NavigationEvent, Traversal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Closed,
    /// Opened by this controller through a history entry it pushed.
    OpenPushed,
    /// Found open: the location already carried the key.
    OpenExternal,
}

/// Snapshot of a controller, as a view would consume it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayState {
    pub key: String,
    pub is_open: bool,
    pub opened_by_this_controller: bool,
}

#[derive(Debug, Clone)]
pub struct OverlayController {
    key: String,
    param: String,
    phase: OverlayPhase,
    pushed: Vec<EntryId>,
    // Backs requested by close() that have not been committed yet
    pending_backs: usize,
}

impl OverlayController {
    /// Creates a controller whose initial state is read from `location`.
    pub fn mount(key: impl Into<String>, param: impl Into<String>, location: &Location) -> Self {
        let mut ctrl = Self {
            key: key.into(),
            param: param.into(),
            phase: OverlayPhase::Closed,
            pushed: Vec::new(),
            pending_backs: 0,
        };
        if ctrl.carries_key(location) {
            ctrl.phase = OverlayPhase::OpenExternal;
        }
        ctrl
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != OverlayPhase::Closed
    }

    pub fn state(&self) -> OverlayState {
        OverlayState {
            key: self.key.clone(),
            is_open: self.is_open(),
            opened_by_this_controller: self.phase == OverlayPhase::OpenPushed,
        }
    }

    /// Opens the overlay by pushing a history entry. Returns `false` if it was
    /// already open.
    pub fn open<H: History + ?Sized>(&mut self, history: &mut H) -> bool {
        if self.is_open() {
            return false;
        }

        let next = history.location().clone().with_param(&self.param, &self.key);
        tracing::debug!(key = %self.key, location = %next, "overlay open (push)");
        history.push(next);
        self.pushed.push(history.entry_id());
        self.phase = OverlayPhase::OpenPushed;
        true
    }

    /// Closes the overlay. Returns `false` if it was already closed.
    pub fn close<H: History + ?Sized>(&mut self, history: &mut H) -> bool {
        let phase = self.phase;
        if phase == OverlayPhase::Closed {
            return false;
        }
        self.phase = OverlayPhase::Closed;

        if !self.carries_key(history.location()) {
            // Someone else owns the slot now; leave their entry alone.
            tracing::debug!(key = %self.key, "overlay close without owning the slot");
            return true;
        }

        match phase {
            OverlayPhase::OpenPushed => {
                tracing::debug!(key = %self.key, "overlay close (back)");
                self.pending_backs += 1;
                history.back();
            }
            OverlayPhase::OpenExternal => {
                let next = history.location().clone().without_param(&self.param);
                tracing::debug!(key = %self.key, location = %next, "overlay close (replace)");
                history.replace(next);
            }
            OverlayPhase::Closed => {}
        }
        true
    }

    /// Applies a committed traversal. The location it landed on decides the
    /// phase, whatever the controller believed before.
    pub fn navigated(&mut self, event: &NavigationEvent) {
        if event.traversal == Traversal::Back && self.pending_backs > 0 {
            self.pending_backs -= 1;
        }
        self.reconcile(&event.location, event.entry);
    }

    /// Reconciles with the current entry after a push or replace by someone
    /// else. Skipped while a back this controller requested is still in
    /// flight, since the current entry is the one being left.
    pub fn sync<H: History + ?Sized>(&mut self, history: &H) {
        if self.pending_backs > 0 {
            return;
        }
        self.reconcile(history.location(), history.entry_id());
    }

    /// Called once the host has committed every requested traversal.
    ///
    /// Traversals past the start of the stack are dropped without an event,
    /// so the outstanding-back count is cleared here instead of trusted, and
    /// the current entry decides the phase.
    pub fn settle<H: History + ?Sized>(&mut self, history: &H) {
        self.pending_backs = 0;
        self.reconcile(history.location(), history.entry_id());
    }

    /// Forgets all state without touching history.
    pub fn unmount(&mut self) {
        self.phase = OverlayPhase::Closed;
        self.pushed.clear();
        self.pending_backs = 0;
    }

    fn reconcile(&mut self, location: &Location, entry: EntryId) {
        let next = if !self.carries_key(location) {
            OverlayPhase::Closed
        } else if self.pushed.contains(&entry) {
            OverlayPhase::OpenPushed
        } else {
            OverlayPhase::OpenExternal
        };
        if next != self.phase {
            tracing::debug!(key = %self.key, from = ?self.phase, to = ?next, %location, "overlay reconciled with navigation");
            self.phase = next;
        }
    }

    fn carries_key(&self, location: &Location) -> bool {
        location.param(&self.param) == Some(self.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAM: &str = "modal";

    fn setup(url: &str) -> (MemoryHistory, OverlayController) {
        let history = MemoryHistory::new(url.parse().unwrap());
        let ctrl = OverlayController::mount("search", PARAM, history.location());
        (history, ctrl)
    }

    // What the host does once per turn: commit traversals, then settle
    fn settle(history: &mut MemoryHistory, ctrls: &mut [&mut OverlayController]) {
        for event in history.commit() {
            for ctrl in ctrls.iter_mut() {
                ctrl.navigated(&event);
            }
        }
        for ctrl in ctrls.iter_mut() {
            ctrl.settle(&*history);
        }
    }

    fn agrees_with_url(ctrl: &OverlayController, history: &MemoryHistory) -> bool {
        ctrl.is_open() == (history.location().param(PARAM) == Some(ctrl.key()))
    }

    #[test]
    fn mounts_closed_without_param() {
        let (_, ctrl) = setup("/application/edit");
        assert_eq!(ctrl.phase(), OverlayPhase::Closed);
        assert!(!ctrl.is_open());
    }

    #[test]
    fn mounts_open_external_from_deep_link() {
        let (_, ctrl) = setup("/application/edit?modal=search");
        assert_eq!(ctrl.phase(), OverlayPhase::OpenExternal);
        assert_eq!(
            ctrl.state(),
            OverlayState {
                key: "search".into(),
                is_open: true,
                opened_by_this_controller: false,
            }
        );
    }

    #[test]
    fn mounts_closed_for_other_key() {
        let (_, ctrl) = setup("/application/edit?modal=confirm");
        assert!(!ctrl.is_open());
    }

    #[test]
    fn open_pushes_entry_with_merged_query() {
        let (mut history, mut ctrl) = setup("/application/edit?tab=2");
        assert!(ctrl.open(&mut history));

        assert_eq!(ctrl.phase(), OverlayPhase::OpenPushed);
        assert!(ctrl.state().opened_by_this_controller);
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.location().to_string(),
            "/application/edit?tab=2&modal=search"
        );
    }

    #[test]
    fn open_twice_pushes_once() {
        let (mut history, mut ctrl) = setup("/a");
        ctrl.open(&mut history);
        assert!(!ctrl.open(&mut history));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn close_after_push_is_optimistic_back() {
        let (mut history, mut ctrl) = setup("/a");
        ctrl.open(&mut history);

        assert!(ctrl.close(&mut history));
        // Flag flips before the traversal lands
        assert!(!ctrl.is_open());
        assert_eq!(history.location().param(PARAM), Some("search"));

        settle(&mut history, &mut [&mut ctrl]);
        assert_eq!(ctrl.phase(), OverlayPhase::Closed);
        assert_eq!(history.location().param(PARAM), None);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn close_twice_is_a_no_op() {
        let (mut history, mut ctrl) = setup("/a");
        ctrl.open(&mut history);
        ctrl.close(&mut history);
        assert!(!ctrl.close(&mut history));

        settle(&mut history, &mut [&mut ctrl]);
        // Only one step back was requested
        assert_eq!(history.index(), 0);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn close_on_closed_does_nothing() {
        let (mut history, mut ctrl) = setup("/a");
        assert!(!ctrl.close(&mut history));
        assert!(!history.has_pending());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn close_external_replaces_in_place() {
        let (mut history, mut ctrl) = setup("/a?tab=1&modal=search");
        assert!(ctrl.close(&mut history));

        assert!(!ctrl.is_open());
        assert!(!history.has_pending());
        assert_eq!(history.len(), 1);
        assert_eq!(history.location().to_string(), "/a?tab=1");
    }

    #[test]
    fn browser_back_closes_pushed_overlay() {
        let (mut history, mut ctrl) = setup("/application/edit");
        ctrl.open(&mut history);
        assert_eq!(
            history.location().to_string(),
            "/application/edit?modal=search"
        );

        // User presses the back button
        history.back();
        settle(&mut history, &mut [&mut ctrl]);

        assert_eq!(ctrl.phase(), OverlayPhase::Closed);
        assert!(!ctrl.state().opened_by_this_controller);
        assert_eq!(history.location().param(PARAM), None);
    }

    #[test]
    fn browser_forward_returns_to_own_entry() {
        let (mut history, mut ctrl) = setup("/a");
        ctrl.open(&mut history);
        ctrl.close(&mut history);
        settle(&mut history, &mut [&mut ctrl]);

        history.forward();
        settle(&mut history, &mut [&mut ctrl]);
        assert_eq!(ctrl.phase(), OverlayPhase::OpenPushed);

        // Closing steps back again rather than rewriting the entry
        ctrl.close(&mut history);
        settle(&mut history, &mut [&mut ctrl]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.index(), 0);
        assert!(!ctrl.is_open());
    }

    #[test]
    fn entry_pushed_elsewhere_opens_external() {
        let (mut history, mut ctrl) = setup("/a");
        // A link elsewhere on the page navigates to the dialog
        history.push("/a?modal=search".parse().unwrap());
        ctrl.sync(&history);
        assert_eq!(ctrl.phase(), OverlayPhase::OpenExternal);

        // Closing an external overlay must not grow the stack
        ctrl.close(&mut history);
        assert_eq!(history.len(), 2);
        assert!(!history.has_pending());
        assert_eq!(history.location().param(PARAM), None);
    }

    #[test]
    fn stale_location_does_not_reopen() {
        let (mut history, mut ctrl) = setup("/a");
        ctrl.open(&mut history);
        ctrl.close(&mut history);

        // A re-render before the back lands still sees ?modal=search
        assert_eq!(history.location().param(PARAM), Some("search"));
        ctrl.sync(&history);
        assert!(!ctrl.is_open());
    }

    #[test]
    fn reopen_before_back_lands_stays_open() {
        let (mut history, mut ctrl) = setup("/a");
        ctrl.open(&mut history);
        ctrl.close(&mut history);
        assert!(ctrl.open(&mut history));

        settle(&mut history, &mut [&mut ctrl]);
        assert_eq!(ctrl.phase(), OverlayPhase::OpenPushed);
        assert_eq!(history.location().param(PARAM), Some("search"));

        // And it still closes with a single step back
        ctrl.close(&mut history);
        settle(&mut history, &mut [&mut ctrl]);
        assert!(!ctrl.is_open());
        assert_eq!(history.location().param(PARAM), None);
    }

    #[test]
    fn second_overlay_opened_before_back_lands_follows_url() {
        let mut history = MemoryHistory::new(Location::new("/a"));
        let mut search = OverlayController::mount("search", PARAM, history.location());
        let mut confirm = OverlayController::mount("confirm", PARAM, history.location());

        search.open(&mut history);
        search.close(&mut history);
        confirm.open(&mut history);
        settle(&mut history, &mut [&mut search, &mut confirm]);

        // The queued back lands on the search entry
        assert_eq!(history.location().param(PARAM), Some("search"));
        assert_eq!(search.phase(), OverlayPhase::OpenPushed);
        assert!(!confirm.is_open());
        assert!(agrees_with_url(&search, &history));
        assert!(agrees_with_url(&confirm, &history));
    }

    #[test]
    fn last_writer_wins_on_shared_slot() {
        let mut history = MemoryHistory::new(Location::new("/a"));
        let mut search = OverlayController::mount("search", PARAM, history.location());
        let mut confirm = OverlayController::mount("confirm", PARAM, history.location());

        search.open(&mut history);
        confirm.open(&mut history);
        search.sync(&history);
        confirm.sync(&history);

        assert!(!search.is_open());
        assert_eq!(confirm.phase(), OverlayPhase::OpenPushed);
        assert_eq!(history.location().param(PARAM), Some("confirm"));

        // Closing the overwritten controller leaves the winner alone
        assert!(!search.close(&mut history));
        assert_eq!(history.location().param(PARAM), Some("confirm"));
    }

    #[test]
    fn unmount_resets_without_touching_history() {
        let (mut history, mut ctrl) = setup("/a");
        ctrl.open(&mut history);
        ctrl.unmount();

        assert!(!ctrl.is_open());
        assert!(!history.has_pending());
        assert_eq!(history.len(), 2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Step {
            Open(bool),
            Close(bool),
            Back,
            Forward,
            Settle,
        }

        // `true` drives the search controller, `false` the confirm one
        fn step() -> impl Strategy<Value = Step> {
            prop_oneof![
                any::<bool>().prop_map(Step::Open),
                any::<bool>().prop_map(Step::Close),
                Just(Step::Back),
                Just(Step::Forward),
                Just(Step::Settle),
            ]
        }

        proptest! {
            #[test]
            fn flags_follow_url_after_settle(steps in prop::collection::vec(step(), 0..40)) {
                let mut history = MemoryHistory::new(Location::new("/application/edit"));
                let mut search = OverlayController::mount("search", PARAM, history.location());
                let mut confirm = OverlayController::mount("confirm", PARAM, history.location());

                for step in steps {
                    match step {
                        Step::Open(true) => { search.open(&mut history); }
                        Step::Open(false) => { confirm.open(&mut history); }
                        Step::Close(true) => { search.close(&mut history); }
                        Step::Close(false) => { confirm.close(&mut history); }
                        Step::Back => history.back(),
                        Step::Forward => history.forward(),
                        Step::Settle => {}
                    }
                    if matches!(step, Step::Settle) {
                        settle(&mut history, &mut [&mut search, &mut confirm]);
                        prop_assert!(agrees_with_url(&search, &history));
                        prop_assert!(agrees_with_url(&confirm, &history));
                        prop_assert!(!(search.is_open() && confirm.is_open()));
                    }
                }

                settle(&mut history, &mut [&mut search, &mut confirm]);
                prop_assert!(agrees_with_url(&search, &history));
                prop_assert!(agrees_with_url(&confirm, &history));
            }
        }
    }
}
