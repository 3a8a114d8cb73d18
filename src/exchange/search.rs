//! University search dialog.
//!
//! The surface holds the candidate set it was mounted with and the current
//! query text, nothing else. What is selected, and at which rank, is always
//! read from the [`ChoiceList`] passed in, so opening and closing the dialog
//! any number of times cannot drift from the list.

use crate::choices::{ChoiceList, ToggleOutcome};
use crate::error::{BuilderError, Result};
use crate::model::University;
use crate::overlay::{History, OverlayController};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow<'a> {
    pub university: &'a University,
    pub rank: Option<usize>,
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchView<'a> {
    /// Selected universities, by rank.
    pub selected: Vec<CandidateRow<'a>>,
    /// Everything else, in catalog order.
    pub unselected: Vec<CandidateRow<'a>>,
}

#[derive(Debug, Clone)]
pub struct SelectionSearchSurface {
    candidates: Vec<University>,
    query: String,
    overlay: OverlayController,
}

impl SelectionSearchSurface {
    pub fn mount(candidates: Vec<University>, overlay: OverlayController) -> Self {
        Self {
            candidates,
            query: String::new(),
            overlay,
        }
    }

    pub fn candidates(&self) -> &[University] {
        &self.candidates
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayController {
        &mut self.overlay
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn open<H: History + ?Sized>(&mut self, history: &mut H) -> bool {
        self.overlay.open(history)
    }

    /// Closes the dialog and forgets the query.
    pub fn close<H: History + ?Sized>(&mut self, history: &mut H) -> bool {
        self.query.clear();
        self.overlay.close(history)
    }

    /// Splits the candidates into selected and unselected rows matching the
    /// current query.
    pub fn view<'a>(&'a self, list: &'a ChoiceList) -> SearchView<'a> {
        let needle = self.query.trim().to_lowercase();

        let selected = list
            .choices()
            .iter()
            .filter(|c| matches_query(&c.university, &needle))
            .map(|c| CandidateRow {
                university: &c.university,
                rank: Some(c.rank),
                disabled: false,
            })
            .collect();

        let full = list.is_full();
        let unselected = self
            .candidates
            .iter()
            .filter(|u| !list.contains(&u.id) && matches_query(u, &needle))
            .map(|u| CandidateRow {
                university: u,
                rank: None,
                disabled: full,
            })
            .collect();

        SearchView {
            selected,
            unselected,
        }
    }

    /// Handles a click on a row: adds or removes the university.
    ///
    /// Selected entries that are no longer in the catalog (hydrated from an
    /// older application) can still be removed.
    pub fn click(&self, list: &mut ChoiceList, id: &Uuid) -> Result<ToggleOutcome> {
        let university = self
            .candidates
            .iter()
            .find(|u| &u.id == id)
            .or_else(|| {
                list.choices()
                    .iter()
                    .map(|c| &c.university)
                    .find(|u| &u.id == id)
            })
            .cloned()
            .ok_or(BuilderError::UniversityNotFound(*id))?;

        Ok(list.toggle(&university))
    }
}

fn matches_query(university: &University, needle: &str) -> bool {
    needle.is_empty()
        || university.name.to_lowercase().contains(needle)
        || university.local_name.to_lowercase().contains(needle)
}
