//! # Ranked Choice List
//!
//! The applicant ranks up to [`MAX_CHOICES`] universities. Ranks are 1-based and
//! always dense: a list of length `n` carries exactly the ranks `1..=n`, each
//! university at most once.
//!
//! All mutation goes through four operations:
//!
//! - [`ChoiceList::toggle`]: add or remove a university (one handler for both)
//! - [`ChoiceList::remove_at`]: drop the entry at a rank
//! - [`ChoiceList::reorder`]: apply a full permutation from drag-and-drop
//! - [`ChoiceList::reset`]: clear everything
//!
//! ## Placement
//!
//! A new university goes to the **lowest unoccupied rank**, not blindly to the
//! end. Removals renumber, so in practice the lowest free rank is `len + 1`,
//! but a list that ever carries a gap gets it filled before it is extended.
//!
//! Nothing here does I/O. The list is a plain value that the builder owns and
//! the search surface and submission gate borrow.

use crate::error::ValidationError;
use crate::model::{Choice, ChoiceSubmission, University, MAX_CHOICES};
use std::collections::HashSet;
use uuid::Uuid;

/// What a [`ChoiceList::toggle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Inserted at the given rank.
    Added(usize),
    /// Removed from the given (former) rank.
    Removed(usize),
    /// The list is full; nothing changed.
    Full,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceList {
    // Sorted by rank
    choices: Vec<Choice>,
}

impl ChoiceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from previously persisted choices.
    ///
    /// Input is ordered by its stored rank, duplicates are dropped (first rank
    /// wins), anything beyond [`MAX_CHOICES`] is cut, and the result is
    /// renumbered so it satisfies the usual invariants whatever came in.
    pub fn hydrate<I>(choices: I) -> Self
    where
        I: IntoIterator<Item = Choice>,
    {
        let mut incoming: Vec<Choice> = choices.into_iter().collect();
        incoming.sort_by_key(|c| c.rank);

        let mut seen = HashSet::new();
        let mut list = Self {
            choices: incoming
                .into_iter()
                .filter(|c| seen.insert(c.university.id))
                .take(MAX_CHOICES)
                .collect(),
        };
        list.renumber();
        list
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.choices.len() >= MAX_CHOICES
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.choices.iter().any(|c| &c.university.id == id)
    }

    pub fn rank_of(&self, id: &Uuid) -> Option<usize> {
        self.choices
            .iter()
            .find(|c| &c.university.id == id)
            .map(|c| c.rank)
    }

    pub fn at_rank(&self, rank: usize) -> Option<&Choice> {
        self.choices.iter().find(|c| c.rank == rank)
    }

    /// Adds the university if absent, removes it if present.
    pub fn toggle(&mut self, university: &University) -> ToggleOutcome {
        if let Some(pos) = self
            .choices
            .iter()
            .position(|c| c.university.id == university.id)
        {
            let removed = self.choices.remove(pos);
            self.renumber();
            return ToggleOutcome::Removed(removed.rank);
        }

        let Some(rank) = self.lowest_free_rank() else {
            tracing::debug!(university = %university.id, "choice list full, toggle ignored");
            return ToggleOutcome::Full;
        };

        self.choices.push(Choice {
            rank,
            university: university.clone(),
        });
        self.choices.sort_by_key(|c| c.rank);
        ToggleOutcome::Added(rank)
    }

    /// Removes the entry at `rank` and closes the gap. Unknown ranks are ignored.
    pub fn remove_at(&mut self, rank: usize) -> Option<Choice> {
        let pos = self.choices.iter().position(|c| c.rank == rank)?;
        let removed = self.choices.remove(pos);
        self.renumber();
        Some(removed)
    }

    /// Re-ranks the list in the order given by `sequence`.
    ///
    /// `sequence` must name every current university exactly once. Anything
    /// else (missing ids, strangers, duplicates) leaves the list untouched and
    /// returns `false`.
    pub fn reorder(&mut self, sequence: &[Uuid]) -> bool {
        if sequence.len() != self.choices.len() {
            return false;
        }
        let current: HashSet<Uuid> = self.choices.iter().map(|c| c.university.id).collect();
        let proposed: HashSet<Uuid> = sequence.iter().copied().collect();
        if proposed.len() != sequence.len() || proposed != current {
            return false;
        }

        let mut reordered = Vec::with_capacity(self.choices.len());
        for (i, id) in sequence.iter().enumerate() {
            if let Some(pos) = self.choices.iter().position(|c| &c.university.id == id) {
                let mut choice = self.choices.swap_remove(pos);
                choice.rank = i + 1;
                reordered.push(choice);
            }
        }
        self.choices = reordered;
        true
    }

    /// Moves the entry at `rank` up (negative offset) or down (positive),
    /// clamped to the ends of the list.
    pub fn move_by(&mut self, rank: usize, offset: isize) -> bool {
        let Some(from) = self.choices.iter().position(|c| c.rank == rank) else {
            return false;
        };
        let last = self.choices.len() as isize - 1;
        let to = (from as isize + offset).clamp(0, last) as usize;
        if to == from {
            return false;
        }

        let mut sequence: Vec<Uuid> = self.choices.iter().map(|c| c.university.id).collect();
        let moved = sequence.remove(from);
        sequence.insert(to, moved);
        self.reorder(&sequence)
    }

    /// Checks the list is ready to submit.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.choices.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        let dense = self
            .choices
            .iter()
            .enumerate()
            .all(|(i, c)| c.rank == i + 1);
        if !dense {
            return Err(ValidationError::NonContiguousRank);
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.choices.clear();
    }

    pub fn submission(&self) -> Vec<ChoiceSubmission> {
        self.choices
            .iter()
            .map(|c| ChoiceSubmission {
                rank: c.rank,
                university_id: c.university.id,
            })
            .collect()
    }

    pub fn into_choices(self) -> Vec<Choice> {
        self.choices
    }

    fn lowest_free_rank(&self) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        (1..=MAX_CHOICES).find(|r| !self.choices.iter().any(|c| c.rank == *r))
    }

    // Keeps relative order by prior rank
    fn renumber(&mut self) {
        self.choices.sort_by_key(|c| c.rank);
        for (i, choice) in self.choices.iter_mut().enumerate() {
            choice.rank = i + 1;
        }
    }
}
