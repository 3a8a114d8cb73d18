//! Navigation history as seen by overlays.
//!
//! [`History`] is the seam between the overlay state machine and whatever owns
//! the real back/forward stack. `push` and `replace` take effect immediately.
//! `back` and `forward` only *request* a traversal: the host applies it later
//! and reports the new location through a [`NavigationEvent`].
//!
//! [`MemoryHistory`] is a complete in-process implementation of that contract.
//! The CLI session drives it directly and the tests use it to play out
//! back-button races step by step.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// A path plus an ordered list of query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `name` to `value`, keeping every other parameter (and its position).
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        match self.query.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.query.push((name.to_string(), value.to_string())),
        }
        self
    }

    pub fn without_param(mut self, name: &str) -> Self {
        self.query.retain(|(k, _)| k != name);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            if v.is_empty() {
                write!(f, "{}{}", sep, k)?;
            } else {
                write!(f, "{}{}={}", sep, k, v)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty location".to_string());
        }
        let (path, raw_query) = match s.split_once('?') {
            Some((p, q)) => (p, q),
            None => (s, ""),
        };
        if !path.starts_with('/') {
            return Err(format!("Location must start with '/': {}", s));
        }

        let mut location = Location::new(path);
        for pair in raw_query.split('&').filter(|p| !p.is_empty()) {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            location = location.with_param(k, v);
        }
        Ok(location)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Back,
    Forward,
}

/// Identity of one history entry, stable across `replace`.
///
/// Plays the part of the key a browser keeps in `history.state`: a controller
/// remembers the entries it pushed and recognizes them when a traversal
/// returns to one.
pub type EntryId = u64;

/// A committed traversal, i.e. what a browser reports as `popstate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub traversal: Traversal,
    pub location: Location,
    pub entry: EntryId,
}

/// The navigation stack an overlay writes to.
pub trait History {
    /// The current entry.
    fn location(&self) -> &Location;

    /// Identity of the current entry.
    fn entry_id(&self) -> EntryId;

    /// Adds an entry after the current one, dropping any forward entries.
    fn push(&mut self, location: Location);

    /// Overwrites the current entry in place.
    fn replace(&mut self, location: Location);

    /// Requests one step back. Takes effect when the host commits it.
    fn back(&mut self);

    /// Requests one step forward. Takes effect when the host commits it.
    fn forward(&mut self);
}

#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    // Parallel to `entries`
    ids: Vec<EntryId>,
    next_id: EntryId,
    index: usize,
    pending: VecDeque<Traversal>,
}

impl MemoryHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            ids: vec![0],
            next_id: 1,
            index: 0,
            pending: VecDeque::new(),
        }
    }

    /// Number of entries on the stack, forward entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Applies every requested traversal in order and reports the ones that
    /// actually moved. Traversals past either end of the stack are dropped.
    pub fn commit(&mut self) -> Vec<NavigationEvent> {
        let mut events = Vec::new();
        while let Some(traversal) = self.pending.pop_front() {
            let moved = match traversal {
                Traversal::Back if self.index > 0 => {
                    self.index -= 1;
                    true
                }
                Traversal::Forward if self.index + 1 < self.entries.len() => {
                    self.index += 1;
                    true
                }
                _ => false,
            };
            if moved {
                tracing::trace!(?traversal, location = %self.entries[self.index], "history traversal");
                events.push(NavigationEvent {
                    traversal,
                    location: self.entries[self.index].clone(),
                    entry: self.ids[self.index],
                });
            }
        }
        events
    }
}

impl History for MemoryHistory {
    fn location(&self) -> &Location {
        &self.entries[self.index]
    }

    fn entry_id(&self) -> EntryId {
        self.ids[self.index]
    }

    fn push(&mut self, location: Location) {
        self.entries.truncate(self.index + 1);
        self.ids.truncate(self.index + 1);
        self.entries.push(location);
        self.ids.push(self.next_id);
        self.next_id += 1;
        self.index += 1;
    }

    fn replace(&mut self, location: Location) {
        self.entries[self.index] = location;
    }

    fn back(&mut self) {
        self.pending.push_back(Traversal::Back);
    }

    fn forward(&mut self) {
        self.pending.push_back(Traversal::Forward);
    }
}
