//! # Persistence Collaborator
//!
//! The builder never talks to a backend itself. It hands a validated choice
//! list to an [`ApplicationStore`] and shows whatever comes back.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryStore`]: keeps every revision in memory, for tests and
//!   throwaway sessions
//! - [`fs::FileStore`]: keeps the latest application in a JSON file, used by
//!   the CLI
//!
//! Stores do not retry. A failed submit is reported to the user as-is and the
//! user decides whether to confirm again.
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── application.json    # Latest submitted application
//! └── config.json         # Builder configuration
//! ```

use crate::error::{BuilderError, Result};
use crate::model::{Application, Choice, ChoiceSubmission};

pub mod fs;
pub mod memory;

pub trait ApplicationStore {
    /// Persists a submission.
    ///
    /// `choices` is the ordered `{rank, university_id}` list. `snapshot` carries
    /// the same entries with their display data so the stored application can
    /// be shown and re-edited later.
    fn submit(&mut self, choices: &[ChoiceSubmission], snapshot: &[Choice])
        -> Result<Application>;

    /// The most recently submitted application, if any.
    fn latest(&self) -> Result<Option<Application>>;
}

/// Builds the application a store should persist next.
///
/// A first submit creates a new application; later ones revise the previous.
pub(crate) fn next_application(
    previous: Option<&Application>,
    choices: &[ChoiceSubmission],
    snapshot: &[Choice],
) -> Result<Application> {
    let consistent = choices.len() == snapshot.len()
        && choices
            .iter()
            .zip(snapshot)
            .all(|(s, c)| s.rank == c.rank && s.university_id == c.university.id);
    if !consistent {
        return Err(BuilderError::Store(
            "Submission does not match the choice snapshot".to_string(),
        ));
    }

    let snapshot = snapshot.to_vec();
    Ok(match previous {
        Some(prev) => prev.revise(snapshot),
        None => Application::new(snapshot),
    })
}
