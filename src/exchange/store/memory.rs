use super::{next_application, ApplicationStore};
use crate::error::Result;
use crate::model::{Application, Choice, ChoiceSubmission};

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    revisions: Vec<Application>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already submitted application.
    pub fn with_application(application: Application) -> Self {
        Self {
            revisions: vec![application],
        }
    }

    /// Every submitted revision, oldest first.
    pub fn revisions(&self) -> &[Application] {
        &self.revisions
    }
}

impl ApplicationStore for InMemoryStore {
    fn submit(
        &mut self,
        choices: &[ChoiceSubmission],
        snapshot: &[Choice],
    ) -> Result<Application> {
        let application = next_application(self.revisions.last(), choices, snapshot)?;
        self.revisions.push(application.clone());
        Ok(application)
    }

    fn latest(&self) -> Result<Option<Application>> {
        Ok(self.revisions.last().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::ChoiceList;
    use crate::error::BuilderError;
    use crate::model::University;

    fn list_of(names: &[&str]) -> ChoiceList {
        let mut list = ChoiceList::new();
        for name in names {
            list.toggle(&University::new(*name, "", ""));
        }
        list
    }

    #[test]
    fn first_submit_creates_application() {
        let mut store = InMemoryStore::new();
        let list = list_of(&["A", "B"]);

        let app = store.submit(&list.submission(), list.choices()).unwrap();
        assert_eq!(app.revision, 1);
        assert_eq!(app.choices.len(), 2);
        assert_eq!(store.latest().unwrap().unwrap().id, app.id);
    }

    #[test]
    fn resubmit_revises_same_application() {
        let mut store = InMemoryStore::new();
        let first = list_of(&["A"]);
        let app = store.submit(&first.submission(), first.choices()).unwrap();

        let second = list_of(&["B", "C"]);
        let revised = store.submit(&second.submission(), second.choices()).unwrap();

        assert_eq!(revised.id, app.id);
        assert_eq!(revised.revision, 2);
        assert_eq!(store.revisions().len(), 2);
    }

    #[test]
    fn rejects_inconsistent_snapshot() {
        let mut store = InMemoryStore::new();
        let list = list_of(&["A", "B"]);
        let mut submission = list.submission();
        submission.reverse();

        let result = store.submit(&submission, list.choices());
        assert!(matches!(result, Err(BuilderError::Store(_))));
        assert!(store.latest().unwrap().is_none());
    }
}
