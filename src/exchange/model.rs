use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of ranked choices an application may carry.
pub const MAX_CHOICES: usize = 5;

/// A partner university as shown to the applicant.
///
/// The struct is a display snapshot: the id is the stable reference, the
/// remaining fields are only used for rendering and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub id: Uuid,
    pub name: String,
    // Name in the university's own language, e.g. "Universität Wien"
    #[serde(default)]
    pub local_name: String,
    #[serde(default)]
    pub country: String,
}

impl University {
    pub fn new(name: impl Into<String>, local_name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            local_name: local_name.into(),
            country: country.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub rank: usize,
    pub university: University,
}

/// The shape handed to the persistence collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSubmission {
    pub rank: usize,
    pub university_id: Uuid,
}

/// A submitted application as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub choices: Vec<Choice>,
    pub submitted_at: DateTime<Utc>,
    // Bumped on every re-selection
    #[serde(default)]
    pub revision: u32,
}

impl Application {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self {
            id: Uuid::new_v4(),
            choices,
            submitted_at: Utc::now(),
            revision: 1,
        }
    }

    /// Builds the next revision of this application with a new choice list.
    pub fn revise(&self, choices: Vec<Choice>) -> Self {
        Self {
            id: self.id,
            choices,
            submitted_at: Utc::now(),
            revision: self.revision + 1,
        }
    }
}
