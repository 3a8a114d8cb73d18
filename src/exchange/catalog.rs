use crate::error::{BuilderError, Result};
use crate::model::University;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// The full candidate set handed to the builder at mount.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    universities: Vec<University>,
}

impl Catalog {
    pub fn new(universities: Vec<University>) -> Result<Self> {
        let mut seen = HashSet::new();
        for u in &universities {
            if !seen.insert(u.id) {
                return Err(BuilderError::Catalog(format!(
                    "Duplicate university id {} ({})",
                    u.id, u.name
                )));
            }
        }
        Ok(Self { universities })
    }

    /// Reads a JSON array of universities.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BuilderError::Catalog(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let universities: Vec<University> =
            serde_json::from_str(&content).map_err(BuilderError::Serialization)?;
        tracing::debug!(count = universities.len(), path = %path.display(), "catalog loaded");
        Self::new(universities)
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    pub fn into_universities(self) -> Vec<University> {
        self.universities
    }

    pub fn len(&self) -> usize {
        self.universities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.universities.is_empty()
    }

    pub fn find(&self, id: &Uuid) -> Option<&University> {
        self.universities.iter().find(|u| &u.id == id)
    }

    /// Resolves a user-typed reference: a full id, or a name fragment that
    /// matches exactly one university.
    pub fn resolve(&self, term: &str) -> Result<&University> {
        let term = term.trim();
        if let Ok(id) = Uuid::parse_str(term) {
            return self.find(&id).ok_or(BuilderError::UniversityNotFound(id));
        }

        let needle = term.to_lowercase();
        if let Some(exact) = self
            .universities
            .iter()
            .find(|u| u.name.to_lowercase() == needle)
        {
            return Ok(exact);
        }

        let matches: Vec<&University> = self
            .universities
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.local_name.to_lowercase().contains(&needle)
            })
            .collect();
        match matches.as_slice() {
            [one] => Ok(*one),
            [] => Err(BuilderError::Api(format!("No university matches \"{}\"", term))),
            many => Err(BuilderError::Api(format!(
                "\"{}\" matches {} universities, be more specific",
                term,
                many.len()
            ))),
        }
    }
}
