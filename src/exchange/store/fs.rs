use super::{next_application, ApplicationStore};
use crate::error::{BuilderError, Result};
use crate::model::{Application, Choice, ChoiceSubmission};
use std::fs;
use std::path::{Path, PathBuf};

const APPLICATION_FILENAME: &str = "application.json";

/// Keeps the latest submitted application as JSON under `root`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn application_path(&self) -> PathBuf {
        self.root.join(APPLICATION_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BuilderError::Io)?;
        }
        Ok(())
    }

    // Write to a sibling temp file, then rename over the target
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(BuilderError::Io)?;
        fs::rename(&tmp, path).map_err(BuilderError::Io)?;
        Ok(())
    }
}

impl ApplicationStore for FileStore {
    fn submit(
        &mut self,
        choices: &[ChoiceSubmission],
        snapshot: &[Choice],
    ) -> Result<Application> {
        self.ensure_dir()?;
        let previous = self.latest()?;
        let application = next_application(previous.as_ref(), choices, snapshot)?;

        let content =
            serde_json::to_string_pretty(&application).map_err(BuilderError::Serialization)?;
        self.write_atomic(&self.application_path(), &content)?;
        tracing::info!(
            path = %self.application_path().display(),
            revision = application.revision,
            "application written"
        );
        Ok(application)
    }

    fn latest(&self) -> Result<Option<Application>> {
        let path = self.application_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(BuilderError::Io)?;
        let application: Application =
            serde_json::from_str(&content).map_err(BuilderError::Serialization)?;
        Ok(Some(application))
    }
}
