//! Template storage.
//!
//! Hosts inject a [`TemplateRepository`] wherever templates are listed or
//! saved. Two implementations ship with the crate: an in-memory map and a
//! directory holding one pretty-printed JSON file per template.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use widgetcanvas_core::{DecodeError, RepositoryError};

use crate::templates::TemplateFile;

/// Storage for template files, keyed by template id.
pub trait TemplateRepository: Send + Sync {
    /// All templates, sorted by name.
    fn list(&self) -> Result<Vec<TemplateFile>, RepositoryError>;
    fn get(&self, id: &str) -> Result<TemplateFile, RepositoryError>;
    /// Insert or replace by id.
    fn save(&mut self, template: &TemplateFile) -> Result<(), RepositoryError>;
    /// Returns true if a template was removed.
    fn delete(&mut self, id: &str) -> Result<bool, RepositoryError>;

    fn search(&self, query: &str) -> Result<Vec<TemplateFile>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|t| t.matches_search(query))
            .collect())
    }
}

fn sorted(mut templates: Vec<TemplateFile>) -> Vec<TemplateFile> {
    templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    templates
}

/// Templates held in memory for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateRepository {
    templates: HashMap<String, TemplateFile>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateRepository for InMemoryTemplateRepository {
    fn list(&self) -> Result<Vec<TemplateFile>, RepositoryError> {
        Ok(sorted(self.templates.values().cloned().collect()))
    }

    fn get(&self, id: &str) -> Result<TemplateFile, RepositoryError> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })
    }

    fn save(&mut self, template: &TemplateFile) -> Result<(), RepositoryError> {
        self.templates.insert(template.id.clone(), template.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.templates.remove(id).is_some())
    }
}

/// One `<id>.json` file per template in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateRepository {
    root: PathBuf,
}

impl DirectoryTemplateRepository {
    /// Open `root`, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, RepositoryError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::InvalidId { id: id.to_string() });
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    fn read(path: &Path) -> Result<TemplateFile, RepositoryError> {
        let content = std::fs::read_to_string(path)?;
        Ok(TemplateFile::from_json(&content)?)
    }
}

impl TemplateRepository for DirectoryTemplateRepository {
    fn list(&self) -> Result<Vec<TemplateFile>, RepositoryError> {
        let mut templates = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match Self::read(&path) {
                Ok(template) => templates.push(template),
                Err(err) => warn!("Skipping unreadable template {}: {}", path.display(), err),
            }
        }
        Ok(sorted(templates))
    }

    fn get(&self, id: &str) -> Result<TemplateFile, RepositoryError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(RepositoryError::NotFound { id: id.to_string() });
        }
        Self::read(&path)
    }

    fn save(&mut self, template: &TemplateFile) -> Result<(), RepositoryError> {
        let path = self.path_for(&template.id)?;
        let content = serde_json::to_string_pretty(template).map_err(DecodeError::from)?;
        std::fs::write(&path, content)?;
        debug!("Saved template '{}' to {}", template.id, path.display());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, RepositoryError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }
}
