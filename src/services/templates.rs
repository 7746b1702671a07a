use crate::models::DocumentTemplate;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref TEMPLATE_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Invalid template name: {0}")]
    InvalidName(String),
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Template {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },
    #[error("Failed to read template {id}: {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

/// Document templates stored as `<id>.json` files in one directory
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    dir: PathBuf,
}

impl TemplateCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every readable template, sorted by id. Broken files are logged and skipped.
    #[tracing::instrument(name = "List document templates", skip(self))]
    pub async fn list(&self) -> Vec<DocumentTemplate> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(dir = %self.dir.display(), "Templates directory unavailable: {}", err);
                return Vec::new();
            }
        };

        let mut ids = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                        continue;
                    }
                    if let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) {
                        ids.push(id.to_string());
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::error!("Error while reading templates directory: {}", err);
                    break;
                }
            }
        }
        ids.sort();

        let mut templates = Vec::with_capacity(ids.len());
        for id in ids {
            match self.load(&id).await {
                Ok(template) => templates.push(template),
                Err(err) => tracing::error!("Error reading {}.json: {}", id, err),
            }
        }
        templates
    }

    pub async fn load(&self, id: &str) -> Result<DocumentTemplate, TemplateError> {
        if !TEMPLATE_ID.is_match(id) {
            return Err(TemplateError::InvalidName(id.to_string()));
        }

        let path = self.dir.join(format!("{}.json", id));
        let raw = tokio::fs::read_to_string(&path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                TemplateError::NotFound(id.to_string())
            } else {
                TemplateError::Io {
                    id: id.to_string(),
                    source: err,
                }
            }
        })?;

        let mut template: DocumentTemplate =
            serde_json::from_str(&raw).map_err(|err| TemplateError::Malformed {
                id: id.to_string(),
                reason: err.to_string(),
            })?;
        template.id = id.to_string();

        Ok(template)
    }
}
