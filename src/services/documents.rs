use super::pdf::PdfRenderer;
use super::templates::{TemplateCatalog, TemplateError};
use crate::models::DocumentTemplate;
use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::PathBuf;
use tera::{Context as TeraContext, Tera};
use uuid::Uuid;

/// Rendered in place of declared fields the caller did not fill
pub const MISSING_FIELD: &str = "__________";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("Failed to render document text: {0}")]
    Text(String),
    #[error("Failed to render PDF: {0}")]
    Pdf(String),
    #[error("Failed to store document: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub file_name: String,
    pub path: PathBuf,
    pub text: String,
}

/// Fills templates and writes the result as PDF files under `output_dir`
pub struct DocumentGenerator {
    catalog: TemplateCatalog,
    output_dir: PathBuf,
    renderer: PdfRenderer,
}

impl DocumentGenerator {
    pub fn new(catalog: TemplateCatalog, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            output_dir: output_dir.into(),
            renderer: PdfRenderer::default(),
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    #[tracing::instrument(name = "Generate document", skip(self, field_values, user_query))]
    pub async fn generate(
        &self,
        template_name: &str,
        field_values: &IndexMap<String, Value>,
        user_query: &str,
    ) -> Result<GeneratedDocument, DocumentError> {
        let template = self.catalog.load(template_name).await?;
        let text = render_text(&template, field_values, user_query)?;

        let now = Utc::now();
        let suffix = Uuid::new_v4().simple().to_string();
        let file_name = format!(
            "{}_{}_{}.pdf",
            template.id,
            now.format("%Y%m%d_%H%M%S"),
            &suffix[..6]
        );
        let path = self.output_dir.join(&file_name);

        let renderer = self.renderer.clone();
        let title = template.display_title();
        let pdf_text = text.clone();
        let bytes = tokio::task::spawn_blocking(move || renderer.render(&title, &pdf_text))
            .await
            .map_err(|err| DocumentError::Pdf(err.to_string()))?
            .map_err(|err| DocumentError::Pdf(err.to_string()))?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::write(&path, bytes).await?;
        tracing::info!(file = %path.display(), "Document generated");

        Ok(GeneratedDocument {
            file_name,
            path,
            text,
        })
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Document text for `template` filled with `field_values`
pub fn render_text(
    template: &DocumentTemplate,
    field_values: &IndexMap<String, Value>,
    user_query: &str,
) -> Result<String, DocumentError> {
    let mut values: IndexMap<String, String> = template
        .fields
        .keys()
        .map(|field| (field.clone(), MISSING_FIELD.to_string()))
        .collect();
    for (field, value) in field_values {
        let text = value_text(value);
        if text.trim().is_empty() {
            continue;
        }
        values.insert(field.clone(), text);
    }

    let missing: Vec<_> = values
        .iter()
        .filter(|(_, v)| v.as_str() == MISSING_FIELD)
        .map(|(k, _)| k.as_str())
        .collect();
    if !missing.is_empty() {
        tracing::warn!(template = %template.id, ?missing, "Generating document with unfilled fields");
    }

    let generated_on = Utc::now().format("%d %B %Y").to_string();

    if template.body.trim().is_empty() {
        let mut text = format!("{}\n\nDate: {}\n\n", template.display_title(), generated_on);
        for (field, value) in &values {
            text.push_str(&format!("{}: {}\n", field.replace('_', " "), value));
        }
        if !user_query.trim().is_empty() {
            text.push_str(&format!("\n{}\n", user_query.trim()));
        }
        return Ok(text);
    }

    let mut context = TeraContext::new();
    for (field, value) in &values {
        context.insert(field.as_str(), value);
    }
    context.insert("user_query", user_query);
    context.insert("generated_on", &generated_on);

    Tera::one_off(&template.body, &context, false).map_err(|err| {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        DocumentError::Text(message)
    })
}
