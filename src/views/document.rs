use crate::models::DocumentTemplate;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

pub const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub title: String,
    pub fields: IndexMap<String, Value>,
}

impl From<DocumentTemplate> for TemplateSummary {
    fn from(template: DocumentTemplate) -> Self {
        Self {
            title: template.display_title(),
            id: template.id,
            fields: template.fields,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateList {
    pub templates: Vec<TemplateSummary>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedDocumentReply {
    pub message: String,
    pub pdf_url: String,
    pub content_preview: String,
}

impl GeneratedDocumentReply {
    pub fn new(pdf_url: String, text: &str) -> Self {
        Self {
            message: "Document generated successfully".to_string(),
            pdf_url,
            content_preview: text.chars().take(PREVIEW_CHARS).collect(),
        }
    }
}
