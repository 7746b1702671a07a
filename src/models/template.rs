use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// A legal document template loaded from `<templates_dir>/<id>.json`
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentTemplate {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Field name -> description, in file order
    #[serde(default)]
    pub fields: IndexMap<String, Value>,
    /// Tera source of the document text
    #[serde(default)]
    pub body: String,
}

impl DocumentTemplate {
    pub fn display_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| format!("{}.json", self.id))
    }

    /// Question used to ask the user for a field value
    pub fn field_prompt(&self, field: &str) -> String {
        match self.fields.get(field) {
            Some(Value::String(description)) if !description.trim().is_empty() => {
                description.clone()
            }
            _ => field.replace('_', " "),
        }
    }
}
