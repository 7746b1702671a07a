use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use serde_valid::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct DocumentRequest {
    #[validate(min_length = 1)]
    #[validate(max_length = 128)]
    pub template_name: String,
    #[serde(default)]
    pub user_inputs: IndexMap<String, Value>,
    #[serde(default)]
    #[validate(max_length = 8000)]
    pub user_query: String,
}
