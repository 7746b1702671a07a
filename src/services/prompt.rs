use crate::connectors::{Passage, PromptMessage};
use crate::models::MessageType;
use crate::services::memory::MemoryMessage;
use tera::{Context as TeraContext, Tera};

const SYSTEM_TEMPLATE: &str = r#"{{ system_prompt }}
{% if passages %}
Use the following legal reference material when it is relevant. Cite the source in brackets when you rely on it.
{% for passage in passages %}
[{{ loop.index }}]{% if passage.source %} ({{ passage.source }}){% endif %} {{ passage.content }}
{% endfor %}{% else %}
No reference material was found for this question. Answer from general legal knowledge and say so when you are unsure.
{% endif %}"#;

/// Assembles the chat prompt: system instructions with retrieved context, recent memory, then the question
pub struct PromptBuilder {
    tera: Tera,
}

impl PromptBuilder {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template("system.tera", SYSTEM_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn build(
        &self,
        system_prompt: &str,
        passages: &[Passage],
        recent: &[MemoryMessage],
        query: &str,
    ) -> Result<Vec<PromptMessage>, tera::Error> {
        let mut context = TeraContext::new();
        context.insert("system_prompt", system_prompt.trim());
        context.insert("passages", passages);
        let system = self.tera.render("system.tera", &context)?;

        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(PromptMessage::system(system.trim()));
        messages.extend(recent.iter().map(|m| match m.message_type {
            MessageType::Human => PromptMessage::user(m.content.clone()),
            MessageType::Ai => PromptMessage::assistant(m.content.clone()),
        }));
        messages.push(PromptMessage::user(query));

        Ok(messages)
    }
}
