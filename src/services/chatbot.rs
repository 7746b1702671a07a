use super::documents::DocumentGenerator;
use super::prompt::PromptBuilder;
use super::session_registry::{Conversation, DocumentDraft, DraftField};
use crate::configuration::{download_url, ChatbotSettings};
use crate::connectors::{ConnectorError, LlmConnector, RetrieverConnector};
use crate::models::DocumentTemplate;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

const DRAFT_VERBS: [&str; 6] = ["draft", "generate", "create", "prepare", "write", "make"];
const CANCEL_WORDS: [&str; 3] = ["cancel", "stop", "abort"];
/// Words allowed between a draft verb and the template name, as in "draft me a new rti application"
const FILLER_WORDS: [&str; 8] = ["a", "an", "the", "me", "my", "new", "us", "up"];

#[derive(Debug, thiserror::Error)]
pub enum ChatbotError {
    #[error(transparent)]
    Connector(#[from] ConnectorError),
    #[error("Failed to build prompt: {0}")]
    Prompt(String),
}

/// RAG answers with conversational memory, plus guided document drafting
pub struct LegalChatbot {
    llm: Arc<dyn LlmConnector>,
    retriever: Arc<dyn RetrieverConnector>,
    documents: Arc<DocumentGenerator>,
    prompts: PromptBuilder,
    settings: ChatbotSettings,
    public_url: String,
}

impl LegalChatbot {
    pub fn new(
        llm: Arc<dyn LlmConnector>,
        retriever: Arc<dyn RetrieverConnector>,
        documents: Arc<DocumentGenerator>,
        settings: ChatbotSettings,
        public_url: String,
    ) -> Result<Self, ChatbotError> {
        let prompts = PromptBuilder::new().map_err(|err| ChatbotError::Prompt(err.to_string()))?;
        Ok(Self {
            llm,
            retriever,
            documents,
            prompts,
            settings,
            public_url,
        })
    }

    /// Answers `query` within `conversation`, recording both sides in its memory
    #[tracing::instrument(name = "Generate chatbot reply", skip(self, conversation, query))]
    pub async fn generate(
        &self,
        conversation: &mut Conversation,
        query: &str,
    ) -> Result<String, ChatbotError> {
        conversation.touch();

        let reply = if conversation.document_draft.is_some() {
            self.continue_draft(conversation, query).await
        } else if let Some(template) = self.requested_template(query).await {
            self.start_draft(conversation, &template, query).await
        } else {
            self.answer(conversation, query).await?
        };

        conversation.memory.add_user_message(query);
        conversation.memory.add_assistant_response(reply.clone());
        Ok(reply)
    }

    async fn answer(&self, conversation: &Conversation, query: &str) -> Result<String, ChatbotError> {
        let passages = match self.retriever.retrieve(query, self.settings.top_k).await {
            Ok(passages) => passages,
            Err(err) => {
                tracing::warn!("Retrieval failed, answering without context: {}", err);
                Vec::new()
            }
        };
        tracing::debug!(passages = passages.len(), "Retrieved context");

        let messages = self
            .prompts
            .build(
                &self.settings.system_prompt,
                &passages,
                conversation.memory.window(self.settings.memory_window),
                query,
            )
            .map_err(|err| ChatbotError::Prompt(err.to_string()))?;

        Ok(self.llm.complete(&messages).await?)
    }

    async fn requested_template(&self, query: &str) -> Option<DocumentTemplate> {
        let query = query.to_lowercase();
        let words = words_of(&query);
        if !words.iter().any(|word| DRAFT_VERBS.contains(word)) {
            return None;
        }

        self.documents
            .catalog()
            .list()
            .await
            .into_iter()
            .find(|template| draft_requested(&words, template))
    }

    async fn continue_draft(&self, conversation: &mut Conversation, answer: &str) -> String {
        let Some(mut draft) = conversation.document_draft.take() else {
            return String::new();
        };

        let answer = answer.trim();
        if CANCEL_WORDS.contains(&answer.to_lowercase().as_str()) {
            return format!(
                "Okay, I have cancelled the {}. How else can I help you?",
                draft.template_title
            );
        }

        if !draft.pending_fields.is_empty() {
            let field = draft.pending_fields.remove(0);
            draft.values.push((field.name, answer.to_string()));
        }

        if let Some(next) = draft.current_field() {
            let question = next.prompt.clone();
            conversation.document_draft = Some(draft);
            return question;
        }

        self.finish_draft(draft).await
    }

    async fn start_draft(
        &self,
        conversation: &mut Conversation,
        template: &DocumentTemplate,
        query: &str,
    ) -> String {
        let draft = DocumentDraft {
            template_id: template.id.clone(),
            template_title: template.display_title(),
            pending_fields: template
                .fields
                .keys()
                .map(|name| DraftField {
                    name: name.clone(),
                    prompt: template.field_prompt(name),
                })
                .collect(),
            values: Vec::new(),
            request: query.to_string(),
        };

        let Some(first_question) = draft.current_field().map(|field| field.prompt.clone()) else {
            tracing::info!(template = %template.id, "Template has no fields, generating right away");
            return self.finish_draft(draft).await;
        };

        let intro = format!(
            "Let's prepare your {}. I need {} detail(s) from you; reply 'cancel' at any time to stop.",
            draft.template_title,
            draft.pending_fields.len()
        );
        tracing::info!(template = %template.id, "Starting guided document draft");
        conversation.document_draft = Some(draft);

        format!("{}\n\n{}", intro, first_question)
    }

    async fn finish_draft(&self, draft: DocumentDraft) -> String {
        let values: IndexMap<String, Value> = draft
            .values
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();

        match self
            .documents
            .generate(&draft.template_id, &values, &draft.request)
            .await
        {
            Ok(document) => format!(
                "Your {} is ready. You can download it here: {}",
                draft.template_title,
                download_url(&self.public_url, &document.file_name)
            ),
            Err(err) => {
                tracing::error!(template = %draft.template_id, "Drafted document failed: {}", err);
                format!(
                    "Sorry, I could not generate the {}: {}",
                    draft.template_title, err
                )
            }
        }
    }
}

fn words_of(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect()
}

/// True when a draft verb is followed, past filler words only, by the template's id words or title
fn draft_requested(words: &[&str], template: &DocumentTemplate) -> bool {
    let id_phrase = template.id.to_lowercase();
    let title = template.title.clone().unwrap_or_default().to_lowercase();

    [words_of(&id_phrase), words_of(&title)]
        .iter()
        .filter(|phrase| !phrase.is_empty())
        .any(|phrase| {
            (0..words.len()).any(|start| {
                words[start..].starts_with(phrase)
                    && words[..start]
                        .iter()
                        .rev()
                        .find(|word| !FILLER_WORDS.contains(*word))
                        .map_or(false, |word| DRAFT_VERBS.contains(word))
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::llm_service::mock::MockLlmConnector;
    use crate::connectors::retriever_service::mock::MockRetrieverConnector;
    use crate::connectors::{Passage, PromptMessage};
    use crate::services::templates::TemplateCatalog;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the prompts it receives
    #[derive(Default)]
    struct RecordingLlm {
        prompts: Mutex<Vec<Vec<PromptMessage>>>,
    }

    #[async_trait]
    impl LlmConnector for RecordingLlm {
        async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ConnectorError> {
            self.prompts.lock().unwrap().push(messages.to_vec());
            Ok("recorded".to_string())
        }

        async fn health(&self) -> Result<(), ConnectorError> {
            Ok(())
        }
    }

    struct FailingRetriever;

    #[async_trait]
    impl RetrieverConnector for FailingRetriever {
        async fn retrieve(&self, _: &str, _: usize) -> Result<Vec<Passage>, ConnectorError> {
            Err(ConnectorError::ServiceUnavailable("index offline".to_string()))
        }

        async fn health(&self) -> Result<(), ConnectorError> {
            Err(ConnectorError::ServiceUnavailable("index offline".to_string()))
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmConnector for FailingLlm {
        async fn complete(&self, _: &[PromptMessage]) -> Result<String, ConnectorError> {
            Err(ConnectorError::ServiceUnavailable("model not loaded".to_string()))
        }

        async fn health(&self) -> Result<(), ConnectorError> {
            Ok(())
        }
    }

    fn settings() -> ChatbotSettings {
        ChatbotSettings {
            system_prompt: "You are a legal aid assistant.".to_string(),
            memory_window: 2,
            top_k: 3,
        }
    }

    fn documents(templates: &tempfile::TempDir, output: &tempfile::TempDir) -> Arc<DocumentGenerator> {
        std::fs::write(
            templates.path().join("rti_application.json"),
            r#"{
                "title": "RTI Application",
                "fields": {"applicant_name": "What is your full name?", "information_sought": "What information do you want?"},
                "body": "Applicant: {{ applicant_name }}\nInformation: {{ information_sought }}"
            }"#,
        )
        .unwrap();
        Arc::new(DocumentGenerator::new(
            TemplateCatalog::new(templates.path()),
            output.path(),
        ))
    }

    fn chatbot(
        llm: Arc<dyn LlmConnector>,
        retriever: Arc<dyn RetrieverConnector>,
        documents: Arc<DocumentGenerator>,
    ) -> LegalChatbot {
        LegalChatbot::new(
            llm,
            retriever,
            documents,
            settings(),
            "http://127.0.0.1:8000".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn answers_are_recorded_in_memory() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let bot = chatbot(
            Arc::new(MockLlmConnector),
            Arc::new(MockRetrieverConnector),
            documents(&templates, &output),
        );
        let mut conversation = Conversation::new();

        let reply = bot
            .generate(&mut conversation, "What is an FIR?")
            .await
            .unwrap();

        assert!(reply.contains("What is an FIR?"));
        assert_eq!(conversation.memory.len(), 2);
        assert_eq!(conversation.memory.get_history()[0].content, "What is an FIR?");
    }

    #[tokio::test]
    async fn prompt_carries_only_the_memory_window() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let llm = Arc::new(RecordingLlm::default());
        let bot = chatbot(
            llm.clone(),
            Arc::new(FailingRetriever),
            documents(&templates, &output),
        );
        let mut conversation = Conversation::new();

        bot.generate(&mut conversation, "My name is Alice").await.unwrap();
        bot.generate(&mut conversation, "I rent a flat").await.unwrap();
        bot.generate(&mut conversation, "What is my name?").await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        let last = prompts.last().unwrap();
        // system + 2 remembered messages + question
        assert_eq!(last.len(), 4);
        assert_eq!(last[1].content, "I rent a flat");
        assert_eq!(last[3].content, "What is my name?");
    }

    #[tokio::test]
    async fn llm_failure_leaves_memory_untouched() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let bot = chatbot(
            Arc::new(FailingLlm),
            Arc::new(MockRetrieverConnector),
            documents(&templates, &output),
        );
        let mut conversation = Conversation::new();

        let err = bot.generate(&mut conversation, "Hello").await.unwrap_err();
        assert!(matches!(
            err,
            ChatbotError::Connector(ConnectorError::ServiceUnavailable(_))
        ));
        assert!(conversation.memory.is_empty());
    }

    #[tokio::test]
    async fn guided_draft_collects_fields_and_generates_the_pdf() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let bot = chatbot(
            Arc::new(MockLlmConnector),
            Arc::new(MockRetrieverConnector),
            documents(&templates, &output),
        );
        let mut conversation = Conversation::new();

        let reply = bot
            .generate(&mut conversation, "Please draft an RTI application for me")
            .await
            .unwrap();
        assert!(reply.contains("RTI Application"));
        assert!(reply.ends_with("What is your full name?"));

        let reply = bot.generate(&mut conversation, "Jane Doe").await.unwrap();
        assert_eq!(reply, "What information do you want?");

        let reply = bot
            .generate(&mut conversation, "Ration card status")
            .await
            .unwrap();
        assert!(reply.starts_with("Your RTI Application is ready."));
        assert!(reply.contains("http://127.0.0.1:8000/generated_documents/rti_application_"));
        assert!(conversation.document_draft.is_none());
        assert_eq!(conversation.memory.len(), 6);

        let generated: Vec<_> = std::fs::read_dir(output.path()).unwrap().collect();
        assert_eq!(generated.len(), 1);
    }

    #[tokio::test]
    async fn draft_can_be_cancelled() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let bot = chatbot(
            Arc::new(MockLlmConnector),
            Arc::new(MockRetrieverConnector),
            documents(&templates, &output),
        );
        let mut conversation = Conversation::new();

        bot.generate(&mut conversation, "generate rti application")
            .await
            .unwrap();
        assert!(conversation.document_draft.is_some());

        let reply = bot.generate(&mut conversation, "Cancel").await.unwrap();
        assert!(reply.contains("cancelled"));
        assert!(conversation.document_draft.is_none());
    }

    #[tokio::test]
    async fn mentioning_a_template_without_a_draft_verb_is_a_question() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let bot = chatbot(
            Arc::new(MockLlmConnector),
            Arc::new(MockRetrieverConnector),
            documents(&templates, &output),
        );
        let mut conversation = Conversation::new();

        let reply = bot
            .generate(&mut conversation, "What is an RTI application?")
            .await
            .unwrap();
        assert!(reply.starts_with("This is a mock response"));
        assert!(conversation.document_draft.is_none());
    }

    #[tokio::test]
    async fn template_without_fields_is_generated_at_once() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(
            templates.path().join("affidavit.json"),
            r#"{"title": "Affidavit", "fields": {}, "body": "I solemnly affirm the facts stated."}"#,
        )
        .unwrap();
        let bot = chatbot(
            Arc::new(MockLlmConnector),
            Arc::new(MockRetrieverConnector),
            documents(&templates, &output),
        );
        let mut conversation = Conversation::new();

        let reply = bot
            .generate(&mut conversation, "please draft an affidavit")
            .await
            .unwrap();
        assert!(reply.starts_with("Your Affidavit is ready."));
        assert!(reply.contains("/generated_documents/affidavit_"));
        assert!(conversation.document_draft.is_none());

        let reply = bot.generate(&mut conversation, "What is bail?").await.unwrap();
        assert!(reply.starts_with("This is a mock response"));
        assert!(conversation.document_draft.is_none());
    }

    #[tokio::test]
    async fn draft_verb_must_lead_to_the_template_name() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let bot = chatbot(
            Arc::new(MockLlmConnector),
            Arc::new(MockRetrieverConnector),
            documents(&templates, &output),
        );
        let mut conversation = Conversation::new();

        for question in [
            "What should I write in my RTI application?",
            "How do I make changes to an RTI application I already sent?",
        ] {
            let reply = bot.generate(&mut conversation, question).await.unwrap();
            assert!(reply.starts_with("This is a mock response"), "{}", question);
            assert!(conversation.document_draft.is_none());
        }

        bot.generate(&mut conversation, "Can you make me a new RTI application?")
            .await
            .unwrap();
        assert!(conversation.document_draft.is_some());
    }

    #[test]
    fn draft_request_matches_id_words_or_title() {
        let template = DocumentTemplate {
            id: "fir_draft".to_string(),
            title: Some("Police Complaint".to_string()),
            fields: IndexMap::new(),
            body: String::new(),
        };
        let requested = |query: &str| draft_requested(&words_of(query), &template);

        assert!(requested("draft a police complaint"));
        assert!(requested("please write the fir draft"));
        assert!(!requested("write to the police complaint cell"));
        assert!(!requested("police complaint draft"));
    }
}
