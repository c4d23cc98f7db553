use crate::error::{Error, Result};
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use log::debug;
use std::env;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Character budget for the transcript portion of a prompt. A rough proxy
/// for the model's token budget: it is a character count, not a token count.
pub const MAX_CONTEXT_CHARS: usize = 16_000;

/// Cap on the generated answer length, in tokens.
const MAX_ANSWER_TOKENS: u32 = 1000;

const ANSWER_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in analyzing YouTube video content. \
Answer the question based on the transcript provided. \
Be detailed and specific, referring to the actual content from the video. \
If the answer is not in the transcript, politely state that you don't have that information from the video. \
Format your responses in a clear and readable way.";

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes YouTube video content.";

/// Answers questions about a single transcript.
///
/// Holds the transcript truncated to [`MAX_CONTEXT_CHARS`], immutable for the
/// life of the engine. Every call builds its prompt from scratch: prior
/// questions and answers are never sent to the model, even though the
/// surrounding chat surface displays a running dialogue.
#[derive(Clone)]
pub struct QueryEngine {
    client: Client<OpenAIConfig>,
    model: String,
    context: String,
}

impl QueryEngine {
    /// Build an engine for one transcript.
    ///
    /// The credential comes from `api_key` first, falling back to the
    /// `OPENAI_API_KEY` environment variable; with neither available this
    /// fails with [`Error::MissingApiKey`] before any network activity.
    pub fn new(transcript: &str, api_key: Option<String>, model: &str) -> Result<Self> {
        let key = resolve_api_key(api_key)?;
        let client = Client::with_config(OpenAIConfig::new().with_api_key(key));
        let context = bound_context(transcript, MAX_CONTEXT_CHARS).to_string();
        debug!(
            "engine ready: model {model}, context {} of {} chars",
            context.chars().count(),
            transcript.chars().count()
        );

        Ok(Self {
            client,
            model: model.to_string(),
            context,
        })
    }

    /// The bounded context actually sent with every prompt.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Answer one question from the transcript. Stateless: independent of any
    /// previous call.
    pub async fn query(&self, question: &str) -> Result<String> {
        self.complete(ANSWER_SYSTEM_PROMPT, question_prompt(&self.context, question))
            .await
    }

    /// Produce a concise summary of the transcript's main topics and key
    /// points. Same contract as [`QueryEngine::query`], fixed instruction.
    pub async fn summarize(&self) -> Result<String> {
        self.complete(SUMMARY_SYSTEM_PROMPT, summary_prompt(&self.context))
            .await
    }

    async fn complete(&self, system: &str, user: String) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .max_completion_tokens(MAX_ANSWER_TOKENS)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()?
                    .into(),
            ])
            .build()?;

        debug!("sending completion request to {}", self.model);
        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(Error::EmptyCompletion)
    }
}

/// Resolve the API key: explicit value first, environment second. A blank
/// explicit value counts as absent.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String> {
    pick_api_key(explicit, env::var(API_KEY_ENV).ok())
}

fn pick_api_key(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    explicit
        .into_iter()
        .chain(from_env)
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .ok_or(Error::MissingApiKey)
}

/// Truncate to at most `limit` characters. A plain character-count slice:
/// it does not respect word or sentence boundaries, so the tail may end
/// mid-word. Counts characters, never splits a code point.
pub fn bound_context(transcript: &str, limit: usize) -> &str {
    match transcript.char_indices().nth(limit) {
        Some((idx, _)) => &transcript[..idx],
        None => transcript,
    }
}

fn question_prompt(context: &str, question: &str) -> String {
    format!(
        "Here is the transcript of a YouTube video:\n\n{context}\n\n\
         Based on this transcript, please answer the following question: {question}"
    )
}

fn summary_prompt(context: &str) -> String {
    format!(
        "Please provide a concise summary of the following video transcript. \
         Focus on the main topics and key points:\n\n{context}"
    )
}

#[cfg(test)]
mod tests {
    use super::{
        MAX_CONTEXT_CHARS, QueryEngine, bound_context, pick_api_key, question_prompt,
        summary_prompt,
    };
    use crate::error::Error;

    #[test]
    fn short_transcript_is_untouched() {
        let transcript = "hello world";
        assert_eq!(bound_context(transcript, MAX_CONTEXT_CHARS), transcript);
    }

    #[test]
    fn exact_length_transcript_is_untouched() {
        let transcript = "a".repeat(MAX_CONTEXT_CHARS);
        assert_eq!(bound_context(&transcript, MAX_CONTEXT_CHARS), transcript);
    }

    #[test]
    fn long_transcript_is_cut_to_budget() {
        let transcript = "b".repeat(MAX_CONTEXT_CHARS + 500);
        let bounded = bound_context(&transcript, MAX_CONTEXT_CHARS);
        assert_eq!(bounded.chars().count(), MAX_CONTEXT_CHARS);
        assert!(transcript.starts_with(bounded));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let transcript = "ü".repeat(10);
        let bounded = bound_context(&transcript, 4);
        assert_eq!(bounded, "üüüü");
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let key = pick_api_key(Some("sk-explicit".into()), Some("sk-env".into())).unwrap();
        assert_eq!(key, "sk-explicit");
    }

    #[test]
    fn blank_explicit_key_falls_through_to_environment() {
        let key = pick_api_key(Some("   ".into()), Some("sk-env".into())).unwrap();
        assert_eq!(key, "sk-env");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        assert!(matches!(
            pick_api_key(None, None),
            Err(Error::MissingApiKey)
        ));
    }

    #[test]
    fn engine_stores_bounded_context() {
        let transcript = "c".repeat(MAX_CONTEXT_CHARS + 1);
        let engine = QueryEngine::new(&transcript, Some("sk-test".into()), "gpt-4o").unwrap();
        assert_eq!(engine.context().chars().count(), MAX_CONTEXT_CHARS);
    }

    #[test]
    fn question_prompt_embeds_context_and_question_literally() {
        let prompt = question_prompt("hello world", "what is said?");
        assert!(prompt.contains("hello world"));
        assert!(prompt.contains("what is said?"));
    }

    #[test]
    fn prompts_are_independent_between_calls() {
        // No state leaks between questions: each prompt is built from the
        // context and that question alone.
        let context = "the speaker explains sourdough starters";
        let first = question_prompt(context, "what is flour for?");
        let second = question_prompt(context, "how long to proof?");

        assert!(!second.contains("what is flour for?"));
        assert!(!first.contains("how long to proof?"));
    }

    #[test]
    fn summary_prompt_embeds_context() {
        let prompt = summary_prompt("hello world");
        assert!(prompt.contains("hello world"));
        assert!(prompt.contains("concise summary"));
    }
}
