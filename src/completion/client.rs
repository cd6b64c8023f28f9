use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::error::CompletionError;
use crate::transcript::{Speaker, Transcript};

// Use Cow to avoid cloning strings that are only borrowed for serialization
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for OpenAI-compatible chat completion endpoints.
///
/// One synchronous (awaited) request per user turn; no retries, no
/// streaming. The transcript is read-only here, so a failed request leaves
/// the conversation state untouched.
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl CompletionClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    /// Requests the bot's next turn for `transcript` plus the pending
    /// `user_text`.
    pub async fn complete(
        &self,
        system_prompt: &str,
        transcript: &Transcript,
        user_text: &str,
        model: &str,
    ) -> Result<String, CompletionError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        );

        let chat_request = ChatCompletionRequest {
            model,
            messages: build_messages(system_prompt, transcript, user_text),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&chat_request)
            .send()
            .await
            .map_err(|source| CompletionError::Connect { url, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::from_status(status, body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|source| CompletionError::Decode { source })?;

        extract_reply(completion).ok_or(CompletionError::EmptyResponse)
    }
}

/// Builds the wire message sequence: one system message priming the persona,
/// the transcript turns in order, then the pending user message.
fn build_messages<'a>(
    system_prompt: &'a str,
    transcript: &'a Transcript,
    user_text: &'a str,
) -> Vec<Message<'a>> {
    let mut messages = Vec::with_capacity(transcript.len() + 2);

    messages.push(Message {
        role: "system",
        content: Cow::Borrowed(system_prompt),
    });

    for turn in transcript.turns() {
        messages.push(Message {
            role: match turn.speaker {
                Speaker::User => "user",
                Speaker::Bot => "assistant",
            },
            content: Cow::Borrowed(&turn.text),
        });
    }

    messages.push(Message {
        role: "user",
        content: Cow::Borrowed(user_text),
    });

    messages
}

fn extract_reply(response: ChatCompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .find_map(|c| c.message.content)
        .filter(|content| !content.is_empty())
}
