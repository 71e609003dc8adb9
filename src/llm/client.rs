//! Chat completion client for OpenAI-compatible and Ollama endpoints

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::AnswerGenerator;
use crate::config::AppConfig;
use crate::config::Provider;
use crate::errors::OwlError;
use crate::errors::Result;

pub struct LlmClient {
    provider: Provider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: usize,
    client: Client,
}

impl LlmClient {
    /// Create a client from the `[llm]` config section
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let section = &config.llm;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(section.timeout_secs))
            .build()
            .map_err(|e| OwlError::HttpError(e.to_string()))?;

        Ok(Self {
            provider: section.provider,
            model: section.model.clone(),
            endpoint: section.endpoint.trim_end_matches('/').to_string(),
            api_key: section.api_key.clone(),
            temperature: section.temperature,
            max_tokens: section.max_tokens,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete_openai(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| OwlError::ConfigError("OpenAI API key not provided".to_string()))?;

        #[derive(Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            temperature: f32,
            max_tokens: usize,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: Option<String>,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {}", url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OwlError::LlmError(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| OwlError::LlmError(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OwlError::LlmError("No completion in response".to_string()))
    }

    async fn complete_ollama(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct GenerateOptions {
            temperature: f32,
            num_predict: usize,
        }

        #[derive(Serialize)]
        struct GenerateRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: GenerateOptions,
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            response: String,
        }

        let url = format!("{}/api/generate", self.endpoint);
        debug!("Calling Ollama generate API: {}", url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OwlError::LlmError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OwlError::LlmError(format!("Failed to parse response: {e}")))?;

        Ok(result.response)
    }
}

#[async_trait]
impl AnswerGenerator for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let text = match self.provider {
            Provider::OpenAI => self.complete_openai(prompt).await?,
            Provider::Ollama => self.complete_ollama(prompt).await?,
        };
        Ok(text.trim().to_string())
    }
}
