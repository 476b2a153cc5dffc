//! Ollama client for local model generation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{GenerationTask, GeneratorConfig};
use crate::error::{Error, Result};
use crate::providers::Generator;

/// Generator backed by a local Ollama runtime
pub struct OllamaGenerator {
    /// HTTP client
    client: Client,
    /// Configuration
    config: GeneratorConfig,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    /// Create a new Ollama generator
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let mut builder = Client::builder().pool_max_idle_per_host(5);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            config: config.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Turn the raw model output into the reply list
    fn to_replies(&self, prompt: &str, output: String) -> Vec<String> {
        let text = match self.config.task {
            GenerationTask::Text2TextGeneration => output.as_str(),
            GenerationTask::TextGeneration => output.strip_prefix(prompt).unwrap_or(&output),
        };

        let text = text.trim();
        if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        }
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: self.config.max_new_tokens,
                temperature: self.config.temperature,
            },
        };

        tracing::info!("Generating answer with model: {}", self.config.model);

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Generation failed: HTTP {} - {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse generation response: {}", e)))?;

        let replies = self.to_replies(prompt, generated.response);
        tracing::debug!("Model returned {} replies", replies.len());
        Ok(replies)
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.get(self.url("/api/tags")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::{get, post}, Json, Router};
    use serde_json::{json, Value};

    /// Serve `router` on an ephemeral local port and return its base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn generator(base_url: String, task: GenerationTask) -> OllamaGenerator {
        OllamaGenerator::new(&GeneratorConfig {
            base_url,
            model: "flan-t5-test".to_string(),
            task,
            max_new_tokens: 32,
            ..GeneratorConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_model_and_prompt() {
        let router = Router::new()
            .route(
                "/api/generate",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["model"], "flan-t5-test");
                    assert_eq!(body["stream"], false);
                    assert_eq!(body["options"]["num_predict"], 32);
                    assert!(body["options"].get("temperature").is_none());
                    let answer = format!("echo: {}", body["prompt"].as_str().unwrap());
                    Json(json!({ "response": answer, "done": true }))
                }),
            )
            .route("/api/tags", get(|| async { Json(json!({ "models": [] })) }));
        let base_url = serve(router).await;

        let generator = generator(base_url, GenerationTask::Text2TextGeneration);
        let replies = generator.generate("hello").await.unwrap();
        assert_eq!(replies, vec!["echo: hello".to_string()]);
        assert!(generator.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_output_yields_no_replies() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { Json(json!({ "response": "  \n", "done": true })) }),
        );
        let base_url = serve(router).await;

        let replies = generator(base_url, GenerationTask::Text2TextGeneration)
            .generate("prompt")
            .await
            .unwrap();
        assert!(replies.is_empty());
    }

    #[tokio::test]
    async fn test_text_generation_strips_echoed_prompt() {
        let router = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                let full = format!("{} Mary", body["prompt"].as_str().unwrap());
                Json(json!({ "response": full, "done": true }))
            }),
        );
        let base_url = serve(router).await;

        let replies = generator(base_url, GenerationTask::TextGeneration)
            .generate("Answer:")
            .await
            .unwrap();
        assert_eq!(replies, vec!["Mary".to_string()]);
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::NOT_FOUND, "model not found") }),
        );
        let base_url = serve(router).await;

        let err = generator(base_url, GenerationTask::Text2TextGeneration)
            .generate("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(ref msg) if msg.contains("model not found")));
    }

    #[tokio::test]
    async fn test_unreachable_runtime() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let generator = generator(format!("http://{}", addr), GenerationTask::Text2TextGeneration);
        assert!(matches!(generator.generate("prompt").await, Err(Error::Llm(_))));
        assert!(!generator.health_check().await.unwrap());
    }
}
