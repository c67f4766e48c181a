use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::core::config::EndpointSettings;

use super::provider::{EmbeddingError, EmbeddingProvider};

/// Client for an OpenAI-compatible `/v1/embeddings` endpoint.
///
/// Works against LM Studio, llama.cpp's server, Ollama's OpenAI shim, or the
/// hosted API itself; anything speaking the `{"model", "input"}` contract.
#[derive(Clone)]
pub struct OpenAiEmbeddings {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

impl OpenAiEmbeddings {
    pub fn new(settings: &EndpointSettings) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": [text],
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: EmbeddingsResponse = response.json().await?;
        let vector = payload
            .data
            .into_iter()
            .next()
            .map(|row| row.embedding)
            .unwrap_or_default();

        if vector.is_empty() {
            return Err(EmbeddingError::Empty);
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parsing_takes_the_first_row() {
        let payload: EmbeddingsResponse = serde_json::from_str(
            r#"{"object":"list","data":[{"embedding":[0.1,0.2]},{"embedding":[9.0]}],"model":"m"}"#,
        )
        .unwrap();

        let vector = payload.data.into_iter().next().unwrap().embedding;
        assert_eq!(vector, vec![0.1, 0.2]);
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let settings = EndpointSettings {
            base_url: "http://127.0.0.1:8090/".to_string(),
            ..EndpointSettings::default()
        };
        let client = OpenAiEmbeddings::new(&settings).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8090");
    }
}
