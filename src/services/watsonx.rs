use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::services::vision::CalorieEstimator;

const PROMPT: &str = "You are a nutrition assistant. Look at the food shown in this image, \
estimate the total calories of the portion, and answer with a short phrase such as \
'Approximately 250 calories'.";

const CHAT_API_VERSION: &str = "2023-05-29";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        #[serde(rename = "type")]
        content_type: String,
        text: String,
    },
    ImageUrl {
        #[serde(rename = "type")]
        content_type: String,
        image_url: ImageData,
    },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model_id: String,
    project_id: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

#[derive(Debug, Deserialize)]
struct IamToken {
    access_token: String,
}

/// Client for the watsonx.ai text chat API.
pub struct WatsonxService {
    config: Config,
    client: reqwest::Client,
}

impl WatsonxService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Exchange the IBM Cloud API key for a short-lived IAM bearer token.
    /// Fetched per request; no token state is shared across requests.
    async fn fetch_iam_token(&self) -> Result<String> {
        let params = [
            ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
            ("apikey", self.config.api_key.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.iam_url)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            log::error!("❌ IAM token request failed: {}", error_text);
            anyhow::bail!("IAM token request failed ({}): {}", status, error_text);
        }

        let token: IamToken = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait::async_trait]
impl CalorieEstimator for WatsonxService {
    async fn estimate_calories(&self, image: &[u8], mime_type: &str) -> Result<String> {
        log::debug!("📊 Image size: {} bytes ({})", image.len(), mime_type);

        let token = self.fetch_iam_token().await?;

        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text {
                    content_type: "text".to_string(),
                    text: PROMPT.to_string(),
                },
                ContentPart::ImageUrl {
                    content_type: "image_url".to_string(),
                    image_url: ImageData {
                        url: data_url(mime_type, image),
                    },
                },
            ],
        }];

        let request = ChatRequest {
            model_id: self.config.model_id.clone(),
            project_id: self.config.project_id.clone(),
            messages,
            max_tokens: 200,
        };

        let url = format!(
            "{}/ml/v1/text/chat?version={}",
            self.config.base_url, CHAT_API_VERSION
        );

        log::info!(
            "🤖 Sending chat request to watsonx.ai with model: {}",
            self.config.model_id
        );
        log::debug!(
            "📤 Request payload size: {} bytes",
            serde_json::to_string(&request)?.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        log::debug!("📥 watsonx.ai response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            log::error!("❌ watsonx.ai API error response: {}", error_text);
            anyhow::bail!("watsonx.ai API error ({}): {}", status, error_text);
        }

        let chat_response: ChatResponse = response.json().await?;
        let answer = extract_answer(chat_response)?;
        log::info!("💬 watsonx.ai answer: {}", answer);

        Ok(answer)
    }
}

/// Build an inline `data:` URL from raw image bytes.
fn data_url(mime_type: &str, image: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(image)
    )
}

/// Pull the answer text out of a chat response. The text is trimmed but
/// otherwise passed through verbatim; no numeric extraction is attempted.
fn extract_answer(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .context("watsonx.ai response contained no choices")?;
    Ok(choice.message.content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_round_trips() {
        let bytes: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        let url = data_url("image/jpeg", bytes);

        let encoded = url.strip_prefix("data:image/jpeg;base64,").unwrap();
        let decoded = general_purpose::STANDARD.decode(encoded).unwrap();

        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_extract_answer_trims_content() {
        let raw = r#"{"choices":[{"message":{"content":"  Approximately 250 calories\n"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();

        let answer = extract_answer(response).unwrap();
        assert_eq!(answer, "Approximately 250 calories");
    }

    #[test]
    fn test_extract_answer_rejects_empty_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_answer(response).is_err());
    }

    #[test]
    fn test_chat_request_wire_format() {
        let request = ChatRequest {
            model_id: "test-model".to_string(),
            project_id: "test-project".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![ContentPart::Text {
                    content_type: "text".to_string(),
                    text: "hello".to_string(),
                }],
            }],
            max_tokens: 200,
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();

        assert_eq!(json["model_id"], "test-model");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
    }
}
