use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ImageProvider, ImageRequest, ProviderOutput};
use crate::error::{GatewayError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";
pub const DEFAULT_MODEL: &str = "stability-ai/stable-diffusion-3";

// Replicate predictions API client
pub struct ReplicateProvider {
    client: Client,
    api_token: Option<SecretString>,
    base_url: String,
    model: String,
    poll_interval: Duration,
}

impl ReplicateProvider {
    pub fn new(
        client: Client,
        api_token: Option<SecretString>,
        base_url: String,
        model: String,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            api_token,
            base_url,
            model,
            poll_interval,
        }
    }

    fn token(&self) -> Result<&str> {
        self.api_token
            .as_ref()
            .map(|t| t.expose_secret())
            .ok_or_else(|| GatewayError::Configuration("Replicate API token is not set".to_string()))
    }

    async fn read_prediction(&self, response: reqwest::Response) -> Result<Prediction> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(status = %status, "Replicate API error");

            return Err(GatewayError::Generation(format!(
                "Provider API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        response.json::<Prediction>().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Replicate prediction");
            GatewayError::Generation(format!("Parse Error: {}", e))
        })
    }

    // Poll until the prediction leaves starting/processing
    async fn wait_for(&self, mut prediction: Prediction, token: &str) -> Result<Prediction> {
        while prediction.status.is_pending() {
            let Some(get_url) = prediction.urls.as_ref().map(|u| u.get.clone()) else {
                return Err(GatewayError::Generation(format!(
                    "Prediction {} is {:?} but has no polling URL",
                    prediction.id, prediction.status
                )));
            };

            tokio::time::sleep(self.poll_interval).await;
            tracing::debug!(id = %prediction.id, "polling prediction");

            let response = self
                .client
                .get(&get_url)
                .bearer_auth(token)
                .send()
                .await
                .map_err(|e| GatewayError::Generation(format!("Request failed: {}", e)))?;

            prediction = self.read_prediction(response).await?;
        }

        Ok(prediction)
    }
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    input: &'a ImageRequest,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    fn is_pending(self) -> bool {
        matches!(self, PredictionStatus::Starting | PredictionStatus::Processing)
    }
}

#[derive(Deserialize, Debug)]
struct PredictionUrls {
    get: String,
}

#[derive(Deserialize, Debug)]
struct Prediction {
    #[serde(default)]
    id: String,
    status: PredictionStatus,
    output: Option<ProviderOutput>,
    error: Option<serde_json::Value>,
    urls: Option<PredictionUrls>,
}

impl Prediction {
    fn error_message(&self) -> String {
        match &self.error {
            Some(serde_json::Value::String(msg)) => msg.clone(),
            Some(serde_json::Value::Null) | None => format!("Prediction {:?}", self.status),
            Some(other) => other.to_string(),
        }
    }
}

#[async_trait]
impl ImageProvider for ReplicateProvider {
    async fn generate(&self, request: &ImageRequest) -> Result<Option<ProviderOutput>> {
        let token = self.token()?;
        let url = format!(
            "{}/models/{}/predictions",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        tracing::debug!(model = %self.model, "sending prediction request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("Prefer", "wait")
            .json(&PredictionInput { input: request })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "prediction request failed");
                GatewayError::Generation(format!("Request failed: {}", e))
            })?;

        let prediction = self.read_prediction(response).await?;
        let prediction = self.wait_for(prediction, token).await?;

        match prediction.status {
            PredictionStatus::Succeeded => {
                tracing::debug!(id = %prediction.id, "prediction succeeded");
                Ok(prediction.output)
            }
            _ => Err(GatewayError::Generation(prediction.error_message())),
        }
    }

    fn is_configured(&self) -> bool {
        self.api_token.is_some()
    }

    fn name(&self) -> &str {
        "replicate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_parses_pending_state() {
        let body = r#"{
            "id": "abc",
            "status": "processing",
            "output": null,
            "error": null,
            "urls": {"get": "https://api.replicate.com/v1/predictions/abc"}
        }"#;
        let prediction: Prediction = serde_json::from_str(body).unwrap();
        assert!(prediction.status.is_pending());
        assert!(prediction.output.is_none());
        assert_eq!(
            prediction.urls.unwrap().get,
            "https://api.replicate.com/v1/predictions/abc"
        );
    }

    #[test]
    fn test_failed_prediction_message() {
        let body = r#"{"id": "abc", "status": "failed", "error": "NSFW content detected"}"#;
        let prediction: Prediction = serde_json::from_str(body).unwrap();
        assert_eq!(prediction.status, PredictionStatus::Failed);
        assert_eq!(prediction.error_message(), "NSFW content detected");
    }

    #[test]
    fn test_canceled_prediction_without_error_text() {
        let body = r#"{"id": "abc", "status": "canceled", "error": null}"#;
        let prediction: Prediction = serde_json::from_str(body).unwrap();
        assert_eq!(prediction.error_message(), "Prediction Canceled");
    }

    #[test]
    fn test_input_is_wrapped() {
        let req = ImageRequest::new("pixel art".into());
        let json = serde_json::to_value(PredictionInput { input: &req }).unwrap();
        assert_eq!(json["input"]["prompt"], "pixel art");
        assert_eq!(json["input"]["image_dimensions"], "512x512");
        assert_eq!(json["input"]["num_inference_steps"], 25);
        assert_eq!(json["input"]["guidance_scale"], 7.5);
    }

    #[tokio::test]
    async fn test_missing_token_is_configuration_error() {
        let provider = ReplicateProvider::new(
            Client::new(),
            None,
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
            Duration::from_millis(10),
        );
        assert!(!provider.is_configured());

        let err = provider
            .generate(&ImageRequest::new("x".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));
    }
}
