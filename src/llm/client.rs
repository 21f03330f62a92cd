use async_trait::async_trait;

use crate::config::Settings;
use crate::llm::bedrock::BedrockClient;
use crate::{DigestError, Result};

/// Decoding parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl GenerationConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_tokens: settings.llm.max_tokens,
            temperature: settings.llm.temperature,
            top_p: settings.llm.top_p,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.0,
            top_p: 0.9,
        }
    }
}

/// Text generation request payload.
pub struct GenerationRequest<'a> {
    pub model_id: &'a str,
    pub prompt: &'a str,
    pub config: GenerationConfig,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Return the first generated text for `request`.
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String>;
}

/// Build a text generator from runtime settings.
pub fn build_provider(
    settings: &Settings,
    sdk_config: &aws_config::SdkConfig,
) -> Result<Box<dyn TextGenerator>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "bedrock" => Ok(Box::new(BedrockClient::from_sdk_config(
            sdk_config,
            settings.llm_region(),
        ))),
        other => Err(DigestError::Config(format!(
            "Unsupported llm.provider '{}'. Supported providers: bedrock",
            other
        ))),
    }
}

/// Send `prompt` to `model_id` and return the generated summary.
pub async fn summarize(
    generator: &dyn TextGenerator,
    prompt: &str,
    model_id: &str,
    config: GenerationConfig,
) -> Result<String> {
    tracing::info!(
        model_id,
        prompt_chars = prompt.len(),
        max_tokens = config.max_tokens,
        "requesting summary"
    );

    let summary = generator
        .generate(GenerationRequest {
            model_id,
            prompt,
            config,
        })
        .await?;

    tracing::debug!(summary_chars = summary.len(), "summary received");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn unsupported_provider_returns_error() {
        let mut settings = Settings::default();
        settings.llm.provider = "unknown".to_string();
        let sdk_config = aws_config::SdkConfig::builder().build();

        let err = match build_provider(&settings, &sdk_config) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Unsupported llm.provider"));
    }

    #[derive(Default)]
    struct EchoGenerator {
        seen: Mutex<Vec<(String, String, GenerationConfig)>>,
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
            self.seen.lock().unwrap().push((
                request.model_id.to_string(),
                request.prompt.to_string(),
                request.config,
            ));
            Ok(format!("summary of {}", request.prompt))
        }
    }

    #[tokio::test]
    async fn summarize_forwards_model_and_decoding_parameters() {
        let generator = EchoGenerator::default();
        let config = GenerationConfig {
            max_tokens: 128,
            ..GenerationConfig::default()
        };

        let summary = summarize(&generator, "a call", "amazon.titan-text-lite-v1", config)
            .await
            .unwrap();

        assert_eq!(summary, "summary of a call");
        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "amazon.titan-text-lite-v1");
        assert_eq!(seen[0].2.max_tokens, 128);
        assert_eq!(seen[0].2.temperature, 0.0);
    }
}
