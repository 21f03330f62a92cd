use async_trait::async_trait;
use aws_sdk_bedrockruntime::config::Region;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use serde::{Deserialize, Serialize};

use crate::llm::client::{GenerationConfig, GenerationRequest, TextGenerator};
use crate::{DigestError, Result};

const CONTENT_TYPE: &str = "application/json";
const ACCEPT: &str = "*/*";

/// Titan text models served through Bedrock `InvokeModel`.
pub struct BedrockClient {
    client: Client,
}

impl BedrockClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from a shared SDK config, pinned to `region`.
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, region: &str) -> Self {
        let config = aws_sdk_bedrockruntime::config::Builder::from(sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        Self::new(Client::from_conf(config))
    }
}

#[async_trait]
impl TextGenerator for BedrockClient {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
        let body = titan_request_body(request.prompt, &request.config)?;

        let response = self
            .client
            .invoke_model()
            .model_id(request.model_id)
            .content_type(CONTENT_TYPE)
            .accept(ACCEPT)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                DigestError::Inference(format!(
                    "Bedrock request to {} failed: {}",
                    request.model_id,
                    DisplayErrorContext(e)
                ))
            })?;

        parse_titan_response(response.body().as_ref())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_text: &'a str,
    text_generation_config: TitanGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanGenerationConfig {
    max_token_count: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct TitanResponse {
    results: Option<Vec<TitanResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanResult {
    output_text: Option<String>,
}

fn titan_request_body(prompt: &str, config: &GenerationConfig) -> Result<Vec<u8>> {
    let request = TitanRequest {
        input_text: prompt,
        text_generation_config: TitanGenerationConfig {
            max_token_count: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        },
    };
    Ok(serde_json::to_vec(&request)?)
}

/// Extract `results[0].outputText` from a Titan response body.
fn parse_titan_response(body: &[u8]) -> Result<String> {
    let payload: TitanResponse = serde_json::from_slice(body)
        .map_err(|e| DigestError::ResponseFormat(format!("response is not valid JSON: {e}")))?;

    payload
        .results
        .ok_or_else(|| DigestError::ResponseFormat("missing 'results'".to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| DigestError::ResponseFormat("'results' is empty".to_string()))?
        .output_text
        .ok_or_else(|| DigestError::ResponseFormat("missing 'results[0].outputText'".to_string()))
}
