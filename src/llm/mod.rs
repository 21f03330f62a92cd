//! LLM module for audio-digest
//!
//! Renders the summary prompt and sends it to a Bedrock text model.

mod bedrock;
mod client;
mod prompts;

pub use bedrock::BedrockClient;
pub use client::{build_provider, summarize, GenerationConfig, GenerationRequest, TextGenerator};
pub use prompts::{
    render_transcript_prompt, PromptTemplate, DEFAULT_SUMMARY_TEMPLATE, TRANSCRIPT_KEY,
};
